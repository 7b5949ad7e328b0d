use crate::models::question::QuestionBank;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载题库
///
/// 只负责读取和解析，编号与标记由会话创建时统一处理
pub async fn load_questions(toml_file_path: &Path) -> Result<QuestionBank> {
    if !toml_file_path.exists() {
        anyhow::bail!("题库文件不存在: {}", toml_file_path.display());
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let bank = parse_questions(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    tracing::info!(
        "正在加载: {}，共 {} 道题目",
        toml_file_path.file_name().unwrap_or_default().to_string_lossy(),
        bank.questions.len()
    );

    Ok(bank)
}

/// 解析 TOML 文本为题库
pub fn parse_questions(content: &str) -> Result<QuestionBank> {
    let bank: QuestionBank = toml::from_str(content)?;
    Ok(bank)
}
