//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::services::note_recorder::NoteRecorder;
use crate::workflow::QuizSession;

/// 记录程序启动信息
///
/// # 参数
/// - `questions_file`: 题库文件路径
/// - `evaluate_api_url`: 评估服务地址
pub fn log_startup(questions_file: &str, evaluate_api_url: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 问答测验模式");
    info!("📁 题库文件: {}", questions_file);
    info!("🤖 评估服务: {}", evaluate_api_url);
    info!("{}", "=".repeat(60));
}

/// 记录题库加载信息
///
/// # 参数
/// - `total`: 题目总数
pub fn log_questions_loaded(total: usize) {
    info!("✓ 找到 {} 道题目", total);
    info!("💡 输入 :help 查看可用命令\n");
}

/// 打印最终统计信息
///
/// # 参数
/// - `session`: 测验会话
/// - `recorder`: 笔记记录器
/// - `notes_file`: 笔记导出文件路径（未导出时为 None）
pub fn print_final_stats(session: &QuizSession, recorder: &NoteRecorder, notes_file: Option<&str>) {
    let answered = recorder.answered_count();
    let correct = recorder.correct_count();

    info!("\n{}", "=".repeat(60));
    info!("📊 测验统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🏆 得分: {}", session.score());
    info!("✅ 答对: {}/{}", correct, answered);
    info!("❌ 答错: {}", answered - correct);
    info!("📝 笔记数量: {}", recorder.len());
    info!("{}", "=".repeat(60));
    if let Some(path) = notes_file {
        info!("\n笔记已保存至: {}", path);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
