//! 笔记导出服务 - 业务能力层
//!
//! 只负责"把笔记写到文件"能力，不关心流程

use std::path::PathBuf;

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::note::Note;

/// 笔记导出服务
///
/// 以 JSON 数组格式覆盖写入目标文件
pub struct NoteWriter {
    notes_file_path: PathBuf,
}

impl NoteWriter {
    /// 使用默认文件路径创建
    pub fn new() -> Self {
        Self {
            notes_file_path: PathBuf::from("notes.json"),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            notes_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.notes_file_path
    }

    /// 写入全部笔记
    pub async fn write(&self, notes: &[Note]) -> AppResult<()> {
        debug!(
            "导出 {} 条笔记到 {}",
            notes.len(),
            self.notes_file_path.display()
        );

        let content = serde_json::to_string_pretty(notes)?;
        tokio::fs::write(&self.notes_file_path, content)
            .await
            .map_err(|e| AppError::file_write_failed(self.notes_file_path.display().to_string(), e))?;

        Ok(())
    }

    /// 读取之前导出的笔记
    pub async fn read(&self) -> AppResult<Vec<Note>> {
        let content = tokio::fs::read_to_string(&self.notes_file_path)
            .await
            .map_err(|e| AppError::file_read_failed(self.notes_file_path.display().to_string(), e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for NoteWriter {
    fn default() -> Self {
        Self::new()
    }
}
