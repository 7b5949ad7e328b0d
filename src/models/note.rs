use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 作答笔记
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: u64,
    pub question_id: u32,
    /// 题干快照
    pub question: String,
    pub user_answer: String,
    /// 判分反馈或解析
    pub explanation: String,
    pub is_correct: bool,
    /// 用户自由填写的笔记
    pub notes: String,
    /// `notes` 的历史版本，按修改顺序排列
    pub versions: Vec<String>,
    pub created_at: DateTime<Local>,
}

impl Note {
    /// 修改笔记内容，旧内容进入历史版本
    pub fn revise(&mut self, text: impl Into<String>) {
        let previous = std::mem::replace(&mut self.notes, text.into());
        self.versions.push(previous);
    }
}

/// 新笔记草稿（尚未分配编号）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteDraft {
    pub question_id: u32,
    pub question: String,
    pub user_answer: String,
    pub explanation: String,
    pub is_correct: bool,
    pub notes: String,
}
