//! 笔记记录服务 - 业务能力层
//!
//! 每次作答追加一条笔记，与答对答错无关

use chrono::Local;
use tracing::debug;

use crate::error::SessionError;
use crate::models::note::{Note, NoteDraft};
use crate::models::question::Question;

/// 笔记记录器
///
/// 笔记按追加顺序保存，编号从1开始递增
#[derive(Debug, Default)]
pub struct NoteRecorder {
    notes: Vec<Note>,
    next_id: u64,
}

impl NoteRecorder {
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            next_id: 1,
        }
    }

    /// 追加一条笔记，返回新笔记
    pub fn add_note(&mut self, draft: NoteDraft) -> &Note {
        let id = self.allocate_id();
        debug!("追加笔记 #{} (题目 {})", id, draft.question_id);

        self.notes.push(Note {
            id,
            question_id: draft.question_id,
            question: draft.question,
            user_answer: draft.user_answer,
            explanation: draft.explanation,
            is_correct: draft.is_correct,
            notes: draft.notes,
            versions: Vec::new(),
            created_at: Local::now(),
        });

        &self.notes[self.notes.len() - 1]
    }

    /// 为某道题手写一条笔记（不对应任何作答）
    pub fn create_note(&mut self, question: &Question, text: impl Into<String>) -> &Note {
        self.add_note(NoteDraft {
            question_id: question.id,
            question: question.question.clone(),
            user_answer: String::new(),
            explanation: question.explanation.clone(),
            is_correct: false,
            notes: text.into(),
        })
    }

    /// 修改笔记内容，旧内容保存为历史版本
    pub fn edit_notes(&mut self, note_id: u64, text: impl Into<String>) -> Result<&Note, SessionError> {
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or(SessionError::NoteNotFound { note_id })?;
        note.revise(text);
        debug!("笔记 #{} 已修改，历史版本数: {}", note_id, note.versions.len());
        Ok(note)
    }

    pub fn find(&self, note_id: u64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == note_id)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// 作答类笔记数量（用户手写的笔记 user_answer 为空）
    pub fn answered_count(&self) -> usize {
        self.notes.iter().filter(|n| !n.user_answer.is_empty()).count()
    }

    pub fn correct_count(&self) -> usize {
        self.notes
            .iter()
            .filter(|n| !n.user_answer.is_empty() && n.is_correct)
            .count()
    }

    fn allocate_id(&mut self) -> u64 {
        // Default 构造时 next_id 为 0
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }
}
