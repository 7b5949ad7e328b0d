//! 测验流程 - 流程层
//!
//! 核心职责：定义"答一道题"的完整流程
//!
//! 流程顺序：
//! 1. 判分（选择题本地 / 其他题型远程评估）
//! 2. 追加笔记
//! 3. 展示反馈
//! 4. 固定延迟后进入下一题或结束

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::config::Config;
use crate::error::SessionError;
use crate::models::note::Note;
use crate::models::question::{Question, QuestionFlag};
use crate::services::{AnswerEvaluator, NoteRecorder};
use crate::workflow::quiz_session::{AnswerOutcome, QuizSession};

/// 测验流程
///
/// - 持有会话状态机和笔记记录器
/// - 只依赖评估能力（services），不关心评估如何实现
pub struct QuizFlow {
    session: QuizSession,
    recorder: NoteRecorder,
    evaluator: Arc<dyn AnswerEvaluator>,
    advance_delay: Duration,
}

impl QuizFlow {
    /// 创建新的测验流程
    pub fn new(questions: Vec<Question>, evaluator: Arc<dyn AnswerEvaluator>, config: &Config) -> Self {
        Self {
            session: QuizSession::new(questions),
            recorder: NoteRecorder::new(),
            evaluator,
            advance_delay: config.advance_delay,
        }
    }

    /// 自定义切题延迟
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn recorder(&self) -> &NoteRecorder {
        &self.recorder
    }

    pub fn notes(&self) -> &[Note] {
        self.recorder.notes()
    }

    /// 提交答案并追加笔记，不切题
    pub async fn submit(&mut self, answer: &str) -> Result<AnswerOutcome, SessionError> {
        let outcome = self
            .session
            .submit_answer(answer, self.evaluator.as_ref())
            .await?;
        self.recorder.add_note(outcome.note.clone());
        Ok(outcome)
    }

    /// 等待固定延迟后切到下一题
    pub async fn wait_and_advance(&mut self) -> Option<&Question> {
        debug!("{:?} 后进入下一题", self.advance_delay);
        sleep(self.advance_delay).await;
        self.session.advance()
    }

    /// 完整作答流程：判分 → 笔记 → 延迟 → 切题
    pub async fn answer(&mut self, answer: &str) -> Result<AnswerOutcome, SessionError> {
        let outcome = self.submit(answer).await?;
        self.wait_and_advance().await;
        Ok(outcome)
    }

    /// 标记当前题目
    pub fn flag(&mut self, flag: QuestionFlag) -> Result<(), SessionError> {
        self.session.flag_current(flag)
    }

    /// 为当前题目手写笔记
    pub fn create_note(&mut self, text: &str) -> Result<&Note, SessionError> {
        let question = match self.session.current() {
            Some(question) => question.clone(),
            None if self.session.is_finished() => return Err(SessionError::Finished),
            None => return Err(SessionError::NoContent),
        };
        Ok(self.recorder.create_note(&question, text))
    }

    /// 修改已有笔记
    pub fn edit_note(&mut self, note_id: u64, text: &str) -> Result<&Note, SessionError> {
        self.recorder.edit_notes(note_id, text)
    }

    /// 重新开始会话，笔记保留
    pub fn restart(&mut self) {
        self.session.restart();
    }

    /// 用新题目替换整个会话（重新加载题库时使用）
    pub fn reload(&mut self, questions: Vec<Question>) {
        self.session = QuizSession::new(questions);
    }
}
