//! 测验会话 - 流程层状态机
//!
//! 持有题目列表、当前位置、得分和每道题的标记。
//! 状态变化只由作答、标记、延迟后的切题和重新开始触发。

use tracing::{debug, info};

use crate::error::SessionError;
use crate::models::note::NoteDraft;
use crate::models::question::{Question, QuestionFlag};
use crate::services::answer_evaluator::{grade, AnswerEvaluator};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 没有题目，需要重新加载
    NoContent,
    /// 等待作答
    Active,
    /// 已作答，等待延迟后进入下一题
    AwaitingAdvance,
    /// 测验结束
    Finished,
}

/// 当前展示的反馈
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub is_correct: bool,
}

/// 一次作答的结果
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub question_id: u32,
    pub is_correct: bool,
    pub feedback: String,
    /// 作答后的总分
    pub score: u32,
    /// 评估失败时的错误信息
    pub error_message: Option<String>,
    /// 待追加的笔记
    pub note: NoteDraft,
}

/// 测验会话
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    position: usize,
    score: u32,
    finished: bool,
    awaiting_advance: bool,
    feedback: Option<Feedback>,
    error_message: Option<String>,
}

impl QuizSession {
    /// 创建会话，题目编号重新分配为 1..=n，标记清空
    pub fn new(mut questions: Vec<Question>) -> Self {
        for (index, question) in questions.iter_mut().enumerate() {
            question.id = index as u32 + 1;
            question.flag = None;
        }
        debug!("创建测验会话，共 {} 道题目", questions.len());

        Self {
            questions,
            position: 0,
            score: 0,
            finished: false,
            awaiting_advance: false,
            feedback: None,
            error_message: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.questions.is_empty() {
            SessionState::NoContent
        } else if self.finished {
            SessionState::Finished
        } else if self.awaiting_advance {
            SessionState::AwaitingAdvance
        } else {
            SessionState::Active
        }
    }

    /// 当前题目（结束或无题目时为 None）
    pub fn current(&self) -> Option<&Question> {
        if self.finished {
            return None;
        }
        self.questions.get(self.position)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// 当前题目在列表中的下标（0-based）
    pub fn position(&self) -> usize {
        self.position
    }

    /// 进度 (当前第几题, 总题数)，1-based
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.current()
            .map(|_| (self.position + 1, self.questions.len()))
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// 提交当前题目的答案
    ///
    /// 选择题本地判分，其他题型交给评估服务；评估失败不会中断会话。
    /// 成功后会话进入等待切题状态，需要调用 [`QuizSession::advance`]。
    pub async fn submit_answer(
        &mut self,
        answer: &str,
        evaluator: &dyn AnswerEvaluator,
    ) -> Result<AnswerOutcome, SessionError> {
        let question = self.require_active()?.clone();
        self.error_message = None;

        let verdict = grade(&question, answer, evaluator).await;

        if verdict.is_correct {
            self.score += 1;
        }
        self.feedback = Some(Feedback {
            message: verdict.feedback.clone(),
            is_correct: verdict.is_correct,
        });
        self.error_message = verdict.error_message.clone();
        self.awaiting_advance = true;

        info!(
            "题目 {} 作答{}，当前得分 {}",
            question.id,
            if verdict.is_correct { "正确" } else { "错误" },
            self.score
        );

        Ok(AnswerOutcome {
            question_id: question.id,
            is_correct: verdict.is_correct,
            feedback: verdict.feedback.clone(),
            score: self.score,
            error_message: verdict.error_message,
            note: NoteDraft {
                question_id: question.id,
                question: question.question,
                user_answer: answer.to_string(),
                explanation: verdict.feedback,
                is_correct: verdict.is_correct,
                notes: String::new(),
            },
        })
    }

    /// 进入下一道未被永久跳过的题目，没有剩余题目时结束会话
    ///
    /// 返回新的当前题目
    pub fn advance(&mut self) -> Option<&Question> {
        if self.questions.is_empty() || self.finished {
            return None;
        }

        self.awaiting_advance = false;
        self.feedback = None;

        let next = self
            .questions
            .iter()
            .enumerate()
            .skip(self.position + 1)
            .find(|(_, q)| !q.is_skipped())
            .map(|(index, _)| index);

        match next {
            Some(index) => {
                debug!("进入第 {} 题", index + 1);
                self.position = index;
            }
            None => {
                info!("🏁 测验结束，最终得分 {}", self.score);
                self.finished = true;
            }
        }

        self.current()
    }

    /// 为当前题目设置标记
    ///
    /// "暂时跳过"和"不再出现"会立即切题，不计分也不生成笔记
    pub fn flag_current(&mut self, flag: QuestionFlag) -> Result<(), SessionError> {
        self.require_active()?;

        let position = self.position;
        let question = &mut self.questions[position];
        question.flag = Some(flag);
        info!("题目 {} 标记为: {}", question.id, flag.name());

        if flag.advances() {
            self.advance();
        }
        Ok(())
    }

    /// 重新开始：回到第一题，得分清零，清除所有标记
    pub fn restart(&mut self) {
        self.position = 0;
        self.score = 0;
        self.finished = false;
        self.awaiting_advance = false;
        self.feedback = None;
        self.error_message = None;
        for question in &mut self.questions {
            question.flag = None;
        }
        info!("🔄 测验重新开始");
    }

    fn require_active(&self) -> Result<&Question, SessionError> {
        match self.state() {
            SessionState::NoContent => Err(SessionError::NoContent),
            SessionState::Finished => Err(SessionError::Finished),
            SessionState::AwaitingAdvance => Err(SessionError::AwaitingAdvance {
                question_id: self.questions[self.position].id,
            }),
            SessionState::Active => Ok(&self.questions[self.position]),
        }
    }
}
