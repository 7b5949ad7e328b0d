//! 答案评估服务 - 业务能力层
//!
//! 只负责"判断一道题答得对不对"，不关心流程
//!
//! - 选择题：本地精确匹配（区分大小写）
//! - 问答题 / 编程题：交给远程评估服务，代码从不在本地执行

use async_trait::async_trait;

use crate::clients::{EvaluateClient, EvaluationRequest, EvaluationResponse};
use crate::error::AppResult;
use crate::models::question::{Question, QuestionKind};

/// 远程答案评估能力
#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    /// 评估一道非选择题的答案
    async fn evaluate(&self, question: &Question, answer: &str) -> AppResult<EvaluationResponse>;
}

#[async_trait]
impl AnswerEvaluator for EvaluateClient {
    async fn evaluate(&self, question: &Question, answer: &str) -> AppResult<EvaluationResponse> {
        let request = EvaluationRequest {
            question: &question.question,
            user_answer: answer,
            correct_answer: &question.correct_answer,
            question_type: question.kind,
        };
        EvaluateClient::evaluate(self, &request).await
    }
}

/// 判分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_correct: bool,
    pub feedback: String,
    /// 评估失败时的错误信息（仅用于临时提示）
    pub error_message: Option<String>,
}

/// 评估失败时展示给用户的反馈
pub const EVALUATION_FAILED_FEEDBACK: &str = "抱歉，暂时无法评估你的答案，请稍后重试。";

/// 选择题判分
pub fn grade_choice(question: &Question, answer: &str) -> Verdict {
    let is_correct = answer == question.correct_answer;
    let feedback = if is_correct {
        "回答正确！".to_string()
    } else {
        format!("回答错误。正确答案是：{}", question.correct_answer)
    };
    Verdict {
        is_correct,
        feedback,
        error_message: None,
    }
}

/// 对任意题型判分
///
/// 远程评估的任何失败都降级为"答错 + 提示"，不会向上传播
pub async fn grade(question: &Question, answer: &str, evaluator: &dyn AnswerEvaluator) -> Verdict {
    if question.kind == QuestionKind::MultipleChoice {
        return grade_choice(question, answer);
    }

    match evaluator.evaluate(question, answer).await {
        Ok(response) => Verdict {
            is_correct: response.is_correct,
            feedback: response.feedback,
            error_message: None,
        },
        Err(e) => {
            tracing::error!("评估答案失败 (题目 {}): {}", question.id, e);
            Verdict {
                is_correct: false,
                feedback: EVALUATION_FAILED_FEEDBACK.to_string(),
                error_message: Some(e.to_string()),
            }
        }
    }
}
