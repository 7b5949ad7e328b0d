use serde::{Deserialize, Serialize};
use std::fmt;

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    /// 选择题，本地精确匹配判分
    MultipleChoice,
    /// 开放问答题，交给评估服务判分
    OpenEnded,
    /// 编程题，交给评估服务判分（不在本地执行代码）
    #[serde(alias = "coding")]
    Code,
}

impl QuestionKind {
    /// 获取传给评估服务的类型名
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple-choice",
            QuestionKind::OpenEnded => "open-ended",
            QuestionKind::Code => "code",
        }
    }

    /// 获取中文名称
    pub fn name(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "选择题",
            QuestionKind::OpenEnded => "问答题",
            QuestionKind::Code => "编程题",
        }
    }

    /// 是否需要远程评估
    pub fn needs_remote_evaluation(self) -> bool {
        !matches!(self, QuestionKind::MultipleChoice)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 题目标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionFlag {
    /// 永久跳过，之后不再出现
    #[serde(alias = "dont-ask-again")]
    SkipPermanently,
    /// 减少出现频率
    AskLessOften,
    /// 本次先跳过
    #[serde(alias = "pass")]
    PassForNow,
}

impl QuestionFlag {
    /// 设置标记后是否立即进入下一题
    pub fn advances(self) -> bool {
        matches!(self, QuestionFlag::SkipPermanently | QuestionFlag::PassForNow)
    }

    /// 获取中文名称
    pub fn name(self) -> &'static str {
        match self {
            QuestionFlag::SkipPermanently => "不再出现",
            QuestionFlag::AskLessOften => "减少出现",
            QuestionFlag::PassForNow => "暂时跳过",
        }
    }
}

/// 题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// 题目编号，加载时按顺序重新分配（从1开始）
    #[serde(default)]
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// 题干
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<QuestionFlag>,
}

impl Question {
    /// 按 1-based 序号取选项
    pub fn choice(&self, number: usize) -> Option<&str> {
        let choices = self.choices.as_ref()?;
        number
            .checked_sub(1)
            .and_then(|idx| choices.get(idx))
            .map(String::as_str)
    }

    /// 是否被永久跳过
    pub fn is_skipped(&self) -> bool {
        self.flag == Some(QuestionFlag::SkipPermanently)
    }
}

/// 题库文件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub questions: Vec<Question>,
}
