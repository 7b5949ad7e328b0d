//! # QA Quiz
//!
//! 一个终端问答测验程序：选择题本地判分，问答题和编程题交给远程评估服务
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 与外部系统的交互
//! - `EvaluateClient` - 远程答案评估服务（POST JSON）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个题目或笔记
//! - `AnswerEvaluator` - 判分能力（选择题本地 / 其他题型远程）
//! - `NoteRecorder` - 笔记记录能力
//! - `NoteWriter` - 笔记导出能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次作答"的完整流程
//! - `QuizSession` - 会话状态机（位置、得分、标记）
//! - `QuizFlow` - 流程编排（判分 → 笔记 → 延迟 → 切题）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 终端应用，管理题库、输入输出和退出时的笔记导出
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::EvaluateClient;
pub use config::Config;
pub use error::{AppError, AppResult, SessionError};
pub use models::{Note, Question, QuestionFlag, QuestionKind};
pub use orchestrator::App;
pub use services::{AnswerEvaluator, NoteRecorder};
pub use workflow::{QuizFlow, QuizSession, SessionState};
