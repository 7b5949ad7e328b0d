//! 编排层
//!
//! - `app` - 终端应用，负责题库加载、输入输出和笔记导出
//! - `command` - 终端命令解析

pub mod app;
pub mod command;

pub use app::App;
pub use command::Command;
