//! 终端命令解析
//!
//! 以 `:` 开头的输入是命令，其余输入都是答案

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::models::question::QuestionFlag;

/// 编程题答案的结束标记
pub const CODE_END_MARKER: &str = ":end";

static EDIT_NOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:note\s+#?(\d+)\s+(.+)$").expect("note regex is invalid"));
static NEW_NOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:new\s+(.+)$").expect("new-note regex is invalid"));

/// 终端命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 标记当前题目
    Flag(QuestionFlag),
    /// 重新开始（无题目时重新加载题库）
    Restart,
    /// 列出所有笔记
    Notes,
    /// 修改笔记
    EditNote { id: u64, text: String },
    /// 为当前题目新建笔记
    NewNote(String),
    Help,
    Quit,
}

impl Command {
    /// 解析一行命令输入
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();

        if let Some(caps) = EDIT_NOTE.captures(line) {
            let id = caps[1].parse()?;
            return Ok(Command::EditNote {
                id,
                text: caps[2].trim().to_string(),
            });
        }

        if let Some(caps) = NEW_NOTE.captures(line) {
            return Ok(Command::NewNote(caps[1].trim().to_string()));
        }

        match line {
            ":pass" => Ok(Command::Flag(QuestionFlag::PassForNow)),
            ":skip" => Ok(Command::Flag(QuestionFlag::SkipPermanently)),
            ":less" => Ok(Command::Flag(QuestionFlag::AskLessOften)),
            ":restart" => Ok(Command::Restart),
            ":notes" => Ok(Command::Notes),
            ":help" | ":h" => Ok(Command::Help),
            ":quit" | ":q" => Ok(Command::Quit),
            ":note" => anyhow::bail!("用法: :note <笔记编号> <内容>"),
            ":new" => anyhow::bail!("用法: :new <内容>"),
            CODE_END_MARKER => anyhow::bail!("当前没有正在输入的代码"),
            other => anyhow::bail!("未知命令: {}，输入 :help 查看可用命令", other),
        }
    }
}

/// 命令帮助文本
pub const HELP_TEXT: &str = "\
可用命令：
  直接输入        作答（选择题可输入选项序号）
  编程题          逐行输入代码，单独一行 :end 提交
                  （首行若是上面的命令仍按命令处理，其他 : 开头的行按代码处理）
  :pass           暂时跳过当前题目
  :skip           永久跳过当前题目
  :less           减少当前题目出现频率
  :restart        重新开始（无题目时重新加载题库）
  :notes          查看所有笔记
  :note <编号> <内容>  修改笔记
  :new <内容>     为当前题目新建笔记
  :quit           退出";
