use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

use crate::clients::EvaluateClient;
use crate::config::Config;
use crate::models::loaders::load_questions;
use crate::models::question::{Question, QuestionKind};
use crate::orchestrator::command::{Command, CODE_END_MARKER, HELP_TEXT};
use crate::services::{AnswerEvaluator, NoteWriter};
use crate::utils::logging::{log_questions_loaded, log_startup, print_final_stats, truncate_text};
use crate::workflow::{QuizFlow, SessionState};

/// 应用主结构
pub struct App {
    config: Config,
    flow: QuizFlow,
    note_writer: NoteWriter,
}

impl App {
    /// 初始化应用
    ///
    /// 题库加载失败不会中断启动，会话进入"无题目"状态
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config.questions_file, &config.evaluate_api_url);

        let evaluator: Arc<dyn AnswerEvaluator> = Arc::new(EvaluateClient::new(&config)?);
        let questions = load_question_list(&config).await;

        Ok(Self::with_evaluator(config, questions, evaluator))
    }

    /// 使用指定的评估能力创建应用
    pub fn with_evaluator(
        config: Config,
        questions: Vec<Question>,
        evaluator: Arc<dyn AnswerEvaluator>,
    ) -> Self {
        let flow = QuizFlow::new(questions, evaluator, &config);
        let note_writer = NoteWriter::with_path(&config.notes_export_file);
        Self {
            config,
            flow,
            note_writer,
        }
    }

    pub fn flow(&self) -> &QuizFlow {
        &self.flow
    }

    fn current_kind(&self) -> Option<QuestionKind> {
        self.flow.session().current().map(|q| q.kind)
    }

    /// 运行应用主逻辑（标准输入 / 标准输出）
    pub async fn run(&mut self) -> Result<()> {
        let input = BufReader::new(tokio::io::stdin());
        let mut output = tokio::io::stdout();
        self.run_with(input, &mut output).await
    }

    /// 从任意输入读取命令，把界面输出写到任意输出
    pub async fn run_with<R, W>(&mut self, input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        self.render_current(output).await?;

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if trimmed.starts_with(':') && trimmed != CODE_END_MARKER {
                match Command::parse(trimmed) {
                    Ok(command) => {
                        if !self.handle_command(command, output).await? {
                            break;
                        }
                        continue;
                    }
                    // 编程题中无法识别的 `:` 开头行是代码的第一行
                    Err(_) if self.current_kind() == Some(QuestionKind::Code) => {}
                    Err(e) => {
                        say(output, &format!("⚠️ {}", e)).await?;
                        continue;
                    }
                }
            }

            let Some(question) = self.flow.session().current().cloned() else {
                say(output, "当前没有可作答的题目，输入 :restart 重新开始").await?;
                continue;
            };

            let answer = match question.kind {
                QuestionKind::MultipleChoice => resolve_choice(&question, trimmed),
                QuestionKind::OpenEnded => trimmed.to_string(),
                QuestionKind::Code => {
                    if trimmed == CODE_END_MARKER {
                        say(output, "⚠️ 请先输入代码").await?;
                        continue;
                    }
                    let mut code = vec![line.clone()];
                    while let Some(next) = lines.next_line().await? {
                        if next.trim() == CODE_END_MARKER {
                            break;
                        }
                        code.push(next);
                    }
                    code.join("\n")
                }
            };

            self.submit_answer(&answer, output).await?;
        }

        self.finish(output).await
    }

    /// 处理命令，返回 false 表示退出
    async fn handle_command<W>(&mut self, command: Command, output: &mut W) -> Result<bool>
    where
        W: AsyncWrite + Unpin,
    {
        match command {
            Command::Flag(flag) => match self.flow.flag(flag) {
                Ok(()) => {
                    say(output, &format!("🚩 已标记: {}", flag.name())).await?;
                    if flag.advances() {
                        self.render_current(output).await?;
                    }
                }
                Err(e) => say(output, &format!("⚠️ {}", e)).await?,
            },
            Command::Restart => {
                if self.flow.session().state() == SessionState::NoContent {
                    info!("🔄 重新加载题库: {}", self.config.questions_file);
                    let questions = load_question_list(&self.config).await;
                    self.flow.reload(questions);
                } else {
                    self.flow.restart();
                }
                self.render_current(output).await?;
            }
            Command::Notes => self.render_notes(output).await?,
            Command::EditNote { id, text } => match self.flow.edit_note(id, &text) {
                Ok(note) => {
                    let message = format!("📝 笔记 #{} 已更新（历史版本 {} 个）", note.id, note.versions.len());
                    say(output, &message).await?;
                }
                Err(e) => say(output, &format!("⚠️ {}", e)).await?,
            },
            Command::NewNote(text) => match self.flow.create_note(&text) {
                Ok(note) => {
                    let message = format!("📝 已为题目 {} 新建笔记 #{}", note.question_id, note.id);
                    say(output, &message).await?;
                }
                Err(e) => say(output, &format!("⚠️ {}", e)).await?,
            },
            Command::Help => say(output, HELP_TEXT).await?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// 作答：判分 → 展示反馈 → 延迟 → 下一题
    async fn submit_answer<W>(&mut self, answer: &str, output: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        if self.flow.session().current().map(|q| q.kind.needs_remote_evaluation()) == Some(true) {
            say(output, "⏳ 正在评估答案...").await?;
        }

        let outcome = match self.flow.submit(answer).await {
            Ok(outcome) => outcome,
            Err(e) => {
                say(output, &format!("⚠️ {}", e)).await?;
                return Ok(());
            }
        };

        let mark = if outcome.is_correct { "✅" } else { "❌" };
        say(output, &format!("{} {}", mark, outcome.feedback)).await?;
        if let Some(message) = &outcome.error_message {
            say(output, &format!("⚠️ 错误: {}", message)).await?;
        }
        say(output, &format!("得分: {}", outcome.score)).await?;

        self.flow.wait_and_advance().await;
        self.render_current(output).await
    }

    async fn render_current<W>(&self, output: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let session = self.flow.session();
        match session.state() {
            SessionState::NoContent => {
                say(output, "📭 没有可用的题目，请检查题库数据源。输入 :restart 重新加载").await?;
            }
            SessionState::Finished => {
                let total = session.questions().len();
                say(output, &format!("🏁 测验结束！最终得分: {} / {}", session.score(), total)).await?;
                say(output, "输入 :restart 重新开始，:notes 查看笔记，:quit 退出").await?;
            }
            SessionState::Active | SessionState::AwaitingAdvance => {
                let Some(question) = session.current() else {
                    return Ok(());
                };
                if let Some((current, total)) = session.progress() {
                    say(output, &format!("\n进度: {} / {}", current, total)).await?;
                }
                say(output, &format!("[{}] {}", question.kind.name(), question.question)).await?;
                if let Some(choices) = &question.choices {
                    for (idx, choice) in choices.iter().enumerate() {
                        say(output, &format!("  {}. {}", idx + 1, choice)).await?;
                    }
                }
                if question.kind == QuestionKind::Code {
                    say(output, &format!("（逐行输入代码，单独一行 {} 提交）", CODE_END_MARKER)).await?;
                }
            }
        }
        Ok(())
    }

    async fn render_notes<W>(&self, output: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let notes = self.flow.notes();
        if notes.is_empty() {
            return say(output, "还没有笔记").await;
        }

        for note in notes {
            let mark = if note.user_answer.is_empty() {
                "📝"
            } else if note.is_correct {
                "✅"
            } else {
                "❌"
            };
            let mut line = format!(
                "#{} [题目 {}] {} {}",
                note.id,
                note.question_id,
                mark,
                truncate_text(&note.question, 30)
            );
            if !note.user_answer.is_empty() {
                line.push_str(&format!(" | 答案: {}", truncate_text(&note.user_answer, 30)));
            }
            if !note.notes.is_empty() {
                line.push_str(&format!(" | 笔记: {}", note.notes));
            }
            if !note.versions.is_empty() {
                line.push_str(&format!("（历史版本 {} 个）", note.versions.len()));
            }
            say(output, &line).await?;
        }
        Ok(())
    }

    /// 导出笔记并输出统计
    async fn finish<W>(&self, output: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        say(output, &format!("👋 再见！最终得分: {}", self.flow.session().score())).await?;

        let recorder = self.flow.recorder();
        let exported = if recorder.is_empty() {
            None
        } else {
            match self.note_writer.write(recorder.notes()).await {
                Ok(()) => Some(self.config.notes_export_file.as_str()),
                Err(e) => {
                    error!("导出笔记失败: {}", e);
                    None
                }
            }
        };

        print_final_stats(self.flow.session(), recorder, exported);
        Ok(())
    }
}

/// 加载题库，失败时返回空列表
async fn load_question_list(config: &Config) -> Vec<Question> {
    match load_questions(Path::new(&config.questions_file)).await {
        Ok(bank) => {
            log_questions_loaded(bank.questions.len());
            bank.questions
        }
        Err(e) => {
            warn!("⚠️ 题库加载失败: {:#}", e);
            Vec::new()
        }
    }
}

/// 选择题可以输入 1-based 选项序号
///
/// 输入与某个选项完全相同时按原文作答，选项本身是数字时也不会被当成序号
fn resolve_choice(question: &Question, input: &str) -> String {
    let matches_choice = question
        .choices
        .as_ref()
        .is_some_and(|choices| choices.iter().any(|choice| choice == input));
    if matches_choice {
        return input.to_string();
    }

    input
        .parse::<usize>()
        .ok()
        .and_then(|number| question.choice(number))
        .unwrap_or(input)
        .to_string()
}

async fn say<W>(output: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::EvaluationResponse;
    use crate::error::AppResult;
    use async_trait::async_trait;
    use std::time::Duration;

    /// 答案与参考答案相同即判对
    struct EchoEvaluator;

    #[async_trait]
    impl AnswerEvaluator for EchoEvaluator {
        async fn evaluate(&self, question: &Question, answer: &str) -> AppResult<EvaluationResponse> {
            Ok(EvaluationResponse {
                is_correct: answer == question.correct_answer,
                feedback: String::new(),
            })
        }
    }

    fn question(kind: QuestionKind, choices: Option<&[&str]>, correct: &str) -> Question {
        Question {
            id: 1,
            kind,
            question: "What is 1 + 1?".into(),
            choices: choices.map(|c| c.iter().map(|s| s.to_string()).collect()),
            correct_answer: correct.into(),
            explanation: String::new(),
            flag: None,
        }
    }

    fn app(tag: &str, questions: Vec<Question>) -> App {
        let config = Config {
            advance_delay: Duration::ZERO,
            notes_export_file: std::env::temp_dir()
                .join(format!("qa_quiz_app_{}_{}.json", tag, std::process::id()))
                .to_string_lossy()
                .to_string(),
            ..Config::default()
        };
        App::with_evaluator(config, questions, Arc::new(EchoEvaluator))
    }

    #[test]
    fn resolve_choice_maps_numbers_to_choice_text() {
        let question = Question {
            question: "What is the capital of France?".into(),
            ..question(
                QuestionKind::MultipleChoice,
                Some(&["London", "Berlin", "Paris"]),
                "Paris",
            )
        };
        assert_eq!(resolve_choice(&question, "3"), "Paris");
        assert_eq!(resolve_choice(&question, "Paris"), "Paris");
        assert_eq!(resolve_choice(&question, "9"), "9");
    }

    #[test]
    fn resolve_choice_prefers_numeric_choice_text() {
        let question = question(QuestionKind::MultipleChoice, Some(&["4", "3", "2"]), "2");
        assert_eq!(resolve_choice(&question, "2"), "2");
        assert_eq!(resolve_choice(&question, "1"), "4");
    }

    #[tokio::test]
    async fn numeric_choice_answer_is_graded_as_typed() {
        let mut app = app("numeric", vec![question(
            QuestionKind::MultipleChoice,
            Some(&["4", "3", "2"]),
            "2",
        )]);

        let mut output: Vec<u8> = Vec::new();
        app.run_with("2\n:quit\n".as_bytes(), &mut output).await.unwrap();

        let flow = app.flow();
        assert_eq!(flow.notes()[0].user_answer, "2");
        assert!(flow.notes()[0].is_correct);
        assert_eq!(flow.session().score(), 1);
        tokio::fs::remove_file(&app.config.notes_export_file).await.ok();
    }

    #[tokio::test]
    async fn code_answer_may_start_with_a_colon() {
        let mut app = app("colon", vec![question(QuestionKind::Code, None, "::std::process::abort()")]);

        let mut output: Vec<u8> = Vec::new();
        app.run_with("::std::process::abort()\n:end\n:quit\n".as_bytes(), &mut output)
            .await
            .unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(!text.contains("未知命令"));
        let flow = app.flow();
        assert_eq!(flow.notes().len(), 1);
        assert_eq!(flow.notes()[0].user_answer, "::std::process::abort()");
        assert_eq!(flow.session().state(), SessionState::Finished);
        assert_eq!(flow.session().score(), 1);
        tokio::fs::remove_file(&app.config.notes_export_file).await.ok();
    }

    #[tokio::test]
    async fn known_commands_still_work_on_code_questions() {
        let mut app = app("pass", vec![question(QuestionKind::Code, None, "fn f() {}")]);

        let mut output: Vec<u8> = Vec::new();
        app.run_with(":pass\n:quit\n".as_bytes(), &mut output).await.unwrap();

        assert!(app.flow().notes().is_empty());
        assert_eq!(app.flow().session().state(), SessionState::Finished);
    }
}
