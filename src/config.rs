use std::time::Duration;

use crate::error::{AppResult, ConfigError};

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 题库 TOML 文件路径
    pub questions_file: String,
    /// 答案评估服务地址
    pub evaluate_api_url: String,
    /// 作答后自动进入下一题的延迟
    pub advance_delay: Duration,
    /// 评估请求超时时间
    pub request_timeout: Duration,
    /// 笔记导出文件
    pub notes_export_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions_file: "questions.toml".to_string(),
            evaluate_api_url: "http://localhost:3000/api/evaluate-openai".to_string(),
            advance_delay: Duration::from_millis(3000),
            request_timeout: Duration::from_secs(30),
            notes_export_file: "notes.json".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，无法解析的值回退到默认值
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            questions_file: std::env::var("QUESTIONS_FILE").unwrap_or(default.questions_file),
            evaluate_api_url: std::env::var("EVALUATE_API_URL").unwrap_or(default.evaluate_api_url),
            advance_delay: std::env::var("ADVANCE_DELAY_MS").ok().and_then(|v| v.parse().ok()).map(Duration::from_millis).unwrap_or(default.advance_delay),
            request_timeout: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).map(Duration::from_secs).unwrap_or(default.request_timeout),
            notes_export_file: std::env::var("NOTES_EXPORT_FILE").unwrap_or(default.notes_export_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 从环境变量读取配置，数值类变量无法解析时返回错误
    pub fn try_from_env() -> AppResult<Self> {
        let mut config = Self::from_env();
        if let Some(ms) = parse_env::<u64>("ADVANCE_DELAY_MS", "u64")? {
            config.advance_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_env::<u64>("REQUEST_TIMEOUT_SECS", "u64")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(verbose) = parse_env::<bool>("VERBOSE_LOGGING", "bool")? {
            config.verbose_logging = verbose;
        }
        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.parse().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}
