//! 答案评估 API 客户端
//!
//! 封装所有与远程评估服务相关的调用逻辑
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::question::QuestionKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 评估请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest<'a> {
    pub question: &'a str,
    pub user_answer: &'a str,
    pub correct_answer: &'a str,
    pub question_type: QuestionKind,
}

/// 评估结果
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    pub is_correct: bool,
    #[serde(default)]
    pub feedback: String,
}

/// 服务端错误响应体
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// 评估服务客户端
pub struct EvaluateClient {
    http: reqwest::Client,
    endpoint: String,
}

impl EvaluateClient {
    /// 创建新的评估客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::api_request_failed(&config.evaluate_api_url, e))?;

        Ok(Self {
            http,
            endpoint: config.evaluate_api_url.clone(),
        })
    }

    /// 评估服务地址
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 发送评估请求
    ///
    /// 非 2xx 响应视为失败，错误中带上服务端返回的 message / error 字段
    pub async fn evaluate(&self, request: &EvaluationRequest<'_>) -> AppResult<EvaluationResponse> {
        debug!(
            "调用评估服务: {}，题型: {}",
            self.endpoint, request.question_type
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("评估请求发送失败: {}", e);
                AppError::api_request_failed(&self.endpoint, e)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(&self.endpoint, e))?;

        if !status.is_success() {
            let ErrorBody { message, error } = serde_json::from_str(&body).unwrap_or_default();
            warn!("评估服务返回错误状态: {}", status);
            return Err(AppError::api_bad_response(
                &self.endpoint,
                status.as_u16(),
                message,
                error,
            ));
        }

        let result: EvaluationResponse = serde_json::from_str(&body)?;
        debug!("评估完成: is_correct={}", result.is_correct);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// 启动一个只应答一次的本地 HTTP 服务，返回地址和收到的请求
    async fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                if request_complete(&received) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&received).to_string()
        });

        (format!("http://{}/api/evaluate-openai", addr), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    fn client_for(url: String) -> EvaluateClient {
        let config = Config {
            evaluate_api_url: url,
            request_timeout: Duration::from_secs(5),
            ..Config::default()
        };
        EvaluateClient::new(&config).unwrap()
    }

    fn sample_request() -> EvaluationRequest<'static> {
        EvaluationRequest {
            question: "Explain recursion.",
            user_answer: "A function calling itself.",
            correct_answer: "Recursion is when a function calls itself.",
            question_type: QuestionKind::OpenEnded,
        }
    }

    #[tokio::test]
    async fn evaluate_posts_camel_case_body_and_parses_result() {
        let (url, server) =
            one_shot_server("200 OK", r#"{"isCorrect":true,"feedback":"Well explained."}"#).await;
        let client = client_for(url);

        let result = client.evaluate(&sample_request()).await.unwrap();
        assert_eq!(
            result,
            EvaluationResponse {
                is_correct: true,
                feedback: "Well explained.".to_string(),
            }
        );

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/evaluate-openai"));
        assert!(raw.contains(r#""userAnswer":"A function calling itself.""#));
        assert!(raw.contains(r#""questionType":"open-ended""#));
        assert!(raw.contains(r#""correctAnswer""#));
    }

    #[tokio::test]
    async fn non_success_status_is_bad_response() {
        let (url, server) = one_shot_server(
            "500 Internal Server Error",
            r#"{"message":"model unavailable","error":"upstream"}"#,
        )
        .await;
        let client = client_for(url);

        let err = client.evaluate(&sample_request()).await.unwrap_err();
        match err {
            AppError::Api(ApiError::BadResponse {
                status,
                message,
                error,
                ..
            }) => {
                assert_eq!(status, 500);
                assert_eq!(message.as_deref(), Some("model unavailable"));
                assert_eq!(error.as_deref(), Some("upstream"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let (url, server) = one_shot_server("200 OK", "not json").await;
        let client = client_for(url);

        let err = client.evaluate(&sample_request()).await.unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::JsonParseFailed { .. })));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_request_failure() {
        // 绑定后立即释放端口，保证无人监听
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}/api/evaluate-openai", addr));
        let err = client.evaluate(&sample_request()).await.unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::RequestFailed { .. })));
    }
}
