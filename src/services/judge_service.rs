use crate::config::JudgeConfig;
use crate::error::Result;
use crate::models::language::Language;
use crate::utils::encoding::{decode_b64_lossy, encode_b64};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const STATUS_IN_QUEUE: u32 = 1;
pub const STATUS_PROCESSING: u32 = 2;
pub const DEFAULT_TIMEOUT_SECS: u32 = 10;
pub const TIMEOUT_MESSAGE: &str = "timeout waiting for execution results";
pub const CANCELLED_MESSAGE: &str = "execution cancelled";
pub const MISSING_TOKEN_MESSAGE: &str = "Failed to create submission";

#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request error: judge responded {status}: {body}")]
    Status { status: u16, body: String },
}

/// Body of a Judge0 submission. Text fields are base64 encoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionRequest {
    pub source_code: String,
    pub language_id: u32,
    pub stdin: String,
    pub cpu_time_limit: f64,
    pub cpu_extra_time: f64,
    pub wall_time_limit: f64,
    pub memory_limit: u32,
    pub stack_limit: u32,
    pub max_processes_and_or_threads: u32,
    pub number_of_runs: u32,
    pub expected_output: Option<String>,
    pub enable_per_process_and_thread_time_limit: bool,
    pub enable_per_process_and_thread_memory_limit: bool,
    pub max_file_size: u32,
}

impl SubmissionRequest {
    pub fn new(source_code: &str, language: Language, stdin: &str, timeout_secs: u32) -> Self {
        let timeout = f64::from(timeout_secs);
        Self {
            source_code: encode_b64(source_code),
            language_id: language.judge_id(),
            stdin: encode_b64(stdin),
            cpu_time_limit: timeout,
            cpu_extra_time: 0.5,
            wall_time_limit: timeout * 3.0,
            memory_limit: 128_000,
            stack_limit: 64_000,
            max_processes_and_or_threads: 60,
            number_of_runs: 1,
            expected_output: None,
            enable_per_process_and_thread_time_limit: false,
            enable_per_process_and_thread_memory_limit: true,
            max_file_size: 1024,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmissionCreated {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JudgeStatus {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub description: String,
}

/// Polled state of a submission as returned by the judge.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmissionStatus {
    #[serde(default)]
    pub status: Option<JudgeStatus>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: Option<String>,
    #[serde(default)]
    pub memory: Option<u64>,
    #[serde(default)]
    pub exit_code: Option<i32>,
}

impl SubmissionStatus {
    pub fn with_status(id: u32, description: &str) -> Self {
        Self {
            status: Some(JudgeStatus {
                id,
                description: description.to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn status_id(&self) -> Option<u32> {
        self.status.as_ref().map(|s| s.id)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status_id(), Some(STATUS_IN_QUEUE) | Some(STATUS_PROCESSING))
    }
}

// Judge0 reports `time` as a string, some deployments as a number.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<JsonValue>::deserialize(deserializer)? {
        Some(JsonValue::String(s)) => Some(s),
        Some(JsonValue::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JudgeApi: Send + Sync {
    async fn create_submission(
        &self,
        request: &SubmissionRequest,
    ) -> std::result::Result<SubmissionCreated, JudgeError>;

    async fn fetch_submission(
        &self,
        token: &str,
    ) -> std::result::Result<SubmissionStatus, JudgeError>;
}

#[derive(Clone)]
pub struct Judge0Client {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Judge0Client {
    pub fn new(config: &JudgeConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("X-RapidAPI-Key", key),
            None => builder,
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        res: reqwest::Response,
    ) -> std::result::Result<T, JudgeError> {
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(JudgeError::Status { status, body });
        }
        Ok(res.json::<T>().await?)
    }
}

#[async_trait]
impl JudgeApi for Judge0Client {
    async fn create_submission(
        &self,
        request: &SubmissionRequest,
    ) -> std::result::Result<SubmissionCreated, JudgeError> {
        let res = self
            .authorize(
                self.client
                    .post(format!("{}/submissions", self.base_url))
                    .query(&[("base64_encoded", "true")]),
            )
            .json(request)
            .send()
            .await?;
        Self::read_json(res).await
    }

    async fn fetch_submission(
        &self,
        token: &str,
    ) -> std::result::Result<SubmissionStatus, JudgeError> {
        let res = self
            .authorize(
                self.client
                    .get(format!("{}/submissions/{}", self.base_url, token))
                    .query(&[("base64_encoded", "true")]),
            )
            .send()
            .await?;
        Self::read_json(res).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Error,
}

/// Outcome of one `execute` call. Transport failures and timeouts surface
/// here as `status = error` rather than as an `Err`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,
    pub stdout: String,
    pub stderr: String,
    pub compile_output: String,
    pub time: Option<String>,
    pub memory: Option<u64>,
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExecutionResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Error,
            status_id: None,
            status_description: None,
            stdout: String::new(),
            stderr: String::new(),
            compile_output: String::new(),
            time: None,
            memory: None,
            exit_code: None,
            token: None,
            message: Some(message.into()),
        }
    }

    pub fn from_status(token: String, status: SubmissionStatus) -> Self {
        let decode = |field: Option<String>| field.as_deref().map(decode_b64_lossy).unwrap_or_default();
        Self {
            status: ExecutionStatus::Success,
            status_id: status.status_id(),
            status_description: status.status.as_ref().map(|s| s.description.clone()),
            stdout: decode(status.stdout),
            stderr: decode(status.stderr),
            compile_output: decode(status.compile_output),
            time: status.time,
            memory: status.memory,
            exit_code: status.exit_code,
            token: Some(token),
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}

/// Runs source code on the remote judge: one submission, then polling at a
/// fixed interval for a bounded number of attempts.
#[derive(Clone)]
pub struct CodeExecutor {
    judge: Arc<dyn JudgeApi>,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl CodeExecutor {
    pub fn new(judge: Arc<dyn JudgeApi>, config: &JudgeConfig) -> Self {
        Self {
            judge,
            poll_interval: config.poll_interval,
            max_poll_attempts: config.max_poll_attempts.max(1),
        }
    }

    pub fn from_config(config: &JudgeConfig, client: Client) -> Self {
        Self::new(Arc::new(Judge0Client::new(config, client)), config)
    }

    pub async fn execute(
        &self,
        source_code: &str,
        language: &str,
        stdin: &str,
        timeout_secs: u32,
    ) -> Result<ExecutionResult> {
        self.execute_with_cancel(source_code, language, stdin, timeout_secs, &CancellationToken::new())
            .await
    }

    pub async fn execute_with_cancel(
        &self,
        source_code: &str,
        language: &str,
        stdin: &str,
        timeout_secs: u32,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult> {
        let language: Language = language.parse()?;
        Ok(self
            .run(source_code, language, stdin, timeout_secs, cancel)
            .await)
    }

    pub(crate) async fn run(
        &self,
        source_code: &str,
        language: Language,
        stdin: &str,
        timeout_secs: u32,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        let request = SubmissionRequest::new(source_code, language, stdin, timeout_secs);

        let created = tokio::select! {
            biased;
            _ = cancel.cancelled() => return ExecutionResult::error(CANCELLED_MESSAGE),
            res = self.judge.create_submission(&request) => res,
        };
        let token = match created {
            Ok(SubmissionCreated { token: Some(token) }) if !token.is_empty() => token,
            Ok(_) => {
                tracing::error!(language = %language, "judge returned no submission token");
                return ExecutionResult::error(MISSING_TOKEN_MESSAGE);
            }
            Err(e) => {
                tracing::error!(language = %language, error = %e, "failed to create submission");
                return ExecutionResult::error(e.to_string());
            }
        };

        for attempt in 1..=self.max_poll_attempts {
            let polled = tokio::select! {
                biased;
                _ = cancel.cancelled() => return ExecutionResult::error(CANCELLED_MESSAGE),
                res = self.judge.fetch_submission(&token) => res,
            };
            match polled {
                Ok(status) if status.is_pending() => {
                    tracing::debug!(%token, attempt, "submission still pending");
                    if attempt < self.max_poll_attempts {
                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => return ExecutionResult::error(CANCELLED_MESSAGE),
                            _ = tokio::time::sleep(self.poll_interval) => {}
                        }
                    }
                }
                Ok(status) => {
                    tracing::info!(%token, attempt, status_id = ?status.status_id(), "submission finished");
                    return ExecutionResult::from_status(token, status);
                }
                Err(e) => {
                    tracing::error!(%token, error = %e, "failed to poll submission");
                    return ExecutionResult::error(e.to_string());
                }
            }
        }

        tracing::warn!(%token, attempts = self.max_poll_attempts, "gave up waiting for submission");
        ExecutionResult::error(TIMEOUT_MESSAGE)
    }
}
