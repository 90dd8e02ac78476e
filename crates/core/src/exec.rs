use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Address of the execution service. Fixed for the lifetime of the process.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/api/execute";

/// Shown for every transport failure; the underlying cause only goes to the log.
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error: Could not reach the backend server.";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecRequest<'a> {
    pub command: &'a str,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecOutcome {
    Output(String),
    Error(String),
}

impl From<ExecResponse> for ExecOutcome {
    // A non-empty `error` wins over `output`. The service sends `"error": ""`
    // for a failing command with no stderr, which reads as plain output.
    fn from(r: ExecResponse) -> Self {
        match r.error {
            Some(e) if !e.is_empty() => ExecOutcome::Error(e),
            _ => ExecOutcome::Output(r.output.unwrap_or_default()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("network: {0}")] Network(String),
    #[error("decode: {0}")] Decode(String),
    #[error("other: {0}")] Other(String),
}

#[allow(async_fn_in_trait)]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, command: &str) -> Result<ExecOutcome, ExecError>;
}
