use thiserror::Error;

/// Failures while turning form data into a dispatch command. Never retryable.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown bot type '{0}'")]
    UnknownBotType(String),

    #[error("failed to encode call metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Failures reported by a command executor.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("cannot reach execution backend at {endpoint}: {reason}")]
    Connectivity { endpoint: String, reason: String },

    #[error("remote execution failed with status {status}: {body}")]
    RemoteExecution { status: u16, body: String },

    #[error("invalid JSON from execution backend: {0}")]
    Json(#[from] serde_json::Error),
}
