//! Failure taxonomy of the network-facing collaborators.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No response reached us (connect, timeout, body read).
    #[error("Service unreachable: {0}")]
    Transport(String),
    /// Non-success status, with the upstream `detail` when the body had one.
    #[error("Service responded with HTTP {status}{}", fmt_detail(.detail))]
    Upstream { status: u16, detail: Option<String> },
    /// A response arrived but violates the expected contract.
    #[error("Unexpected response (parse-error): {0}")]
    ContentShape(String),
}

/// Which branch of [`ServiceError`] produced a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Transport,
    Upstream,
    ContentShape,
}

impl ServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ServiceError::Transport(_) => FailureKind::Transport,
            ServiceError::Upstream { .. } => FailureKind::Upstream,
            ServiceError::ContentShape(_) => FailureKind::ContentShape,
        }
    }

    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        ServiceError::ContentShape(msg.into())
    }
}

fn fmt_detail(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

/// Pulls the `detail` field out of an error body, if the body is JSON and
/// has one. Non-string details are rendered as compact JSON.
pub fn upstream_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(feature = "async")]
impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ServiceError::ContentShape(e.to_string())
        } else if let Some(status) = e.status() {
            ServiceError::Upstream {
                status: status.as_u16(),
                detail: None,
            }
        } else {
            ServiceError::Transport(e.to_string())
        }
    }
}
