//! Client for the backend's diagnostic `POST /hashcat/crack` endpoint.
//!
//! Submits a hash and a wordlist name for a dictionary attack and returns the
//! backend's verdict. Not part of the live-typing pipeline.

use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::error::ServiceError;
use crate::http::{build_client, read_json};

const CRACK_PATH: &str = "/hashcat/crack";

/// A dictionary attack to run against one hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrackRequest {
    /// Hash to crack, in the format hashcat expects for `hash_mode`.
    pub hash_value: String,
    /// Hashcat mode number, e.g. 0 for MD5 or 1000 for NTLM.
    pub hash_mode: u32,
    /// Wordlist file name, relative to the backend's wordlist directory.
    pub wordlist_filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrackStatus {
    Success,
    Failed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrackResponse {
    pub status: CrackStatus,
    #[serde(default)]
    pub cracked_password: Option<String>,
    pub hash_value: String,
    pub hash_mode: u32,
    pub wordlist_used: String,
    #[serde(default)]
    pub elapsed_time_seconds: Option<f64>,
    pub message: String,
    #[serde(default)]
    pub hashcat_output: Option<String>,
}

impl CrackResponse {
    pub fn is_cracked(&self) -> bool {
        self.status == CrackStatus::Success && self.cracked_password.is_some()
    }
}

/// Client of the diagnostic cracking endpoint.
///
/// # Example
///
/// ```rust,ignore
/// let client = HashcatClient::new(&AnalyzerConfig::from_env()?)?;
/// let response = client
///     .crack(&CrackRequest {
///         hash_value: "098f6bcd4621d373cade4e832627b4f6".to_string(),
///         hash_mode: 0,
///         wordlist_filename: "rockyou.txt".to_string(),
///     })
///     .await?;
/// println!("{:?}: {}", response.status, response.message);
/// ```
#[derive(Clone)]
pub struct HashcatClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HashcatClient {
    /// Cracking runs can be long, so the advisory timeout applies.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(config.advisory_timeout)?,
            endpoint: config.endpoint(CRACK_PATH),
        })
    }

    /// Submits one request and waits for the backend's verdict.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Transport`] if no response arrives
    /// - [`ServiceError::Upstream`] on a non-success status, e.g. 404 for an
    ///   unknown wordlist or 503 when hashcat is not installed
    /// - [`ServiceError::ContentShape`] if the body is not a crack response
    pub async fn crack(&self, request: &CrackRequest) -> Result<CrackResponse, ServiceError> {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "submitting crack request: mode={} wordlist={}",
            request.hash_mode,
            request.wordlist_filename
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;
        read_json(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::http::test_server::{closed_port, serve_once};

    fn client_for(base: String) -> HashcatClient {
        let config = AnalyzerConfig {
            api_base_url: base,
            ..AnalyzerConfig::default()
        };
        HashcatClient::new(&config).unwrap()
    }

    fn md5_request() -> CrackRequest {
        CrackRequest {
            hash_value: "098f6bcd4621d373cade4e832627b4f6".to_string(),
            hash_mode: 0,
            wordlist_filename: "rockyou.txt".to_string(),
        }
    }

    #[tokio::test]
    async fn test_crack_success() {
        let body = r#"{
            "status": "success",
            "cracked_password": "test",
            "hash_value": "098f6bcd4621d373cade4e832627b4f6",
            "hash_mode": 0,
            "wordlist_used": "rockyou.txt",
            "elapsed_time_seconds": 1.25,
            "message": "Password cracked successfully."
        }"#;
        let (base, captured) = serve_once("200 OK", "application/json", body.to_string()).await;

        let response = client_for(base).crack(&md5_request()).await.unwrap();
        assert!(response.is_cracked());
        assert_eq!(response.cracked_password.as_deref(), Some("test"));
        assert_eq!(response.elapsed_time_seconds, Some(1.25));
        assert_eq!(response.hashcat_output, None);

        let request = captured.await.unwrap();
        assert!(request.head.starts_with("POST /hashcat/crack"));
        let sent: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(sent["hash_mode"], 0);
        assert_eq!(sent["wordlist_filename"], "rockyou.txt");
    }

    #[tokio::test]
    async fn test_crack_exhausted() {
        let body = r#"{"status": "failed", "cracked_password": null, "hash_value": "x", "hash_mode": 1000, "wordlist_used": "small.txt", "message": "Exhausted"}"#;
        let (base, _captured) = serve_once("200 OK", "application/json", body.to_string()).await;

        let response = client_for(base).crack(&md5_request()).await.unwrap();
        assert_eq!(response.status, CrackStatus::Failed);
        assert!(!response.is_cracked());
    }

    #[tokio::test]
    async fn test_crack_missing_wordlist() {
        let body = r#"{"detail": "Wordlist file 'nope.txt' not found."}"#;
        let (base, _captured) = serve_once("404 Not Found", "application/json", body.to_string()).await;

        let err = client_for(base).crack(&md5_request()).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Upstream {
                status: 404,
                detail: Some("Wordlist file 'nope.txt' not found.".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_crack_unknown_status() {
        let body = r#"{"status": "running", "hash_value": "x", "hash_mode": 0, "wordlist_used": "a", "message": ""}"#;
        let (base, _captured) = serve_once("200 OK", "application/json", body.to_string()).await;
        let err = client_for(base).crack(&md5_request()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::ContentShape);
    }

    #[tokio::test]
    async fn test_crack_unreachable() {
        let err = client_for(closed_port().await).crack(&md5_request()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Transport);
    }
}
