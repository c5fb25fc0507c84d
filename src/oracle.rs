//! Exact-match breach oracles.
//!
//! An oracle answers "is this exact password in a breach corpus?". Its answer
//! is authoritative over the heuristic in [`crate::breach`].

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::config::{join_url, AnalyzerConfig};
use crate::error::ServiceError;
use crate::http::{build_client, read_body, read_json};
use crate::types::ExactBreachResult;

const CHECK_PATH: &str = "/hibp/check-password/";
const RANGE_CHECK_METHOD: &str = "k_anonymity_range_api";

#[async_trait]
pub trait BreachOracle: Send + Sync {
    /// One idempotent lookup. Errors mean "unknown", never "not breached".
    async fn check(&self, password: &SecretString) -> Result<ExactBreachResult, ServiceError>;
}

#[derive(Debug, Deserialize)]
struct CheckPasswordResponse {
    #[serde(default = "default_true")]
    password_provided: bool,
    check_method: String,
    pwned: bool,
    status_message: String,
}

fn default_true() -> bool {
    true
}

/// Client of the backend's `GET /hibp/check-password/` endpoint.
#[derive(Clone)]
pub struct HttpBreachOracle {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBreachOracle {
    /// Builds a client for `{api_base_url}/hibp/check-password/`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(config.request_timeout)?,
            endpoint: config.endpoint(CHECK_PATH),
        })
    }
}

#[async_trait]
impl BreachOracle for HttpBreachOracle {
    async fn check(&self, password: &SecretString) -> Result<ExactBreachResult, ServiceError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("password", password.expose_secret())])
            .send()
            .await?;

        let body: CheckPasswordResponse = read_json(resp).await?;
        if !body.password_provided {
            return Err(ServiceError::shape("oracle reports no password was provided"));
        }
        Ok(ExactBreachResult {
            pwned: body.pwned,
            check_method: body.check_method,
            status_message: body.status_message,
        })
    }
}

/// k-anonymity lookup against a Pwned Passwords style range API: only the
/// first five hex digits of the SHA-1 hash leave the process.
#[derive(Clone)]
pub struct RangeBreachOracle {
    client: reqwest::Client,
    base_url: String,
}

impl RangeBreachOracle {
    /// Builds a client for the range API at [`AnalyzerConfig::range_api_url`].
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(config.request_timeout)?,
            base_url: config.range_api_url.clone(),
        })
    }
}

#[async_trait]
impl BreachOracle for RangeBreachOracle {
    async fn check(&self, password: &SecretString) -> Result<ExactBreachResult, ServiceError> {
        let (prefix, suffix) = range_key(password);
        let url = join_url(&self.base_url, &format!("range/{prefix}"));

        let resp = self
            .client
            .get(&url)
            .header("Add-Padding", "true")
            .send()
            .await?;

        let count = suffix_count(&read_body(resp).await?, &suffix)?;
        let pwned = count > 0;
        Ok(ExactBreachResult {
            pwned,
            check_method: RANGE_CHECK_METHOD.to_string(),
            status_message: if pwned {
                format!("password_found_in_range_response ({count} occurrences)")
            } else {
                "password_not_found_in_range_response".to_string()
            },
        })
    }
}

/// Uppercase SHA-1 hex split into the 5-character prefix sent to the server
/// and the suffix matched locally.
pub(crate) fn range_key(password: &SecretString) -> (String, String) {
    let hash = data_encoding::HEXUPPER.encode(Sha1::digest(password.expose_secret().as_bytes()).as_slice());
    let (prefix, suffix) = hash.split_at(5);
    (prefix.to_string(), suffix.to_string())
}

/// Finds `suffix` in a `SUFFIX:COUNT` listing. Padding entries have a count of 0.
pub(crate) fn suffix_count(body: &str, suffix: &str) -> Result<u64, ServiceError> {
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (line_suffix, count) = line
            .split_once(':')
            .ok_or_else(|| ServiceError::shape("failed to parse range response"))?;
        if line_suffix.eq_ignore_ascii_case(suffix) {
            return count
                .trim()
                .parse::<u64>()
                .map_err(|_| ServiceError::shape("failed to parse range response count"));
        }
    }
    Ok(0)
}
