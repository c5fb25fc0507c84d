//! HTTP client for `POST /ollama/generateContent`.

use async_trait::async_trait;
use secrecy::SecretString;

use super::{
    build_prompt, fallback_advice, parse_advice, AdvisoryContext, AdvisoryService,
    GenerateContentRequest,
};
use crate::config::{AnalyzerConfig, GenerationSettings};
use crate::error::ServiceError;
use crate::http::{build_client, read_body};
use crate::types::{AdvisoryResult, PasswordFeatures, StrengthResult};

const GENERATE_PATH: &str = "/ollama/generateContent";

/// [`AdvisoryService`] backed by the `/ollama/generateContent` endpoint of the
/// analysis backend. Uses [`AnalyzerConfig::advisory_timeout`], since text
/// generation is slow.
#[derive(Clone)]
pub struct HttpAdvisoryClient {
    client: reqwest::Client,
    endpoint: String,
    generation: GenerationSettings,
}

impl HttpAdvisoryClient {
    /// Builds a client for `{api_base_url}/ollama/generateContent`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_client(config.advisory_timeout)?,
            endpoint: config.endpoint(GENERATE_PATH),
            generation: config.generation.clone(),
        })
    }

    /// Sends one prompt and validates the answer. Errors are not folded
    /// into a fallback here; see [`AdvisoryService::advise`].
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Transport`] if no response arrives
    /// - [`ServiceError::Upstream`] on a non-success status
    /// - [`ServiceError::ContentShape`] if the body breaks the advice contract
    pub async fn request_advice(&self, prompt: String) -> Result<AdvisoryResult, ServiceError> {
        let body = GenerateContentRequest::new(prompt, &self.generation);
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?;
        parse_advice(&read_body(resp).await?)
    }
}

#[async_trait]
impl AdvisoryService for HttpAdvisoryClient {
    async fn advise(
        &self,
        password: &SecretString,
        features: &PasswordFeatures,
        strength: &StrengthResult,
    ) -> AdvisoryResult {
        let context = AdvisoryContext::build(features, strength);
        match self.request_advice(build_prompt(password, &context)).await {
            Ok(advice) => advice,
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("advisory request failed, using fallback: {}", error);
                fallback_advice(&error, password)
            }
        }
    }
}
