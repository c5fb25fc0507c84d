//! Advisory integration: asks an external text-generation backend for
//! improvement suggestions.
//!
//! The backend must answer with exactly one JSON object holding three
//! suggestions, two reasoning lines and an improved password. Anything else
//! is turned into a fallback [`AdvisoryResult`] whose first suggestion starts
//! with `Error:` and whose `improved_password` is the unmodified input, so the
//! caller always receives a well-formed value.

#[cfg(feature = "async")]
mod client;

#[cfg(feature = "async")]
pub use client::HttpAdvisoryClient;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::GenerationSettings;
use crate::error::{FailureKind, ServiceError};
use crate::types::{AdvisoryResult, CompositionPercentages, PasswordFeatures, StrengthResult};

pub const SUGGESTION_COUNT: usize = 3;
pub const REASONING_COUNT: usize = 2;

/// Crack times on the reference hardware classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareCrackTimes {
    pub cpu: String,
    pub gpu: String,
    pub high_end_gpu: String,
}

/// Fixed-shape summary of the local analysis sent along with the prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryContext {
    pub score: u8,
    pub entropy_bits: f64,
    pub length: usize,
    pub composition: CompositionPercentages,
    pub brute_force: String,
    pub smart_guess: String,
    pub hardware: HardwareCrackTimes,
}

impl AdvisoryContext {
    pub fn build(features: &PasswordFeatures, strength: &StrengthResult) -> Self {
        let times = &features.crack_times;
        Self {
            score: strength.score,
            entropy_bits: (features.entropy_bits * 100.0).round() / 100.0,
            length: features.composition.total,
            composition: features.composition.percentages(),
            brute_force: times.brute_force.display.clone(),
            smart_guess: times.smart_guess.display.clone(),
            hardware: HardwareCrackTimes {
                cpu: times.cpu.display.clone(),
                gpu: times.gpu.display.clone(),
                high_end_gpu: times.high_end_gpu.display.clone(),
            },
        }
    }
}

/// Renders the prompt sent to the backend.
pub fn build_prompt(password: &SecretString, context: &AdvisoryContext) -> String {
    let context_json =
        serde_json::to_string_pretty(context).unwrap_or_else(|_| "{}".to_string());
    format!(
        r#"You are a password security advisor. Analyze the password below using the measured metrics and help the user make it stronger.

PASSWORD: {password}

METRICS (JSON):
{context_json}

Respond with ONLY one JSON object, no markdown, matching exactly:
{{
  "suggestions": ["<suggestion 1>", "<suggestion 2>", "<suggestion 3>"],
  "reasoning": ["<why the password is weak or strong>", "<how the suggestions help>"],
  "improvedPassword": "<a stronger variant that keeps the password memorable>"
}}
"suggestions" must contain exactly {SUGGESTION_COUNT} strings and "reasoning" exactly {REASONING_COUNT} strings."#,
        password = password.expose_secret(),
    )
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

/// Body of `POST /ollama/generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    pub fn new(prompt: String, settings: &GenerationSettings) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: settings.temperature,
                top_k: settings.top_k,
                top_p: settings.top_p,
                max_output_tokens: settings.max_output_tokens,
                response_mime_type: "application/json".to_string(),
            },
        }
    }
}

/// Validates a backend response body against the advisory contract.
pub fn parse_advice(raw: &str) -> Result<AdvisoryResult, ServiceError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| ServiceError::shape(format!("response is not valid JSON ({e})")))?;
    let object = value
        .as_object()
        .ok_or_else(|| ServiceError::shape("response is not a JSON object"))?;

    let suggestions = string_array::<SUGGESTION_COUNT>(object, "suggestions")?;
    let reasoning = string_array::<REASONING_COUNT>(object, "reasoning")?;
    let improved_password = object
        .get("improvedPassword")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServiceError::shape("\"improvedPassword\" must be a non-empty string"))?
        .to_string();

    Ok(AdvisoryResult {
        suggestions,
        reasoning,
        improved_password,
        fallback: None,
    })
}

fn string_array<const N: usize>(object: &Map<String, Value>, key: &str) -> Result<[String; N], ServiceError> {
    let items = object
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| ServiceError::shape(format!("\"{key}\" must be an array")))?;

    let strings: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if strings.len() != items.len() {
        return Err(ServiceError::shape(format!(
            "\"{key}\" must only contain non-empty strings"
        )));
    }

    let found = strings.len();
    strings.try_into().map_err(|_| {
        ServiceError::shape(format!("\"{key}\" must have exactly {N} entries, got {found}"))
    })
}

/// Well-formed stand-in returned when the backend could not be used.
pub fn fallback_advice(error: &ServiceError, password: &SecretString) -> AdvisoryResult {
    let hint = match error.kind() {
        FailureKind::Transport => "Check that the advisory service is running and reachable.",
        FailureKind::Upstream => "The advisory service is having trouble; try again shortly.",
        FailureKind::ContentShape => "The AI answer was malformed; editing the password retries it.",
    };
    AdvisoryResult {
        suggestions: [
            format!("Error: {error}"),
            hint.to_string(),
            "The local strength feedback is still accurate.".to_string(),
        ],
        reasoning: [
            "AI-generated advice is unavailable for this password right now.".to_string(),
            "The improved password shown is your original input, not an AI suggestion.".to_string(),
        ],
        improved_password: password.expose_secret().to_string(),
        fallback: Some(error.kind()),
    }
}

/// A source of improvement advice. Implementations never fail: errors are
/// folded into [`fallback_advice`].
#[cfg(feature = "async")]
#[async_trait::async_trait]
pub trait AdvisoryService: Send + Sync {
    async fn advise(
        &self,
        password: &SecretString,
        features: &PasswordFeatures,
        strength: &StrengthResult,
    ) -> AdvisoryResult;
}
