//! Analyzer configuration.
//!
//! Every value has a default; [`AnalyzerConfig::from_env`] lets the
//! environment override them:
//!
//! | Variable | Default |
//! |---|---|
//! | `PWD_INSIGHT_API_URL` | `http://127.0.0.1:8000` |
//! | `PWD_INSIGHT_RANGE_API_URL` | `https://api.pwnedpasswords.com` |
//! | `PWD_INSIGHT_REQUEST_TIMEOUT_SECS` | `10` |
//! | `PWD_INSIGHT_ADVISORY_TIMEOUT_SECS` | `120` |
//! | `PWD_INSIGHT_REFRESH_DEBOUNCE_MS` | `200` |
//! | `PWD_INSIGHT_ADVISORY_DEBOUNCE_MS` | `600` |
//! | `PWD_INSIGHT_HEURISTIC_DEBOUNCE_MS` | `800` |
//! | `PWD_INSIGHT_ORACLE_DEBOUNCE_MS` | `300` |
//! | `PWD_INSIGHT_ADVISORY_MIN_LEN` | `6` |
//! | `PWD_INSIGHT_HEURISTIC_MIN_LEN` | `4` |
//! | `PWD_INSIGHT_ORACLE_MIN_LEN` | `1` |
//! | `PWD_INSIGHT_TEMPERATURE` | `0.7` |

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Quiet period each stage waits for after the last keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceConfig {
    pub local_refresh: Duration,
    pub advisory: Duration,
    pub breach_heuristic: Duration,
    pub exact_oracle: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            local_refresh: Duration::from_millis(200),
            advisory: Duration::from_millis(600),
            breach_heuristic: Duration::from_millis(800),
            exact_oracle: Duration::from_millis(300),
        }
    }
}

/// Minimum password length (in characters) before a stage runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageGates {
    pub advisory_min_len: usize,
    pub heuristic_min_len: usize,
    pub oracle_min_len: usize,
}

impl Default for StageGates {
    fn default() -> Self {
        Self {
            advisory_min_len: 6,
            heuristic_min_len: 4,
            oracle_min_len: 1,
        }
    }
}

/// Sampling parameters forwarded to the advisory backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

/// Endpoints, timeouts and stage timing of the analyzer.
///
/// # Example
///
/// ```rust,ignore
/// let config = AnalyzerConfig {
///     api_base_url: "https://analyzer.example.com".to_string(),
///     ..AnalyzerConfig::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Base URL of the backend hosting `/hibp`, `/ollama` and `/hashcat`.
    pub api_base_url: String,
    /// Base URL of a k-anonymity range API.
    pub range_api_url: String,
    pub request_timeout: Duration,
    pub advisory_timeout: Duration,
    pub debounce: DebounceConfig,
    pub gates: StageGates,
    pub generation: GenerationSettings,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            range_api_url: "https://api.pwnedpasswords.com".to_string(),
            request_timeout: Duration::from_secs(10),
            advisory_timeout: Duration::from_secs(120),
            debounce: DebounceConfig::default(),
            gates: StageGates::default(),
            generation: GenerationSettings::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Builds the configuration from defaults and environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but does not
    /// parse, or if a URL variable lacks an `http://` or `https://` scheme.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let ms = |key, default: Duration| env_parse(key, default.as_millis() as u64).map(Duration::from_millis);
        let secs = |key, default: Duration| env_parse(key, default.as_secs()).map(Duration::from_secs);

        let config = Self {
            api_base_url: env_url("PWD_INSIGHT_API_URL", defaults.api_base_url)?,
            range_api_url: env_url("PWD_INSIGHT_RANGE_API_URL", defaults.range_api_url)?,
            request_timeout: secs("PWD_INSIGHT_REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
            advisory_timeout: secs("PWD_INSIGHT_ADVISORY_TIMEOUT_SECS", defaults.advisory_timeout)?,
            debounce: DebounceConfig {
                local_refresh: ms("PWD_INSIGHT_REFRESH_DEBOUNCE_MS", defaults.debounce.local_refresh)?,
                advisory: ms("PWD_INSIGHT_ADVISORY_DEBOUNCE_MS", defaults.debounce.advisory)?,
                breach_heuristic: ms("PWD_INSIGHT_HEURISTIC_DEBOUNCE_MS", defaults.debounce.breach_heuristic)?,
                exact_oracle: ms("PWD_INSIGHT_ORACLE_DEBOUNCE_MS", defaults.debounce.exact_oracle)?,
            },
            gates: StageGates {
                advisory_min_len: env_parse("PWD_INSIGHT_ADVISORY_MIN_LEN", defaults.gates.advisory_min_len)?,
                heuristic_min_len: env_parse("PWD_INSIGHT_HEURISTIC_MIN_LEN", defaults.gates.heuristic_min_len)?,
                oracle_min_len: env_parse("PWD_INSIGHT_ORACLE_MIN_LEN", defaults.gates.oracle_min_len)?.max(1),
            },
            generation: GenerationSettings {
                temperature: env_parse("PWD_INSIGHT_TEMPERATURE", defaults.generation.temperature)?,
                ..defaults.generation
            },
        };

        #[cfg(feature = "tracing")]
        tracing::info!("Analyzer config loaded: api={} debounce={:?}", config.api_base_url, config.debounce);

        Ok(config)
    }

    /// Joins the API base URL and a path without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.api_base_url, path)
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn env_parse<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn env_url(key: &'static str, default: String) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if raw.starts_with("http://") || raw.starts_with("https://") => Ok(raw),
        Ok(raw) => Err(ConfigError::InvalidValue { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_env(key: &str, value: &str) {
        // SAFETY: env-touching tests are serialized
        unsafe { std::env::set_var(key, value); }
    }

    fn remove_env(key: &str) {
        // SAFETY: env-touching tests are serialized
        unsafe { std::env::remove_var(key); }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        remove_env("PWD_INSIGHT_API_URL");
        remove_env("PWD_INSIGHT_ADVISORY_DEBOUNCE_MS");
        assert_eq!(AnalyzerConfig::from_env().unwrap(), AnalyzerConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        set_env("PWD_INSIGHT_API_URL", "https://analyzer.internal:9000/");
        set_env("PWD_INSIGHT_ADVISORY_DEBOUNCE_MS", "750");
        set_env("PWD_INSIGHT_ORACLE_MIN_LEN", "0");

        let config = AnalyzerConfig::from_env().unwrap();
        assert_eq!(config.debounce.advisory, Duration::from_millis(750));
        assert_eq!(config.gates.oracle_min_len, 1);
        assert_eq!(
            config.endpoint("/hibp/check-password/"),
            "https://analyzer.internal:9000/hibp/check-password/"
        );

        remove_env("PWD_INSIGHT_API_URL");
        remove_env("PWD_INSIGHT_ADVISORY_DEBOUNCE_MS");
        remove_env("PWD_INSIGHT_ORACLE_MIN_LEN");
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_number() {
        set_env("PWD_INSIGHT_HEURISTIC_DEBOUNCE_MS", "soon");
        let result = AnalyzerConfig::from_env();
        assert_eq!(
            result,
            Err(ConfigError::InvalidValue {
                key: "PWD_INSIGHT_HEURISTIC_DEBOUNCE_MS",
                value: "soon".to_string()
            })
        );
        remove_env("PWD_INSIGHT_HEURISTIC_DEBOUNCE_MS");
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_url() {
        set_env("PWD_INSIGHT_API_URL", "localhost:8000");
        assert!(matches!(
            AnalyzerConfig::from_env(),
            Err(ConfigError::InvalidValue { key: "PWD_INSIGHT_API_URL", .. })
        ));
        remove_env("PWD_INSIGHT_API_URL");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://a/", "/b"), "http://a/b");
        assert_eq!(join_url("http://a", "b"), "http://a/b");
    }
}
