//! Real-time password risk feedback
//!
//! This library analyses a password while it is being typed: a local
//! strength classifier, a deterministic breach-likelihood heuristic, an
//! exact-match breach oracle and an advisory text-generation service, driven
//! by a debounced orchestrator that never lets a stale result overwrite a
//! fresher one.
//!
//! # Features
//!
//! - `async` (default): Enables the orchestrator and the HTTP collaborators
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_BLACKLIST_PATH`: Custom path to an extended common-password list
//!   (default: `./assets/blacklist.txt`)
//! - `PWD_INSIGHT_*`: see [`AnalyzerConfig`]
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_insight::{assess_breach_likelihood, evaluate_password_strength};
//! use secrecy::SecretString;
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//!
//! let strength = evaluate_password_strength(&password);
//! println!("Strength: {} ({}/100)", strength.label(), strength.score);
//!
//! let breach = assess_breach_likelihood(&password);
//! println!("Potentially breached: {}", breach.is_potentially_breached);
//! ```
//!
//! With the `async` feature, [`Orchestrator`] runs every stage per keystroke:
//!
//! ```rust,no_run
//! # #[cfg(feature = "async")]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use pwd_insight::{AnalyzerConfig, Orchestrator};
//! use secrecy::SecretString;
//!
//! let config = AnalyzerConfig::from_env()?;
//! let mut orchestrator = Orchestrator::with_http(&config)?;
//! let mut view = orchestrator.subscribe();
//!
//! orchestrator.set_password(SecretString::new("hunter2".to_string().into()));
//! while view.changed().await.is_ok() {
//!     let vm = view.borrow_and_update().clone();
//!     println!("{:?} loading={}", vm.breach_verdict(), vm.is_loading());
//! }
//! # Ok(())
//! # }
//! ```

// Internal modules
mod blacklist;
mod breach;
mod error;
mod evaluator;
mod types;
mod view;

pub mod advisory;
pub mod config;
pub mod sections;

#[cfg(feature = "async")]
mod http;
#[cfg(feature = "async")]
pub mod hashcat;
#[cfg(feature = "async")]
pub mod oracle;
#[cfg(feature = "async")]
mod orchestrator;

// Public API
pub use advisory::{fallback_advice, parse_advice, AdvisoryContext};
pub use blacklist::{
    canonicalize, contains_common_token, init_blacklist, init_blacklist_from_path,
    is_blacklisted, is_common_password, BlacklistError,
};
pub use breach::assess_breach_likelihood;
pub use config::{AnalyzerConfig, ConfigError};
pub use error::{FailureKind, ServiceError};
pub use evaluator::{classify, evaluate_password_strength};
pub use sections::extract_features;
pub use types::{
    AdvisoryResult, BreachHeuristicResult, CompositionPercentages, CompositionStats,
    CrackEstimate, CrackTimeBucket, CrackTimes, ExactBreachResult, PasswordFeatures,
    StrengthResult,
};
pub use view::{AnalysisViewModel, BreachVerdict, StageState};

#[cfg(feature = "async")]
pub use advisory::{AdvisoryService, HttpAdvisoryClient};
#[cfg(feature = "async")]
pub use hashcat::HashcatClient;
#[cfg(feature = "async")]
pub use oracle::{BreachOracle, HttpBreachOracle, RangeBreachOracle};
#[cfg(feature = "async")]
pub use orchestrator::Orchestrator;
