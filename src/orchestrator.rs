//! Debounced, multi-stage analysis of the password being typed.
//!
//! Every call to [`Orchestrator::set_password`] installs a new snapshot with a
//! fresh generation number. The composition and a local strength estimate are
//! published immediately; four stages then run on their own debounce timers:
//!
//! | Stage | Default debounce | Gate |
//! |---|---|---|
//! | local strength refresh | 200 ms | none |
//! | advisory | 600 ms | length >= 6 |
//! | breach heuristic | 800 ms | length >= 4 |
//! | exact oracle | 300 ms | length >= 1 |
//!
//! Installing a snapshot cancels the timers and requests of the previous one.
//! A stage writes its outcome only if its generation is still the published
//! one, so results that complete out of order are dropped.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::advisory::{AdvisoryService, HttpAdvisoryClient};
use crate::breach::assess_breach_likelihood;
use crate::config::{AnalyzerConfig, DebounceConfig, StageGates};
use crate::error::ServiceError;
use crate::evaluator::{classify, evaluate_password_strength};
use crate::oracle::{BreachOracle, HttpBreachOracle};
use crate::sections::extract_features;
use crate::types::{BreachHeuristicResult, PasswordFeatures, StrengthResult};
use crate::view::{AnalysisViewModel, StageState};

const NO_RUNTIME: &str = "No async runtime available to run this stage";

/// Drives the analysis stages of one password input.
///
/// Stage tasks run on the tokio runtime captured at construction (or given
/// through [`Orchestrator::with_runtime`]), so [`Orchestrator::set_password`]
/// can be called from a thread outside the runtime, such as a UI thread.
/// Without a runtime the local strength estimate is still published and the
/// asynchronous stages report an error.
///
/// # Example
///
/// ```rust,ignore
/// let runtime = tokio::runtime::Runtime::new()?;
/// let mut orchestrator = Orchestrator::with_http(&AnalyzerConfig::from_env()?)?
///     .with_runtime(runtime.handle().clone());
/// orchestrator.set_password(SecretString::new("hunter2".into()));
/// println!("{:?}", orchestrator.view().strength.result);
/// ```
pub struct Orchestrator {
    runtime: Option<Handle>,
    debounce: DebounceConfig,
    gates: StageGates,
    advisory: Arc<dyn AdvisoryService>,
    oracle: Arc<dyn BreachOracle>,
    state: Arc<watch::Sender<AnalysisViewModel>>,
    generation: u64,
    token: CancellationToken,
}

impl Orchestrator {
    /// Captures the current tokio runtime, if any.
    pub fn new(
        config: &AnalyzerConfig,
        advisory: Arc<dyn AdvisoryService>,
        oracle: Arc<dyn BreachOracle>,
    ) -> Self {
        let (state, _) = watch::channel(AnalysisViewModel::default());
        Self {
            runtime: Handle::try_current().ok(),
            debounce: config.debounce.clone(),
            gates: config.gates.clone(),
            advisory,
            oracle,
            state: Arc::new(state),
            generation: 0,
            token: CancellationToken::new(),
        }
    }

    /// Wires the HTTP advisory client and the backend breach oracle.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Transport`] if an HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn with_http(config: &AnalyzerConfig) -> Result<Self, ServiceError> {
        let advisory = Arc::new(HttpAdvisoryClient::new(config)?);
        let oracle = Arc::new(HttpBreachOracle::new(config)?);
        Ok(Self::new(config, advisory, oracle))
    }

    /// Runs stage tasks on `runtime` instead of the one captured by [`Orchestrator::new`].
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalysisViewModel> {
        self.state.subscribe()
    }

    /// Snapshot of the current view model.
    pub fn view(&self) -> AnalysisViewModel {
        self.state.borrow().clone()
    }

    /// Installs a new password snapshot and schedules its analysis.
    pub fn set_password(&mut self, password: SecretString) {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.generation += 1;
        let generation = self.generation;

        if password.expose_secret().is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!("generation {}: empty password, resetting", generation);
            self.state.send_replace(AnalysisViewModel::cleared(generation));
            return;
        }

        let features = extract_features(&password);
        let strength = classify(&features);
        let length = features.composition.total;
        let run_advisory = length >= self.gates.advisory_min_len;
        let run_heuristic = length >= self.gates.heuristic_min_len;
        let run_oracle = length >= self.gates.oracle_min_len;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "generation {}: len={} advisory={} heuristic={} oracle={}",
            generation,
            length,
            run_advisory,
            run_heuristic,
            run_oracle
        );

        self.state.send_replace(AnalysisViewModel {
            generation,
            composition: features.composition,
            strength: StageState::ready(strength.clone()),
            breach_heuristic: if run_heuristic {
                StageState::pending()
            } else {
                StageState::ready(BreachHeuristicResult::default())
            },
            exact_breach: if run_oracle { StageState::pending() } else { StageState::default() },
            advisory: if run_advisory { StageState::pending() } else { StageState::default() },
        });

        let Some(runtime) = self.runtime.clone() else {
            #[cfg(feature = "tracing")]
            tracing::warn!("generation {}: no tokio runtime, asynchronous stages skipped", generation);
            self.state.send_modify(|vm| {
                if vm.breach_heuristic.loading {
                    vm.breach_heuristic.fail(NO_RUNTIME);
                }
                if vm.exact_breach.loading {
                    vm.exact_breach.fail(NO_RUNTIME);
                }
                if vm.advisory.loading {
                    vm.advisory.fail(NO_RUNTIME);
                }
            });
            return;
        };

        let password = Arc::new(password);
        self.spawn_refresh(&runtime, generation, password.clone());
        if run_advisory {
            self.spawn_advisory(&runtime, generation, password.clone(), features, strength);
        }
        if run_heuristic {
            self.spawn_heuristic(&runtime, generation, password.clone());
        }
        if run_oracle {
            self.spawn_oracle(&runtime, generation, password);
        }
    }

    /// Same as setting an empty password.
    pub fn clear(&mut self) {
        self.set_password(SecretString::new("".into()));
    }

    fn spawn_refresh(&self, runtime: &Handle, generation: u64, password: Arc<SecretString>) {
        let state = self.state.clone();
        let token = self.token.clone();
        let delay = self.debounce.local_refresh;
        runtime.spawn(async move {
            if !debounce(&token, delay).await {
                return;
            }
            let strength = evaluate_password_strength(&password);
            apply_if_current(&state, generation, |vm| vm.strength.resolve(strength));
        });
    }

    fn spawn_advisory(
        &self,
        runtime: &Handle,
        generation: u64,
        password: Arc<SecretString>,
        features: PasswordFeatures,
        strength: StrengthResult,
    ) {
        let state = self.state.clone();
        let token = self.token.clone();
        let service = self.advisory.clone();
        let delay = self.debounce.advisory;
        runtime.spawn(async move {
            if !debounce(&token, delay).await {
                return;
            }
            let advice = tokio::select! {
                _ = token.cancelled() => return,
                advice = service.advise(&password, &features, &strength) => advice,
            };
            apply_if_current(&state, generation, |vm| {
                vm.advisory = StageState {
                    error: advice.is_fallback().then(|| advice.suggestions[0].clone()),
                    result: Some(advice),
                    loading: false,
                };
            });
        });
    }

    fn spawn_heuristic(&self, runtime: &Handle, generation: u64, password: Arc<SecretString>) {
        let state = self.state.clone();
        let token = self.token.clone();
        let delay = self.debounce.breach_heuristic;
        runtime.spawn(async move {
            if !debounce(&token, delay).await {
                return;
            }
            let result = assess_breach_likelihood(&password);
            apply_if_current(&state, generation, |vm| vm.breach_heuristic.resolve(result));
        });
    }

    fn spawn_oracle(&self, runtime: &Handle, generation: u64, password: Arc<SecretString>) {
        let state = self.state.clone();
        let token = self.token.clone();
        let oracle = self.oracle.clone();
        let delay = self.debounce.exact_oracle;
        runtime.spawn(async move {
            if !debounce(&token, delay).await {
                return;
            }
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                outcome = oracle.check(&password) => outcome,
            };
            apply_if_current(&state, generation, |vm| match outcome {
                Ok(result) => vm.exact_breach.resolve(result),
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("exact breach check failed: {}", e);
                    vm.exact_breach.fail(e.to_string());
                }
            });
        });
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Waits out the debounce window. Returns `false` if the snapshot was
/// replaced in the meantime.
async fn debounce(token: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

/// Applies `update` only if `generation` is still the published snapshot.
/// The check and the write happen under the channel's lock.
fn apply_if_current(
    state: &watch::Sender<AnalysisViewModel>,
    generation: u64,
    update: impl FnOnce(&mut AnalysisViewModel),
) -> bool {
    state.send_if_modified(|vm| {
        if vm.generation != generation {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "discarding stale result of generation {} (current {})",
                generation,
                vm.generation
            );
            return false;
        }
        update(vm);
        true
    })
}
