//! Observable analysis state.

use serde::Serialize;

use crate::types::{
    AdvisoryResult, BreachHeuristicResult, CompositionStats, ExactBreachResult, StrengthResult,
};

/// Result and flags of one analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageState<T> {
    pub result: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for StageState<T> {
    fn default() -> Self {
        Self {
            result: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> StageState<T> {
    pub fn ready(result: T) -> Self {
        Self {
            result: Some(result),
            loading: false,
            error: None,
        }
    }

    /// Scheduled for the current snapshot, no result yet.
    pub fn pending() -> Self {
        Self {
            result: None,
            loading: true,
            error: None,
        }
    }

    pub(crate) fn resolve(&mut self, result: T) {
        *self = Self::ready(result);
    }

    pub(crate) fn fail(&mut self, error: impl Into<String>) {
        self.result = None;
        self.loading = false;
        self.error = Some(error.into());
    }
}

/// Everything a UI needs to render the analysis of the current password.
///
/// `generation` identifies the password snapshot the state belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisViewModel {
    pub generation: u64,
    pub composition: CompositionStats,
    pub strength: StageState<StrengthResult>,
    pub breach_heuristic: StageState<BreachHeuristicResult>,
    pub exact_breach: StageState<ExactBreachResult>,
    pub advisory: StageState<AdvisoryResult>,
}

impl Default for AnalysisViewModel {
    fn default() -> Self {
        Self::cleared(0)
    }
}

/// Breach status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachVerdict {
    /// The exact oracle found the password.
    Confirmed,
    /// The exact oracle did not find the password.
    ConfirmedClear,
    /// No oracle answer; the heuristic flags the password.
    Suspected,
    /// No oracle answer; the heuristic does not flag the password.
    Unlikely,
    Unknown,
}

impl AnalysisViewModel {
    /// Zero-state for an empty password.
    pub fn cleared(generation: u64) -> Self {
        Self {
            generation,
            composition: CompositionStats::default(),
            strength: StageState::ready(StrengthResult::empty()),
            breach_heuristic: StageState::ready(BreachHeuristicResult::default()),
            exact_breach: StageState::default(),
            advisory: StageState::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.strength.loading
            || self.breach_heuristic.loading
            || self.exact_breach.loading
            || self.advisory.loading
    }

    /// The exact oracle wins over the heuristic whenever it has answered.
    pub fn breach_verdict(&self) -> BreachVerdict {
        if let Some(exact) = &self.exact_breach.result {
            return if exact.pwned {
                BreachVerdict::Confirmed
            } else {
                BreachVerdict::ConfirmedClear
            };
        }
        match &self.breach_heuristic.result {
            Some(h) if h.is_potentially_breached => BreachVerdict::Suspected,
            Some(h) if h.confidence > 0 => BreachVerdict::Unlikely,
            _ => BreachVerdict::Unknown,
        }
    }
}
