//! Result types produced by the analysis stages.
//!
//! Field names serialize in camelCase so the values can be handed to a
//! presentation layer unchanged.

use serde::{Deserialize, Serialize};

use crate::error::FailureKind;

/// Character-composition counts of a password.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionStats {
    pub total: usize,
    pub uppercase: usize,
    pub lowercase: usize,
    pub numbers: usize,
    /// ASCII punctuation and space.
    pub symbols: usize,
    /// Anything else, including non-ASCII letters (cased or not), emoji and
    /// control characters.
    pub other: usize,
}

impl CompositionStats {
    /// Number of character classes present, 0..=5.
    pub fn class_count(&self) -> usize {
        [
            self.uppercase,
            self.lowercase,
            self.numbers,
            self.symbols,
            self.other,
        ]
        .iter()
        .filter(|&&n| n > 0)
        .count()
    }

    /// Share of each class in percent, rounded to one decimal.
    pub fn percentages(&self) -> CompositionPercentages {
        let pct = |n: usize| {
            if self.total == 0 {
                0.0
            } else {
                (n as f64 * 1000.0 / self.total as f64).round() / 10.0
            }
        };
        CompositionPercentages {
            uppercase: pct(self.uppercase),
            lowercase: pct(self.lowercase),
            numbers: pct(self.numbers),
            symbols: pct(self.symbols + self.other),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionPercentages {
    pub uppercase: f64,
    pub lowercase: f64,
    pub numbers: f64,
    pub symbols: f64,
}

/// Coarse bucket of a crack-time estimate, ordered from fastest to slowest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrackTimeBucket {
    #[default]
    Instant,
    Seconds,
    Minutes,
    Hours,
    Days,
    Months,
    Years,
    Centuries,
}

/// Time needed to exhaust (on average) a keyspace at a fixed guess rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrackEstimate {
    pub seconds: f64,
    pub display: String,
    pub bucket: CrackTimeBucket,
}

impl CrackEstimate {
    pub fn not_applicable() -> Self {
        Self {
            seconds: 0.0,
            display: "N/A".to_string(),
            bucket: CrackTimeBucket::Instant,
        }
    }
}

/// Crack-time estimates for the attack models the analyzer reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrackTimes {
    /// Exhaustive search over the full keyspace at the GPU rate.
    pub brute_force: CrackEstimate,
    /// Search over the pattern-reduced keyspace at the GPU rate.
    pub smart_guess: CrackEstimate,
    pub cpu: CrackEstimate,
    pub gpu: CrackEstimate,
    pub high_end_gpu: CrackEstimate,
}

impl CrackTimes {
    pub fn not_applicable() -> Self {
        Self {
            brute_force: CrackEstimate::not_applicable(),
            smart_guess: CrackEstimate::not_applicable(),
            cpu: CrackEstimate::not_applicable(),
            gpu: CrackEstimate::not_applicable(),
            high_end_gpu: CrackEstimate::not_applicable(),
        }
    }
}

/// Output of the feature extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordFeatures {
    pub composition: CompositionStats,
    pub entropy_bits: f64,
    pub has_common_patterns: bool,
    pub has_sequential_chars: bool,
    pub has_repeated_chars: bool,
    pub crack_times: CrackTimes,
}

impl PasswordFeatures {
    pub fn is_empty(&self) -> bool {
        self.composition.total == 0
    }
}

/// Strength classification of a password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthResult {
    /// 0 (very weak) to 4 (very strong).
    pub strength: u8,
    /// 0 to 100.
    pub score: u8,
    pub entropy_bits: f64,
    pub time_to_hack: String,
    pub time_to_hack_smart: String,
    pub feedback: Vec<String>,
    pub has_common_patterns: bool,
    pub has_sequential_chars: bool,
    pub has_repeated_chars: bool,
}

impl StrengthResult {
    /// Canonical zero-state for an empty password.
    pub fn empty() -> Self {
        Self {
            strength: 0,
            score: 0,
            entropy_bits: 0.0,
            time_to_hack: "N/A".to_string(),
            time_to_hack_smart: "N/A".to_string(),
            feedback: vec!["Enter a password to see how strong it is.".to_string()],
            has_common_patterns: false,
            has_sequential_chars: false,
            has_repeated_chars: false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.strength {
            0 => "Very weak",
            1 => "Weak",
            2 => "Fair",
            3 => "Strong",
            _ => "Very strong",
        }
    }
}

impl Default for StrengthResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// Heuristic resemblance to known-breached passwords.
///
/// The database and attack-method labels are illustrative: they are picked
/// deterministically from the password and do not come from a breach corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreachHeuristicResult {
    pub is_potentially_breached: bool,
    /// 0 to 100.
    pub confidence: u8,
    pub databases: Vec<String>,
    pub attack_methods: Vec<String>,
}

/// Authoritative answer of the exact-match breach oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactBreachResult {
    pub pwned: bool,
    pub check_method: String,
    pub status_message: String,
}

/// Suggestions produced by the advisory backend.
///
/// Always well-formed: a failed call still yields three suggestions and two
/// reasoning lines, with `fallback` recording why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryResult {
    pub suggestions: [String; 3],
    pub reasoning: [String; 2],
    pub improved_password: String,
    #[serde(skip)]
    pub fallback: Option<FailureKind>,
}

impl AdvisoryResult {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}
