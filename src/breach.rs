//! Breach-likelihood heuristic.
//!
//! Estimates how closely a password resembles known-breached passwords
//! without any network call. The outcome is a deterministic function of the
//! password: a seed derived from its UTF-16 code units spreads borderline
//! passwords across the confidence range, so the same input always yields
//! the same verdict. The database and attack-method labels are illustrative
//! and must not be presented as coming from a real breach corpus.

use std::sync::LazyLock;

use secrecy::{ExposeSecret, SecretString};

use crate::blacklist::{contains_common_token, is_common_password};
use crate::sections::composition::composition_of;
use crate::sections::{entropy_section, pattern_analysis_section, PatternFlags};
use crate::types::BreachHeuristicResult;

const SHORT_LENGTH: usize = 8;
const MAX_DATABASES: usize = 3;

const BREACH_DATABASES: &[&str] = &[
    "RockYou",
    "LinkedIn",
    "Adobe",
    "MySpace",
    "Yahoo",
    "Collection #1",
    "Dropbox",
    "Canva",
    "Zynga",
    "MyFitnessPal",
    "Last.fm",
    "Dubsmash",
];

const DICTIONARY_ATTACK: &str = "Dictionary attack";
const SMART_GUESSING: &str = "Smart guessing";
const PATTERN_MATCHING: &str = "Pattern matching";
const BRUTE_FORCE: &str = "Brute force";

const ATTACK_METHODS: &[&str] = &[
    DICTIONARY_ATTACK,
    SMART_GUESSING,
    PATTERN_MATCHING,
    BRUTE_FORCE,
    "Credential stuffing",
    "Hybrid attack",
];

/// Database labels in a stable order: ascending by label length plus the
/// code of the first character, ties kept in declaration order.
static SORTED_DATABASES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut labels = BREACH_DATABASES.to_vec();
    labels.sort_by_key(|label| label.len() + label.chars().next().map_or(0, |c| c as usize));
    labels
});

/// Signals the heuristic derives from a password.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BreachSignals {
    pub exact: bool,
    pub pattern: bool,
    pub short: bool,
    pub simple: bool,
    pub sequential: bool,
    pub repeated: bool,
    pub entropy_bits: f64,
    pub seed: u64,
}

impl BreachSignals {
    pub(crate) fn from_password(pwd: &str) -> Self {
        let composition = composition_of(pwd);
        let PatternFlags {
            sequential,
            repeated,
        } = pattern_analysis_section(&SecretString::new(pwd.into()));
        Self {
            exact: is_common_password(pwd),
            pattern: contains_common_token(pwd),
            short: composition.total < SHORT_LENGTH,
            simple: composition.class_count() <= 1,
            sequential,
            repeated,
            entropy_bits: entropy_section(&composition),
            seed: seed_of(pwd),
        }
    }

    /// First matching rule in priority order.
    pub(crate) fn confidence(&self) -> f64 {
        if self.exact {
            0.95
        } else if self.pattern {
            0.80
        } else if self.short && self.simple {
            0.70
        } else if self.short {
            0.60
        } else if self.simple {
            0.50
        } else if self.sequential {
            0.40
        } else if self.repeated {
            0.30
        } else {
            (1.0 - self.entropy_bits / 100.0).clamp(0.1, 0.3)
        }
    }

    pub(crate) fn pseudo_random(&self) -> f64 {
        (self.seed % 100) as f64 / 100.0
    }
}

/// Sum of the UTF-16 code units of the password.
pub(crate) fn seed_of(pwd: &str) -> u64 {
    pwd.encode_utf16().map(u64::from).sum()
}

/// Estimates whether the password is likely to appear in breach corpora.
///
/// Empty passwords yield the default (not breached, zero confidence).
pub fn assess_breach_likelihood(password: &SecretString) -> BreachHeuristicResult {
    let pwd = password.expose_secret();
    if pwd.is_empty() {
        return BreachHeuristicResult::default();
    }

    let signals = BreachSignals::from_password(pwd);
    let confidence = signals.confidence();
    let breached = signals.exact || signals.pseudo_random() < confidence;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "breach heuristic: len={} confidence={:.2} breached={}",
        pwd.chars().count(),
        confidence,
        breached
    );

    let (databases, attack_methods) = if breached {
        (
            select_databases(confidence, signals.seed),
            select_attack_methods(&signals),
        )
    } else {
        (Vec::new(), Vec::new())
    };

    BreachHeuristicResult {
        is_potentially_breached: breached,
        confidence: (confidence * 100.0).round() as u8,
        databases,
        attack_methods,
    }
}

fn select_databases(confidence: f64, seed: u64) -> Vec<String> {
    let labels = &*SORTED_DATABASES;
    let wanted = MAX_DATABASES.min((confidence * 5.0).floor() as usize + 1);
    let start = (seed % labels.len() as u64) as usize;

    let mut picked: Vec<String> = Vec::with_capacity(wanted);
    for label in labels.iter().cycle().skip(start).take(wanted) {
        push_unique(&mut picked, label);
    }
    picked
}

fn select_attack_methods(signals: &BreachSignals) -> Vec<String> {
    let mut methods = Vec::new();
    if signals.pattern || signals.exact {
        push_unique(&mut methods, DICTIONARY_ATTACK);
        push_unique(&mut methods, SMART_GUESSING);
    }
    if signals.sequential {
        push_unique(&mut methods, PATTERN_MATCHING);
    }
    if signals.simple {
        push_unique(&mut methods, BRUTE_FORCE);
    }
    if methods.is_empty() {
        let pick = ATTACK_METHODS[(signals.seed % ATTACK_METHODS.len() as u64) as usize];
        methods.push(pick.to_string());
    }
    methods
}

fn push_unique(list: &mut Vec<String>, label: &str) {
    if !list.iter().any(|l| l == label) {
        list.push(label.to_string());
    }
}
