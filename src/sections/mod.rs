//! Password feature extraction sections
//!
//! Each section measures one aspect of the password; [`extract_features`]
//! runs them in sequence and assembles the feature set consumed by the
//! strength classifier, the breach heuristic and the advisory client.

pub(crate) mod common;
pub(crate) mod composition;
pub(crate) mod entropy;
pub(crate) mod pattern;

pub use common::common_pattern_section;
pub use composition::composition_section;
pub use entropy::{
    crack_times, entropy_section, CPU_GUESSES_PER_SEC, GPU_GUESSES_PER_SEC,
    HIGH_END_GPU_GUESSES_PER_SEC,
};
pub use pattern::{pattern_analysis_section, PatternFlags};

use secrecy::SecretString;

use crate::types::{CrackTimes, PasswordFeatures};

/// Extracts every feature of the password. Pure and deterministic, apart from
/// the optional extended dictionary which is loaded once per process.
pub fn extract_features(password: &SecretString) -> PasswordFeatures {
    let composition = composition_section(password);
    if composition.total == 0 {
        return PasswordFeatures {
            crack_times: CrackTimes::not_applicable(),
            ..PasswordFeatures::default()
        };
    }

    let entropy_bits = entropy_section(&composition);
    let has_common_patterns = common_pattern_section(password);
    let PatternFlags {
        sequential,
        repeated,
    } = pattern_analysis_section(password);

    PasswordFeatures {
        composition,
        entropy_bits,
        has_common_patterns,
        has_sequential_chars: sequential,
        has_repeated_chars: repeated,
        crack_times: crack_times(entropy_bits, has_common_patterns, sequential, repeated),
    }
}
