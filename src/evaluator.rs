//! Password strength classifier - maps extracted features to a level, a score
//! and ordered feedback.

use secrecy::SecretString;

use crate::sections::composition::missing_classes;
use crate::sections::extract_features;
use crate::types::{CrackTimeBucket, PasswordFeatures, StrengthResult};

const MAX_STRENGTH: u8 = 4;
/// Upper bounds (exclusive) of the entropy bins for levels 0..=3.
const ENTROPY_BINS: [f64; 4] = [20.0, 40.0, 60.0, 80.0];

const COMMON_PATTERN_LEVEL_PENALTY: u8 = 2;
const SEQUENTIAL_LEVEL_PENALTY: u8 = 1;
const REPEATED_LEVEL_PENALTY: u8 = 1;

const COMMON_PATTERN_SCORE_PENALTY: i64 = 30;
const SEQUENTIAL_SCORE_PENALTY: i64 = 15;
const REPEATED_SCORE_PENALTY: i64 = 15;

const MIN_LENGTH: usize = 8;
const RECOMMENDED_LENGTH: usize = 12;
const MAX_FEEDBACK: usize = 5;
const MIN_FEEDBACK: usize = 2;

const GENERIC_ADVICE: [&str; 2] = [
    "Use a unique password for every account.",
    "Consider a password manager to generate and store passwords.",
];

/// Extracts the features of the password and classifies them.
pub fn evaluate_password_strength(password: &SecretString) -> StrengthResult {
    classify(&extract_features(password))
}

/// Classifies already extracted features. Deterministic.
pub fn classify(features: &PasswordFeatures) -> StrengthResult {
    if features.is_empty() {
        return StrengthResult::empty();
    }

    StrengthResult {
        strength: strength_level(features),
        score: score(features),
        entropy_bits: features.entropy_bits,
        time_to_hack: features.crack_times.brute_force.display.clone(),
        time_to_hack_smart: features.crack_times.smart_guess.display.clone(),
        feedback: feedback(features),
        has_common_patterns: features.has_common_patterns,
        has_sequential_chars: features.has_sequential_chars,
        has_repeated_chars: features.has_repeated_chars,
    }
}

fn entropy_level(entropy_bits: f64) -> u8 {
    ENTROPY_BINS
        .iter()
        .position(|&bound| entropy_bits < bound)
        .map(|level| level as u8)
        .unwrap_or(MAX_STRENGTH)
}

fn strength_level(features: &PasswordFeatures) -> u8 {
    let penalties = [
        (features.has_common_patterns, COMMON_PATTERN_LEVEL_PENALTY),
        (features.has_sequential_chars, SEQUENTIAL_LEVEL_PENALTY),
        (features.has_repeated_chars, REPEATED_LEVEL_PENALTY),
    ];
    penalties
        .iter()
        .filter(|(flagged, _)| *flagged)
        .fold(entropy_level(features.entropy_bits), |level, (_, penalty)| {
            level.saturating_sub(*penalty)
        })
        .min(MAX_STRENGTH)
}

fn score(features: &PasswordFeatures) -> u8 {
    let mut score = features.entropy_bits.min(100.0).round() as i64;
    if features.has_common_patterns {
        score -= COMMON_PATTERN_SCORE_PENALTY;
    }
    if features.has_sequential_chars {
        score -= SEQUENTIAL_SCORE_PENALTY;
    }
    if features.has_repeated_chars {
        score -= REPEATED_SCORE_PENALTY;
    }
    score.clamp(0, 100) as u8
}

fn feedback(features: &PasswordFeatures) -> Vec<String> {
    let stats = &features.composition;
    let smart = &features.crack_times.smart_guess;
    let mut lines = Vec::new();

    if stats.total < MIN_LENGTH {
        lines.push(format!(
            "Password is too short: use at least {} characters.",
            RECOMMENDED_LENGTH
        ));
    } else if stats.total < RECOMMENDED_LENGTH {
        lines.push(format!(
            "Consider lengthening it to {} or more characters.",
            RECOMMENDED_LENGTH
        ));
    }
    for class in missing_classes(stats) {
        lines.push(format!("Add {class}."));
    }
    if features.has_common_patterns {
        lines.push("Avoid common words and well-known passwords.".to_string());
    }
    if features.has_sequential_chars {
        lines.push("Avoid sequences like 'abcd' or '4321'.".to_string());
    }
    if features.has_repeated_chars {
        lines.push("Avoid repeating the same character, like 'aaa'.".to_string());
    }
    if smart.bucket <= CrackTimeBucket::Hours {
        lines.push(if smart.bucket == CrackTimeBucket::Instant {
            "Smart guessing attacks would crack this instantly.".to_string()
        } else {
            format!("Smart guessing attacks could crack this in {}.", smart.display)
        });
    }

    lines.truncate(MAX_FEEDBACK);
    if lines.is_empty() {
        lines.push("Great! No obvious weaknesses found.".to_string());
    }
    for advice in GENERIC_ADVICE {
        if lines.len() >= MIN_FEEDBACK {
            break;
        }
        lines.push(advice.to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::crack_times;
    use crate::types::CompositionStats;

    fn evaluate(pwd: &str) -> StrengthResult {
        evaluate_password_strength(&SecretString::new(pwd.to_string().into()))
    }

    fn features_with(entropy_bits: f64, common: bool, sequential: bool, repeated: bool) -> PasswordFeatures {
        PasswordFeatures {
            composition: CompositionStats {
                total: 16,
                uppercase: 4,
                lowercase: 4,
                numbers: 4,
                symbols: 4,
                other: 0,
            },
            entropy_bits,
            has_common_patterns: common,
            has_sequential_chars: sequential,
            has_repeated_chars: repeated,
            crack_times: crack_times(entropy_bits, common, sequential, repeated),
        }
    }

    #[test]
    fn test_entropy_bins() {
        assert_eq!(entropy_level(0.0), 0);
        assert_eq!(entropy_level(19.9), 0);
        assert_eq!(entropy_level(20.0), 1);
        assert_eq!(entropy_level(59.9), 2);
        assert_eq!(entropy_level(79.9), 3);
        assert_eq!(entropy_level(80.0), 4);
        assert_eq!(entropy_level(400.0), 4);
    }

    #[test]
    fn test_penalties_never_increase_strength() {
        for bits in [0.0, 15.0, 25.0, 45.0, 65.0, 85.0, 150.0] {
            let base = strength_level(&features_with(bits, false, false, false));
            for (c, s, r) in [
                (true, false, false),
                (false, true, false),
                (false, false, true),
                (true, true, false),
                (true, false, true),
                (false, true, true),
                (true, true, true),
            ] {
                let penalized = strength_level(&features_with(bits, c, s, r));
                assert!(penalized <= base, "bits {bits}: {penalized} > {base}");
                // adding one more flag never helps either
                let more = strength_level(&features_with(bits, true, s, r));
                assert!(more <= penalized);
            }
        }
    }

    #[test]
    fn test_score_deductions() {
        assert_eq!(score(&features_with(72.4, false, false, false)), 72);
        assert_eq!(score(&features_with(72.4, true, false, false)), 42);
        assert_eq!(score(&features_with(72.4, true, true, true)), 12);
        assert_eq!(score(&features_with(20.0, true, true, true)), 0);
        assert_eq!(score(&features_with(180.0, false, false, false)), 100);
    }

    #[test]
    fn test_evaluate_common_password() {
        let result = evaluate("password");
        assert_eq!(result.strength, 0);
        assert!(result.has_common_patterns);
        assert!(result.feedback.iter().any(|l| l.contains("common")));
    }

    #[test]
    fn test_evaluate_strong_password() {
        let result = evaluate("Tr0ub4dor&9Zx!");
        assert!(result.strength >= 3);
        assert!(!result.has_common_patterns);
        assert!(result.score > 80);
    }

    #[test]
    fn test_evaluate_empty_password() {
        let result = evaluate("");
        assert_eq!(result, StrengthResult::empty());
        assert_eq!(result.feedback.len(), 1);
        assert_eq!(result.time_to_hack, "N/A");
        assert_eq!(result.time_to_hack_smart, "N/A");
    }

    #[test]
    fn test_feedback_is_capped() {
        let result = evaluate("aaa");
        assert_eq!(result.feedback.len(), MAX_FEEDBACK);
        assert!(result.feedback[0].contains("too short"));
    }

    #[test]
    fn test_feedback_is_padded() {
        let result = evaluate("Xq7#mW2$vL9!pR4&zK");
        assert!(result.feedback.len() >= MIN_FEEDBACK);
        assert_eq!(result.feedback[0], "Great! No obvious weaknesses found.");
        assert_eq!(result.feedback[1], GENERIC_ADVICE[0]);
    }

    #[test]
    fn test_single_condition_gets_one_generic_line() {
        // 11 chars, all classes, no patterns: only the length hint fires
        let result = evaluate("Xq7#mW2$vL9");
        assert_eq!(result.feedback.len(), MIN_FEEDBACK);
        assert!(result.feedback[0].contains("lengthening"));
        assert_eq!(result.feedback[1], GENERIC_ADVICE[0]);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        for pwd in ["", "a", "password", "MyPass123!", "VeryStrongPassword123!@#"] {
            assert_eq!(evaluate(pwd), evaluate(pwd));
        }
    }

    #[test]
    fn test_score_boundaries() {
        for pwd in ["", "a", "password", "MyPass123!", "VeryStrongPassword123!@#", "ü😀"] {
            let result = evaluate(pwd);
            assert!(result.score <= 100);
            assert!(result.strength <= MAX_STRENGTH);
            assert!(!result.feedback.is_empty() && result.feedback.len() <= MAX_FEEDBACK);
        }
    }
}
