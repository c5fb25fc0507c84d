//! Pattern analysis section - detects repetitive and sequential patterns.

use secrecy::{ExposeSecret, SecretString};

/// Minimum run of identical characters flagged as repetition.
const REPEAT_RUN: usize = 3;
/// Minimum run of consecutive code points flagged as a sequence.
const SEQUENCE_RUN: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFlags {
    pub sequential: bool,
    pub repeated: bool,
}

/// Analyzes the password for repeated ("aaa") and sequential ("abcd",
/// "4321") runs.
pub fn pattern_analysis_section(password: &SecretString) -> PatternFlags {
    let chars: Vec<char> = password.expose_secret().chars().collect();
    PatternFlags {
        sequential: has_sequential_run(&chars),
        repeated: has_repeated_run(&chars),
    }
}

fn has_repeated_run(chars: &[char]) -> bool {
    let mut run = 1;
    for pair in chars.windows(2) {
        if pair[0] == pair[1] {
            run += 1;
            if run >= REPEAT_RUN {
                return true;
            }
        } else {
            run = 1;
        }
    }
    false
}

fn has_sequential_run(chars: &[char]) -> bool {
    chars.windows(SEQUENCE_RUN).any(|window| {
        let step = |w: &[char]| w[1] as i64 - w[0] as i64;
        let first = step(&window[..2]);
        (first == 1 || first == -1) && window.windows(2).all(|w| step(w) == first)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(pwd: &str) -> PatternFlags {
        pattern_analysis_section(&SecretString::new(pwd.to_string().into()))
    }

    #[test]
    fn test_pattern_section_repetitive_chars() {
        let result = flags("aaaaBBBB1111");
        assert!(result.repeated);
        assert!(!result.sequential);
    }

    #[test]
    fn test_pattern_section_sequential_numbers() {
        assert!(flags("test1234").sequential);
        assert!(flags("test4321").sequential);
    }

    #[test]
    fn test_pattern_section_sequential_letters() {
        assert!(flags("abcdTest").sequential);
    }

    #[test]
    fn test_zigzag_is_not_a_sequence() {
        assert!(!flags("abab").sequential);
        assert!(!flags("1213").sequential);
    }

    #[test]
    fn test_pattern_section_strong_password() {
        assert_eq!(flags("RandomPass135!@#Word"), PatternFlags::default());
    }

    #[test]
    fn test_pattern_section_too_short() {
        assert_eq!(flags("ab"), PatternFlags::default());
        assert_eq!(flags(""), PatternFlags::default());
    }
}
