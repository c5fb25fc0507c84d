//! Composition section - counts ASCII uppercase, lowercase, digits and symbols;
//! everything else is "other".

use secrecy::{ExposeSecret, SecretString};

use crate::types::CompositionStats;

/// Counts the characters of the password per class.
pub fn composition_section(password: &SecretString) -> CompositionStats {
    composition_of(password.expose_secret())
}

pub(crate) fn composition_of(pwd: &str) -> CompositionStats {
    pwd.chars().fold(CompositionStats::default(), |mut stats, c| {
        stats.total += 1;
        if c.is_ascii_uppercase() {
            stats.uppercase += 1;
        } else if c.is_ascii_lowercase() {
            stats.lowercase += 1;
        } else if c.is_ascii_digit() {
            stats.numbers += 1;
        } else if c.is_ascii_punctuation() || c == ' ' {
            stats.symbols += 1;
        } else {
            stats.other += 1;
        }
        stats
    })
}

/// Names of the four basic classes the password lacks, in display order.
pub(crate) fn missing_classes(stats: &CompositionStats) -> Vec<&'static str> {
    [
        (stats.uppercase, "uppercase letters"),
        (stats.lowercase, "lowercase letters"),
        (stats.numbers, "numbers"),
        (stats.symbols + stats.other, "symbols"),
    ]
    .into_iter()
    .filter(|(count, _)| *count == 0)
    .map(|(_, name)| name)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_counts() {
        let pwd = SecretString::new("HasAll123!@#".to_string().into());
        let stats = composition_section(&pwd);
        assert_eq!(stats.total, 12);
        assert_eq!(stats.uppercase, 2);
        assert_eq!(stats.lowercase, 4);
        assert_eq!(stats.numbers, 3);
        assert_eq!(stats.symbols, 3);
        assert_eq!(stats.other, 0);
    }

    #[test]
    fn test_composition_counts_chars_not_bytes() {
        let stats = composition_of("pässwörd€");
        assert_eq!(stats.total, 9);
        assert_eq!(stats.lowercase, 6);
        assert_eq!(stats.other, 3);
    }

    #[test]
    fn test_non_ascii_letters_are_other() {
        let stats = composition_of("ÄüЖ");
        assert_eq!(stats.uppercase, 0);
        assert_eq!(stats.lowercase, 0);
        assert_eq!(stats.other, 3);
        assert_eq!(stats.class_count(), 1);
    }

    #[test]
    fn test_space_is_a_symbol() {
        assert_eq!(composition_of("a b").symbols, 1);
    }

    #[test]
    fn test_missing_classes() {
        assert_eq!(
            missing_classes(&composition_of("lowercase123!")),
            vec!["uppercase letters"]
        );
        assert_eq!(
            missing_classes(&composition_of("UPPERCASE")),
            vec!["lowercase letters", "numbers", "symbols"]
        );
        assert!(missing_classes(&composition_of("HasAll123!")).is_empty());
    }

    #[test]
    fn test_empty_password() {
        assert_eq!(composition_of(""), CompositionStats::default());
    }
}
