//! Entropy section - keyspace entropy and crack-time estimates.
//!
//! Entropy is `length × log2(pool)`, where the pool is the sum of the
//! keyspaces of the character classes present. Crack times assume the
//! attacker finds the password after searching half of the keyspace.

use crate::types::{CompositionStats, CrackEstimate, CrackTimeBucket, CrackTimes};

const LOWERCASE_POOL: u32 = 26;
const UPPERCASE_POOL: u32 = 26;
const DIGIT_POOL: u32 = 10;
const SYMBOL_POOL: u32 = 33;
const OTHER_POOL: u32 = 100;

/// Guesses per second of a multi-core CPU against a fast hash.
pub const CPU_GUESSES_PER_SEC: f64 = 1e9;
/// Guesses per second of a single modern GPU against a fast hash.
pub const GPU_GUESSES_PER_SEC: f64 = 1e10;
/// Guesses per second of a multi-GPU cracking rig.
pub const HIGH_END_GPU_GUESSES_PER_SEC: f64 = 1e12;

/// Entropy left for a smart guesser when a common pattern is present.
const COMMON_PATTERN_BITS_CAP: f64 = 16.0;
const SEQUENTIAL_FACTOR: f64 = 0.75;
const REPEATED_FACTOR: f64 = 0.75;

// 2^1000 still fits in an f64
const MAX_BITS: f64 = 1000.0;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const MONTH: f64 = 30.0 * DAY;
const YEAR: f64 = 365.0 * DAY;
const CENTURY: f64 = 100.0 * YEAR;

pub(crate) fn pool_size(stats: &CompositionStats) -> u32 {
    [
        (stats.lowercase, LOWERCASE_POOL),
        (stats.uppercase, UPPERCASE_POOL),
        (stats.numbers, DIGIT_POOL),
        (stats.symbols, SYMBOL_POOL),
        (stats.other, OTHER_POOL),
    ]
    .iter()
    .filter(|(count, _)| *count > 0)
    .map(|(_, pool)| pool)
    .sum()
}

/// Shannon-style keyspace entropy in bits.
pub fn entropy_section(stats: &CompositionStats) -> f64 {
    let pool = pool_size(stats);
    if stats.total == 0 || pool == 0 {
        return 0.0;
    }
    stats.total as f64 * f64::from(pool).log2()
}

/// Bits a pattern-aware attacker still has to search.
pub(crate) fn smart_guess_bits(entropy_bits: f64, common: bool, sequential: bool, repeated: bool) -> f64 {
    let mut bits = entropy_bits;
    if common {
        bits = bits.min(COMMON_PATTERN_BITS_CAP);
    }
    if sequential {
        bits *= SEQUENTIAL_FACTOR;
    }
    if repeated {
        bits *= REPEATED_FACTOR;
    }
    bits
}

pub fn crack_times(entropy_bits: f64, common: bool, sequential: bool, repeated: bool) -> CrackTimes {
    if entropy_bits <= 0.0 {
        return CrackTimes::not_applicable();
    }
    let smart_bits = smart_guess_bits(entropy_bits, common, sequential, repeated);
    CrackTimes {
        brute_force: estimate(entropy_bits, GPU_GUESSES_PER_SEC),
        smart_guess: estimate(smart_bits, GPU_GUESSES_PER_SEC),
        cpu: estimate(entropy_bits, CPU_GUESSES_PER_SEC),
        gpu: estimate(entropy_bits, GPU_GUESSES_PER_SEC),
        high_end_gpu: estimate(entropy_bits, HIGH_END_GPU_GUESSES_PER_SEC),
    }
}

pub(crate) fn estimate(bits: f64, guesses_per_sec: f64) -> CrackEstimate {
    let guesses = 2f64.powf(bits.clamp(0.0, MAX_BITS) - 1.0);
    let seconds = guesses / guesses_per_sec;
    let (display, bucket) = describe_duration(seconds);
    CrackEstimate {
        seconds,
        display,
        bucket,
    }
}

pub(crate) fn describe_duration(seconds: f64) -> (String, CrackTimeBucket) {
    let count = |value: f64, unit: &str| {
        let n = value.round().max(1.0) as u64;
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    };

    if seconds < 1.0 {
        ("instantly".to_string(), CrackTimeBucket::Instant)
    } else if seconds < MINUTE {
        (count(seconds, "second"), CrackTimeBucket::Seconds)
    } else if seconds < HOUR {
        (count(seconds / MINUTE, "minute"), CrackTimeBucket::Minutes)
    } else if seconds < DAY {
        (count(seconds / HOUR, "hour"), CrackTimeBucket::Hours)
    } else if seconds < MONTH {
        (count(seconds / DAY, "day"), CrackTimeBucket::Days)
    } else if seconds < YEAR {
        (count(seconds / MONTH, "month"), CrackTimeBucket::Months)
    } else if seconds < CENTURY {
        (count(seconds / YEAR, "year"), CrackTimeBucket::Years)
    } else {
        ("centuries".to_string(), CrackTimeBucket::Centuries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::composition::composition_of;

    #[test]
    fn test_pool_size_per_class() {
        assert_eq!(pool_size(&composition_of("abc")), 26);
        assert_eq!(pool_size(&composition_of("aB1")), 62);
        assert_eq!(pool_size(&composition_of("aB1!")), 95);
        assert_eq!(pool_size(&composition_of("")), 0);
    }

    #[test]
    fn test_entropy_of_lowercase_password() {
        let bits = entropy_section(&composition_of("password"));
        assert!((bits - 8.0 * 26f64.log2()).abs() < 1e-9);
    }

    #[test]
    fn test_entropy_of_empty_password() {
        assert_eq!(entropy_section(&CompositionStats::default()), 0.0);
    }

    #[test]
    fn test_describe_duration_buckets() {
        assert_eq!(describe_duration(0.2), ("instantly".to_string(), CrackTimeBucket::Instant));
        assert_eq!(describe_duration(1.0), ("1 second".to_string(), CrackTimeBucket::Seconds));
        assert_eq!(describe_duration(90.0).1, CrackTimeBucket::Minutes);
        assert_eq!(describe_duration(3.0 * HOUR), ("3 hours".to_string(), CrackTimeBucket::Hours));
        assert_eq!(describe_duration(2.0 * DAY).1, CrackTimeBucket::Days);
        assert_eq!(describe_duration(2.0 * MONTH).1, CrackTimeBucket::Months);
        assert_eq!(describe_duration(5.0 * YEAR), ("5 years".to_string(), CrackTimeBucket::Years));
        assert_eq!(describe_duration(1e30).1, CrackTimeBucket::Centuries);
    }

    #[test]
    fn test_faster_hardware_is_never_slower() {
        let times = crack_times(60.0, false, false, false);
        assert!(times.cpu.seconds > times.gpu.seconds);
        assert!(times.gpu.seconds > times.high_end_gpu.seconds);
        assert_eq!(times.brute_force, times.gpu);
    }

    #[test]
    fn test_smart_guess_penalties() {
        assert_eq!(smart_guess_bits(80.0, true, false, false), 16.0);
        assert_eq!(smart_guess_bits(80.0, false, true, false), 60.0);
        assert_eq!(smart_guess_bits(80.0, false, true, true), 45.0);

        let times = crack_times(80.0, true, false, false);
        assert!(times.smart_guess.seconds < times.brute_force.seconds);
        assert_eq!(times.smart_guess.bucket, CrackTimeBucket::Instant);
    }

    #[test]
    fn test_huge_entropy_does_not_overflow() {
        let times = crack_times(5000.0, false, false, false);
        assert!(times.brute_force.seconds.is_finite());
        assert_eq!(times.brute_force.bucket, CrackTimeBucket::Centuries);
    }

    #[test]
    fn test_zero_entropy_is_not_applicable() {
        assert_eq!(crack_times(0.0, false, false, false), CrackTimes::not_applicable());
    }
}
