//! Common-password dictionaries.
//!
//! Two sources are consulted:
//! - a fixed built-in list of the most common passwords plus a regex of
//!   extremely common tokens, always available;
//! - an optional extended dictionary loaded once from a file
//!   (`PWD_BLACKLIST_PATH`), used by the strength classifier's
//!   common-pattern flag.
//!
//! Lookups compare leetspeak-canonicalized, lowercased text on both sides.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{LazyLock, RwLock};

use regex::Regex;
use thiserror::Error;

/// Built-in list of the most common passwords.
const COMMON_PASSWORDS: &[&str] = &[
    "password", "123456", "123456789", "12345678", "12345", "1234567",
    "qwerty", "qwerty123", "abc123", "password1", "password123", "111111",
    "123123", "000000", "654321", "1q2w3e4r", "admin", "letmein", "welcome",
    "monkey", "dragon", "football", "baseball", "iloveyou", "sunshine",
    "princess", "shadow", "master", "superman", "trustno1", "michael",
    "jennifer", "hunter2", "starwars", "login",
];

static COMMON_CANONICAL: LazyLock<HashSet<String>> =
    LazyLock::new(|| COMMON_PASSWORDS.iter().map(|p| canonicalize(p)).collect());

static COMMON_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(password|passwd|qwerty|asdf|zxcv|letmein|welcome|admin|login|abc123|123456|654321|111111|iloveyou|monkey|dragon|master|sunshine|princess|football|baseball|shadow|superman|trustno1|starwars)",
    )
    .expect("common token regex is valid")
});

static EXTENDED: RwLock<Option<HashSet<String>>> = RwLock::new(None);

#[derive(Error, Debug)]
pub enum BlacklistError {
    #[error("Blacklist file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read blacklist file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Blacklist file is empty")]
    EmptyFile,
}

/// Lowercases and reverses the usual leetspeak substitutions
/// (`@`→`a`, `$`→`s`, `0`→`o`, `1`→`i`).
pub fn canonicalize(password: &str) -> String {
    password
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '@' => 'a',
            '$' => 's',
            '0' => 'o',
            '1' => 'i',
            other => other,
        })
        .collect()
}

/// Exact (canonicalized) match against the built-in list.
pub fn is_common_password(password: &str) -> bool {
    !password.is_empty() && COMMON_CANONICAL.contains(&canonicalize(password))
}

/// Whether the password contains one of the extremely common tokens, either
/// as typed or after canonicalization.
pub fn contains_common_token(password: &str) -> bool {
    COMMON_TOKENS.is_match(password) || COMMON_TOKENS.is_match(&canonicalize(password))
}

/// Returns the extended dictionary path.
///
/// Priority:
/// 1. Environment variable `PWD_BLACKLIST_PATH`
/// 2. Default path `./assets/blacklist.txt`
pub fn get_blacklist_path() -> PathBuf {
    std::env::var("PWD_BLACKLIST_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./assets/blacklist.txt"))
}

/// Loads the extended dictionary from [`get_blacklist_path`].
///
/// Idempotent: once loaded, later calls return the stored entry count.
pub fn init_blacklist() -> Result<usize, BlacklistError> {
    init_blacklist_from_path(get_blacklist_path())
}

/// Loads the extended dictionary from a specific file, one password per line.
pub fn init_blacklist_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<usize, BlacklistError> {
    if let Some(count) = read_extended(|set| set.map(HashSet::len)) {
        return Ok(count);
    }

    let path = path.as_ref();
    if !path.exists() {
        #[cfg(feature = "tracing")]
        tracing::error!("Blacklist initialization FAILED: FileNotFound {:?}", path);
        return Err(BlacklistError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let set: HashSet<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(canonicalize)
        .collect();

    if set.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::error!("Blacklist initialization FAILED: Empty file {:?}", path);
        return Err(BlacklistError::EmptyFile);
    }

    let count = set.len();
    *EXTENDED.write().unwrap_or_else(|e| e.into_inner()) = Some(set);

    #[cfg(feature = "tracing")]
    tracing::info!("Blacklist initialized: {} passwords from {:?}", count, path);

    Ok(count)
}

/// Checks the extended dictionary. `false` when it was never loaded.
pub fn is_blacklisted(password: &str) -> bool {
    if password.is_empty() {
        return false;
    }
    read_extended(|set| set.map(|bl| bl.contains(&canonicalize(password)))).unwrap_or(false)
}

fn read_extended<T>(f: impl FnOnce(Option<&HashSet<String>>) -> Option<T>) -> Option<T> {
    let guard = EXTENDED.read().unwrap_or_else(|e| e.into_inner());
    f(guard.as_ref())
}

#[cfg(test)]
pub(crate) fn reset_blacklist_for_testing() {
    *EXTENDED.write().unwrap_or_else(|e| e.into_inner()) = None;
}
