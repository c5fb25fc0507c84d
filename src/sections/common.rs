//! Common-pattern section - dictionary words and well-known passwords.

use secrecy::{ExposeSecret, SecretString};

use crate::blacklist::{contains_common_token, is_blacklisted, is_common_password};

/// Flags passwords that contain an extremely common token or match the
/// built-in or extended dictionary.
pub fn common_pattern_section(password: &SecretString) -> bool {
    let pwd = password.expose_secret();
    !pwd.is_empty()
        && (contains_common_token(pwd) || is_common_password(pwd) || is_blacklisted(pwd))
}
