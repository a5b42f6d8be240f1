//! Short, case-insensitive identifiers for URLs, e-mails and usernames.
//!
//! Base-32 is used instead of hex or base-64: more compact than hex, yet
//! still case-insensitive. A SHA-1 digest (160 bits) is exactly 32
//! base-32 characters.

use rand::Rng;
use sha1::{Digest, Sha1};
use std::fmt;

/// Maximum length of the readable e-mail prefix in a generated username.
pub const USERNAME_PREFIX_LEN: usize = 20;
/// Length of the random hash suffix in a generated username.
pub const USERNAME_SUFFIX_LEN: usize = 6;

/// SHA-1 over the string form of every part, in order, base-32 encoded.
pub fn nice_hash(parts: &[&dyn fmt::Display]) -> String {
    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part.to_string().as_bytes());
    }
    base32::encode(
        base32::Alphabet::Rfc4648 { padding: true },
        hasher.finalize().as_slice(),
    )
}

/// Build a unique but readable username for an account that signs in
/// with its e-mail address.
///
/// The result is the cleaned e-mail (capped at 20 characters) followed by
/// `_` and six base-32 characters of a salted hash. The salt comes from
/// `rng`, so callers decide where randomness comes from.
pub fn nice_username<R>(email: &str, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let clean: String = email
        .replace('@', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .take(USERNAME_PREFIX_LEN)
        .collect();

    let salt: f64 = rng.gen();
    let mut hasher = Sha1::new();
    hasher.update(email.as_bytes());
    hasher.update(salt.to_string().as_bytes());
    let suffix: String = base32::encode(
        base32::Alphabet::Rfc4648 { padding: false },
        hasher.finalize().as_slice(),
    )
    .to_lowercase()
    .chars()
    .take(USERNAME_SUFFIX_LEN)
    .collect();

    format!("{}_{}", clean, suffix)
}
