//! Shared-secret handling: base-32 codec and random generation.

use crate::otp::error::{OtpError, OtpResult};
use rand::{CryptoRng, RngCore};

/// Secret length recommended by RFC 4226 §4 (160 bits).
pub const RECOMMENDED_SECRET_BYTES: usize = 20;

/// Decode a base-32 secret (with or without spaces/dashes, case-insensitive).
pub fn decode_secret(b32: &str) -> OtpResult<Vec<u8>> {
    let cleaned = normalise(b32);
    if cleaned.is_empty() {
        return Err(OtpError::invalid_secret("base-32 secret is empty"));
    }
    let padded = pad_base32(&cleaned);
    base32::decode(base32::Alphabet::Rfc4648 { padding: true }, &padded)
        .or_else(|| base32::decode(base32::Alphabet::Rfc4648 { padding: false }, &cleaned))
        .ok_or_else(|| OtpError::invalid_secret("invalid base-32 secret"))
}

/// Encode raw bytes to base-32 (no padding, uppercase).
pub fn encode_secret(bytes: &[u8]) -> String {
    base32::encode(base32::Alphabet::Rfc4648 { padding: false }, bytes)
}

/// Fill a new secret of `byte_length` bytes from a cryptographic RNG.
pub fn generate_secret<R>(rng: &mut R, byte_length: usize) -> Vec<u8>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut buf = vec![0u8; byte_length];
    rng.fill_bytes(&mut buf);
    buf
}

/// Check if a string looks like a valid base-32 secret.
pub fn is_valid_base32(s: &str) -> bool {
    let cleaned = normalise(s);
    !cleaned.is_empty()
        && cleaned
            .chars()
            .all(|c| matches!(c, 'A'..='Z' | '2'..='7' | '='))
        && decode_secret(&cleaned).is_ok()
}

fn normalise(s: &str) -> String {
    s.replace(|c: char| c == ' ' || c == '-', "")
        .to_uppercase()
}

/// Append '=' until the length is a multiple of the 8-character block.
fn pad_base32(s: &str) -> String {
    let missing = (8 - s.len() % 8) % 8;
    let mut padded = String::with_capacity(s.len() + missing);
    padded.push_str(s);
    padded.extend(std::iter::repeat('=').take(missing));
    padded
}
