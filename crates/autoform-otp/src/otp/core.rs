//! Core OTP generation — RFC 4226 (HOTP).
//!
//! Implements HMAC-based One-Time Password with SHA-1 (plus SHA-256 and
//! SHA-512), dynamic truncation, counter validation for untyped input, and
//! code verification over a caller-chosen look-ahead window.

use crate::otp::error::{OtpError, OtpResult};
use crate::otp::types::*;
use crate::otp::config::MAX_LOOK_AHEAD;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use std::num::IntErrorKind;
use subtle::ConstantTimeEq;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Raw HMAC-OTP (RFC 4226 §5.3)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The moving factor as it is fed to the HMAC: 8 bytes, big-endian.
pub fn counter_bytes(counter: u64) -> [u8; 8] {
    counter.to_be_bytes()
}

/// Compute an HOTP code for the given raw key bytes and counter.
pub fn hotp(key: &[u8], counter: u64, digits: Digits, algo: Algorithm) -> String {
    log::trace!("computing HOTP: counter={} digits={} algo={}", counter, digits, algo);
    let hmac_result = compute_hmac(key, &counter_bytes(counter), algo);
    truncate(&hmac_result, digits)
}

/// Compute HMAC(key, message) using the specified algorithm.
fn compute_hmac(key: &[u8], data: &[u8], algo: Algorithm) -> Vec<u8> {
    match algo {
        Algorithm::Sha1 => keyed_digest::<Hmac<Sha1>>(key, data),
        Algorithm::Sha256 => keyed_digest::<Hmac<Sha256>>(key, data),
        Algorithm::Sha512 => keyed_digest::<Hmac<Sha512>>(key, data),
    }
}

fn keyed_digest<M: Mac + KeyInit>(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = <M as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Dynamic truncation per RFC 4226 §5.3, then zero-padded decimal rendering.
///
/// The offset is at most 15 and every supported digest is at least 20
/// bytes, so the 4-byte window is always in bounds.
fn truncate(hmac_result: &[u8], digits: Digits) -> String {
    let offset = (hmac_result[hmac_result.len() - 1] & 0x0f) as usize;
    let window = [
        hmac_result[offset],
        hmac_result[offset + 1],
        hmac_result[offset + 2],
        hmac_result[offset + 3],
    ];
    let binary = u32::from_be_bytes(window) & 0x7fff_ffff;
    let code = binary % digits.modulus();
    format!("{:0>width$}", code, width = digits.get() as usize)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HOTP (counter-based, RFC 4226)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generate an RFC 4226 HOTP code (HMAC-SHA1).
///
/// `digits` must be in 6..=9; anything else is rejected rather than
/// clamped. The returned string always has exactly `digits` characters.
pub fn generate_code(secret: &[u8], counter: u64, digits: u8) -> OtpResult<String> {
    let digits = Digits::new(digits)?;
    Ok(hotp(secret, counter, digits, Algorithm::Sha1))
}

/// Generate a code with an explicit algorithm.
pub fn generate_code_with(
    secret: &[u8],
    counter: u64,
    digits: u8,
    algo: Algorithm,
) -> OtpResult<String> {
    let digits = Digits::new(digits)?;
    Ok(hotp(secret, counter, digits, algo))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Counter input
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Parse a counter from text (CLI argument, form field, config value).
pub fn parse_counter(input: &str) -> OtpResult<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(OtpError::invalid_counter("counter is empty"));
    }
    if trimmed.starts_with('-') {
        return Err(
            OtpError::invalid_counter("counter must not be negative").with_detail(trimmed),
        );
    }
    trimmed.parse::<u64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => {
            OtpError::invalid_counter("counter exceeds 64-bit range").with_detail(trimmed)
        }
        _ => OtpError::invalid_counter("counter is not a number").with_detail(trimmed),
    })
}

/// Narrow a wide signed counter to the 64-bit unsigned moving factor.
pub fn counter_from_i128(value: i128) -> OtpResult<u64> {
    u64::try_from(value).map_err(|_| {
        let msg = if value < 0 {
            "counter must not be negative"
        } else {
            "counter exceeds 64-bit range"
        };
        OtpError::invalid_counter(msg).with_detail(value.to_string())
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Verify a submitted code against the expected counter (HMAC-SHA1).
///
/// Counters `counter ..= counter + look_ahead` are checked in order. There
/// is no behind-window: HOTP counters only move forward. Windows wider
/// than `MAX_LOOK_AHEAD` are rejected with `InvalidConfig`.
pub fn verify_code(
    secret: &[u8],
    counter: u64,
    code: &str,
    digits: u8,
    look_ahead: u32,
) -> OtpResult<VerifyResult> {
    let digits = Digits::new(digits)?;
    verify_code_with(secret, counter, code, digits, Algorithm::Sha1, look_ahead)
}

/// Verify with an explicit algorithm and validated digit count.
pub fn verify_code_with(
    secret: &[u8],
    counter: u64,
    code: &str,
    digits: Digits,
    algo: Algorithm,
    look_ahead: u32,
) -> OtpResult<VerifyResult> {
    if look_ahead > MAX_LOOK_AHEAD {
        return Err(OtpError::invalid_config(format!(
            "look-ahead window must be at most {}, got {}",
            MAX_LOOK_AHEAD, look_ahead
        )));
    }

    // Must be digits only, correct length
    if code.len() != digits.get() as usize || !code.bytes().all(|b| b.is_ascii_digit()) {
        log::debug!("rejecting malformed code of length {}", code.len());
        return Ok(VerifyResult::invalid());
    }

    let end = counter.saturating_add(look_ahead as u64);
    for c in counter..=end {
        let generated = hotp(secret, c, digits, algo);
        if bool::from(generated.as_bytes().ct_eq(code.as_bytes())) {
            log::debug!("code matched at counter {} (drift {})", c, c - counter);
            return Ok(VerifyResult {
                valid: true,
                drift: c - counter,
                matched_counter: Some(c),
            });
        }
    }

    Ok(VerifyResult::invalid())
}
