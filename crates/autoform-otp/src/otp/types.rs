//! Core types for HOTP generation and verification.

use crate::otp::error::{OtpError, OtpErrorKind, OtpResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Algorithm
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Hash algorithm used for the HMAC step.
///
/// RFC 4226 only defines SHA-1; the SHA-2 variants are what many
/// authenticator apps accept for the same truncation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
            Self::Sha512 => write!(f, "SHA512"),
        }
    }
}

impl Algorithm {
    /// Parse from a case-insensitive string.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SHA1" | "SHA-1" | "HMACSHA1" | "HMAC-SHA1" => Some(Self::Sha1),
            "SHA256" | "SHA-256" | "HMACSHA256" | "HMAC-SHA256" => Some(Self::Sha256),
            "SHA512" | "SHA-512" | "HMACSHA512" | "HMAC-SHA512" => Some(Self::Sha512),
            _ => None,
        }
    }
}

impl FromStr for Algorithm {
    type Err = OtpError;

    fn from_str(s: &str) -> OtpResult<Self> {
        Self::from_str_loose(s).ok_or_else(|| {
            OtpError::new(OtpErrorKind::InvalidAlgorithm, "unknown HMAC algorithm")
                .with_detail(s.to_string())
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Digit count
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Number of decimal digits in a generated code.
///
/// RFC 4226 requires at least 6 and Appendix E allows up to 9, which is
/// also the largest count whose modulus fits the 31-bit truncated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digits(u8);

impl Digits {
    pub const MIN: u8 = 6;
    pub const MAX: u8 = 9;

    pub fn new(digits: u8) -> OtpResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&digits) {
            Ok(Self(digits))
        } else {
            Err(OtpError::invalid_digits(digits))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// `10^digits`, the modulus applied after truncation.
    pub fn modulus(self) -> u32 {
        10u32.pow(self.0 as u32)
    }
}

impl Default for Digits {
    fn default() -> Self {
        Self(6)
    }
}

impl TryFrom<u8> for Digits {
    type Error = OtpError;

    fn try_from(value: u8) -> OtpResult<Self> {
        Self::new(value)
    }
}

impl From<Digits> for u8 {
    fn from(d: Digits) -> u8 {
        d.0
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification result
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Result of checking a submitted code against a counter window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResult {
    pub valid: bool,
    /// How many counters past the expected one the match was (0 = exact).
    pub drift: u64,
    /// The counter value that matched (if any).
    pub matched_counter: Option<u64>,
}

impl VerifyResult {
    pub(crate) fn invalid() -> Self {
        Self {
            valid: false,
            drift: 0,
            matched_counter: None,
        }
    }

    /// Counter the caller should persist after a successful match so the
    /// same code cannot be replayed. `None` when nothing matched or the
    /// matched counter was `u64::MAX`.
    pub fn next_counter(&self) -> Option<u64> {
        self.matched_counter.and_then(|c| c.checked_add(1))
    }
}
