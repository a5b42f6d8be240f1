//! OTP error type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorised OTP error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpError {
    pub kind: OtpErrorKind,
    pub message: String,
    /// Extra context (offending value, parser message, ...).
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OtpErrorKind {
    /// Digit count outside the supported range.
    InvalidDigits,
    /// Counter is negative, above 2^64-1, or not a number.
    InvalidCounter,
    /// Secret is not valid base-32.
    InvalidSecret,
    /// Unknown HMAC algorithm name.
    InvalidAlgorithm,
    /// Configuration could not be parsed or failed validation.
    InvalidConfig,
    /// Local I/O failure (reading a config file).
    Io,
}

pub type OtpResult<T> = Result<T, OtpError>;

// ── Construction helpers ─────────────────────────────────────────────

impl OtpError {
    pub fn new(kind: OtpErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn invalid_digits(digits: impl fmt::Display) -> Self {
        Self::new(
            OtpErrorKind::InvalidDigits,
            format!("digit count must be between 6 and 9, got {}", digits),
        )
    }

    pub fn invalid_counter(msg: impl Into<String>) -> Self {
        Self::new(OtpErrorKind::InvalidCounter, msg)
    }

    pub fn invalid_secret(msg: impl Into<String>) -> Self {
        Self::new(OtpErrorKind::InvalidSecret, msg)
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(OtpErrorKind::InvalidConfig, msg)
    }
}

impl fmt::Display for OtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(d) = &self.detail {
            write!(f, " ({})", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for OtpError {}

impl From<std::io::Error> for OtpError {
    fn from(e: std::io::Error) -> Self {
        Self::new(OtpErrorKind::Io, e.to_string())
    }
}

impl From<serde_json::Error> for OtpError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_config("malformed configuration JSON").with_detail(e.to_string())
    }
}

impl From<OtpError> for String {
    fn from(e: OtpError) -> String {
        e.to_string()
    }
}
