//! Deployment settings for code generation and verification.

use crate::otp::error::{OtpError, OtpResult};
use crate::otp::types::{Algorithm, Digits};
use serde::{Deserialize, Serialize};

pub const ENV_DIGITS: &str = "AUTOFORM_OTP_DIGITS";
pub const ENV_ALGORITHM: &str = "AUTOFORM_OTP_ALGORITHM";
pub const ENV_LOOK_AHEAD: &str = "AUTOFORM_OTP_LOOK_AHEAD";

/// Upper bound on the verifier look-ahead window.
pub const MAX_LOOK_AHEAD: u32 = 100;

/// OTP settings. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OtpConfig {
    /// Code length (6..=9, default 6).
    pub digits: Digits,
    /// HMAC hash (default SHA-1).
    pub algorithm: Algorithm,
    /// How many counters past the expected one a verifier accepts.
    pub look_ahead: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            digits: Digits::default(),
            algorithm: Algorithm::default(),
            look_ahead: 0,
        }
    }
}

impl OtpConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> OtpResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> OtpResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| OtpError::from(e).with_detail(path.display().to_string()))?;
        log::debug!("loaded OTP config from {}", path.display());
        Self::from_json(&raw)
    }

    /// Defaults overridden by `AUTOFORM_OTP_*` environment variables.
    pub fn from_env() -> OtpResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> OtpResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_DIGITS) {
            let n: u8 = raw.trim().parse().map_err(|_| {
                OtpError::invalid_config(format!("{} is not a number", ENV_DIGITS))
                    .with_detail(raw.clone())
            })?;
            config.digits = Digits::new(n)?;
        }
        if let Some(raw) = lookup(ENV_ALGORITHM) {
            config.algorithm = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_LOOK_AHEAD) {
            config.look_ahead = raw.trim().parse().map_err(|_| {
                OtpError::invalid_config(format!("{} is not a number", ENV_LOOK_AHEAD))
                    .with_detail(raw.clone())
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> OtpResult<()> {
        if self.look_ahead > MAX_LOOK_AHEAD {
            return Err(OtpError::invalid_config(format!(
                "look-ahead window must be at most {}, got {}",
                MAX_LOOK_AHEAD, self.look_ahead
            )));
        }
        Ok(())
    }
}
