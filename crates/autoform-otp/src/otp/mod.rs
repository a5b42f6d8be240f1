//! OTP crate: sub-modules.

pub mod error;
pub mod types;
pub mod core;
pub mod secret;
pub mod hashing;
pub mod config;

// Re-export top-level items for convenience.
pub use config::OtpConfig;
pub use error::{OtpError, OtpErrorKind, OtpResult};
pub use types::*;
