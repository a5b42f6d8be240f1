//! # autoform – credential primitives
//!
//! Counter-based one-time passwords and the small hashing helpers used by
//! the autoform form builder:
//!
//! - **RFC 4226** – HOTP generation with SHA-1 (SHA-256 / SHA-512 accepted)
//! - **Verification** – constant-time code check with a caller-chosen look-ahead window
//! - **Secrets** – base-32 encoding / decoding, random secret generation
//! - **Identifiers** – `nice_hash` and `nice_username` for URL/e-mail safe tokens
//! - **Configuration** – deployment settings from JSON or environment variables

pub mod otp;
