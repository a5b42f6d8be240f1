//! `autoform-hotp` command surface: print a code table or check a code.

use std::io::Write;
use std::path::PathBuf;

use autoform_otp::otp::core::{self, parse_counter};
use autoform_otp::otp::secret::decode_secret;
use autoform_otp::otp::{Digits, OtpConfig, OtpResult};
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Counter-based one-time passwords (RFC 4226).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON config file; `AUTOFORM_OTP_*` environment variables are used otherwise.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print codes for a range of counters.
    Generate(GenerateArgs),
    /// Check a submitted code against a counter and look-ahead window.
    Verify(VerifyArgs),
}

#[derive(ClapArgs, Debug)]
pub struct SecretArgs {
    /// Shared secret.
    #[arg(long, env = "AUTOFORM_OTP_SECRET", hide_env_values = true)]
    pub secret: String,

    /// Treat the secret as base-32 instead of raw text.
    #[arg(long)]
    pub base32: bool,

    /// Code length, overriding the configured value.
    #[arg(long)]
    pub digits: Option<u8>,
}

#[derive(ClapArgs, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub secret: SecretArgs,

    /// First counter.
    #[arg(long, default_value = "0", allow_hyphen_values = true, value_parser = counter_arg)]
    pub counter: u64,

    /// Number of consecutive codes to print.
    #[arg(long, default_value = "10")]
    pub count: u64,
}

#[derive(ClapArgs, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub secret: SecretArgs,

    /// Expected counter.
    #[arg(long, allow_hyphen_values = true, value_parser = counter_arg)]
    pub counter: u64,

    /// Submitted code.
    #[arg(long)]
    pub code: String,

    /// Look-ahead window, overriding the configured value.
    #[arg(long)]
    pub look_ahead: Option<u32>,
}

fn counter_arg(s: &str) -> Result<u64, String> {
    Ok(parse_counter(s)?)
}

impl SecretArgs {
    fn key(&self) -> OtpResult<Vec<u8>> {
        if self.base32 {
            decode_secret(&self.secret)
        } else {
            Ok(self.secret.as_bytes().to_vec())
        }
    }

    fn digits(&self, config: &OtpConfig) -> OtpResult<Digits> {
        match self.digits {
            Some(n) => Digits::new(n),
            None => Ok(config.digits),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> OtpResult<OtpConfig> {
    match path {
        Some(p) => OtpConfig::from_file(p),
        None => OtpConfig::from_env(),
    }
}

/// Execute the parsed command, writing results to `out`.
///
/// Returns the process exit code: 0 on success, 1 when a verified code
/// does not match.
pub fn run<W: Write>(args: Args, out: &mut W) -> OtpResult<i32> {
    let config = load_config(args.config.as_ref())?;
    run_with_config(&args.command, &config, out)
}

/// Execute a command against an already loaded configuration.
pub fn run_with_config<W: Write>(
    command: &Command,
    config: &OtpConfig,
    out: &mut W,
) -> OtpResult<i32> {
    match command {
        Command::Generate(cmd) => generate(cmd, config, out),
        Command::Verify(cmd) => verify(cmd, config, out),
    }
}

fn generate<W: Write>(cmd: &GenerateArgs, config: &OtpConfig, out: &mut W) -> OtpResult<i32> {
    let key = cmd.secret.key()?;
    let digits = cmd.secret.digits(config)?;
    tracing::info!(
        counter = cmd.counter,
        count = cmd.count,
        digits = %digits,
        algorithm = %config.algorithm,
        "generating codes"
    );

    let counters = (0..cmd.count).map_while(|i| cmd.counter.checked_add(i));
    for counter in counters {
        let code = core::hotp(&key, counter, digits, config.algorithm);
        writeln!(out, "{:04}    {}", counter, code)?;
    }
    Ok(0)
}

fn verify<W: Write>(cmd: &VerifyArgs, config: &OtpConfig, out: &mut W) -> OtpResult<i32> {
    let key = cmd.secret.key()?;
    let digits = cmd.secret.digits(config)?;
    let window = OtpConfig {
        look_ahead: cmd.look_ahead.unwrap_or(config.look_ahead),
        ..config.clone()
    };
    window.validate()?;
    let look_ahead = window.look_ahead;

    let result = core::verify_code_with(
        &key,
        cmd.counter,
        cmd.code.trim(),
        digits,
        config.algorithm,
        look_ahead,
    )?;

    if let Some(matched) = result.matched_counter {
        tracing::info!(matched, drift = result.drift, "code accepted");
        writeln!(out, "valid (counter {}, drift {})", matched, result.drift)?;
        Ok(0)
    } else {
        tracing::warn!(counter = cmd.counter, look_ahead, "code rejected");
        writeln!(out, "invalid")?;
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fixed defaults so `AUTOFORM_OTP_*` in the developer's shell cannot leak in.
    fn run_with(argv: &[&str]) -> (OtpResult<i32>, String) {
        let args = Args::try_parse_from(argv).unwrap();
        let mut out = Vec::new();
        let code = run_with_config(&args.command, &OtpConfig::default(), &mut out);
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn generate_prints_rfc_table() {
        let (code, out) = run_with(&[
            "autoform-hotp", "generate", "--secret", "12345678901234567890", "--digits", "6",
        ]);
        assert_eq!(code.unwrap(), 0);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "0000    755224");
        assert_eq!(lines[9], "0009    520489");
    }

    #[test]
    fn generate_from_base32_secret() {
        let (code, out) = run_with(&[
            "autoform-hotp", "generate",
            "--secret", "GEZD GNBV GY3T QOJQ GEZD GNBV GY3T QOJQ", "--base32",
            "--digits", "6", "--counter", "2", "--count", "1",
        ]);
        assert_eq!(code.unwrap(), 0);
        assert_eq!(out, "0002    359152\n");
    }

    #[test]
    fn generate_stops_at_max_counter() {
        let (code, out) = run_with(&[
            "autoform-hotp", "generate", "--secret", "k", "--digits", "6",
            "--counter", "18446744073709551615", "--count", "5",
        ]);
        assert_eq!(code.unwrap(), 0);
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn negative_counter_is_rejected_by_parser() {
        let err = Args::try_parse_from([
            "autoform-hotp", "generate", "--secret", "k", "--counter", "-1",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn verify_accepts_within_window() {
        let (code, out) = run_with(&[
            "autoform-hotp", "verify", "--secret", "12345678901234567890", "--digits", "6",
            "--counter", "0", "--code", "359152", "--look-ahead", "2",
        ]);
        assert_eq!(code.unwrap(), 0);
        assert_eq!(out, "valid (counter 2, drift 2)\n");
    }

    #[test]
    fn verify_rejects_outside_window() {
        let (code, out) = run_with(&[
            "autoform-hotp", "verify", "--secret", "12345678901234567890", "--digits", "6",
            "--counter", "0", "--code", "359152", "--look-ahead", "1",
        ]);
        assert_eq!(code.unwrap(), 1);
        assert_eq!(out, "invalid\n");
    }

    #[test]
    fn bad_digits_is_an_error() {
        let (code, out) = run_with(&[
            "autoform-hotp", "generate", "--secret", "k", "--digits", "4",
        ]);
        assert!(code.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn verify_uses_configured_window() {
        let args = Args::try_parse_from([
            "autoform-hotp", "verify", "--secret", "12345678901234567890",
            "--counter", "0", "--code", "359152",
        ])
        .unwrap();
        let config = OtpConfig {
            look_ahead: 2,
            ..OtpConfig::default()
        };
        let mut out = Vec::new();
        assert_eq!(run_with_config(&args.command, &config, &mut out).unwrap(), 0);

        let mut out = Vec::new();
        let strict = OtpConfig::default();
        assert_eq!(run_with_config(&args.command, &strict, &mut out).unwrap(), 1);
    }

    #[test]
    fn verify_rejects_oversized_window() {
        let (code, out) = run_with(&[
            "autoform-hotp", "verify", "--secret", "k", "--counter", "0",
            "--code", "000000", "--look-ahead", "2000000",
        ]);
        let err = code.unwrap_err();
        assert_eq!(err.kind, autoform_otp::otp::OtpErrorKind::InvalidConfig);
        assert!(out.is_empty());
    }
}
