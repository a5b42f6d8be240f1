use autoform_lib::cli::{self, Args};
use autoform_otp::otp::core::{generate_code, hotp, verify_code};
use autoform_otp::otp::hashing::{nice_hash, nice_username};
use autoform_otp::otp::secret::{decode_secret, encode_secret, generate_secret};
use autoform_otp::otp::{Algorithm, Digits, OtpConfig, OtpErrorKind, VerifyResult};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;

const RFC4226_SECRET: &[u8] = b"12345678901234567890";

#[test]
fn test_rfc4226_reference_codes() {
    assert_eq!(generate_code(RFC4226_SECRET, 0, 6).unwrap(), "755224");
    assert_eq!(generate_code(RFC4226_SECRET, 1, 6).unwrap(), "287082");
    assert_eq!(generate_code(RFC4226_SECRET, 2, 6).unwrap(), "359152");
    assert_eq!(generate_code(RFC4226_SECRET, 9, 6).unwrap(), "520489");
}

#[test]
fn test_base32_secret_gives_same_codes() {
    let b32 = encode_secret(RFC4226_SECRET);
    let key = decode_secret(&b32).unwrap();
    assert_eq!(
        hotp(&key, 5, Digits::default(), Algorithm::Sha1),
        "254676"
    );
}

#[test]
fn test_generator_verifier_agree_across_threads() {
    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            std::thread::spawn(move || {
                let key = generate_secret(&mut StdRng::seed_from_u64(t), 20);
                let counter = t * 1_000;
                let code = generate_code(&key, counter + 2, 8).unwrap();
                verify_code(&key, counter, &code, 8, 5).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let vr = handle.join().unwrap();
        assert!(vr.valid);
        assert_eq!(vr.drift, 2);
    }
}

#[test]
fn test_replay_is_caller_policy() {
    // The verifier keeps no state: the same code verifies twice unless the
    // caller advances its stored counter.
    let first = verify_code(RFC4226_SECRET, 0, "287082", 6, 1).unwrap();
    let again = verify_code(RFC4226_SECRET, 0, "287082", 6, 1).unwrap();
    assert_eq!(first, again);

    let stored = first.next_counter().unwrap();
    let replay = verify_code(RFC4226_SECRET, stored, "287082", 6, 1).unwrap();
    assert!(!replay.valid);
}

#[test]
fn test_verify_result_serialization() {
    let vr = verify_code(RFC4226_SECRET, 0, "359152", 6, 3).unwrap();
    let json = serde_json::to_string(&vr).unwrap();
    let back: VerifyResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, vr);
    assert_eq!(back.matched_counter, Some(2));
}

#[test]
fn test_identifier_helpers() {
    assert_eq!(nice_hash(&[&"form", &7]).len(), 32);
    let name = nice_username("someone@example.org", &mut StdRng::seed_from_u64(11));
    assert!(name.starts_with("someone_exampleorg_"));
}

#[test]
fn test_cli_reads_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "digits": 8, "lookAhead": 2 }}"#).unwrap();
    let path = file.path().to_str().unwrap();

    let args = Args::try_parse_from([
        "autoform-hotp", "--config", path,
        "verify", "--secret", "12345678901234567890",
        "--counter", "0", "--code", "37359152",
    ])
    .unwrap();
    let mut out = Vec::new();
    let code = cli::run(args, &mut out).unwrap();
    assert_eq!(code, 0);
    assert_eq!(String::from_utf8(out).unwrap(), "valid (counter 2, drift 2)\n");
}

#[test]
fn test_cli_rejects_invalid_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "digits": 3 }}"#).unwrap();
    let path = file.path().to_str().unwrap();

    let args = Args::try_parse_from([
        "autoform-hotp", "--config", path, "generate", "--secret", "k",
    ])
    .unwrap();
    let err = cli::run(args, &mut Vec::new()).unwrap_err();
    assert_eq!(err.kind, OtpErrorKind::InvalidConfig);
}

#[test]
fn test_config_round_trips_through_json() {
    let config = OtpConfig {
        digits: Digits::new(7).unwrap(),
        algorithm: Algorithm::Sha256,
        look_ahead: 4,
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(OtpConfig::from_json(&json).unwrap(), config);
}
