//! Integration tests for the token codec.
//!
//! Run with: cargo test --package crumb-token --test codec_properties

use std::sync::Arc;
use std::thread;

use chrono::Duration;
use crumb_core::SigningAlgorithm;
use crumb_token::{Claims, ManualClock, SigningSecret, TokenCodec, TokenErrorKind};

const START: i64 = 1_700_000_000;

fn codec(secret: &str) -> TokenCodec {
    TokenCodec::new(&SigningSecret::new(secret).unwrap(), SigningAlgorithm::Hs256)
}

/// Every principal comes back as `sub`, under every supported algorithm.
#[test]
fn test_round_trip_preserves_principal() {
    let principals = [
        uuid::Uuid::new_v4().to_string(),
        "alice".to_string(),
        "user:42@example.com".to_string(),
        "ünïcödé / 名前".to_string(),
        "with; semicolons, and = signs".to_string(),
        String::new(),
    ];

    for algorithm in [
        SigningAlgorithm::Hs256,
        SigningAlgorithm::Hs384,
        SigningAlgorithm::Hs512,
    ] {
        let codec = TokenCodec::new(&SigningSecret::generate(), algorithm);
        for principal in &principals {
            let token = codec.encode(principal, &Claims::new(), None).unwrap();
            let claims = codec.decode(&token).unwrap();
            assert_eq!(claims.subject(), Some(principal.as_str()));
        }
    }
}

/// Tokens only contain characters that are legal in a cookie value.
#[test]
fn test_tokens_are_cookie_safe() {
    let codec = codec("secret");
    let extra = Claims::new()
        .with("note", "spaces; semicolons, \"quotes\" and \\ backslashes")
        .with("n", 42);
    let token = codec.encode("ünïcödé", &extra, Some(Duration::hours(1))).unwrap();
    assert!(
        token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.'),
        "token contains characters unsafe for a cookie value"
    );
}

/// Decoding with a different secret never succeeds.
#[test]
fn test_different_secret_always_fails() {
    for _ in 0..16 {
        let signer = TokenCodec::new(&SigningSecret::generate(), SigningAlgorithm::Hs256);
        let verifier = TokenCodec::new(&SigningSecret::generate(), SigningAlgorithm::Hs256);
        let token = signer.encode("alice", &Claims::new(), None).unwrap();
        let err = verifier.decode(&token).unwrap_err();
        assert_eq!(err.kind(), TokenErrorKind::InvalidSignature);
    }
}

/// Changing any single character of the token breaks it.
#[test]
fn test_any_alteration_fails() {
    let codec = codec("secret");
    let token = codec
        .encode("alice", &Claims::new().with("role", "user"), None)
        .unwrap();

    for (idx, original) in token.char_indices() {
        if original == '.' {
            continue;
        }
        let replacement = if original == 'A' { 'B' } else { 'A' };
        let mut tampered = token.clone();
        tampered.replace_range(idx..idx + 1, &replacement.to_string());

        // The MAC covers the encoded text, so even padding-bit flips fail.
        assert!(codec.decode(&tampered).is_err(), "altered at byte {}", idx);
    }
}

/// A forged payload signed with nothing is rejected.
#[test]
fn test_forged_payload_rejected() {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let codec = codec("secret");
    let token = codec.encode("alice", &Claims::new(), None).unwrap();
    let mut parts: Vec<&str> = token.split('.').collect();

    let forged = URL_SAFE_NO_PAD.encode(br#"{"sub":"admin"}"#);
    parts[1] = &forged;
    let forged_token = parts.join(".");

    let err = codec.decode(&forged_token).unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::InvalidSignature);

    let unsigned = format!(
        "{}.{}.",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#),
        forged
    );
    assert!(codec.decode(&unsigned).is_err());
}

/// Valid strictly before `issue + E`, rejected from `issue + E` onwards.
#[test]
fn test_expiration_window() {
    for expiration in [1i64, 2, 60, 3600] {
        let clock = Arc::new(ManualClock::at_timestamp(START));
        let codec = codec("secret").with_clock(clock.clone());
        let token = codec
            .encode("alice", &Claims::new(), Some(Duration::seconds(expiration)))
            .unwrap();

        clock.set(chrono::DateTime::from_timestamp(START + expiration - 1, 0).unwrap());
        assert!(codec.decode(&token).is_ok(), "E={} at t=E-1", expiration);

        clock.set(chrono::DateTime::from_timestamp(START + expiration, 0).unwrap());
        assert_eq!(
            codec.decode(&token).unwrap_err().kind(),
            TokenErrorKind::Expired,
            "E={} at t=E",
            expiration
        );

        clock.advance(Duration::days(365));
        assert_eq!(codec.decode(&token).unwrap_err().kind(), TokenErrorKind::Expired);
    }
}

/// Without an expiration a token stays valid indefinitely.
#[test]
fn test_non_expiring_token() {
    let clock = Arc::new(ManualClock::at_timestamp(START));
    let codec = codec("secret").with_clock(clock.clone());
    let token = codec.encode("alice", &Claims::new(), None).unwrap();

    clock.advance(Duration::days(365 * 50));
    let claims = codec.decode(&token).unwrap();
    assert_eq!(claims.subject(), Some("alice"));
    assert!(!claims.contains("exp"));
}

/// One codec serves many threads at once.
#[test]
fn test_codec_shared_across_threads() {
    let codec = Arc::new(codec("secret"));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let codec = Arc::clone(&codec);
            thread::spawn(move || {
                for j in 0..50 {
                    let principal = format!("user-{}-{}", i, j);
                    let token = codec
                        .encode(&principal, &Claims::new(), Some(Duration::minutes(5)))
                        .unwrap();
                    assert_eq!(
                        codec.decode(&token).unwrap().subject(),
                        Some(principal.as_str())
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
