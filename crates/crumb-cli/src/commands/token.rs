//! Token commands.
//!
//! `crumb token mint` - Mint a signed token for a principal.
//! `crumb token verify` - Verify a token and print its claims.
//! `crumb token inspect` - Decode a token without verifying it.

use anyhow::Context;
use chrono::Duration;
use crumb_token::{Claims, TokenCodec, inspect_token_unverified};
use std::fs;
use std::path::PathBuf;

use super::{load_policy, parse_claims, read_token};
use crate::PolicyArgs;

/// Parse a duration string like "30m", "24h", "7d" or "90s".
///
/// A bare number is taken as seconds.
pub(crate) fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim().to_lowercase();

    let (amount, unit_seconds) = if let Some(days) = s.strip_suffix('d') {
        (days, 86_400)
    } else if let Some(hours) = s.strip_suffix('h') {
        (hours, 3_600)
    } else if let Some(minutes) = s.strip_suffix('m') {
        (minutes, 60)
    } else if let Some(seconds) = s.strip_suffix('s') {
        (seconds, 1)
    } else {
        (s.as_str(), 1)
    };

    let amount: i64 = amount
        .trim()
        .parse()
        .with_context(|| format!("Invalid duration '{}': expected e.g. 30m, 1h, 7d", s))?;
    if amount <= 0 {
        anyhow::bail!("Invalid duration '{}': must be positive", s);
    }

    amount
        .checked_mul(unit_seconds)
        .and_then(Duration::try_seconds)
        .with_context(|| format!("Invalid duration '{}': out of range", s))
}

/// Mint a new token.
pub fn mint(
    policy: &PolicyArgs,
    sub: &str,
    expires: Option<&str>,
    claims: &[String],
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (secret, config) = load_policy(policy)?;
    let codec = TokenCodec::from_config(&secret, &config);
    let extra = parse_claims(claims)?;

    let expiration = match expires {
        Some(e) => Some(parse_duration(e)?),
        None => config
            .expiration
            .map(|secs| {
                i64::try_from(secs)
                    .ok()
                    .and_then(Duration::try_seconds)
                    .context("Configured expiration is out of range")
            })
            .transpose()?,
    };

    let token = codec.encode(sub, &extra, expiration)?;

    if let Some(output_path) = output {
        fs::write(&output_path, &token)?;
        println!("✔ Token written to: {}", output_path.display());
        println!("  Subject: {}", sub);
        println!("  Algorithm: {}", codec.algorithm());
        match expiration {
            Some(d) => println!("  Expires in: {}s", d.num_seconds()),
            None => println!("  Expires: never"),
        }
    } else {
        println!("{}", token);
    }

    Ok(())
}

/// Verify a token, printing its claims as JSON.
///
/// Any verification failure is returned as an error so the process exits
/// non-zero.
pub fn verify(policy: &PolicyArgs, token: &str) -> anyhow::Result<Claims> {
    let (secret, config) = load_policy(policy)?;
    let codec = TokenCodec::from_config(&secret, &config);
    let token = read_token(token)?;

    match codec.decode(&token) {
        Ok(claims) => {
            eprintln!("✔ Token is valid");
            println!("{}", serde_json::to_string_pretty(&claims)?);
            Ok(claims)
        }
        Err(e) => {
            tracing::debug!(kind = ?e.kind(), "Token rejected");
            eprintln!("✖ Token verification failed: {}", e);
            Err(anyhow::Error::new(e).context("Token verification failed"))
        }
    }
}

/// Inspect a token without verification.
pub fn inspect(token: &str) -> anyhow::Result<()> {
    let token = read_token(token)?;
    let info = inspect_token_unverified(&token)?;

    println!("Token Information (signature NOT verified):");
    println!("  Algorithm: {}", info.algorithm);
    println!();
    println!("{}", serde_json::to_string_pretty(&info.claims)?);

    Ok(())
}
