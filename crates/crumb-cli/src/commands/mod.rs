//! CLI command implementations for crumb.

pub mod cookie;
pub mod keys;
pub mod token;

use anyhow::Context;
use crumb_core::PolicyConfig;
use crumb_token::{Claims, SigningSecret};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::PolicyArgs;

/// Load the policy config, or the defaults when no file is given.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<PolicyConfig> {
    match path {
        Some(path) => PolicyConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(PolicyConfig::default()),
    }
}

/// Resolve the signing secret and policy config from the shared flags.
///
/// `--secret` (or `CRUMB_SECRET`) may be a path to a file holding the secret
/// or the secret itself. Without it, the config's `secret_env`/`secret_file`
/// are consulted.
pub(crate) fn load_policy(args: &PolicyArgs) -> anyhow::Result<(SigningSecret, PolicyConfig)> {
    let config = load_config(args.config.as_deref())?;

    let secret = match &args.secret {
        Some(value) => resolve_secret(value)?,
        None => {
            tracing::debug!(
                secret_env = ?config.secret_env,
                secret_file = ?config.secret_file,
                "No --secret given, resolving from config"
            );
            let secret = config
                .resolve_secret()
                .context("Failed to read the configured signing secret")?
                .context(
                    "Signing secret not provided. Pass --secret <value|path>, set CRUMB_SECRET, \
                     or configure secret_env/secret_file",
                )?;
            SigningSecret::new(secret)?
        }
    };

    Ok((secret, config))
}

/// Resolve a secret from either a file path or the literal value.
fn resolve_secret(value: &str) -> anyhow::Result<SigningSecret> {
    let path = Path::new(value);
    if path.exists() {
        tracing::debug!(path = %path.display(), "Loading signing secret from file");
        return SigningSecret::load_from_file(path)
            .with_context(|| format!("Failed to load secret from file: {}", path.display()));
    }

    tracing::debug!("Using literal signing secret");
    SigningSecret::new(value.trim()).context("Signing secret must not be empty")
}

/// Read a token from a file when the argument names one, else use it as-is.
pub(crate) fn read_token(token: &str) -> anyhow::Result<String> {
    let path = Path::new(token);
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read token from {}", path.display()))?;
        return Ok(content.trim().to_string());
    }
    Ok(token.trim().to_string())
}

/// Parse `key=value` pairs into claims. Values are JSON when they parse as
/// JSON, otherwise plain strings.
pub(crate) fn parse_claims(pairs: &[String]) -> anyhow::Result<Claims> {
    let mut claims = Claims::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("Invalid claim '{}': expected key=value", pair))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Invalid claim '{}': key must not be empty", pair);
        }
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::from(raw));
        claims.insert(key, value);
    }
    Ok(claims)
}
