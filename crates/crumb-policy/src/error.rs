//! Error types for building a policy.

use crumb_core::ConfigError;
use crumb_token::TokenError;
use thiserror::Error;

/// Errors raised while constructing a policy or issuing a cookie.
///
/// Identifying a request never produces one of these.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Neither `secret_env` nor `secret_file` yielded a secret.
    #[error("no signing secret configured: set secret_env or secret_file")]
    MissingSecret,

    /// Token or secret error.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// IO error (reading the secret).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
