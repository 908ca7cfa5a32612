//! Error types for token operations.
//!
//! Messages never carry key material or token contents.

use thiserror::Error;

/// Errors that can occur while encoding or decoding tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature did not verify: wrong secret, altered token or disallowed algorithm.
    #[error("token signature is invalid")]
    InvalidSignature,

    /// Signature is valid but the token is past its expiry.
    #[error("token expired at {expired_at}")]
    Expired { expired_at: i64 },

    /// Signature is valid but the token is not valid yet.
    #[error("token is not valid before {not_before}")]
    NotYetValid { not_before: i64 },

    /// Token audience does not match the configured audience.
    #[error("token audience does not match")]
    InvalidAudience,

    /// Not a well-formed token.
    #[error("token is malformed: {0}")]
    Malformed(&'static str),

    /// Claims could not be encoded. Always a caller error.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Signing secret is unusable.
    #[error("invalid signing secret: {0}")]
    InvalidSecret(&'static str),

    /// IO error (reading secrets).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Payload-free tag of a [`TokenError`], for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenErrorKind {
    InvalidSignature,
    Expired,
    NotYetValid,
    InvalidAudience,
    Malformed,
    EncodingError,
    InvalidSecret,
    Io,
}

impl TokenError {
    pub fn kind(&self) -> TokenErrorKind {
        match self {
            TokenError::InvalidSignature => TokenErrorKind::InvalidSignature,
            TokenError::Expired { .. } => TokenErrorKind::Expired,
            TokenError::NotYetValid { .. } => TokenErrorKind::NotYetValid,
            TokenError::InvalidAudience => TokenErrorKind::InvalidAudience,
            TokenError::Malformed(_) => TokenErrorKind::Malformed,
            TokenError::EncodingError(_) => TokenErrorKind::EncodingError,
            TokenError::InvalidSecret(_) => TokenErrorKind::InvalidSecret,
            TokenError::Io(_) => TokenErrorKind::Io,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName => TokenError::InvalidSignature,
            ErrorKind::InvalidToken => TokenError::Malformed("expected three dot-separated segments"),
            ErrorKind::Base64(_) => TokenError::Malformed("segment is not valid base64url"),
            ErrorKind::Json(_) => TokenError::Malformed("segment is not a valid JSON object"),
            ErrorKind::Utf8(_) => TokenError::Malformed("segment is not valid UTF-8"),
            _ => TokenError::Malformed("token could not be decoded"),
        }
    }
}
