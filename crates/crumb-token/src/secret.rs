//! Signing secret management.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use std::fmt;
use std::path::Path;

use crate::error::TokenError;

/// Number of random bytes in a generated secret.
pub const GENERATED_SECRET_BYTES: usize = 32;

/// The shared HMAC key that signs and verifies tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl SigningSecret {
    /// Wrap raw key bytes. Empty secrets are rejected.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(TokenError::InvalidSecret("secret must not be empty"));
        }
        Ok(Self { bytes })
    }

    /// Generate a new random secret.
    ///
    /// The key is the URL-safe base64 text of 32 random bytes, so it can be
    /// stored in env vars and files as-is.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let mut raw = [0u8; GENERATED_SECRET_BYTES];
        rng.fill_bytes(&mut raw);

        Self {
            bytes: URL_SAFE_NO_PAD.encode(raw).into_bytes(),
        }
    }

    /// Load a secret from a file, ignoring surrounding whitespace.
    pub fn load_from_file(path: &Path) -> Result<Self, TokenError> {
        let content = std::fs::read_to_string(path)?;
        Self::new(content.trim())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The secret as text, when it is valid UTF-8.
    pub fn expose_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningSecret([REDACTED])")
    }
}

impl TryFrom<&str> for SigningSecret {
    type Error = TokenError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for SigningSecret {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
