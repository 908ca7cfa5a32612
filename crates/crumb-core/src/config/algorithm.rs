//! Signing algorithm selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HMAC scheme used to sign tokens.
///
/// Only symmetric schemes are representable: a policy signs and verifies with
/// the same secret.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
    /// HMAC using SHA-256.
    #[default]
    #[serde(rename = "HS256")]
    Hs256,
    /// HMAC using SHA-384.
    #[serde(rename = "HS384")]
    Hs384,
    /// HMAC using SHA-512.
    #[serde(rename = "HS512")]
    Hs512,
}

impl SigningAlgorithm {
    /// The JOSE name of the algorithm, as written into token headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningAlgorithm::Hs256 => "HS256",
            SigningAlgorithm::Hs384 => "HS384",
            SigningAlgorithm::Hs512 => "HS512",
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HS256" => Ok(SigningAlgorithm::Hs256),
            "HS384" => Ok(SigningAlgorithm::Hs384),
            "HS512" => Ok(SigningAlgorithm::Hs512),
            other => Err(format!("unsupported signing algorithm '{}'", other)),
        }
    }
}
