//! Cookie transport configuration.
//!
//! Describes the attributes of the cookie that carries the signed token.
//! `HttpOnly` is deliberately absent: it is always emitted.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ConfigError;

/// Default name of the authentication cookie.
pub const DEFAULT_COOKIE_NAME: &str = "auth_token";

/// Attributes of the authentication cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CookieConfig {
    /// Cookie name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Explicit `Max-Age` in seconds. Falls back to the policy expiration.
    #[serde(default)]
    pub max_age: Option<u64>,

    /// Whether the `secure` attribute is emitted.
    #[serde(default = "default_true")]
    pub https_only: bool,

    /// Cookie path.
    #[serde(default = "default_path")]
    pub path: String,

    /// Cookie domain.
    #[serde(default)]
    pub domain: Option<String>,

    /// `SameSite` attribute, omitted when unset.
    #[serde(default)]
    pub same_site: Option<SameSite>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            max_age: None,
            https_only: true,
            path: default_path(),
            domain: None,
            same_site: None,
        }
    }
}

impl CookieConfig {
    /// Check that every attribute can be written into a `Set-Cookie` header
    /// without breaking its structure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_cookie_token(&self.name) {
            return Err(ConfigError::invalid(
                "cookie.name",
                "must be a non-empty token without separators or control characters",
            ));
        }

        if self.path.is_empty() || !is_attribute_value(&self.path) {
            return Err(ConfigError::invalid(
                "cookie.path",
                "must be non-empty and free of ';', ',', whitespace and control characters",
            ));
        }

        if let Some(domain) = &self.domain
            && (domain.is_empty() || !is_attribute_value(domain))
        {
            return Err(ConfigError::invalid(
                "cookie.domain",
                "must be non-empty and free of ';', ',', whitespace and control characters",
            ));
        }

        Ok(())
    }
}

/// `SameSite` cookie attribute values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RFC 6265 `token`: visible ASCII minus separators.
fn is_cookie_token(s: &str) -> bool {
    const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={} \t";
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_graphic() && !SEPARATORS.contains(&b))
}

fn is_attribute_value(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_graphic() && b != b';' && b != b',')
}

fn default_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

fn default_path() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}
