//! Configuration types for crumb.
//!
//! A policy is described by a [`PolicyConfig`], usually loaded from a
//! `crumb.yaml` file. The signing secret never lives in the file itself: the
//! config only names the environment variable or file it is read from.
//!
//! ```yaml
//! algorithm: HS256
//! expiration: 3600
//! secret_env: CRUMB_SECRET
//! cookie:
//!   name: auth
//!   https_only: true
//! ```

pub mod algorithm;
pub mod cookie;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub use algorithm::SigningAlgorithm;
pub use cookie::{CookieConfig, DEFAULT_COOKIE_NAME, SameSite};

/// Longest accepted token or cookie lifetime, in seconds (100 years).
///
/// Keeps every `Expires` date a four-digit-year HTTP date.
pub const MAX_LIFETIME_SECONDS: u64 = 100 * 366 * 86_400;

/// Complete policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PolicyConfig {
    /// HMAC scheme used to sign tokens.
    #[serde(default)]
    pub algorithm: SigningAlgorithm,

    /// Token lifetime in seconds. `None` issues tokens that never expire.
    #[serde(default)]
    pub expiration: Option<u64>,

    /// Clock skew tolerance in seconds, applied to `exp` and `nbf`.
    #[serde(default)]
    pub leeway: u64,

    /// Audience written into and required from every token.
    #[serde(default)]
    pub audience: Option<String>,

    /// Age in seconds after which a still-valid token is reissued.
    #[serde(default)]
    pub reissue_time: Option<u64>,

    /// Claims merged into every token beneath the caller's extra claims.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub default_claims: Map<String, Value>,

    /// Environment variable holding the signing secret.
    #[serde(default)]
    pub secret_env: Option<String>,

    /// File holding the signing secret.
    #[serde(default)]
    pub secret_file: Option<PathBuf>,

    /// Cookie attributes.
    #[serde(default)]
    pub cookie: CookieConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration for '{field}': {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl PolicyConfig {
    /// Load configuration from a YAML file.
    ///
    /// A relative `secret_file` is resolved against the directory holding the
    /// config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&content)?;

        if let Some(secret_file) = &config.secret_file
            && secret_file.is_relative()
        {
            let base_dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            config.secret_file = Some(base_dir.join(secret_file));
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Check the configuration for values that cannot produce a working policy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cookie.validate()?;

        if self.expiration == Some(0) {
            return Err(ConfigError::invalid(
                "expiration",
                "must be at least one second; omit it for non-expiring tokens",
            ));
        }

        if self.expiration.is_some_and(|secs| secs > MAX_LIFETIME_SECONDS) {
            return Err(ConfigError::invalid(
                "expiration",
                format!("must be at most {} seconds", MAX_LIFETIME_SECONDS),
            ));
        }

        if self.cookie.max_age.is_some_and(|secs| secs > MAX_LIFETIME_SECONDS) {
            return Err(ConfigError::invalid(
                "cookie.max_age",
                format!("must be at most {} seconds", MAX_LIFETIME_SECONDS),
            ));
        }

        if self.reissue_time == Some(0) {
            return Err(ConfigError::invalid("reissue_time", "must be at least one second"));
        }

        if let Some(audience) = &self.audience
            && audience.is_empty()
        {
            return Err(ConfigError::invalid("audience", "must not be empty"));
        }

        Ok(())
    }

    /// Resolve the signing secret from the environment or a file.
    ///
    /// The environment variable wins when both are configured. Returns
    /// `Ok(None)` when neither source yields a value.
    pub fn resolve_secret(&self) -> Result<Option<String>, std::io::Error> {
        // Try environment variable first
        if let Some(env_var) = &self.secret_env
            && let Ok(secret) = std::env::var(env_var)
            && !secret.is_empty()
        {
            return Ok(Some(secret));
        }

        // Try file path
        if let Some(path) = &self.secret_file
            && path.exists()
        {
            let secret = fs::read_to_string(path)?;
            let secret = secret.trim();
            if !secret.is_empty() {
                return Ok(Some(secret.to_string()));
            }
        }

        Ok(None)
    }

    /// The cookie lifetime in seconds: the explicit `max_age`, else the token
    /// expiration.
    pub fn cookie_max_age(&self) -> Option<u64> {
        self.cookie.max_age.or(self.expiration)
    }

    pub fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_expiration(mut self, seconds: u64) -> Self {
        self.expiration = Some(seconds);
        self
    }

    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_reissue_time(mut self, seconds: u64) -> Self {
        self.reissue_time = Some(seconds);
        self
    }

    pub fn with_default_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_claims.insert(key.into(), value.into());
        self
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie.name = name.into();
        self
    }

    pub fn with_https_only(mut self, https_only: bool) -> Self {
        self.cookie.https_only = https_only;
        self
    }

    pub fn with_cookie_path(mut self, path: impl Into<String>) -> Self {
        self.cookie.path = path.into();
        self
    }

    pub fn with_cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie.domain = Some(domain.into());
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.cookie.same_site = Some(same_site);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = PolicyConfig::default();
        assert_eq!(config.algorithm, SigningAlgorithm::Hs256);
        assert!(config.expiration.is_none());
        assert_eq!(config.leeway, 0);
        assert!(config.audience.is_none());
        assert!(config.reissue_time.is_none());
        assert!(config.default_claims.is_empty());
        assert_eq!(config.cookie.name, DEFAULT_COOKIE_NAME);
        assert!(config.cookie.https_only);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
algorithm: HS512
expiration: 3600
leeway: 5
audience: web
reissue_time: 600
default_claims:
  scope: read
secret_env: MY_SECRET
cookie:
  name: auth
  https_only: false
  domain: example.com
"#;
        let config = PolicyConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.algorithm, SigningAlgorithm::Hs512);
        assert_eq!(config.expiration, Some(3600));
        assert_eq!(config.leeway, 5);
        assert_eq!(config.audience.as_deref(), Some("web"));
        assert_eq!(config.reissue_time, Some(600));
        assert_eq!(config.default_claims.get("scope"), Some(&Value::from("read")));
        assert_eq!(config.secret_env.as_deref(), Some("MY_SECRET"));
        assert_eq!(config.cookie.name, "auth");
        assert!(!config.cookie.https_only);
        assert_eq!(config.cookie.path, "/");
        assert_eq!(config.cookie.domain.as_deref(), Some("example.com"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = PolicyConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, PolicyConfig::default());
    }

    #[test]
    fn test_zero_expiration_rejected() {
        let config = PolicyConfig::default().with_expiration(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "expiration", .. })
        ));
    }

    #[test]
    fn test_lifetime_cap() {
        let config = PolicyConfig::default().with_expiration(MAX_LIFETIME_SECONDS);
        assert!(config.validate().is_ok());

        let config = PolicyConfig::default().with_expiration(MAX_LIFETIME_SECONDS + 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "expiration", .. })
        ));

        let mut config = PolicyConfig::default();
        config.cookie.max_age = Some(MAX_LIFETIME_SECONDS);
        assert!(config.validate().is_ok());
        config.cookie.max_age = Some(9_000_000_000_000);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "cookie.max_age", .. })
        ));
    }

    #[test]
    fn test_cookie_max_age_falls_back_to_expiration() {
        let config = PolicyConfig::default().with_expiration(100);
        assert_eq!(config.cookie_max_age(), Some(100));

        let mut config = config;
        config.cookie.max_age = Some(30);
        assert_eq!(config.cookie_max_age(), Some(30));

        assert_eq!(PolicyConfig::default().cookie_max_age(), None);
    }

    #[test]
    fn test_resolve_secret_from_env() {
        // SAFETY: We're in a test and controlling the environment
        unsafe {
            std::env::set_var("CRUMB_CORE_TEST_SECRET", "from-env");
        }

        let config = PolicyConfig {
            secret_env: Some("CRUMB_CORE_TEST_SECRET".to_string()),
            secret_file: Some(PathBuf::from("/nonexistent/secret")),
            ..PolicyConfig::default()
        };
        assert_eq!(config.resolve_secret().unwrap().as_deref(), Some("from-env"));
    }

    #[test]
    fn test_resolve_secret_missing() {
        let config = PolicyConfig {
            secret_env: Some("CRUMB_CORE_TEST_SECRET_UNSET".to_string()),
            ..PolicyConfig::default()
        };
        assert!(config.resolve_secret().unwrap().is_none());
    }

    #[test]
    fn test_load_resolves_relative_secret_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("secret.key"), "from-file\n").unwrap();
        fs::write(
            dir.path().join("crumb.yaml"),
            "expiration: 60\nsecret_file: secret.key\n",
        )
        .unwrap();

        let config = PolicyConfig::load(dir.path().join("crumb.yaml")).unwrap();
        assert_eq!(config.secret_file, Some(dir.path().join("secret.key")));
        assert_eq!(config.resolve_secret().unwrap().as_deref(), Some("from-file"));
    }

    #[test]
    fn test_load_rejects_invalid_cookie() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("crumb.yaml"), "cookie:\n  name: \"bad name\"\n").unwrap();
        assert!(PolicyConfig::load(dir.path().join("crumb.yaml")).is_err());
    }
}
