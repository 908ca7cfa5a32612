//! Cookie authentication policy.

use std::sync::Arc;

use chrono::Duration;
use crumb_core::{ConfigError, CookieConfig, PolicyConfig};
use crumb_token::{Claims, Clock, SigningSecret, TokenCodec, TokenError};

use crate::cookie::{self, HeaderPair, Lifetime, SET_COOKIE};
use crate::error::PolicyError;
use crate::identity::Identity;
use crate::request::CookieSource;

/// The interface a framework adapter plugs into.
///
/// Implementations hold no per-request state and can be shared across
/// threads.
pub trait AuthenticationPolicy: Send + Sync {
    /// Headers that make the client present `principal` on later requests.
    ///
    /// Fails only on caller errors while encoding `extra_claims`.
    fn remember(
        &self,
        request: &dyn CookieSource,
        principal: &str,
        extra_claims: &Claims,
    ) -> Result<Vec<HeaderPair>, TokenError>;

    /// Headers that make the client drop its credentials.
    fn forget(&self, request: &dyn CookieSource) -> Vec<HeaderPair>;

    /// Resolve the request to an identity. Never fails: anything short of a
    /// currently valid token is [`Identity::Unauthenticated`].
    fn get_claims(&self, request: &dyn CookieSource) -> Identity;
}

/// Issues and reads signed tokens carried in a cookie.
#[derive(Debug, Clone)]
pub struct CookieAuthPolicy {
    codec: TokenCodec,
    cookie: CookieConfig,
    expiration: Option<Duration>,
    max_age: Option<u64>,
    reissue_time: Option<Duration>,
}

impl CookieAuthPolicy {
    /// Build a policy signing with `secret`.
    pub fn new(secret: SigningSecret, config: PolicyConfig) -> Result<Self, PolicyError> {
        config.validate()?;

        let expiration = config
            .expiration
            .map(|secs| seconds("expiration", secs))
            .transpose()?;
        let reissue_time = config
            .reissue_time
            .map(|secs| seconds("reissue_time", secs))
            .transpose()?;

        let codec = TokenCodec::from_config(&secret, &config);
        let max_age = config.cookie_max_age();

        tracing::debug!(
            algorithm = %config.algorithm,
            cookie = %config.cookie.name,
            expiration = ?config.expiration,
            https_only = config.cookie.https_only,
            "Cookie authentication policy ready"
        );

        Ok(Self {
            codec,
            cookie: config.cookie,
            expiration,
            max_age,
            reissue_time,
        })
    }

    /// Build a policy whose secret comes from `secret_env` or `secret_file`.
    pub fn from_config(config: PolicyConfig) -> Result<Self, PolicyError> {
        let secret = config.resolve_secret()?.ok_or(PolicyError::MissingSecret)?;
        Self::new(SigningSecret::new(secret)?, config)
    }

    /// Replace the time source used for issuing, expiry and reissue checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.codec = self.codec.with_clock(clock);
        self
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie.name
    }

    /// Decode the request's cookie, keeping the failure reason.
    ///
    /// `Ok(None)` means no (or an empty) cookie was sent. Use
    /// [`AuthenticationPolicy::get_claims`] for authentication decisions.
    pub fn decode_request(&self, request: &dyn CookieSource) -> Result<Option<Claims>, TokenError> {
        match request.cookie(&self.cookie.name) {
            None | Some("") => Ok(None),
            Some(token) => self.codec.decode(token).map(Some),
        }
    }

    /// Fresh cookie headers for a request whose token is valid but older than
    /// `reissue_time`, carrying the same principal and custom claims.
    ///
    /// `None` when reissue is disabled, the request is unauthenticated, the
    /// token lacks `iat`, or the token is still young.
    pub fn reissue(&self, request: &dyn CookieSource) -> Option<Vec<HeaderPair>> {
        let reissue_time = self.reissue_time?;
        let claims = self.get_claims(request).into_claims();
        let principal = claims.subject()?;
        let issued_at = claims.issued_at()?;

        let age = self.codec.clock().now().timestamp().saturating_sub(issued_at);
        if age < reissue_time.num_seconds() {
            return None;
        }

        match self.remember(request, principal, &claims.without_reserved()) {
            Ok(headers) => {
                tracing::debug!(cookie = %self.cookie.name, age, "Reissued authentication cookie");
                Some(headers)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to reissue authentication cookie");
                None
            }
        }
    }
}

impl AuthenticationPolicy for CookieAuthPolicy {
    fn remember(
        &self,
        _request: &dyn CookieSource,
        principal: &str,
        extra_claims: &Claims,
    ) -> Result<Vec<HeaderPair>, TokenError> {
        // One clock read, so `exp` and `Expires` agree.
        let now = self.codec.clock().now();
        let token = self
            .codec
            .encode_at(now, principal, extra_claims, self.expiration)?;

        let lifetime = self.max_age.map(|secs| Lifetime::from_now(now, secs));

        Ok(vec![(
            SET_COOKIE,
            cookie::render_set_cookie(&self.cookie, &token, lifetime),
        )])
    }

    fn forget(&self, _request: &dyn CookieSource) -> Vec<HeaderPair> {
        vec![cookie::expire_cookie(&self.cookie)]
    }

    fn get_claims(&self, request: &dyn CookieSource) -> Identity {
        match self.decode_request(request) {
            Ok(Some(claims)) => {
                tracing::trace!(cookie = %self.cookie.name, "Authenticated request");
                Identity::Authenticated(claims)
            }
            Ok(None) => Identity::Unauthenticated,
            Err(e) => {
                tracing::debug!(
                    cookie = %self.cookie.name,
                    kind = ?e.kind(),
                    "Rejected authentication cookie"
                );
                Identity::Unauthenticated
            }
        }
    }
}

fn seconds(field: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or(ConfigError::Invalid {
            field,
            reason: "out of range".to_string(),
        })
}
