//! Token encoding and verification.
//!
//! Tokens are compact JWS strings (`header.payload.signature`, base64url),
//! which makes them safe to use directly as cookie values.
//!
//! `jsonwebtoken` only verifies structure, algorithm and signature here. Every
//! time-based and audience check runs against the codec's [`Clock`] so expiry
//! can be tested without sleeping, and so that a token is already expired at
//! the exact second named by its `exp` claim.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use crumb_core::{PolicyConfig, SigningAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;

use crate::claims::{AUDIENCE, Claims, EXPIRES_AT, ISSUED_AT, NOT_BEFORE, SUBJECT};
use crate::clock::{Clock, SystemClock};
use crate::error::TokenError;
use crate::secret::SigningSecret;

/// Encodes claims into signed tokens and decodes them back.
///
/// Immutable once built; share it freely between threads.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: SigningAlgorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    leeway: i64,
    audience: Option<String>,
    default_claims: Claims,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec signing with `secret` under `algorithm`, reading the
    /// system clock.
    pub fn new(secret: &SigningSecret, algorithm: SigningAlgorithm) -> Self {
        let mut validation = Validation::new(jwt_algorithm(algorithm));
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            leeway: 0,
            audience: None,
            default_claims: Claims::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Create a codec from the signing-related parts of a policy config.
    pub fn from_config(secret: &SigningSecret, config: &PolicyConfig) -> Self {
        let mut codec = Self::new(secret, config.algorithm)
            .with_leeway(config.leeway)
            .with_default_claims(Claims::from(config.default_claims.clone()));
        if let Some(audience) = &config.audience {
            codec = codec.with_audience(audience.clone());
        }
        codec
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Tolerate this many seconds of clock skew on `exp` and `nbf`.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = i64::try_from(seconds).unwrap_or(i64::MAX);
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_default_claims(mut self, claims: Claims) -> Self {
        self.default_claims = claims;
        self
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Encode a token for `principal`.
    ///
    /// Claim precedence, lowest first: default claims, `extra_claims`, then
    /// the codec-owned `sub`, `iat`, `aud` and (when `expiration` is given)
    /// `exp`. Without an expiration a caller-supplied `exp` is kept and
    /// enforced on decode.
    ///
    /// Only fails on caller errors, such as a non-integer `exp`/`nbf` claim or
    /// an expiration that overflows the timestamp range.
    pub fn encode(
        &self,
        principal: &str,
        extra_claims: &Claims,
        expiration: Option<Duration>,
    ) -> Result<String, TokenError> {
        self.encode_at(self.clock.now(), principal, extra_claims, expiration)
    }

    /// Like [`encode`](Self::encode), but issued at `issued_at` instead of
    /// the clock's current time.
    pub fn encode_at(
        &self,
        issued_at: DateTime<Utc>,
        principal: &str,
        extra_claims: &Claims,
        expiration: Option<Duration>,
    ) -> Result<String, TokenError> {
        let now = issued_at.timestamp();

        let mut claims = self.default_claims.clone();
        claims.merge(extra_claims);
        claims.insert(SUBJECT, principal);
        claims.insert(ISSUED_AT, now);

        if let Some(expiration) = expiration {
            let expires_at = now.checked_add(expiration.num_seconds()).ok_or_else(|| {
                TokenError::EncodingError("expiration is out of range".to_string())
            })?;
            claims.insert(EXPIRES_AT, expires_at);
        }

        if let Some(audience) = &self.audience {
            claims.insert(AUDIENCE, audience.clone());
        }

        for name in [EXPIRES_AT, NOT_BEFORE] {
            if claims.get(name).is_some_and(|v| v.as_i64().is_none()) {
                return Err(TokenError::EncodingError(format!(
                    "claim '{}' must be integer epoch seconds",
                    name
                )));
            }
        }

        let token = jsonwebtoken::encode(
            &Header::new(jwt_algorithm(self.algorithm)),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| TokenError::EncodingError(e.to_string()))?;

        tracing::trace!(
            algorithm = %self.algorithm,
            expires_at = ?claims.expires_at(),
            "Issued token"
        );

        Ok(token)
    }

    /// Verify a token and return its claims.
    ///
    /// Checks, in order: structure and signature, claim shapes, `nbf`, `exp`,
    /// then audience.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        self.validate_claims(&data.claims)?;
        Ok(data.claims)
    }

    fn validate_claims(&self, claims: &Claims) -> Result<(), TokenError> {
        for name in [EXPIRES_AT, NOT_BEFORE, ISSUED_AT] {
            if claims.get(name).is_some_and(|v| v.as_i64().is_none()) {
                return Err(TokenError::Malformed("time claims must be integer epoch seconds"));
            }
        }
        if claims.get(SUBJECT).is_some_and(|v| !v.is_string()) {
            return Err(TokenError::Malformed("subject must be a string"));
        }

        let now = self.clock.now().timestamp();

        if let Some(not_before) = claims.not_before()
            && now.saturating_add(self.leeway) < not_before
        {
            return Err(TokenError::NotYetValid { not_before });
        }

        // Inclusive: at `exp` itself the token is already expired.
        if let Some(expired_at) = claims.expires_at()
            && now >= expired_at.saturating_add(self.leeway)
        {
            return Err(TokenError::Expired { expired_at });
        }

        if let Some(expected) = &self.audience {
            let matches = match claims.get(AUDIENCE) {
                Some(Value::String(aud)) => aud == expected,
                Some(Value::Array(auds)) => auds.iter().any(|a| a.as_str() == Some(expected)),
                _ => false,
            };
            if !matches {
                return Err(TokenError::InvalidAudience);
            }
        }

        Ok(())
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("leeway", &self.leeway)
            .field("audience", &self.audience)
            .field("default_claims", &self.default_claims)
            .finish_non_exhaustive()
    }
}

fn jwt_algorithm(algorithm: SigningAlgorithm) -> Algorithm {
    match algorithm {
        SigningAlgorithm::Hs256 => Algorithm::HS256,
        SigningAlgorithm::Hs384 => Algorithm::HS384,
        SigningAlgorithm::Hs512 => Algorithm::HS512,
    }
}

/// Decode a token without verifying it (for debugging).
///
/// The result must never be used to make an authentication decision.
pub fn inspect_token_unverified(token: &str) -> Result<TokenInfo, TokenError> {
    let header = jsonwebtoken::decode_header(token)?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;

    Ok(TokenInfo {
        algorithm: format!("{:?}", header.alg),
        claims: data.claims,
    })
}

/// Information about a token (for inspection).
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// Algorithm named in the token header.
    pub algorithm: String,
    /// Claims as found in the payload, unverified.
    pub claims: Claims,
}
