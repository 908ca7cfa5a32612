//! Outcome of identifying a request.

use crumb_token::Claims;

/// Whether a request carries a currently valid token.
///
/// "Not logged in" is a normal value here, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    /// A valid token was presented; these are its claims.
    Authenticated(Claims),
    /// No cookie, or a cookie whose token is expired, tampered or malformed.
    Unauthenticated,
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    /// The `sub` claim of an authenticated request.
    pub fn principal(&self) -> Option<&str> {
        self.claims().and_then(Claims::subject)
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Identity::Authenticated(claims) => Some(claims),
            Identity::Unauthenticated => None,
        }
    }

    /// The claims, or an empty set when unauthenticated.
    pub fn into_claims(self) -> Claims {
        match self {
            Identity::Authenticated(claims) => claims,
            Identity::Unauthenticated => Claims::new(),
        }
    }
}

impl From<Option<Claims>> for Identity {
    fn from(claims: Option<Claims>) -> Self {
        match claims {
            Some(claims) => Identity::Authenticated(claims),
            None => Identity::Unauthenticated,
        }
    }
}
