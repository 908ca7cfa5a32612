//! # crumb-token
//!
//! Signed, self-contained tokens for crumb.
//!
//! This crate provides functionality for:
//! - Encoding a principal and extra claims into an HMAC-signed JWT
//! - Verifying a token and checking its time bounds and audience
//! - Injecting the clock used for every time comparison
//! - Generating and loading signing secrets
//!
//! Time-based checks never use the wall clock directly: the [`TokenCodec`]
//! asks its [`Clock`], so tests can move time deterministically.

pub mod claims;
pub mod clock;
pub mod error;
pub mod secret;
pub mod token;

pub use claims::Claims;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{TokenError, TokenErrorKind};
pub use secret::SigningSecret;
pub use token::{TokenCodec, TokenInfo, inspect_token_unverified};
