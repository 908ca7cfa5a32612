//! # crumb-policy
//!
//! Stateless cookie authentication.
//!
//! A [`CookieAuthPolicy`] turns a principal into a `Set-Cookie` header carrying
//! a signed token (`remember`), expires that cookie (`forget`), and resolves an
//! incoming request's cookies back into an [`Identity`] (`get_claims`). There
//! is no server-side session: the token is the source of truth.
//!
//! Framework adapters should depend on the [`AuthenticationPolicy`] trait and
//! supply request cookies through [`CookieSource`].

pub mod cookie;
pub mod error;
pub mod identity;
pub mod policy;
pub mod request;

pub use cookie::{HeaderPair, SET_COOKIE};
pub use crumb_token::Claims;
pub use error::PolicyError;
pub use identity::Identity;
pub use policy::{AuthenticationPolicy, CookieAuthPolicy};
pub use request::CookieSource;
