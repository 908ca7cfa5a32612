//! # crumb-core
//!
//! Configuration shared by the crumb crates. A single [`PolicyConfig`] describes
//! how tokens are signed, how long they live and which cookie carries them.

// Configuration types shared across all crumb crates
pub mod config;

pub use config::{
    ConfigError,
    CookieConfig,
    MAX_LIFETIME_SECONDS,
    PolicyConfig,
    SameSite,
    SigningAlgorithm,
};
