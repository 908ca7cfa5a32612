//! Cookie commands.
//!
//! `crumb cookie remember` - Print the headers that log a principal in.
//! `crumb cookie forget` - Print the headers that log the client out.

use crumb_policy::{AuthenticationPolicy, CookieAuthPolicy, HeaderPair, cookie::expire_cookie};
use std::collections::HashMap;
use std::path::Path;

use super::{load_config, load_policy, parse_claims};
use crate::PolicyArgs;

fn print_headers(headers: &[HeaderPair]) {
    for (name, value) in headers {
        println!("{}: {}", name, value);
    }
}

/// Print the `Set-Cookie` headers for a freshly remembered principal.
pub fn remember(policy: &PolicyArgs, sub: &str, claims: &[String]) -> anyhow::Result<()> {
    let headers = remember_headers(policy, sub, claims)?;
    print_headers(&headers);
    Ok(())
}

fn remember_headers(
    policy: &PolicyArgs,
    sub: &str,
    claims: &[String],
) -> anyhow::Result<Vec<HeaderPair>> {
    let (secret, config) = load_policy(policy)?;
    let policy = CookieAuthPolicy::new(secret, config)?;
    let extra = parse_claims(claims)?;

    let no_cookies = HashMap::<String, String>::new();
    Ok(policy.remember(&no_cookies, sub, &extra)?)
}

/// Print the `Set-Cookie` header that expires the auth cookie.
///
/// Needs no secret: only the cookie attributes from the config matter.
pub fn forget(config: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config)?;
    print_headers(&[expire_cookie(&config.cookie)]);
    Ok(())
}
