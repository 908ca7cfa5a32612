//! `Set-Cookie` header rendering.
//!
//! Attribute order is fixed:
//!
//! ```text
//! <name>=<value>; Path=<path>[; Domain=<d>][; Max-Age=<n>; Expires=<date>][; SameSite=<v>][; secure]; HttpOnly
//! ```
//!
//! `HttpOnly` always closes the header, so optional attributes never leave a
//! dangling separator.

use chrono::{DateTime, Duration, Utc};
use crumb_core::CookieConfig;

/// Response header name used for every cookie.
pub const SET_COOKIE: &str = "Set-Cookie";

/// A response header as `(name, value)`.
pub type HeaderPair = (&'static str, String);

/// IMF-fixdate layout used by the `Expires` attribute.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// How long the browser should keep a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetime {
    pub max_age: u64,
    pub expires: DateTime<Utc>,
}

impl Lifetime {
    /// A lifetime of `max_age` seconds starting at `now`.
    pub fn from_now(now: DateTime<Utc>, max_age: u64) -> Self {
        let expires = i64::try_from(max_age)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { max_age, expires }
    }

    /// Tells the browser to drop the cookie immediately.
    pub fn expired() -> Self {
        Self {
            max_age: 0,
            expires: DateTime::<Utc>::default(),
        }
    }
}

/// Format an instant as an HTTP date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(instant: DateTime<Utc>) -> String {
    instant.format(HTTP_DATE_FORMAT).to_string()
}

/// Render the value of a `Set-Cookie` header.
pub fn render_set_cookie(config: &CookieConfig, value: &str, lifetime: Option<Lifetime>) -> String {
    let mut header = format!("{}={}; Path={}", config.name, value, config.path);

    if let Some(domain) = &config.domain {
        header.push_str("; Domain=");
        header.push_str(domain);
    }

    if let Some(lifetime) = lifetime {
        header.push_str(&format!(
            "; Max-Age={}; Expires={}",
            lifetime.max_age,
            http_date(lifetime.expires)
        ));
    }

    if let Some(same_site) = config.same_site {
        header.push_str("; SameSite=");
        header.push_str(same_site.as_str());
    }

    if config.https_only {
        header.push_str("; secure");
    }

    header.push_str("; HttpOnly");
    header
}

/// Header that replaces the cookie with an empty, already-expired one.
pub fn expire_cookie(config: &CookieConfig) -> HeaderPair {
    (
        SET_COOKIE,
        render_set_cookie(config, "", Some(Lifetime::expired())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumb_core::SameSite;

    fn at(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(ts, 0).unwrap()
    }

    #[test]
    fn test_http_date() {
        assert_eq!(http_date(at(784111777)), "Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(
            http_date(DateTime::<Utc>::default()),
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn test_minimal_insecure_cookie() {
        let config = CookieConfig {
            https_only: false,
            ..CookieConfig::default()
        };
        assert_eq!(
            render_set_cookie(&config, "abc", None),
            "auth_token=abc; Path=/; HttpOnly"
        );
    }

    #[test]
    fn test_secure_cookie_with_lifetime() {
        let config = CookieConfig::default();
        let lifetime = Lifetime::from_now(at(784111677), 100);
        assert_eq!(
            render_set_cookie(&config, "abc", Some(lifetime)),
            "auth_token=abc; Path=/; Max-Age=100; Expires=Sun, 06 Nov 1994 08:49:37 GMT; secure; HttpOnly"
        );
    }

    #[test]
    fn test_all_attributes() {
        let config = CookieConfig {
            name: "auth".to_string(),
            max_age: None,
            https_only: true,
            path: "/app".to_string(),
            domain: Some("example.com".to_string()),
            same_site: Some(SameSite::Strict),
        };
        assert_eq!(
            render_set_cookie(&config, "abc", Some(Lifetime::from_now(at(0), 60))),
            "auth=abc; Path=/app; Domain=example.com; Max-Age=60; \
             Expires=Thu, 01 Jan 1970 00:01:00 GMT; SameSite=Strict; secure; HttpOnly"
        );
    }

    #[test]
    fn test_no_stray_separators() {
        for https_only in [true, false] {
            for lifetime in [None, Some(Lifetime::from_now(at(0), 5))] {
                let config = CookieConfig {
                    https_only,
                    ..CookieConfig::default()
                };
                let header = render_set_cookie(&config, "v", lifetime);
                assert!(header.ends_with("; HttpOnly"), "{}", header);
                assert!(!header.contains(";;"), "{}", header);
                assert!(!header.contains("; ;"), "{}", header);
                assert!(!header.contains("  "), "{}", header);
            }
        }
    }

    #[test]
    fn test_huge_max_age_is_clamped() {
        let lifetime = Lifetime::from_now(at(0), u64::MAX);
        assert_eq!(lifetime.max_age, u64::MAX);
        assert_eq!(lifetime.expires, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_expire_cookie() {
        let config = CookieConfig {
            name: "auth".to_string(),
            domain: Some("example.com".to_string()),
            ..CookieConfig::default()
        };
        let (name, value) = expire_cookie(&config);
        assert_eq!(name, SET_COOKIE);
        assert_eq!(
            value,
            "auth=; Path=/; Domain=example.com; Max-Age=0; \
             Expires=Thu, 01 Jan 1970 00:00:00 GMT; secure; HttpOnly"
        );
    }
}
