//! Read-only view of the cookies sent with a request.
//!
//! Parsing the `Cookie` header is the framework's job; the policy only needs a
//! name-to-value lookup.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A request's cookies, already parsed.
pub trait CookieSource {
    /// Value of the cookie called `name`, if the request carries one.
    fn cookie(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> CookieSource for HashMap<String, String, S> {
    fn cookie(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<S: BuildHasher> CookieSource for HashMap<&str, &str, S> {
    fn cookie(&self, name: &str) -> Option<&str> {
        self.get(name).copied()
    }
}

impl CookieSource for BTreeMap<String, String> {
    fn cookie(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: CookieSource + ?Sized> CookieSource for &T {
    fn cookie(&self, name: &str) -> Option<&str> {
        (**self).cookie(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_map_lookup() {
        let mut cookies = HashMap::new();
        cookies.insert("auth".to_string(), "token".to_string());
        assert_eq!(cookies.cookie("auth"), Some("token"));
        assert_eq!(cookies.cookie("other"), None);
    }

    #[test]
    fn test_borrowed_map_lookup() {
        let cookies = HashMap::from([("auth", "token")]);
        assert_eq!(cookies.cookie("auth"), Some("token"));
    }

    #[test]
    fn test_btree_map_lookup_through_dyn() {
        let mut cookies = BTreeMap::new();
        cookies.insert("auth".to_string(), "token".to_string());
        let source: &dyn CookieSource = &cookies;
        assert_eq!(source.cookie("auth"), Some("token"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let cookies = HashMap::from([("Auth", "token")]);
        assert_eq!(cookies.cookie("auth"), None);
    }
}
