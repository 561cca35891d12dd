//! CORS policy.
//!
//! Origins come from a comma-separated list. Each entry is trimmed and
//! lowercased. `*` allows every origin; an entry containing `*` matches
//! any origin that starts with the part before it and ends with the part
//! after it, so `http://localhost:*` admits every local port.

use axum::http::{header, request, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Parsed allowed-origins list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginPolicy {
    allow_all: bool,
    exact: Vec<String>,
    wildcards: Vec<(String, String)>,
}

impl OriginPolicy {
    pub fn parse(allowed: &str) -> Self {
        let mut policy = Self::default();

        for entry in allowed.split(',') {
            let entry = entry.trim().to_lowercase();
            if entry.is_empty() {
                continue;
            }
            if entry == "*" {
                policy.allow_all = true;
                continue;
            }
            match entry.split_once('*') {
                Some((prefix, suffix)) => policy
                    .wildcards
                    .push((prefix.to_string(), suffix.to_string())),
                None => policy.exact.push(entry),
            }
        }

        policy
    }

    /// Whether `origin` is allowed.
    pub fn matches(&self, origin: &str) -> bool {
        if self.allow_all {
            return true;
        }
        let origin = origin.to_lowercase();
        self.exact.iter().any(|allowed| *allowed == origin)
            || self.wildcards.iter().any(|(prefix, suffix)| {
                origin.len() >= prefix.len() + suffix.len()
                    && origin.starts_with(prefix.as_str())
                    && origin.ends_with(suffix.as_str())
            })
    }
}

/// CORS layer for the router.
pub fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let policy = OriginPolicy::parse(allowed_origins);
    tracing::debug!(?policy, "CORS policy");

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &request::Parts| {
                origin.to_str().map(|o| policy.matches(o)).unwrap_or(false)
            },
        ))
        .allow_methods([Method::POST, Method::PUT, Method::DELETE, Method::GET])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DEFAULT_ALLOWED_ORIGINS;

    #[test]
    fn default_origins_allow_local_ports() {
        let policy = OriginPolicy::parse(DEFAULT_ALLOWED_ORIGINS);
        assert!(policy.matches("http://localhost:3000"));
        assert!(policy.matches("http://127.0.0.1:8080"));
        assert!(policy.matches("HTTP://LOCALHOST:1"));
        assert!(!policy.matches("https://localhost:3000"));
        assert!(!policy.matches("http://example.com"));
        assert!(!policy.matches("http://localhost"));
    }

    #[test]
    fn exact_entries_are_trimmed_and_lowercased() {
        let policy = OriginPolicy::parse(" https://App.Example.com ,https://other.example");
        assert!(policy.matches("https://app.example.com"));
        assert!(policy.matches("https://other.example"));
        assert!(!policy.matches("https://app.example.com.evil"));
    }

    #[test]
    fn star_allows_everything() {
        let policy = OriginPolicy::parse("*");
        assert!(policy.matches("https://anything.example"));
    }

    #[test]
    fn wildcard_in_the_middle() {
        let policy = OriginPolicy::parse("https://*.example.com");
        assert!(policy.matches("https://api.example.com"));
        assert!(!policy.matches("https://example.com"));
        assert!(!policy.matches("http://api.example.com"));
    }

    #[test]
    fn empty_list_allows_nothing() {
        let policy = OriginPolicy::parse("");
        assert_eq!(policy, OriginPolicy::default());
        assert!(!policy.matches("http://localhost:3000"));
    }
}
