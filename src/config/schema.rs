//! Configuration schema definitions.
//!
//! [`Config`] is what the rest of the service consumes. It is produced by
//! the flag/env loader and checked by `validation.rs` before use.

use std::net::{SocketAddr, ToSocketAddrs};

use serde::Serialize;

/// Default listen address, Go-style (`:port` means every interface).
pub const DEFAULT_LISTEN_ADDRESS: &str = ":1080";

/// Default CORS allowed origins.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://127.0.0.1:*,http://localhost:*";

/// Root configuration for the service.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Network address and port the HTTP server listens on.
    pub listen_address: SocketAddr,

    /// CORS allowed origins, comma separated.
    pub allowed_origins: String,

    /// URL for connecting to Postgres.
    #[serde(skip_serializing)]
    pub postgres_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::from(([0, 0, 0, 0], 1080)),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.to_string(),
            postgres_url: String::new(),
        }
    }
}

/// Parse a listen address.
///
/// Accepts `host:port`, `ip:port`, `[v6]:port` and the bare `:port` form,
/// which binds every IPv4 interface.
pub fn parse_listen_address(raw: &str) -> Result<SocketAddr, String> {
    let raw = raw.trim();
    let candidate = if raw.starts_with(':') {
        format!("0.0.0.0{raw}")
    } else {
        raw.to_string()
    };

    candidate
        .to_socket_addrs()
        .map_err(|e| format!("invalid listen address {raw:?}: {e}"))?
        .next()
        .ok_or_else(|| format!("listen address {raw:?} did not resolve"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_port_binds_all_interfaces() {
        let addr = parse_listen_address(DEFAULT_LISTEN_ADDRESS).unwrap();
        assert_eq!(addr, SocketAddr::from(([0, 0, 0, 0], 1080)));
        assert_eq!(addr, Config::default().listen_address);
    }

    #[test]
    fn explicit_addresses() {
        assert_eq!(
            parse_listen_address("127.0.0.1:8080").unwrap(),
            SocketAddr::from(([127, 0, 0, 1], 8080))
        );
        assert_eq!(
            parse_listen_address("[::1]:9000").unwrap(),
            "[::1]:9000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_listen_address("not an address").is_err());
        assert!(parse_listen_address(":99999").is_err());
        assert!(parse_listen_address("").is_err());
    }

    #[test]
    fn postgres_url_not_serialized() {
        let config = Config {
            postgres_url: "postgres://user:secret@db/app".into(),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("allowed_origins"));
    }
}
