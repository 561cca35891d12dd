//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use rest_service::config::Config;
use rest_service::http::HttpServer;
use rest_service::lifecycle::Shutdown;
use rest_service::net::Listener;
use rest_service::resilience::RetryPolicy;
use rest_service::store::{PoolSettings, Store, StoreConfig};

/// A postgres URL nothing listens on.
pub const UNREACHABLE_POSTGRES_URL: &str = "postgres://postgres@127.0.0.1:1/postgres";

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the accept loop to return.
    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop")
            .unwrap()
            .unwrap();
    }
}

/// Start a server with the given configuration and a lazily connecting store.
pub async fn start_server(config: Config) -> TestServer {
    let store = Store::connect_lazy(StoreConfig::new(UNREACHABLE_POSTGRES_URL)).unwrap();
    let listener = Listener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, store);
    let signal = shutdown.signal();
    let handle = tokio::spawn(async move { server.run(listener, signal).await });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Store configuration that fails fast against an unreachable address.
pub fn unreachable_store(interval: Duration, give_up_after: Duration) -> StoreConfig {
    let mut config = StoreConfig::new(UNREACHABLE_POSTGRES_URL);
    config.pool = PoolSettings {
        acquire_timeout: Duration::from_millis(100),
        ..PoolSettings::default()
    };
    config.retry = RetryPolicy {
        interval,
        give_up_after,
    };
    config
}
