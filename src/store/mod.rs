//! Connection store.
//!
//! # Data Flow
//! ```text
//! StoreConfig (url, pool settings, retry policy)
//!     → postgres.rs (parse url once; malformed url fails immediately)
//!     → resilience::retry_until (open pool, wait, open again ...)
//!     → Store (PgPool), held for the process lifetime
//!     → Store::close at shutdown
//! ```
//!
//! The store owns the only shared mutable resource of the service. The
//! pool synchronizes checkout and checkin on its own.

pub mod postgres;

use std::time::Duration;

use sqlx::PgPool;
use thiserror::Error;

use crate::lifecycle::ShutdownSignal;
use crate::resilience::{retry_until, RetryError, RetryPolicy};

pub use postgres::PoolSettings;

use postgres::parse_options;

/// Errors raised while establishing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The connection URL could not be parsed.
    #[error("invalid postgres url: {0}")]
    InvalidUrl(#[source] sqlx::Error),

    /// A single pool-opening attempt failed.
    #[error("failed connect to postgres: {0}")]
    Connect(#[source] sqlx::Error),

    /// Retries ran out of time. `last` is empty when the first attempt
    /// was still running.
    #[error("give up connecting to postgres after {attempts} attempts in {elapsed:?}")]
    GaveUp {
        attempts: u32,
        elapsed: Duration,
        #[source]
        last: Option<Box<StoreError>>,
    },

    /// Shutdown was requested before a connection succeeded.
    #[error("context interrupt received")]
    Interrupted,
}

/// Configuration for [`Store`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// URL for connecting to Postgres.
    pub postgres_url: String,
    /// Limits for the pool.
    pub pool: PoolSettings,
    /// Startup retry cadence and deadline.
    pub retry: RetryPolicy,
}

impl StoreConfig {
    /// Store configuration with default pool limits and retry policy.
    pub fn new(postgres_url: impl Into<String>) -> Self {
        Self {
            postgres_url: postgres_url.into(),
            pool: PoolSettings::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Persistent storage for application data.
///
/// Not `Clone`: the one handle is closed exactly once with [`Store::close`].
#[derive(Debug)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Connect to Postgres, retrying until connected, given up, or interrupted.
    ///
    /// Each attempt waits at most one retry interval for its first
    /// connection, so attempts start on a steady cadence.
    pub async fn connect(config: StoreConfig, mut shutdown: ShutdownSignal) -> Result<Self, StoreError> {
        let options = parse_options(&config.postgres_url)?;
        let settings = PoolSettings {
            acquire_timeout: config.pool.acquire_timeout.min(config.retry.interval),
            ..config.pool
        };

        let pool = retry_until(config.retry, "postgres connect", &mut shutdown, || {
            postgres::connect_with(options.clone(), &settings)
        })
        .await
        .map_err(|err| match err {
            RetryError::GaveUp {
                attempts,
                elapsed,
                last,
            } => StoreError::GaveUp {
                attempts,
                elapsed,
                last: last.map(Box::new),
            },
            RetryError::Interrupted { .. } => StoreError::Interrupted,
        })?;

        tracing::debug!("Connection to postgres successful");
        Ok(Self { pool })
    }

    /// Build a store whose pool connects on first use.
    ///
    /// Only the URL is checked here; nothing touches the network.
    pub fn connect_lazy(config: StoreConfig) -> Result<Self, StoreError> {
        let options = parse_options(&config.postgres_url)?;
        let pool = postgres::connect_lazy_with(options, &config.pool);
        Ok(Self { pool })
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every connection of the pool.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::debug!("Postgres pool closed");
    }
}
