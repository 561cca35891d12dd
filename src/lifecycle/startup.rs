//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect the store, retrying until connected, given up, or shut down
//! - Bind the listener and serve until shutdown
//! - Race the server against OS termination signals
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The listener binds last (traffic only once the store is ready)

use std::fmt;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{Shutdown, ShutdownSignal};
use crate::lifecycle::signals::{wait_for_termination, TerminationSignal};
use crate::net::{Listener, ListenerError};
use crate::store::{Store, StoreConfig, StoreError};

/// Errors that stop the service before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("http server failed: {0}")]
    Serve(#[from] std::io::Error),
}

/// Why the service stopped.
#[derive(Debug)]
pub enum ShutdownCause {
    /// An OS termination signal arrived.
    Signal(TerminationSignal),
    /// Signal handlers could not be installed.
    SignalHandler(std::io::Error),
    /// The server returned without error.
    ServerStopped,
    /// Startup or serving failed.
    Failed(StartupError),
    /// Every task ended without reporting.
    Aborted,
}

impl ShutdownCause {
    /// Whether the process should exit with a failure status.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ShutdownCause::Failed(_) | ShutdownCause::SignalHandler(_) | ShutdownCause::Aborted
        )
    }
}

impl fmt::Display for ShutdownCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownCause::Signal(sig) => write!(f, "got {}", sig),
            ShutdownCause::SignalHandler(err) => write!(f, "signal handler failed: {}", err),
            ShutdownCause::ServerStopped => write!(f, "server stopped"),
            ShutdownCause::Failed(err) => write!(f, "{}", err),
            ShutdownCause::Aborted => write!(f, "aborted"),
        }
    }
}

/// Connect the store, bind the listener, and serve until `shutdown` fires.
///
/// The store is closed before returning, whatever the outcome after it
/// was connected.
pub async fn start(config: Config, shutdown: ShutdownSignal) -> Result<(), StartupError> {
    let store = Store::connect(StoreConfig::new(config.postgres_url.clone()), shutdown.clone()).await?;

    let listener = match Listener::bind(config.listen_address).await {
        Ok(listener) => listener,
        Err(err) => {
            store.close().await;
            return Err(err.into());
        }
    };

    let server = HttpServer::new(&config, store);
    let result = server.run(listener, shutdown).await;
    server.into_store().close().await;

    Ok(result?)
}

/// Run the service until a termination signal arrives or the server stops.
///
/// The first task to report decides the cause; the other is discarded.
pub async fn run(config: Config) -> ShutdownCause {
    let shutdown = Shutdown::new();
    let (tx, mut rx) = mpsc::channel::<ShutdownCause>(2);

    {
        let tx = tx.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let cause = match wait_for_termination().await {
                Ok(sig) => ShutdownCause::Signal(sig),
                Err(err) => ShutdownCause::SignalHandler(err),
            };
            let _ = tx.send(cause).await;
            shutdown.trigger();
        });
    }

    {
        let signal = shutdown.signal();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let cause = match start(config, signal).await {
                Ok(()) => ShutdownCause::ServerStopped,
                Err(err) => ShutdownCause::Failed(err),
            };
            let _ = tx.send(cause).await;
            shutdown.trigger();
        });
    }

    rx.recv().await.unwrap_or(ShutdownCause::Aborted)
}
