//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Connect store (retrying) → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal or server exit → trigger → accept loop and store retry stop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → reported as the shutdown cause
//! ```
//!
//! Two tasks run under one [`Shutdown`]: the signal listener and the
//! server. Whichever reports first decides the logged cause.

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use signals::TerminationSignal;
pub use startup::{run, start, ShutdownCause, StartupError};
