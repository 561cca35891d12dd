//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → logging.rs (filter + JSON formatter, installed once by main)
//!
//! Per request:
//!     → http::middleware::access_log (one event per completed request)
//! ```
//!
//! The request id generated by the HTTP layer is attached to the access log
//! and error events so lines of one request can be correlated.

pub mod logging;

pub use logging::{LogLevel, LoggingError};
