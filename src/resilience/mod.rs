//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Startup dependency (postgres pool):
//!     → retries.rs (attempt, wait fixed interval, attempt again)
//!     → stops on success, give-up deadline, or shutdown signal
//! ```

pub mod retries;

pub use retries::{retry_until, RetryError, RetryPolicy};
