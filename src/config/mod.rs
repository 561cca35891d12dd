//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command-line flags / environment variables
//!     → loader.rs (clap parse, Go-style listen address)
//!     → validation.rs (semantic checks)
//!     → Config (validated, immutable)
//!     → handed by value to the lifecycle
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - Every field has a default except the postgres URL, which validation rejects when empty

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{version_line, Cli};
pub use schema::{parse_listen_address, Config};
pub use validation::{validate_config, ValidationError, ValidationErrors};
