//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept)
//!     → connection.rs (HTTP/1.1, peer address, idle watchdog)
//!     → axum Router
//! ```
//!
//! # Design Decisions
//! - One task per connection, spawned by the accept loop
//! - Connections are not drained at shutdown

pub mod connection;
pub mod listener;

pub use connection::{ConnectionId, TransportTimeouts};
pub use listener::{Listener, ListenerError};
