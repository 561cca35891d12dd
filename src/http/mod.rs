//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (net::connection)
//!     → server.rs (Axum router, timeouts, CORS)
//!     → middleware (request ID, then access log)
//!     → handlers.rs (info / healthz / readyz)
//!     → response.rs (JSON envelopes)
//!     → Send to client
//! ```

pub mod cors;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{Handler, Middleware, MiddlewareStack, Next};
pub use request::{RequestId, RequestMeta, X_REQUEST_ID};
pub use response::{error, respond, DataEnvelope, ErrorEnvelope};
pub use server::HttpServer;
