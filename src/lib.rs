//! REST service scaffold.
//!
//! An HTTP server exposing liveness, readiness and info endpoints, wrapped
//! in CORS and request-logging middleware, backed by a Postgres pool.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                  REST SERVICE                    │
//!                    │                                                  │
//!   Client Request   │  ┌──────────┐   ┌──────────┐   ┌─────────────┐   │
//!   ─────────────────┼─▶│   net    │──▶│   http   │──▶│ middleware  │   │
//!                    │  │ listener │   │  router  │   │ request id  │   │
//!                    │  └──────────┘   │ cors/tmo │   │ access log  │   │
//!                    │                 └──────────┘   └──────┬──────┘   │
//!                    │                                       ▼          │
//!   Client Response  │                 ┌──────────┐   ┌─────────────┐   │
//!   ◀────────────────┼─────────────────│ response │◀──│  handlers   │   │
//!                    │                 │ envelope │   └─────────────┘   │
//!                    │                 └──────────┘                     │
//!                    │                                                  │
//!                    │  ┌──────────┐   ┌────────────┐   ┌───────────┐   │
//!                    │  │  store   │◀──│ resilience │   │ lifecycle │   │
//!                    │  │ pg pool  │   │   retry    │   │ signals   │   │
//!                    │  └──────────┘   └────────────┘   └───────────┘   │
//!                    └──────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::Config;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::Store;
