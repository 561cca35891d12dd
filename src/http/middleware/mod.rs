//! Composable handler middleware.
//!
//! # Data Flow
//! ```text
//! MiddlewareStack [m1, m2, ..., mn] + terminal handler h
//!     → wrap(h) = m1(m2(...mn(h)))
//!     → request enters m1 first, response leaves m1 last
//! ```
//!
//! # Design Decisions
//! - First pushed is outermost
//! - The composed chain is an immutable `Arc` graph; wrapping never mutates the stack
//! - An empty stack returns the handler it was given

pub mod access_log;
pub mod request_id;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::Response;

use crate::http::request::RequestMeta;

pub use access_log::AccessLogMiddleware;
pub use request_id::RequestIdMiddleware;

/// Boxed future produced by handlers and middlewares.
pub type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Terminal request handler.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request, meta: RequestMeta) -> ResponseFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request, RequestMeta) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request, meta: RequestMeta) -> ResponseFuture {
        Box::pin(self(req, meta))
    }
}

/// A layer of the handler chain.
///
/// Implementations run their pre-logic, hand the request to [`Next::run`]
/// (or answer directly), then run their post-logic on the response.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: Request, meta: RequestMeta, next: Next) -> ResponseFuture;
}

/// The rest of the chain below a middleware.
#[derive(Clone)]
pub struct Next {
    inner: Arc<dyn Handler>,
}

impl Next {
    /// Forward the request to the rest of the chain.
    pub fn run(self, req: Request, meta: RequestMeta) -> ResponseFuture {
        self.inner.call(req, meta)
    }
}

struct Layered {
    middleware: Arc<dyn Middleware>,
    next: Arc<dyn Handler>,
}

impl Handler for Layered {
    fn call(&self, req: Request, meta: RequestMeta) -> ResponseFuture {
        let next = Next {
            inner: Arc::clone(&self.next),
        };
        self.middleware.handle(req, meta, next)
    }
}

/// Ordered list of middlewares.
#[derive(Clone, Default)]
pub struct MiddlewareStack {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware. Earlier entries wrap later ones.
    pub fn push<M: Middleware>(&mut self, middleware: M) {
        self.middlewares.push(Arc::new(middleware));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with<M: Middleware>(mut self, middleware: M) -> Self {
        self.push(middleware);
        self
    }

    /// Compose every middleware around `handler`.
    pub fn wrap(&self, handler: Arc<dyn Handler>) -> Arc<dyn Handler> {
        self.middlewares.iter().rev().fold(handler, |next, middleware| {
            Arc::new(Layered {
                middleware: Arc::clone(middleware),
                next,
            })
        })
    }
}

impl std::fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareStack")
            .field("len", &self.middlewares.len())
            .finish()
    }
}
