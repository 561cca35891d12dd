//! Request-ID middleware.
//! Assigns a fresh ID to every request and echoes it in `X-Request-ID`.

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};

use super::{Middleware, Next, ResponseFuture};
use crate::http::request::{RequestId, RequestMeta, X_REQUEST_ID};

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdMiddleware;

impl Middleware for RequestIdMiddleware {
    fn handle(&self, req: Request, mut meta: RequestMeta, next: Next) -> ResponseFuture {
        let id = RequestId::new();
        meta.request_id = Some(id.clone());

        Box::pin(async move {
            let mut response = next.run(req, meta).await;
            if let Ok(value) = HeaderValue::from_str(id.as_str()) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(X_REQUEST_ID), value);
            }
            response
        })
    }
}
