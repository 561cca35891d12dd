//! Access-log middleware.
//!
//! Emits one `info` event on the `access` target per completed request.
//! The event is written after the inner chain returns, so it carries the
//! final status and the time spent.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::http::{header, HeaderMap};
use chrono::{SecondsFormat, Utc};
use tokio::time::Instant;

use super::{Middleware, Next, ResponseFuture};
use crate::http::request::RequestMeta;

#[derive(Debug, Clone, Copy, Default)]
pub struct AccessLogMiddleware;

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

impl Middleware for AccessLogMiddleware {
    fn handle(&self, req: Request, meta: RequestMeta, next: Next) -> ResponseFuture {
        let started = Instant::now();
        let received = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);
        let method = req.method().to_string();
        let uri = req.uri().to_string();
        let agent = header_str(req.headers(), header::USER_AGENT);
        let referer = header_str(req.headers(), header::REFERER);
        let proto = format!("{:?}", req.version());
        let remote_addr = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_default();
        let request_id = meta.request_id_str().to_string();

        Box::pin(async move {
            let response = next.run(req, meta).await;
            let status = response.status();

            tracing::info!(
                target: "access",
                req_received = %received,
                req_method = %method,
                req_uri = %uri,
                agent = %agent,
                referer = %referer,
                proto = %proto,
                remote_addr = %remote_addr,
                status = status.as_u16(),
                status_text = status.canonical_reason().unwrap_or_default(),
                duration = ?started.elapsed(),
                request_id = %request_id
            );

            response
        })
    }
}
