//! Endpoint handlers.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;

use crate::http::request::RequestMeta;
use crate::http::response::respond;

pub const INFO_MESSAGE: &str = "i am simple REST API service";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusPayload {
    pub status: &'static str,
}

/// `GET /info`
pub async fn info(_req: Request, _meta: RequestMeta) -> Response {
    respond(StatusCode::OK, Some(INFO_MESSAGE))
}

/// `GET /healthz`
pub async fn healthz(_req: Request, _meta: RequestMeta) -> Response {
    respond(StatusCode::OK, Some(StatusPayload { status: "healthy" }))
}

/// `GET /readyz`
pub async fn readyz(_req: Request, _meta: RequestMeta) -> Response {
    respond(StatusCode::OK, Some(StatusPayload { status: "ready" }))
}
