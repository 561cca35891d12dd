//! JSON response envelopes.
//!
//! # Responsibilities
//! - Wrap successful payloads as `{"data": ...}`
//! - Wrap failures as `{"errors": {"title": ...}}` and log them with the request ID
//!
//! # Design Decisions
//! - Envelopes are generic over declared payload types
//! - An encoding failure never turns into a panic; the status is still sent

use std::fmt;

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::http::request::RequestMeta;

/// Successful response body.
#[derive(Debug, Clone, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Failed response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub errors: ErrorTitle,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorTitle {
    pub title: String,
}

fn with_body(status: StatusCode, content_type: &'static str, body: impl Into<Body>) -> Response {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Send `status` with `data` wrapped in a [`DataEnvelope`].
///
/// `None` sends the status with an empty body.
pub fn respond<T: Serialize>(status: StatusCode, data: Option<T>) -> Response {
    let Some(data) = data else {
        return status.into_response();
    };

    match serde_json::to_vec(&DataEnvelope { data }) {
        Ok(body) => with_body(status, "application/json", body),
        Err(err) => {
            tracing::error!(error = %err, "json encode error");
            status.into_response()
        }
    }
}

/// Log a failed request and send `status` with an [`ErrorEnvelope`].
pub fn error<E: fmt::Display + ?Sized>(meta: &RequestMeta, status: StatusCode, err: &E) -> Response {
    let title = err.to_string();
    tracing::error!(
        request_id = %meta.request_id_str(),
        error = %title,
        "request failed"
    );

    let envelope = ErrorEnvelope {
        errors: ErrorTitle {
            title: title.clone(),
        },
    };
    match serde_json::to_vec(&envelope) {
        Ok(body) => with_body(status, "application/json", body),
        Err(encode_err) => {
            tracing::error!(error = %encode_err, "json encode error");
            with_body(status, "text/plain; charset=utf-8", title)
        }
    }
}
