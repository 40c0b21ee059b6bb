//! Feed error handling for the HTTP layer.
//!
//! Feed consumers always get parseable RSS: a failed request renders the
//! error feed with status 500 rather than a plain-text or HTML body.

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::feed::{render_error_feed, STATIC_ERROR_FEED};
use crate::HotentryError;

/// Content type of every feed response.
pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// An XML response body.
#[derive(Debug, Clone)]
pub struct Xml {
    status: StatusCode,
    body: String,
}

impl Xml {
    /// 200 OK with the given document.
    pub fn ok(body: String) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    /// Document with an explicit status.
    pub fn with_status(status: StatusCode, body: String) -> Self {
        Self { status, body }
    }
}

impl IntoResponse for Xml {
    fn into_response(self) -> Response {
        (
            self.status,
            [(CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE))],
            self.body,
        )
            .into_response()
    }
}

/// Failure while producing a feed.
#[derive(Debug)]
pub struct FeedError {
    message: String,
}

impl FeedError {
    /// Create a feed error with the message shown in the error item.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Message shown in the error item.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<HotentryError> for FeedError {
    fn from(err: HotentryError) -> Self {
        tracing::error!(error = %err, "Feed generation failed");
        Self::new(err.to_string())
    }
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let body = render_error_feed(&self.message).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to render error feed");
            STATIC_ERROR_FEED.to_string()
        });
        Xml::with_status(StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "feed error: {}", self.message)
    }
}

impl std::error::Error for FeedError {}
