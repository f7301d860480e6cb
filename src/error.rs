//! Handler-level errors.
//!
//! Handlers return `Result<_, AppError>`. The response produced here is a
//! bare status; the error-mapping middleware in `routes::errors` rewrites
//! 404/500 responses into a redirect plus flash before they reach the
//! browser.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::render::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("no page at {0}")]
    NotFound(String),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

impl AppError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, status.canonical_reason().unwrap_or_default()).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
