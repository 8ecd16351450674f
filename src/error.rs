use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::biotime::BiotimeError;

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("attendance server unavailable")]
    Upstream(#[from] BiotimeError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Upstream(e) => {
                tracing::error!(error = %e, "Upstream attendance server request failed");
                json!({
                    "error": self.to_string(),
                    "detail": e.to_string(),
                })
            }
            ApiError::BadRequest(msg) => json!({
                "error": "bad request",
                "detail": msg,
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
