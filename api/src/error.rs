use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use signet_common::error::{stack_traces_enabled, AcmeProblem, AdminError};
use thiserror::Error;

/// Any failure a handler can surface. Admin errors render as
/// `application/json` problem documents; ACME-family errors render as
/// `application/problem+json`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Acme(#[from] AcmeProblem),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Admin(err) => {
                log_error(&err);
                write_body(err.status(), "application/json", &err.to_problem())
            }
            ApiError::Acme(err) => {
                tracing::error!(error = %err, "request failed");
                write_body(err.status, "application/problem+json", &err)
            }
        }
    }
}

fn log_error(err: &AdminError) {
    match err.backtrace().filter(|_| stack_traces_enabled()) {
        Some(trace) => tracing::error!(error = %err, stack_trace = %trace, "request failed"),
        None => tracing::error!(error = %err, "request failed"),
    }
}

/// Emits the error body. The status always stands; if the body itself fails
/// to encode, a secondary log record is produced and the body stays empty.
fn write_body<T: serde::Serialize>(status: u16, content_type: &'static str, body: &T) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match serde_json::to_vec(body) {
        Ok(body) => (status, [(header::CONTENT_TYPE, content_type)], body).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode error response body");
            status.into_response()
        }
    }
}
