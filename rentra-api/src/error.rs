use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rentra_availability::Rejection;
use rentra_booking::StoreError;
use rentra_catalog::CatalogError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    /// Named outcome of the availability engine; carries the structured
    /// rejection so the blocking id reaches the response body.
    BookingRejected(Rejection),
    Store(StoreError),
    Unavailable(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::ValidationError(msg) => error_body(StatusCode::BAD_REQUEST, &msg),
            AppError::NotFoundError(msg) => error_body(StatusCode::NOT_FOUND, &msg),
            AppError::BookingRejected(rejection) => {
                let status = match rejection {
                    Rejection::Conflict { .. } => StatusCode::CONFLICT,
                    _ => StatusCode::UNPROCESSABLE_ENTITY,
                };
                let body = Json(json!({
                    "error": rejection.reason(),
                    "rejection": rejection,
                }));
                (status, body).into_response()
            }
            AppError::Store(err) => match err {
                StoreError::Conflict { blocking } => {
                    let body = Json(json!({
                        "error": "This vehicle is already reserved for the selected dates and times.",
                        "rejection": { "kind": "conflict", "blocking": blocking },
                    }));
                    (StatusCode::CONFLICT, body).into_response()
                }
                StoreError::InvalidInterval => {
                    error_body(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string())
                }
                StoreError::NotFound(_) => error_body(StatusCode::NOT_FOUND, &err.to_string()),
                StoreError::InvalidTransition { .. } | StoreError::PurgeActive(_) => {
                    error_body(StatusCode::CONFLICT, &err.to_string())
                }
                StoreError::Unavailable(msg) => {
                    tracing::error!("Reservation store unavailable: {}", msg);
                    error_body(
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Service temporarily unavailable. Please try again.",
                    )
                }
            },
            AppError::Unavailable(msg) => {
                tracing::error!("Collaborator unavailable: {}", msg);
                error_body(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable. Please try again.",
                )
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "error": message,
    }));
    (status, body).into_response()
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
