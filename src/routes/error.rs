use actix_web::{error, http::StatusCode, HttpResponse};
use crate::models::ErrorResponse;
use crate::services::{AppwriteError, IdentityError, PostgresError};
use thiserror::Error;

/// Errors surfaced by HTTP handlers, rendered as JSON `ErrorResponse` bodies
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Document store error: {0}")]
    Appwrite(#[from] AppwriteError),

    #[error("Database error: {0}")]
    Postgres(#[from] PostgresError),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) | ApiError::Appwrite(AppwriteError::NotFound(_)) => "not_found",
            ApiError::Appwrite(_) => "document_store_error",
            ApiError::Postgres(_) => "database_error",
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::MissingToken | IdentityError::InvalidToken(_) => {
                ApiError::Unauthorized(err.to_string())
            }
            IdentityError::EmailNotVerified | IdentityError::EmailNotAllowed(_) => {
                ApiError::Forbidden(err.to_string())
            }
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) | ApiError::Appwrite(AppwriteError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Appwrite(_) => StatusCode::BAD_GATEWAY,
            ApiError::Postgres(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid query: {}", err)).into()
}
