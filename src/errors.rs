use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

/// Central API error taxonomy.
///
/// Maps to HTTP status codes as specified in DESIGN.md:
/// Validation -> 400, Auth -> 401, Conflict -> 409, NotFound -> 404,
/// Database/Internal -> 500. Responses carry a JSON `{"message": ...}`
/// body; database details are logged, never sent to clients.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Auth(String),
    Conflict(String),
    NotFound(String),
    Internal(String),
    Database(mongodb::error::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(m)
            | ApiError::Auth(m)
            | ApiError::Conflict(m)
            | ApiError::NotFound(m)
            | ApiError::Internal(m) => write!(f, "{}", m),
            ApiError::Database(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        ApiError::Database(err)
    }
}

impl ApiError {
    /// The message surfaced to clients. Database failures are reported
    /// generically so internal details never leave the server.
    fn client_message(&self) -> String {
        match self {
            ApiError::Validation(m)
            | ApiError::Auth(m)
            | ApiError::Conflict(m)
            | ApiError::NotFound(m)
            | ApiError::Internal(m) => m.clone(),
            ApiError::Database(_) => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Database(e) = self {
            eprintln!("Database error: {}", e);
        }
        HttpResponse::build(self.status_code()).json(json!({ "message": self.client_message() }))
    }
}
