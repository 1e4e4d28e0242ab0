use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Cannot read GPX file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
    #[error("Track point {index}: {field} is missing")]
    MissingField { index: usize, field: &'static str },
    #[error("Track point {index}: {field} is not numeric ({value:?})")]
    NotNumeric {
        index: usize,
        field: &'static str,
        value: String,
    },
    #[error("Track point {index}: invalid time {value:?}")]
    InvalidTime { index: usize, value: String },
    #[error("No track points found in file")]
    EmptyFile,
    #[error("First or last track point has no time")]
    MissingTimestamp,
    #[error("Ride duration must be positive (got {0} s)")]
    NonPositiveDuration(i64),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Stored series could not be encoded: {0}")]
    Series(#[from] serde_json::Error),
    #[error("Stored ride time is invalid: {0}")]
    InvalidRideTime(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Wrong username or password")]
    InvalidCredentials,
    #[error("User already exists: {0}")]
    UserExists(String),
    #[error("Missing or expired session")]
    NoSession,
    #[error("Name and password must not be empty")]
    EmptyCredentials,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Ride not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RegisterError> for AppError {
    fn from(e: RegisterError) -> Self {
        match e {
            RegisterError::Auth(e) => AppError::Auth(e),
            RegisterError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Parse(_)
            | AppError::BadRequest(_)
            | AppError::Auth(AuthError::EmptyCredentials) => StatusCode::BAD_REQUEST,
            AppError::Auth(AuthError::UserExists(_)) => StatusCode::CONFLICT,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
