//!
//! # Error Handling
//!
//! Defines `AppError`, the single error type used across the application.
//! Every variant maps to an HTTP status, and every error response carries a
//! `{"message": ...}` JSON body, which the browser client surfaces verbatim.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers can
//! simply return `Result<_, AppError>` and rely on `?`. `From` impls for
//! `sqlx::Error`, `jsonwebtoken::errors::Error` and `bcrypt::BcryptError`
//! keep the conversions out of handler code.

use actix_web::{
    error::{JsonPayloadError, PathError, ResponseError},
    HttpRequest, HttpResponse,
};
use serde_json::json;
use std::fmt;

/// All error conditions the application distinguishes.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400).
    Validation(String),
    /// Duplicate resource, currently only a re-registered email (HTTP 400).
    Conflict(String),
    /// Failed login. The message is identical whether the email is unknown
    /// or the password is wrong, so callers cannot enumerate accounts (HTTP 400).
    InvalidCredentials,
    /// No bearer token on a protected route (HTTP 401).
    MissingToken,
    /// Token with a bad signature, malformed payload, elapsed expiry, or
    /// whose user no longer exists (HTTP 401).
    InvalidToken,
    /// Resource absent, or owned by another user; the two cases are
    /// indistinguishable (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    Internal(String),
    /// Failure from the database layer (HTTP 500).
    Database(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::MissingToken => write!(f, "Access token required"),
            AppError::InvalidToken => write!(f, "Invalid token"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) | AppError::Conflict(msg) => {
                HttpResponse::BadRequest().json(json!({ "message": msg }))
            }
            AppError::InvalidCredentials => {
                HttpResponse::BadRequest().json(json!({ "message": "Invalid credentials" }))
            }
            AppError::MissingToken => {
                HttpResponse::Unauthorized().json(json!({ "message": "Access token required" }))
            }
            AppError::InvalidToken => {
                HttpResponse::Unauthorized().json(json!({ "message": "Invalid token" }))
            }
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({ "message": msg })),
            // Infrastructure failures are logged with their detail and
            // presented to the client as a generic message.
            AppError::Internal(msg) | AppError::Database(msg) => {
                log::error!("{}", msg);
                HttpResponse::InternalServerError().json(json!({ "message": "Server error" }))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::Database(error.to_string()),
        }
    }
}

/// JWT processing failures all surface as an invalid token; the specific
/// cause (signature, expiry, garbage payload) is not leaked to the client.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::InvalidToken
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("bcrypt failure: {}", error))
    }
}

/// Hook for `web::JsonConfig`: malformed or undeserializable JSON bodies
/// become a 400 with the standard `{"message"}` shape instead of actix's
/// plain-text default.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

/// Hook for `web::PathConfig`: a task id that does not parse as an integer
/// matches no task, which is the same 404 as any other unknown id.
pub fn path_error_handler(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound("Task not found".into()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("bad input".into())
                .error_response()
                .status(),
            400
        );
        assert_eq!(
            AppError::Conflict("User already exists".into())
                .error_response()
                .status(),
            400
        );
        assert_eq!(AppError::InvalidCredentials.error_response().status(), 400);
        assert_eq!(AppError::MissingToken.error_response().status(), 401);
        assert_eq!(AppError::InvalidToken.error_response().status(), 401);
        assert_eq!(
            AppError::NotFound("Task not found".into())
                .error_response()
                .status(),
            404
        );
        assert_eq!(
            AppError::Internal("boom".into()).error_response().status(),
            500
        );
    }

    #[actix_rt::test]
    async fn test_body_is_message_json() {
        let response = AppError::NotFound("Task not found".into()).error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Task not found");
    }

    #[actix_rt::test]
    async fn test_internal_detail_is_not_leaked() {
        let response = AppError::Database("connection refused on 5432".into()).error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Server error");
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AppError::Database(_)));
    }
}
