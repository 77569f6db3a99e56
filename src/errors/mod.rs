use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    InvalidArgument(String),
    Conflict(String),
    Database(String),
}

/// Unified error envelope: every failure, domain or otherwise, comes back as
/// `{"kind": ..., "message": ...}`.
#[derive(Serialize)]
struct ErrorResponse<'a> {
    kind: &'a str,
    message: &'a str,
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::InvalidArgument(_) => "invalid_argument",
            AppError::Conflict(_) => "conflict",
            AppError::Database(_) => "internal",
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::NotFound(msg)
            | AppError::InvalidArgument(msg)
            | AppError::Conflict(msg)
            | AppError::Database(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InvalidArgument(msg) => write!(f, "Invalid Argument: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = ErrorResponse {
            kind: self.kind(),
            message: self.message(),
        };
        match self {
            AppError::NotFound(_) => HttpResponse::NotFound().json(body),
            // Duplicate ids surface as 400, matching the existing API contract.
            AppError::InvalidArgument(_) | AppError::Conflict(_) => {
                HttpResponse::BadRequest().json(body)
            }
            AppError::Database(_) => HttpResponse::InternalServerError().json(body),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // A unique-index violation means two writers raced past the
        // exists-check; the loser is a duplicate-id conflict, not an
        // internal failure.
        if err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation())
        {
            return AppError::Conflict(err.to_string());
        }
        error!("database error: {}", err);
        AppError::Database(err.to_string())
    }
}
