//! Error types for Bookshelf server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes reported alongside every error response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NoSuchUser = 4,
    NoSuchItem = 5,
    ItemNotAvailable = 7,
    MaxBorrowsReached = 11,
    BadValue = 18,
    NotBorrowed = 19,
    UserHasBorrowedBooks = 21,
    BookBorrowed = 22,
    StorageFailure = 23,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UserNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    MaxBorrowsReached(String),

    #[error("{0}")]
    NotAvailable(String),

    #[error("{0}")]
    NotBorrowed(String),

    #[error("{0}")]
    UserHasBorrowedBooks(String),

    #[error("{0}")]
    BookBorrowed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Code and HTTP status this error maps to
    pub fn classify(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchItem),
            AppError::UserNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchUser),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::MaxBorrowsReached(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::MaxBorrowsReached)
            }
            AppError::NotAvailable(_) => (StatusCode::CONFLICT, ErrorCode::ItemNotAvailable),
            AppError::NotBorrowed(_) => (StatusCode::CONFLICT, ErrorCode::NotBorrowed),
            AppError::UserHasBorrowedBooks(_) => {
                (StatusCode::CONFLICT, ErrorCode::UserHasBorrowedBooks)
            }
            AppError::BookBorrowed(_) => (StatusCode::CONFLICT, ErrorCode::BookBorrowed),
            AppError::Storage(_) | AppError::Serialization(_) | AppError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::StorageFailure)
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_business_errors() {
        let (status, code) = AppError::MaxBorrowsReached("User already has 3 books".into()).classify();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, ErrorCode::MaxBorrowsReached);

        let (status, code) = AppError::UserNotFound("User not found".into()).classify();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, ErrorCode::NoSuchUser);
    }

    #[test]
    fn test_message_is_human_readable() {
        let err = AppError::NotBorrowed("User does not have this book".into());
        assert_eq!(err.to_string(), "User does not have this book");
    }

    #[test]
    fn test_storage_errors_are_internal() {
        let err = AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(err.classify().0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
