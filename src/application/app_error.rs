use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid email address.")]
    InvalidEmail,

    #[error("First name is required.")]
    MissingName,

    #[error("This email is already on the waitlist.")]
    DuplicateEmail,

    #[error("Malformed request body: {0}")]
    InvalidRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Too many requests. Please slow down.")]
    RateLimited,

    #[error("Email delivery failed: {0}")]
    Email(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    InvalidEmail,
    MissingName,
    DuplicateEmail,
    InvalidRequest,
    StorageFailure,
    RateLimited,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidEmail => "INVALID_EMAIL",
            ErrorCode::MissingName => "MISSING_NAME",
            ErrorCode::DuplicateEmail => "DUPLICATE_EMAIL",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::StorageFailure => "STORAGE_FAILURE",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
