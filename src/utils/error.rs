use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    ProviderError(String),
    NotFound(String),
    InvalidRequest(String),
    QuotaExceeded(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::ProviderError(msg) => write!(f, "Email provider error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::QuotaExceeded(msg) => write!(f, "Quota exceeded: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
