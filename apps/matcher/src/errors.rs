use thiserror::Error;

/// Application-level error type.
/// Every variant is recovered at the request boundary and surfaced to the
/// caller as a message; no error here is fatal to the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps the error to the string shown to the caller/UI.
    /// Validation and auth messages pass through verbatim; internal detail
    /// is logged and replaced with a generic message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Auth(msg) => msg.clone(),
            AppError::Store(msg) => {
                tracing::error!("Store error: {msg}");
                "Could not read or write saved data".to_string()
            }
            AppError::Catalog(e) => {
                tracing::error!("Catalog error: {e}");
                "Could not read the course catalog".to_string()
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                "A file operation failed".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal error occurred".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_passes_through() {
        let err = AppError::Validation("Please enter a job description".to_string());
        assert_eq!(err.user_message(), "Please enter a job description");
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let err = AppError::Internal(anyhow::anyhow!("secret path /var/lib/x"));
        assert!(!err.user_message().contains("/var/lib/x"));
    }
}
