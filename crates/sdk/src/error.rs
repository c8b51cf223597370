use serde::{Deserialize, Serialize};

use crate::credential::CredentialError;
use crate::realtime::RealtimeError;

/// HTTP-ish status reported when a caller cancels an in-flight request.
pub const STATUS_CANCELED: u16 = 499;

/// Machine-readable error descriptor mirroring the server's error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: u16,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Capability check failed. Raised before any network I/O.
    #[error("{0}")]
    NotAllowed(String),
    #[error("malformed API key: {0}")]
    Credential(#[from] CredentialError),
    #[error("API key is not a valid header value")]
    InvalidToken,
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    /// Server answered with a non-2xx status.
    #[error("HTTP status {}: {}", .0.code, .0.message)]
    Remote(ErrorResponse),
    /// The caller's cancellation signal fired mid-request.
    #[error("canceled")]
    Canceled,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("realtime channel error: {0}")]
    Realtime(#[from] RealtimeError),
}

impl ApiError {
    /// Numeric status following HTTP semantics: 400 validation,
    /// 403 denied, 404 not found, 499 client-canceled, 500 otherwise.
    pub fn code(&self) -> u16 {
        match self {
            ApiError::NotAllowed(_) => 403,
            ApiError::Credential(_) | ApiError::InvalidToken => 400,
            ApiError::Remote(descriptor) => descriptor.code,
            ApiError::Canceled => STATUS_CANCELED,
            ApiError::Reqwest(err) => err.status().map(|s| s.as_u16()).unwrap_or(500),
            ApiError::UrlParse(_) | ApiError::Io(_) | ApiError::Realtime(_) => 500,
        }
    }

    /// Lower any failure to the uniform error descriptor handed to callers.
    pub fn descriptor(&self) -> ErrorResponse {
        match self {
            ApiError::Remote(descriptor) => descriptor.clone(),
            other => ErrorResponse::new(other.code(), other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canceled_maps_to_499() {
        let descriptor = ApiError::Canceled.descriptor();
        assert!(!descriptor.success);
        assert_eq!(descriptor.code, STATUS_CANCELED);
        assert_eq!(descriptor.message, "canceled");
    }

    #[test]
    fn denied_operation_maps_to_403() {
        let err = ApiError::NotAllowed("DELETE_FILE is not allowed.".into());
        assert_eq!(err.code(), 403);
        assert_eq!(err.descriptor().message, "DELETE_FILE is not allowed.");
    }

    #[test]
    fn remote_descriptor_passes_through() {
        let err = ApiError::Remote(ErrorResponse::new(404, "Directory not found"));
        assert_eq!(err.code(), 404);
        assert_eq!(err.descriptor(), ErrorResponse::new(404, "Directory not found"));
    }
}
