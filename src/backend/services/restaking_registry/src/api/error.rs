use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tracing::{error, warn};

use crate::utils::RegistryError;

/// Failure surfaced by an HTTP handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidAddress(&'static str),

    #[error("{0}")]
    InvalidFilter(String),

    #[error("Restaker not found")]
    RestakerNotFound,

    #[error("Validator not found")]
    ValidatorNotFound,

    #[error("No reward data found for this address")]
    RewardsNotFound,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAddress(_) => "INVALID_ADDRESS",
            Self::InvalidFilter(_) | Self::Registry(RegistryError::InvalidInput(_)) => {
                "INVALID_FILTER"
            }
            Self::RestakerNotFound => "RESTAKER_NOT_FOUND",
            Self::ValidatorNotFound => "VALIDATOR_NOT_FOUND",
            Self::RewardsNotFound => "REWARDS_NOT_FOUND",
            Self::Registry(RegistryError::NotFound(_)) => "NOT_FOUND",
            Self::Registry(e) if e.is_retryable() => "STORAGE_TIMEOUT",
            Self::Registry(_) => "INTERNAL_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Registry(e) if e.is_retryable() => {
                "Storage is temporarily unavailable, retry later".to_string()
            }
            Self::Registry(RegistryError::InvalidInput(_) | RegistryError::NotFound(_)) => {
                self.to_string()
            }
            Self::Registry(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidAddress(_) | Self::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            Self::RestakerNotFound | Self::ValidatorNotFound | Self::RewardsNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Registry(RegistryError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Registry(RegistryError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Registry(e) if e.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
            Self::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            warn!(error = %self, "Request failed on a retryable storage error");
        } else if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        HttpResponse::build(status).json(json!({
            "error": {
                "message": self.message(),
                "code": self.error_code(),
                "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            }
        }))
    }
}
