//! Error taxonomy for the gateway handlers.
//!
//! Every variant renders as the `{success:false, message}` envelope through
//! the single `IntoResponse` impl below. Transport and decode details go to
//! the log only.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::http::response;
use crate::observability::metrics;

/// Message used for every failure the client cannot act on.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Backend base URL is unset.
    #[error("API URL not configured")]
    NotConfigured,

    /// Protected call without a session credential.
    #[error("Unauthorized")]
    Unauthorized,

    /// Client input rejected before any backend call.
    #[error("{0}")]
    Validation(String),

    /// Request body over `security.max_body_size`.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// Proxy method outside GET/POST/PUT/PATCH/DELETE.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Backend answered 2xx but without the expected token.
    #[error("Invalid response from authentication server")]
    UpstreamContract,

    /// Backend answered with a non-success status.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream payload is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed multipart body: {0}")]
    Multipart(#[source] MultipartError),
}

impl From<BytesRejection> for GatewayError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge
        } else {
            GatewayError::Validation("Invalid request body".to_string())
        }
    }
}

impl From<PathRejection> for GatewayError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection, "Unusable proxy path");
        GatewayError::Validation("Invalid request path".to_string())
    }
}

impl From<MultipartError> for GatewayError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge
        } else {
            GatewayError::Multipart(err)
        }
    }
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::UpstreamContract => StatusCode::BAD_GATEWAY,
            GatewayError::Upstream { status, .. } => *status,
            GatewayError::Transport(_) | GatewayError::Decode(_) | GatewayError::Multipart(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to hand to the browser.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Transport(_) | GatewayError::Decode(_) | GatewayError::Multipart(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            GatewayError::Transport(_) | GatewayError::Decode(_) | GatewayError::Multipart(_) => {
                tracing::error!(error = %self, "Request failed");
                metrics::record_upstream_error(error_kind(&self));
            }
            GatewayError::NotConfigured => {
                tracing::error!("Backend base URL is not configured");
            }
            GatewayError::UpstreamContract => {
                tracing::warn!("Login response did not contain an access token");
                metrics::record_upstream_error("contract");
            }
            _ => {
                tracing::debug!(status = %status, error = %self, "Request rejected");
            }
        }
        response::failure(status, self.public_message())
    }
}

fn error_kind(err: &GatewayError) -> &'static str {
    match err {
        GatewayError::Transport(_) => "transport",
        GatewayError::Decode(_) => "decode",
        GatewayError::Multipart(_) => "multipart",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(GatewayError::NotConfigured.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(GatewayError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            GatewayError::Validation("No file provided".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(GatewayError::UpstreamContract.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(GatewayError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(GatewayError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            GatewayError::Upstream {
                status: StatusCode::CONFLICT,
                message: "Email taken".into()
            }
            .status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn decode_details_are_hidden() {
        let err: GatewayError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn upstream_message_is_passed_through() {
        let err = GatewayError::Upstream {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid credentials".into(),
        };
        assert_eq!(err.public_message(), "Invalid credentials");
    }
}
