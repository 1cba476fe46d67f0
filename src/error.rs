//! Gateway error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Operation names used to prefix error messages
pub const TRANSLATION: &str = "Translation";
pub const SUMMARIZATION: &str = "Summarization";
pub const TTS: &str = "TTS";
pub const STT: &str = "STT";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed or missing request field; no provider was called
    #[error("{0}")]
    Validation(String),

    /// Request body exceeded the configured size limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Request payload could not be decoded (e.g. bad base64 audio)
    #[error("{operation} error: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    /// Non-success status or transport failure from an external provider
    #[error("{operation} error: {message}")]
    Provider {
        operation: &'static str,
        message: String,
    },
}

impl GatewayError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(operation: &'static str, msg: impl Into<String>) -> Self {
        Self::Decode {
            operation,
            message: msg.into(),
        }
    }

    pub fn provider(operation: &'static str, err: anyhow::Error) -> Self {
        Self::Provider {
            operation,
            message: describe(&err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Decode { .. } => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Provider { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Join an error's cause chain with ": ", skipping causes whose text the
/// outer messages already include (reqwest and hyper embed their sources).
fn describe(err: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(rejection.body_text())
        } else {
            Self::Validation(rejection.body_text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_operation_prefix() {
        let err = GatewayError::provider(TTS, anyhow::anyhow!("quota exceeded"));
        assert_eq!(err.to_string(), "TTS error: quota exceeded");

        let err = GatewayError::decode(STT, "invalid base64 audio");
        assert_eq!(err.to_string(), "STT error: invalid base64 audio");
    }

    #[test]
    fn status_follows_error_kind() {
        assert_eq!(
            GatewayError::validation("text must not be empty").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::decode(STT, "bad").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::provider(TRANSLATION, anyhow::anyhow!("down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn provider_message_keeps_distinct_causes_once() {
        let err = anyhow::anyhow!("Connection refused (os error 111)")
            .context("tcp connect error: Connection refused (os error 111)")
            .context("error sending request");
        let message = GatewayError::provider(TTS, err).to_string();

        assert_eq!(
            message,
            "TTS error: error sending request: tcp connect error: Connection refused (os error 111)"
        );
        assert_eq!(message.matches("Connection refused").count(), 1);
    }

    #[test]
    fn payload_too_large_maps_to_413() {
        assert_eq!(
            GatewayError::PayloadTooLarge("length limit exceeded".to_string()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
