use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Required form fields are missing or have the wrong shape
    #[error("Request validation failed: {}", summarize(.errors))]
    Validation { errors: Vec<FieldError> },

    /// Malformed request body
    #[error("{message}")]
    BadRequest { message: String },

    /// Upload exceeds the configured size limit
    #[error("{message}")]
    PayloadTooLarge { message: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// One entry of a 422 response's `detail` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Machine-readable error kind, e.g. `missing`
    #[serde(rename = "type")]
    pub kind: String,
    /// Location of the offending value, e.g. `["body", "file"]`
    pub loc: Vec<String>,
    /// Human-readable message
    pub msg: String,
    /// The rejected input, if any
    #[schema(value_type = Option<Object>)]
    pub input: Option<serde_json::Value>,
}

impl FieldError {
    /// A required body field that was not supplied
    pub fn missing(field: &str) -> Self {
        Self {
            kind: "missing".to_string(),
            loc: vec!["body".to_string(), field.to_string()],
            msg: "Field required".to_string(),
            input: None,
        }
    }

    /// A body field that was supplied with the wrong shape
    pub fn value_error(field: &str, msg: impl Into<String>) -> Self {
        Self {
            kind: "value_error".to_string(),
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
            input: None,
        }
    }
}

/// Body of a 422 response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorBody {
    pub detail: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.loc.join("."), e.msg))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Internal { .. } | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { .. } => "Request validation failed".to_string(),
            Error::BadRequest { message } | Error::PayloadTooLarge { message } => message.clone(),
            Error::Internal { .. } | Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Validation { .. } | Error::BadRequest { .. } | Error::PayloadTooLarge { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();

        match self {
            Error::Validation { errors } => (status, Json(ValidationErrorBody { detail: errors })).into_response(),
            other => (status, Json(json!({ "detail": other.user_message() }))).into_response(),
        }
    }
}
