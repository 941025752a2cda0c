//! Request and response types for the `/powerpoint` upload route.
//!
//! [`PowerpointUpload`] is an extractor: it reads the whole multipart body and rejects the
//! request with a 422 before the handler runs when a required field is missing.

use crate::errors::{Error, FieldError};
use axum::{
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::StatusCode,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const FILE_FIELD: &str = "file";
pub const MESSAGE_FIELD: &str = "chart_core_message";

/// Fixed acknowledgement returned for every accepted upload
pub const FILE_RECEIVED: &str = "File received successfully";

/// A file part received in a multipart request. Lives for one request only.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename. Untrusted and not sanitized.
    pub filename: String,
    /// Content type declared by the client, unchecked
    pub content_type: Option<String>,
    pub content: Bytes,
}

/// The validated `/powerpoint` form: one file plus the message meant to guide conversion.
#[derive(Debug, Clone)]
pub struct PowerpointUpload {
    pub file: UploadedFile,
    pub chart_core_message: String,
}

/// OpenAPI description of the multipart form
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct PowerpointUploadForm {
    /// Spreadsheet to convert
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Core message the generated chart should convey
    pub chart_core_message: String,
}

/// Acknowledgement body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadAcknowledgement {
    #[schema(example = "File received successfully")]
    pub message: String,
}

impl UploadAcknowledgement {
    pub fn received() -> Self {
        Self {
            message: FILE_RECEIVED.to_string(),
        }
    }
}

fn multipart_error(e: MultipartError) -> Error {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge {
            message: "Upload exceeds the maximum allowed size".to_string(),
        }
    } else {
        Error::BadRequest {
            message: format!("There was an error parsing the body: {}", e.body_text()),
        }
    }
}

enum FilePart {
    Upload(UploadedFile),
    /// A `file` part sent as a plain text field, without a filename
    Text,
}

impl<S> FromRequest<S> for PowerpointUpload
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // A body that is not multipart carries none of the required fields
        let mut multipart = match Multipart::from_request(req, state).await {
            Ok(multipart) => multipart,
            Err(rejection) => {
                tracing::debug!("Request is not multipart form data: {}", rejection);
                return Err(Error::Validation {
                    errors: vec![FieldError::missing(FILE_FIELD), FieldError::missing(MESSAGE_FIELD)],
                });
            }
        };

        let mut file: Option<FilePart> = None;
        let mut message: Option<String> = None;

        // Later occurrences of a field replace earlier ones
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                FILE_FIELD => match field.file_name().map(str::to_string) {
                    Some(filename) => {
                        let content_type = field.content_type().map(str::to_string);
                        let content = field.bytes().await.map_err(multipart_error)?;
                        file = Some(FilePart::Upload(UploadedFile {
                            filename,
                            content_type,
                            content,
                        }));
                    }
                    None => {
                        field.bytes().await.map_err(multipart_error)?;
                        file = Some(FilePart::Text);
                    }
                },
                MESSAGE_FIELD => {
                    // Decoded strictly as UTF-8; no charset sniffing
                    let raw = field.bytes().await.map_err(multipart_error)?;
                    let text = String::from_utf8(raw.to_vec()).map_err(|_| Error::BadRequest {
                        message: format!("There was an error parsing the body: {MESSAGE_FIELD} is not valid UTF-8"),
                    })?;
                    message = Some(text);
                }
                other => {
                    tracing::debug!(field = other, "Ignoring unexpected form field");
                }
            }
        }

        let mut errors = Vec::new();

        let file = match file {
            Some(FilePart::Upload(upload)) => Some(upload),
            Some(FilePart::Text) => {
                errors.push(FieldError::value_error(FILE_FIELD, "Expected UploadFile, received: str"));
                None
            }
            None => {
                errors.push(FieldError::missing(FILE_FIELD));
                None
            }
        };

        // An empty text field counts as not supplied
        let message = message.filter(|m| !m.is_empty());
        if message.is_none() {
            errors.push(FieldError::missing(MESSAGE_FIELD));
        }

        match (file, message) {
            (Some(file), Some(chart_core_message)) => Ok(Self { file, chart_core_message }),
            _ => Err(Error::Validation { errors }),
        }
    }
}
