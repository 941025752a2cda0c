//! OpenAPI documentation for the HTTP API.
//!
//! The document is served at `/openapi.json` and rendered at `/docs` when `enable_docs` is set.

use crate::api;
use crate::api::models::powerpoint::{PowerpointUploadForm, UploadAcknowledgement};
use crate::errors::{FieldError, ValidationErrorBody};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "deckctl",
        description = "Turn spreadsheet data into slide decks"
    ),
    paths(api::handlers::powerpoint::convert_excel_to_pptx),
    components(schemas(PowerpointUploadForm, UploadAcknowledgement, ValidationErrorBody, FieldError)),
    tags(
        (name = "powerpoint", description = "Spreadsheet upload for slide generation"),
    )
)]
pub struct ApiDoc;
