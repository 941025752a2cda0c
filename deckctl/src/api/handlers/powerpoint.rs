use crate::api::models::powerpoint::{PowerpointUpload, PowerpointUploadForm, UploadAcknowledgement};
use crate::errors::ValidationErrorBody;
use axum::Json;

#[utoipa::path(
    post,
    path = "/powerpoint",
    tag = "powerpoint",
    summary = "Upload spreadsheet",
    description = "Receive a spreadsheet and the core message its chart should convey. \
                   Slide generation is not implemented yet: the upload is acknowledged and discarded.",
    request_body(
        content = PowerpointUploadForm,
        content_type = "multipart/form-data",
        description = "Spreadsheet file and chart message"
    ),
    responses(
        (status = 200, description = "File received", body = UploadAcknowledgement),
        (status = 400, description = "Malformed multipart body"),
        (status = 413, description = "Upload exceeds the configured size limit"),
        (status = 422, description = "A required field is missing", body = ValidationErrorBody)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn convert_excel_to_pptx(upload: PowerpointUpload) -> Json<UploadAcknowledgement> {
    tracing::info!("Received message: {}", upload.chart_core_message);
    tracing::info!("Received file: {}", upload.file.filename);
    tracing::debug!(
        bytes = upload.file.content.len(),
        content_type = ?upload.file.content_type,
        "Upload discarded"
    );

    Json(UploadAcknowledgement::received())
}
