use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use leadgen_store::{render_workbook, StoreError, EXPORT_FILE_NAME};

use super::{ApiError, AppState};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Streams the saved leads as a spreadsheet download.
///
/// A missing file and an empty collection both answer 404.
pub(super) async fn export_leads(State(state): State<AppState>) -> Result<Response, ApiError> {
    let leads = match state.store.load().await {
        Ok(leads) if !leads.is_empty() => leads,
        Ok(_) | Err(StoreError::NotFound { .. }) => return Err(ApiError::NoLeads),
        Err(e) => return Err(e.into()),
    };

    let rows = leads.len();
    let bytes = tokio::task::spawn_blocking(move || render_workbook(&leads)).await??;
    tracing::info!(rows, bytes = bytes.len(), "exported leads");

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
