//! Workbook upload endpoint.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use serde::Serialize;

use crate::error::ApiError;
use crate::workbook::Workbook;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_path: String,
    pub sheet_names: Vec<String>,
    pub number_of_sheets: usize,
}

/// Accept a multipart `file` field, store it under a uuid-keyed name, and
/// answer with the workbook's sheet names.
pub async fn upload_workbook(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            upload = Some((file_name, data));
            break;
        }
    }

    let (file_name, data) = upload.ok_or_else(|| ApiError::bad_request("No file part"))?;
    if file_name.is_empty() {
        return Err(ApiError::bad_request("No selected file"));
    }
    if !file_name.ends_with(".xlsx") {
        return Err(ApiError::UnsupportedFileType);
    }

    let path = state.storage.upload_path(&file_name);
    tokio::fs::write(&path, &data)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to store upload {}: {}", path.display(), e))?;

    let sheet_names = {
        let path = path.clone();
        tokio::task::spawn_blocking(move || {
            Workbook::open(&path).map(|wb| wb.sheet_names().to_vec())
        })
        .await
        .map_err(|e| anyhow::anyhow!("upload task failed: {}", e))?
        .map_err(|e| ApiError::Workbook(format!("{e:#}")))?
    };

    log::info!(
        "stored upload {} ({} sheets)",
        path.display(),
        sheet_names.len()
    );

    Ok(Json(UploadResponse {
        file_path: path.display().to_string(),
        number_of_sheets: sheet_names.len(),
        sheet_names,
    }))
}
