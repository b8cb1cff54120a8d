//! Aggregation endpoints: /process and /report.
//!
//! Both take a workbook path plus a list of operation requests and answer
//! with the assembled report; they differ only in the request key naming the
//! list (`operations` vs `sheets`).

use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::report::{OperationRequest, Report, assemble};
use crate::workbook::Workbook;

use super::ApiJson;

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub file_path: String,
    pub operations: Vec<OperationRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub file_path: String,
    pub sheets: Vec<OperationRequest>,
}

pub async fn process_operations(
    ApiJson(request): ApiJson<ProcessRequest>,
) -> Result<Json<Report>, ApiError> {
    run_requests(request.file_path, request.operations).await
}

pub async fn generate_report(
    ApiJson(request): ApiJson<ReportRequest>,
) -> Result<Json<Report>, ApiError> {
    run_requests(request.file_path, request.sheets).await
}

async fn run_requests(
    file_path: String,
    requests: Vec<OperationRequest>,
) -> Result<Json<Report>, ApiError> {
    if file_path.is_empty() {
        return Err(ApiError::bad_request(
            "Missing \"file_path\" key in request data",
        ));
    }

    let report = tokio::task::spawn_blocking(move || -> Result<Report, ApiError> {
        let mut workbook =
            Workbook::open(&file_path).map_err(|e| ApiError::Workbook(format!("{e:#}")))?;
        assemble(&mut workbook, &requests).map_err(ApiError::from)
    })
    .await
    .map_err(|e| anyhow::anyhow!("aggregation task failed: {}", e))??;

    log::debug!("assembled report for {} sheet(s)", report.len());
    Ok(Json(report))
}
