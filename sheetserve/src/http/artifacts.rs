//! Artifact endpoints: PDF reports and the per-sheet totals chart.

use std::path::PathBuf;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::error::ApiError;
use crate::render::{chart, pdf};
use crate::report::Report;

use super::{ApiJson, AppState};

#[derive(Debug, Serialize)]
pub struct PdfResponse {
    pub pdf_path: String,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub graph_path: String,
}

/// Render the summary PDF for the posted report.
pub async fn generate_pdf(
    State(state): State<AppState>,
    ApiJson(report): ApiJson<Report>,
) -> Result<Json<PdfResponse>, ApiError> {
    let path = state.storage.artifact_path("report", "pdf");
    let pdf_path = render_blocking(move || {
        pdf::write_summary_pdf(&report, &path)?;
        Ok(path)
    })
    .await?;

    log::info!("wrote summary PDF {}", pdf_path.display());
    Ok(Json(PdfResponse {
        pdf_path: pdf_path.display().to_string(),
    }))
}

/// Render the detailed PDF. The totals chart is rendered from the same
/// report and embedded, so the endpoint needs no previously written chart
/// file on disk.
pub async fn generate_detailed_pdf(
    State(state): State<AppState>,
    ApiJson(report): ApiJson<Report>,
) -> Result<Json<PdfResponse>, ApiError> {
    let chart_path = state.storage.artifact_path("sheet_totals", "png");
    let path = state.storage.artifact_path("detailed_report", "pdf");
    let pdf_path = render_blocking(move || {
        chart::write_totals_chart(&report, &chart_path)?;
        pdf::write_detailed_pdf(&report, &chart_path, &path)?;
        Ok(path)
    })
    .await?;

    log::info!("wrote detailed PDF {}", pdf_path.display());
    Ok(Json(PdfResponse {
        pdf_path: pdf_path.display().to_string(),
    }))
}

/// Render the per-sheet totals bar chart for the posted report.
pub async fn plot_chart(
    State(state): State<AppState>,
    ApiJson(report): ApiJson<Report>,
) -> Result<Json<ChartResponse>, ApiError> {
    let path = state.storage.artifact_path("sheet_totals", "png");
    let graph_path = render_blocking(move || {
        chart::write_totals_chart(&report, &path)?;
        Ok(path)
    })
    .await?;

    log::info!("wrote totals chart {}", graph_path.display());
    Ok(Json(ChartResponse {
        graph_path: graph_path.display().to_string(),
    }))
}

/// Rendering is synchronous file IO; run it off the async workers.
async fn render_blocking<F>(render: F) -> Result<PathBuf, ApiError>
where
    F: FnOnce() -> anyhow::Result<PathBuf> + Send + 'static,
{
    let path = tokio::task::spawn_blocking(render)
        .await
        .map_err(|e| anyhow::anyhow!("render task failed: {}", e))?
        .map_err(ApiError::Internal)?;
    Ok(path)
}
