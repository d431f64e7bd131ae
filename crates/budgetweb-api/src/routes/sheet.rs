//! Sheet management endpoints - upload, reload, months, pipeline stats
//!
//! Endpoints:
//! - api_months: Distinct expense months in the loaded sheet (JSON)
//! - api_stats: Pipeline accounting, incl. dropped-row counts (JSON)
//! - api_upload_sheet: Replace the snapshot with an uploaded CSV body
//! - api_reload: Re-read the configured sheet from disk

use crate::error::ApiError;
use crate::AppState;

/// Distinct expense months in the loaded sheet (JSON API)
pub async fn api_months(state: axum::extract::State<AppState>) -> String {
    let workbook = state.workbook.read().await;
    let months: Vec<String> = workbook
        .available_months()
        .iter()
        .map(|m| m.to_string())
        .collect();
    serde_json::to_string(&months).unwrap_or_default()
}

/// Pipeline accounting for the loaded sheet (JSON API)
pub async fn api_stats(state: axum::extract::State<AppState>) -> String {
    let workbook = state.workbook.read().await;
    serde_json::to_string(&workbook.stats()).unwrap_or_default()
}

/// Replace the in-memory sheet with an uploaded CSV body.
///
/// Structural problems (missing required columns) come back as 422 with
/// the column names; the previous snapshot stays in place.
pub async fn api_upload_sheet(
    state: axum::extract::State<AppState>,
    body: String,
) -> Result<String, ApiError> {
    let mut workbook = state.workbook.write().await;
    let stats = workbook.load_content(&body).await?;

    log::info!(
        "Sheet uploaded: {} rows, {} allocable, {} dropped",
        stats.source_rows,
        stats.allocated_rows,
        stats.dropped_rows()
    );
    Ok(serde_json::to_string(&stats).unwrap_or_default())
}

/// Re-read the sheet this workbook was loaded from (JSON API)
pub async fn api_reload(state: axum::extract::State<AppState>) -> Result<String, ApiError> {
    let mut workbook = state.workbook.write().await;
    let stats = workbook.reload().await?;
    log::info!("Sheet reloaded: {} rows", stats.source_rows);
    Ok(serde_json::to_string(&stats).unwrap_or_default())
}
