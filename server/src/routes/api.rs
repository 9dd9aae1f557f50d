use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use choropleth_shared::RegionId;

use crate::state::{AppState, RegionEntry};

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let summary = state.summary;
    Json(serde_json::json!({
        "status": "ok",
        "regions": summary.regions,
        "matched": summary.matched,
        "unmatched": summary.unmatched,
        "duplicate_stats": summary.duplicate_stats,
        "rendered_at": summary.rendered_at.to_rfc3339(),
    }))
}

/// Hover data for one region, as precomputed by the join.
pub async fn get_region(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RegionEntry>, StatusCode> {
    let id = normalize_region_id(&id)?;
    state
        .regions
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

fn normalize_region_id(raw: &str) -> Result<RegionId, StatusCode> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(RegionId::from(trimmed))
}
