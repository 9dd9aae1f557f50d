use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use choropleth_shared::{JoinedView, RegionId, Rgb};
use serde::Serialize;

use crate::render::MapDocument;

/// A rendered body plus the strong validator it is served with.
#[derive(Debug, Clone)]
pub struct RenderedAsset {
    pub body: Bytes,
    pub etag: String,
}

impl RenderedAsset {
    pub fn new(body: impl Into<Bytes>) -> Self {
        let body = body.into();
        let etag = content_etag(&body);
        Self { body, etag }
    }
}

/// Per-region payload of `/api/regions/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionEntry {
    pub fips: RegionId,
    pub label: Option<String>,
    pub education: f64,
    pub fill: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderSummary {
    pub regions: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub duplicate_stats: usize,
    pub rendered_at: DateTime<Utc>,
}

/// Everything the HTTP layer serves. Built once after rendering and only read
/// afterwards.
#[derive(Clone)]
pub struct AppState {
    pub page: Arc<RenderedAsset>,
    pub svg: Arc<RenderedAsset>,
    pub regions: Arc<HashMap<RegionId, RegionEntry>>,
    pub summary: RenderSummary,
}

impl AppState {
    pub fn new(view: &JoinedView<'_>, document: MapDocument) -> Self {
        let regions = view
            .regions
            .iter()
            .map(|joined| {
                let entry = RegionEntry {
                    fips: joined.id().clone(),
                    label: joined.label().map(|label| label.display_text()),
                    education: joined.metric(),
                    fill: joined.fill,
                };
                (entry.fips.clone(), entry)
            })
            .collect();

        let summary = RenderSummary {
            regions: view.regions.len(),
            matched: view.matched(),
            unmatched: view.unmatched(),
            duplicate_stats: view.duplicates.len(),
            rendered_at: Utc::now(),
        };

        Self {
            page: Arc::new(RenderedAsset::new(document.html)),
            svg: Arc::new(RenderedAsset::new(document.svg)),
            regions: Arc::new(regions),
            summary,
        }
    }
}

fn content_etag(body: &[u8]) -> String {
    format!("\"{:08x}-{:x}\"", crc32fast::hash(body), body.len())
}
