use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::state::{AppState, RenderedAsset};

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const SVG_CONTENT_TYPE: &str = "image/svg+xml";
const MAP_CACHE_CONTROL: &str = "public, max-age=300";

/// Serve the pre-rendered page. Nothing is rendered per request.
pub async fn get_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    asset_response(&state.page, HTML_CONTENT_TYPE, &headers)
}

pub async fn get_svg(State(state): State<AppState>, headers: HeaderMap) -> Response {
    asset_response(&state.svg, SVG_CONTENT_TYPE, &headers)
}

fn asset_response(asset: &RenderedAsset, content_type: &'static str, headers: &HeaderMap) -> Response {
    if if_none_match_matches(headers, &asset.etag) {
        return not_modified_response(MAP_CACHE_CONTROL, &asset.etag);
    }

    let mut response = Response::new(Body::from(asset.body.clone()));
    let response_headers = response.headers_mut();
    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response_headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(MAP_CACHE_CONTROL),
    );
    if let Ok(etag_header) = HeaderValue::from_str(&asset.etag) {
        response_headers.insert(header::ETAG, etag_header);
    }
    response
}

fn not_modified_response(cache_control: &'static str, etag: &str) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Ok(etag_header) = HeaderValue::from_str(etag) {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn normalize_etag(candidate: &str) -> &str {
    candidate.strip_prefix("W/").unwrap_or(candidate).trim()
}

fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}
