//! Embedded static asset serving.

use axum::{
    body::Body,
    extract::Path,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use include_dir::{Dir, include_dir};
use mime_guess::Mime;
use sha2::{Digest, Sha256};

use crate::application::error::ErrorReport;

static STATIC_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

const SOURCE: &str = "infra::assets::serve_static";

/// Serve an embedded asset under `/static/`.
pub async fn serve_static(headers: HeaderMap, path: Option<Path<String>>) -> Response {
    let captured = path.map(|Path(value)| value);
    let Some(asset) = resolve_asset(&STATIC_ASSETS, captured) else {
        let mut response = StatusCode::NOT_FOUND.into_response();
        ErrorReport::from_message(SOURCE, StatusCode::NOT_FOUND, "Static asset not found")
            .attach(&mut response);
        return response;
    };

    let matches = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == asset.etag);
    if matches {
        let mut response = StatusCode::NOT_MODIFIED.into_response();
        if let Ok(value) = HeaderValue::from_str(&asset.etag) {
            response.headers_mut().insert(header::ETAG, value);
        }
        return response;
    }

    asset.into_response()
}

pub(crate) struct Asset {
    contents: &'static [u8],
    mime: Mime,
    etag: String,
}

pub(crate) fn resolve_asset(bundle: &'static Dir<'static>, path: Option<String>) -> Option<Asset> {
    let candidate = path.unwrap_or_default();
    let candidate = candidate.trim_start_matches('/');

    if candidate.is_empty() || candidate.ends_with('/') || candidate.contains("..") {
        return None;
    }

    let file = bundle.get_file(candidate)?;
    let contents = file.contents();
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let digest = hex::encode(hasher.finalize());
    Some(Asset {
        contents,
        mime: mime_guess::from_path(candidate).first_or_octet_stream(),
        etag: format!("\"{}\"", &digest[..16]),
    })
}

impl IntoResponse for Asset {
    fn into_response(self) -> Response {
        let bytes = Bytes::from_static(self.contents);
        let len = bytes.len();
        let mut response = Response::new(Body::from(bytes));

        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(self.mime.as_ref()) {
            headers.insert(header::CONTENT_TYPE, value);
        }
        if let Ok(value) = HeaderValue::from_str(&len.to_string()) {
            headers.insert(header::CONTENT_LENGTH, value);
        }
        if let Ok(value) = HeaderValue::from_str(&self.etag) {
            headers.insert(header::ETAG, value);
        }
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=86400"),
        );

        response
    }
}
