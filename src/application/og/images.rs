//! Turn image references into self-contained data URIs.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::fetch::AssetFetcher;

const DEFAULT_CONTENT_TYPE: &str = "image/png";

static ROOT_SVG_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<svg\b[^>]*>").expect("svg tag pattern is valid"));
static DIMENSION_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+(?:width|height)\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'/>]+)"#)
        .expect("dimension attribute pattern is valid")
});

/// Absolute `http(s)` references are used verbatim; anything else is joined onto `base_url`.
pub fn absolute_image_url(reference: &str, base_url: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }
    let base = base_url.trim_end_matches('/');
    let path = reference.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Remove `width`/`height` from the root `<svg>` tag so the consumer's box decides the size.
pub fn strip_root_svg_dimensions(svg: &str) -> String {
    let Some(tag) = ROOT_SVG_TAG.find(svg) else {
        return svg.to_string();
    };
    let cleaned = DIMENSION_ATTR.replace_all(tag.as_str(), "");

    let mut out = String::with_capacity(svg.len());
    out.push_str(&svg[..tag.start()]);
    out.push_str(&cleaned);
    out.push_str(&svg[tag.end()..]);
    out
}

pub fn svg_data_uri(svg: &str) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(strip_root_svg_dimensions(svg))
    )
}

/// Fetch an image and embed it as a data URI. Returns an empty string when the image is
/// unavailable; callers treat that as "no image".
pub async fn resolve_image_as_data_uri(
    fetcher: &dyn AssetFetcher,
    reference: &str,
    base_url: &str,
) -> String {
    let reference = reference.trim();
    if reference.is_empty() {
        return String::new();
    }
    if reference.starts_with("data:") {
        return reference.to_string();
    }

    let url = absolute_image_url(reference, base_url);
    let response = match fetcher.get(&url).await {
        Ok(response) if response.is_success() => response,
        Ok(response) => {
            warn!(
                target = "bordful::og::images",
                url = %url,
                status = response.status,
                "image request was rejected"
            );
            counter!("bordful_og_asset_fallback_total", "asset" => "image").increment(1);
            return String::new();
        }
        Err(err) => {
            warn!(target = "bordful::og::images", url = %url, error = %err, "image request failed");
            counter!("bordful_og_asset_fallback_total", "asset" => "image").increment(1);
            return String::new();
        }
    };

    let content_type = response
        .content_type
        .as_deref()
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE);

    if content_type.contains("svg") {
        return svg_data_uri(&String::from_utf8_lossy(&response.body));
    }

    format!(
        "data:{content_type};base64,{}",
        STANDARD.encode(&response.body)
    )
}
