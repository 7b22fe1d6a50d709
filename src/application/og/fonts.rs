//! Resolve a font selector into subsetted font bytes from the remote font service.

use bytes::Bytes;
use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};
use url::Url;

use super::fetch::AssetFetcher;

static FONT_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"src: url\((.+?)\) format\('(opentype|truetype)'\)")
        .expect("font src pattern is valid")
});

pub const REGULAR_WEIGHT: u16 = 400;
pub const HEAVY_WEIGHT: u16 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KnownFamily {
    name: &'static str,
    generic: &'static str,
}

fn known_family(selector: &str) -> Option<KnownFamily> {
    match selector.trim().to_ascii_lowercase().as_str() {
        "inter" => Some(KnownFamily {
            name: "Inter",
            generic: "sans-serif",
        }),
        "ibm-plex-serif" => Some(KnownFamily {
            name: "IBM Plex Serif",
            generic: "serif",
        }),
        _ => None,
    }
}

fn generic_family(selector: &str) -> &'static str {
    known_family(selector).map_or("sans-serif", |family| family.generic)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    pub weight: u16,
    pub data: Bytes,
}

/// Font data ready for the rasterizer. `faces` is empty when only a system font is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAssets {
    pub css_family: String,
    pub faces: Vec<FontFace>,
}

impl FontAssets {
    fn system(selector: &str) -> Self {
        Self {
            css_family: generic_family(selector).to_string(),
            faces: Vec::new(),
        }
    }

    /// Generic family to fall back on when a glyph is missing from the loaded faces.
    pub fn generic_family(&self) -> &'static str {
        if self.css_family.contains("Serif") || self.css_family == "serif" {
            "serif"
        } else {
            "sans-serif"
        }
    }
}

/// Fetch font bytes covering `sample_text`. Never fails: any problem yields system fonts.
pub async fn resolve_font_assets(
    fetcher: &dyn AssetFetcher,
    font_api_base: &Url,
    selector: &str,
    sample_text: &str,
) -> FontAssets {
    let Some(family) = known_family(selector) else {
        debug!(
            target = "bordful::og::fonts",
            selector, "unsupported font selector, using system font"
        );
        return FontAssets::system(selector);
    };

    match fetch_font_bytes(fetcher, font_api_base, family.name, sample_text).await {
        Some(data) => FontAssets {
            css_family: family.name.to_string(),
            faces: vec![
                FontFace {
                    weight: REGULAR_WEIGHT,
                    data: data.clone(),
                },
                FontFace {
                    weight: HEAVY_WEIGHT,
                    data,
                },
            ],
        },
        None => {
            counter!("bordful_og_asset_fallback_total", "asset" => "font").increment(1);
            FontAssets::system(selector)
        }
    }
}

async fn fetch_font_bytes(
    fetcher: &dyn AssetFetcher,
    font_api_base: &Url,
    family: &str,
    sample_text: &str,
) -> Option<Bytes> {
    let stylesheet_url = stylesheet_url(font_api_base, family, sample_text)?;

    let stylesheet = match fetcher.get(stylesheet_url.as_str()).await {
        Ok(response) if response.is_success() => response,
        Ok(response) => {
            warn!(
                target = "bordful::og::fonts",
                family,
                status = response.status,
                "font stylesheet request was rejected"
            );
            return None;
        }
        Err(err) => {
            warn!(target = "bordful::og::fonts", family, error = %err, "font stylesheet request failed");
            return None;
        }
    };

    let css = String::from_utf8_lossy(&stylesheet.body);
    let Some(resource) = first_font_resource(&css) else {
        warn!(
            target = "bordful::og::fonts",
            family, "font stylesheet has no opentype or truetype source"
        );
        return None;
    };

    match fetcher.get(&resource).await {
        Ok(font) if font.is_success() && !font.body.is_empty() => Some(font.body),
        Ok(font) => {
            warn!(
                target = "bordful::og::fonts",
                family,
                status = font.status,
                "font file request was rejected"
            );
            None
        }
        Err(err) => {
            warn!(target = "bordful::og::fonts", family, error = %err, "font file request failed");
            None
        }
    }
}

fn stylesheet_url(font_api_base: &Url, family: &str, sample_text: &str) -> Option<Url> {
    let mut url = font_api_base.clone();
    url.path_segments_mut().ok()?.pop_if_empty().push("css2");
    url.query_pairs_mut()
        .append_pair("family", family)
        .append_pair("text", sample_text);
    Some(url)
}

/// First `src: url(...) format('opentype'|'truetype')` resource in a stylesheet.
pub fn first_font_resource(css: &str) -> Option<String> {
    let captures = FONT_SRC.captures(css)?;
    let resource = captures
        .get(1)?
        .as_str()
        .trim()
        .trim_matches(|ch| ch == '"' || ch == '\'');
    (!resource.is_empty()).then(|| resource.to_string())
}
