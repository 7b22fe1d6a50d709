//! Rasterize a composed SVG card into PNG bytes.

use std::sync::Arc;

use once_cell::sync::Lazy;
use resvg::{tiny_skia, usvg};

use super::compose::{CANVAS_HEIGHT, CANVAS_WIDTH};
use super::fonts::FontAssets;

static SYSTEM_FONTS: Lazy<usvg::fontdb::Database> = Lazy::new(|| {
    let mut database = usvg::fontdb::Database::new();
    database.load_system_fonts();
    database
});

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to parse composed svg: {0}")]
    Parse(String),
    #[error("failed to allocate a {CANVAS_WIDTH}x{CANVAS_HEIGHT} pixmap")]
    Allocate,
    #[error("failed to encode png: {0}")]
    Encode(String),
}

fn font_database(fonts: &FontAssets) -> usvg::fontdb::Database {
    let mut database = SYSTEM_FONTS.clone();
    let mut loaded: Vec<*const u8> = Vec::new();
    for face in &fonts.faces {
        // Weights can share one buffer; load each buffer once.
        let pointer = face.data.as_ptr();
        if loaded.contains(&pointer) {
            continue;
        }
        loaded.push(pointer);
        database.load_font_data(face.data.to_vec());
    }
    database
}

pub fn rasterize(svg: &str, fonts: &FontAssets) -> Result<Vec<u8>, RasterError> {
    let mut options = usvg::Options {
        font_family: fonts.generic_family().to_string(),
        ..usvg::Options::default()
    };
    options.fontdb = Arc::new(font_database(fonts));

    let tree =
        usvg::Tree::from_str(svg, &options).map_err(|err| RasterError::Parse(err.to_string()))?;
    let mut pixmap =
        tiny_skia::Pixmap::new(CANVAS_WIDTH, CANVAS_HEIGHT).ok_or(RasterError::Allocate)?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|err| RasterError::Encode(err.to_string()))
}
