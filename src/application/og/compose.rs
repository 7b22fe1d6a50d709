//! Lay out an OG card as an SVG document on a fixed 1200×630 canvas.

use std::fmt::Write as _;

use crate::util::xml::xml_escape;

use super::color::{LinearGradient, Rgba};

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 630;
pub const PADDING: f64 = 60.0;
pub const CONTENT_WIDTH: f64 = CANVAS_WIDTH as f64 - 2.0 * PADDING;

const GRADIENT_ID: &str = "og-gradient";
const ELLIPSIS: char = '…';

/// One paragraph in the bottom-left text stack.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub font_size: f64,
    pub weight: u16,
    pub color: Rgba,
    pub line_height: f64,
    pub margin_bottom: f64,
    pub max_lines: usize,
}

impl TextBlock {
    pub fn title(text: impl Into<String>, color: Rgba) -> Self {
        Self {
            text: text.into(),
            font_size: 60.0,
            weight: 800,
            color,
            line_height: 1.2,
            margin_bottom: 20.0,
            max_lines: 3,
        }
    }

    pub fn body(text: impl Into<String>, color: Rgba) -> Self {
        Self {
            text: text.into(),
            font_size: 30.0,
            weight: 400,
            color,
            line_height: 1.5,
            margin_bottom: 0.0,
            max_lines: 3,
        }
    }

    pub fn with_margin_bottom(mut self, margin: f64) -> Self {
        self.margin_bottom = margin;
        self
    }

    fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }

    fn lines(&self) -> Vec<String> {
        wrap_text(
            &self.text,
            estimated_char_width(self.font_size, self.weight),
            CONTENT_WIDTH,
            self.max_lines,
        )
    }
}

/// A raster or vector image already embedded as a data URI.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    pub data_uri: String,
    pub width: f64,
    pub height: f64,
}

/// Every layer of the card. Optional layers are skipped without moving the others.
#[derive(Debug, Clone, PartialEq)]
pub struct OgScene {
    pub background_image: Option<String>,
    pub overlay: Rgba,
    pub gradient: Option<LinearGradient>,
    pub logo: Option<EmbeddedImage>,
    pub font_family: String,
    pub text: Vec<TextBlock>,
}

impl OgScene {
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}" viewBox="0 0 {CANVAS_WIDTH} {CANVAS_HEIGHT}">"#
        );

        if let Some(gradient) = &self.gradient {
            let (x1, y1, x2, y2) = gradient.svg_vector();
            let _ = write!(
                svg,
                r#"<defs><linearGradient id="{GRADIENT_ID}" x1="{x1:.4}" y1="{y1:.4}" x2="{x2:.4}" y2="{y2:.4}">"#
            );
            for stop in &gradient.stops {
                let _ = write!(
                    svg,
                    r#"<stop offset="{}%" stop-color="{}" stop-opacity="{}"/>"#,
                    stop.offset_percent,
                    stop.color.rgb(),
                    stop.color.alpha
                );
            }
            svg.push_str("</linearGradient></defs>");
        }

        if let Some(background) = &self.background_image {
            let _ = write!(
                svg,
                r#"<image x="0" y="0" width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}" preserveAspectRatio="xMidYMid slice" xlink:href="{}"/>"#,
                xml_escape(background)
            );
        }

        let _ = write!(
            svg,
            r#"<rect x="0" y="0" width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}" fill="{}" fill-opacity="{}"/>"#,
            self.overlay.rgb(),
            self.overlay.alpha
        );

        if self.gradient.is_some() {
            let _ = write!(
                svg,
                r#"<rect x="0" y="0" width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}" fill="url(#{GRADIENT_ID})"/>"#
            );
        }

        if let Some(logo) = &self.logo {
            let _ = write!(
                svg,
                r#"<image x="{PADDING}" y="{PADDING}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet" xlink:href="{}"/>"#,
                logo.width,
                logo.height,
                xml_escape(&logo.data_uri)
            );
        }

        self.write_text(&mut svg);
        svg.push_str("</svg>");
        svg
    }

    fn write_text(&self, svg: &mut String) {
        let laid_out: Vec<(&TextBlock, Vec<String>)> = self
            .text
            .iter()
            .map(|block| (block, block.lines()))
            .filter(|(_, lines)| !lines.is_empty())
            .collect();
        if laid_out.is_empty() {
            return;
        }

        let last = laid_out.len() - 1;
        let total_height: f64 = laid_out
            .iter()
            .enumerate()
            .map(|(index, (block, lines))| {
                let margin = if index == last { 0.0 } else { block.margin_bottom };
                lines.len() as f64 * block.line_advance() + margin
            })
            .sum();

        let family = xml_escape(&self.font_family);
        let mut top = f64::from(CANVAS_HEIGHT) - PADDING - total_height;
        for (block, lines) in &laid_out {
            let advance = block.line_advance();
            for (index, line) in lines.iter().enumerate() {
                // Baseline sits at roughly 80% of the em box inside the line box.
                let baseline = top
                    + index as f64 * advance
                    + (advance - block.font_size) / 2.0
                    + block.font_size * 0.8;
                let _ = write!(
                    svg,
                    r#"<text x="{PADDING}" y="{baseline:.1}" font-family="{family}" font-size="{}" font-weight="{}" fill="{}" fill-opacity="{}">{}</text>"#,
                    block.font_size,
                    block.weight,
                    block.color.rgb(),
                    block.color.alpha,
                    xml_escape(line)
                );
            }
            top += lines.len() as f64 * advance + block.margin_bottom;
        }
    }
}

fn estimated_char_width(font_size: f64, weight: u16) -> f64 {
    let factor = if weight >= 700 { 0.6 } else { 0.55 };
    font_size * factor
}

/// Greedy word wrap against an average glyph width. The last allowed line gets an ellipsis
/// when text is cut.
pub fn wrap_text(text: &str, char_width: f64, max_width: f64, max_lines: usize) -> Vec<String> {
    let per_line = ((max_width / char_width).floor() as usize).max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word_chars: Vec<char> = word.chars().collect();
        while word_chars.len() > per_line {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word_chars.split_off(per_line);
            lines.push(word_chars.into_iter().collect());
            word_chars = rest;
        }

        let word_len = word_chars.len();
        if word_len == 0 {
            continue;
        }
        let needed = if current_len == 0 {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if needed > per_line {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word_chars);
        current_len += word_len;
    }
    if current_len > 0 {
        lines.push(current);
    }

    if max_lines > 0 && lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let mut chars: Vec<char> = last.chars().collect();
            if chars.len() >= per_line {
                chars.truncate(per_line.saturating_sub(1));
            }
            while chars.last().is_some_and(|ch| ch.is_whitespace()) {
                chars.pop();
            }
            chars.push(ELLIPSIS);
            *last = chars.into_iter().collect();
        }
    }
    lines
}
