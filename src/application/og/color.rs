//! Paint values derived from configured hex colors.

use std::fmt;

const FALLBACK_RGB: (u8, u8, u8) = (0, 84, 80);

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Rgba {
    /// Parse `#rgb` / `#rrggbb` (the `#` is optional); anything else yields the brand teal.
    pub fn from_hex(hex: &str, alpha: f64) -> Self {
        let (r, g, b) = parse_hex(hex).unwrap_or(FALLBACK_RGB);
        Self { r, g, b, alpha }
    }

    /// `rgb(r,g,b)` without the alpha channel, for SVG paint attributes.
    pub fn rgb(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.alpha)
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|ch| [ch, ch]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&expanded[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// `rgba(r,g,b,alpha)` for a hex color, falling back to `rgba(0,84,80,alpha)`.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> String {
    Rgba::from_hex(hex, alpha).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub color: Rgba,
    /// Position along the gradient line in percent.
    pub offset_percent: u8,
}

/// Two-stop linear gradient; the end-opacity stop sits at 0% and the start-opacity stop at 100%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    pub angle_degrees: f64,
    pub stops: [GradientStop; 2],
}

impl LinearGradient {
    pub fn new(color: &str, angle_degrees: f64, start_opacity: f64, end_opacity: f64) -> Self {
        Self {
            angle_degrees,
            stops: [
                GradientStop {
                    color: Rgba::from_hex(color, end_opacity),
                    offset_percent: 0,
                },
                GradientStop {
                    color: Rgba::from_hex(color, start_opacity),
                    offset_percent: 100,
                },
            ],
        }
    }

    pub fn css(&self) -> String {
        let [first, last] = &self.stops;
        format!(
            "linear-gradient({}deg, {} {}%, {} {}%)",
            self.angle_degrees, first.color, first.offset_percent, last.color, last.offset_percent
        )
    }

    /// Gradient vector in object-bounding-box units, following CSS angle semantics
    /// (`0deg` points up, angles turn clockwise).
    pub fn svg_vector(&self) -> (f64, f64, f64, f64) {
        let radians = self.angle_degrees.to_radians();
        let (dx, dy) = (radians.sin() * 0.5, -radians.cos() * 0.5);
        (0.5 - dx, 0.5 - dy, 0.5 + dx, 0.5 + dy)
    }
}

/// CSS `linear-gradient(...)` string for the given parameters.
pub fn build_linear_gradient(
    color: &str,
    angle_degrees: f64,
    start_opacity: f64,
    end_opacity: f64,
) -> String {
    LinearGradient::new(color, angle_degrees, start_opacity, end_opacity).css()
}
