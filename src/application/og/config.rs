//! Cascade partially specified OG layers into a fully resolved render configuration.

use crate::config::{OgLayer, SiteConfig};

pub const DEFAULT_TITLE: &str = "Bordful";
pub const DEFAULT_DESCRIPTION: &str = "Find your dream job today!";
pub const DEFAULT_FONT_FAMILY: &str = "geist";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#005450";
pub const DEFAULT_BACKGROUND_OPACITY: f64 = 0.9;
pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_GRADIENT_ANGLE: f64 = 0.0;
pub const DEFAULT_GRADIENT_START_OPACITY: f64 = 0.0;
pub const DEFAULT_GRADIENT_END_OPACITY: f64 = 1.0;
pub const DEFAULT_LOGO_WIDTH: u32 = 185;
pub const DEFAULT_LOGO_HEIGHT: u32 = 56;

#[derive(Debug, Clone, PartialEq)]
pub struct GradientConfig {
    pub enabled: bool,
    pub color: String,
    pub angle: f64,
    pub start_opacity: f64,
    pub end_opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogoConfig {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

/// Every value the compositor needs, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct OgRenderConfig {
    pub title: String,
    pub description: String,
    pub font_family: String,
    pub background_color: String,
    pub background_opacity: f64,
    pub background_image: Option<String>,
    pub title_color: String,
    pub description_color: String,
    pub gradient: GradientConfig,
    /// `None` when no logo source is configured or the logo is hidden.
    pub logo: Option<LogoConfig>,
}

/// The site-wide layer: branding values that also drive the hero section.
pub fn site_layer(site: &SiteConfig) -> OgLayer {
    let mut layer = OgLayer {
        title: Some(site.title.clone()),
        description: Some(site.description.clone()),
        font_family: site.font.family.clone(),
        background_color: site.ui.hero_background_color.clone(),
        title_color: site.ui.hero_title_color.clone(),
        description_color: site.ui.hero_subtitle_color.clone(),
        ..OgLayer::default()
    };
    layer.logo.src = site.logo.clone();
    layer
}

/// Ordered layers, most specific first.
struct Cascade<'a> {
    layers: Vec<&'a OgLayer>,
}

impl<'a> Cascade<'a> {
    fn new(entity: Option<&'a OgLayer>, feature: &'a OgLayer, site: &'a OgLayer) -> Self {
        let layers = entity.into_iter().chain([feature, site]).collect();
        Self { layers }
    }

    /// First layer supplying a value wins; later layers are not consulted.
    fn first<T>(&self, pick: impl Fn(&'a OgLayer) -> Option<T>) -> Option<T> {
        self.layers.iter().copied().find_map(pick)
    }

    fn text(&self, pick: impl Fn(&'a OgLayer) -> Option<&'a String>) -> Option<String> {
        self.first(|layer| present(pick(layer)))
    }

    fn number(&self, pick: impl Fn(&'a OgLayer) -> Option<f64>) -> Option<f64> {
        self.first(|layer| pick(layer).filter(|value| value.is_finite()))
    }
}

fn present(value: Option<&String>) -> Option<String> {
    value
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Merge `entity → feature → site → default`, field by field. Pure and total.
pub fn resolve_config(
    entity: Option<&OgLayer>,
    feature: &OgLayer,
    site: &OgLayer,
) -> OgRenderConfig {
    let cascade = Cascade::new(entity, feature, site);

    let background_color = cascade
        .text(|layer| layer.background_color.as_ref())
        .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string());

    let gradient = GradientConfig {
        enabled: cascade.first(|layer| layer.gradient.enabled).unwrap_or(true),
        color: cascade
            .text(|layer| layer.gradient.color.as_ref())
            .unwrap_or_else(|| background_color.clone()),
        angle: cascade
            .number(|layer| layer.gradient.angle)
            .unwrap_or(DEFAULT_GRADIENT_ANGLE),
        start_opacity: cascade
            .number(|layer| layer.gradient.start_opacity)
            .map_or(DEFAULT_GRADIENT_START_OPACITY, clamp_unit),
        end_opacity: cascade
            .number(|layer| layer.gradient.end_opacity)
            .map_or(DEFAULT_GRADIENT_END_OPACITY, clamp_unit),
    };

    let show_logo = cascade.first(|layer| layer.logo.show).unwrap_or(true);
    let logo = cascade
        .text(|layer| layer.logo.src.as_ref())
        .filter(|_| show_logo)
        .map(|src| LogoConfig {
            src,
            width: cascade
                .first(|layer| layer.logo.width.filter(|width| *width > 0))
                .unwrap_or(DEFAULT_LOGO_WIDTH),
            height: cascade
                .first(|layer| layer.logo.height.filter(|height| *height > 0))
                .unwrap_or(DEFAULT_LOGO_HEIGHT),
        });

    OgRenderConfig {
        title: cascade
            .text(|layer| layer.title.as_ref())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: cascade
            .text(|layer| layer.description.as_ref())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        font_family: cascade
            .text(|layer| layer.font_family.as_ref())
            .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
        background_opacity: cascade
            .number(|layer| layer.background_opacity)
            .map_or(DEFAULT_BACKGROUND_OPACITY, clamp_unit),
        background_image: cascade.text(|layer| layer.background_image.as_ref()),
        title_color: cascade
            .text(|layer| layer.title_color.as_ref())
            .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
        description_color: cascade
            .text(|layer| layer.description_color.as_ref())
            .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
        background_color,
        gradient,
        logo,
    }
}

/// A feature is on unless a layer explicitly turns it off.
pub fn is_enabled<'a>(layers: impl IntoIterator<Item = &'a OgLayer>) -> bool {
    layers
        .into_iter()
        .all(|layer| layer.enabled != Some(false))
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_layers_resolve_to_defaults() {
        let empty = OgLayer::default();
        let config = resolve_config(None, &empty, &empty);

        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
        assert_eq!(config.font_family, "geist");
        assert_eq!(config.background_color, "#005450");
        assert_eq!(config.background_opacity, 0.9);
        assert_eq!(config.title_color, "#FFFFFF");
        assert_eq!(config.description_color, "#FFFFFF");
        assert!(config.gradient.enabled);
        assert_eq!(config.gradient.color, "#005450");
        assert_eq!(config.gradient.angle, 0.0);
        assert_eq!(config.gradient.start_opacity, 0.0);
        assert_eq!(config.gradient.end_opacity, 1.0);
        assert!(config.background_image.is_none());
        assert!(config.logo.is_none());
    }

    #[test]
    fn earlier_layers_win_field_by_field() {
        let entity = OgLayer {
            title: Some("Rust Engineer at Acme".to_string()),
            ..OgLayer::default()
        };
        let feature = OgLayer {
            title: Some("Jobs".to_string()),
            background_opacity: Some(0.8),
            ..OgLayer::default()
        };
        let site = OgLayer {
            title: Some("Board".to_string()),
            description: Some("Site description".to_string()),
            background_color: Some("#112233".to_string()),
            background_opacity: Some(0.5),
            ..OgLayer::default()
        };

        let config = resolve_config(Some(&entity), &feature, &site);
        assert_eq!(config.title, "Rust Engineer at Acme");
        assert_eq!(config.description, "Site description");
        assert_eq!(config.background_opacity, 0.8);
        assert_eq!(config.background_color, "#112233");
        assert_eq!(config.gradient.color, "#112233");
    }

    #[test]
    fn blank_strings_do_not_shadow_later_layers() {
        let feature = OgLayer {
            title: Some("   ".to_string()),
            background_color: Some(String::new()),
            ..OgLayer::default()
        };
        let site = OgLayer {
            title: Some("Board".to_string()),
            ..OgLayer::default()
        };

        let config = resolve_config(None, &feature, &site);
        assert_eq!(config.title, "Board");
        assert_eq!(config.background_color, DEFAULT_BACKGROUND_COLOR);
    }

    #[test]
    fn explicit_zero_opacity_is_a_value() {
        let feature = OgLayer {
            background_opacity: Some(0.0),
            ..OgLayer::default()
        };
        let config = resolve_config(None, &feature, &OgLayer::default());
        assert_eq!(config.background_opacity, 0.0);
    }

    #[test]
    fn gradient_can_be_disabled_by_any_layer_that_speaks_first() {
        let mut feature = OgLayer::default();
        feature.gradient.enabled = Some(false);
        let mut site = OgLayer::default();
        site.gradient.enabled = Some(true);

        let config = resolve_config(None, &feature, &site);
        assert!(!config.gradient.enabled);
    }

    #[test]
    fn logo_uses_default_box_and_respects_show_flag() {
        let mut site = OgLayer::default();
        site.logo.src = Some("/logo.svg".to_string());

        let config = resolve_config(None, &OgLayer::default(), &site);
        let logo = config.logo.expect("logo");
        assert_eq!((logo.width, logo.height), (185, 56));

        let mut feature = OgLayer::default();
        feature.logo.show = Some(false);
        assert!(resolve_config(None, &feature, &site).logo.is_none());
    }

    #[test]
    fn site_layer_carries_branding() {
        let mut site = SiteConfig::default();
        site.ui.hero_background_color = Some("#222222".to_string());
        site.font.family = Some("inter".to_string());

        let layer = site_layer(&site);
        let config = resolve_config(None, &OgLayer::default(), &layer);
        assert_eq!(config.title, "Bordful");
        assert_eq!(config.background_color, "#222222");
        assert_eq!(config.font_family, "inter");
    }

    #[test]
    fn enabled_unless_explicitly_disabled() {
        let on = OgLayer::default();
        let off = OgLayer {
            enabled: Some(false),
            ..OgLayer::default()
        };
        assert!(is_enabled([&on]));
        assert!(!is_enabled([&off]));
        assert!(!is_enabled([&on, &off]));
    }
}
