//! Open Graph image generation: resolve configuration, fetch assets, compose and rasterize.

pub mod color;
pub mod compose;
pub mod config;
pub mod fetch;
pub mod fonts;
pub mod images;
pub mod raster;

use std::{sync::Arc, time::Instant};

use metrics::{counter, histogram};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    config::{OgLayer, SiteConfig},
    domain::entities::JobRecord,
};

pub use color::{LinearGradient, Rgba, build_linear_gradient, hex_to_rgba};
pub use config::{OgRenderConfig, is_enabled, resolve_config, site_layer};
pub use fetch::{AssetFetcher, FetchError, FetchedAsset};
pub use fonts::{FontAssets, FontFace, resolve_font_assets};
pub use images::resolve_image_as_data_uri;

use compose::{EmbeddedImage, OgScene, TextBlock};
use raster::RasterError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0}")]
    Raster(String),
    #[error("render task failed: {0}")]
    Task(String),
}

impl From<RasterError> for RenderError {
    fn from(error: RasterError) -> Self {
        Self::Raster(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum OgError {
    #[error("OG image generation is disabled in config")]
    Disabled,
    #[error("failed to render OG image: {0}")]
    Render(#[from] RenderError),
}

/// A finished 1200×630 PNG.
#[derive(Debug, Clone)]
pub struct OgImage {
    pub png: Vec<u8>,
}

impl OgImage {
    pub const CONTENT_TYPE: &'static str = "image/png";
}

#[derive(Debug, Clone, Copy)]
enum OgKind {
    Home,
    Job,
}

impl OgKind {
    fn as_str(self) -> &'static str {
        match self {
            OgKind::Home => "home",
            OgKind::Job => "job",
        }
    }
}

#[derive(Clone)]
pub struct OgService {
    fetcher: Arc<dyn AssetFetcher>,
    site: Arc<SiteConfig>,
    font_api_base: Url,
}

impl OgService {
    pub fn new(fetcher: Arc<dyn AssetFetcher>, site: Arc<SiteConfig>, font_api_base: Url) -> Self {
        Self {
            fetcher,
            site,
            font_api_base,
        }
    }

    pub fn home_enabled(&self) -> bool {
        is_enabled([&self.site.og.home])
    }

    pub fn job_enabled(&self) -> bool {
        is_enabled([&self.site.og.home, &self.site.og.jobs])
    }

    /// Site-wide card: configured title over configured description.
    #[instrument(skip(self))]
    pub async fn home_image(&self) -> Result<OgImage, OgError> {
        if !self.home_enabled() {
            return Err(OgError::Disabled);
        }

        let site = site_layer(&self.site);
        let config = resolve_config(None, &self.site.og.home, &site);
        let sample = format!("{} {}", config.title, config.description);

        let text = |config: &OgRenderConfig| {
            vec![
                TextBlock::title(config.title.clone(), Rgba::from_hex(&config.title_color, 1.0)),
                TextBlock::body(
                    config.description.clone(),
                    Rgba::from_hex(&config.description_color, 1.0),
                ),
            ]
        };
        self.render(OgKind::Home, &config, &sample, text).await
    }

    /// Per-job card: job title, `at {company}`, then the job summary line.
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    pub async fn job_image(&self, job: &JobRecord) -> Result<OgImage, OgError> {
        if !self.job_enabled() {
            return Err(OgError::Disabled);
        }

        let site = site_layer(&self.site);
        let entity = job_layer(job);
        let config = resolve_config(Some(&entity), &self.site.og.jobs, &site);
        let sample = format!("{} {}", job.title, job.company);

        let title = job.title.clone();
        let company = format!("at {}", job.company);
        let text = move |config: &OgRenderConfig| {
            let title_color = Rgba::from_hex(&config.title_color, 1.0);
            vec![
                TextBlock::title(title, title_color).with_margin_bottom(10.0),
                TextBlock::body(company, title_color).with_margin_bottom(20.0),
                TextBlock::body(
                    config.description.clone(),
                    Rgba::from_hex(&config.description_color, 1.0),
                ),
            ]
        };
        self.render(OgKind::Job, &config, &sample, text).await
    }

    async fn render(
        &self,
        kind: OgKind,
        config: &OgRenderConfig,
        sample_text: &str,
        text: impl FnOnce(&OgRenderConfig) -> Vec<TextBlock>,
    ) -> Result<OgImage, OgError> {
        let started = Instant::now();
        let result = self.render_inner(config, sample_text, text).await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        counter!("bordful_og_render_total", "kind" => kind.as_str(), "outcome" => outcome)
            .increment(1);
        histogram!("bordful_og_render_ms", "kind" => kind.as_str())
            .record(started.elapsed().as_secs_f64() * 1000.0);
        result
    }

    async fn render_inner(
        &self,
        config: &OgRenderConfig,
        sample_text: &str,
        text: impl FnOnce(&OgRenderConfig) -> Vec<TextBlock>,
    ) -> Result<OgImage, OgError> {
        let fetcher = self.fetcher.as_ref();
        let fonts = resolve_font_assets(
            fetcher,
            &self.font_api_base,
            &config.font_family,
            sample_text,
        )
        .await;

        let background_image = match config.background_image.as_deref() {
            Some(reference) => {
                resolve_image_as_data_uri(fetcher, reference, &self.site.url).await
            }
            None => String::new(),
        };

        let logo = match config.logo.as_ref() {
            Some(logo) => {
                let data_uri = resolve_image_as_data_uri(fetcher, &logo.src, &self.site.url).await;
                (!data_uri.is_empty()).then(|| EmbeddedImage {
                    data_uri,
                    width: f64::from(logo.width),
                    height: f64::from(logo.height),
                })
            }
            None => None,
        };

        let gradient = config.gradient.enabled.then(|| {
            LinearGradient::new(
                &config.gradient.color,
                config.gradient.angle,
                config.gradient.start_opacity,
                config.gradient.end_opacity,
            )
        });

        let scene = OgScene {
            background_image: (!background_image.is_empty()).then_some(background_image),
            overlay: Rgba::from_hex(&config.background_color, config.background_opacity),
            gradient,
            logo,
            font_family: format!("{}, {}", fonts.css_family, fonts.generic_family()),
            text: text(config),
        };
        debug!(
            target = "bordful::og",
            faces = fonts.faces.len(),
            background = scene.background_image.is_some(),
            logo = scene.logo.is_some(),
            "composed OG scene"
        );

        let svg = scene.to_svg();
        let png = tokio::task::spawn_blocking(move || raster::rasterize(&svg, &fonts))
            .await
            .map_err(|err| RenderError::Task(err.to_string()))?
            .map_err(RenderError::from)?;

        Ok(OgImage { png })
    }
}

/// Per-job override layer: the headline and a summary of the role.
fn job_layer(job: &JobRecord) -> OgLayer {
    let job_type = job.job_type.map_or("Not specified", |kind| kind.as_str());
    OgLayer {
        title: Some(job.headline()),
        description: Some(format!(
            "Apply for {job_type} position - {}",
            job.workplace_type.as_str()
        )),
        ..OgLayer::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{entities::fixtures, types::JobType};

    #[test]
    fn job_layer_summarizes_the_role() {
        let mut job = fixtures::job("rec1", "Rust Engineer");
        job.company = "Acme".to_string();
        job.job_type = Some(JobType::FullTime);

        let layer = job_layer(&job);
        assert_eq!(layer.title.as_deref(), Some("Rust Engineer at Acme"));
        assert_eq!(
            layer.description.as_deref(),
            Some(&*format!(
                "Apply for Full-time position - {}",
                job.workplace_type.as_str()
            ))
        );
    }

    #[test]
    fn raster_errors_keep_their_message() {
        let error = OgError::from(RenderError::from(RasterError::Allocate));
        assert!(error.to_string().contains("pixmap"));
    }
}
