//! Configuration layer: typed settings with layered precedence (defaults → file → env → CLI).

mod cli;
mod site;

pub use cli::*;
pub use site::*;

use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");
const LOCAL_CONFIG_BASENAME: &str = "bordful";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PUBLIC_PORT: u16 = 3000;
const DEFAULT_AIRTABLE_ENDPOINT: &str = "https://api.airtable.com";
const DEFAULT_AIRTABLE_TABLE: &str = "Jobs";
const DEFAULT_FONT_API_BASE: &str = "https://fonts.googleapis.com";
const DEFAULT_USER_AGENT: &str = concat!("bordful/", env!("CARGO_PKG_VERSION"));

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub airtable: AirtableSettings,
    pub assets: AssetSettings,
    pub site: SiteConfig,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub public_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct AirtableSettings {
    pub endpoint: Url,
    pub base_id: Option<String>,
    pub table_name: String,
    pub access_token: Option<String>,
    pub fixture_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AssetSettings {
    pub font_api_base: Url,
    pub user_agent: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (defaults → file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("BORDFUL").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    raw.apply_airtable_overrides(&cli.airtable);
    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::RenderOg(_)) => {}
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    airtable: RawAirtableSettings,
    assets: RawAssetSettings,
    site: SiteConfig,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.public_port {
            self.server.public_port = Some(port);
        }
        if let Some(url) = overrides.public_site_url.as_ref() {
            self.site.url = url.clone();
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_airtable_overrides(&mut self, overrides: &AirtableOverrides) {
        if let Some(token) = overrides.access_token.as_ref() {
            self.airtable.access_token = Some(token.clone());
        }
        if let Some(base) = overrides.base_id.as_ref() {
            self.airtable.base_id = Some(base.clone());
        }
        if let Some(table) = overrides.table_name.as_ref() {
            self.airtable.table_name = Some(table.clone());
        }
        if let Some(path) = overrides.fixture_path.as_ref() {
            self.airtable.fixture_path = Some(path.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            airtable,
            assets,
            site,
        } = raw;

        let server = build_server_settings(server)?;
        let logging = build_logging_settings(logging)?;
        let airtable = build_airtable_settings(airtable)?;
        let assets = build_asset_settings(assets)?;
        let site = build_site_config(site)?;

        Ok(Self {
            server,
            logging,
            airtable,
            assets,
            site,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let public_port = server.public_port.unwrap_or(DEFAULT_PUBLIC_PORT);
    if public_port == 0 {
        return Err(LoadError::invalid(
            "server.public_port",
            "port must be greater than zero",
        ));
    }

    let public_addr = parse_socket_addr(&host, public_port)
        .map_err(|reason| LoadError::invalid("server.public_addr", reason))?;

    Ok(ServerSettings { public_addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_airtable_settings(airtable: RawAirtableSettings) -> Result<AirtableSettings, LoadError> {
    let endpoint = parse_http_url(
        airtable.endpoint.as_deref().unwrap_or(DEFAULT_AIRTABLE_ENDPOINT),
        "airtable.endpoint",
    )?;

    let table_name = non_blank(airtable.table_name).unwrap_or_else(|| DEFAULT_AIRTABLE_TABLE.into());

    Ok(AirtableSettings {
        endpoint,
        base_id: non_blank(airtable.base_id),
        table_name,
        access_token: non_blank(airtable.access_token),
        fixture_path: airtable
            .fixture_path
            .filter(|path| !path.as_os_str().is_empty()),
    })
}

fn build_asset_settings(assets: RawAssetSettings) -> Result<AssetSettings, LoadError> {
    let font_api_base = parse_http_url(
        assets.font_api_base.as_deref().unwrap_or(DEFAULT_FONT_API_BASE),
        "assets.font_api_base",
    )?;
    let user_agent = non_blank(assets.user_agent).unwrap_or_else(|| DEFAULT_USER_AGENT.into());

    Ok(AssetSettings {
        font_api_base,
        user_agent,
    })
}

fn build_site_config(mut site: SiteConfig) -> Result<SiteConfig, LoadError> {
    let url = parse_http_url(site.url.trim(), "site.url")?;
    site.url = normalize_site_url(&url);

    if site.title.trim().is_empty() {
        return Err(LoadError::invalid("site.title", "must not be empty"));
    }

    let listings = &mut site.listings;
    if listings.max_per_page == 0 {
        return Err(LoadError::invalid(
            "site.listings.max_per_page",
            "must be greater than zero",
        ));
    }
    if listings.default_per_page == 0 || listings.default_per_page > listings.max_per_page {
        return Err(LoadError::invalid(
            "site.listings.default_per_page",
            format!("must be between 1 and {}", listings.max_per_page),
        ));
    }
    let max_per_page = listings.max_per_page;
    listings
        .per_page_options
        .retain(|option| *option > 0 && *option <= max_per_page);
    listings.per_page_options.sort_unstable();
    listings.per_page_options.dedup();

    let mut seen = Vec::with_capacity(site.pages.len());
    for page in &site.pages {
        let slug = page.slug.trim();
        if slug.is_empty() || slug.contains('/') {
            return Err(LoadError::invalid(
                "site.pages.slug",
                format!("`{}` is not a valid page slug", page.slug),
            ));
        }
        if seen.contains(&slug) {
            return Err(LoadError::invalid(
                "site.pages.slug",
                format!("duplicate page slug `{slug}`"),
            ));
        }
        seen.push(slug);
    }

    Ok(site)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    public_port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAirtableSettings {
    endpoint: Option<String>,
    base_id: Option<String>,
    table_name: Option<String>,
    access_token: Option<String>,
    fixture_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAssetSettings {
    font_api_base: Option<String>,
    user_agent: Option<String>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn parse_http_url(value: &str, key: &'static str) -> Result<Url, LoadError> {
    let url = Url::parse(value)
        .map_err(|err| LoadError::invalid(key, format!("invalid URL `{value}`: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(LoadError::invalid(
            key,
            format!("unsupported scheme `{other}`"),
        )),
    }
}

fn normalize_site_url(url: &Url) -> String {
    let mut normalized = url.as_str().trim_end_matches('/').to_string();
    normalized.push('/');
    normalized
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
