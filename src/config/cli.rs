use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the Bordful binary.
#[derive(Debug, Parser)]
#[command(name = "bordful", version, about = "Bordful job board server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "BORDFUL_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub airtable: AirtableOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the public HTTP service.
    Serve(Box<ServeArgs>),
    /// Render an Open Graph image to a PNG file.
    #[command(name = "render-og")]
    RenderOg(RenderOgArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct AirtableOverrides {
    /// Airtable personal access token.
    #[arg(
        long = "airtable-access-token",
        env = "AIRTABLE_ACCESS_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub access_token: Option<String>,

    /// Airtable base identifier.
    #[arg(
        long = "airtable-base-id",
        env = "AIRTABLE_BASE_ID",
        value_name = "BASE",
        global = true
    )]
    pub base_id: Option<String>,

    /// Airtable table holding job records.
    #[arg(
        long = "airtable-table",
        env = "AIRTABLE_TABLE_NAME",
        value_name = "TABLE",
        global = true
    )]
    pub table_name: Option<String>,

    /// Read jobs from a JSON file of Airtable records instead of the API.
    #[arg(
        long = "airtable-fixture",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub fixture_path: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the public listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the public listener port.
    #[arg(long = "server-public-port", value_name = "PORT")]
    pub public_port: Option<u16>,

    /// Override the public site URL used for canonical links and feeds.
    #[arg(long = "public-site-url", value_name = "URL")]
    pub public_site_url: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Clone)]
pub struct RenderOgArgs {
    /// Render the image for this job instead of the home image.
    #[arg(long = "job", value_name = "ID")]
    pub job: Option<String>,

    /// Destination PNG file.
    #[arg(long = "output", value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub output: PathBuf,
}
