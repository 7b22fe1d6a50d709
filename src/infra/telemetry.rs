use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// HTTP client internals that are only useful when asked for explicitly via `RUST_LOG`.
const QUIET_DEPENDENCIES: [&str; 4] = ["hyper=warn", "hyper_util=warn", "reqwest=warn", "h2=warn"];

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = build_filter(logging, std::env::var_os(EnvFilter::DEFAULT_ENV).is_some())?;

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn build_filter(logging: &LoggingSettings, env_override: bool) -> Result<EnvFilter, InfraError> {
    let mut filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();
    if env_override {
        return Ok(filter);
    }

    for directive in QUIET_DEPENDENCIES {
        let directive = directive
            .parse()
            .map_err(|err| InfraError::telemetry(format!("bad directive `{directive}`: {err}")))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "bordful_og_render_total",
            Unit::Count,
            "OG images rendered, labelled by kind (home|job) and outcome (ok|error)."
        );
        describe_histogram!(
            "bordful_og_render_ms",
            Unit::Milliseconds,
            "End-to-end OG render time including asset fetches, labelled by kind."
        );
        describe_counter!(
            "bordful_og_asset_fallback_total",
            Unit::Count,
            "OG font or image fetches replaced by a fallback, labelled by asset."
        );
        describe_counter!(
            "bordful_jobs_fetch_total",
            Unit::Count,
            "Job data source calls, labelled by operation (list|find) and outcome."
        );
        describe_histogram!(
            "bordful_jobs_fetch_ms",
            Unit::Milliseconds,
            "Job data source latency per operation, including pagination."
        );
    });
}
