use std::{path::Path, process, sync::Arc};

use bordful::{
    application::{
        chrome::ChromeService,
        error::AppError,
        jobs::JobsService,
        og::{AssetFetcher, OgService},
        page::PageService,
        repos::JobsRepo,
        sitemap::SitemapService,
        syndication::SyndicationService,
    },
    config::{self, RenderOgArgs, Settings},
    infra::{
        airtable::AirtableJobsRepo,
        error::InfraError,
        fetch::HttpAssetFetcher,
        http::{self, HttpState},
        memory::MemoryJobsRepo,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::RenderOg(args) => run_render_og(settings, args).await,
    }
}

async fn run_serve(settings: Settings) -> Result<(), AppError> {
    let repo = init_jobs_repo(&settings).await?;
    let fetcher: Arc<dyn AssetFetcher> =
        Arc::new(HttpAssetFetcher::new(&settings.assets.user_agent)?);
    let state = build_http_state(&settings, repo, fetcher);

    let addr = settings.server.public_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| InfraError::Bind { addr, source })?;

    info!(
        target = "bordful::serve",
        addr = %addr,
        site_url = %settings.site.url,
        "Public server listening"
    );

    axum::serve(listener, http::build_router(state).into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}

async fn run_render_og(settings: Settings, args: RenderOgArgs) -> Result<(), AppError> {
    let fetcher: Arc<dyn AssetFetcher> =
        Arc::new(HttpAssetFetcher::new(&settings.assets.user_agent)?);
    let site = Arc::new(settings.site.clone());
    let og = OgService::new(fetcher, site, settings.assets.font_api_base.clone());

    let image = match args.job.as_deref() {
        Some(id) => {
            let repo = init_jobs_repo(&settings).await?;
            let job = repo.find_active_job(id).await?.ok_or(AppError::NotFound)?;
            og.job_image(&job).await?
        }
        None => og.home_image().await?,
    };

    write_png(&args.output, &image.png).await?;
    info!(
        target = "bordful::render_og",
        output = %args.output.display(),
        bytes = image.png.len(),
        "OG image written"
    );
    Ok(())
}

async fn write_png(path: &Path, png: &[u8]) -> Result<(), InfraError> {
    let write_error = |source| InfraError::WriteFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    tokio::fs::write(path, png).await.map_err(write_error)
}

async fn init_jobs_repo(settings: &Settings) -> Result<Arc<dyn JobsRepo>, AppError> {
    if let Some(path) = settings.airtable.fixture_path.as_deref() {
        let repo = MemoryJobsRepo::from_fixture_file(path).await?;
        info!(
            target = "bordful::serve",
            path = %path.display(),
            "Serving jobs from fixture file"
        );
        return Ok(Arc::new(repo));
    }

    let repo = AirtableJobsRepo::new(&settings.airtable, &settings.assets.user_agent)?;
    Ok(Arc::new(repo))
}

fn build_http_state(
    settings: &Settings,
    repo: Arc<dyn JobsRepo>,
    fetcher: Arc<dyn AssetFetcher>,
) -> HttpState {
    let site = Arc::new(settings.site.clone());
    let jobs = JobsService::new(repo, site.clone());

    HttpState {
        site: site.clone(),
        jobs: Arc::new(jobs.clone()),
        pages: Arc::new(PageService::new(site.clone())),
        chrome: Arc::new(ChromeService::new(site.clone())),
        syndication: Arc::new(SyndicationService::new(jobs.clone(), site.clone())),
        sitemap: Arc::new(SitemapService::new(jobs, site.clone())),
        og: Arc::new(OgService::new(
            fetcher,
            site,
            settings.assets.font_api_base.clone(),
        )),
    }
}
