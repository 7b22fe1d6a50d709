#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response},
};
use bordful::{
    application::{
        chrome::ChromeService,
        jobs::JobsService,
        og::{AssetFetcher, FetchError, FetchedAsset, OgService},
        page::PageService,
        repos::{JobsRepo, RepoError},
        sitemap::SitemapService,
        syndication::SyndicationService,
    },
    config::SiteConfig,
    domain::entities::JobRecord,
    infra::{
        http::{HttpState, build_router},
        memory::MemoryJobsRepo,
    },
};
use bytes::Bytes;
use http_body_util::BodyExt;
use tower::ServiceExt;
use url::Url;

pub const JOBS_JSON: &str = r#"{
  "records": [
    {
      "id": "rec1",
      "fields": {
        "title": "Senior Rust Engineer",
        "company": "Acme Corp",
        "type": "Full-time",
        "salary_min": 120000,
        "salary_max": 150000,
        "salary_currency": "USD",
        "salary_unit": "year",
        "description": "Build **fast** services.",
        "apply_url": "https://acme.example/apply",
        "posted_date": "2026-01-10T09:00:00.000Z",
        "status": "active",
        "career_level": ["Senior"],
        "workplace_type": "Remote",
        "remote_region": "Worldwide",
        "visa_sponsorship": "Yes",
        "languages": ["English"]
      }
    },
    {
      "id": "rec2",
      "fields": {
        "title": "Product Designer",
        "company": "Globex",
        "type": "Part-time",
        "description": "Design delightful flows.",
        "posted_date": "2026-01-05",
        "status": "active",
        "workplace_type": "On-site",
        "workplace_city": "Berlin",
        "workplace_country": "Germany"
      }
    },
    {
      "id": "rec3",
      "fields": {
        "title": "Archived Accountant",
        "company": "Initech",
        "description": "No longer open.",
        "posted_date": "2025-11-01",
        "status": "inactive"
      }
    }
  ]
}"#;

/// Fetcher that answers every request with a 404 and remembers what was asked for.
#[derive(Default)]
pub struct RecordingFetcher {
    urls: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().expect("fetch log lock").clone()
    }
}

#[async_trait]
impl AssetFetcher for RecordingFetcher {
    async fn get(&self, url: &str) -> Result<FetchedAsset, FetchError> {
        self.urls.lock().expect("fetch log lock").push(url.to_string());
        Ok(FetchedAsset {
            status: 404,
            content_type: Some("text/plain".to_string()),
            body: Bytes::from_static(b"not found"),
        })
    }
}

/// Data source that is always down.
pub struct UnreachableRepo;

#[async_trait]
impl JobsRepo for UnreachableRepo {
    async fn list_active_jobs(&self) -> Result<Vec<JobRecord>, RepoError> {
        Err(RepoError::transport("connection refused"))
    }

    async fn find_active_job(&self, _id: &str) -> Result<Option<JobRecord>, RepoError> {
        Err(RepoError::transport("connection refused"))
    }
}

pub fn site() -> SiteConfig {
    SiteConfig::default()
}

pub fn router(site: SiteConfig) -> Router {
    router_with_fetcher(site, Arc::new(RecordingFetcher::default()))
}

pub fn router_with_fetcher(site: SiteConfig, fetcher: Arc<RecordingFetcher>) -> Router {
    let repo = MemoryJobsRepo::from_airtable_json(JOBS_JSON).expect("fixture jobs parse");
    router_with(site, Arc::new(repo), fetcher)
}

pub fn router_with(
    site: SiteConfig,
    repo: Arc<dyn JobsRepo>,
    fetcher: Arc<RecordingFetcher>,
) -> Router {
    let site = Arc::new(site);
    let jobs = JobsService::new(repo, site.clone());
    let font_api_base = Url::parse("https://fonts.example").expect("font base url");

    build_router(HttpState {
        site: site.clone(),
        jobs: Arc::new(jobs.clone()),
        pages: Arc::new(PageService::new(site.clone())),
        chrome: Arc::new(ChromeService::new(site.clone())),
        syndication: Arc::new(SyndicationService::new(jobs.clone(), site.clone())),
        sitemap: Arc::new(SitemapService::new(jobs, site.clone())),
        og: Arc::new(OgService::new(fetcher, site, font_api_base)),
    })
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.clone()
        .oneshot(request)
        .await
        .expect("router should respond")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body is utf-8")
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes()
}

pub fn header(response: &Response<Body>, name: &str) -> String {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
