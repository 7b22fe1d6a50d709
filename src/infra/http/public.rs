use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Path, RawQuery, State},
    http::{
        Request, StatusCode, Uri,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    application::{
        chrome::ChromeService,
        error::HttpError,
        jobs::JobsService,
        og::OgService,
        page::PageService,
        sitemap::SitemapService,
        syndication::{self, SyndicationError, SyndicationService},
    },
    config::{FeedFormat, SiteConfig},
    presentation::views::{
        JobTemplate, JobsTemplate, LayoutChrome, LayoutContext, PageTemplate,
        render_not_found_response, render_template_response, render_unavailable_response,
    },
};

use super::{
    middleware::{log_responses, set_request_context},
    og,
};

#[derive(Clone)]
pub struct HttpState {
    pub site: Arc<SiteConfig>,
    pub jobs: Arc<JobsService>,
    pub pages: Arc<PageService>,
    pub chrome: Arc<ChromeService>,
    pub syndication: Arc<SyndicationService>,
    pub sitemap: Arc<SitemapService>,
    pub og: Arc<OgService>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(job_listing))
        .route("/jobs", get(job_listing))
        .route("/jobs/{id}", get(job_detail))
        .route("/feed.xml", get(rss_feed))
        .route("/atom.xml", get(atom_feed))
        .route("/feed.json", get(json_feed))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots_txt))
        .route("/api/og", get(og::home_image))
        .route("/api/og/jobs/{id}", get(og::job_image))
        .route("/static/{*path}", get(crate::infra::assets::serve_static))
        .route("/_health", get(health))
        .fallback(fallback_router)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

/// Chrome with the site-wide OG image, used by every page without its own card.
fn site_chrome(state: &HttpState) -> LayoutChrome {
    let chrome = state.chrome.load();
    let og_image = state
        .og
        .home_enabled()
        .then(|| state.site.absolute_url("api/og"));
    chrome.with_og_image(og_image)
}

async fn job_listing(
    State(state): State<HttpState>,
    RawQuery(query): RawQuery,
    uri: Uri,
) -> Response {
    let chrome = site_chrome(&state);
    let canonical = state.site.absolute_url(uri.path());

    match state.jobs.listing_view(query.as_deref()).await {
        Ok(content) => {
            let view = LayoutContext::new(chrome.with_canonical(canonical), content);
            render_template_response(JobsTemplate { view }, StatusCode::OK)
        }
        Err(err) => render_unavailable_response(chrome, err),
    }
}

async fn job_detail(State(state): State<HttpState>, Path(id): Path<String>) -> Response {
    let chrome = site_chrome(&state);

    match state.jobs.detail_page(&id).await {
        Ok(Some(page)) => {
            let canonical = state.site.absolute_url(&format!("jobs/{}", page.id));
            let og_image = state
                .og
                .job_enabled()
                .then(|| state.site.absolute_url(&format!("api/og/jobs/{}", page.id)));
            let title = format!("{} | {}", page.headline, state.site.title);
            let chrome = LayoutChrome {
                meta: chrome
                    .meta
                    .with_text(title, page.summary)
                    .with_canonical(canonical)
                    .as_article(),
                ..chrome
            }
            .with_og_image(og_image);
            let view = LayoutContext::new(chrome, page.view);
            render_template_response(JobTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(chrome),
        Err(err) => render_unavailable_response(chrome, err),
    }
}

async fn fallback_router(State(state): State<HttpState>, request: Request<Body>) -> Response {
    let slug = request.uri().path().trim_matches('/');
    let chrome = site_chrome(&state);

    if slug.is_empty() {
        return render_not_found_response(chrome);
    }

    match state.pages.page_view(slug) {
        Some(page) => {
            let canonical = state.site.absolute_url(&page.slug);
            let title = format!("{} | {}", page.title, state.site.title);
            let description = if page.description.is_empty() {
                chrome.meta.description.clone()
            } else {
                page.description
            };
            let chrome = chrome
                .with_meta(title, description)
                .with_canonical(canonical);
            let view = LayoutContext::new(chrome, page.view);
            render_template_response(PageTemplate { view }, StatusCode::OK)
        }
        None => render_not_found_response(chrome),
    }
}

async fn rss_feed(State(state): State<HttpState>) -> Response {
    feed_response(&state, FeedFormat::Rss).await
}

async fn atom_feed(State(state): State<HttpState>) -> Response {
    feed_response(&state, FeedFormat::Atom).await
}

async fn json_feed(State(state): State<HttpState>) -> Response {
    feed_response(&state, FeedFormat::Json).await
}

async fn feed_response(state: &HttpState, format: FeedFormat) -> Response {
    const SOURCE: &str = "infra::http::public::feed";
    match state.syndication.feed(format).await {
        Ok(body) => text_response(body, syndication::content_type(format)),
        Err(err @ SyndicationError::Disabled(_)) => {
            HttpError::new(SOURCE, StatusCode::NOT_FOUND, err.to_string(), err.to_string())
                .into_response()
        }
        Err(err) => HttpError::new(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error generating {} feed", syndication::format_name(format)),
            err.to_string(),
        )
        .into_response(),
    }
}

async fn sitemap(State(state): State<HttpState>) -> Response {
    match state.sitemap.sitemap_xml().await {
        Ok(body) => text_response(body, "application/xml; charset=utf-8"),
        Err(err) => HttpError::new(
            "infra::http::public::sitemap",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate sitemap",
            err.to_string(),
        )
        .into_response(),
    }
}

async fn robots_txt(State(state): State<HttpState>) -> Response {
    text_response(state.sitemap.robots_txt(), "text/plain; charset=utf-8")
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

fn text_response(body: String, content_type: &'static str) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CACHE_CONTROL, "public, max-age=300")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
