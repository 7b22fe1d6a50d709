use crate::application::error::{ErrorReport, HttpError};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Error page for failures that still have a chrome to render into.
pub fn render_unavailable_response(chrome: LayoutChrome, error: HttpError) -> Response {
    let status = error.status();
    let view = LayoutContext::new(chrome, ErrorPageView::unavailable());
    let mut response = render_template_response(ErrorTemplate { view }, status);
    error.into_report().attach(&mut response);
    response
}

#[derive(Clone)]
pub struct NavigationView {
    pub entries: Vec<NavigationLinkView>,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
    pub feeds: Vec<FeedLinkView>,
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
    pub logo: Option<String>,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
    pub target: Option<String>,
    pub rel: Option<String>,
}

#[derive(Clone)]
pub struct FeedLinkView {
    pub title: String,
    pub href: String,
    pub mime: &'static str,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self {
            meta: self.meta.with_canonical(canonical),
            ..self
        }
    }

    pub fn with_meta(self, title: String, description: String) -> Self {
        Self {
            meta: self.meta.with_text(title, description),
            ..self
        }
    }

    pub fn with_og_image(self, og_image: Option<String>) -> Self {
        Self {
            meta: PageMetaView {
                og_image,
                ..self.meta
            },
            ..self
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub site_name: String,
    pub canonical: String,
    pub og_type: &'static str,
    pub og_image: Option<String>,
    pub feeds: Vec<FeedLinkView>,
}

impl PageMetaView {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self { canonical, ..self }
    }

    pub fn with_text(self, title: String, description: String) -> Self {
        Self {
            title,
            description,
            ..self
        }
    }

    pub fn as_article(self) -> Self {
        Self {
            og_type: "article",
            ..self
        }
    }
}

#[derive(Clone)]
pub struct HeroView {
    pub title: String,
    pub tagline: String,
    /// Inline style for the hero section; empty when no colors are configured.
    pub style: String,
    pub title_style: String,
    pub subtitle_style: String,
}

#[derive(Clone)]
pub struct JobCardView {
    pub href: String,
    pub title: String,
    pub company: String,
    pub job_type: String,
    pub location: String,
    pub salary: String,
    pub posted_full: String,
    pub posted_relative: String,
    pub iso_date: String,
    pub levels: Vec<String>,
    pub featured: bool,
    pub visa_sponsored: bool,
}

#[derive(Clone)]
pub struct FacetOptionView {
    pub name: &'static str,
    pub value: String,
    pub label: String,
    pub count: usize,
    pub checked: bool,
}

#[derive(Clone)]
pub struct FacetGroupView {
    pub title: &'static str,
    pub options: Vec<FacetOptionView>,
}

#[derive(Clone)]
pub struct SelectOptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone)]
pub struct PageLinkView {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

#[derive(Clone)]
pub struct PaginationView {
    pub page: usize,
    pub total_pages: usize,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub pages: Vec<PageLinkView>,
}

impl PaginationView {
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }
}

pub struct JobListingView {
    pub hero: HeroView,
    pub query: String,
    pub jobs: Vec<JobCardView>,
    pub total: usize,
    pub range_label: String,
    pub has_results: bool,
    pub facet_groups: Vec<FacetGroupView>,
    pub sort_options: Vec<SelectOptionView>,
    pub per_page_options: Vec<SelectOptionView>,
    pub pagination: PaginationView,
    pub has_active_filters: bool,
}

#[derive(Template)]
#[template(path = "jobs.html")]
pub struct JobsTemplate {
    pub view: LayoutContext<JobListingView>,
}

#[derive(Clone)]
pub struct DetailRowView {
    pub label: &'static str,
    pub value: String,
}

pub struct JobDetailView {
    pub title: String,
    pub company: String,
    pub job_type: String,
    pub location: String,
    pub salary: String,
    pub posted_full: String,
    pub posted_relative: String,
    pub iso_date: String,
    pub rows: Vec<DetailRowView>,
    pub levels: Vec<String>,
    pub languages: Vec<String>,
    pub description_html: String,
    pub benefits_html: Option<String>,
    pub requirements_html: Option<String>,
    pub apply_url: Option<String>,
    pub ld_json: Option<String>,
    pub breadcrumb_ld_json: Option<String>,
}

#[derive(Template)]
#[template(path = "job.html")]
pub struct JobTemplate {
    pub view: LayoutContext<JobDetailView>,
}

pub struct PageView {
    pub title: String,
    pub content_html: String,
    pub ld_json: Vec<String>,
}

#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub view: LayoutContext<PageView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Try the job listings instead."
                .to_string(),
            primary_action: Some(ErrorAction::home()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            title: "Temporarily Unavailable".to_string(),
            message: "Job listings could not be loaded right now. Please try again shortly."
                .to_string(),
            primary_action: Some(ErrorAction::home()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Browse all jobs".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
