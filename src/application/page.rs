use std::sync::Arc;

use crate::application::{markdown::render_markdown, structured_data::marketing_page_ld_json};
use crate::config::{MarketingPage, SiteConfig};
use crate::presentation::views::PageView;

/// Config-driven marketing pages such as about, faq, contact, pricing and changelog.
#[derive(Clone)]
pub struct PageService {
    site: Arc<SiteConfig>,
}

pub struct MarketingPageContent {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub view: PageView,
}

impl PageService {
    pub fn new(site: Arc<SiteConfig>) -> Self {
        Self { site }
    }

    pub fn page_view(&self, slug: &str) -> Option<MarketingPageContent> {
        let slug = slug.trim_matches('/');
        self.site
            .page(slug)
            .map(|page| render_page(page, &self.site))
    }
}

fn render_page(page: &MarketingPage, site: &SiteConfig) -> MarketingPageContent {
    MarketingPageContent {
        slug: page.slug.clone(),
        title: page.title.clone(),
        description: page.description.clone(),
        view: PageView {
            title: page.title.clone(),
            content_html: render_markdown(&page.markdown),
            ld_json: marketing_page_ld_json(page, site),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_pages_render_markdown() {
        let service = PageService::new(Arc::new(SiteConfig::default()));
        let page = service.page_view("faq").expect("faq page");
        assert_eq!(page.title, "FAQ");
        assert!(page.view.content_html.contains("<h2>How do I apply?</h2>"));
    }

    #[test]
    fn pricing_and_changelog_ship_by_default() {
        let service = PageService::new(Arc::new(SiteConfig::default()));
        for slug in ["pricing", "changelog"] {
            let page = service.page_view(slug).expect("default page");
            assert_eq!(page.view.ld_json.len(), 1, "{slug}");
        }
        let faq = service.page_view("/faq/").expect("faq page");
        assert_eq!(faq.view.ld_json.len(), 2);
    }

    #[test]
    fn unknown_slugs_are_missing() {
        let service = PageService::new(Arc::new(SiteConfig::default()));
        assert!(service.page_view("careers").is_none());
        assert!(service.page_view("").is_none());
    }
}
