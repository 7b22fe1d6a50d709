//! Site-wide presentation settings, deserialized once at startup.

use serde::Deserialize;

use crate::domain::types::JobSort;

/// Immutable site configuration shared by every service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub tagline: String,
    /// Public origin with a trailing slash, e.g. `https://jobs.example.com/`.
    pub url: String,
    pub logo: Option<String>,
    pub footer_text: Option<String>,
    pub ui: SiteUi,
    pub font: SiteFont,
    pub navigation: Vec<NavigationLink>,
    pub pages: Vec<MarketingPage>,
    pub og: OgSettings,
    pub feeds: FeedSettings,
    pub listings: ListingSettings,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Bordful".to_string(),
            description: "Find your dream job today!".to_string(),
            tagline: "Open roles, updated daily.".to_string(),
            url: "http://localhost:3000/".to_string(),
            logo: None,
            footer_text: None,
            ui: SiteUi::default(),
            font: SiteFont::default(),
            navigation: vec![
                NavigationLink::new("Jobs", "/"),
                NavigationLink::new("About", "/about"),
                NavigationLink::new("FAQ", "/faq"),
                NavigationLink::new("Contact", "/contact"),
            ],
            pages: vec![
                MarketingPage::new(
                    "about",
                    "About",
                    "Who runs this job board.",
                    "We collect open roles from companies we trust.",
                )
                .with_kind(PageKind::About),
                MarketingPage::new(
                    "faq",
                    "FAQ",
                    "Answers to common questions.",
                    "## How do I apply?\n\nUse the apply link on each job.",
                )
                .with_kind(PageKind::Faq),
                MarketingPage::new(
                    "contact",
                    "Contact",
                    "Get in touch.",
                    "Write to us and we will get back within two business days.",
                )
                .with_kind(PageKind::Contact),
                MarketingPage::new(
                    "pricing",
                    "Pricing",
                    "Choose the plan that's right for your hiring needs.",
                    "## Free\n\nOne active listing for 30 days.\n\n## Pro\n\nFeatured placement and unlimited listings.",
                ),
                MarketingPage::new(
                    "changelog",
                    "Changelog",
                    "Latest updates and improvements.",
                    "## Salary filters\n\nListings can be narrowed by salary range.",
                ),
            ],
            og: OgSettings::default(),
            feeds: FeedSettings::default(),
            listings: ListingSettings::default(),
        }
    }
}

impl SiteConfig {
    pub fn page(&self, slug: &str) -> Option<&MarketingPage> {
        self.pages.iter().find(|page| page.slug == slug)
    }

    /// Absolute URL for a site-relative path.
    pub fn absolute_url(&self, path: &str) -> String {
        let base = self.url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{base}/")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteUi {
    pub hero_background_color: Option<String>,
    pub hero_title_color: Option<String>,
    pub hero_subtitle_color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteFont {
    /// Font selector such as `inter` or `ibm-plex-serif`.
    pub family: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NavigationLink {
    pub label: String,
    pub href: String,
}

impl NavigationLink {
    pub fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MarketingPage {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub markdown: String,
    /// schema.org page type announced in the page's JSON-LD.
    #[serde(default)]
    pub kind: Option<PageKind>,
    /// Public contact address, published on `contact` pages.
    #[serde(default)]
    pub email: Option<String>,
}

impl MarketingPage {
    pub fn new(slug: &str, title: &str, description: &str, markdown: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            markdown: markdown.to_string(),
            kind: None,
            email: None,
        }
    }

    pub fn with_kind(mut self, kind: PageKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    About,
    Contact,
    Faq,
}

/// OG image settings for the home image and the per-job image.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct OgSettings {
    pub home: OgLayer,
    pub jobs: OgLayer,
}

/// One partially specified layer of OG image settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct OgLayer {
    pub enabled: Option<bool>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub font_family: Option<String>,
    pub background_color: Option<String>,
    pub background_opacity: Option<f64>,
    pub background_image: Option<String>,
    pub title_color: Option<String>,
    pub description_color: Option<String>,
    pub gradient: OgGradientLayer,
    pub logo: OgLogoLayer,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct OgGradientLayer {
    pub enabled: Option<bool>,
    pub color: Option<String>,
    pub angle: Option<f64>,
    pub start_opacity: Option<f64>,
    pub end_opacity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct OgLogoLayer {
    pub show: Option<bool>,
    pub src: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedSettings {
    pub enabled: bool,
    pub rss: bool,
    pub atom: bool,
    pub json: bool,
    pub title: Option<String>,
    /// Characters of job description kept in each feed item.
    pub description_length: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rss: true,
            atom: true,
            json: true,
            title: None,
            description_length: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Rss,
    Atom,
    Json,
}

impl FeedSettings {
    pub fn is_enabled(&self, format: FeedFormat) -> bool {
        self.enabled
            && match format {
                FeedFormat::Rss => self.rss,
                FeedFormat::Atom => self.atom,
                FeedFormat::Json => self.json,
            }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListingSettings {
    pub default_per_page: usize,
    pub per_page_options: Vec<usize>,
    pub max_per_page: usize,
    pub default_sort: JobSort,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            default_per_page: 10,
            per_page_options: vec![10, 25, 50, 100],
            max_per_page: 100,
            default_sort: JobSort::Newest,
        }
    }
}
