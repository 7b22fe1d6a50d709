use std::sync::Arc;

use crate::config::{FeedFormat, NavigationLink, SiteConfig};
use crate::presentation::views::{
    BrandView, FeedLinkView, FooterView, LayoutChrome, NavigationLinkView, NavigationView,
    PageMetaView,
};

/// Builds the layout shared by every HTML page from the site configuration.
#[derive(Clone)]
pub struct ChromeService {
    site: Arc<SiteConfig>,
}

impl ChromeService {
    pub fn new(site: Arc<SiteConfig>) -> Self {
        Self { site }
    }

    pub fn load(&self) -> LayoutChrome {
        let site = self.site.as_ref();
        let feeds = feed_links(site);
        let copy = site.footer_text.clone().unwrap_or_else(|| {
            format!("{} · {}", site.title, site.tagline)
        });

        LayoutChrome {
            brand: BrandView {
                title: site.title.clone(),
                href: "/".to_string(),
                logo: site.logo.clone(),
            },
            navigation: NavigationView {
                entries: site.navigation.iter().map(map_navigation_link).collect(),
            },
            footer: FooterView {
                copy,
                feeds: feeds.clone(),
            },
            meta: PageMetaView {
                title: site.title.clone(),
                description: site.description.clone(),
                site_name: site.title.clone(),
                canonical: site.absolute_url("/"),
                og_type: "website",
                og_image: None,
                feeds,
            },
        }
    }
}

fn feed_links(site: &SiteConfig) -> Vec<FeedLinkView> {
    let title = site
        .feeds
        .title
        .clone()
        .unwrap_or_else(|| format!("{} Jobs", site.title));

    [
        (FeedFormat::Rss, "feed.xml", "application/rss+xml", "RSS"),
        (FeedFormat::Atom, "atom.xml", "application/atom+xml", "Atom"),
        (FeedFormat::Json, "feed.json", "application/feed+json", "JSON Feed"),
    ]
    .into_iter()
    .filter(|(format, ..)| site.feeds.is_enabled(*format))
    .map(|(_, path, mime, label)| FeedLinkView {
        title: format!("{title} ({label})"),
        href: site.absolute_url(path),
        mime,
    })
    .collect()
}

fn map_navigation_link(link: &NavigationLink) -> NavigationLinkView {
    let external = link.href.starts_with("http://") || link.href.starts_with("https://");
    NavigationLinkView {
        label: link.label.clone(),
        href: link.href.clone(),
        target: external.then(|| "_blank".to_string()),
        rel: external.then(|| "noopener noreferrer".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_links_open_in_new_tab() {
        let mut site = SiteConfig::default();
        site.navigation
            .push(NavigationLink::new("Post a job", "https://forms.example/post"));
        let chrome = ChromeService::new(Arc::new(site)).load();

        let internal = &chrome.navigation.entries[0];
        assert_eq!(internal.href, "/");
        assert!(internal.target.is_none());

        let external = chrome.navigation.entries.last().expect("link");
        assert_eq!(external.target.as_deref(), Some("_blank"));
        assert_eq!(external.rel.as_deref(), Some("noopener noreferrer"));
    }

    #[test]
    fn feed_links_follow_toggles() {
        let mut site = SiteConfig::default();
        site.feeds.atom = false;
        let chrome = ChromeService::new(Arc::new(site)).load();

        let hrefs: Vec<_> = chrome.meta.feeds.iter().map(|feed| feed.href.as_str()).collect();
        assert_eq!(
            hrefs,
            ["http://localhost:3000/feed.xml", "http://localhost:3000/feed.json"]
        );
    }

    #[test]
    fn disabled_feeds_publish_no_alternates() {
        let mut site = SiteConfig::default();
        site.feeds.enabled = false;
        let chrome = ChromeService::new(Arc::new(site)).load();
        assert!(chrome.meta.feeds.is_empty());
        assert!(chrome.footer.feeds.is_empty());
    }
}
