//! RSS 2.0, Atom 1.0 and JSON Feed 1.1 documents over the active jobs.

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use time::{
    OffsetDateTime,
    format_description::well_known::{Rfc2822, Rfc3339},
};

use crate::{
    application::{
        error::HttpError,
        jobs::JobsService,
        listing::sort_jobs,
        markdown::{plain_text, render_markdown},
    },
    config::{FeedFormat, SiteConfig},
    domain::{
        entities::{JobRecord, truncate_chars},
        types::JobSort,
    },
    util::xml::xml_escape,
};

/// Feed document generation.
#[derive(Clone)]
pub struct SyndicationService {
    jobs: JobsService,
    site: Arc<SiteConfig>,
}

#[derive(Debug, Error)]
pub enum SyndicationError {
    #[error("{} feed not enabled", format_name(*.0))]
    Disabled(FeedFormat),
    #[error("failed to list jobs: {0}")]
    Jobs(String),
}

impl From<HttpError> for SyndicationError {
    fn from(err: HttpError) -> Self {
        let report = err.into_report();
        SyndicationError::Jobs(report.messages.join(": "))
    }
}

pub fn format_name(format: FeedFormat) -> &'static str {
    match format {
        FeedFormat::Rss => "RSS",
        FeedFormat::Atom => "Atom",
        FeedFormat::Json => "JSON",
    }
}

pub fn content_type(format: FeedFormat) -> &'static str {
    match format {
        FeedFormat::Rss => "application/rss+xml; charset=utf-8",
        FeedFormat::Atom => "application/atom+xml; charset=utf-8",
        FeedFormat::Json => "application/feed+json; charset=utf-8",
    }
}

impl SyndicationService {
    pub fn new(jobs: JobsService, site: Arc<SiteConfig>) -> Self {
        Self { jobs, site }
    }

    pub fn is_enabled(&self, format: FeedFormat) -> bool {
        self.site.feeds.is_enabled(format)
    }

    pub async fn feed(&self, format: FeedFormat) -> Result<String, SyndicationError> {
        if !self.is_enabled(format) {
            return Err(SyndicationError::Disabled(format));
        }
        let jobs = self.jobs.active_jobs().await?;
        let now = OffsetDateTime::now_utc();
        let items = feed_items(&jobs, &self.site);
        let channel = FeedChannel::new(&self.site, &items, now);
        Ok(match format {
            FeedFormat::Rss => rss_document(&channel, &items),
            FeedFormat::Atom => atom_document(&channel, &items),
            FeedFormat::Json => json_document(&channel, &items),
        })
    }
}

/// One job as it appears in every feed format.
pub(crate) struct FeedItem {
    pub id: String,
    pub url: String,
    pub title: String,
    pub summary: String,
    pub content_html: String,
    pub author: String,
    pub published: Option<OffsetDateTime>,
    pub categories: Vec<String>,
}

pub(crate) struct FeedChannel {
    pub title: String,
    pub description: String,
    pub home_url: String,
    pub updated: OffsetDateTime,
    base: String,
}

impl FeedChannel {
    fn new(site: &SiteConfig, items: &[FeedItem], now: OffsetDateTime) -> Self {
        let updated = items
            .iter()
            .filter_map(|item| item.published)
            .max()
            .unwrap_or(now);
        Self {
            title: site
                .feeds
                .title
                .clone()
                .unwrap_or_else(|| format!("{} Jobs", site.title)),
            description: site.description.clone(),
            home_url: site.absolute_url("/"),
            updated,
            base: site.url.clone(),
        }
    }

    fn self_url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

pub(crate) fn feed_items(jobs: &[JobRecord], site: &SiteConfig) -> Vec<FeedItem> {
    let mut ordered: Vec<&JobRecord> = jobs.iter().collect();
    sort_jobs(&mut ordered, JobSort::Newest);

    ordered
        .into_iter()
        .map(|job| {
            let url = site.absolute_url(&format!("jobs/{}", job.id));
            let mut categories = Vec::new();
            if let Some(kind) = job.job_type {
                categories.push(kind.as_str().to_string());
            }
            categories.push(job.workplace_type.as_str().to_string());
            FeedItem {
                id: url.clone(),
                url,
                title: job.headline(),
                summary: summarize(&job.description, site.feeds.description_length),
                content_html: render_markdown(&job.description),
                author: job.company.clone(),
                published: job.posted_date,
                categories,
            }
        })
        .collect()
}

fn summarize(markdown: &str, max_chars: usize) -> String {
    let text = plain_text(markdown);
    let truncated = truncate_chars(&text, max_chars);
    if truncated.len() < text.len() {
        format!("{}...", truncated.trim_end())
    } else {
        truncated
    }
}

fn rfc2822(date: OffsetDateTime) -> String {
    date.format(&Rfc2822).unwrap_or_else(|_| date.to_string())
}

fn rfc3339(date: OffsetDateTime) -> String {
    date.format(&Rfc3339).unwrap_or_else(|_| date.to_string())
}

pub(crate) fn rss_document(channel: &FeedChannel, items: &[FeedItem]) -> String {
    let mut body = String::new();
    for item in items {
        let pub_date = item
            .published
            .map(|date| format!("      <pubDate>{}</pubDate>\n", rfc2822(date)))
            .unwrap_or_default();
        let categories: String = item
            .categories
            .iter()
            .map(|category| format!("      <category>{}</category>\n", xml_escape(category)))
            .collect();
        body.push_str(&format!(
            "    <item>\n      <title>{}</title>\n      <link>{}</link>\n      <guid isPermaLink=\"true\">{}</guid>\n{}{}      <description>{}</description>\n    </item>\n",
            xml_escape(&item.title),
            xml_escape(&item.url),
            xml_escape(&item.id),
            pub_date,
            categories,
            xml_escape(&item.summary),
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n  <channel>\n    <title>{}</title>\n    <link>{}</link>\n    <description>{}</description>\n    <lastBuildDate>{}</lastBuildDate>\n    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n{}  </channel>\n</rss>\n",
        xml_escape(&channel.title),
        xml_escape(&channel.home_url),
        xml_escape(&channel.description),
        rfc2822(channel.updated),
        xml_escape(&channel.self_url("feed.xml")),
        body
    )
}

pub(crate) fn atom_document(channel: &FeedChannel, items: &[FeedItem]) -> String {
    let mut entries = String::new();
    for item in items {
        let updated = rfc3339(item.published.unwrap_or(channel.updated));
        entries.push_str(&format!(
            "  <entry>\n    <title>{}</title>\n    <link href=\"{}\"/>\n    <id>{}</id>\n    <updated>{}</updated>\n    <author><name>{}</name></author>\n    <summary>{}</summary>\n  </entry>\n",
            xml_escape(&item.title),
            xml_escape(&item.url),
            xml_escape(&item.id),
            updated,
            xml_escape(&item.author),
            xml_escape(&item.summary),
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<feed xmlns=\"http://www.w3.org/2005/Atom\">\n  <title>{}</title>\n  <subtitle>{}</subtitle>\n  <id>{}</id>\n  <updated>{}</updated>\n  <link href=\"{}\"/>\n  <link href=\"{}\" rel=\"self\"/>\n{}</feed>\n",
        xml_escape(&channel.title),
        xml_escape(&channel.description),
        xml_escape(&channel.home_url),
        rfc3339(channel.updated),
        xml_escape(&channel.home_url),
        xml_escape(&channel.self_url("atom.xml")),
        entries
    )
}

pub(crate) fn json_document(channel: &FeedChannel, items: &[FeedItem]) -> String {
    let items: Vec<_> = items
        .iter()
        .map(|item| {
            let mut entry = json!({
                "id": item.id,
                "url": item.url,
                "title": item.title,
                "summary": item.summary,
                "content_html": item.content_html,
                "authors": [{ "name": item.author }],
                "tags": item.categories,
            });
            if let Some(published) = item.published {
                entry["date_published"] = json!(rfc3339(published));
            }
            entry
        })
        .collect();

    let document = json!({
        "version": "https://jsonfeed.org/version/1.1",
        "title": channel.title,
        "home_page_url": channel.home_url,
        "feed_url": channel.self_url("feed.json"),
        "description": channel.description,
        "items": items,
    });
    serde_json::to_string_pretty(&document).unwrap_or_else(|_| document.to_string())
}
