//! sitemap.xml and robots.txt generation.

use std::sync::Arc;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    application::{error::HttpError, jobs::JobsService},
    config::SiteConfig,
    domain::entities::JobRecord,
    util::xml::xml_escape,
};

#[derive(Clone)]
pub struct SitemapService {
    jobs: JobsService,
    site: Arc<SiteConfig>,
}

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("failed to list jobs: {0}")]
    Jobs(String),
}

impl From<HttpError> for SitemapError {
    fn from(err: HttpError) -> Self {
        SitemapError::Jobs(err.into_report().messages.join(": "))
    }
}

impl SitemapService {
    pub fn new(jobs: JobsService, site: Arc<SiteConfig>) -> Self {
        Self { jobs, site }
    }

    pub async fn sitemap_xml(&self) -> Result<String, SitemapError> {
        let jobs = self.jobs.active_jobs().await?;
        Ok(build_sitemap(&self.site, &jobs))
    }

    pub fn robots_txt(&self) -> String {
        build_robots(&self.site)
    }
}

pub(crate) fn build_sitemap(site: &SiteConfig, jobs: &[JobRecord]) -> String {
    let latest = jobs.iter().filter_map(|job| job.posted_date).max();

    let mut entries = Vec::with_capacity(jobs.len() + site.pages.len() + 2);
    entries.push(sitemap_entry(site, "/", latest, "daily", "1.0"));
    entries.push(sitemap_entry(site, "/jobs", latest, "daily", "0.9"));
    for page in &site.pages {
        entries.push(sitemap_entry(
            site,
            &format!("/{}", page.slug),
            None,
            "monthly",
            "0.5",
        ));
    }
    for job in jobs {
        entries.push(sitemap_entry(
            site,
            &format!("/jobs/{}", job.id),
            job.posted_date,
            "weekly",
            "0.8",
        ));
    }

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str(&entry);
    }
    xml.push_str("</urlset>\n");
    xml
}

pub(crate) fn build_robots(site: &SiteConfig) -> String {
    let sitemap_url = site.absolute_url("sitemap.xml");
    format!("User-agent: *\nAllow: /\n\nSitemap: {sitemap_url}\n")
}

fn sitemap_entry(
    site: &SiteConfig,
    path: &str,
    lastmod: Option<OffsetDateTime>,
    changefreq: &str,
    priority: &str,
) -> String {
    let loc = xml_escape(&site.absolute_url(path));
    let lastmod = lastmod
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .map(|value| format!("<lastmod>{value}</lastmod>"))
        .unwrap_or_default();
    format!(
        "  <url><loc>{loc}</loc>{lastmod}<changefreq>{changefreq}</changefreq><priority>{priority}</priority></url>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::fixtures::job;
    use time::macros::datetime;

    #[test]
    fn sitemap_lists_home_pages_and_jobs() {
        let site = SiteConfig::default();
        let mut record = job("rec42", "Engineer");
        record.posted_date = Some(datetime!(2024-12-10 08:30 UTC));
        let xml = build_sitemap(&site, &[record]);

        assert!(xml.contains(
            "<url><loc>http://localhost:3000/</loc><lastmod>2024-12-10T08:30:00Z</lastmod>"
        ));
        assert!(xml.contains("<loc>http://localhost:3000/about</loc><changefreq>monthly"));
        assert!(xml.contains(
            "<loc>http://localhost:3000/jobs/rec42</loc><lastmod>2024-12-10T08:30:00Z</lastmod>"
        ));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn undated_jobs_omit_lastmod() {
        let xml = build_sitemap(&SiteConfig::default(), &[job("rec1", "Engineer")]);
        assert!(xml.contains("<loc>http://localhost:3000/jobs/rec1</loc><changefreq>"));
    }
}
