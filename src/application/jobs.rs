use std::sync::Arc;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::debug;

use crate::{
    application::{
        error::HttpError,
        listing::{FacetCounts, ListingOutcome, ListingQuery, run_listing},
        markdown::{plain_text, render_markdown},
        repos::JobsRepo,
        structured_data::{job_breadcrumb_ld_json, job_posting_ld_json},
    },
    config::{SiteConfig, SiteUi},
    domain::{
        entities::{JobRecord, truncate_chars},
        salary::format_salary,
        types::{CareerLevel, JobSort, VisaSponsorship},
    },
    presentation::views::{
        DetailRowView, FacetGroupView, FacetOptionView, HeroView, JobCardView, JobDetailView,
        JobListingView, PageLinkView, PaginationView, SelectOptionView,
    },
    util::dates::{date_labels, format_short_date},
};

const META_DESCRIPTION_CHARS: usize = 160;
const PAGE_WINDOW: usize = 2;

/// Listing and detail views over the job repository.
#[derive(Clone)]
pub struct JobsService {
    repo: Arc<dyn JobsRepo>,
    site: Arc<SiteConfig>,
}

/// Detail view plus the text the page head needs.
pub struct JobDetailPage {
    pub id: String,
    pub headline: String,
    pub summary: String,
    pub view: JobDetailView,
}

impl JobsService {
    pub fn new(repo: Arc<dyn JobsRepo>, site: Arc<SiteConfig>) -> Self {
        Self { repo, site }
    }

    pub async fn active_jobs(&self) -> Result<Vec<JobRecord>, HttpError> {
        let jobs = self.repo.list_active_jobs().await?;
        Ok(jobs.into_iter().filter(JobRecord::is_active).collect())
    }

    pub async fn find_job(&self, id: &str) -> Result<Option<JobRecord>, HttpError> {
        let job = self.repo.find_active_job(id).await?;
        Ok(job.filter(JobRecord::is_active))
    }

    pub async fn listing_view(&self, raw_query: Option<&str>) -> Result<JobListingView, HttpError> {
        let jobs = self.active_jobs().await?;
        let query = ListingQuery::parse(raw_query, &self.site.listings);
        Ok(self.build_listing(&jobs, &query, OffsetDateTime::now_utc()))
    }

    pub async fn detail_page(&self, id: &str) -> Result<Option<JobDetailPage>, HttpError> {
        let Some(job) = self.find_job(id).await? else {
            debug!(target = "bordful::application::jobs", id, "job not found");
            return Ok(None);
        };
        Ok(Some(self.build_detail(&job, OffsetDateTime::now_utc())))
    }

    pub(crate) fn build_listing(
        &self,
        jobs: &[JobRecord],
        query: &ListingQuery,
        now: OffsetDateTime,
    ) -> JobListingView {
        let settings = &self.site.listings;
        let outcome = run_listing(jobs, query);

        let cards = outcome
            .jobs
            .iter()
            .map(|job| job_card(job, now))
            .collect::<Vec<_>>();

        JobListingView {
            hero: hero_view(&self.site),
            query: query.filters.query.clone(),
            has_results: !cards.is_empty(),
            range_label: range_label(&outcome, cards.len()),
            jobs: cards,
            total: outcome.total,
            facet_groups: facet_groups(&outcome.facets, query),
            sort_options: JobSort::ALL
                .into_iter()
                .map(|sort| SelectOptionView {
                    value: sort.as_str().to_string(),
                    label: sort.label().to_string(),
                    selected: sort == query.sort,
                })
                .collect(),
            per_page_options: per_page_options(&settings.per_page_options, query.per_page),
            pagination: pagination_view(&outcome, query, &self.site),
            has_active_filters: !query.filters.is_empty(),
        }
    }

    pub(crate) fn build_detail(&self, job: &JobRecord, now: OffsetDateTime) -> JobDetailPage {
        let posted = date_labels(job.posted_date, now);
        let job_type = job_type_label(job);

        let mut rows = vec![
            DetailRowView {
                label: "Job type",
                value: job_type.clone(),
            },
            DetailRowView {
                label: "Salary",
                value: format_salary(job.salary.as_ref(), true),
            },
            DetailRowView {
                label: "Workplace",
                value: job.workplace_type.as_str().to_string(),
            },
            DetailRowView {
                label: "Location",
                value: job.location_label(),
            },
        ];
        if let Some(timezone) = job.timezone_requirements.as_deref().filter(|tz| !tz.is_empty()) {
            rows.push(DetailRowView {
                label: "Timezone",
                value: timezone.to_string(),
            });
        }
        if job.visa_sponsorship != VisaSponsorship::NotSpecified {
            rows.push(DetailRowView {
                label: "Visa sponsorship",
                value: job.visa_sponsorship.as_str().to_string(),
            });
        }
        if let Some(valid) = job.valid_through {
            rows.push(DetailRowView {
                label: "Apply before",
                value: format_short_date(valid),
            });
        }

        let description_text = plain_text(&job.description);
        let summary = if description_text.is_empty() {
            format!("{} is hiring. Apply on {}.", job.company, self.site.title)
        } else {
            truncate_chars(&description_text, META_DESCRIPTION_CHARS)
        };

        let view = JobDetailView {
            title: job.title.clone(),
            company: job.company.clone(),
            job_type,
            location: job.location_label(),
            salary: format_salary(job.salary.as_ref(), false),
            posted_full: posted.full,
            posted_relative: posted.relative,
            iso_date: iso_date(job.posted_date),
            rows,
            levels: level_labels(&job.career_levels),
            languages: job
                .language_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            description_html: render_markdown(&job.description),
            benefits_html: optional_markdown(job.benefits.as_deref()),
            requirements_html: optional_markdown(job.application_requirements.as_deref()),
            apply_url: job.apply_url.clone(),
            ld_json: job_posting_ld_json(job, &self.site),
            breadcrumb_ld_json: job_breadcrumb_ld_json(job, &self.site),
        };

        JobDetailPage {
            id: job.id.clone(),
            headline: job.headline(),
            summary,
            view,
        }
    }
}

fn job_card(job: &JobRecord, now: OffsetDateTime) -> JobCardView {
    let posted = date_labels(job.posted_date, now);
    JobCardView {
        href: format!("/jobs/{}", job.id),
        title: job.title.clone(),
        company: job.company.clone(),
        job_type: job_type_label(job),
        location: job.location_label(),
        salary: format_salary(job.salary.as_ref(), false),
        posted_full: posted.full,
        posted_relative: posted.relative,
        iso_date: iso_date(job.posted_date),
        levels: level_labels(&job.career_levels),
        featured: job.featured,
        visa_sponsored: job.visa_sponsorship == VisaSponsorship::Yes,
    }
}

fn job_type_label(job: &JobRecord) -> String {
    job.job_type
        .map_or("Not specified", |kind| kind.as_str())
        .to_string()
}

fn level_labels(levels: &[CareerLevel]) -> Vec<String> {
    levels
        .iter()
        .filter(|level| **level != CareerLevel::NotSpecified)
        .map(|level| level.label().to_string())
        .collect()
}

fn iso_date(date: Option<OffsetDateTime>) -> String {
    date.and_then(|date| date.format(&Rfc3339).ok())
        .unwrap_or_default()
}

fn optional_markdown(markdown: Option<&str>) -> Option<String> {
    markdown
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(render_markdown)
}

fn hero_view(site: &SiteConfig) -> HeroView {
    let SiteUi {
        hero_background_color,
        hero_title_color,
        hero_subtitle_color,
    } = &site.ui;
    HeroView {
        title: site.title.clone(),
        tagline: site.tagline.clone(),
        style: css_declaration("background-color", hero_background_color.as_deref()),
        title_style: css_declaration("color", hero_title_color.as_deref()),
        subtitle_style: css_declaration("color", hero_subtitle_color.as_deref()),
    }
}

/// `property: value;`, or empty when the value is absent or not a plain color token.
fn css_declaration(property: &str, value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return String::new();
    };
    let plain = value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || "#(),.% ".contains(ch));
    if plain {
        format!("{property}: {value};")
    } else {
        String::new()
    }
}

fn range_label(outcome: &ListingOutcome<'_>, shown: usize) -> String {
    if outcome.total == 0 {
        return "No jobs found".to_string();
    }
    if shown == 0 {
        return format!("No jobs on page {} of {}", outcome.page, outcome.total_pages);
    }
    let first = (outcome.page - 1) * outcome.per_page + 1;
    let last = first + shown - 1;
    let noun = if outcome.total == 1 { "job" } else { "jobs" };
    format!("Showing {first}-{last} of {} {noun}", outcome.total)
}

fn facet_groups(facets: &FacetCounts, query: &ListingQuery) -> Vec<FacetGroupView> {
    let filters = &query.filters;
    let mut groups = Vec::with_capacity(6);

    groups.push(FacetGroupView {
        title: "Job type",
        options: facets
            .job_types
            .iter()
            .map(|(kind, count)| FacetOptionView {
                name: "types",
                value: kind.as_str().to_string(),
                label: kind.as_str().to_string(),
                count: *count,
                checked: filters.job_types.contains(kind),
            })
            .collect(),
    });

    groups.push(FacetGroupView {
        title: "Career level",
        options: facets
            .career_levels
            .iter()
            .filter(|(level, count)| *count > 0 || filters.career_levels.contains(level))
            .map(|(level, count)| FacetOptionView {
                name: "roles",
                value: level.as_str().to_string(),
                label: level.label().to_string(),
                count: *count,
                checked: filters.career_levels.contains(level),
            })
            .collect(),
    });

    groups.push(FacetGroupView {
        title: "Workplace",
        options: vec![FacetOptionView {
            name: "remote",
            value: "true".to_string(),
            label: "Remote only".to_string(),
            count: facets.remote,
            checked: filters.remote_only,
        }],
    });

    groups.push(FacetGroupView {
        title: "Salary",
        options: facets
            .salary_buckets
            .iter()
            .map(|(bucket, count)| FacetOptionView {
                name: "salary",
                value: bucket.as_str().to_string(),
                label: bucket.label().to_string(),
                count: *count,
                checked: filters.salary_buckets.contains(bucket),
            })
            .collect(),
    });

    groups.push(FacetGroupView {
        title: "Visa",
        options: vec![FacetOptionView {
            name: "visa",
            value: "true".to_string(),
            label: "Visa sponsorship".to_string(),
            count: facets.visa,
            checked: filters.visa_required,
        }],
    });

    if !facets.languages.is_empty() {
        groups.push(FacetGroupView {
            title: "Languages",
            options: facets
                .languages
                .iter()
                .map(|language| FacetOptionView {
                    name: "languages",
                    value: language.code.clone(),
                    label: language.name.clone(),
                    count: language.count,
                    checked: filters.languages.contains(&language.code),
                })
                .collect(),
        });
    }

    groups
}

fn per_page_options(options: &[usize], current: usize) -> Vec<SelectOptionView> {
    let mut sizes = options.to_vec();
    if !sizes.contains(&current) {
        sizes.push(current);
        sizes.sort_unstable();
    }
    sizes
        .into_iter()
        .map(|size| SelectOptionView {
            value: size.to_string(),
            label: format!("{size} per page"),
            selected: size == current,
        })
        .collect()
}

fn pagination_view(
    outcome: &ListingOutcome<'_>,
    query: &ListingQuery,
    site: &SiteConfig,
) -> PaginationView {
    let href = |page: usize| {
        let encoded = query.with_page(page).to_query_string(&site.listings);
        if encoded.is_empty() {
            "/jobs".to_string()
        } else {
            format!("/jobs?{encoded}")
        }
    };

    let page = outcome.page;
    let total_pages = outcome.total_pages;
    let first = page.saturating_sub(PAGE_WINDOW).max(1);
    let last = (page + PAGE_WINDOW).min(total_pages);
    let pages = (first..=last)
        .map(|number| PageLinkView {
            number,
            href: href(number),
            current: number == page,
        })
        .collect();

    PaginationView {
        page,
        total_pages,
        prev_href: (page > 1).then(|| href((page - 1).min(total_pages))),
        next_href: (page < total_pages).then(|| href(page + 1)),
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::repos::RepoError,
        domain::{
            entities::fixtures::{job, yearly},
            types::{JobStatus, JobType},
        },
    };
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use time::{Duration, macros::datetime};

    const NOW: OffsetDateTime = datetime!(2024-12-20 12:00 UTC);

    struct FixedRepo(Vec<JobRecord>);

    #[async_trait]
    impl JobsRepo for FixedRepo {
        async fn list_active_jobs(&self) -> Result<Vec<JobRecord>, RepoError> {
            Ok(self.0.clone())
        }

        async fn find_active_job(&self, id: &str) -> Result<Option<JobRecord>, RepoError> {
            Ok(self.0.iter().find(|job| job.id == id).cloned())
        }
    }

    struct FailingRepo;

    #[async_trait]
    impl JobsRepo for FailingRepo {
        async fn list_active_jobs(&self) -> Result<Vec<JobRecord>, RepoError> {
            Err(RepoError::Transport("connection refused".into()))
        }

        async fn find_active_job(&self, _id: &str) -> Result<Option<JobRecord>, RepoError> {
            Err(RepoError::Transport("connection refused".into()))
        }
    }

    fn jobs(count: usize) -> Vec<JobRecord> {
        (0..count)
            .map(|index| {
                let mut record = job(&format!("rec{index}"), &format!("Role {index}"));
                record.posted_date = Some(NOW - Duration::hours(index as i64 + 1));
                record
            })
            .collect()
    }

    fn service(records: Vec<JobRecord>) -> JobsService {
        JobsService::new(Arc::new(FixedRepo(records)), Arc::new(SiteConfig::default()))
    }

    #[test]
    fn listing_links_preserve_filters() {
        let records = jobs(25);
        let service = service(records.clone());
        let query = ListingQuery::parse(Some("types=Full-time&page=2"), &service.site.listings);
        let view = service.build_listing(&records, &query, NOW);

        assert_eq!(view.jobs.len(), 10);
        assert_eq!(view.range_label, "Showing 11-20 of 25 jobs");
        assert_eq!(
            view.pagination.prev_href.as_deref(),
            Some("/jobs?types=Full-time")
        );
        assert_eq!(
            view.pagination.next_href.as_deref(),
            Some("/jobs?types=Full-time&page=3")
        );
        assert!(view.has_active_filters);
        assert_eq!(view.jobs[0].posted_relative, "11 hours ago");
    }

    #[test]
    fn checked_facets_reflect_query() {
        let mut records = jobs(2);
        records[1].job_type = Some(JobType::Contract);
        let service = service(records.clone());
        let query = ListingQuery::parse(Some("types=Contract"), &service.site.listings);
        let view = service.build_listing(&records, &query, NOW);

        let types = &view.facet_groups[0];
        let contract = types
            .options
            .iter()
            .find(|option| option.value == "Contract")
            .expect("contract option");
        assert!(contract.checked);
        assert_eq!(contract.count, 1);
        assert_eq!(view.total, 1);
    }

    #[test]
    fn empty_listing_reports_no_results() {
        let service = service(Vec::new());
        let query = ListingQuery::new(&service.site.listings);
        let view = service.build_listing(&[], &query, NOW);
        assert!(!view.has_results);
        assert_eq!(view.range_label, "No jobs found");
        assert!(!view.pagination.is_visible());
    }

    #[test]
    fn detail_renders_markdown_and_structured_data() {
        let mut record = job("rec1", "Rust Engineer");
        record.description = "## About\n\nShip **fast**.".to_string();
        record.benefits = Some("- Remote".to_string());
        record.salary = yearly(Some(90_000.0), Some(120_000.0));
        record.posted_date = Some(NOW - Duration::days(2));
        let service = service(vec![record.clone()]);

        let page = service.build_detail(&record, NOW);
        assert_eq!(page.headline, "Rust Engineer at Acme Corp");
        assert_eq!(page.summary, "About Ship fast.");
        assert!(page.view.description_html.contains("<strong>fast</strong>"));
        assert!(page.view.benefits_html.is_some());
        assert!(page.view.requirements_html.is_none());
        assert_eq!(page.view.salary, "$90k-$120k/year");
        assert_eq!(page.view.posted_relative, "2 days ago");
        assert!(page.view.ld_json.is_some());
    }

    #[tokio::test]
    async fn inactive_jobs_are_not_found() {
        let mut record = job("rec1", "Engineer");
        record.status = JobStatus::Inactive;
        let service = service(vec![record]);
        assert!(service.detail_page("rec1").await.expect("lookup").is_none());
        assert!(service.active_jobs().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn repository_failures_surface_as_unavailable() {
        let service = JobsService::new(Arc::new(FailingRepo), Arc::new(SiteConfig::default()));
        let error = match service.listing_view(None).await {
            Ok(_) => panic!("listing should fail"),
            Err(error) => error,
        };
        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn hero_styles_skip_suspicious_values() {
        assert_eq!(
            css_declaration("color", Some("#005450")),
            "color: #005450;"
        );
        assert_eq!(css_declaration("color", Some("red;}</style>")), "");
        assert_eq!(css_declaration("color", None), "");
    }
}
