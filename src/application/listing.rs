//! Search, facet filtering, ordering and page slicing over a fetched job collection.

use std::{cmp::Ordering, collections::BTreeSet};

use url::form_urlencoded;

use crate::{
    config::ListingSettings,
    domain::{
        entities::JobRecord,
        languages::{language_name, normalize_language},
        salary::SalaryBucket,
        types::{CareerLevel, JobSort, JobType, VisaSponsorship, WorkplaceType},
    },
};

/// Facet selections plus the free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub job_types: BTreeSet<JobType>,
    pub career_levels: BTreeSet<CareerLevel>,
    pub remote_only: bool,
    pub salary_buckets: BTreeSet<SalaryBucket>,
    pub visa_required: bool,
    pub languages: BTreeSet<String>,
    pub query: String,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.job_types.is_empty()
            && self.career_levels.is_empty()
            && !self.remote_only
            && self.salary_buckets.is_empty()
            && !self.visa_required
            && self.languages.is_empty()
            && self.query.trim().is_empty()
    }

    fn matches(&self, job: &JobRecord) -> bool {
        if !self.job_types.is_empty()
            && !job
                .job_type
                .is_some_and(|kind| self.job_types.contains(&kind))
        {
            return false;
        }
        if !self.career_levels.is_empty()
            && !job
                .career_levels
                .iter()
                .any(|level| self.career_levels.contains(level))
        {
            return false;
        }
        if self.remote_only && job.workplace_type != WorkplaceType::Remote {
            return false;
        }
        if self.visa_required && job.visa_sponsorship != VisaSponsorship::Yes {
            return false;
        }
        if !self.languages.is_empty()
            && !job
                .languages
                .iter()
                .any(|code| self.languages.contains(code))
        {
            return false;
        }
        if !self.salary_buckets.is_empty() {
            let bucket = job.salary.as_ref().and_then(|salary| salary.bucket());
            if !bucket.is_some_and(|bucket| self.salary_buckets.contains(&bucket)) {
                return false;
            }
        }
        true
    }
}

/// Everything a listing request carries in its query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub filters: FilterState,
    pub sort: JobSort,
    pub page: usize,
    pub per_page: usize,
}

impl ListingQuery {
    pub fn new(settings: &ListingSettings) -> Self {
        Self {
            filters: FilterState::default(),
            sort: settings.default_sort,
            page: 1,
            per_page: settings.default_per_page,
        }
    }

    /// Parse a raw query string. Unknown keys and values are ignored; list parameters accept
    /// repeated keys as well as comma separated values.
    pub fn parse(raw: Option<&str>, settings: &ListingSettings) -> Self {
        let mut query = Self::new(settings);
        let Some(raw) = raw else {
            return query;
        };

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let filters = &mut query.filters;
            match key.as_ref() {
                "q" => filters.query = value.trim().to_string(),
                "types" => {
                    for item in split_list(&value) {
                        if let Ok(kind) = JobType::try_from(item) {
                            filters.job_types.insert(kind);
                        }
                    }
                }
                "roles" => {
                    for item in split_list(&value) {
                        if let Some(level) = CareerLevel::parse(item) {
                            filters.career_levels.insert(level);
                        }
                    }
                }
                "salary" => {
                    for item in split_list(&value) {
                        if let Some(bucket) = SalaryBucket::parse(item) {
                            filters.salary_buckets.insert(bucket);
                        }
                    }
                }
                "languages" => {
                    for item in split_list(&value) {
                        if let Some(code) = normalize_language(item) {
                            filters.languages.insert(code.to_string());
                        }
                    }
                }
                "remote" => filters.remote_only = is_truthy(&value),
                "visa" => filters.visa_required = is_truthy(&value),
                "sort" => {
                    if let Some(sort) = JobSort::parse(&value) {
                        query.sort = sort;
                    }
                }
                "page" => {
                    query.page = value.trim().parse::<usize>().unwrap_or(1).max(1);
                }
                "per_page" => {
                    query.per_page = match value.trim().parse::<usize>() {
                        Ok(size) if size > 0 && size <= settings.max_per_page => size,
                        _ => settings.default_per_page,
                    };
                }
                _ => {}
            }
        }
        query
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Canonical query string (without `?`); parameters at their defaults are omitted.
    pub fn to_query_string(&self, settings: &ListingSettings) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        let filters = &self.filters;
        if !filters.query.is_empty() {
            out.append_pair("q", &filters.query);
        }
        if !filters.job_types.is_empty() {
            out.append_pair("types", &join(filters.job_types.iter().map(|kind| kind.as_str())));
        }
        if !filters.career_levels.is_empty() {
            out.append_pair(
                "roles",
                &join(filters.career_levels.iter().map(|level| level.as_str())),
            );
        }
        if filters.remote_only {
            out.append_pair("remote", "true");
        }
        if !filters.salary_buckets.is_empty() {
            out.append_pair(
                "salary",
                &join(filters.salary_buckets.iter().map(|bucket| bucket.as_str())),
            );
        }
        if filters.visa_required {
            out.append_pair("visa", "true");
        }
        if !filters.languages.is_empty() {
            out.append_pair("languages", &join(filters.languages.iter().map(String::as_str)));
        }
        if self.sort != settings.default_sort {
            out.append_pair("sort", self.sort.as_str());
        }
        if self.per_page != settings.default_per_page {
            out.append_pair("per_page", &self.per_page.to_string());
        }
        if self.page > 1 {
            out.append_pair("page", &self.page.to_string());
        }
        out.finish()
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(",")
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCount {
    pub code: String,
    pub name: String,
    pub count: usize,
}

/// Per-value counts over the search-only set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetCounts {
    pub job_types: Vec<(JobType, usize)>,
    pub career_levels: Vec<(CareerLevel, usize)>,
    pub remote: usize,
    pub salary_buckets: Vec<(SalaryBucket, usize)>,
    pub visa: usize,
    pub languages: Vec<LanguageCount>,
}

#[derive(Debug, Clone)]
pub struct ListingOutcome<'a> {
    pub jobs: Vec<&'a JobRecord>,
    /// Matches across all pages.
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub facets: FacetCounts,
}

/// Case-insensitive substring search. An empty query matches everything.
pub fn search<'a>(jobs: &'a [JobRecord], query: &str) -> Vec<&'a JobRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return jobs.iter().collect();
    }
    jobs.iter()
        .filter(|job| job.search_haystack().contains(&needle))
        .collect()
}

pub fn apply_filters<'a>(jobs: &[&'a JobRecord], filters: &FilterState) -> Vec<&'a JobRecord> {
    jobs.iter()
        .copied()
        .filter(|job| filters.matches(job))
        .collect()
}

/// Stable sort; ties keep their incoming order.
pub fn sort_jobs(jobs: &mut [&JobRecord], sort: JobSort) {
    match sort {
        JobSort::Newest => jobs.sort_by(|a, b| compare_posted(b, a)),
        JobSort::Oldest => jobs.sort_by(|a, b| compare_posted(a, b)),
        JobSort::Salary => jobs.sort_by(|a, b| raw_max(b).total_cmp(&raw_max(a))),
    }
}

fn compare_posted(a: &JobRecord, b: &JobRecord) -> Ordering {
    a.posted_date.cmp(&b.posted_date)
}

fn raw_max(job: &JobRecord) -> f64 {
    job.salary
        .as_ref()
        .and_then(|salary| salary.max)
        .unwrap_or(0.0)
}

/// 1-based slice; pages past the end are empty.
pub fn paginate<T: Copy>(items: &[T], page: usize, per_page: usize) -> Vec<T> {
    let per_page = per_page.max(1);
    let start = page.max(1).saturating_sub(1).saturating_mul(per_page);
    items.iter().skip(start).take(per_page).copied().collect()
}

pub fn total_pages(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1)).max(1)
}

pub fn facet_counts(jobs: &[&JobRecord]) -> FacetCounts {
    let job_types = JobType::ALL
        .into_iter()
        .map(|kind| {
            let count = jobs.iter().filter(|job| job.job_type == Some(kind)).count();
            (kind, count)
        })
        .collect();

    let career_levels = CareerLevel::ALL
        .into_iter()
        .filter(|level| *level != CareerLevel::NotSpecified)
        .map(|level| {
            let count = jobs
                .iter()
                .filter(|job| job.career_levels.contains(&level))
                .count();
            (level, count)
        })
        .collect();

    let salary_buckets = SalaryBucket::ALL
        .into_iter()
        .map(|bucket| {
            let count = jobs
                .iter()
                .filter(|job| job.salary.as_ref().and_then(|salary| salary.bucket()) == Some(bucket))
                .count();
            (bucket, count)
        })
        .collect();

    let mut languages: Vec<LanguageCount> = Vec::new();
    for code in jobs.iter().flat_map(|job| job.languages.iter()) {
        match languages.iter_mut().find(|entry| &entry.code == code) {
            Some(entry) => entry.count += 1,
            None => languages.push(LanguageCount {
                code: code.clone(),
                name: language_name(code).map_or_else(|| code.clone(), str::to_string),
                count: 1,
            }),
        }
    }
    languages.sort_by(|a, b| a.name.cmp(&b.name));

    FacetCounts {
        job_types,
        career_levels,
        remote: jobs
            .iter()
            .filter(|job| job.workplace_type == WorkplaceType::Remote)
            .count(),
        salary_buckets,
        visa: jobs
            .iter()
            .filter(|job| job.visa_sponsorship == VisaSponsorship::Yes)
            .count(),
        languages,
    }
}

/// Run search, filters, sort and pagination in that order.
pub fn run_listing<'a>(jobs: &'a [JobRecord], query: &ListingQuery) -> ListingOutcome<'a> {
    let searched = search(jobs, &query.filters.query);
    let facets = facet_counts(&searched);

    let mut matches = apply_filters(&searched, &query.filters);
    sort_jobs(&mut matches, query.sort);

    let total = matches.len();
    let per_page = query.per_page.max(1);
    ListingOutcome {
        jobs: paginate(&matches, query.page, per_page),
        total,
        page: query.page.max(1),
        per_page,
        total_pages: total_pages(total, per_page),
        facets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::fixtures::{job, yearly},
        salary::{Salary, SalaryUnit},
        types::RemoteRegion,
    };
    use time::{Duration, macros::datetime};

    fn settings() -> ListingSettings {
        ListingSettings::default()
    }

    fn numbered(count: usize) -> Vec<JobRecord> {
        let base = datetime!(2024-12-01 00:00 UTC);
        (0..count)
            .map(|index| {
                let mut record = job(&format!("rec{index}"), &format!("Job {index}"));
                // Oldest first in the source; newest sort reverses it.
                record.posted_date = Some(base + Duration::hours(index as i64));
                record
            })
            .collect()
    }

    fn ids(jobs: &[&JobRecord]) -> Vec<String> {
        jobs.iter().map(|job| job.id.clone()).collect()
    }

    #[test]
    fn pages_slice_the_sorted_matches() {
        let jobs = numbered(25);
        let mut query = ListingQuery::new(&settings());
        query.sort = JobSort::Oldest;
        query.per_page = 10;

        let first = run_listing(&jobs, &query.with_page(1));
        assert_eq!(
            ids(&first.jobs),
            (0..10).map(|i| format!("rec{i}")).collect::<Vec<_>>()
        );
        assert_eq!(first.total_pages, 3);

        let third = run_listing(&jobs, &query.with_page(3));
        assert_eq!(
            ids(&third.jobs),
            (20..25).map(|i| format!("rec{i}")).collect::<Vec<_>>()
        );

        let beyond = run_listing(&jobs, &query.with_page(99));
        assert!(beyond.jobs.is_empty());
        assert_eq!(beyond.total, 25);
    }

    #[test]
    fn same_input_gives_same_order() {
        let mut jobs = numbered(12);
        for (index, record) in jobs.iter_mut().enumerate() {
            record.salary = yearly(None, Some(((index % 3) * 10_000) as f64 + 1.0));
        }
        let mut query = ListingQuery::new(&settings());
        query.sort = JobSort::Salary;

        let first = ids(&run_listing(&jobs, &query).jobs);
        let second = ids(&run_listing(&jobs, &query).jobs);
        assert_eq!(first, second);
    }

    #[test]
    fn salary_sort_is_stable_and_puts_missing_last() {
        let mut jobs = numbered(4);
        jobs[0].salary = yearly(Some(10.0), Some(90_000.0));
        jobs[1].salary = None;
        jobs[2].salary = yearly(None, Some(90_000.0));
        jobs[3].salary = yearly(Some(150_000.0), None);

        let mut refs: Vec<&JobRecord> = jobs.iter().collect();
        sort_jobs(&mut refs, JobSort::Salary);
        // rec3 has no max, so it sorts with the missing salary in source order.
        assert_eq!(ids(&refs), vec!["rec0", "rec2", "rec1", "rec3"]);
    }

    #[test]
    fn newest_puts_undated_jobs_last() {
        let mut jobs = numbered(3);
        jobs[1].posted_date = None;
        let mut refs: Vec<&JobRecord> = jobs.iter().collect();
        sort_jobs(&mut refs, JobSort::Newest);
        assert_eq!(ids(&refs), vec!["rec2", "rec0", "rec1"]);
    }

    #[test]
    fn salary_buckets_skip_jobs_without_salary() {
        let mut jobs = numbered(3);
        jobs[0].salary = yearly(Some(50_000.0), None);
        jobs[1].salary = None;
        jobs[2].salary = Salary::new(Some(30.0), None, "USD".into(), SalaryUnit::Hour);

        let unfiltered = run_listing(&jobs, &ListingQuery::new(&settings()));
        assert_eq!(unfiltered.total, 3);

        let mut query = ListingQuery::new(&settings());
        query.filters.salary_buckets.insert(SalaryBucket::From50kTo100k);
        let filtered = run_listing(&jobs, &query);
        // 30/hour annualizes to 62 400.
        let mut found = ids(&filtered.jobs);
        found.sort();
        assert_eq!(found, vec!["rec0", "rec2"]);

        for bucket in SalaryBucket::ALL {
            let mut query = ListingQuery::new(&settings());
            query.filters.salary_buckets.insert(bucket);
            let outcome = run_listing(&jobs, &query);
            assert!(outcome.jobs.iter().all(|job| job.id != "rec1"));
        }
    }

    #[test]
    fn facets_and_within_or_across() {
        let mut jobs = numbered(4);
        jobs[0].job_type = Some(JobType::Contract);
        jobs[0].workplace_type = WorkplaceType::Remote;
        jobs[1].job_type = Some(JobType::Freelance);
        jobs[1].workplace_type = WorkplaceType::Remote;
        jobs[2].job_type = Some(JobType::Contract);
        jobs[3].job_type = None;

        let mut query = ListingQuery::new(&settings());
        query.sort = JobSort::Oldest;
        query.filters.job_types.extend([JobType::Contract, JobType::Freelance]);
        assert_eq!(ids(&run_listing(&jobs, &query).jobs), vec!["rec0", "rec1", "rec2"]);

        query.filters.remote_only = true;
        assert_eq!(ids(&run_listing(&jobs, &query).jobs), vec!["rec0", "rec1"]);
    }

    #[test]
    fn levels_languages_and_visa_filter() {
        let mut jobs = numbered(3);
        jobs[0].career_levels = vec![CareerLevel::Senior, CareerLevel::Lead];
        jobs[0].languages = vec!["de".into(), "en".into()];
        jobs[0].visa_sponsorship = VisaSponsorship::Yes;
        jobs[1].career_levels = vec![CareerLevel::Junior];
        jobs[1].languages = vec!["en".into()];

        let mut query = ListingQuery::new(&settings());
        query.filters.career_levels.insert(CareerLevel::Lead);
        assert_eq!(ids(&run_listing(&jobs, &query).jobs), vec!["rec0"]);

        let mut query = ListingQuery::new(&settings());
        query.sort = JobSort::Oldest;
        query.filters.languages.insert("en".into());
        assert_eq!(ids(&run_listing(&jobs, &query).jobs), vec!["rec0", "rec1"]);

        let mut query = ListingQuery::new(&settings());
        query.filters.visa_required = true;
        assert_eq!(ids(&run_listing(&jobs, &query).jobs), vec!["rec0"]);
    }

    #[test]
    fn search_covers_location_fields() {
        let mut jobs = numbered(3);
        jobs[0].workplace_city = Some("Berlin".into());
        jobs[1].company = "Globex".into();
        jobs[2].remote_region = Some(RemoteRegion::ALL[0]);

        assert_eq!(ids(&search(&jobs, "BERLIN")), vec!["rec0"]);
        assert_eq!(ids(&search(&jobs, "globex")), vec!["rec1"]);
        assert_eq!(search(&jobs, "  ").len(), 3);
    }

    #[test]
    fn facet_counts_use_the_search_only_set() {
        let mut jobs = numbered(3);
        jobs[0].title = "Rust Engineer".into();
        jobs[0].workplace_type = WorkplaceType::Remote;
        jobs[0].career_levels = vec![CareerLevel::NotSpecified];
        jobs[0].languages = vec!["fr".into(), "de".into()];
        jobs[1].title = "Rust Lead".into();
        jobs[1].job_type = Some(JobType::Contract);
        jobs[1].career_levels = vec![CareerLevel::Lead];
        jobs[1].languages = vec!["de".into()];
        jobs[2].title = "Go Engineer".into();
        jobs[2].workplace_type = WorkplaceType::Remote;

        let mut query = ListingQuery::new(&settings());
        query.filters.query = "rust".into();
        query.filters.job_types.insert(JobType::Contract);
        let outcome = run_listing(&jobs, &query);

        assert_eq!(outcome.total, 1);
        let facets = outcome.facets;
        assert_eq!(facets.remote, 1);
        assert!(facets.job_types.contains(&(JobType::FullTime, 1)));
        assert!(facets.job_types.contains(&(JobType::Contract, 1)));
        assert!(facets.career_levels.contains(&(CareerLevel::Lead, 1)));
        assert!(
            facets
                .career_levels
                .iter()
                .all(|(level, _)| *level != CareerLevel::NotSpecified)
        );
        let languages: Vec<(&str, usize)> = facets
            .languages
            .iter()
            .map(|entry| (entry.code.as_str(), entry.count))
            .collect();
        assert_eq!(languages, vec![("fr", 1), ("de", 2)]);
    }

    #[test]
    fn parses_lists_and_ignores_unknown_values() {
        let query = ListingQuery::parse(
            Some("q=rust&types=Contract,Bogus&types=Full-time&roles=Senior&salary=gt-200k&remote=true&languages=en,German&sort=oldest&page=0&per_page=25"),
            &settings(),
        );
        assert_eq!(query.filters.query, "rust");
        assert_eq!(
            query.filters.job_types,
            BTreeSet::from([JobType::FullTime, JobType::Contract])
        );
        assert!(query.filters.career_levels.contains(&CareerLevel::Senior));
        assert!(query.filters.salary_buckets.contains(&SalaryBucket::Over200k));
        assert!(query.filters.remote_only);
        assert!(!query.filters.visa_required);
        assert_eq!(
            query.filters.languages,
            BTreeSet::from(["de".to_string(), "en".to_string()])
        );
        assert_eq!(query.sort, JobSort::Oldest);
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 25);
    }

    #[test]
    fn bad_page_sizes_fall_back_to_default() {
        for raw in ["per_page=0", "per_page=1000", "per_page=abc"] {
            let query = ListingQuery::parse(Some(raw), &settings());
            assert_eq!(query.per_page, 10, "{raw}");
        }
        assert!(ListingQuery::parse(None, &settings()).filters.is_empty());
    }

    #[test]
    fn query_string_round_trips_through_parse() {
        let raw = "q=data+eng&types=Contract&remote=true&sort=salary&page=2";
        let query = ListingQuery::parse(Some(raw), &settings());
        let rendered = query.to_query_string(&settings());
        assert_eq!(rendered, "q=data+eng&types=Contract&remote=true&sort=salary&page=2");
        assert_eq!(ListingQuery::parse(Some(&rendered), &settings()), query);
    }
}
