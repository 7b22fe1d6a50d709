//! Job postings as normalized from the external data source.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::{
    languages::language_name,
    salary::Salary,
    types::{CareerLevel, JobStatus, JobType, RemoteRegion, VisaSponsorship, WorkplaceType},
};

/// Longest benefits / application-requirements text kept on a record.
pub const MAX_SHORT_TEXT_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub company: String,
    pub job_type: Option<JobType>,
    pub salary: Option<Salary>,
    pub description: String,
    pub benefits: Option<String>,
    pub application_requirements: Option<String>,
    pub apply_url: Option<String>,
    pub posted_date: Option<OffsetDateTime>,
    pub valid_through: Option<OffsetDateTime>,
    pub status: JobStatus,
    pub career_levels: Vec<CareerLevel>,
    pub workplace_type: WorkplaceType,
    pub remote_region: Option<RemoteRegion>,
    pub workplace_city: Option<String>,
    pub workplace_country: Option<String>,
    pub timezone_requirements: Option<String>,
    pub visa_sponsorship: VisaSponsorship,
    pub languages: Vec<String>,
    pub featured: bool,
    pub job_identifier: Option<String>,
    pub job_source_name: Option<String>,
    pub details: JobDetails,
}

/// Optional descriptive fields surfaced on the detail page and in structured data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobDetails {
    pub skills: Option<String>,
    pub qualifications: Option<String>,
    pub education_requirements: Option<String>,
    pub experience_requirements: Option<String>,
    pub industry: Option<String>,
    pub occupational_category: Option<String>,
    pub responsibilities: Option<String>,
}

impl JobRecord {
    pub fn is_active(&self) -> bool {
        self.status == JobStatus::Active
    }

    pub fn is_remote(&self) -> bool {
        self.workplace_type == WorkplaceType::Remote
    }

    /// Location line shown on cards: remote region for remote roles, city/country otherwise.
    pub fn location_label(&self) -> String {
        let place = [
            self.workplace_city.as_deref(),
            self.workplace_country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        match self.workplace_type {
            WorkplaceType::Remote => match self.remote_region {
                Some(region) => format!("Remote ({})", region.as_str()),
                None => "Remote".to_string(),
            },
            WorkplaceType::Hybrid if !place.is_empty() => format!("Hybrid - {place}"),
            _ if !place.is_empty() => place,
            other => other.as_str().to_string(),
        }
    }

    /// Lowercased text searched by free-text queries.
    pub fn search_haystack(&self) -> String {
        let mut haystack = String::with_capacity(self.title.len() + self.company.len() + 32);
        for part in [
            Some(self.title.as_str()),
            Some(self.company.as_str()),
            self.workplace_city.as_deref(),
            self.workplace_country.as_deref(),
            self.remote_region.map(RemoteRegion::as_str),
        ]
        .into_iter()
        .flatten()
        {
            haystack.push_str(&part.to_lowercase());
            haystack.push('\n');
        }
        haystack
    }

    pub fn language_names(&self) -> Vec<&'static str> {
        self.languages
            .iter()
            .filter_map(|code| language_name(code))
            .collect()
    }

    /// Title used for feeds and social previews.
    pub fn headline(&self) -> String {
        format!("{} at {}", self.title, self.company)
    }
}

/// Truncate to a character count without splitting a code point.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((index, _)) => value[..index].to_string(),
        None => value.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::job;
    use super::*;

    #[test]
    fn location_label_prefers_remote_region() {
        let mut record = job("rec1", "Engineer");
        record.workplace_type = WorkplaceType::Remote;
        record.remote_region = Some(RemoteRegion::EuropeOnly);
        assert_eq!(record.location_label(), "Remote (Europe Only)");

        record.workplace_type = WorkplaceType::OnSite;
        record.workplace_city = Some("Berlin".to_string());
        record.workplace_country = Some("Germany".to_string());
        assert_eq!(record.location_label(), "Berlin, Germany");

        record.workplace_city = None;
        record.workplace_country = None;
        assert_eq!(record.location_label(), "On-site");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
