//! Airtable REST payloads and their normalization into [`JobRecord`]s.

use serde::Deserialize;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::domain::{
    entities::{JobDetails, JobRecord, MAX_SHORT_TEXT_CHARS, truncate_chars},
    languages::normalize_languages,
    salary::{Salary, SalaryUnit, normalize_currency},
    types::{CareerLevel, JobStatus, JobType, RemoteRegion, VisaSponsorship, WorkplaceType},
};

/// One page of `GET /v0/{base}/{table}`.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub records: Vec<AirtableRecord>,
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AirtableRecord {
    pub id: String,
    #[serde(default)]
    pub fields: JobFields,
}

/// Field values as Airtable returns them; every column is optional and loosely typed.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JobFields {
    pub title: Option<String>,
    pub company: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub salary_min: Option<LooseNumber>,
    pub salary_max: Option<LooseNumber>,
    pub salary_currency: Option<String>,
    pub salary_unit: Option<String>,
    pub description: Option<String>,
    pub benefits: Option<String>,
    pub application_requirements: Option<String>,
    pub apply_url: Option<String>,
    pub posted_date: Option<String>,
    pub valid_through: Option<String>,
    pub job_identifier: Option<String>,
    pub job_source_name: Option<String>,
    pub status: Option<String>,
    pub career_level: Option<OneOrMany>,
    pub visa_sponsorship: Option<String>,
    pub featured: Option<LooseBool>,
    pub workplace_type: Option<String>,
    pub remote_region: Option<String>,
    pub timezone_requirements: Option<String>,
    pub workplace_city: Option<String>,
    pub workplace_country: Option<String>,
    pub languages: Option<OneOrMany>,
    pub skills: Option<String>,
    pub qualifications: Option<String>,
    pub education_requirements: Option<String>,
    pub experience_requirements: Option<String>,
    pub industry: Option<String>,
    pub occupational_category: Option<String>,
    pub responsibilities: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn value(&self) -> Option<f64> {
        match self {
            LooseNumber::Number(value) => Some(*value),
            LooseNumber::Text(text) => text.trim().replace(',', "").parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseBool {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl LooseBool {
    fn value(&self) -> bool {
        match self {
            LooseBool::Bool(value) => *value,
            LooseBool::Number(value) => *value != 0,
            LooseBool::Text(text) => matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "1" | "checked"
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

impl AirtableRecord {
    /// Normalize source values into safe defaults; never fails.
    pub fn into_job(self) -> JobRecord {
        let AirtableRecord { id, fields } = self;

        let salary = Salary::new(
            fields.salary_min.as_ref().and_then(LooseNumber::value),
            fields.salary_max.as_ref().and_then(LooseNumber::value),
            normalize_currency(fields.salary_currency.as_deref()),
            SalaryUnit::normalize(fields.salary_unit.as_deref()),
        );

        JobRecord {
            id,
            title: fields.title.map(trimmed).unwrap_or_default(),
            company: fields.company.map(trimmed).unwrap_or_default(),
            job_type: fields
                .job_type
                .as_deref()
                .and_then(|value| JobType::try_from(value).ok()),
            salary,
            description: fields
                .description
                .as_deref()
                .map(normalize_markdown)
                .unwrap_or_default(),
            benefits: short_text(fields.benefits),
            application_requirements: short_text(fields.application_requirements),
            apply_url: non_empty(fields.apply_url),
            posted_date: fields.posted_date.as_deref().and_then(parse_date),
            valid_through: fields.valid_through.as_deref().and_then(parse_date),
            status: JobStatus::normalize(fields.status.as_deref()),
            career_levels: CareerLevel::normalize_list(
                fields.career_level.map(OneOrMany::into_vec).unwrap_or_default(),
            ),
            workplace_type: WorkplaceType::normalize(fields.workplace_type.as_deref()),
            remote_region: fields.remote_region.as_deref().and_then(RemoteRegion::parse),
            workplace_city: non_empty(fields.workplace_city),
            workplace_country: non_empty(fields.workplace_country),
            timezone_requirements: non_empty(fields.timezone_requirements),
            visa_sponsorship: VisaSponsorship::normalize(fields.visa_sponsorship.as_deref()),
            languages: normalize_languages(
                fields.languages.map(OneOrMany::into_vec).unwrap_or_default(),
            ),
            featured: fields.featured.as_ref().is_some_and(LooseBool::value),
            job_identifier: non_empty(fields.job_identifier),
            job_source_name: non_empty(fields.job_source_name),
            details: JobDetails {
                skills: non_empty(fields.skills),
                qualifications: non_empty(fields.qualifications),
                education_requirements: non_empty(fields.education_requirements),
                experience_requirements: non_empty(fields.experience_requirements),
                industry: non_empty(fields.industry),
                occupational_category: non_empty(fields.occupational_category),
                responsibilities: non_empty(fields.responsibilities),
            },
        }
    }
}

fn trimmed(value: String) -> String {
    value.trim().to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(trimmed)
        .filter(|value| !value.is_empty())
}

fn short_text(value: Option<String>) -> Option<String> {
    non_empty(value).map(|text| truncate_chars(&text, MAX_SHORT_TEXT_CHARS).trim_end().to_string())
}

/// Unify line endings and trim trailing whitespace on each line.
pub fn normalize_markdown(value: &str) -> String {
    value
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM` and plain `YYYY-MM-DD` dates (as UTC midnight).
pub fn parse_date(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(parsed);
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    ) {
        return Some(parsed.assume_utc());
    }
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    fn record(fields: serde_json::Value) -> JobRecord {
        let raw = json!({ "id": "recABC", "fields": fields });
        serde_json::from_value::<AirtableRecord>(raw)
            .expect("record")
            .into_job()
    }

    #[test]
    fn full_record_normalizes() {
        let job = record(json!({
            "title": " Senior Rust Engineer ",
            "company": "Acme Corp",
            "type": "Full-time",
            "salary_min": 90000,
            "salary_max": "120,000",
            "salary_currency": "EUR (Euro)",
            "salary_unit": "year",
            "description": "Line one  \r\nLine two",
            "posted_date": "2024-12-10",
            "status": "active",
            "career_level": ["Senior", "Lead"],
            "visa_sponsorship": "yes",
            "featured": true,
            "workplace_type": "Remote",
            "remote_region": "Europe Only",
            "languages": ["English (en)", "de"],
        }));

        assert_eq!(job.title, "Senior Rust Engineer");
        assert_eq!(job.job_type, Some(JobType::FullTime));
        let salary = job.salary.clone().expect("salary");
        assert_eq!(salary.min, Some(90_000.0));
        assert_eq!(salary.max, Some(120_000.0));
        assert_eq!(salary.currency, "EUR");
        assert_eq!(job.description, "Line one\nLine two");
        assert_eq!(job.posted_date, Some(datetime!(2024-12-10 00:00 UTC)));
        assert!(job.is_active());
        assert_eq!(job.career_levels, vec![CareerLevel::Senior, CareerLevel::Lead]);
        assert_eq!(job.visa_sponsorship, VisaSponsorship::Yes);
        assert!(job.featured);
        assert_eq!(job.remote_region, Some(RemoteRegion::EuropeOnly));
        assert_eq!(job.languages, vec!["en".to_string(), "de".to_string()]);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let job = record(json!({ "title": "Engineer", "type": "Wizard" }));
        assert_eq!(job.job_type, None);
        assert!(job.salary.is_none());
        assert_eq!(job.status, JobStatus::Inactive);
        assert_eq!(job.career_levels, vec![CareerLevel::NotSpecified]);
        assert_eq!(job.workplace_type, WorkplaceType::NotSpecified);
        assert_eq!(job.visa_sponsorship, VisaSponsorship::NotSpecified);
        assert!(job.languages.is_empty());
        assert!(!job.featured);
    }

    #[test]
    fn long_benefits_are_capped() {
        let job = record(json!({ "benefits": "b".repeat(1500) }));
        assert_eq!(job.benefits.expect("benefits").chars().count(), MAX_SHORT_TEXT_CHARS);
    }

    #[test]
    fn dates_accept_common_shapes() {
        assert_eq!(
            parse_date("2024-12-10T08:30:00.000Z"),
            Some(datetime!(2024-12-10 08:30 UTC))
        );
        assert_eq!(parse_date("2024-12-10T08:30"), Some(datetime!(2024-12-10 08:30 UTC)));
        assert_eq!(parse_date("not a date"), None);
    }
}
