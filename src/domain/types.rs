//! Closed enumerations a job record normalizes into.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Freelance,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Freelance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Freelance => "Freelance",
        }
    }

    /// Value used by schema.org `employmentType`.
    pub fn schema_employment_type(self) -> &'static str {
        match self {
            JobType::FullTime => "FULL_TIME",
            JobType::PartTime => "PART_TIME",
            JobType::Contract => "CONTRACTOR",
            JobType::Freelance => "TEMPORARY",
        }
    }
}

impl TryFrom<&str> for JobType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        JobType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CareerLevel {
    Internship,
    EntryLevel,
    Associate,
    Junior,
    MidLevel,
    Senior,
    Staff,
    Principal,
    Lead,
    Manager,
    SeniorManager,
    Director,
    SeniorDirector,
    VP,
    SVP,
    EVP,
    CLevel,
    Founder,
    NotSpecified,
}

impl CareerLevel {
    pub const ALL: [CareerLevel; 19] = [
        CareerLevel::Internship,
        CareerLevel::EntryLevel,
        CareerLevel::Associate,
        CareerLevel::Junior,
        CareerLevel::MidLevel,
        CareerLevel::Senior,
        CareerLevel::Staff,
        CareerLevel::Principal,
        CareerLevel::Lead,
        CareerLevel::Manager,
        CareerLevel::SeniorManager,
        CareerLevel::Director,
        CareerLevel::SeniorDirector,
        CareerLevel::VP,
        CareerLevel::SVP,
        CareerLevel::EVP,
        CareerLevel::CLevel,
        CareerLevel::Founder,
        CareerLevel::NotSpecified,
    ];

    /// Identifier used in query strings and as the Airtable value with spaces removed.
    pub fn as_str(self) -> &'static str {
        match self {
            CareerLevel::Internship => "Internship",
            CareerLevel::EntryLevel => "EntryLevel",
            CareerLevel::Associate => "Associate",
            CareerLevel::Junior => "Junior",
            CareerLevel::MidLevel => "MidLevel",
            CareerLevel::Senior => "Senior",
            CareerLevel::Staff => "Staff",
            CareerLevel::Principal => "Principal",
            CareerLevel::Lead => "Lead",
            CareerLevel::Manager => "Manager",
            CareerLevel::SeniorManager => "SeniorManager",
            CareerLevel::Director => "Director",
            CareerLevel::SeniorDirector => "SeniorDirector",
            CareerLevel::VP => "VP",
            CareerLevel::SVP => "SVP",
            CareerLevel::EVP => "EVP",
            CareerLevel::CLevel => "CLevel",
            CareerLevel::Founder => "Founder",
            CareerLevel::NotSpecified => "NotSpecified",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CareerLevel::Internship => "Internship",
            CareerLevel::EntryLevel => "Entry Level",
            CareerLevel::Associate => "Associate",
            CareerLevel::Junior => "Junior",
            CareerLevel::MidLevel => "Mid Level",
            CareerLevel::Senior => "Senior",
            CareerLevel::Staff => "Staff",
            CareerLevel::Principal => "Principal",
            CareerLevel::Lead => "Lead",
            CareerLevel::Manager => "Manager",
            CareerLevel::SeniorManager => "Senior Manager",
            CareerLevel::Director => "Director",
            CareerLevel::SeniorDirector => "Senior Director",
            CareerLevel::VP => "VP",
            CareerLevel::SVP => "SVP",
            CareerLevel::EVP => "EVP",
            CareerLevel::CLevel => "C-Level",
            CareerLevel::Founder => "Founder",
            CareerLevel::NotSpecified => "Not Specified",
        }
    }

    /// Parse a source value, ignoring whitespace and case (`"Entry Level"` → `EntryLevel`).
    pub fn parse(value: &str) -> Option<Self> {
        let compact: String = value
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '-')
            .collect();
        if compact.is_empty() {
            return None;
        }
        CareerLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(&compact))
    }

    /// Normalize a list of source values; the result is never empty.
    pub fn normalize_list<I, S>(values: I) -> Vec<CareerLevel>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut levels = Vec::new();
        for value in values {
            if let Some(level) = CareerLevel::parse(value.as_ref())
                && !levels.contains(&level)
            {
                levels.push(level);
            }
        }

        if levels.len() > 1 {
            levels.retain(|level| *level != CareerLevel::NotSpecified);
        }
        if levels.is_empty() {
            levels.push(CareerLevel::NotSpecified);
        }
        levels
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkplaceType {
    #[serde(rename = "On-site")]
    OnSite,
    Hybrid,
    Remote,
    #[serde(rename = "Not specified")]
    NotSpecified,
}

impl WorkplaceType {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkplaceType::OnSite => "On-site",
            WorkplaceType::Hybrid => "Hybrid",
            WorkplaceType::Remote => "Remote",
            WorkplaceType::NotSpecified => "Not specified",
        }
    }

    pub fn normalize(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim) else {
            return WorkplaceType::NotSpecified;
        };
        if value.eq_ignore_ascii_case("on-site") || value.eq_ignore_ascii_case("onsite") {
            WorkplaceType::OnSite
        } else if value.eq_ignore_ascii_case("hybrid") {
            WorkplaceType::Hybrid
        } else if value.eq_ignore_ascii_case("remote") {
            WorkplaceType::Remote
        } else {
            WorkplaceType::NotSpecified
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteRegion {
    Worldwide,
    #[serde(rename = "Americas Only")]
    AmericasOnly,
    #[serde(rename = "Europe Only")]
    EuropeOnly,
    #[serde(rename = "Asia-Pacific Only")]
    AsiaPacificOnly,
    #[serde(rename = "US Only")]
    UsOnly,
    #[serde(rename = "EU Only")]
    EuOnly,
    #[serde(rename = "UK/EU Only")]
    UkEuOnly,
    #[serde(rename = "US/Canada Only")]
    UsCanadaOnly,
}

impl RemoteRegion {
    pub const ALL: [RemoteRegion; 8] = [
        RemoteRegion::Worldwide,
        RemoteRegion::AmericasOnly,
        RemoteRegion::EuropeOnly,
        RemoteRegion::AsiaPacificOnly,
        RemoteRegion::UsOnly,
        RemoteRegion::EuOnly,
        RemoteRegion::UkEuOnly,
        RemoteRegion::UsCanadaOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RemoteRegion::Worldwide => "Worldwide",
            RemoteRegion::AmericasOnly => "Americas Only",
            RemoteRegion::EuropeOnly => "Europe Only",
            RemoteRegion::AsiaPacificOnly => "Asia-Pacific Only",
            RemoteRegion::UsOnly => "US Only",
            RemoteRegion::EuOnly => "EU Only",
            RemoteRegion::UkEuOnly => "UK/EU Only",
            RemoteRegion::UsCanadaOnly => "US/Canada Only",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        RemoteRegion::ALL
            .into_iter()
            .find(|region| region.as_str().eq_ignore_ascii_case(trimmed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisaSponsorship {
    Yes,
    No,
    #[serde(rename = "Not specified")]
    NotSpecified,
}

impl VisaSponsorship {
    pub fn as_str(self) -> &'static str {
        match self {
            VisaSponsorship::Yes => "Yes",
            VisaSponsorship::No => "No",
            VisaSponsorship::NotSpecified => "Not specified",
        }
    }

    pub fn normalize(value: Option<&str>) -> Self {
        match value.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
            Some("yes") => VisaSponsorship::Yes,
            Some("no") => VisaSponsorship::No,
            _ => VisaSponsorship::NotSpecified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Active,
    Inactive,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Inactive => "inactive",
        }
    }

    /// Anything other than an explicit `active` is treated as inactive.
    pub fn normalize(value: Option<&str>) -> Self {
        match value {
            Some(raw) if raw.trim().eq_ignore_ascii_case("active") => JobStatus::Active,
            _ => JobStatus::Inactive,
        }
    }
}

/// Total orders offered by the listing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSort {
    #[default]
    Newest,
    Oldest,
    Salary,
}

impl JobSort {
    pub const ALL: [JobSort; 3] = [JobSort::Newest, JobSort::Oldest, JobSort::Salary];

    pub fn as_str(self) -> &'static str {
        match self {
            JobSort::Newest => "newest",
            JobSort::Oldest => "oldest",
            JobSort::Salary => "salary",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JobSort::Newest => "Newest first",
            JobSort::Oldest => "Oldest first",
            JobSort::Salary => "Highest salary",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        JobSort::ALL
            .into_iter()
            .find(|sort| sort.as_str().eq_ignore_ascii_case(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn career_levels_ignore_spacing_and_case() {
        assert_eq!(CareerLevel::parse("Entry Level"), Some(CareerLevel::EntryLevel));
        assert_eq!(CareerLevel::parse("midlevel"), Some(CareerLevel::MidLevel));
        assert_eq!(CareerLevel::parse("C-Level"), Some(CareerLevel::CLevel));
        assert_eq!(CareerLevel::parse("  "), None);
        assert_eq!(CareerLevel::parse("Wizard"), None);
    }

    #[test]
    fn career_level_list_is_never_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(
            CareerLevel::normalize_list(empty),
            vec![CareerLevel::NotSpecified]
        );
        assert_eq!(
            CareerLevel::normalize_list(["Wizard", ""]),
            vec![CareerLevel::NotSpecified]
        );
        assert_eq!(
            CareerLevel::normalize_list(["Senior", "NotSpecified", "Senior", "Lead"]),
            vec![CareerLevel::Senior, CareerLevel::Lead]
        );
    }

    #[test]
    fn visa_and_workplace_fall_back_to_not_specified() {
        assert_eq!(VisaSponsorship::normalize(Some(" YES ")), VisaSponsorship::Yes);
        assert_eq!(VisaSponsorship::normalize(Some("no")), VisaSponsorship::No);
        assert_eq!(
            VisaSponsorship::normalize(Some("maybe")),
            VisaSponsorship::NotSpecified
        );
        assert_eq!(VisaSponsorship::normalize(None), VisaSponsorship::NotSpecified);

        assert_eq!(WorkplaceType::normalize(Some("Remote")), WorkplaceType::Remote);
        assert_eq!(WorkplaceType::normalize(Some("On-site")), WorkplaceType::OnSite);
        assert_eq!(
            WorkplaceType::normalize(Some("anywhere")),
            WorkplaceType::NotSpecified
        );
    }

    #[test]
    fn job_type_parses_display_values() {
        assert_eq!(JobType::try_from("full-time"), Ok(JobType::FullTime));
        assert_eq!(JobType::try_from("Contract"), Ok(JobType::Contract));
        assert_eq!(JobType::try_from("Gig"), Err(()));
    }
}
