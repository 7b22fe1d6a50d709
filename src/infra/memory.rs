//! In-memory [`JobsRepo`] backed by a fixed record set, loaded from an Airtable JSON export.

use std::{cmp::Reverse, path::Path};

use async_trait::async_trait;

use crate::{
    application::repos::{JobsRepo, RepoError},
    domain::entities::JobRecord,
    infra::airtable::records::{AirtableRecord, ListResponse},
};

#[derive(Debug, Clone, Default)]
pub struct MemoryJobsRepo {
    jobs: Vec<JobRecord>,
}

impl MemoryJobsRepo {
    pub fn new(jobs: Vec<JobRecord>) -> Self {
        Self { jobs }
    }

    /// Accepts either a list response (`{"records": [...]}`) or a bare array of records.
    pub fn from_airtable_json(raw: &str) -> Result<Self, RepoError> {
        let records: Vec<AirtableRecord> = match serde_json::from_str::<ListResponse>(raw) {
            Ok(response) => response.records,
            Err(_) => serde_json::from_str(raw).map_err(RepoError::decode)?,
        };
        Ok(Self::new(
            records.into_iter().map(AirtableRecord::into_job).collect(),
        ))
    }

    pub async fn from_fixture_file(path: &Path) -> Result<Self, RepoError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
            RepoError::Configuration(format!("failed to read `{}`: {err}", path.display()))
        })?;
        Self::from_airtable_json(&raw)
    }
}

#[async_trait]
impl JobsRepo for MemoryJobsRepo {
    async fn list_active_jobs(&self) -> Result<Vec<JobRecord>, RepoError> {
        let mut jobs: Vec<JobRecord> = self
            .jobs
            .iter()
            .filter(|job| job.is_active())
            .cloned()
            .collect();
        jobs.sort_by_key(|job| Reverse(job.posted_date));
        Ok(jobs)
    }

    async fn find_active_job(&self, id: &str) -> Result<Option<JobRecord>, RepoError> {
        Ok(self
            .jobs
            .iter()
            .find(|job| job.id == id && job.is_active())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "records": [
            {"id": "rec1", "fields": {"title": "Older", "status": "active", "posted_date": "2024-12-01"}},
            {"id": "rec2", "fields": {"title": "Hidden", "status": "inactive", "posted_date": "2024-12-05"}},
            {"id": "rec3", "fields": {"title": "Newer", "status": "active", "posted_date": "2024-12-09"}}
        ]
    }"#;

    #[tokio::test]
    async fn lists_active_jobs_newest_first() {
        let repo = MemoryJobsRepo::from_airtable_json(FIXTURE).expect("fixture");
        let titles: Vec<_> = repo
            .list_active_jobs()
            .await
            .expect("list")
            .into_iter()
            .map(|job| job.title)
            .collect();
        assert_eq!(titles, ["Newer", "Older"]);
    }

    #[tokio::test]
    async fn inactive_records_are_not_found() {
        let repo = MemoryJobsRepo::from_airtable_json(FIXTURE).expect("fixture");
        assert!(repo.find_active_job("rec2").await.expect("find").is_none());
        assert!(repo.find_active_job("rec3").await.expect("find").is_some());
        assert!(repo.find_active_job("missing").await.expect("find").is_none());
    }

    #[test]
    fn bare_arrays_are_accepted() {
        let repo = MemoryJobsRepo::from_airtable_json(r#"[{"id": "rec9", "fields": {}}]"#)
            .expect("array");
        assert_eq!(repo.jobs.len(), 1);
    }
}
