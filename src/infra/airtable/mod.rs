//! Airtable REST adapter for [`JobsRepo`].

pub mod records;

use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::{
    application::repos::{JobsRepo, RepoError},
    config::AirtableSettings,
    domain::entities::JobRecord,
    infra::error::InfraError,
};

use records::{AirtableRecord, ListResponse};

const ACTIVE_FORMULA: &str = "{status} = 'active'";

#[derive(Clone)]
pub struct AirtableJobsRepo {
    client: Client,
    table_url: Url,
    access_token: String,
}

impl AirtableJobsRepo {
    pub fn new(settings: &AirtableSettings, user_agent: &str) -> Result<Self, InfraError> {
        let base_id = settings
            .base_id
            .as_deref()
            .ok_or_else(|| InfraError::missing("airtable.base_id"))?;
        let access_token = settings
            .access_token
            .clone()
            .ok_or_else(|| InfraError::missing("airtable.access_token"))?;

        let mut table_url = settings.endpoint.clone();
        table_url
            .path_segments_mut()
            .map_err(|()| InfraError::invalid("airtable.endpoint", "cannot be a base URL"))?
            .pop_if_empty()
            .extend(["v0", base_id, settings.table_name.as_str()]);

        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;

        Ok(Self {
            client,
            table_url,
            access_token,
        })
    }

    fn record_url(&self, id: &str) -> Url {
        let mut url = self.table_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    async fn fetch_page(&self, offset: Option<&str>) -> Result<ListResponse, RepoError> {
        let mut url = self.table_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("filterByFormula", ACTIVE_FORMULA)
                .append_pair("sort[0][field]", "posted_date")
                .append_pair("sort[0][direction]", "desc");
            if let Some(offset) = offset {
                query.append_pair("offset", offset);
            }
        }

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(RepoError::transport)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(RepoError::transport)?;
        if !status.is_success() {
            return Err(RepoError::Upstream {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        serde_json::from_slice(&bytes).map_err(RepoError::decode)
    }

    async fn list_all(&self) -> Result<Vec<JobRecord>, RepoError> {
        let mut jobs = Vec::new();
        let mut offset: Option<String> = None;
        loop {
            let page = self.fetch_page(offset.as_deref()).await?;
            jobs.extend(page.records.into_iter().map(AirtableRecord::into_job));
            match page.offset {
                Some(next) if !next.is_empty() => offset = Some(next),
                _ => break,
            }
        }
        Ok(jobs)
    }

    async fn find(&self, id: &str) -> Result<Option<JobRecord>, RepoError> {
        let response = self
            .client
            .get(self.record_url(id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(RepoError::transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::UNPROCESSABLE_ENTITY {
            debug!(target = "bordful::infra::airtable", id, status = status.as_u16(), "record not found");
            return Ok(None);
        }

        let bytes = response.bytes().await.map_err(RepoError::transport)?;
        if !status.is_success() {
            return Err(RepoError::Upstream {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        let record: AirtableRecord = serde_json::from_slice(&bytes).map_err(RepoError::decode)?;
        Ok(Some(record.into_job()).filter(JobRecord::is_active))
    }
}

fn observe<T>(operation: &'static str, started: Instant, result: &Result<T, RepoError>) {
    let outcome = if result.is_ok() { "ok" } else { "error" };
    counter!("bordful_jobs_fetch_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
    histogram!("bordful_jobs_fetch_ms", "operation" => operation)
        .record(started.elapsed().as_secs_f64() * 1000.0);
    if let Err(err) = result {
        warn!(target = "bordful::infra::airtable", operation, error = %err, "airtable request failed");
    }
}

#[async_trait]
impl JobsRepo for AirtableJobsRepo {
    async fn list_active_jobs(&self) -> Result<Vec<JobRecord>, RepoError> {
        let started = Instant::now();
        let result = self.list_all().await;
        observe("list", started, &result);
        result
    }

    async fn find_active_job(&self, id: &str) -> Result<Option<JobRecord>, RepoError> {
        let started = Instant::now();
        let result = self.find(id).await;
        observe("find", started, &result);
        result
    }
}
