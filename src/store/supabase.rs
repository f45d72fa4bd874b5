//! Supabase (PostgREST) storage backend.
//!
//! Talks to the managed REST surface at `{url}/rest/v1/{table}`. The service
//! role key is sent both as `apikey` and as a bearer token, which is what the
//! official clients do for server-side access.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use super::{SimulationStore, StoreError};
use crate::config::StorageConfig;
use crate::model::{NewSimulation, SimulationSummary, Subject};

/// REST client for the simulations table.
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

/// PostgREST returns representation rows as a JSON array even for single inserts.
#[derive(Deserialize)]
struct InsertedRow {
    id: Uuid,
}

#[derive(Deserialize)]
struct HtmlRow {
    html_content: String,
}

impl SupabaseStore {
    pub fn new(cfg: &StorageConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: cfg.supabase_url.trim_end_matches('/').to_string(),
            api_key: cfg.service_role_key.clone(),
            table: cfg.table.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait::async_trait]
impl SimulationStore for SupabaseStore {
    async fn insert(&self, sim: NewSimulation) -> Result<Uuid, StoreError> {
        let response = self
            .authed(self.client.post(self.table_url()))
            .query(&[("select", "id")])
            .header("Prefer", "return=representation")
            .json(&sim)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StoreError::UnexpectedResponse(format!(
                "insert returned {status}: {detail}"
            )));
        }

        let rows: Vec<InsertedRow> = response.json().await?;
        rows.into_iter()
            .next()
            .map(|row| row.id)
            .ok_or_else(|| {
                StoreError::UnexpectedResponse("insert returned no representation row".to_string())
            })
    }

    async fn fetch_html(&self, id: Uuid) -> Result<String, StoreError> {
        let id_filter = format!("eq.{id}");
        let response = self
            .authed(self.client.get(self.table_url()))
            .query(&[("select", "html_content"), ("id", id_filter.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StoreError::UnexpectedResponse(format!(
                "select returned {status}: {detail}"
            )));
        }

        let rows: Vec<HtmlRow> = response.json().await?;
        rows.into_iter()
            .next()
            .map(|row| row.html_content)
            .ok_or(StoreError::NotFound)
    }

    async fn list_by_subject(
        &self,
        subject: Subject,
    ) -> Result<Vec<SimulationSummary>, StoreError> {
        let subject_filter = format!("eq.{subject}");
        let response = self
            .authed(self.client.get(self.table_url()))
            .query(&[
                ("select", "id,chapter,html_content"),
                ("subject", subject_filter.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StoreError::UnexpectedResponse(format!(
                "select returned {status}: {detail}"
            )));
        }

        Ok(response.json().await?)
    }
}
