use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain_dispatch::{
    model::{
        entity::{TechnicianId, WorkOrderId},
        vo::{TechnicianRecord, WorkOrderRecord},
    },
    repository::{TechnicianSnapshotRepo, WorkOrderAssignmentRepo, WorkOrderSnapshotRepo},
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::json;
use typed_builder::TypedBuilder;
use url::Url;

use crate::infrastructure::config::StoreConfig;

/// Client for a PostgREST-style hosted table API.
#[derive(TypedBuilder)]
pub struct RestRepo {
    client: Arc<reqwest::Client>,
    base_url: Url,
}

/// Client carrying the api key on every request.
pub fn build_http_client(config: &StoreConfig) -> anyhow::Result<Arc<reqwest::Client>> {
    let mut headers = HeaderMap::new();
    if !config.api_key().is_empty() {
        let mut key = HeaderValue::from_str(config.api_key()).context("Invalid api key")?;
        key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
    }
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(*config.timeout_secs()))
        .build()?;
    Ok(Arc::new(client))
}

/// Parses the configured base url, making sure joins land under it.
pub fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).with_context(|| format!("Invalid data store url: {raw}"))
}

impl RestRepo {
    fn table(&self, table: &str) -> anyhow::Result<Url> {
        Ok(self.base_url.join(table)?)
    }

    fn work_order_url(&self, id: &WorkOrderId) -> anyhow::Result<Url> {
        let mut url = self.table("work_orders")?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        Ok(url)
    }

    async fn get_all<T: DeserializeOwned>(&self, table: &str) -> anyhow::Result<Vec<T>> {
        let mut url = self.table(table)?;
        url.query_pairs_mut().append_pair("select", "*");
        let response = self.client.get(url).send().await?.error_for_status()?;
        response
            .json()
            .await
            .with_context(|| format!("Unexpected {table} payload"))
    }

    async fn patch(&self, id: &WorkOrderId, body: serde_json::Value) -> anyhow::Result<()> {
        let response = self
            .client
            .patch(self.work_order_url(id)?)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let updated: Vec<serde_json::Value> = response.json().await?;
        if updated.is_empty() {
            return Err(anyhow!("Work order {id} does not exist in the data store"));
        }
        Ok(())
    }
}

#[async_trait]
impl WorkOrderAssignmentRepo for RestRepo {
    async fn assign(
        &self,
        work_order_id: &WorkOrderId,
        technician_id: &TechnicianId,
        date: NaiveDate,
    ) -> anyhow::Result<()> {
        self.patch(
            work_order_id,
            json!({
                "technician_id": technician_id,
                "scheduled_date": date.format("%Y-%m-%d").to_string(),
            }),
        )
        .await
    }

    async fn unassign(&self, work_order_id: &WorkOrderId) -> anyhow::Result<()> {
        self.patch(
            work_order_id,
            json!({
                "technician_id": null,
                "scheduled_date": null,
            }),
        )
        .await
    }
}

#[async_trait]
impl WorkOrderSnapshotRepo for RestRepo {
    async fn fetch_all(&self) -> anyhow::Result<Vec<WorkOrderRecord>> {
        self.get_all("work_orders").await
    }
}

#[async_trait]
impl TechnicianSnapshotRepo for RestRepo {
    async fn fetch_all(&self) -> anyhow::Result<Vec<TechnicianRecord>> {
        self.get_all("technicians").await
    }
}
