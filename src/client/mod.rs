use crate::config::WorkflowConfig;
use crate::domain::{AssignmentPayload, DeadlineTriggerPayload, EmployeeRecord};
use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use url::Url;

#[derive(Clone)]
pub struct WorkflowClient {
    client: Client,

    pub read_url: String,
    pub update_url: String,
    pub deadline_workflow_url: String,
}

#[derive(Debug, Deserialize)]
struct ReadResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

// ==================================================
// CONSTRUCTOR
// ==================================================

impl WorkflowClient {
    pub fn new(config: &WorkflowConfig, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("HTTP client");

        Self {
            client,
            read_url: config.read_url.clone(),
            update_url: config.update_url.clone(),
            deadline_workflow_url: config.deadline_workflow_url.clone(),
        }
    }

    // ==================================================
    // READ ENDPOINT
    // ==================================================

    /// Fetches every record the read endpoint serves. Records that do not
    /// decode are skipped, not fatal — a half-broken roster still renders.
    pub async fn fetch_employees(&self) -> Result<Vec<EmployeeRecord>> {
        let url = self.cache_busted_read_url();

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body: ReadResponse = response
            .json()
            .await
            .context("decoding employee list body")?;

        let mut records = Vec::with_capacity(body.data.len());
        for value in body.data {
            match serde_json::from_value::<EmployeeRecord>(value) {
                Ok(record) => records.push(record),
                Err(e) => debug!("skipping malformed record: {}", e),
            }
        }

        Ok(records)
    }

    pub async fn fetch_employee(&self, email: &str) -> Result<Option<EmployeeRecord>> {
        let all = self.fetch_employees().await?;
        Ok(all.into_iter().find(|r| r.email == email))
    }

    // The endpoint sits behind a cache that replays stale GET bodies;
    // a throwaway `_t` parameter forces a fresh read.
    fn cache_busted_read_url(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        match Url::parse(&self.read_url) {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("_t", &millis.to_string());
                url.into()
            }
            Err(_) => format!("{}?_t={}", self.read_url, millis),
        }
    }

    // ==================================================
    // WRITE ENDPOINT
    // ==================================================

    pub async fn assign_task(&self, payload: &AssignmentPayload) -> Result<()> {
        let response = self
            .client
            .put(&self.update_url)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Task update failed ({}): {}", status, extract_error_message(&body));
        }

        Ok(())
    }

    // ==================================================
    // DEADLINE WORKFLOW TRIGGER
    // ==================================================

    pub async fn trigger_deadline_workflow(&self, payload: &DeadlineTriggerPayload) -> Result<()> {
        self.client
            .post(&self.deadline_workflow_url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

// The service has no structured error schema; `error.message` is the only
// field worth surfacing when it is present.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(String::from)
        })
        .unwrap_or_else(|| "Check format".to_string())
}
