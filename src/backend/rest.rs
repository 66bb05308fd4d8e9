//! PostgREST HTTP client.
//!
//! Thin wrapper over `{base_url}/rest/v1/{table}`. Pure parsing in
//! `parse_rows` and `check_status` for testability.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{BackendError, Filter};
use crate::config::BackendConfig;

const REST_PREFIX: &str = "rest/v1";

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    /// Build a client with the configured request and connect timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), api_key: config.api_key.clone() })
    }

    #[must_use]
    pub fn table_url(&self, table: &str) -> String {
        table_url(&self.base_url, table)
    }

    /// `GET /rest/v1/{table}?select=*&{filters}` and decode the row array.
    pub async fn select<T: DeserializeOwned>(&self, table: &str, filters: &[Filter]) -> Result<Vec<T>, BackendError> {
        let response = self
            .authorized(self.http.get(self.table_url(table)))
            .query(&[("select", "*")])
            .query(filters)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let text = read_body(response).await?;
        parse_rows(&text)
    }

    /// `POST /rest/v1/{table}` with a single JSON row.
    pub async fn insert<T: Serialize + Sync>(&self, table: &str, row: &T) -> Result<(), BackendError> {
        let response = self
            .authorized(self.http.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        read_body(response).await.map(|_| ())
    }

    /// `PATCH /rest/v1/{table}?id=eq.{id}` with a partial JSON row.
    pub async fn update<T: Serialize + Sync>(&self, table: &str, id: i64, patch: &T) -> Result<(), BackendError> {
        let response = self
            .authorized(self.http.patch(self.table_url(table)))
            .query(&[super::eq("id", &id.to_string())])
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        read_body(response).await.map(|_| ())
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }
}

async fn read_body(response: reqwest::Response) -> Result<String, BackendError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| BackendError::Request(e.to_string()))?;
    check_status(status, text)
}

// =============================================================================
// PARSING
// =============================================================================

fn table_url(base_url: &str, table: &str) -> String {
    format!("{}/{REST_PREFIX}/{table}", base_url.trim_end_matches('/'))
}

fn check_status(status: u16, body: String) -> Result<String, BackendError> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(BackendError::Response { status, body })
    }
}

fn parse_rows<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, BackendError> {
    serde_json::from_str(json).map_err(|e| BackendError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "rest_test.rs"]
mod tests;
