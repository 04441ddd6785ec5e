// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Main config service client implementation

use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use wopr_config_model::{
    ConfigValue, EnvironmentEntry, HealthReport, HistoryEntry, KeysRequest, SetRequest, ValueType,
    YamlExport, YamlImportRequest, YamlImportResponse,
};

use crate::error::{ConfigClientError, ConfigClientResult};

/// HTTP client for the WOPR config service.
///
/// The base URL is injected at construction; nothing in this type reads
/// the process environment. Status codes outside the success range are
/// reported uniformly as [`ConfigClientError::Status`] carrying the
/// response body text. There is no retry and no backoff — a failed call
/// is reported once.
#[derive(Debug, Clone)]
pub struct ConfigClient {
    http: HttpClient,
    base_url: Url,
}

impl ConfigClient {
    /// Create a new client for the service at `base_url`.
    pub fn new(base_url: Url) -> Self {
        let http = HttpClient::builder()
            .user_agent("wopr-rest-client/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self { http, base_url }
    }

    /// Create a client from a base URL string.
    pub fn from_url(base_url: &str) -> ConfigClientResult<Self> {
        let base_url = Url::parse(base_url)?;
        Ok(Self::new(base_url))
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the whole nested configuration document.
    pub async fn fetch_all(&self, environment: Option<&str>) -> ConfigClientResult<Value> {
        let url = self.endpoint("config/all", environment)?;
        debug!(%url, "fetching configuration document");
        self.get_json(url).await
    }

    /// List the environments the service holds configuration for.
    pub async fn environments(&self) -> ConfigClientResult<Vec<String>> {
        let url = self.endpoint("config/environments", None)?;
        let entries: Vec<EnvironmentEntry> = self.get_json(url).await?;
        Ok(entries.into_iter().map(|e| e.environment).collect())
    }

    /// Look up a single key.
    pub async fn get_value(
        &self,
        key: &str,
        environment: Option<&str>,
    ) -> ConfigClientResult<ConfigValue> {
        let url = self.endpoint(&format!("config/get/{key}"), environment)?;
        self.get_json(url).await
    }

    /// Look up several keys in one request.
    pub async fn get_many(
        &self,
        keys: &[String],
        environment: Option<&str>,
    ) -> ConfigClientResult<Map<String, Value>> {
        let url = self.endpoint("config/get", None)?;
        let body = KeysRequest {
            keys: keys.to_vec(),
            environment: environment.map(str::to_string),
        };
        let response = self.http.post(url).json(&body).send().await?;
        Self::parse(response).await
    }

    /// Fetch the nested subtree under a section prefix.
    pub async fn section(
        &self,
        prefix: &str,
        environment: Option<&str>,
    ) -> ConfigClientResult<Value> {
        let url = self.endpoint(&format!("config/section/{prefix}"), environment)?;
        self.get_json(url).await
    }

    /// Idempotent upsert of one key: creates it when absent, overwrites
    /// it when present. The response body is ignored beyond success.
    pub async fn set_value(
        &self,
        key: &str,
        request: &SetRequest,
        environment: Option<&str>,
    ) -> ConfigClientResult<()> {
        let url = self.endpoint(&format!("config/set/{key}"), environment)?;
        debug!(%url, updated_by = %request.updated_by, "upserting configuration key");
        let response = self.http.put(url).json(request).send().await?;
        Self::expect_success(response).await
    }

    /// Delete one key.
    pub async fn delete_value(
        &self,
        key: &str,
        environment: Option<&str>,
    ) -> ConfigClientResult<()> {
        let url = self.endpoint(&format!("config/delete/{key}"), environment)?;
        debug!(%url, "deleting configuration key");
        let response = self.http.delete(url).send().await?;
        Self::expect_success(response).await
    }

    /// Change history of one key, newest first.
    pub async fn history(
        &self,
        key: &str,
        limit: Option<usize>,
    ) -> ConfigClientResult<Vec<HistoryEntry>> {
        let mut url = self.endpoint(&format!("config/history/{key}"), None)?;
        if let Some(limit) = limit {
            url.query_pairs_mut().append_pair("limit", &limit.to_string());
        }
        self.get_json(url).await
    }

    /// Export one environment's document as YAML.
    pub async fn export_yaml(&self, environment: Option<&str>) -> ConfigClientResult<YamlExport> {
        let url = self.endpoint("config/export/yaml", environment)?;
        self.get_json(url).await
    }

    /// Import a YAML document, flattened and upserted key by key on the
    /// service side.
    pub async fn import_yaml(
        &self,
        request: &YamlImportRequest,
    ) -> ConfigClientResult<YamlImportResponse> {
        let url = self.endpoint("config/import/yaml", None)?;
        let response = self.http.post(url).json(request).send().await?;
        Self::parse(response).await
    }

    /// Service health probe.
    pub async fn health(&self) -> ConfigClientResult<HealthReport> {
        let url = self.endpoint("health", None)?;
        self.get_json(url).await
    }

    // Typed single-key getters. A missing key (404) is `None`; a key
    // holding a value of the wrong shape is an error.

    pub async fn get_str(
        &self,
        key: &str,
        environment: Option<&str>,
    ) -> ConfigClientResult<Option<String>> {
        match self.lookup(key, environment).await? {
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(Self::unexpected(key, "string", &other)),
            None => Ok(None),
        }
    }

    pub async fn get_i64(
        &self,
        key: &str,
        environment: Option<&str>,
    ) -> ConfigClientResult<Option<i64>> {
        match self.lookup(key, environment).await? {
            Some(value) => match value.as_i64() {
                Some(n) => Ok(Some(n)),
                None => Err(Self::unexpected(key, "integer", &value)),
            },
            None => Ok(None),
        }
    }

    pub async fn get_f64(
        &self,
        key: &str,
        environment: Option<&str>,
    ) -> ConfigClientResult<Option<f64>> {
        match self.lookup(key, environment).await? {
            Some(value) => match value.as_f64() {
                Some(n) => Ok(Some(n)),
                None => Err(Self::unexpected(key, "float", &value)),
            },
            None => Ok(None),
        }
    }

    pub async fn get_bool(
        &self,
        key: &str,
        environment: Option<&str>,
    ) -> ConfigClientResult<Option<bool>> {
        match self.lookup(key, environment).await? {
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(other) => Err(Self::unexpected(key, "boolean", &other)),
            None => Ok(None),
        }
    }

    // Private helper methods

    async fn lookup(
        &self,
        key: &str,
        environment: Option<&str>,
    ) -> ConfigClientResult<Option<Value>> {
        match self.get_value(key, environment).await {
            Ok(config_value) => Ok(Some(config_value.value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn unexpected(key: &str, expected: &'static str, value: &Value) -> ConfigClientError {
        ConfigClientError::UnexpectedType {
            key: key.to_string(),
            expected,
            actual: ValueType::infer(value),
        }
    }

    fn endpoint(&self, path: &str, environment: Option<&str>) -> ConfigClientResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}"))?;
        if let Some(env) = environment {
            url.query_pairs_mut().append_pair("environment", env);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ConfigClientResult<T> {
        let response = self.http.get(url).send().await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> ConfigClientResult<T> {
        let status = response.status();
        if status.is_success() {
            let text = response.text().await?;
            serde_json::from_str(&text).map_err(ConfigClientError::from)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ConfigClientError::Status { status, body })
        }
    }

    async fn expect_success(response: Response) -> ConfigClientResult<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ConfigClientError::Status { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = ConfigClient::from_url("http://localhost:8080").unwrap();
        assert_eq!(client.base_url().to_string(), "http://localhost:8080/");
        assert!(ConfigClient::from_url("not a url").is_err());
    }

    #[test]
    fn test_endpoint_building() {
        let client = ConfigClient::from_url("http://localhost:8080").unwrap();

        let url = client.endpoint("config/all", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/config/all");

        let url = client.endpoint("config/set/storage.retries", Some("prod")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/config/set/storage.retries?environment=prod"
        );
    }

    #[test]
    fn test_endpoint_respects_base_path_prefix() {
        // A base URL behind a proxy prefix keeps its prefix.
        let client = ConfigClient::from_url("http://wopr.local/api/v1/").unwrap();
        let url = client.endpoint("config/all", None).unwrap();
        assert_eq!(url.as_str(), "http://wopr.local/api/v1/config/all");
    }
}
