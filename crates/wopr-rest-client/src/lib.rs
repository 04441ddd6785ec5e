// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! REST API client for the WOPR config service
//!
//! This crate provides the HTTP client for the config service: the whole
//! document fetch, the idempotent per-key upsert and delete, environment
//! and history listings, YAML import/export and typed single-key
//! getters. It implements the [`ConfigApi`] trait so the editable key
//! store (and anything else built on the seam) can run against it or
//! against a test double interchangeably.

pub mod client;
pub mod error;

pub use client::*;
pub use error::*;

use async_trait::async_trait;
use serde_json::Value;
use wopr_client_api::{ConfigApi, ConfigApiError, ConfigApiResult};
use wopr_config_model::SetRequest;

fn into_api_error(e: ConfigClientError) -> ConfigApiError {
    match e {
        ConfigClientError::Status { status, body } => ConfigApiError::Status {
            status: status.as_u16(),
            body,
        },
        other => ConfigApiError::Transport(other.to_string()),
    }
}

#[async_trait]
impl ConfigApi for ConfigClient {
    async fn fetch_document(&self, environment: Option<&str>) -> ConfigApiResult<Value> {
        self.fetch_all(environment).await.map_err(into_api_error)
    }

    async fn upsert_key(
        &self,
        key: &str,
        request: &SetRequest,
        environment: Option<&str>,
    ) -> ConfigApiResult<()> {
        self.set_value(key, request, environment).await.map_err(into_api_error)
    }

    async fn delete_key(&self, key: &str, environment: Option<&str>) -> ConfigApiResult<()> {
        self.delete_value(key, environment).await.map_err(into_api_error)
    }

    async fn list_environments(&self) -> ConfigApiResult<Vec<String>> {
        self.environments().await.map_err(into_api_error)
    }
}
