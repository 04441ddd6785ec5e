// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Transport-agnostic interface to the WOPR config service
//!
//! [`ConfigApi`] is the seam between the editable key store and whatever
//! actually moves bytes: the production REST client implements it, and
//! tests implement it over an in-memory document.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use wopr_config_model::SetRequest;

/// Errors surfaced through the transport seam.
///
/// Local validation never reaches this layer; by the time a call is made
/// the input has already been decoded. The two variants mirror the only
/// failure classes the service contract distinguishes: could-not-talk
/// and talked-but-refused.
#[derive(Debug, Error)]
pub enum ConfigApiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
}

pub type ConfigApiResult<T> = Result<T, ConfigApiError>;

/// The subset of the config service surface the key store depends on.
#[async_trait]
pub trait ConfigApi: Send + Sync {
    /// Fetch the whole nested document for an environment.
    async fn fetch_document(&self, environment: Option<&str>) -> ConfigApiResult<Value>;

    /// Idempotent upsert of one dot-path key.
    async fn upsert_key(
        &self,
        key: &str,
        request: &SetRequest,
        environment: Option<&str>,
    ) -> ConfigApiResult<()>;

    /// Delete one dot-path key.
    async fn delete_key(&self, key: &str, environment: Option<&str>) -> ConfigApiResult<()>;

    /// List the environments the service knows about.
    async fn list_environments(&self) -> ConfigApiResult<Vec<String>>;
}
