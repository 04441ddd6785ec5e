// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The config key store implementation

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use wopr_client_api::{ConfigApi, ConfigApiError};
use wopr_config_core::{
    decode_raw, flatten, get_dotted, group_by_section, mutate, section_of, validate_key,
};
use wopr_config_core::{DecodeError, KeyError, MutateError};
use wopr_config_model::{SetRequest, Setting, ValueType};

/// Errors surfaced by store operations.
///
/// Validation failures (`Decode`, `Key`, `Mutate`, `UnknownKey`,
/// `WrongKind`) are raised before any request is issued; `Api` carries
/// transport and server failures. All of them render to the single
/// user-visible message string the editor shows inline.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Mutate(#[from] MutateError),

    #[error("no such setting: {0:?}")]
    UnknownKey(String),

    #[error("setting {key:?} is not a {expected}")]
    WrongKind { key: String, expected: ValueType },

    #[error(transparent)]
    Api(#[from] ConfigApiError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Lifecycle phase of the store, for callers that render state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorePhase {
    #[default]
    Idle,
    Loading,
    Saving,
}

/// A consistent, editable view over one environment's configuration.
///
/// Generic over [`ConfigApi`] so it runs against the production REST
/// client or an in-memory double. All mutating methods take `&mut self`:
/// a second write cannot start while one is awaited, which closes the
/// rapid-double-edit window instead of guarding it at runtime.
#[derive(Debug)]
pub struct ConfigKeyStore<C> {
    api: C,
    origin: String,
    environment: Option<String>,
    document: Value,
    sections: BTreeMap<String, Vec<Setting>>,
    phase: StorePhase,
    last_error: Option<String>,
}

impl<C: ConfigApi> ConfigKeyStore<C> {
    /// Create an empty store. `origin` is the attribution tag sent as
    /// `updated_by` on every write.
    pub fn new(api: C, origin: impl Into<String>) -> Self {
        ConfigKeyStore {
            api,
            origin: origin.into(),
            environment: None,
            document: Value::Null,
            sections: BTreeMap::new(),
            phase: StorePhase::Idle,
            last_error: None,
        }
    }

    /// Pin the store to a named environment.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Re-fetch the whole document and rebuild the flattened view.
    ///
    /// On failure the previous view is kept untouched (empty if the
    /// first load never succeeded).
    pub async fn refresh(&mut self) -> StoreResult<()> {
        self.phase = StorePhase::Loading;
        match self.api.fetch_document(self.environment.as_deref()).await {
            Ok(document) => {
                self.sections = group_by_section(flatten(&document));
                self.document = document;
                self.phase = StorePhase::Idle;
                self.last_error = None;
                debug!(sections = self.sections.len(), "configuration view rebuilt");
                Ok(())
            }
            Err(e) => {
                self.phase = StorePhase::Idle;
                self.last_error = Some(e.to_string());
                warn!(error = %e, "configuration fetch failed");
                Err(e.into())
            }
        }
    }

    /// Decode a textual edit for `key` according to `value_type` and
    /// upsert it. A decode failure aborts before any request is sent.
    pub async fn set_value(
        &mut self,
        key: &str,
        raw: &str,
        value_type: ValueType,
    ) -> StoreResult<()> {
        let value = decode_raw(raw, value_type)?;
        self.write(key, value, None).await
    }

    /// Upsert an already-structured replacement value for `key` — the
    /// path taken by nested list/dict mutations.
    pub async fn set_json(&mut self, key: &str, value: Value) -> StoreResult<()> {
        self.write(key, value, None).await
    }

    /// Delete `key` and reconcile.
    pub async fn delete_key(&mut self, key: &str) -> StoreResult<()> {
        self.phase = StorePhase::Saving;
        match self.api.delete_key(key, self.environment.as_deref()).await {
            Ok(()) => {
                self.phase = StorePhase::Idle;
                self.refresh().await
            }
            Err(e) => {
                self.phase = StorePhase::Idle;
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Create (or overwrite) a setting from its parts. The full key is
    /// `<section>.<suffix>` when a section is given, else the suffix
    /// verbatim; it must pass the key-character check before anything is
    /// sent. Creation and update share the one upsert endpoint.
    pub async fn add_setting(
        &mut self,
        section: Option<&str>,
        suffix: &str,
        value_type: ValueType,
        raw: &str,
        description: Option<&str>,
    ) -> StoreResult<()> {
        let full_key = match section {
            Some(section) => format!("{section}.{suffix}"),
            None => suffix.to_string(),
        };
        validate_key(&full_key)?;
        let value = decode_raw(raw, value_type)?;
        self.write(&full_key, value, description.map(str::to_string)).await
    }

    // Nested complex-value editing. The current value is resolved at the
    // dotted path in the last-fetched document, the whole replacement
    // value is computed locally, and it is persisted through the
    // ordinary upsert — there is no element-addressed wire operation.

    /// Replace one item of a list setting.
    pub async fn list_item_set(&mut self, key: &str, index: usize, raw: &str) -> StoreResult<()> {
        let next = mutate::list_set(self.list_items(key)?, index, raw)?;
        self.write(key, next, None).await
    }

    /// Remove one item of a list setting.
    pub async fn list_item_remove(&mut self, key: &str, index: usize) -> StoreResult<()> {
        let next = mutate::list_remove(self.list_items(key)?, index)?;
        self.write(key, next, None).await
    }

    /// Append an empty-string placeholder to a list setting.
    pub async fn list_item_push(&mut self, key: &str) -> StoreResult<()> {
        let next = mutate::list_push(self.list_items(key)?);
        self.write(key, next, None).await
    }

    /// Rename a property of a dict setting and/or replace its value.
    pub async fn dict_entry_set(
        &mut self,
        key: &str,
        old_entry: &str,
        new_entry: &str,
        raw: &str,
    ) -> StoreResult<()> {
        let next = mutate::dict_set(self.dict_entries(key)?, old_entry, new_entry, raw)?;
        self.write(key, next, None).await
    }

    /// Remove a property of a dict setting.
    pub async fn dict_entry_remove(&mut self, key: &str, entry: &str) -> StoreResult<()> {
        let next = mutate::dict_remove(self.dict_entries(key)?, entry)?;
        self.write(key, next, None).await
    }

    /// Insert the blank placeholder property into a dict setting.
    pub async fn dict_entry_add(&mut self, key: &str) -> StoreResult<()> {
        let next = mutate::dict_add(self.dict_entries(key)?);
        self.write(key, next, None).await
    }

    // Accessors

    /// The grouped view, sections sorted by name, settings by key.
    pub fn sections(&self) -> &BTreeMap<String, Vec<Setting>> {
        &self.sections
    }

    /// Look up one setting by its full key.
    pub fn setting(&self, key: &str) -> Option<&Setting> {
        self.sections.get(section_of(key))?.iter().find(|s| s.key == key)
    }

    /// The last-fetched document (`Null` before the first load).
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn phase(&self) -> StorePhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    // Private helpers

    async fn write(
        &mut self,
        key: &str,
        value: Value,
        description: Option<String>,
    ) -> StoreResult<()> {
        self.phase = StorePhase::Saving;
        let request = SetRequest {
            value,
            description,
            updated_by: self.origin.clone(),
        };
        match self.api.upsert_key(key, &request, self.environment.as_deref()).await {
            Ok(()) => {
                self.phase = StorePhase::Idle;
                self.refresh().await
            }
            Err(e) => {
                // No optimistic update was applied, so there is nothing
                // to roll back; the view simply stays stale.
                self.phase = StorePhase::Idle;
                self.last_error = Some(e.to_string());
                warn!(key, error = %e, "configuration write failed");
                Err(e.into())
            }
        }
    }

    fn value_at(&self, key: &str) -> StoreResult<&Value> {
        get_dotted(&self.document, key).ok_or_else(|| StoreError::UnknownKey(key.to_string()))
    }

    fn list_items(&self, key: &str) -> StoreResult<&[Value]> {
        self.value_at(key)?.as_array().map(Vec::as_slice).ok_or_else(|| {
            StoreError::WrongKind {
                key: key.to_string(),
                expected: ValueType::List,
            }
        })
    }

    fn dict_entries(&self, key: &str) -> StoreResult<&serde_json::Map<String, Value>> {
        self.value_at(key)?.as_object().ok_or_else(|| StoreError::WrongKind {
            key: key.to_string(),
            expected: ValueType::Dict,
        })
    }
}
