// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for the config service client

use reqwest::StatusCode;
use thiserror::Error;
use wopr_config_model::ValueType;

/// Errors returned by [`crate::ConfigClient`]
#[derive(Debug, Error)]
pub enum ConfigClientError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Malformed response body: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success status; the body text is the error detail the service
    /// chose to expose.
    #[error("Server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Key {key:?} holds a {actual} value, expected {expected}")]
    UnexpectedType {
        key: String,
        expected: &'static str,
        actual: ValueType,
    },
}

pub type ConfigClientResult<T> = Result<T, ConfigClientError>;

impl ConfigClientError {
    /// Status code of the failed request, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ConfigClientError::Status { status, .. } => Some(*status),
            ConfigClientError::Http(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
