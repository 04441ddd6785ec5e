// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for contract parsing

use thiserror::Error;

/// Errors that can occur while parsing contract-level values
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Invalid value type tag: {0}")]
    InvalidValueType(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
