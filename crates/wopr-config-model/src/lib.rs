// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Wire types for the WOPR config service
//!
//! This crate defines the request/response types spoken by the config
//! service REST API together with the `ValueType` tag vocabulary used to
//! classify settings. The types are shared between the REST client, the
//! editable key store, and any third-party tooling that talks to the
//! service directly.

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
