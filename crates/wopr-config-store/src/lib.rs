// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Editable key/value view over a remote configuration document
//!
//! [`ConfigKeyStore`] maintains the flat, sectioned, typed view a config
//! editor works against: fetch the whole document, flatten it into
//! dot-path settings, group them for display, and push single-key edits
//! back through the service's idempotent upsert. The server stays the
//! only source of truth — after every accepted write the whole document
//! is re-fetched and the local view rebuilt from scratch; nothing is
//! patched incrementally.

pub mod store;

pub use store::*;
