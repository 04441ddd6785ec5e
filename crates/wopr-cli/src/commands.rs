// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only
#![allow(clippy::disallowed_methods)] // CLI commands intentionally print to stdout/stderr

//! Subcommand implementations
use anyhow::{Context, Result};
use serde_json::Value;

use wopr_config_core::{decode_lenient, format_value};
use wopr_config_model::{ValueType, YamlImportRequest};
use wopr_config_store::ConfigKeyStore;
use wopr_rest_client::ConfigClient;

use crate::{Cli, Commands};

impl Cli {
    pub async fn run(self) -> Result<()> {
        let Cli {
            service_url,
            environment,
            updated_by,
            command,
            ..
        } = self;

        let client = ConfigClient::from_url(&service_url)
            .with_context(|| format!("invalid service URL {service_url:?}"))?;
        let env = environment.as_deref();

        match command {
            Commands::Show { key, types } => show(&client, env, key.as_deref(), types).await,
            Commands::Get { key } => get(&client, env, &key).await,
            Commands::Set {
                key,
                value,
                value_type,
                description,
            } => {
                let store = store(client, env, &updated_by);
                set(store, &key, &value, value_type, description.as_deref()).await
            }
            Commands::Delete { key } => {
                let mut store = store(client, env, &updated_by);
                store.delete_key(&key).await?;
                println!("deleted {key}");
                Ok(())
            }
            Commands::Add {
                section,
                suffix,
                value,
                value_type,
                description,
            } => {
                let mut store = store(client, env, &updated_by);
                let value_type = value_type.unwrap_or_else(|| infer_from_raw(&value));
                store
                    .add_setting(
                        section.as_deref(),
                        &suffix,
                        value_type,
                        &value,
                        description.as_deref(),
                    )
                    .await?;
                let full_key = match section {
                    Some(section) => format!("{section}.{suffix}"),
                    None => suffix,
                };
                println!("set {full_key}");
                Ok(())
            }
            Commands::Environments => environments(&client).await,
            Commands::History { key, limit } => history(&client, &key, limit).await,
            Commands::Export { output } => export(&client, env, output).await,
            Commands::Import { file } => import(&client, env, &file, &updated_by).await,
            Commands::Health => health(&client).await,
        }
    }
}

fn store(
    client: ConfigClient,
    environment: Option<&str>,
    updated_by: &str,
) -> ConfigKeyStore<ConfigClient> {
    let store = ConfigKeyStore::new(client, updated_by);
    match environment {
        Some(env) => store.with_environment(env),
        None => store,
    }
}

/// Type used when no `--type` was given: whatever the raw text parses
/// into as a JSON literal, string otherwise.
fn infer_from_raw(raw: &str) -> ValueType {
    ValueType::infer(&decode_lenient(raw))
}

async fn show(
    client: &ConfigClient,
    environment: Option<&str>,
    key_filter: Option<&str>,
    types: bool,
) -> Result<()> {
    let mut store = ConfigKeyStore::new(client.clone(), "woprctl");
    if let Some(env) = environment {
        store = store.with_environment(env);
    }
    store.refresh().await?;

    for (section, settings) in store.sections() {
        let matching: Vec<_> = settings
            .iter()
            .filter(|s| match key_filter {
                Some(filter) => {
                    s.key == filter || s.key.starts_with(&format!("{filter}."))
                }
                None => true,
            })
            .collect();
        if matching.is_empty() {
            continue;
        }

        if key_filter.is_none() {
            println!("[{section}]");
        }
        for setting in matching {
            if types {
                println!(
                    "{}={} ({})",
                    setting.key,
                    format_value(&setting.value),
                    setting.value_type
                );
            } else {
                println!("{}={}", setting.key, format_value(&setting.value));
            }
        }
    }
    Ok(())
}

async fn get(client: &ConfigClient, environment: Option<&str>, key: &str) -> Result<()> {
    match client.get_value(key, environment).await {
        Ok(config_value) => {
            println!("{}", format_value(&config_value.value));
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            eprintln!("Configuration key {key:?} not found");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn set(
    mut store: ConfigKeyStore<ConfigClient>,
    key: &str,
    raw: &str,
    value_type: Option<ValueType>,
    description: Option<&str>,
) -> Result<()> {
    let value_type = value_type.unwrap_or_else(|| infer_from_raw(raw));
    // Route through add_setting so a freshly-typed key gets the same
    // character validation the editor applies.
    store.add_setting(None, key, value_type, raw, description).await?;
    println!("set {key} ({value_type})");
    Ok(())
}

async fn environments(client: &ConfigClient) -> Result<()> {
    for environment in client.environments().await? {
        println!("{environment}");
    }
    Ok(())
}

async fn history(client: &ConfigClient, key: &str, limit: usize) -> Result<()> {
    let entries = client.history(key, Some(limit)).await?;
    if entries.is_empty() {
        println!("no history for {key}");
        return Ok(());
    }
    for entry in entries {
        let changed_by = entry.changed_by.as_deref().unwrap_or("unknown");
        println!(
            "{}  {}  {} -> {}",
            entry.changed_at.to_rfc3339(),
            changed_by,
            optional_value(&entry.old_value),
            optional_value(&entry.new_value),
        );
    }
    Ok(())
}

fn optional_value(value: &Option<Value>) -> String {
    match value {
        Some(v) => format_value(v),
        None => "(unset)".to_string(),
    }
}

async fn export(
    client: &ConfigClient,
    environment: Option<&str>,
    output: Option<std::path::PathBuf>,
) -> Result<()> {
    let exported = client.export_yaml(environment).await?;
    match output {
        Some(path) => {
            std::fs::write(&path, exported.yaml)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => print!("{}", exported.yaml),
    }
    Ok(())
}

async fn import(
    client: &ConfigClient,
    environment: Option<&str>,
    file: &std::path::Path,
    updated_by: &str,
) -> Result<()> {
    let yaml_content = read_yaml_file(file)?;
    let request = YamlImportRequest {
        yaml_content,
        environment: environment.unwrap_or("default").to_string(),
        updated_by: updated_by.to_string(),
    };
    let response = client.import_yaml(&request).await?;
    println!(
        "imported {} keys into {}",
        response.imported, response.environment
    );
    Ok(())
}

/// Read and pre-validate a YAML file so an obviously broken document is
/// rejected before it travels to the service.
fn read_yaml_file(path: &std::path::Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str::<serde_yaml::Value>(&content)
        .with_context(|| format!("{} is not valid YAML", path.display()))?;
    Ok(content)
}

async fn health(client: &ConfigClient) -> Result<()> {
    let report = client.health().await?;
    match &report.environment {
        Some(env) => println!("{} ({env})", report.status),
        None => println!("{}", report.status),
    }
    if !report.is_healthy() {
        if let Some(error) = &report.error {
            eprintln!("{error}");
        }
        std::process::exit(1);
    }
    Ok(())
}
