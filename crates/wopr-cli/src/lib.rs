// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Command-line client for the WOPR config service

pub mod commands;

pub use clap::Parser;

use clap::Subcommand;
use wopr_logging::CliLogLevel;
use wopr_config_model::ValueType;

/// Production fallback used when neither the flag nor the environment
/// variable names a service.
pub const DEFAULT_SERVICE_URL: &str = "http://wopr-config-service.svc:8080";

#[derive(Parser)]
#[command(name = "woprctl", version, about = "Manage WOPR configuration")]
pub struct Cli {
    /// Base URL of the config service
    #[arg(
        long,
        global = true,
        env = "WOPR_CONFIG_SERVICE_URL",
        default_value = DEFAULT_SERVICE_URL
    )]
    pub service_url: String,

    /// Environment to read and write (service default when omitted)
    #[arg(long, global = true, env = "WOPR_ENVIRONMENT")]
    pub environment: Option<String>,

    /// Attribution recorded on every write
    #[arg(long, global = true, default_value = "woprctl")]
    pub updated_by: String,

    /// Log verbosity level
    #[arg(long, global = true, value_enum, default_value_t = CliLogLevel::Info)]
    pub log_level: CliLogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the flattened configuration, grouped by section
    Show {
        /// Restrict the listing to one key or key prefix
        key: Option<String>,
        /// Append the inferred type tag to every line
        #[arg(long)]
        types: bool,
    },
    /// Get the value of a single key
    Get {
        key: String,
    },
    /// Set a configuration value (creates the key when absent)
    Set {
        key: String,
        value: String,
        /// Value type; inferred from the value text when omitted
        #[arg(long = "type")]
        value_type: Option<ValueType>,
        /// Description stored alongside the value
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a configuration key
    Delete {
        key: String,
    },
    /// Add a setting under a section
    Add {
        /// Section prefix; the suffix is used verbatim when omitted
        #[arg(long)]
        section: Option<String>,
        suffix: String,
        value: String,
        #[arg(long = "type")]
        value_type: Option<ValueType>,
        #[arg(long)]
        description: Option<String>,
    },
    /// List the environments the service holds configuration for
    Environments,
    /// Show the change history of a key
    History {
        key: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Export the configuration as YAML
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Import a YAML document, upserting every flattened key
    Import {
        file: std::path::PathBuf,
    },
    /// Probe the service health endpoint
    Health,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_parses_an_explicit_type() {
        let cli = Cli::try_parse_from([
            "woprctl", "set", "storage.retries", "5", "--type", "integer",
        ])
        .unwrap();
        match cli.command {
            Commands::Set {
                key, value, value_type, ..
            } => {
                assert_eq!(key, "storage.retries");
                assert_eq!(value, "5");
                assert_eq!(value_type, Some(ValueType::Integer));
            }
            _ => panic!("expected set"),
        }
        assert_eq!(cli.service_url, DEFAULT_SERVICE_URL);
        assert_eq!(cli.updated_by, "woprctl");
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let result =
            Cli::try_parse_from(["woprctl", "set", "k", "v", "--type", "timestamp"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "woprctl",
            "show",
            "--environment",
            "stage",
            "--service-url",
            "http://localhost:8080",
        ])
        .unwrap();
        assert_eq!(cli.environment.as_deref(), Some("stage"));
        assert_eq!(cli.service_url, "http://localhost:8080");
    }
}
