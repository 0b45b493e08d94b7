//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks local
//! manifest files with the same rules the sync pipeline applies before
//! writing a file.
//!
//! ## Functionality
//!
//! - **Structural Validation**: Each file must be a YAML mapping with every
//!   required top-level field, and a `types` field must be a mapping.
//! - **Opt-in Report**: When a configuration file is used, each file is also
//!   reported as opted in or not under the configured strategy.
//!
//! Required fields come from `--required-field` when given, otherwise from
//! the configuration's `validation` section. Validation is always performed
//! here, even if the configuration disables it for syncs.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use resource_type_sync::config;
use resource_type_sync::defaults::default_config_path;
use resource_type_sync::filter::OptInGate;
use resource_type_sync::output::{emoji, OutputConfig};
use resource_type_sync::validate::Validator;

/// Validate manifest files
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Manifest files to validate
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Path to config file providing the validation rules
    #[arg(short, long, value_name = "PATH", env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Required top-level field (repeatable); skips loading the config file
    #[arg(long = "required-field", value_name = "FIELD")]
    pub required_fields: Vec<String>,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, out: &OutputConfig) -> Result<()> {
    let (validator, gate) = if args.required_fields.is_empty() {
        let config_path = args.config.clone().unwrap_or_else(default_config_path);
        let config = config::from_file(&config_path)?;
        (
            Validator::new(true, config.validation.required_fields.clone()),
            Some(OptInGate::from_config(&config)),
        )
    } else {
        (Validator::new(true, args.required_fields.clone()), None)
    };

    let mut failures = 0;
    for file in &args.files {
        let content = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let path = file.display().to_string();

        match validator.validate(&content) {
            Ok(()) => {
                let opt_in = gate.as_ref().map(|gate| {
                    if gate.admits(&path, &content) {
                        " (opted in)"
                    } else {
                        " (not opted in)"
                    }
                });
                println!(
                    "{} {}{}",
                    emoji(out, "✅", "[OK]"),
                    path,
                    opt_in.unwrap_or_default()
                );
            }
            Err(invalid) => {
                failures += 1;
                println!("{} {}: {}", emoji(out, "❌", "[ERR]"), path, invalid);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!(
            "{} of {} manifest(s) failed validation",
            failures,
            args.files.len()
        );
    }
    Ok(())
}
