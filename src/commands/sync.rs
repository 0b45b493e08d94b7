//! # Sync Command Implementation
//!
//! The sync command runs the whole pipeline once:
//! 1. Load the configuration file and apply environment overrides
//! 2. Fetch the source tree (GitHub API, or a local directory)
//! 3. Filter, gate, and validate each candidate manifest
//! 4. Write changed manifests into the target directory
//! 5. Print a summary and append the change list to the CI output file
//!
//! Every input that CI usually provides through the environment can also be
//! given as a flag.

use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use resource_type_sync::config::{self, RunOptions};
use resource_type_sync::defaults::{
    default_config_path, CHANGES_OUTPUT_KEY, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS,
};
use resource_type_sync::filesystem::DiskStore;
use resource_type_sync::output::{append_change_summary, emoji, OutputConfig};
use resource_type_sync::pipeline::{self, SyncReport};
use resource_type_sync::remote::{GitHubProvider, LocalDirProvider, RemoteProvider};

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to config file
    #[arg(short, long, value_name = "PATH", env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Token for the source provider, sent as a bearer token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Source repository (owner/name), overriding the config file
    #[arg(long, value_name = "OWNER/NAME", env = "SOURCE_REPO")]
    pub source_repo: Option<String>,

    /// Show what would be synced without writing any files
    #[arg(
        short = 'n',
        long,
        env = "DRY_RUN",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub dry_run: bool,

    /// Append the change list to this file as a `changes<<EOF` block
    #[arg(long, value_name = "PATH", env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Timeout for each remote request in seconds (0 disables it)
    #[arg(long, value_name = "SECS", env = "SYNC_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Base URL of the GitHub API
    #[arg(long, value_name = "URL", env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Read the source tree from a local directory instead of the API
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Also list files that needed no changes
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl SyncArgs {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            token: self.token.clone(),
            source_repository: self.source_repo.clone(),
            dry_run: self.dry_run,
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
        }
    }
}

/// Execute the sync command
pub fn execute(args: SyncArgs, out: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let options = args.run_options();
    let config = config::from_file(&config_path)?.apply_overrides(&options)?;

    if !args.quiet {
        println!("{} Starting resource type sync...", emoji(out, "🔄", "[SYNC]"));
        match &args.source_dir {
            Some(dir) => println!("Source: {} (local)", dir.display()),
            None => println!("Source: {}@{}", config.source.repository, config.source.branch),
        }
        println!("Target: {}", config.target.directory);
        println!("Strategy: {}", config.sync.strategy);
        println!("Dry run: {}", options.dry_run);
        println!();
    }

    let remote: Box<dyn RemoteProvider> = match &args.source_dir {
        Some(dir) => Box::new(LocalDirProvider::new(dir)),
        None => Box::new(GitHubProvider::new(
            &args.api_url,
            options.token.clone(),
            options.timeout,
        )?),
    };
    let mut store = DiskStore::new(&config.target.directory);

    let report = match pipeline::run(&config, options.dry_run, remote.as_ref(), &mut store) {
        Ok(report) => report,
        Err(e) => {
            if !args.quiet {
                println!();
                println!("{} Sync process failed", emoji(out, "❌", "[ERR]"));
            }
            return Err(e.into());
        }
    };

    if !args.quiet {
        print_summary(&report, out, args.verbose);
    }

    if let Some(path) = &args.output_file {
        append_change_summary(path, CHANGES_OUTPUT_KEY, &report.changes)?;
    }

    if !args.quiet {
        println!();
        println!(
            "{} Sync process completed successfully in {:.2}s",
            emoji(out, "✅", "[OK]"),
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn print_summary(report: &SyncReport, out: &OutputConfig, verbose: bool) {
    println!();
    println!(
        "{}Sync completed",
        if report.dry_run { "[DRY RUN] " } else { "" }
    );
    println!("Files checked: {}", report.files_checked);
    println!("Files synced: {}", report.files_synced());

    let added = report.added();
    let updated = report.updated();
    if !added.is_empty() || !updated.is_empty() {
        println!("   Added: {}, Updated: {}", added.len(), updated.len());
    }

    if report.changes.is_empty() {
        println!();
        println!("{} No changes detected", emoji(out, "📭", "[NONE]"));
    } else {
        println!();
        println!("{} Changes:", emoji(out, "📝", "[CHANGES]"));
        for change in report.changes.entries() {
            println!("{}", change);
        }
    }

    if verbose {
        let unchanged = report.unchanged();
        if !unchanged.is_empty() {
            println!();
            println!("Unchanged:");
            for path in unchanged {
                println!("  = {}", path);
            }
        }
    }
}
