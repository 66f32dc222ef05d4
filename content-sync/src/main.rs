//! Content Sync - command line entry point
//!
//! Writes a backup archive of a local content tree, or restores an archive
//! into the configured GitHub repository.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use content_sync::{build_archive, restore_archive, utils, BackupArchive, Config, GitHubClient};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an archive of the content tree
    Backup {
        /// Content root (overrides config)
        #[arg(short, long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Output file (default: <prefix>-backup-<date>.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Commit an archive to the configured repository
    Restore {
        /// Archive file to restore
        archive: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    }
    .with_env();

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level)?;

    match args.command {
        Command::Backup { root, output } => backup(&config, root, output).await,
        Command::Restore { archive } => restore(&config, archive).await,
    }
}

async fn backup(config: &Config, root: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let layout = match root {
        Some(root) => content_sync::ContentLayout::new(root),
        None => config.layout(),
    };

    let archive = tokio::task::spawn_blocking(move || build_archive(&layout)).await??;
    let output = output
        .unwrap_or_else(|| PathBuf::from(archive.suggested_file_name(&config.content.site_prefix)));

    tokio::fs::write(&output, archive.to_json_pretty()?)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        "Wrote {} ({} posts, {} categories)",
        output.display(),
        archive.posts.len(),
        archive.categories.len()
    );
    Ok(())
}

async fn restore(config: &Config, path: PathBuf) -> Result<()> {
    // Configuration problems surface before anything is read or sent.
    let target = config.github.resolve()?;
    let archive = BackupArchive::from_file(&path)?;
    let client = GitHubClient::new(&target)?;

    tracing::info!(
        "Restoring {} onto {}@{}",
        path.display(),
        target.repository,
        target.branch
    );
    let outcome = restore_archive(&client, &target.branch, &archive).await?;

    println!("{}", outcome.commit_sha);
    Ok(())
}
