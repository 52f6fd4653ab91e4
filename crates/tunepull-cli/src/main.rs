// SPDX-License-Identifier: GPL-3.0-or-later

//! tunepull: pull catalog metadata into local M4A files.
//!
//! The binary is a thin shell around the enrichment pipeline: scan a
//! folder, inspect a file's embedded tags, search the catalog for
//! ranked matches, enrich files with the best match, or undo a write
//! from its backup.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tunepull_application::{
    backup_path_for, prefetch_metadata, read_local_metadata, scan_m4a_files, ArtworkCache,
    CandidateRanker, CandidateScorer, EnrichmentPipeline, MetadataEnricher, ScoredCandidate,
};
use tunepull_config::AppConfig;
use tunepull_itunes::{ArtworkFetcher, ItunesClient};

#[derive(Parser)]
#[command(name = "tunepull")]
#[command(about = "Pull iTunes catalog metadata into local M4A files")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List M4A files under a folder, with prefetched tag summaries
    Scan {
        /// Folder to scan recursively
        path: PathBuf,
    },
    /// Show a file's embedded metadata
    Inspect {
        /// The M4A file to read
        path: PathBuf,
    },
    /// Search the catalog and show ranked candidates
    Search {
        /// The M4A file to match
        path: PathBuf,
        /// How many candidates to display
        #[arg(short, long, default_value_t = 5)]
        top: usize,
    },
    /// Enrich one or more files with their best catalog match
    Enrich {
        /// The M4A files to enrich, processed in order
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Restore a file's original bytes from its .backup copy
    Restore {
        /// The previously enriched file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = tunepull_config::load(cli.config.as_deref())?;
    init_tracing(&config.telemetry.log_level);

    match cli.command {
        Commands::Scan { path } => scan(&config, path),
        Commands::Inspect { path } => inspect(path),
        Commands::Search { path, top } => search(&config, path, top).await,
        Commands::Enrich { paths } => enrich(&config, paths).await,
        Commands::Restore { path } => restore(path),
    }
}

fn init_tracing(default_level: &str) {
    let fmt_layer = fmt::layer().with_target(true).with_level(true);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn build_pipeline(config: &AppConfig) -> Result<EnrichmentPipeline> {
    let client = ItunesClient::builder()
        .base_url(config.catalog.base_url.clone())
        .media(config.catalog.media.clone())
        .entity(config.catalog.entity.clone())
        .result_limit(config.catalog.result_limit)
        .build()?;

    let ranker = CandidateRanker::new(CandidateScorer::new(config.matching.clone()));
    let enricher = MetadataEnricher::new(
        ArtworkFetcher::new(),
        ArtworkCache::with_capacity(config.enrichment.artwork_cache_capacity),
        config.enrichment.clone(),
    );

    Ok(EnrichmentPipeline::new(client, ranker, enricher))
}

fn scan(config: &AppConfig, path: PathBuf) -> Result<()> {
    let files = scan_m4a_files(&path)?;
    if files.is_empty() {
        println!("No M4A files found under {}", path.display());
        return Ok(());
    }

    let paths: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
    let prefetched = prefetch_metadata(&paths, config.prefetch.max_files);

    for file in &files {
        let summary = prefetched
            .loaded
            .iter()
            .find(|m| m.file_path == file.path)
            .map(|m| {
                format!(
                    "  [{} - {}]",
                    m.artist.as_deref().unwrap_or("Unknown Artist"),
                    m.title.as_deref().unwrap_or("Unknown Title"),
                )
            })
            .unwrap_or_default();
        println!("{}{}", file.path.display(), summary);
    }

    println!(
        "\n{} file(s), {} tag summary(ies) prefetched, {} skipped",
        files.len(),
        prefetched.loaded.len(),
        prefetched.skipped
    );
    Ok(())
}

fn inspect(path: PathBuf) -> Result<()> {
    let metadata = read_local_metadata(&path)?;

    println!("File:          {}", metadata.file_path.display());
    println!("Size:          {} bytes", metadata.file_size);
    println!("Title:         {}", metadata.title.as_deref().unwrap_or("-"));
    println!("Artist:        {}", metadata.artist.as_deref().unwrap_or("-"));
    println!("Album:         {}", metadata.album.as_deref().unwrap_or("-"));
    println!(
        "Album artist:  {}",
        metadata.album_artist.as_deref().unwrap_or("-")
    );
    println!("Date:          {}", metadata.date.as_deref().unwrap_or("-"));
    println!("Genre:         {}", metadata.genre.as_deref().unwrap_or("-"));
    println!("Track:         {}", metadata.track);
    println!("Disc:          {}", metadata.disc);
    println!(
        "Duration:      {}",
        metadata
            .duration_seconds
            .map(format_duration)
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Bitrate:       {}",
        metadata
            .bitrate_kbps
            .map(|rate| format!("{rate} kbps"))
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Sample rate:   {}",
        metadata
            .sample_rate_hz
            .map(|rate| format!("{rate} Hz"))
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Artwork:       {}",
        metadata
            .artwork
            .map(|art| format!("{} bytes", art.data.len()))
            .unwrap_or_else(|| "none".to_string())
    );
    Ok(())
}

async fn search(config: &AppConfig, path: PathBuf, top: usize) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    let (local, ranked) = pipeline.search_file(&path).await?;

    println!(
        "Matches for {} ({} candidate(s)):\n",
        local.file_name,
        ranked.len()
    );
    for (index, scored) in ranked.iter().take(top).enumerate() {
        println!("{:>2}. {}", index + 1, describe_candidate(scored));
    }
    Ok(())
}

async fn enrich(config: &AppConfig, paths: Vec<PathBuf>) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    let (successes, failures) = pipeline.enrich_batch(&paths).await;

    for (path, enriched) in &successes {
        println!(
            "enriched {} (score {}/100, backup at {})",
            path.display(),
            enriched.match_score,
            enriched.write.backup_path.display()
        );
    }
    for (path, error) in &failures {
        eprintln!("failed   {}: {}", path.display(), error);
    }

    if successes.is_empty() && !failures.is_empty() {
        bail!("all {} file(s) failed to enrich", failures.len());
    }
    Ok(())
}

fn restore(path: PathBuf) -> Result<()> {
    let backup = backup_path_for(&path);
    if !backup.exists() {
        bail!("no backup found at {}", backup.display());
    }

    fs::copy(&backup, &path)
        .with_context(|| format!("failed to restore {} from backup", path.display()))?;
    info!(target: "cli", file = %path.display(), "restored from backup");
    println!("restored {} from {}", path.display(), backup.display());
    Ok(())
}

fn describe_candidate(scored: &ScoredCandidate) -> String {
    let candidate = &scored.candidate;
    let duration = candidate
        .track_time_millis
        .map(|millis| format_duration(millis as f64 / 1000.0))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "[{:>3}] {} - {} ({}, {})",
        scored.match_score,
        candidate.artist_name.as_deref().unwrap_or("Unknown Artist"),
        candidate.track_name.as_deref().unwrap_or("Unknown Title"),
        candidate.collection_name.as_deref().unwrap_or("-"),
        duration
    )
}

fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
