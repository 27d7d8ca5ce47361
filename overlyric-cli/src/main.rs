use anyhow::Context;
use clap::Parser;
use overlyric_core::{format_timestamp_ms, Config, CoreError, LyricsCache, LyricsResolver};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_TARGET: &str = "overlyric::cli";

#[derive(Debug, Parser)]
#[command(name = "overlyric", version, about = "Resolve and print lyrics for a track")]
struct Cli {
    /// Artist name
    #[arg(long)]
    artist: String,

    /// Track title
    #[arg(long)]
    title: String,

    /// Source track ID used as the primary cache key; defaults to the
    /// normalized artist|title key when the player does not supply one
    #[arg(long)]
    track_id: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::load_or_create() {
        Ok(config) => config,
        Err(CoreError::ConfigNotFound { path }) => {
            info!(
                target: LOG_TARGET,
                "Created config template at {}, continuing with defaults",
                path.display()
            );
            Config::default()
        }
        Err(e) => return Err(e).context("failed to load configuration"),
    };

    let cache = Arc::new(LyricsCache::new(config.lyrics.cache_capacity));
    let resolver = LyricsResolver::new(Arc::clone(&cache), config.lyrics.genius_token.as_deref())
        .context("failed to build provider chain")?;

    let track_id = cli
        .track_id
        .unwrap_or_else(|| overlyric_core::normalize_key(&cli.artist, &cli.title));

    let lyrics = resolver
        .get_lyrics(&track_id, &cli.artist, &cli.title)
        .await
        .with_context(|| format!("no lyrics found for {} - {}", cli.artist, cli.title))?;

    let kind = if lyrics.is_synced { "synced" } else { "plain" };
    println!(
        "# {} - {} ({}, {kind})",
        cli.artist,
        cli.title,
        lyrics.source.as_str()
    );
    for line in &lyrics.lines {
        match line.timestamp_ms {
            Some(ts) if lyrics.is_synced => {
                println!("[{}] {}", format_timestamp_ms(ts), line.text);
            }
            _ => println!("{}", line.text),
        }
    }

    let stats = cache.stats().await;
    info!(
        target: LOG_TARGET,
        "Cache: {}/{} entries ({} by track, {} by key)",
        stats.size, stats.max_size, stats.track_entries, stats.key_entries
    );

    Ok(())
}
