//! CAD120 reader binary.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cad120_models::VideoKey;
use cad120_reader::{Cad120Reader, CacheStrategy, ReaderConfig};

/// Read the CAD120 annotations into sub-activity sequences and world traces.
#[derive(Debug, Parser)]
#[command(name = "cad120-reader", version, about)]
struct Cli {
    /// Load from the cache directory when every artifact is present
    #[arg(long)]
    load: bool,

    /// Save the results to the cache directory
    #[arg(long)]
    save: bool,

    /// Restrict the run to one video, e.g. Subject1_making_cereal_0510
    #[arg(long, value_name = "KEY")]
    episode: Option<String>,

    /// Skip object and skeleton tracks
    #[arg(long)]
    no_tracks: bool,
}

fn init_tracing() -> Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("cad120=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;
    let cli = Cli::parse();

    let mut config = ReaderConfig::from_env().context("Failed to load reader configuration")?;
    if cli.no_tracks {
        config = config.with_read_tracks(false);
    }
    if let Some(episode) = &cli.episode {
        let key: VideoKey = episode
            .parse()
            .with_context(|| format!("Invalid episode key '{}'", episode))?;
        config = config.with_episode(key);
    }

    let strategy = CacheStrategy::select(&config.cache_artifacts(), cli.load);
    info!(strategy = strategy.as_str(), "Starting cad120-reader");

    let reader = match Cad120Reader::open(config.clone(), strategy) {
        Err(e) if strategy == CacheStrategy::Hit && e.is_cache_miss() => {
            warn!(error = %e, "Cache unusable, rebuilding from raw files");
            Cad120Reader::build(config)?
        }
        other => other?,
    };

    if cli.save {
        reader.save().context("Failed to save cache artifacts")?;
    }

    info!(summary = %reader.summary(), "Finished");
    Ok(())
}
