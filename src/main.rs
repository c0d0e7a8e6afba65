use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use arcade::application::LoadArtworkUseCase;
use arcade::domain::Transform;
use arcade::infrastructure::{
    AppConfig, CatalogClient, CliArgs, Command, ConfigOrigin, ConfigStore, ImageFetcher,
    LoadedConfig, MemoryImageCache,
};
use arcade::presentation::{describe_image, render_showcase, render_thumbnails, save_png};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<LoadedConfig> {
    let store = match &args.config {
        Some(path) => ConfigStore::at(path),
        None => ConfigStore::platform_default()?,
    };
    let mut loaded = store.load()?;
    loaded.config.merge_with_args(args);
    loaded.config.validate()?;
    Ok(loaded)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let LoadedConfig {
        config,
        path: config_path,
        origin,
    } = load_config(&args)?;
    init_logging(&config)?;

    info!(version = arcade::VERSION, "Starting {}", arcade::NAME);
    match origin {
        ConfigOrigin::Fallback { reason } => warn!(
            path = %config_path.display(),
            %reason,
            "Config file does not parse, using defaults"
        ),
        ConfigOrigin::CreatedDefault => {
            info!(path = %config_path.display(), "Wrote default config");
        }
        ConfigOrigin::File => debug!(path = %config_path.display(), "Loaded config"),
    }

    let cache = Arc::new(MemoryImageCache::new(
        config.cache.max_entries,
        config.cache.max_bytes,
    ));
    let fetcher = Arc::new(ImageFetcher::with_memory_cache(
        config.fetcher.clone(),
        cache,
    )?);
    let catalog = Arc::new(CatalogClient::with_base_url(&config.catalog.base_url)?);

    let thumbnail_transform = if config.artwork.crop_thumbnails {
        Transform::CenterCropSquare
    } else {
        Transform::Identity
    };
    let artwork = LoadArtworkUseCase::new(catalog, fetcher.clone(), config.artwork.max_concurrent)
        .with_thumbnail_transform(thumbnail_transform);

    match args.command {
        Command::Games { limit } => {
            let rows = artwork.browse(limit).await?;
            print!("{}", render_thumbnails(&rows));
        }
        Command::Game { id } => {
            let showcase = artwork.showcase(id).await?;
            print!("{}", render_showcase(&showcase));
        }
        Command::Image { url, crop, output } => {
            let transform = if crop {
                Transform::CenterCropSquare
            } else {
                Transform::Identity
            };
            let fetched = fetcher.fetch(&url, transform).await?;
            println!("{}", describe_image(&fetched));
            if let Some(path) = output {
                save_png(&fetched, &path)?;
                println!("Saved to {}", path.display());
            }
        }
    }

    if let Some(stats) = fetcher.cache_stats() {
        info!(%stats, "Finished");
    }

    Ok(())
}
