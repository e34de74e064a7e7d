use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use photowall::application::PhotoWallScheduler;
use photowall::domain::entities::VisibilityWindow;
use photowall::infrastructure::{
    AppConfig, CliArgs, HttpImageFetcher, MemoryImageCache, ResourceCatalog, StorageManager,
};
use photowall::presentation::HeadlessWallView;

type Wall = PhotoWallScheduler<HeadlessWallView>;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

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
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_wall(config: &AppConfig) -> Result<Wall> {
    let urls = config
        .urls
        .as_deref()
        .ok_or_else(|| eyre!("no image list given; pass --urls or set `urls` in the config"))?;
    let catalog = ResourceCatalog::load(urls)
        .wrap_err_with(|| format!("failed to load image list {}", urls.display()))?;
    info!(items = catalog.len(), "Catalog loaded");

    let fetcher = Arc::new(HttpImageFetcher::new(config.fetcher_config())?);
    let cache =
        MemoryImageCache::from_memory_budget(config.memory_budget(), config.cache.budget_divisor);

    Ok(PhotoWallScheduler::new(
        HeadlessWallView::new(catalog),
        fetcher,
        cache,
    ))
}

/// Applies completions until the window is filled, nothing is left in
/// flight, or the timeout passes. Returns false on Ctrl-C.
async fn settle(wall: &mut Wall, timeout: Duration) -> Result<bool> {
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    loop {
        let window = wall.window();
        if wall.view().is_filled(window) || wall.outstanding_tasks() == 0 {
            break;
        }

        let timed_out = tokio::select! {
            _ = wall.process_next() => false,
            () = &mut deadline => true,
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Interrupted");
                return Ok(false);
            }
        };

        if timed_out {
            warn!(
                window = %window,
                filled = wall.view().filled_in(window),
                pending = wall.pending_fetches(),
                "Window did not fill before timeout"
            );
            break;
        }
    }

    let window = wall.window();
    info!(
        window = %window,
        filled = wall.view().filled_in(window),
        slots = wall.view().slots_in(window),
        "Window settled"
    );
    Ok(true)
}

async fn run(wall: &mut Wall, config: &AppConfig, scroll_to: Option<usize>) -> Result<()> {
    let timeout = Duration::from_secs(config.wall.settle_timeout_secs);

    wall.notify_visible_range(config.wall.first_visible, config.wall.visible_count);
    if !settle(wall, timeout).await? {
        return Ok(());
    }

    if let Some(first) = scroll_to {
        let target = VisibilityWindow::new(first, config.wall.visible_count);
        info!(window = %target, "Scrolling");
        wall.notify_scroll_state(false);
        wall.notify_visible_range(target.first, target.count);
        wall.notify_scroll_state(true);
        settle(wall, timeout).await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let scroll_to = args.scroll_to;
    let config = load_config(args)?;

    init_logging(&config)?;

    info!(version = photowall::VERSION, "Starting {}", photowall::NAME);

    let mut wall = create_wall(&config)?;
    let result = run(&mut wall, &config, scroll_to).await;

    info!(stats = %wall.cache_stats(), "Cache statistics");
    wall.shutdown();

    result
}
