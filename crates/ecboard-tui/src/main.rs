mod action;
mod app;
mod app_state;
mod component;
mod components;
mod theme;
mod widgets;

use std::sync::Arc;

use ecboard_proto::config::Config;
use ecboard_proto::error::FetchError;
use ecboard_proto::photos::PhotoDirectory;
use ecboard_proto::scheduler::Scheduler;
use ecboard_proto::source::{build_source, CandidateSource, MisconfiguredSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = ecboard_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("tui.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // The TUI owns the terminal, so logs only go to the file.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("ecboard log: {}", log_path.display());
    tracing::info!("ecboard starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config: {:#}; using defaults", e);
        let mut config = Config::default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    });

    // ── Data source ──────────────────────────────────────────────────────────
    let source: Arc<dyn CandidateSource> = match build_source(&config.source) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("source: {}", e);
            let reason = match e {
                FetchError::Config(reason) => reason,
                other => other.to_string(),
            };
            Arc::new(MisconfiguredSource::new(reason))
        }
    };
    let source_label = source.describe();
    tracing::info!("source: {}", source_label);

    // ── Scheduler + timers ───────────────────────────────────────────────────
    let scheduler = Arc::new(Scheduler::new(source, &config.schedule));
    let timers = scheduler.start();

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let photos = PhotoDirectory::new(config.photos.clone());
    let app = app::App::new(scheduler, photos, source_label).await;
    app.run(timers).await?;

    Ok(())
}
