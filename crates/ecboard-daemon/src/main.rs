mod http;

use std::sync::Arc;

use anyhow::Context;
use ecboard_proto::config::Config;
use ecboard_proto::sheets::{RowReader, SheetsClient};
use ecboard_proto::source::http_client;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = ecboard_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("daemon.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,ecboard_daemon=debug")),
        )
        .init();

    info!("Log file: {:?}", log_path);

    let config = Config::load()?;
    info!("Config loaded from: {:?}", Config::config_path());

    let client = http_client(config.source.request_timeout())
        .context("building HTTP client")?;

    // A bad spreadsheet URL is reported per request, not at startup.
    let reader: Option<Arc<dyn RowReader>> =
        match SheetsClient::from_config(client, &config.source) {
            Ok(sheets) => {
                info!("Serving {}", sheets.describe());
                Some(Arc::new(sheets))
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        };

    let server = http::start_server(
        config.http.bind_address.clone(),
        config.http.port,
        http::HttpState::new(reader),
    );

    tokio::select! {
        res = server => {
            res.context("HTTP server task")?;
            error!("HTTP server stopped");
            anyhow::bail!("HTTP server stopped");
        }
        res = tokio::signal::ctrl_c() => {
            res.context("waiting for ctrl-c")?;
            info!("Shutting down");
        }
    }

    Ok(())
}
