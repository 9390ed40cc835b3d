//! tootline terminal client
//!
//! Run with: `tootline --instance mastodon.social --token <TOKEN>`
//! Logs go to `--log-file` since the terminal belongs to the UI.

use std::{error::Error, path::Path};

use clap::Parser;
use tootline_client::transport::HttpTimelineApi;
use tootline_tui::{Args, Runtime, TerminalDriver};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let _log_guard = init_logging(&args)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        instance = args.instance.as_deref().unwrap_or("-"),
        page_limit = args.page_limit,
        "tootline starting"
    );

    let api = HttpTimelineApi::new(args.http_config())?;
    let driver = TerminalDriver::new()?;
    let runtime = Runtime::new(driver, api, args.session_store());

    let result = runtime.run().await;
    if let Err(ref e) = result {
        tracing::error!(error = %e, "tootline stopped");
    }
    result?;

    tracing::info!("tootline exited");
    Ok(())
}

fn init_logging(args: &Args) -> Result<WorkerGuard, Box<dyn Error>> {
    let file_name = args.log_file.file_name().ok_or("log file path has no file name")?;
    let directory = args
        .log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}
