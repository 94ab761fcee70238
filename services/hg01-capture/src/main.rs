//! HG01 Capture - Vingnut soil moisture meter decoder
//!
//! Reads demodulated bit-row captures (one per line, rtl_433 codes
//! notation), decodes HG01 messages and writes one record per reading to
//! stdout. Logs go to stderr.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hg01_capture::bitbuffer::Capture;
use hg01_capture::config::{Config, OutputFormat};
use hg01_capture::decoder::{CaptureRunner, InputSource};
use hg01_capture::device::{DeviceManager, VINGNUT_HG01};
use hg01_capture::output::{JsonSink, KvSink, ReadingSink};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hg01_capture=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    info!("===========================================");
    info!("   HG01 Capture - Vingnut soil meter");
    info!("===========================================");

    let config = Config::from_env();

    info!("Configuration:");
    match &config.source {
        InputSource::Stdin => info!("  Input: stdin"),
        InputSource::File(path) => info!("  Input: {}", path.display()),
        InputSource::Command { program, args } => {
            info!("  Input: {} {}", program, args.join(" "))
        }
    }
    info!("  Output: {:?}", config.output);
    info!("  Stats interval: {} s", config.stats_interval_secs);
    info!("  Registered: {}", VINGNUT_HG01);

    let stats_interval = Duration::from_secs(config.stats_interval_secs);
    let stdout = std::io::stdout();

    match config.output {
        OutputFormat::Json => run(&config, JsonSink::new(stdout.lock()), stats_interval).await,
        OutputFormat::Kv => run(&config, KvSink::new(stdout.lock()), stats_interval).await,
    }
}

async fn run<S: ReadingSink>(config: &Config, sink: S, stats_interval: Duration) -> Result<()> {
    let (capture_tx, capture_rx) = mpsc::channel::<Capture>(config.channel_capacity);

    let runner = CaptureRunner::new(config.source.clone());
    let runner_handle = tokio::spawn(async move {
        if let Err(e) = runner.run(capture_tx).await {
            error!("Capture runner failed: {:#}", e);
        }
    });

    let mut manager = DeviceManager::new(sink, stats_interval);
    tokio::select! {
        result = manager.run(capture_rx) => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    runner_handle.abort();
    info!("Shutdown complete");
    Ok(())
}
