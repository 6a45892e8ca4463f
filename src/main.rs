use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use perfrig::config::{self, load_config, load_config_from_path};
use perfrig::logging;
use perfrig::sampler::{CsvLogSink, IntervalTicker, Sampler, StopHandle};
use perfrig::system::Collector;

#[derive(Parser)]
#[command(
    name = "perfrig",
    about = "Continuously sample host CPU utilization into an append-only CSV log"
)]
struct Cli {
    /// Log file to append one CSV line per tick to (created if absent)
    outfile: PathBuf,

    /// Sampling interval in milliseconds
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level or filter directive, e.g. `debug` or `perfrig=trace`
    #[arg(long)]
    log_level: Option<String>,

    /// Emit diagnostics as JSON lines on stderr
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    logging::init_tracing(&config.logging)?;

    run(&cli, &config).await
}

async fn run(cli: &Cli, config: &config::Config) -> Result<()> {
    let sink = CsvLogSink::open(&cli.outfile, &config.sink)
        .wrap_err_with(|| format!("cannot open {}", cli.outfile.display()))?;
    let mut sampler = Sampler::new(Collector::new(), sink);
    let mut ticker = IntervalTicker::from_config(&config.sampler);

    sampler.start()?;
    tracing::info!(
        outfile = %cli.outfile.display(),
        interval_ms = config.sampler.interval_ms,
        "sampling until interrupted"
    );
    tokio::spawn(stop_on_signal(sampler.stop_handle()));

    let summary = sampler.run(&mut ticker).await?;
    tracing::info!(
        records = summary.records,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "utilization log closed"
    );
    Ok(())
}

/// Request a stop on Ctrl-C or SIGTERM. The tick already scheduled still runs.
async fn stop_on_signal(handle: StopHandle) {
    if let Err(err) = shutdown_signal().await {
        tracing::error!(error = %err, "cannot listen for shutdown signals");
        return;
    }
    tracing::info!("stop requested, finishing the pending tick");
    if let Err(err) = handle.stop() {
        tracing::warn!(error = %err, "stop request rejected");
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    config.sampler.interval_ms = cli.interval_ms;
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.log_json {
        config.logging.json = true;
    }

    config
}
