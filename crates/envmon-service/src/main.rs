//! envmon service - telemetry in on stdin, indicator lines out on stdout.
//!
//! Run with: `cargo run -p envmon-service -- --simulate 4`

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use envmon_core::Monitor;
use envmon_service::config::default_config_path;
use envmon_service::emitter::{self, DEFAULT_QUEUE_CAPACITY};
use envmon_service::{AppState, Config, Scheduler, WriterSink, dispatch, simulator};

/// envmon service - aggregates probe telemetry into per-area indicator levels.
#[derive(Parser, Debug)]
#[command(name = "envmon-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fast tick interval in milliseconds (overrides config).
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Diagnostic summary interval in seconds (overrides config).
    #[arg(long)]
    diagnostic_secs: Option<u64>,

    /// Feed readings from this many simulated probes.
    #[arg(long, value_name = "N")]
    simulate: Option<usize>,

    /// Write accepted configuration commands back to the config file.
    #[arg(long)]
    persist: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries indicator lines only.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("envmon_service=info".parse()?)
                .add_directive("envmon_core=info".parse()?),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_else(|e| {
            warn!("Ignoring default configuration: {}", e);
            Config::default()
        }),
    };

    if let Some(tick_ms) = args.tick_ms {
        config.scheduler.tick_interval_ms = tick_ms;
    }
    if let Some(diagnostic_secs) = args.diagnostic_secs {
        config.scheduler.diagnostic_interval_secs = diagnostic_secs;
    }
    config.validate()?;

    let mut monitor = Monitor::new(config.monitor_config())?;
    let simulated = args
        .simulate
        .map(|count| simulator::bind_simulated_probes(&mut monitor, count));

    let persist_path = args
        .persist
        .then(|| args.config.clone().unwrap_or_else(default_config_path));
    if let Some(path) = &persist_path {
        info!("Persisting configuration changes to {:?}", path);
    }

    let scheduler_config = config.scheduler;
    let state = AppState::new(monitor, config, persist_path);
    let cancel = CancellationToken::new();

    let (tx, emitter) = emitter::channel(DEFAULT_QUEUE_CAPACITY, scheduler_config.emit_pacing());
    let emitter_handle = tokio::spawn(async move {
        let mut sink = WriterSink::new(tokio::io::stdout());
        emitter.run(&mut sink).await
    });

    let scheduler_handle =
        Scheduler::new(Arc::clone(&state), tx.clone(), &scheduler_config).start(cancel.clone());

    let simulation_handle = simulated.map(|probes| {
        simulator::spawn(
            Arc::clone(&state),
            probes,
            scheduler_config.tick_interval(),
            cancel.clone(),
        )
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                if let Err(e) = result {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                }
                info!("Shutting down");
                break;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if dispatch(&state, &tx, &line).await.is_err() {
                        warn!("Outbound queue closed");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Input closed, waiting for Ctrl-C");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    stdin_open = false;
                }
            },
        }
    }

    cancel.cancel();
    scheduler_handle.await?;
    if let Some(handle) = simulation_handle {
        handle.await?;
    }
    drop(tx);
    let sent = emitter_handle.await??;
    info!("Emitted {} line(s)", sent);

    Ok(())
}
