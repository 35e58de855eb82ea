use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use refundbook::app;
use refundbook::clock::{Clock, SystemClock};
use refundbook::config::{default_config_path, ConfigFileSettings, ResolvedConfig};
use refundbook::duration::format_interval;
use refundbook::models::{Channel, RefundStatus};
use refundbook::scan::{BackgroundScanner, Importer, TracingNotifier};
use refundbook::storage::{JsonFileStorage, Storage};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Delay before the daemon's first cycle.
const DAEMON_STARTUP_DELAY: Duration = Duration::from_secs(5);

fn parse_channel(s: &str) -> Result<Channel, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn parse_status(s: &str) -> Result<RefundStatus, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

#[derive(Parser)]
#[command(name = "refundbook")]
#[command(about = "Track refunds found in SMS and email")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract refund fields from a single message
    Extract {
        #[arg(long, value_parser = parse_channel)]
        channel: Channel,
        /// Phone number (SMS) or From header (email)
        #[arg(long, default_value = "")]
        sender: String,
        #[arg(long)]
        text: String,
    },
    /// Scan a channel and print what was found
    Scan {
        #[arg(long, value_parser = parse_channel)]
        channel: Channel,
        /// Only messages at or after this epoch-milliseconds timestamp
        #[arg(long)]
        since: Option<i64>,
    },
    /// Scan a channel and save every result as a refund record
    Import {
        #[arg(long, value_parser = parse_channel)]
        channel: Channel,
        #[arg(long)]
        since: Option<i64>,
    },
    /// Run one background scan cycle
    AutoScan,
    /// Run background scan cycles on the configured interval until Ctrl-C
    Daemon,
    /// List stored refund records
    List {
        #[arg(long, value_parser = parse_status)]
        status: Option<RefundStatus>,
        /// Include soft-deleted records
        #[arg(long)]
        include_deleted: bool,
    },
    /// Show current configuration
    Config,
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn background_scanner(
    cli: &Cli,
    orchestrator: Arc<refundbook::scan::ScanOrchestrator>,
    storage: Arc<JsonFileStorage>,
    clock: Arc<dyn Clock>,
) -> BackgroundScanner {
    let storage: Arc<dyn Storage> = storage;
    BackgroundScanner::new(
        orchestrator,
        storage,
        Arc::new(ConfigFileSettings::new(&cli.config)),
    )
    .with_notifier(Arc::new(TracingNotifier))
    .with_clock(clock)
}

async fn run_daemon(scanner: &BackgroundScanner, interval: Duration) -> Result<()> {
    info!(
        interval = %format_interval(interval),
        "refundbook daemon started"
    );

    let mut ticker =
        tokio::time::interval_at(tokio::time::Instant::now() + DAEMON_STARTUP_DELAY, interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match scanner.perform_scan().await {
                    Ok(outcome) => {
                        info!(outcome = %serde_json::to_string(&outcome)?, "scan cycle finished");
                    }
                    Err(err) => {
                        warn!(error = %format!("{err:#}"), "scan cycle failed");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("refundbook daemon stopping");
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .json(),
        )
        .init();

    let cli = Cli::parse();

    let config = ResolvedConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load refundbook config: {}", cli.config.display()))?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let storage = Arc::new(JsonFileStorage::new(&config.data_dir));
    let orchestrator = Arc::new(app::build_orchestrator(
        &config,
        Arc::clone(&storage),
        Arc::clone(&clock),
    ));

    match &cli.command {
        Command::Extract {
            channel,
            sender,
            text,
        } => print_json(&app::extract_text(*channel, sender, text))?,
        Command::Scan { channel, since } => {
            print_json(&app::scan_channel(&orchestrator, *channel, *since).await?)?
        }
        Command::Import { channel, since } => {
            let importer = Importer::new();
            let output =
                app::import_channel(storage.as_ref(), &orchestrator, &importer, *channel, *since)
                    .await?;
            print_json(&output)?
        }
        Command::AutoScan => {
            let scanner = background_scanner(&cli, orchestrator, storage, clock);
            print_json(&app::auto_scan(&scanner).await?)?
        }
        Command::Daemon => {
            if !config.scan.auto_scan_enabled {
                warn!(
                    config = %cli.config.display(),
                    "auto scan is disabled; set scan.auto_scan_enabled = true"
                );
                return Ok(());
            }
            let scanner = background_scanner(&cli, orchestrator, storage, clock);
            run_daemon(&scanner, config.scan.interval).await?
        }
        Command::List {
            status,
            include_deleted,
        } => print_json(&app::list_records(storage.as_ref(), *status, *include_deleted).await?)?,
        Command::Config => print_json(&app::config_output(&cli.config, &config))?,
    }

    Ok(())
}
