//! RFQ relayer.
//!
//! - `report`: scan the route once and list quotes that are ready for release or refund
//! - `watch`: follow RFQ events on both chains and report on every poll interval

use alloy_provider::Provider;
use clap::{Parser, Subcommand};
use client::RfqReader;
use relayer::{
    check_escrow_balances, check_fee_policy, config::Config, metrics, metrics::Metrics,
    report_loop, run_cycle, watch_events,
};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relayer")]
#[command(about = "Track RFQ quotes across a source and destination chain")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "RELAYER_CONFIG", default_value = "config.toml")]
    config: String,

    /// Override the source chain RPC url
    #[arg(long, env = "SRC_RPC_URL")]
    src_rpc_url: Option<String>,

    /// Override the destination chain RPC url
    #[arg(long, env = "DST_RPC_URL")]
    dst_rpc_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "RELAYER_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan once and print the pending quotes
    Report {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow events and report until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let mut config = Config::from_file(&cli.config)?;
    if let Some(url) = cli.src_rpc_url {
        config.src_rpc_url = url;
    }
    if let Some(url) = cli.dst_rpc_url {
        config.dst_rpc_url = url;
    }

    info!("Loaded config:");
    info!("  Source chain: {}", config.route.src.chain_id);
    info!("  Source RFQ: {}", config.route.src.rfq);
    info!("  Destination chain: {}", config.route.dst.chain_id);
    info!("  Destination RFQ: {}", config.route.dst.rfq);
    info!("  Lookback: {}s", config.lookback_secs);

    let src_provider = client::create_provider(&config.src_rpc_url)?;
    let dst_provider = client::create_provider(&config.dst_rpc_url)?;

    if let Some(port) = config.metrics_port {
        metrics::install_prometheus_exporter(port)?;
        info!(port, "Prometheus exporter listening");
    }
    let metrics = Metrics::new();

    if let Some(fees) = &config.fees {
        let reader = RfqReader::new(src_provider.clone(), config.route.src.rfq);
        if !check_fee_policy(&reader, fees, config.route.dst.chain_id).await? {
            warn!("Continuing with the on-chain fee policy");
        }
    }

    match cli.command {
        Command::Report { json } => {
            let report = run_cycle(&src_provider, &dst_provider, &config, &metrics).await?;

            let reader = RfqReader::new(src_provider.clone(), config.route.src.rfq);
            let short = check_escrow_balances(&reader, &report).await?;
            if !short.is_empty() {
                warn!(tokens = ?short, "Escrow not fully covered");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("awaiting transfer: {}", report.awaiting_transfer.len());
            for (step, hashes) in [
                ("release", &report.release),
                ("request refund", &report.request_refund),
                ("execute refund", &report.execute_refund),
            ] {
                println!("{step}: {}", hashes.len());
                for hash in hashes {
                    println!("  {hash}");
                }
            }
            for (token, amount) in &report.escrowed {
                println!("escrowed {token}: {amount}");
            }
        }
        Command::Watch => {
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Shutdown requested");
                }
                let _ = shutdown_tx.send(true);
            });

            let src_head = src_provider.get_block_number().await?;
            let dst_head = dst_provider.get_block_number().await?;
            info!(src_head, dst_head, "Watching for RFQ events");

            tokio::try_join!(
                watch_events(
                    "src",
                    src_provider.clone(),
                    config.route.src.rfq,
                    src_head,
                    config.poll_interval(),
                    shutdown_rx.clone(),
                    &metrics,
                ),
                watch_events(
                    "dst",
                    dst_provider.clone(),
                    config.route.dst.rfq,
                    dst_head,
                    config.poll_interval(),
                    shutdown_rx.clone(),
                    &metrics,
                ),
                report_loop(&src_provider, &dst_provider, &config, &metrics, shutdown_rx),
            )?;

            info!("Relayer stopped");
        }
    }

    Ok(())
}
