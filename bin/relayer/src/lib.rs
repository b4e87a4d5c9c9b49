pub mod config;
pub mod metrics;

use crate::{config::Config, metrics::Metrics};
use ::config::FeeConfig;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use client::RfqReader;
use quote::QuoteHash;
use serde::Serialize;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};
use tracker::{escrowed_totals, NextStep, PendingQuote, QuoteStateProvider};

/// Pending quotes grouped by what they are waiting for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub awaiting_transfer: Vec<QuoteHash>,
    pub request_refund: Vec<QuoteHash>,
    pub release: Vec<QuoteHash>,
    pub execute_refund: Vec<QuoteHash>,
    pub escrowed: Vec<(Address, U256)>,
}

impl Report {
    pub fn build(pending: &[PendingQuote], now: u64) -> Self {
        let mut report = Self::default();

        for quote in pending {
            let bucket = match quote.next_step(now) {
                NextStep::AwaitTransfer => &mut report.awaiting_transfer,
                NextStep::RequestRefund => &mut report.request_refund,
                NextStep::Release => &mut report.release,
                NextStep::ExecuteRefund => &mut report.execute_refund,
            };
            bucket.push(quote.hash);
        }

        let mut escrowed: Vec<_> = escrowed_totals(pending).into_iter().collect();
        escrowed.sort();
        report.escrowed = escrowed;

        report
    }

    /// Quotes a relayer can act on right now.
    pub fn actionable(&self) -> usize {
        self.request_refund.len() + self.release.len() + self.execute_refund.len()
    }

    pub fn total(&self) -> usize {
        self.awaiting_transfer.len() + self.actionable()
    }
}

pub fn unix_now() -> eyre::Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

/// Scan the route once and report pending quotes.
pub async fn run_cycle<P1, P2>(
    src_provider: &P1,
    dst_provider: &P2,
    config: &Config,
    metrics: &Metrics,
) -> eyre::Result<Report>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    let state =
        QuoteStateProvider::new(src_provider.clone(), dst_provider.clone(), config.route);
    let pending = state.get_pending_quotes(config.lookback_secs).await?;
    let report = Report::build(&pending, unix_now()?);

    metrics.set_pending_quotes("await_transfer", report.awaiting_transfer.len());
    metrics.set_pending_quotes("request_refund", report.request_refund.len());
    metrics.set_pending_quotes("release", report.release.len());
    metrics.set_pending_quotes("execute_refund", report.execute_refund.len());
    for (token, amount) in &report.escrowed {
        let amount = u128::try_from(*amount).unwrap_or(u128::MAX);
        metrics.set_escrowed_amount(&token.to_string(), amount);
    }

    for hash in &report.release {
        info!(hash = %hash, "Quote transferred, ready for release");
    }
    for hash in &report.request_refund {
        info!(hash = %hash, "Quote expired unfilled, refund can be requested");
    }
    for hash in &report.execute_refund {
        info!(hash = %hash, "Refund requested, ready for execution");
    }

    info!(
        pending = report.total(),
        actionable = report.actionable(),
        "Report cycle complete"
    );

    Ok(report)
}

/// Run report cycles every poll interval until `shutdown` fires.
pub async fn report_loop<P1, P2>(
    src_provider: &P1,
    dst_provider: &P2,
    config: &Config,
    metrics: &Metrics,
    mut shutdown: watch::Receiver<bool>,
) -> eyre::Result<()>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    let mut interval = tokio::time::interval(config.poll_interval());

    loop {
        tokio::select! {
            biased;

            _ = shutdown.changed() => break,
            _ = interval.tick() => {}
        }

        let start = Instant::now();
        match run_cycle(src_provider, dst_provider, config, metrics).await {
            Ok(_) => metrics.record_cycle(true, start.elapsed()),
            Err(e) => {
                error!(error = %e, "Report cycle failed");
                metrics.record_cycle(false, start.elapsed());
            }
        }
    }

    debug!("Report loop stopped");
    Ok(())
}

/// Log and count every RFQ event emitted after `from_block` until `shutdown` fires.
pub async fn watch_events<P>(
    chain: &str,
    provider: P,
    rfq: Address,
    from_block: u64,
    poll_interval: Duration,
    shutdown: watch::Receiver<bool>,
    metrics: &Metrics,
) -> eyre::Result<()>
where
    P: Provider + Clone + 'static,
{
    let stream = client::event_stream(provider, rfq, from_block, poll_interval, shutdown);
    tokio::pin!(stream);

    while let Some(item) = stream.next().await {
        match item {
            Ok(log) => {
                info!(
                    chain,
                    event = log.name(),
                    hash = ?log.quote_hash(),
                    block = ?log.block_number,
                    "RFQ event"
                );
                metrics.record_event(chain, log.name());
            }
            Err(e) => {
                warn!(chain, error = %e, "Event stream poll failed");
                metrics.record_stream_error(chain);
            }
        }
    }

    debug!(chain, "Event stream closed");
    Ok(())
}

/// Check that the RFQ contract holds at least the escrow reported for each token.
///
/// Returns the tokens whose on-chain balance falls short.
pub async fn check_escrow_balances<P>(
    reader: &RfqReader<P>,
    report: &Report,
) -> eyre::Result<Vec<Address>>
where
    P: Provider + Clone,
{
    let mut short = Vec::new();

    for (token, escrowed) in &report.escrowed {
        let held = reader.token_balance(*token, reader.address()).await?;
        if held < *escrowed {
            warn!(
                token = %token,
                held = %held,
                escrowed = %escrowed,
                "RFQ holds less than its escrow"
            );
            short.push(*token);
        } else {
            debug!(token = %token, held = %held, "Escrow balance covered");
        }
    }

    Ok(short)
}

/// Compare the contract's fee policy for `dst_chain_id` with the expected one.
///
/// Returns `false` and logs the difference when they disagree.
pub async fn check_fee_policy<P>(
    reader: &RfqReader<P>,
    expected: &FeeConfig,
    dst_chain_id: u64,
) -> eyre::Result<bool>
where
    P: Provider + Clone,
{
    let global = reader.fee_perc_global().await?;
    let chain_override = reader.fee_perc_override(dst_chain_id).await?;
    let expected_override = expected
        .overrides
        .iter()
        .find(|o| o.chain_id == dst_chain_id)
        .map_or(0, |o| o.perc);

    let matches = global == expected.global_perc && chain_override == expected_override;
    if !matches {
        warn!(
            dst_chain_id,
            global,
            chain_override,
            expected_global = expected.global_perc,
            expected_override,
            "On-chain fee policy differs from configuration"
        );
    }

    Ok(matches)
}
