//! On-chain scanning of RFQ events across a route.
//!
//! Quotes are correlated by their hash: `SrcDeposited`, `SrcReleased` and
//! `Refunded` on the source chain, `DstTransferred` and `RefundInitiated` on
//! the destination chain.

use crate::pending::{classify, PendingQuote, RouteHistory};
use alloy_contract::private::Provider;
use binding::{IRfq, Quote};
use config::RouteConfig;
use quote::QuoteHash;
use std::future::Future;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, warn};

/// Maximum block range per `eth_getLogs` request.
const CHUNK_SIZE: u64 = 9_500;

/// Provider for querying pending quotes across the source and destination chains.
pub struct QuoteStateProvider<P1, P2> {
    src_provider: P1,
    dst_provider: P2,
    route: RouteConfig,
}

impl<P1, P2> QuoteStateProvider<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    pub const fn new(src_provider: P1, dst_provider: P2, route: RouteConfig) -> Self {
        Self {
            src_provider,
            dst_provider,
            route,
        }
    }

    /// Get all quotes deposited within the lookback window whose escrow has
    /// not been released or refunded yet.
    pub async fn get_pending_quotes(&self, lookback_secs: u64) -> eyre::Result<Vec<PendingQuote>> {
        let history = self.get_history(lookback_secs).await?;
        let pending = classify(&history);

        debug!(
            deposits = history.deposits.len(),
            pending = pending.len(),
            "Pending quotes after classification"
        );

        Ok(pending)
    }

    /// Collect the RFQ events of both chains within the lookback window.
    pub async fn get_history(&self, lookback_secs: u64) -> eyre::Result<RouteHistory> {
        let src_lookback_blocks = self.route.src.blocks_for(lookback_secs);
        let dst_lookback_blocks = self.route.dst.blocks_for(lookback_secs);

        let src_current_block = self.src_provider.get_block_number().await?;
        let dst_current_block = self.dst_provider.get_block_number().await?;

        let src_from_block = src_current_block.saturating_sub(src_lookback_blocks);
        let dst_from_block = dst_current_block.saturating_sub(dst_lookback_blocks);

        debug!(
            src_from = src_from_block,
            src_to = src_current_block,
            dst_from = dst_from_block,
            dst_to = dst_current_block,
            lookback_secs,
            "Scanning for pending quotes"
        );

        let mut history = RouteHistory::default();

        history.deposits = scan_chunks(
            "SrcDeposited",
            src_from_block,
            src_current_block,
            |from, to| self.scan_deposits(from, to),
        )
        .await?;

        if history.deposits.is_empty() {
            debug!("No deposits found in range");
            return Ok(history);
        }

        history.released = scan_chunks(
            "SrcReleased",
            src_from_block,
            src_current_block,
            |from, to| self.scan_released(from, to),
        )
        .await?
        .into_iter()
        .collect();

        history.refunded = scan_chunks(
            "Refunded",
            src_from_block,
            src_current_block,
            |from, to| self.scan_refunded(from, to),
        )
        .await?
        .into_iter()
        .collect();

        history.transferred = scan_chunks(
            "DstTransferred",
            dst_from_block,
            dst_current_block,
            |from, to| self.scan_transferred(from, to),
        )
        .await?
        .into_iter()
        .collect();

        history.refund_requested = scan_chunks(
            "RefundInitiated",
            dst_from_block,
            dst_current_block,
            |from, to| self.scan_refund_initiated(from, to),
        )
        .await?
        .into_iter()
        .collect();

        Ok(history)
    }

    /// Deposits on the source chain that are routed to the destination chain.
    async fn scan_deposits(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> eyre::Result<Vec<(QuoteHash, Quote, u64)>> {
        let contract = IRfq::new(self.route.src.rfq, &self.src_provider);

        let events = contract
            .SrcDeposited_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await?;

        let deposits = events
            .into_iter()
            .filter(|(event, _)| event.detail.dstChainId == self.route.dst.chain_id)
            .map(|(event, log)| (event.hash, event.detail, log.block_number.unwrap_or_default()))
            .collect();

        Ok(deposits)
    }

    async fn scan_released(&self, from_block: u64, to_block: u64) -> eyre::Result<Vec<QuoteHash>> {
        let contract = IRfq::new(self.route.src.rfq, &self.src_provider);

        let events = contract
            .SrcReleased_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await?;

        Ok(events.into_iter().map(|(event, _)| event.hash).collect())
    }

    async fn scan_refunded(&self, from_block: u64, to_block: u64) -> eyre::Result<Vec<QuoteHash>> {
        let contract = IRfq::new(self.route.src.rfq, &self.src_provider);

        let events = contract
            .Refunded_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await?;

        Ok(events.into_iter().map(|(event, _)| event.hash).collect())
    }

    async fn scan_transferred(&self, from_block: u64, to_block: u64) -> eyre::Result<Vec<QuoteHash>> {
        let contract = IRfq::new(self.route.dst.rfq, &self.dst_provider);

        let events = contract
            .DstTransferred_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await?;

        Ok(events.into_iter().map(|(event, _)| event.hash).collect())
    }

    async fn scan_refund_initiated(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> eyre::Result<Vec<QuoteHash>> {
        let contract = IRfq::new(self.route.dst.rfq, &self.dst_provider);

        let events = contract
            .RefundInitiated_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await?;

        Ok(events.into_iter().map(|(event, _)| event.hash).collect())
    }
}

/// Scan `[from_block, to_block]` in chunks, retrying each chunk with backoff.
async fn scan_chunks<T, F, Fut>(
    event: &'static str,
    from_block: u64,
    to_block: u64,
    mut scan_chunk: F,
) -> eyre::Result<Vec<T>>
where
    F: FnMut(u64, u64) -> Fut,
    Fut: Future<Output = eyre::Result<Vec<T>>>,
{
    let mut all = Vec::new();

    for (from, to) in chunk_ranges(from_block, to_block) {
        let retry_strategy = ExponentialBackoff::from_millis(100).take(5);

        let chunk = Retry::spawn(retry_strategy, || {
            let scan = scan_chunk(from, to);
            async move {
                scan.await.map_err(|e| {
                    warn!(event, from, to, error = %e, "Chunk scan failed, will retry");
                    e
                })
            }
        })
        .await?;

        all.extend(chunk);
    }

    Ok(all)
}

/// Inclusive block ranges of at most `CHUNK_SIZE` blocks covering `[from_block, to_block]`.
fn chunk_ranges(from_block: u64, to_block: u64) -> Vec<(u64, u64)> {
    let mut ranges = Vec::new();
    let mut current = from_block;

    while current <= to_block {
        let chunk_end = (current + CHUNK_SIZE - 1).min(to_block);
        ranges.push((current, chunk_end));
        current = chunk_end + 1;
    }

    ranges
}

/// Convenience function to get pending quotes without creating a provider struct.
pub async fn get_pending_quotes<P1, P2>(
    src_provider: P1,
    dst_provider: P2,
    route: RouteConfig,
    lookback_secs: u64,
) -> eyre::Result<Vec<PendingQuote>>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    let provider = QuoteStateProvider::new(src_provider, dst_provider, route);
    provider.get_pending_quotes(lookback_secs).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use alloy_provider::{network::Ethereum, RootProvider};
    use config::{ChainConfig, RouteConfigBuilder};

    #[derive(Clone)]
    struct MockProvider;

    impl Provider for MockProvider {
        fn root(&self) -> &RootProvider<Ethereum> {
            todo!()
        }
    }

    #[test]
    fn test_chunk_ranges() {
        assert_eq!(chunk_ranges(0, 0), vec![(0, 0)]);
        assert_eq!(chunk_ranges(10, 5), vec![]);
        assert_eq!(
            chunk_ranges(100, 20_000),
            vec![(100, 9_599), (9_600, 19_099), (19_100, 20_000)]
        );
    }

    #[tokio::test]
    async fn test_scan_chunks_retries_failed_chunk() {
        let mut attempts = 0;

        let found = scan_chunks("Test", 0, 9_499, |from, to| {
            attempts += 1;
            let fail = attempts == 1;
            async move {
                if fail {
                    eyre::bail!("transient");
                }
                Ok(vec![(from, to)])
            }
        })
        .await
        .unwrap();

        assert_eq!(found, vec![(0, 9_499)]);
        assert_eq!(attempts, 2);
    }

    #[test]
    fn test_provider_creation() {
        let route = RouteConfigBuilder::new(ChainConfig::ethereum(), ChainConfig::optimism())
            .src_rfq(Address::repeat_byte(0xa1))
            .dst_rfq(Address::repeat_byte(0xa2))
            .build()
            .unwrap();

        let provider = QuoteStateProvider::new(MockProvider, MockProvider, route);
        assert_eq!(provider.route.src.rfq, Address::repeat_byte(0xa1));
        assert_eq!(provider.route.dst.chain_id, 10);
    }
}
