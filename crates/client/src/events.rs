//! Decoded RFQ events and a live event stream.

use crate::ClientError;
use alloy_contract::private::Provider;
use alloy_primitives::{Address, B256};
use alloy_rpc_types_eth::{Filter, Log};
use alloy_sol_types::SolEventInterface;
use binding::IRfq::IRfqEvents;
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::Stream;
use tracing::{debug, warn};

/// Maximum block range requested per `eth_getLogs` call.
pub const CHUNK_SIZE: u64 = 9_500;

/// An RFQ event together with its position on chain.
pub struct RfqLog {
    pub event: IRfqEvents,
    pub block_number: Option<u64>,
    pub tx_hash: Option<B256>,
    pub log_index: Option<u64>,
}

impl RfqLog {
    /// Solidity name of the event.
    pub const fn name(&self) -> &'static str {
        match &self.event {
            IRfqEvents::SrcDeposited(_) => "SrcDeposited",
            IRfqEvents::SrcReleased(_) => "SrcReleased",
            IRfqEvents::DstTransferred(_) => "DstTransferred",
            IRfqEvents::RefundInitiated(_) => "RefundInitiated",
            IRfqEvents::Refunded(_) => "Refunded",
            IRfqEvents::MessageReceived(_) => "MessageReceived",
            IRfqEvents::FeeCollected(_) => "FeeCollected",
            IRfqEvents::FeePercUpdated(_) => "FeePercUpdated",
            IRfqEvents::RfqContractsUpdated(_) => "RfqContractsUpdated",
            IRfqEvents::TreasuryAddrUpdated(_) => "TreasuryAddrUpdated",
            IRfqEvents::MessageBusUpdated(_) => "MessageBusUpdated",
            IRfqEvents::Paused(_) => "Paused",
            IRfqEvents::Unpaused(_) => "Unpaused",
            IRfqEvents::PauserAdded(_) => "PauserAdded",
            IRfqEvents::PauserRemoved(_) => "PauserRemoved",
            IRfqEvents::OwnershipTransferred(_) => "OwnershipTransferred",
        }
    }

    /// Quote hash carried by settlement events.
    pub const fn quote_hash(&self) -> Option<B256> {
        match &self.event {
            IRfqEvents::SrcDeposited(e) => Some(e.hash),
            IRfqEvents::SrcReleased(e) => Some(e.hash),
            IRfqEvents::DstTransferred(e) => Some(e.hash),
            IRfqEvents::RefundInitiated(e) => Some(e.hash),
            IRfqEvents::Refunded(e) => Some(e.hash),
            _ => None,
        }
    }
}

/// Decode RFQ events, skipping logs emitted by anything else.
pub fn decode_logs(logs: Vec<Log>) -> Vec<RfqLog> {
    logs.into_iter()
        .filter_map(|log| match IRfqEvents::decode_log(&log.inner) {
            Ok(decoded) => Some(RfqLog {
                event: decoded.data,
                block_number: log.block_number,
                tx_hash: log.transaction_hash,
                log_index: log.log_index,
            }),
            Err(e) => {
                debug!(tx_hash = ?log.transaction_hash, error = %e, "Skipping undecodable log");
                None
            }
        })
        .collect()
}

/// Follow the contract's events starting at `from_block`.
///
/// The stream is lazy: nothing is requested until it is polled. It polls the
/// head every `poll_interval`, yields each new event in chain order and ends
/// once `shutdown` flips to `true` or its sender is dropped. A failed request
/// is yielded as an error and retried on the next tick from the same block.
pub fn event_stream<P>(
    provider: P,
    address: Address,
    from_block: u64,
    poll_interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> impl Stream<Item = Result<RfqLog, ClientError>>
where
    P: Provider + Clone + 'static,
{
    async_stream::stream! {
        let mut next = from_block;
        let mut ticker = tokio::time::interval(poll_interval);

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() {
                        debug!("Shutdown sender dropped, closing event stream");
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            let head = match provider.get_block_number().await {
                Ok(head) => head,
                Err(e) => {
                    warn!(error = %e, "Failed to fetch head block");
                    yield Err(ClientError::Connection(e.to_string()));
                    continue;
                }
            };

            while next <= head {
                let to = head.min(next + CHUNK_SIZE - 1);
                let filter = Filter::new()
                    .address(address)
                    .from_block(next)
                    .to_block(to);

                match provider.get_logs(&filter).await {
                    Ok(logs) => {
                        debug!(from = next, to, count = logs.len(), "Fetched RFQ logs");
                        for log in decode_logs(logs) {
                            yield Ok(log);
                        }
                        next = to + 1;
                    }
                    Err(e) => {
                        warn!(from = next, to, error = %e, "Failed to fetch logs, will retry");
                        yield Err(ClientError::Connection(e.to_string()));
                        break;
                    }
                }
            }
        }
    }
}
