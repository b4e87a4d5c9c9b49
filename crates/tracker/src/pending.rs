//! Classification of deposits into their settlement stage.

use alloy_primitives::{Address, U256};
use binding::Quote;
use quote::{DstStatus, EscrowStatus, QuoteExt, QuoteHash, QuoteStatus};
use std::collections::{HashMap, HashSet};

/// A deposit whose escrow has not paid out yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuote {
    pub hash: QuoteHash,
    pub quote: Quote,
    pub status: QuoteStatus,
    /// Source-chain block of the deposit
    pub block_number: u64,
}

/// What has to happen next for a pending quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// The liquidity provider may still fill the quote on the destination chain
    AwaitTransfer,
    /// Deadline passed without a transfer; request a refund on the destination chain
    RequestRefund,
    /// Relay the release message and call `srcRelease`
    Release,
    /// Relay the refund message and call `executeRefund` once the deadline passed
    ExecuteRefund,
}

impl PendingQuote {
    pub fn next_step(&self, now: u64) -> NextStep {
        match self.status {
            QuoteStatus::Transferred => NextStep::Release,
            QuoteStatus::RefundRequested => NextStep::ExecuteRefund,
            _ if self.quote.is_expired(now) => NextStep::RequestRefund,
            _ => NextStep::AwaitTransfer,
        }
    }
}

/// RFQ events seen on both chains of a route within a lookback window.
#[derive(Debug, Clone, Default)]
pub struct RouteHistory {
    /// `SrcDeposited` on the source chain, with their block numbers
    pub deposits: Vec<(QuoteHash, Quote, u64)>,
    /// `SrcReleased` on the source chain
    pub released: HashSet<QuoteHash>,
    /// `Refunded` on the source chain
    pub refunded: HashSet<QuoteHash>,
    /// `DstTransferred` on the destination chain
    pub transferred: HashSet<QuoteHash>,
    /// `RefundInitiated` on the destination chain
    pub refund_requested: HashSet<QuoteHash>,
}

impl RouteHistory {
    fn escrow(&self, hash: &QuoteHash) -> EscrowStatus {
        if self.released.contains(hash) {
            EscrowStatus::Released
        } else if self.refunded.contains(hash) {
            EscrowStatus::Refunded
        } else {
            EscrowStatus::Deposited
        }
    }

    fn dst(&self, hash: &QuoteHash) -> Option<DstStatus> {
        if self.transferred.contains(hash) {
            Some(DstStatus::Transferred)
        } else if self.refund_requested.contains(hash) {
            Some(DstStatus::RefundRequested)
        } else {
            None
        }
    }
}

/// Deposits from `history` that still hold funds, ordered by deposit block.
pub fn classify(history: &RouteHistory) -> Vec<PendingQuote> {
    let mut pending: Vec<PendingQuote> = history
        .deposits
        .iter()
        .map(|(hash, quote, block_number)| PendingQuote {
            hash: *hash,
            quote: quote.clone(),
            status: QuoteStatus::from_records(history.escrow(hash), history.dst(hash)),
            block_number: *block_number,
        })
        .filter(|p| p.status.is_pending())
        .collect();

    pending.sort_by_key(|p| p.block_number);
    pending
}

/// Escrowed source amount per token across `pending`.
pub fn escrowed_totals(pending: &[PendingQuote]) -> HashMap<Address, U256> {
    let mut totals = HashMap::new();
    for p in pending {
        *totals.entry(p.quote.srcToken).or_insert(U256::ZERO) += p.quote.srcAmount;
    }
    totals
}
