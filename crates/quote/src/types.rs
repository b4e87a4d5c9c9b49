use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type QuoteHash = B256;

/// Escrow lifecycle of a quote on its source chain.
///
/// A quote without a record is unknown to the source chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowStatus {
    Deposited,
    Released,
    Refunded,
}

impl EscrowStatus {
    /// Released and refunded escrows have paid out and are final.
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Released | Self::Refunded)
    }
}

/// Execution record of a quote on its destination chain.
///
/// Either variant counts as "executed": the quote can never be transferred
/// or refunded again on that chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DstStatus {
    Transferred,
    RefundRequested,
}

/// Kind of message exchanged between RFQ contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageKind {
    /// Source to destination: the quote was deposited
    Deposit = 0,
    /// Destination to source: the receiver was paid
    Release = 1,
    /// Destination to source: the quote expired unfilled
    Refund = 2,
}

impl MessageKind {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => f.write_str("deposit"),
            Self::Release => f.write_str("release"),
            Self::Refund => f.write_str("refund"),
        }
    }
}

/// Combined view of a quote across both chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteStatus {
    /// Escrowed on the source chain, nothing happened on the destination yet
    Deposited,
    /// Paid on the destination chain, escrow awaiting release
    Transferred,
    /// Expired on the destination chain, escrow awaiting refund
    RefundRequested,
    /// Escrow released to the liquidity provider
    Released,
    /// Escrow returned to the refund address
    Refunded,
}

impl QuoteStatus {
    /// Combine the source escrow record with the destination record.
    pub const fn from_records(escrow: EscrowStatus, dst: Option<DstStatus>) -> Self {
        match (escrow, dst) {
            (EscrowStatus::Released, _) => Self::Released,
            (EscrowStatus::Refunded, _) => Self::Refunded,
            (EscrowStatus::Deposited, None) => Self::Deposited,
            (EscrowStatus::Deposited, Some(DstStatus::Transferred)) => Self::Transferred,
            (EscrowStatus::Deposited, Some(DstStatus::RefundRequested)) => Self::RefundRequested,
        }
    }

    /// Whether the escrow still holds the quote's source amount.
    pub const fn is_pending(self) -> bool {
        !matches!(self, Self::Released | Self::Refunded)
    }

    /// The message the source chain needs to settle this quote, if any.
    pub const fn awaiting(self) -> Option<MessageKind> {
        match self {
            Self::Transferred => Some(MessageKind::Release),
            Self::RefundRequested => Some(MessageKind::Refund),
            _ => None,
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Deposited => "deposited",
            Self::Transferred => "transferred",
            Self::RefundRequested => "refund_requested",
            Self::Released => "released",
            Self::Refunded => "refunded",
        };
        f.write_str(s)
    }
}
