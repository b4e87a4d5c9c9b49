//! Ordered event journal and outbound message queue of an engine.

use alloy_primitives::{Address, Bytes, B256, U256};
use binding::{Quote, RouteInfo};
use quote::{MessageKind, QuoteHash};

/// Events mirroring the RFQ contract's logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RfqEvent {
    SrcDeposited {
        hash: QuoteHash,
        quote: Box<Quote>,
        src_recipient: Address,
        submission_deadline: u64,
    },
    SrcReleased {
        hash: QuoteHash,
        src_recipient: Address,
        src_token: Address,
        amount: U256,
    },
    DstTransferred {
        hash: QuoteHash,
    },
    RefundInitiated {
        hash: QuoteHash,
    },
    Refunded {
        hash: QuoteHash,
        refund_to: Address,
        src_token: Address,
        amount: U256,
    },
    MessageReceived {
        hash: B256,
    },
    FeeCollected {
        treasury: Address,
        token: Address,
        amount: U256,
    },
    FeePercUpdated {
        chain_ids: Vec<u64>,
        fee_percs: Vec<u32>,
    },
    RfqContractsUpdated {
        chain_ids: Vec<u64>,
        remote_rfq_contracts: Vec<Address>,
    },
    TreasuryAddrUpdated {
        treasury: Address,
    },
    MessageBusUpdated {
        message_bus: Address,
    },
    Paused {
        account: Address,
    },
    Unpaused {
        account: Address,
    },
    PauserAdded {
        account: Address,
    },
    PauserRemoved {
        account: Address,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

impl RfqEvent {
    /// Event name as it appears in the contract ABI.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SrcDeposited { .. } => "SrcDeposited",
            Self::SrcReleased { .. } => "SrcReleased",
            Self::DstTransferred { .. } => "DstTransferred",
            Self::RefundInitiated { .. } => "RefundInitiated",
            Self::Refunded { .. } => "Refunded",
            Self::MessageReceived { .. } => "MessageReceived",
            Self::FeeCollected { .. } => "FeeCollected",
            Self::FeePercUpdated { .. } => "FeePercUpdated",
            Self::RfqContractsUpdated { .. } => "RfqContractsUpdated",
            Self::TreasuryAddrUpdated { .. } => "TreasuryAddrUpdated",
            Self::MessageBusUpdated { .. } => "MessageBusUpdated",
            Self::Paused { .. } => "Paused",
            Self::Unpaused { .. } => "Unpaused",
            Self::PauserAdded { .. } => "PauserAdded",
            Self::PauserRemoved { .. } => "PauserRemoved",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }

    /// Quote the event refers to, for per-quote events.
    pub const fn quote_hash(&self) -> Option<QuoteHash> {
        match self {
            Self::SrcDeposited { hash, .. }
            | Self::SrcReleased { hash, .. }
            | Self::DstTransferred { hash }
            | Self::RefundInitiated { hash }
            | Self::Refunded { hash, .. } => Some(*hash),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub seq: u64,
    pub event: RfqEvent,
}

/// Append-only event journal. Sequence numbers start at 1.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub(crate) fn push(&mut self, event: RfqEvent) -> u64 {
        let seq = self.records.len() as u64 + 1;
        self.records.push(EventRecord { seq, event });
        seq
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sequence number of the newest event, 0 when empty.
    pub fn last_seq(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Events strictly after `cursor`.
    pub fn since(&self, cursor: u64) -> impl Iterator<Item = &EventRecord> {
        let start = usize::try_from(cursor)
            .unwrap_or(usize::MAX)
            .min(self.records.len());
        self.records[start..].iter()
    }
}

/// A message the engine asked the bus to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// RFQ contract that sent it
    pub sender: Address,
    pub src_chain_id: u64,
    pub dst_chain_id: u64,
    /// RFQ contract it is addressed to
    pub receiver: Address,
    pub kind: MessageKind,
    pub quote_hash: QuoteHash,
    pub message: Bytes,
}

impl OutboundMessage {
    /// Route the receiving chain sees when this message arrives from the
    /// transaction `src_tx_hash`.
    pub const fn route(&self, src_tx_hash: B256) -> RouteInfo {
        RouteInfo {
            sender: self.sender,
            receiver: self.receiver,
            srcChainId: self.src_chain_id,
            srcTxHash: src_tx_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_cursor() {
        let mut log = EventLog::default();
        for byte in 1..=3u8 {
            log.push(RfqEvent::DstTransferred {
                hash: B256::repeat_byte(byte),
            });
        }

        assert_eq!(log.last_seq(), 3);
        assert_eq!(log.since(0).count(), 3);

        let tail: Vec<u64> = log.since(1).map(|r| r.seq).collect();
        assert_eq!(tail, vec![2, 3]);

        assert_eq!(log.since(3).count(), 0);
        assert_eq!(log.since(100).count(), 0);
    }

    #[test]
    fn test_event_names() {
        let event = RfqEvent::RefundInitiated {
            hash: B256::ZERO,
        };
        assert_eq!(event.name(), "RefundInitiated");
        assert_eq!(event.quote_hash(), Some(B256::ZERO));

        let event = RfqEvent::Paused {
            account: Address::ZERO,
        };
        assert_eq!(event.quote_hash(), None);
    }
}
