//! Quote identity and RFQ message digests.
//!
//! A quote is identified by the keccak hash of its packed fields. Every
//! per-quote table on either chain is keyed by that hash, and the
//! cross-chain messages exchanged between RFQ contracts are digests over it.

pub mod hash;
pub mod message;
pub mod types;

pub use hash::{compute_quote_hash, QuoteExt};
pub use message::{decode_rfq_message, encode_rfq_message, rfq_message_digest};
pub use types::{DstStatus, EscrowStatus, MessageKind, QuoteHash, QuoteStatus};
