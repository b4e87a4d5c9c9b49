//! Payloads exchanged between RFQ contracts over the message bus.
//!
//! Each payload is a single 32-byte digest binding a quote hash to the kind
//! of event it reports, so a release notice can never be replayed as a
//! refund notice for the same quote.

use crate::types::{MessageKind, QuoteHash};
use alloy_primitives::{keccak256, Bytes, FixedBytes, B256};
use alloy_sol_types::SolValue;

/// `keccak256(abi.encodePacked(quoteHash, uint8(kind)))`
pub fn rfq_message_digest(quote_hash: QuoteHash, kind: MessageKind) -> B256 {
    keccak256((quote_hash, FixedBytes([kind.as_u8()])).abi_encode_packed())
}

/// Message bytes carrying `digest`.
pub fn encode_rfq_message(digest: B256) -> Bytes {
    Bytes::copy_from_slice(digest.as_slice())
}

/// Extract the digest from message bytes. Returns `None` unless the message
/// is exactly 32 bytes.
pub fn decode_rfq_message(message: &[u8]) -> Option<B256> {
    (message.len() == 32).then(|| B256::from_slice(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_binds_kind() {
        let hash = B256::repeat_byte(0xab);

        let release = rfq_message_digest(hash, MessageKind::Release);
        let refund = rfq_message_digest(hash, MessageKind::Refund);
        let deposit = rfq_message_digest(hash, MessageKind::Deposit);

        assert_ne!(release, refund);
        assert_ne!(release, deposit);
        assert_ne!(refund, deposit);
    }

    #[test]
    fn test_digest_preimage() {
        let hash = B256::repeat_byte(0x01);

        let mut preimage = hash.to_vec();
        preimage.push(1);

        assert_eq!(
            rfq_message_digest(hash, MessageKind::Release),
            keccak256(&preimage)
        );
    }

    #[test]
    fn test_encode_decode() {
        let digest = B256::repeat_byte(0x42);
        let message = encode_rfq_message(digest);

        assert_eq!(decode_rfq_message(&message), Some(digest));
        assert_eq!(decode_rfq_message(&message[..31]), None);
        assert_eq!(decode_rfq_message(&[]), None);
    }
}
