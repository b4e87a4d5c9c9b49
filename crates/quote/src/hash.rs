use crate::types::QuoteHash;
use alloy_primitives::keccak256;
use alloy_sol_types::SolValue;
use binding::Quote;

pub fn compute_quote_hash(quote: &Quote) -> QuoteHash {
    // The RFQ contract hashes the fields with abi.encodePacked, so every
    // field keeps its declared width: uint64 is 8 bytes, address 20, uint256 32.
    let encoded = (
        quote.srcChainId,
        quote.srcToken,
        quote.srcAmount,
        quote.dstChainId,
        quote.dstToken,
        quote.dstAmount,
        quote.deadline,
        quote.nonce,
        quote.sender,
        quote.receiver,
        quote.refundTo,
        quote.liquidityProvider,
    )
        .abi_encode_packed();

    keccak256(encoded)
}

/// Convenience accessors on the generated `Quote` struct.
pub trait QuoteExt {
    /// The quote identity.
    fn hash(&self) -> QuoteHash;

    /// Whether the destination-side deadline has passed at `now`.
    fn is_expired(&self, now: u64) -> bool;
}

impl QuoteExt for Quote {
    fn hash(&self) -> QuoteHash {
        compute_quote_hash(self)
    }

    fn is_expired(&self, now: u64) -> bool {
        self.deadline < now
    }
}
