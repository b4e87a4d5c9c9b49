//! Common test setup utilities shared across integration tests.
#![allow(dead_code)]

use alloy_primitives::{Address, U256};
use binding::Quote;
use quote::{compute_quote_hash, QuoteStatus};
use relayer::config::Config;
use tracker::PendingQuote;

pub const DEADLINE: u64 = 1_700_003_600;
pub const SRC_TOKEN: Address = Address::repeat_byte(0xc1);

/// Load test configuration. Panics if not found or invalid.
pub fn load_test_config() -> Config {
    Config::from_file("tests/test-config.toml").expect("Failed to load tests/test-config.toml.")
}

pub fn quote(nonce: u64, src_amount: u64) -> Quote {
    Quote {
        srcChainId: 1,
        srcToken: SRC_TOKEN,
        srcAmount: U256::from(src_amount),
        dstChainId: 10,
        dstToken: Address::repeat_byte(0xc2),
        dstAmount: U256::from(src_amount),
        deadline: DEADLINE,
        nonce,
        sender: Address::repeat_byte(0x51),
        receiver: Address::repeat_byte(0x52),
        refundTo: Address::repeat_byte(0x53),
        liquidityProvider: Address::repeat_byte(0x54),
    }
}

pub fn pending_quote(nonce: u64, status: QuoteStatus) -> PendingQuote {
    let quote = quote(nonce, 1_000);
    PendingQuote {
        hash: compute_quote_hash(&quote),
        quote,
        status,
        block_number: nonce,
    }
}
