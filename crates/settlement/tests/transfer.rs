//! Destination-chain transfer handler.

use alloy_primitives::U256;
use binding::Quote;
use quote::{compute_quote_hash, decode_rfq_message, rfq_message_digest, DstStatus, MessageKind};
use settlement::{ErrorKind, RfqEvent, TokenLedger};
use setup::*;

#[test]
fn test_transfer_pays_full_destination_amount() {
    let mut net = Network::new();
    let quote = sample_quote();
    let hash = compute_quote_hash(&quote);

    net.dst.dst_transfer(at(LP, NOW + 60), &quote).unwrap();

    assert_eq!(net.dst_balance(RECEIVER), U256::from(DST_AMOUNT));
    assert_eq!(net.dst_balance(LP), U256::from(DST_AMOUNT * 9));
    assert_eq!(net.dst.executed_quote(&hash), Some(DstStatus::Transferred));

    let outbox = net.dst.drain_outbox();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].kind, MessageKind::Release);
    assert_eq!(outbox[0].receiver, SRC_RFQ);
    assert_eq!(outbox[0].dst_chain_id, SRC_CHAIN);
    assert_eq!(
        decode_rfq_message(&outbox[0].message),
        Some(rfq_message_digest(hash, MessageKind::Release))
    );
    assert!(net.dst.outbox().is_empty());

    assert_eq!(
        net.dst.events().iter().last().map(|r| r.event.clone()),
        Some(RfqEvent::DstTransferred { hash })
    );
}

#[test]
fn test_second_transfer_is_already_processed() {
    let mut net = Network::new();
    let quote = sample_quote();

    net.dst.dst_transfer(at(LP, NOW + 60), &quote).unwrap();
    let err = net.dst.dst_transfer(at(LP, NOW + 61), &quote).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyProcessed);
    assert_eq!(net.dst_balance(RECEIVER), U256::from(DST_AMOUNT));
    assert_eq!(net.dst.outbox().len(), 1);
}

#[test]
fn test_transfer_at_deadline_is_invalid() {
    let mut net = Network::new();
    let quote = sample_quote();

    let err = net.dst.dst_transfer(at(LP, DEADLINE), &quote).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(net.dst_balance(RECEIVER), U256::ZERO);
}

#[test]
fn test_transfer_on_wrong_chain_is_invalid() {
    let mut net = Network::new();
    let quote = sample_quote();

    let err = net.src.dst_transfer(at(LP, NOW + 60), &quote).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let unknown_source = Quote {
        srcChainId: 137,
        ..sample_quote()
    };
    let err = net
        .dst
        .dst_transfer(at(LP, NOW + 60), &unknown_source)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_transfer_without_funds_changes_nothing() {
    let mut net = Network::new();
    let quote = sample_quote();
    let hash = compute_quote_hash(&quote);

    let err = net
        .dst
        .dst_transfer(at(STRANGER, NOW + 60), &quote)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert_eq!(net.dst.executed_quote(&hash), None);
    assert!(net.dst.outbox().is_empty());

    // The quote can still be filled afterwards
    net.dst.dst_transfer(at(LP, NOW + 60), &quote).unwrap();
    assert_eq!(
        net.dst.tokens().balance_of(DST_TOKEN, RECEIVER),
        U256::from(DST_AMOUNT)
    );
}
