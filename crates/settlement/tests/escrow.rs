//! Source-chain escrow: deposit and release.

use alloy_primitives::{Address, U256};
use binding::Quote;
use quote::{compute_quote_hash, rfq_message_digest, EscrowStatus, MessageKind};
use settlement::{ErrorKind, RfqEvent, TokenLedger};
use setup::*;

#[test]
fn test_deposit_escrows_source_amount() {
    let mut net = Network::new();
    let quote = sample_quote();

    let hash = net
        .src
        .src_deposit(at(SENDER, NOW), &quote, SUBMISSION_DEADLINE)
        .unwrap();

    assert_eq!(hash, compute_quote_hash(&quote));
    assert_eq!(net.src.quote_status(&hash), Some(EscrowStatus::Deposited));
    assert_eq!(net.src_balance(SRC_RFQ), U256::from(SRC_AMOUNT));
    assert_eq!(net.src_balance(SENDER), U256::from(SRC_AMOUNT * 9));
    assert_eq!(net.src.vault().principal(&SRC_TOKEN), U256::from(SRC_AMOUNT));

    let outbox = net.src.outbox();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].kind, MessageKind::Deposit);
    assert_eq!(outbox[0].receiver, DST_RFQ);
    assert_eq!(outbox[0].dst_chain_id, DST_CHAIN);

    let last = net.src.events().iter().last().unwrap();
    assert_eq!(
        last.event,
        RfqEvent::SrcDeposited {
            hash,
            quote: Box::new(quote),
            src_recipient: LP,
            submission_deadline: SUBMISSION_DEADLINE,
        }
    );
}

#[test]
fn test_second_deposit_is_already_processed() {
    let mut net = Network::new();
    let quote = sample_quote();

    net.src
        .src_deposit(at(SENDER, NOW), &quote, SUBMISSION_DEADLINE)
        .unwrap();
    let err = net
        .src
        .src_deposit(at(SENDER, NOW + 1), &quote, SUBMISSION_DEADLINE)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyProcessed);
    assert_eq!(net.src_balance(SRC_RFQ), U256::from(SRC_AMOUNT));
    assert_eq!(net.src.outbox().len(), 1);
}

#[test]
fn test_deposit_rejects_invalid_quotes() {
    let mut net = Network::new();
    let quote = sample_quote();

    let cases = [
        (
            "submission deadline passed",
            at(SENDER, SUBMISSION_DEADLINE),
            quote.clone(),
            SUBMISSION_DEADLINE,
        ),
        (
            "deadline before submission",
            at(SENDER, NOW),
            quote.clone(),
            DEADLINE,
        ),
        (
            "wrong caller",
            at(STRANGER, NOW),
            quote.clone(),
            SUBMISSION_DEADLINE,
        ),
        (
            "wrong source chain",
            at(SENDER, NOW),
            Quote { srcChainId: 56, ..quote.clone() },
            SUBMISSION_DEADLINE,
        ),
        (
            "destination is this chain",
            at(SENDER, NOW),
            Quote { dstChainId: SRC_CHAIN, ..quote.clone() },
            SUBMISSION_DEADLINE,
        ),
        (
            "no remote contract",
            at(SENDER, NOW),
            Quote { dstChainId: 137, ..quote.clone() },
            SUBMISSION_DEADLINE,
        ),
        (
            "zero receiver",
            at(SENDER, NOW),
            Quote { receiver: Address::ZERO, ..quote.clone() },
            SUBMISSION_DEADLINE,
        ),
        (
            "zero liquidity provider",
            at(SENDER, NOW),
            Quote { liquidityProvider: Address::ZERO, ..quote.clone() },
            SUBMISSION_DEADLINE,
        ),
    ];

    for (name, ctx, quote, submission_deadline) in cases {
        let err = net
            .src
            .src_deposit(ctx, &quote, submission_deadline)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "{name}: {err}");
    }

    assert!(net.src.outbox().is_empty());
    assert!(net.src.events().is_empty());
    assert_eq!(net.src_balance(SENDER), U256::from(SRC_AMOUNT * 10));
}

#[test]
fn test_deposit_without_allowance_changes_nothing() {
    let mut net = Network::new();
    let quote = sample_quote();
    net.src
        .tokens_mut()
        .approve(SRC_TOKEN, SENDER, SRC_RFQ, U256::from(SRC_AMOUNT - 1));

    let err = net
        .src
        .src_deposit(at(SENDER, NOW), &quote, SUBMISSION_DEADLINE)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert_eq!(net.src.quote_status(&compute_quote_hash(&quote)), None);
    assert!(net.src.outbox().is_empty());
}

#[test]
fn test_release_pays_liquidity_provider_minus_fee() {
    let mut net = Network::new();
    let quote = sample_quote();
    let hash = compute_quote_hash(&quote);

    net.deposit(&quote);
    let release = net.transfer(&quote);
    net.src.src_release(&quote, &release).unwrap();

    // 0.1% override for DST_CHAIN
    let fee = U256::from(1_000);
    let payout = U256::from(SRC_AMOUNT) - fee;

    assert_eq!(net.src.quote_status(&hash), Some(EscrowStatus::Released));
    assert_eq!(net.src_balance(LP), payout);
    assert_eq!(net.src_balance(SRC_RFQ), fee);
    assert_eq!(net.src.vault().fees(&SRC_TOKEN), fee);
    assert_eq!(net.src.vault().principal(&SRC_TOKEN), U256::ZERO);

    let events: Vec<_> = net.src.events().iter().map(|r| r.event.clone()).collect();
    assert!(events.contains(&RfqEvent::MessageReceived {
        hash: rfq_message_digest(hash, MessageKind::Release)
    }));
    assert_eq!(
        events.last(),
        Some(&RfqEvent::SrcReleased {
            hash,
            src_recipient: LP,
            src_token: SRC_TOKEN,
            amount: payout,
        })
    );
}

#[test]
fn test_second_release_is_already_processed() {
    let mut net = Network::new();
    let quote = sample_quote();

    net.deposit(&quote);
    let release = net.transfer(&quote);
    net.src.src_release(&quote, &release).unwrap();

    let err = net.src.src_release(&quote, &release).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyProcessed);
    assert_eq!(net.src_balance(LP), U256::from(SRC_AMOUNT - 1_000));
}

#[test]
fn test_release_of_unknown_quote_is_invalid() {
    let mut net = Network::new();
    let quote = sample_quote();

    net.deposit(&quote);
    let release = net.transfer(&quote);

    let other = quote_with_nonce(2);
    let err = net.src.src_release(&other, &release).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_release_below_quorum_is_unauthorized() {
    let mut net = Network::new();
    let quote = sample_quote();
    let hash = compute_quote_hash(&quote);

    net.deposit(&quote);
    net.dst.dst_transfer(at(LP, NOW + 60), &quote).unwrap();
    let msg = Network::take_message(&mut net.dst, MessageKind::Release);

    // 40 + 20 = 60 < 67
    let weak = net.relay_signed_by(&msg, &[40, 20]);
    let err = net.src.src_release(&quote, &weak).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(net.src.quote_status(&hash), Some(EscrowStatus::Deposited));
    assert_eq!(net.src_balance(LP), U256::ZERO);

    // A repeated heavy signer does not help either
    let repeated = net.relay_signed_by(&msg, &[40, 20, 40]);
    let err = net.src.src_release(&quote, &repeated).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    // 40 + 30 = 70 passes
    let strong = net.relay_signed_by(&msg, &[40, 30]);
    net.src.src_release(&quote, &strong).unwrap();
    assert_eq!(net.src.quote_status(&hash), Some(EscrowStatus::Released));
}

#[test]
fn test_release_with_refund_notice_is_rejected() {
    let mut net = Network::new();
    let quote = sample_quote();
    let hash = compute_quote_hash(&quote);

    let deposit = net.deposit(&quote);
    let refund = net.request_refund(&quote, &deposit);

    let err = net.src.src_release(&quote, &refund).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(net.src.quote_status(&hash), Some(EscrowStatus::Deposited));
}

#[test]
fn test_release_from_unregistered_sender_is_unauthorized() {
    let mut net = Network::new();
    let quote = sample_quote();

    net.deposit(&quote);
    net.dst.dst_transfer(at(LP, NOW + 60), &quote).unwrap();
    let mut msg = Network::take_message(&mut net.dst, MessageKind::Release);
    msg.sender = Address::repeat_byte(0xee);

    let forged = net.relay(&msg);
    let err = net.src.src_release(&quote, &forged).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn test_release_consumes_previously_delivered_message() {
    let mut net = Network::new();
    let quote = sample_quote();
    let hash = compute_quote_hash(&quote);

    net.deposit(&quote);
    let release = net.transfer(&quote);

    let payload = net.src.execute_message(&release).unwrap();
    assert_eq!(payload, rfq_message_digest(hash, MessageKind::Release));
    assert!(net.src.is_unconsumed(&payload));

    // The proof was spent by delivery; the stored message settles the quote
    net.src.src_release(&quote, &release).unwrap();
    assert!(!net.src.is_unconsumed(&payload));
    assert_eq!(net.src.quote_status(&hash), Some(EscrowStatus::Released));
}

#[test]
fn test_delivered_message_cannot_be_replayed() {
    let mut net = Network::new();
    let quote = sample_quote();

    net.deposit(&quote);
    let release = net.transfer(&quote);
    net.src.src_release(&quote, &release).unwrap();

    let err = net.src.execute_message(&release).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyProcessed);
}

#[test]
fn test_engine_balances_match_vault() {
    let mut net = Network::new();

    for nonce in 1..=3 {
        let quote = quote_with_nonce(nonce);
        net.deposit(&quote);
        if nonce != 2 {
            let release = net.transfer(&quote);
            net.src.src_release(&quote, &release).unwrap();
        }
    }

    let vault = net.src.vault();
    assert_eq!(
        net.src.tokens().balance_of(SRC_TOKEN, SRC_RFQ),
        vault.principal(&SRC_TOKEN) + vault.fees(&SRC_TOKEN)
    );
    assert_eq!(vault.principal(&SRC_TOKEN), U256::from(SRC_AMOUNT));
    assert_eq!(vault.fees(&SRC_TOKEN), U256::from(2_000));
}
