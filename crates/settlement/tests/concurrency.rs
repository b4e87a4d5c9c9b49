//! Racing callers on a shared engine.

use alloy_primitives::U256;
use settlement::{ErrorKind, SharedRfq, TokenLedger};
use setup::*;
use std::thread;

const RACERS: usize = 8;

#[test]
fn test_concurrent_transfers_pay_once() {
    let net = Network::new();
    let dst = SharedRfq::new(net.dst);
    let quote = sample_quote();

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..RACERS)
            .map(|_| {
                let dst = dst.clone();
                let quote = quote.clone();
                s.spawn(move || dst.dst_transfer(at(LP, NOW + 60), &quote))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let won = results.iter().filter(|r| r.is_ok()).count();
    let lost: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();

    assert_eq!(won, 1);
    assert_eq!(lost.len(), RACERS - 1);
    assert!(lost.iter().all(|e| e.kind() == ErrorKind::AlreadyProcessed));

    let engine = dst.lock();
    assert_eq!(
        engine.tokens().balance_of(DST_TOKEN, RECEIVER),
        U256::from(DST_AMOUNT)
    );
    assert_eq!(engine.outbox().len(), 1);
}

#[test]
fn test_concurrent_releases_pay_once() {
    let mut net = Network::new();
    let quote = sample_quote();

    net.deposit(&quote);
    let release = net.transfer(&quote);
    let src = SharedRfq::new(net.src);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..RACERS)
            .map(|_| {
                let src = src.clone();
                let quote = &quote;
                let release = &release;
                s.spawn(move || src.src_release(quote, release))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == ErrorKind::AlreadyProcessed));

    let engine = src.lock();
    assert_eq!(
        engine.vault().fees(&SRC_TOKEN) + engine.tokens().balance_of(SRC_TOKEN, LP),
        U256::from(SRC_AMOUNT)
    );
}

#[test]
fn test_concurrent_deposits_of_distinct_quotes() {
    let net = Network::new();
    let src = SharedRfq::new(net.src);

    thread::scope(|s| {
        for nonce in 0..RACERS as u64 {
            let src = src.clone();
            s.spawn(move || {
                src.src_deposit(at(SENDER, NOW), &quote_with_nonce(nonce), SUBMISSION_DEADLINE)
                    .unwrap();
            });
        }
    });

    let engine = src.lock();
    assert_eq!(engine.outbox().len(), RACERS);
    assert_eq!(
        engine.vault().principal(&SRC_TOKEN),
        U256::from(SRC_AMOUNT * RACERS as u64)
    );
}
