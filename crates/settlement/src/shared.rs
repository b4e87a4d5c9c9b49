use crate::{
    context::CallContext,
    engine::{InboundMessage, Rfq},
    error::RfqError,
    vault::{InMemoryTokens, TokenLedger},
};
use alloy_primitives::B256;
use binding::Quote;
use parking_lot::{Mutex, MutexGuard};
use quote::QuoteHash;
use std::sync::Arc;

/// Cloneable handle serializing access to one engine.
///
/// Each call holds the lock for the whole operation, so concurrent attempts
/// on the same quote or message resolve to one winner and `AlreadyProcessed`
/// for the rest.
#[derive(Debug)]
pub struct SharedRfq<T = InMemoryTokens> {
    inner: Arc<Mutex<Rfq<T>>>,
}

impl<T> Clone for SharedRfq<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: TokenLedger> SharedRfq<T> {
    pub fn new(engine: Rfq<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Exclusive access for anything not wrapped below.
    pub fn lock(&self) -> MutexGuard<'_, Rfq<T>> {
        self.inner.lock()
    }

    pub fn src_deposit(
        &self,
        ctx: CallContext,
        quote: &Quote,
        submission_deadline: u64,
    ) -> Result<QuoteHash, RfqError> {
        self.inner.lock().src_deposit(ctx, quote, submission_deadline)
    }

    pub fn src_release(&self, quote: &Quote, inbound: &InboundMessage) -> Result<(), RfqError> {
        self.inner.lock().src_release(quote, inbound)
    }

    pub fn execute_refund(
        &self,
        ctx: CallContext,
        quote: &Quote,
        inbound: &InboundMessage,
    ) -> Result<(), RfqError> {
        self.inner.lock().execute_refund(ctx, quote, inbound)
    }

    pub fn dst_transfer(&self, ctx: CallContext, quote: &Quote) -> Result<(), RfqError> {
        self.inner.lock().dst_transfer(ctx, quote)
    }

    pub fn request_refund(
        &self,
        ctx: CallContext,
        quote: &Quote,
        inbound: &InboundMessage,
    ) -> Result<(), RfqError> {
        self.inner.lock().request_refund(ctx, quote, inbound)
    }

    pub fn execute_message(&self, inbound: &InboundMessage) -> Result<B256, RfqError> {
        self.inner.lock().execute_message(inbound)
    }

    pub fn paused(&self) -> bool {
        self.inner.lock().paused()
    }
}
