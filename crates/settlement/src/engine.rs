use crate::{
    context::CallContext,
    error::RfqError,
    events::{EventLog, EventRecord, OutboundMessage, RfqEvent},
    policy::Policy,
    vault::{InMemoryTokens, TokenLedger, Vault},
};
use alloy_primitives::{Address, Bytes, B256, U256};
use binding::{Quote, RouteInfo};
use config::{FeeConfig, FEE_PRECISION};
use gateway::{MessageGateway, MessageProof, SignerSet, VerifiedMessage};
use quote::{
    compute_quote_hash, decode_rfq_message, encode_rfq_message, rfq_message_digest, DstStatus,
    EscrowStatus, MessageKind, QuoteHash,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// A message relayed from another chain together with its validator proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub message: Bytes,
    pub route: RouteInfo,
    pub proof: MessageProof,
}

impl InboundMessage {
    pub const fn new(message: Bytes, route: RouteInfo, proof: MessageProof) -> Self {
        Self {
            message,
            route,
            proof,
        }
    }
}

/// How an entry point obtained the message it needs.
enum Intake {
    /// Delivered earlier through `execute_message`
    Stored(B256),
    /// Verified now, to be consumed together with the caller's effects
    Delivered(B256, VerifiedMessage),
}

/// RFQ contract of one chain.
///
/// Source-side entry points (`src_deposit`, `src_release`, `execute_refund`)
/// and destination-side ones (`dst_transfer`, `request_refund`) live on the
/// same engine; which role it plays is decided per quote by its chain ids.
///
/// Every operation validates completely before it mutates anything.
#[derive(Debug)]
pub struct Rfq<T = InMemoryTokens> {
    chain_id: u64,
    address: Address,
    policy: Policy,
    gateway: MessageGateway,
    tokens: T,
    vault: Vault,
    escrows: HashMap<QuoteHash, EscrowStatus>,
    executed: HashMap<QuoteHash, DstStatus>,
    unconsumed: HashSet<B256>,
    events: EventLog,
    outbox: Vec<OutboundMessage>,
}

impl<T: TokenLedger> Rfq<T> {
    /// Deploy an engine at `address`, owned by `owner`, behind `gateway`.
    pub fn new(
        address: Address,
        owner: Address,
        gateway: MessageGateway,
        tokens: T,
    ) -> Result<Self, RfqError> {
        if address.is_zero() || owner.is_zero() {
            return Err(RfqError::invalid("zero contract or owner address"));
        }

        Ok(Self {
            chain_id: gateway.chain_id(),
            address,
            policy: Policy::new(owner, gateway.address()),
            gateway,
            tokens,
            vault: Vault::default(),
            escrows: HashMap::new(),
            executed: HashMap::new(),
            unconsumed: HashSet::new(),
            events: EventLog::default(),
            outbox: Vec::new(),
        })
    }

    /// Seed fee percentages at deployment.
    ///
    /// Rejects any percentage above [`FEE_PRECISION`].
    pub fn with_fees(mut self, fees: &FeeConfig) -> Result<Self, RfqError> {
        fees.validate().map_err(|err| RfqError::invalid(err.to_string()))?;
        self.policy = self.policy.with_fees(fees);
        Ok(self)
    }

    /// Seed the counterpart registry at deployment.
    pub fn with_remote_rfq(mut self, chain_id: u64, rfq: Address) -> Self {
        self.policy.put_remote_rfq(chain_id, rfq);
        self
    }

    /// Escrow `quote.srcAmount` and notify the destination chain.
    pub fn src_deposit(
        &mut self,
        ctx: CallContext,
        quote: &Quote,
        submission_deadline: u64,
    ) -> Result<QuoteHash, RfqError> {
        self.policy.ensure_not_paused()?;

        if submission_deadline <= ctx.timestamp {
            return Err(RfqError::invalid("submission deadline passed"));
        }
        if quote.deadline <= submission_deadline {
            return Err(RfqError::invalid(
                "quote deadline must be after the submission deadline",
            ));
        }
        if quote.srcChainId != self.chain_id {
            return Err(RfqError::invalid("quote source chain is not this chain"));
        }
        if quote.dstChainId == self.chain_id {
            return Err(RfqError::invalid("quote destination is this chain"));
        }
        if ctx.caller != quote.sender {
            return Err(RfqError::invalid("caller is not the quote sender"));
        }
        if quote.receiver.is_zero() || quote.liquidityProvider.is_zero() || quote.refundTo.is_zero()
        {
            return Err(RfqError::invalid("zero party address"));
        }
        let dst_rfq = self.remote_rfq_for(quote.dstChainId)?;
        let fee = self.policy.rfq_fee(quote.dstChainId, quote.srcAmount);
        if fee > quote.srcAmount {
            return Err(RfqError::invalid("fee exceeds source amount"));
        }

        let hash = compute_quote_hash(quote);
        if self.escrows.contains_key(&hash) {
            return Err(RfqError::processed(format!("quote {hash} already deposited")));
        }

        self.tokens.transfer_from(
            quote.srcToken,
            self.address,
            ctx.caller,
            self.address,
            quote.srcAmount,
        )?;

        self.vault.lock(quote.srcToken, quote.srcAmount);
        self.escrows.insert(hash, EscrowStatus::Deposited);
        self.send_message(quote.dstChainId, dst_rfq, hash, MessageKind::Deposit);
        self.emit(RfqEvent::SrcDeposited {
            hash,
            quote: Box::new(quote.clone()),
            src_recipient: quote.liquidityProvider,
            submission_deadline,
        });

        info!(
            %hash,
            dst_chain_id = quote.dstChainId,
            token = %quote.srcToken,
            amount = %quote.srcAmount,
            "Quote deposited"
        );
        Ok(hash)
    }

    /// Pay the escrow minus the protocol fee to the liquidity provider once
    /// the destination transfer is proven.
    pub fn src_release(&mut self, quote: &Quote, inbound: &InboundMessage) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;

        let hash = compute_quote_hash(quote);
        self.ensure_deposited(hash)?;

        let intake = self.check_intake(
            rfq_message_digest(hash, MessageKind::Release),
            quote.dstChainId,
            inbound,
        )?;

        let fee = self.policy.rfq_fee(quote.dstChainId, quote.srcAmount);
        let payout = quote.srcAmount.saturating_sub(fee);

        self.tokens.transfer(
            quote.srcToken,
            self.address,
            quote.liquidityProvider,
            payout,
        )?;

        self.commit_intake(intake)?;
        self.vault.accrue(quote.srcToken, fee);
        self.vault.unlock(quote.srcToken, payout);
        self.escrows.insert(hash, EscrowStatus::Released);
        self.emit(RfqEvent::SrcReleased {
            hash,
            src_recipient: quote.liquidityProvider,
            src_token: quote.srcToken,
            amount: payout,
        });

        info!(%hash, %payout, %fee, lp = %quote.liquidityProvider, "Quote released");
        Ok(())
    }

    /// Return the full escrow to `quote.refundTo` once the destination chain
    /// confirmed the quote expired unfilled.
    pub fn execute_refund(
        &mut self,
        ctx: CallContext,
        quote: &Quote,
        inbound: &InboundMessage,
    ) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;

        let hash = compute_quote_hash(quote);
        self.ensure_deposited(hash)?;
        if quote.deadline >= ctx.timestamp {
            return Err(RfqError::invalid("quote deadline not passed"));
        }

        let intake = self.check_intake(
            rfq_message_digest(hash, MessageKind::Refund),
            quote.dstChainId,
            inbound,
        )?;

        self.tokens.transfer(
            quote.srcToken,
            self.address,
            quote.refundTo,
            quote.srcAmount,
        )?;

        self.commit_intake(intake)?;
        self.vault.unlock(quote.srcToken, quote.srcAmount);
        self.escrows.insert(hash, EscrowStatus::Refunded);
        self.emit(RfqEvent::Refunded {
            hash,
            refund_to: quote.refundTo,
            src_token: quote.srcToken,
            amount: quote.srcAmount,
        });

        info!(%hash, refund_to = %quote.refundTo, amount = %quote.srcAmount, "Quote refunded");
        Ok(())
    }

    /// Pay `quote.dstAmount` from the caller to the receiver and notify the
    /// source chain.
    pub fn dst_transfer(&mut self, ctx: CallContext, quote: &Quote) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;

        let hash = compute_quote_hash(quote);
        if let Some(status) = self.executed.get(&hash) {
            return Err(RfqError::processed(format!(
                "quote {hash} already executed ({status:?})"
            )));
        }
        if quote.dstChainId != self.chain_id {
            return Err(RfqError::invalid("quote destination is not this chain"));
        }
        if ctx.timestamp >= quote.deadline {
            return Err(RfqError::invalid("quote deadline passed"));
        }
        let src_rfq = self.remote_rfq_for(quote.srcChainId)?;

        self.tokens.transfer_from(
            quote.dstToken,
            self.address,
            ctx.caller,
            quote.receiver,
            quote.dstAmount,
        )?;

        self.executed.insert(hash, DstStatus::Transferred);
        self.send_message(quote.srcChainId, src_rfq, hash, MessageKind::Release);
        self.emit(RfqEvent::DstTransferred { hash });

        info!(
            %hash,
            receiver = %quote.receiver,
            amount = %quote.dstAmount,
            "Quote transferred"
        );
        Ok(())
    }

    /// Mark an expired, unfilled quote as refundable and notify the source
    /// chain. Requires proof that the deposit exists.
    pub fn request_refund(
        &mut self,
        ctx: CallContext,
        quote: &Quote,
        inbound: &InboundMessage,
    ) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;

        if quote.deadline >= ctx.timestamp {
            return Err(RfqError::invalid("quote deadline not passed"));
        }
        if quote.dstChainId != self.chain_id {
            return Err(RfqError::invalid("quote destination is not this chain"));
        }
        let hash = compute_quote_hash(quote);
        if let Some(status) = self.executed.get(&hash) {
            return Err(RfqError::processed(format!(
                "quote {hash} already executed ({status:?})"
            )));
        }
        let src_rfq = self.remote_rfq_for(quote.srcChainId)?;

        let intake = self.check_intake(
            rfq_message_digest(hash, MessageKind::Deposit),
            quote.srcChainId,
            inbound,
        )?;

        self.commit_intake(intake)?;
        self.executed.insert(hash, DstStatus::RefundRequested);
        self.send_message(quote.srcChainId, src_rfq, hash, MessageKind::Refund);
        self.emit(RfqEvent::RefundInitiated { hash });

        info!(%hash, "Refund initiated");
        Ok(())
    }

    /// Accept a relayed message and hold it until an entry point consumes it.
    pub fn execute_message(&mut self, inbound: &InboundMessage) -> Result<B256, RfqError> {
        self.policy.ensure_not_paused()?;

        let verified = self.verify_inbound(inbound)?;
        let payload = decode_rfq_message(&inbound.message)
            .ok_or_else(|| RfqError::invalid("message is not a 32-byte digest"))?;

        self.gateway.consume(&verified)?;
        self.store_message(payload);
        Ok(payload)
    }

    fn verify_inbound(&self, inbound: &InboundMessage) -> Result<VerifiedMessage, RfqError> {
        let route = &inbound.route;
        if route.receiver != self.address {
            return Err(RfqError::invalid("message not addressed to this contract"));
        }
        if self.policy.remote_rfq(route.srcChainId) != Some(route.sender) {
            return Err(RfqError::Unauthorized {
                caller: route.sender,
                role: "a registered RFQ contract",
            });
        }

        self.gateway
            .verify(&inbound.message, route, &inbound.proof)
            .inspect_err(|e| {
                warn!(
                    src_chain_id = route.srcChainId,
                    src_tx = %route.srcTxHash,
                    error = %e,
                    "Rejected inbound message"
                );
            })
            .map_err(RfqError::from)
    }

    /// Find `expected` among stored messages or verify `inbound` as carrying
    /// it. Mutates nothing.
    fn check_intake(
        &self,
        expected: B256,
        from_chain_id: u64,
        inbound: &InboundMessage,
    ) -> Result<Intake, RfqError> {
        if self.unconsumed.contains(&expected) {
            return Ok(Intake::Stored(expected));
        }

        if inbound.route.srcChainId != from_chain_id {
            return Err(RfqError::invalid("message from unexpected chain"));
        }
        let verified = self.verify_inbound(inbound)?;
        if decode_rfq_message(&inbound.message) != Some(expected) {
            return Err(RfqError::invalid("message does not settle this quote"));
        }

        Ok(Intake::Delivered(expected, verified))
    }

    fn commit_intake(&mut self, intake: Intake) -> Result<(), RfqError> {
        match intake {
            Intake::Stored(payload) => {
                self.unconsumed.remove(&payload);
            }
            Intake::Delivered(payload, verified) => {
                self.gateway.consume(&verified)?;
                self.emit(RfqEvent::MessageReceived { hash: payload });
            }
        }
        Ok(())
    }

    fn store_message(&mut self, payload: B256) {
        self.unconsumed.insert(payload);
        self.emit(RfqEvent::MessageReceived { hash: payload });
    }

    fn send_message(&mut self, dst_chain_id: u64, receiver: Address, hash: QuoteHash, kind: MessageKind) {
        let digest = rfq_message_digest(hash, kind);
        debug!(%hash, %kind, dst_chain_id, %receiver, "Queueing outbound message");

        self.outbox.push(OutboundMessage {
            sender: self.address,
            src_chain_id: self.chain_id,
            dst_chain_id,
            receiver,
            kind,
            quote_hash: hash,
            message: encode_rfq_message(digest),
        });
    }

    /// Send accrued fees of `token` to the treasury.
    pub fn collect_fee(
        &mut self,
        ctx: CallContext,
        token: Address,
        amount: U256,
    ) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;
        self.policy.ensure_owner(ctx.caller)?;

        let treasury = self.policy.treasury();
        if treasury.is_zero() {
            return Err(RfqError::invalid("treasury address not set"));
        }
        let accrued = self.vault.fees(&token);
        if amount > accrued {
            return Err(RfqError::InsufficientFunds(format!(
                "requested {amount} of {token}, accrued {accrued}"
            )));
        }

        self.tokens.transfer(token, self.address, treasury, amount)?;

        self.vault.withdraw_fees(token, amount);
        self.emit(RfqEvent::FeeCollected {
            treasury,
            token,
            amount,
        });

        info!(%token, %amount, %treasury, "Fees collected");
        Ok(())
    }

    /// Update fee percentages. Chain id 0 sets the global default; a zero
    /// percentage clears a per-chain override.
    pub fn set_fee_perc(
        &mut self,
        ctx: CallContext,
        chain_ids: Vec<u64>,
        fee_percs: Vec<u32>,
    ) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;
        self.policy.ensure_owner(ctx.caller)?;

        if chain_ids.len() != fee_percs.len() {
            return Err(RfqError::invalid("chain ids and fee percentages differ in length"));
        }
        if let Some(perc) = fee_percs.iter().find(|perc| **perc > FEE_PRECISION) {
            return Err(RfqError::invalid(format!(
                "fee percentage {perc} exceeds {FEE_PRECISION}"
            )));
        }

        for (chain_id, perc) in chain_ids.iter().zip(&fee_percs) {
            self.policy.put_fee_perc(*chain_id, *perc);
        }
        self.emit(RfqEvent::FeePercUpdated {
            chain_ids,
            fee_percs,
        });
        Ok(())
    }

    pub fn set_remote_rfq_contracts(
        &mut self,
        ctx: CallContext,
        chain_ids: Vec<u64>,
        remote_rfq_contracts: Vec<Address>,
    ) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;
        self.policy.ensure_owner(ctx.caller)?;

        if chain_ids.len() != remote_rfq_contracts.len() {
            return Err(RfqError::invalid("chain ids and contracts differ in length"));
        }

        for (chain_id, rfq) in chain_ids.iter().zip(&remote_rfq_contracts) {
            self.policy.put_remote_rfq(*chain_id, *rfq);
        }
        self.emit(RfqEvent::RfqContractsUpdated {
            chain_ids,
            remote_rfq_contracts,
        });
        Ok(())
    }

    pub fn set_treasury_addr(&mut self, ctx: CallContext, treasury: Address) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;
        self.policy.ensure_owner(ctx.caller)?;

        self.policy.set_treasury(treasury);
        self.emit(RfqEvent::TreasuryAddrUpdated { treasury });
        Ok(())
    }

    /// Switch to another message bus deployment. Validator signatures are
    /// bound to the bus address, so proofs made for the old bus stop working.
    pub fn set_message_bus(&mut self, ctx: CallContext, message_bus: Address) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;
        self.policy.ensure_owner(ctx.caller)?;

        if message_bus.is_zero() {
            return Err(RfqError::invalid("zero message bus address"));
        }

        self.policy.set_message_bus(message_bus);
        self.gateway.set_address(message_bus);
        self.emit(RfqEvent::MessageBusUpdated { message_bus });
        Ok(())
    }

    /// Replace the gateway's validator set. Authorized by the gateway owner.
    pub fn reset_signers(&mut self, ctx: CallContext, signers: SignerSet) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;
        self.gateway.reset_signers(ctx.caller, signers)?;
        Ok(())
    }

    pub fn pause(&mut self, ctx: CallContext) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;
        self.policy.ensure_pauser(ctx.caller)?;

        self.policy.set_paused(true);
        self.emit(RfqEvent::Paused {
            account: ctx.caller,
        });
        warn!(account = %ctx.caller, chain_id = self.chain_id, "RFQ paused");
        Ok(())
    }

    pub fn unpause(&mut self, ctx: CallContext) -> Result<(), RfqError> {
        self.policy.ensure_pauser(ctx.caller)?;
        if !self.policy.is_paused() {
            return Err(RfqError::invalid("not paused"));
        }

        self.policy.set_paused(false);
        self.emit(RfqEvent::Unpaused {
            account: ctx.caller,
        });
        info!(account = %ctx.caller, chain_id = self.chain_id, "RFQ unpaused");
        Ok(())
    }

    pub fn add_pauser(&mut self, ctx: CallContext, account: Address) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;
        self.policy.ensure_owner(ctx.caller)?;

        if account.is_zero() || self.policy.is_pauser(&account) {
            return Err(RfqError::invalid(format!("{account} cannot be added as pauser")));
        }

        self.policy.add_pauser(account);
        self.emit(RfqEvent::PauserAdded { account });
        Ok(())
    }

    pub fn remove_pauser(&mut self, ctx: CallContext, account: Address) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;
        self.policy.ensure_owner(ctx.caller)?;

        if !self.policy.remove_pauser(&account) {
            return Err(RfqError::invalid(format!("{account} is not a pauser")));
        }
        self.emit(RfqEvent::PauserRemoved { account });
        Ok(())
    }

    /// Give up the caller's own pauser role.
    pub fn renounce_pauser(&mut self, ctx: CallContext) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;
        self.policy.ensure_pauser(ctx.caller)?;

        self.policy.remove_pauser(&ctx.caller);
        self.emit(RfqEvent::PauserRemoved {
            account: ctx.caller,
        });
        Ok(())
    }

    pub fn transfer_ownership(&mut self, ctx: CallContext, new_owner: Address) -> Result<(), RfqError> {
        self.policy.ensure_not_paused()?;
        self.policy.ensure_owner(ctx.caller)?;

        if new_owner.is_zero() {
            return Err(RfqError::invalid("new owner is the zero address"));
        }

        self.policy.set_owner(new_owner);
        self.emit(RfqEvent::OwnershipTransferred {
            previous_owner: ctx.caller,
            new_owner,
        });
        Ok(())
    }

    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub const fn policy(&self) -> &Policy {
        &self.policy
    }

    pub const fn gateway(&self) -> &MessageGateway {
        &self.gateway
    }

    pub const fn vault(&self) -> &Vault {
        &self.vault
    }

    pub const fn tokens(&self) -> &T {
        &self.tokens
    }

    pub const fn tokens_mut(&mut self) -> &mut T {
        &mut self.tokens
    }

    pub const fn paused(&self) -> bool {
        self.policy.is_paused()
    }

    pub fn get_quote_hash(&self, quote: &Quote) -> QuoteHash {
        compute_quote_hash(quote)
    }

    pub fn get_rfq_fee(&self, dst_chain_id: u64, amount: U256) -> U256 {
        self.policy.rfq_fee(dst_chain_id, amount)
    }

    /// Source-side escrow record.
    pub fn quote_status(&self, hash: &QuoteHash) -> Option<EscrowStatus> {
        self.escrows.get(hash).copied()
    }

    /// Destination-side execution record.
    pub fn executed_quote(&self, hash: &QuoteHash) -> Option<DstStatus> {
        self.executed.get(hash).copied()
    }

    pub fn is_unconsumed(&self, payload: &B256) -> bool {
        self.unconsumed.contains(payload)
    }

    pub const fn events(&self) -> &EventLog {
        &self.events
    }

    /// Journal entries after `cursor`, oldest first.
    pub fn events_since(&self, cursor: u64) -> impl Iterator<Item = &EventRecord> {
        self.events.since(cursor)
    }

    pub fn outbox(&self) -> &[OutboundMessage] {
        &self.outbox
    }

    /// Hand queued outbound messages to the relay layer.
    pub fn drain_outbox(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.outbox)
    }

    fn ensure_deposited(&self, hash: QuoteHash) -> Result<(), RfqError> {
        match self.escrows.get(&hash) {
            Some(EscrowStatus::Deposited) => Ok(()),
            Some(status) => Err(RfqError::processed(format!(
                "quote {hash} already settled ({status:?})"
            ))),
            None => Err(RfqError::invalid(format!("quote {hash} was never deposited"))),
        }
    }

    fn remote_rfq_for(&self, chain_id: u64) -> Result<Address, RfqError> {
        self.policy
            .remote_rfq(chain_id)
            .ok_or_else(|| RfqError::invalid(format!("no RFQ contract registered for chain {chain_id}")))
    }

    fn emit(&mut self, event: RfqEvent) {
        let name = event.name();
        let seq = self.events.push(event);
        debug!(chain_id = self.chain_id, seq, event = name, "Event emitted");
    }
}
