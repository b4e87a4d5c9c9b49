use crate::{
    error::GatewayError,
    signers::SignerSet,
    verify::{compute_message_id, signing_payload, verify_signed_powers},
};
use alloy_primitives::{Address, Bytes, B256, U256};
use binding::RouteInfo;
use std::collections::HashSet;
use tracing::debug;

/// Validator attestation accompanying an inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageProof {
    pub sigs: Vec<Bytes>,
    pub signers: Vec<Address>,
    pub powers: Vec<U256>,
}

impl MessageProof {
    pub const fn new(sigs: Vec<Bytes>, signers: Vec<Address>, powers: Vec<U256>) -> Self {
        Self {
            sigs,
            signers,
            powers,
        }
    }
}

/// A message whose quorum check passed but which is not yet marked executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedMessage {
    pub id: B256,
    pub src_chain_id: u64,
    pub sender: Address,
    pub signed_power: U256,
}

/// Message bus endpoint on one chain.
///
/// Verification and consumption are split so a caller can run every other
/// check of its transaction between the two and leave no trace on failure.
#[derive(Debug, Clone)]
pub struct MessageGateway {
    chain_id: u64,
    address: Address,
    owner: Address,
    signers: SignerSet,
    executed: HashSet<B256>,
}

impl MessageGateway {
    pub fn new(chain_id: u64, address: Address, owner: Address, signers: SignerSet) -> Self {
        Self {
            chain_id,
            address,
            owner,
            signers,
            executed: HashSet::new(),
        }
    }

    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub const fn signers(&self) -> &SignerSet {
        &self.signers
    }

    /// Point the signing domain at a different bus deployment.
    pub const fn set_address(&mut self, address: Address) {
        self.address = address;
    }

    /// Replace the validator set. Owner only.
    pub fn reset_signers(&mut self, caller: Address, signers: SignerSet) -> Result<(), GatewayError> {
        if caller != self.owner {
            return Err(GatewayError::NotOwner(caller));
        }

        debug!(
            old = %self.signers.hash(),
            new = %signers.hash(),
            total_power = %signers.total_power(),
            "Resetting validator set"
        );
        self.signers = signers;
        Ok(())
    }

    pub fn is_executed(&self, id: &B256) -> bool {
        self.executed.contains(id)
    }

    /// Check `proof` against `message` without recording anything.
    pub fn verify(
        &self,
        message: &[u8],
        route: &RouteInfo,
        proof: &MessageProof,
    ) -> Result<VerifiedMessage, GatewayError> {
        let id = compute_message_id(message, route, self.chain_id);
        if self.executed.contains(&id) {
            return Err(GatewayError::Duplicate(id));
        }

        if !self.signers.matches(&proof.signers, &proof.powers) {
            return Err(GatewayError::MismatchedSigners);
        }

        let payload = signing_payload(self.chain_id, self.address, id);
        let signed_power = verify_signed_powers(&self.signers, payload, &proof.sigs)?;

        debug!(
            message_id = %id,
            src_chain_id = route.srcChainId,
            sender = %route.sender,
            %signed_power,
            "Message verified"
        );

        Ok(VerifiedMessage {
            id,
            src_chain_id: route.srcChainId,
            sender: route.sender,
            signed_power,
        })
    }

    /// Mark a verified message executed.
    pub fn consume(&mut self, verified: &VerifiedMessage) -> Result<(), GatewayError> {
        if !self.executed.insert(verified.id) {
            return Err(GatewayError::Duplicate(verified.id));
        }
        Ok(())
    }
}
