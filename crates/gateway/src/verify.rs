use crate::{error::GatewayError, signers::SignerSet};
use alloy_primitives::{keccak256, Address, Bytes, FixedBytes, B256, U256};
use alloy_signer::Signature;
use alloy_sol_types::SolValue;
use binding::RouteInfo;
use std::collections::HashSet;

/// Message type tag for plain messages without an attached token transfer.
const MESSAGE_ONLY: u8 = 1;

/// Unique id of a message delivered to `dst_chain_id`.
pub fn compute_message_id(message: &[u8], route: &RouteInfo, dst_chain_id: u64) -> B256 {
    let encoded = (
        FixedBytes([MESSAGE_ONLY]),
        route.sender,
        route.receiver,
        route.srcChainId,
        route.srcTxHash,
        dst_chain_id,
        Bytes::copy_from_slice(message),
    )
        .abi_encode_packed();

    keccak256(encoded)
}

/// Signing domain of the message bus deployed at `bus` on `chain_id`.
pub fn signing_domain(chain_id: u64, bus: Address) -> B256 {
    keccak256((U256::from(chain_id), bus, String::from("Message")).abi_encode_packed())
}

/// The 32 bytes validators sign as an EIP-191 personal message.
pub fn signing_payload(chain_id: u64, bus: Address, message_id: B256) -> B256 {
    let domain = signing_domain(chain_id, bus);
    keccak256((domain, message_id).abi_encode_packed())
}

/// Sum the voting power behind `sigs` over `payload`.
///
/// Fails if any signature is malformed or a validator signed twice, and if the
/// summed power stays below the set's quorum. Signatures from addresses
/// outside the set are counted with zero power.
pub fn verify_signed_powers(
    set: &SignerSet,
    payload: B256,
    sigs: &[Bytes],
) -> Result<U256, GatewayError> {
    let quorum = set.quorum();
    let mut seen = HashSet::with_capacity(sigs.len());
    let mut signed = U256::ZERO;

    for sig in sigs {
        let signer = recover_signer(payload, sig)?;
        if !seen.insert(signer) {
            return Err(GatewayError::DuplicateSigner(signer));
        }
        if let Some(power) = set.power_of(&signer) {
            signed += power;
        }
    }

    if signed < quorum {
        return Err(GatewayError::QuorumNotReached { signed, quorum });
    }

    Ok(signed)
}

fn recover_signer(payload: B256, sig: &[u8]) -> Result<Address, GatewayError> {
    if sig.len() != 65 {
        return Err(GatewayError::InvalidSignature(format!(
            "expected 65 bytes, got {}",
            sig.len()
        )));
    }

    let sig = Signature::try_from(sig)
        .map_err(|e| GatewayError::InvalidSignature(e.to_string()))?;

    sig.recover_address_from_msg(payload.as_slice())
        .map_err(|e| GatewayError::InvalidSignature(format!("recovery failed: {e}")))
}
