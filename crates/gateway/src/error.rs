use alloy_primitives::{Address, B256, U256};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("supplied signers do not match the registered validator set")]
    MismatchedSigners,

    #[error("quorum not reached: signed power {signed}, required {quorum}")]
    QuorumNotReached { signed: U256, quorum: U256 },

    #[error("signer {0} signed more than once")]
    DuplicateSigner(Address),

    #[error("message {0} was already executed")]
    Duplicate(B256),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid signer set: {0}")]
    InvalidSignerSet(String),

    #[error("{0} is not the gateway owner")]
    NotOwner(Address),
}

impl GatewayError {
    /// Failures of the quorum check itself, as opposed to malformed input.
    pub const fn is_forbidden(&self) -> bool {
        matches!(
            self,
            Self::MismatchedSigners
                | Self::QuorumNotReached { .. }
                | Self::DuplicateSigner(_)
                | Self::NotOwner(_)
        )
    }
}
