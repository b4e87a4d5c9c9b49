use alloy_primitives::{Address, U256};
use gateway::GatewayError;
use thiserror::Error;

/// Coarse failure classes callers branch on.
///
/// Relayers rely on `AlreadyProcessed` to make retries idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    AlreadyProcessed,
    Unauthorized,
    InsufficientFunds,
    PausedState,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient balance of {token} for {owner}: have {available}, need {required}")]
    InsufficientBalance {
        token: Address,
        owner: Address,
        available: U256,
        required: U256,
    },

    #[error("insufficient allowance of {token} from {owner} to {spender}: have {available}, need {required}")]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        spender: Address,
        available: U256,
        required: U256,
    },

    #[error("transfer to the zero address")]
    ZeroRecipient,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RfqError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("already processed: {0}")]
    AlreadyProcessed(String),

    #[error("{caller} is not {role}")]
    Unauthorized { caller: Address, role: &'static str },

    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("contract is paused")]
    Paused,

    #[error("message verification failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("token transfer failed: {0}")]
    Token(#[from] TokenError),
}

impl RfqError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    pub fn processed(reason: impl Into<String>) -> Self {
        Self::AlreadyProcessed(reason.into())
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::AlreadyProcessed(_) => ErrorKind::AlreadyProcessed,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InsufficientFunds(_) => ErrorKind::InsufficientFunds,
            Self::Paused => ErrorKind::PausedState,
            Self::Gateway(GatewayError::Duplicate(_)) => ErrorKind::AlreadyProcessed,
            Self::Gateway(e) if e.is_forbidden() => ErrorKind::Unauthorized,
            Self::Gateway(_) => ErrorKind::InvalidInput,
            Self::Token(TokenError::ZeroRecipient) => ErrorKind::InvalidInput,
            Self::Token(_) => ErrorKind::InsufficientFunds,
        }
    }
}
