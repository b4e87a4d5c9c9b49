//! Chain access to a deployed RFQ contract.
//!
//! [`RfqReader`] groups the view calls and log queries, [`RfqWriter`] the
//! transactions. Signing is left to the injected provider.

pub mod events;
pub mod reader;
pub mod writer;

pub use events::{decode_logs, event_stream, RfqLog};
pub use reader::RfqReader;
pub use writer::{RfqWriter, TxOutcome};

use alloy_provider::{Provider, ProviderBuilder};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Transport failure talking to the node
    #[error("Connection error: {0}")]
    Connection(String),

    /// The node rejected the call, usually with the contract's revert reason
    #[error("Reverted: {0}")]
    Reverted(String),

    /// The transaction was sent but its receipt never arrived
    #[error("Confirmation error: {0}")]
    Confirmation(String),

    /// Anything else the contract layer reports (ABI mismatch, empty return)
    #[error("Contract error: {0}")]
    Contract(String),
}

impl From<alloy_contract::Error> for ClientError {
    fn from(err: alloy_contract::Error) -> Self {
        match err {
            alloy_contract::Error::TransportError(rpc) => match rpc.as_error_resp() {
                Some(payload) => Self::Reverted(payload.message.to_string()),
                None => Self::Connection(rpc.to_string()),
            },
            other => Self::Contract(other.to_string()),
        }
    }
}

/// Convenience function to create an ethereum rpc provider from url.
pub fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use alloy_provider::{network::Ethereum, Provider, ProviderBuilder, RootProvider};
    use alloy_transport::mock::Asserter;

    /// Provider answering from the responses queued on the returned asserter,
    /// in request order.
    pub fn mocked_provider() -> (impl Provider + Clone + 'static, Asserter) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        (provider, asserter)
    }

    /// Mock provider for unit tests.
    #[derive(Clone)]
    pub struct MockProvider;

    impl Provider for MockProvider {
        fn root(&self) -> &RootProvider<Ethereum> {
            todo!()
        }
    }
}
