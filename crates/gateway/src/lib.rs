//! Quorum-signature verification for inbound cross-chain messages.
//!
//! A message is accepted when validators holding more than two thirds of the
//! registered voting power signed it. Accepted message ids are single-use.

pub mod error;
pub mod gateway;
pub mod signers;
pub mod verify;

pub use error::GatewayError;
pub use gateway::{MessageGateway, MessageProof, VerifiedMessage};
pub use signers::{compute_signers_hash, SignerSet};
pub use verify::{compute_message_id, signing_domain, signing_payload, verify_signed_powers};
