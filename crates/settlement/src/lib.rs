//! In-process RFQ settlement engine.
//!
//! One [`Rfq`] models the RFQ contract of a single chain: the source-side
//! escrow, the destination-side transfer handler, fee policy and pausing.
//! Engines on different chains talk only through [`OutboundMessage`]s that a
//! relayer turns into quorum-signed [`InboundMessage`]s.

pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod policy;
pub mod shared;
pub mod vault;

pub use context::CallContext;
pub use engine::{InboundMessage, Rfq};
pub use error::{ErrorKind, RfqError, TokenError};
pub use events::{EventLog, EventRecord, OutboundMessage, RfqEvent};
pub use policy::Policy;
pub use shared::SharedRfq;
pub use vault::{InMemoryTokens, TokenLedger, Vault};
