//! Contract bindings for the RFQ settlement contracts.
//!
//! This crate consolidates the Solidity interfaces used across the project:
//! - RFQ contract (quote structs, events, settlement entry points)
//! - Message bus (inbound message execution)
//! - ERC20 tokens
//!
//! All bindings are generated using alloy's `sol!` macro.

pub mod rfq;
pub mod token;

pub use rfq::{IMessageBus, IRfq, Quote, RouteInfo};
