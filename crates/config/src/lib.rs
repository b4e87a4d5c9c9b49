//! Configuration types for the RFQ settlement system.
//!
//! This crate provides:
//! - Chain parameters and RFQ contract addresses for a source/destination route
//! - Fee policy configuration used to seed a settlement engine
//! - Configuration loading and validation

pub mod error;
pub mod fee;
pub mod network;

pub use error::ConfigError;
pub use fee::{FeeConfig, FeeOverride, FEE_PRECISION};
pub use network::{ChainConfig, RouteConfig, RouteConfigBuilder};
