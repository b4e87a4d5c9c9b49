//! Chain configuration for RFQ routes.
//!
//! A route pairs the chain where quotes are deposited with the chain where
//! they are paid out. Presets carry chain parameters only; contract addresses
//! are deployment specific and are set through the builder or a config file.

use crate::ConfigError;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Parameters and RFQ deployment on a single chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain ID
    pub chain_id: u64,
    /// RFQ contract address
    pub rfq: Address,
    /// Message bus contract address
    #[serde(default)]
    pub message_bus: Address,
    /// Block time in seconds, used to size lookback windows
    pub block_time_secs: u64,
}

impl ChainConfig {
    pub const fn new(chain_id: u64, block_time_secs: u64) -> Self {
        Self {
            chain_id,
            rfq: Address::ZERO,
            message_bus: Address::ZERO,
            block_time_secs,
        }
    }

    /// Ethereum mainnet.
    pub const fn ethereum() -> Self {
        Self::new(1, 12)
    }

    /// Arbitrum One. Sub-second blocks are rounded up.
    pub const fn arbitrum() -> Self {
        Self::new(42161, 1)
    }

    /// OP Mainnet.
    pub const fn optimism() -> Self {
        Self::new(10, 2)
    }

    /// BNB Smart Chain.
    pub const fn bsc() -> Self {
        Self::new(56, 3)
    }

    /// Polygon PoS.
    pub const fn polygon() -> Self {
        Self::new(137, 2)
    }

    /// Number of blocks covering `secs` seconds, at least one.
    pub const fn blocks_for(&self, secs: u64) -> u64 {
        let blocks = secs / self.block_time_secs;
        if blocks == 0 {
            1
        } else {
            blocks
        }
    }
}

/// A source/destination chain pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Chain where quotes are deposited and released or refunded
    pub src: ChainConfig,
    /// Chain where quotes are transferred to the receiver
    pub dst: ChainConfig,
}

impl RouteConfig {
    /// Check that both RFQ contracts are known and the chains differ.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.src.chain_id == self.dst.chain_id {
            return Err(ConfigError::SameChain(self.src.chain_id));
        }

        for chain in [&self.src, &self.dst] {
            if chain.rfq == Address::ZERO {
                return Err(ConfigError::MissingAddress {
                    chain_id: chain.chain_id,
                    what: "RFQ contract",
                });
            }
        }

        Ok(())
    }

    /// The reverse direction, used for quotes flowing the other way.
    pub const fn reversed(&self) -> Self {
        Self {
            src: self.dst,
            dst: self.src,
        }
    }
}

/// Builder for route configurations.
#[derive(Debug, Clone)]
pub struct RouteConfigBuilder {
    src: ChainConfig,
    dst: ChainConfig,
}

impl RouteConfigBuilder {
    /// Start from two chain presets.
    pub const fn new(src: ChainConfig, dst: ChainConfig) -> Self {
        Self { src, dst }
    }

    /// Set the source chain RFQ contract.
    pub const fn src_rfq(mut self, address: Address) -> Self {
        self.src.rfq = address;
        self
    }

    /// Set the destination chain RFQ contract.
    pub const fn dst_rfq(mut self, address: Address) -> Self {
        self.dst.rfq = address;
        self
    }

    /// Set the source chain message bus.
    pub const fn src_message_bus(mut self, address: Address) -> Self {
        self.src.message_bus = address;
        self
    }

    /// Set the destination chain message bus.
    pub const fn dst_message_bus(mut self, address: Address) -> Self {
        self.dst.message_bus = address;
        self
    }

    /// Build and validate the route.
    pub fn build(self) -> Result<RouteConfig, ConfigError> {
        let route = RouteConfig {
            src: self.src,
            dst: self.dst,
        };
        route.validate()?;

        Ok(route)
    }
}
