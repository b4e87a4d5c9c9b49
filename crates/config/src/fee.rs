//! Fee policy configuration.
//!
//! Fee percentages are expressed in millionths: `1_000` is 0.1%.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Denominator for fee percentages.
pub const FEE_PRECISION: u32 = 1_000_000;

/// Initial fee policy for a settlement engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Fee applied to chains without an override
    #[serde(default)]
    pub global_perc: u32,
    /// Per destination chain overrides
    #[serde(default)]
    pub overrides: Vec<FeeOverride>,
}

/// Fee percentage for a single destination chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeOverride {
    pub chain_id: u64,
    pub perc: u32,
}

impl FeeConfig {
    pub const fn global(perc: u32) -> Self {
        Self {
            global_perc: perc,
            overrides: Vec::new(),
        }
    }

    /// Add or replace an override for a destination chain.
    pub fn with_override(mut self, chain_id: u64, perc: u32) -> Self {
        match self.overrides.iter_mut().find(|o| o.chain_id == chain_id) {
            Some(existing) => existing.perc = perc,
            None => self.overrides.push(FeeOverride { chain_id, perc }),
        }
        self
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    /// Reject percentages above [`FEE_PRECISION`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.global_perc > FEE_PRECISION {
            return Err(ConfigError::FeeTooLarge {
                chain_id: 0,
                perc: self.global_perc,
                max: FEE_PRECISION,
            });
        }

        if let Some(o) = self.overrides.iter().find(|o| o.perc > FEE_PRECISION) {
            return Err(ConfigError::FeeTooLarge {
                chain_id: o.chain_id,
                perc: o.perc,
                max: FEE_PRECISION,
            });
        }

        Ok(())
    }

    /// Flatten into the `(chainIds, feePercs)` shape of `setFeePerc`,
    /// with chain id 0 standing for the global default.
    pub fn as_updates(&self) -> (Vec<u64>, Vec<u32>) {
        std::iter::once((0, self.global_perc))
            .chain(self.overrides.iter().map(|o| (o.chain_id, o.perc)))
            .unzip()
    }
}
