use ::config::{FeeConfig, RouteConfig};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

const fn default_lookback_secs() -> u64 {
    // One day
    86_400
}

const fn default_poll_interval_secs() -> u64 {
    30
}

/// Top-level relayer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source chain RPC endpoint url
    pub src_rpc_url: String,

    /// Destination chain RPC endpoint url
    pub dst_rpc_url: String,

    /// Chains and RFQ deployments of the watched route
    pub route: RouteConfig,

    /// How far back to scan for deposits
    #[serde(default = "default_lookback_secs")]
    pub lookback_secs: u64,

    /// Delay between report cycles and event polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Port of the Prometheus exporter, disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Expected fee policy, checked against the source contract on startup
    #[serde(default)]
    pub fees: Option<FeeConfig>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> eyre::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> eyre::Result<()> {
        self.route.validate()?;

        if let Some(fees) = &self.fees {
            fees.validate()?;
        }

        if self.poll_interval_secs == 0 {
            eyre::bail!("poll_interval_secs must be positive");
        }

        Ok(())
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const MINIMAL: &str = r#"
        src_rpc_url = "http://localhost:8545"
        dst_rpc_url = "http://localhost:9545"

        [route.src]
        chain_id = 1
        rfq = "0x00000000000000000000000000000000000000a1"
        block_time_secs = 12

        [route.dst]
        chain_id = 10
        rfq = "0x00000000000000000000000000000000000000a2"
        block_time_secs = 2
    "#;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml(MINIMAL).unwrap();

        assert_eq!(config.lookback_secs, 86_400);
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.metrics_port, None);
        assert!(config.fees.is_none());
        assert_eq!(
            config.route.dst.rfq,
            address!("00000000000000000000000000000000000000a2")
        );
    }

    #[test]
    fn test_same_chain_route_rejected() {
        let contents = MINIMAL.replace("chain_id = 10", "chain_id = 1");
        assert!(Config::from_toml(&contents).is_err());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let contents = format!("poll_interval_secs = 0\n{MINIMAL}");
        assert!(Config::from_toml(&contents).is_err());
    }
}
