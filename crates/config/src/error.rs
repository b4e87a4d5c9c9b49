use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for the expected shape
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Fee percentage above the precision denominator
    #[error("Fee percentage {perc} for chain {chain_id} exceeds {max}")]
    FeeTooLarge { chain_id: u64, perc: u32, max: u32 },

    /// A route is missing a required contract address
    #[error("Missing {what} for chain {chain_id}")]
    MissingAddress { chain_id: u64, what: &'static str },

    /// Source and destination resolve to the same chain
    #[error("Source and destination chain are both {0}")]
    SameChain(u64),
}
