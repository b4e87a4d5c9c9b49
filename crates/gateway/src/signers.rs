use crate::error::GatewayError;
use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;

/// `keccak256(abi.encodePacked(signers, powers))`
pub fn compute_signers_hash(signers: &[Address], powers: &[U256]) -> B256 {
    keccak256((signers.to_vec(), powers.to_vec()).abi_encode_packed())
}

/// Registered validator set.
///
/// Signers are kept in ascending address order so lookups can binary search
/// and the set hash is canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerSet {
    signers: Vec<Address>,
    powers: Vec<U256>,
    total_power: U256,
    hash: B256,
}

impl SignerSet {
    pub fn new(signers: Vec<Address>, powers: Vec<U256>) -> Result<Self, GatewayError> {
        if signers.is_empty() {
            return Err(GatewayError::InvalidSignerSet("empty".into()));
        }
        if signers.len() != powers.len() {
            return Err(GatewayError::InvalidSignerSet(format!(
                "{} signers but {} powers",
                signers.len(),
                powers.len()
            )));
        }
        if signers.windows(2).any(|w| w[0] >= w[1]) {
            return Err(GatewayError::InvalidSignerSet(
                "signers must be in ascending order without duplicates".into(),
            ));
        }
        if signers.contains(&Address::ZERO) {
            return Err(GatewayError::InvalidSignerSet("zero address signer".into()));
        }

        let mut total_power = U256::ZERO;
        for power in &powers {
            if power.is_zero() {
                return Err(GatewayError::InvalidSignerSet("zero power".into()));
            }
            total_power = total_power
                .checked_add(*power)
                .ok_or_else(|| GatewayError::InvalidSignerSet("total power overflow".into()))?;
        }

        let hash = compute_signers_hash(&signers, &powers);

        Ok(Self {
            signers,
            powers,
            total_power,
            hash,
        })
    }

    pub fn signers(&self) -> &[Address] {
        &self.signers
    }

    pub fn powers(&self) -> &[U256] {
        &self.powers
    }

    pub const fn total_power(&self) -> U256 {
        self.total_power
    }

    pub const fn hash(&self) -> B256 {
        self.hash
    }

    /// Minimum signed power for a message to pass: strictly more than two
    /// thirds of the total.
    pub fn quorum(&self) -> U256 {
        self.total_power * U256::from(2) / U256::from(3) + U256::from(1)
    }

    /// Voting power of `signer`, or `None` if it is not a validator.
    pub fn power_of(&self, signer: &Address) -> Option<U256> {
        self.signers
            .binary_search(signer)
            .ok()
            .map(|idx| self.powers[idx])
    }

    /// Whether the caller-supplied lists describe this set.
    pub fn matches(&self, signers: &[Address], powers: &[U256]) -> bool {
        signers.len() == powers.len() && compute_signers_hash(signers, powers) == self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn powers(values: &[u64]) -> Vec<U256> {
        values.iter().map(|v| U256::from(*v)).collect()
    }

    fn addrs(bytes: &[u8]) -> Vec<Address> {
        bytes.iter().map(|b| Address::repeat_byte(*b)).collect()
    }

    #[test]
    fn test_quorum_threshold() {
        let set = SignerSet::new(addrs(&[1, 2, 3, 4]), powers(&[40, 30, 20, 10])).unwrap();

        assert_eq!(set.total_power(), U256::from(100));
        assert_eq!(set.quorum(), U256::from(67));
    }

    #[test]
    fn test_power_lookup() {
        let set = SignerSet::new(addrs(&[1, 2, 3]), powers(&[5, 6, 7])).unwrap();

        assert_eq!(set.power_of(&Address::repeat_byte(2)), Some(U256::from(6)));
        assert_eq!(set.power_of(&Address::repeat_byte(9)), None);
    }

    #[test]
    fn test_rejects_malformed_sets() {
        assert!(SignerSet::new(vec![], vec![]).is_err());
        assert!(SignerSet::new(addrs(&[1, 2]), powers(&[1])).is_err());
        assert!(SignerSet::new(addrs(&[2, 1]), powers(&[1, 1])).is_err());
        assert!(SignerSet::new(addrs(&[1, 1]), powers(&[1, 1])).is_err());
        assert!(SignerSet::new(addrs(&[1, 2]), powers(&[1, 0])).is_err());
        assert!(SignerSet::new(vec![Address::ZERO], powers(&[1])).is_err());
    }

    #[test]
    fn test_matches_by_hash() {
        let set = SignerSet::new(addrs(&[1, 2]), powers(&[10, 20])).unwrap();

        assert!(set.matches(&addrs(&[1, 2]), &powers(&[10, 20])));
        assert!(!set.matches(&addrs(&[1, 2]), &powers(&[20, 10])));
        assert!(!set.matches(&addrs(&[1]), &powers(&[10])));
    }
}
