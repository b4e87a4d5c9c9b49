//! Administrative state of an RFQ engine: ownership, pausing, fees, treasury
//! and the registry of counterpart contracts.

use crate::error::RfqError;
use alloy_primitives::{Address, U256};
use config::{FeeConfig, FEE_PRECISION};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
pub struct Policy {
    owner: Address,
    pausers: BTreeSet<Address>,
    paused: bool,
    treasury: Address,
    message_bus: Address,
    fee_perc_global: u32,
    fee_perc_override: HashMap<u64, u32>,
    remote_rfq: HashMap<u64, Address>,
}

impl Policy {
    /// Fresh policy owned by `owner`, who is also the first pauser.
    pub fn new(owner: Address, message_bus: Address) -> Self {
        Self {
            owner,
            pausers: BTreeSet::from([owner]),
            paused: false,
            treasury: Address::ZERO,
            message_bus,
            fee_perc_global: 0,
            fee_perc_override: HashMap::new(),
            remote_rfq: HashMap::new(),
        }
    }

    /// Load fee percentages from a validated [`FeeConfig`].
    pub fn with_fees(mut self, fees: &FeeConfig) -> Self {
        let (chain_ids, percs) = fees.as_updates();
        for (chain_id, perc) in chain_ids.into_iter().zip(percs) {
            self.put_fee_perc(chain_id, perc);
        }
        self
    }

    pub const fn owner(&self) -> Address {
        self.owner
    }

    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_pauser(&self, account: &Address) -> bool {
        self.pausers.contains(account)
    }

    pub fn pausers(&self) -> impl Iterator<Item = &Address> {
        self.pausers.iter()
    }

    pub const fn treasury(&self) -> Address {
        self.treasury
    }

    pub const fn message_bus(&self) -> Address {
        self.message_bus
    }

    pub const fn fee_perc_global(&self) -> u32 {
        self.fee_perc_global
    }

    /// Per-chain override, zero when unset.
    pub fn fee_perc_override(&self, chain_id: u64) -> u32 {
        self.fee_perc_override.get(&chain_id).copied().unwrap_or(0)
    }

    /// Fee percentage applied to quotes bound for `dst_chain_id`.
    pub fn fee_perc(&self, dst_chain_id: u64) -> u32 {
        match self.fee_perc_override(dst_chain_id) {
            0 => self.fee_perc_global,
            perc => perc,
        }
    }

    /// `amount * feePerc / 1e6`, rounded down.
    pub fn rfq_fee(&self, dst_chain_id: u64, amount: U256) -> U256 {
        let perc = U256::from(self.fee_perc(dst_chain_id));
        let precision = U256::from(FEE_PRECISION);
        // Split so the product cannot overflow while perc <= FEE_PRECISION.
        amount / precision * perc + amount % precision * perc / precision
    }

    /// Registered RFQ contract on `chain_id`, if any.
    pub fn remote_rfq(&self, chain_id: u64) -> Option<Address> {
        self.remote_rfq
            .get(&chain_id)
            .copied()
            .filter(|addr| !addr.is_zero())
    }

    pub fn ensure_owner(&self, caller: Address) -> Result<(), RfqError> {
        if caller != self.owner {
            return Err(RfqError::Unauthorized {
                caller,
                role: "owner",
            });
        }
        Ok(())
    }

    pub fn ensure_pauser(&self, caller: Address) -> Result<(), RfqError> {
        if !self.pausers.contains(&caller) {
            return Err(RfqError::Unauthorized {
                caller,
                role: "pauser",
            });
        }
        Ok(())
    }

    pub const fn ensure_not_paused(&self) -> Result<(), RfqError> {
        if self.paused {
            return Err(RfqError::Paused);
        }
        Ok(())
    }

    pub(crate) const fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub(crate) const fn set_owner(&mut self, owner: Address) {
        self.owner = owner;
    }

    /// Returns false if the account already was a pauser.
    pub(crate) fn add_pauser(&mut self, account: Address) -> bool {
        self.pausers.insert(account)
    }

    /// Returns false if the account was not a pauser.
    pub(crate) fn remove_pauser(&mut self, account: &Address) -> bool {
        self.pausers.remove(account)
    }

    pub(crate) const fn set_treasury(&mut self, treasury: Address) {
        self.treasury = treasury;
    }

    pub(crate) const fn set_message_bus(&mut self, bus: Address) {
        self.message_bus = bus;
    }

    pub(crate) fn put_fee_perc(&mut self, chain_id: u64, perc: u32) {
        if chain_id == 0 {
            self.fee_perc_global = perc;
        } else if perc == 0 {
            self.fee_perc_override.remove(&chain_id);
        } else {
            self.fee_perc_override.insert(chain_id, perc);
        }
    }

    pub(crate) fn put_remote_rfq(&mut self, chain_id: u64, rfq: Address) {
        if rfq.is_zero() {
            self.remote_rfq.remove(&chain_id);
        } else {
            self.remote_rfq.insert(chain_id, rfq);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: Address = Address::repeat_byte(0x01);

    #[test]
    fn test_rfq_fee_override() {
        let mut policy = Policy::new(OWNER, Address::ZERO);
        policy.put_fee_perc(0, 500);
        policy.put_fee_perc(10, 1000);

        assert_eq!(policy.rfq_fee(10, U256::from(1_000_000)), U256::from(1_000));
    }

    #[test]
    fn test_rfq_fee_global_default() {
        let mut policy = Policy::new(OWNER, Address::ZERO);
        policy.put_fee_perc(0, 500);

        assert_eq!(policy.rfq_fee(56, U256::from(1_000_000)), U256::from(500));
    }

    #[test]
    fn test_rfq_fee_rounds_down() {
        let mut policy = Policy::new(OWNER, Address::ZERO);
        policy.put_fee_perc(0, 3);

        // 999 * 3 / 1e6 < 1
        assert_eq!(policy.rfq_fee(1, U256::from(999)), U256::ZERO);
        assert_eq!(policy.rfq_fee(1, U256::from(1_000_000)), U256::from(3));
    }

    #[test]
    fn test_rfq_fee_exact_for_huge_amounts() {
        let mut policy = Policy::new(OWNER, Address::ZERO);
        policy.put_fee_perc(0, 1000);
        assert_eq!(policy.rfq_fee(1, U256::MAX), U256::MAX / U256::from(1000));

        policy.put_fee_perc(0, FEE_PRECISION);
        assert_eq!(policy.rfq_fee(1, U256::MAX), U256::MAX);
    }

    #[test]
    fn test_zero_override_falls_back_to_global() {
        let mut policy = Policy::new(OWNER, Address::ZERO);
        policy.put_fee_perc(0, 500);
        policy.put_fee_perc(10, 1000);
        policy.put_fee_perc(10, 0);

        assert_eq!(policy.fee_perc_override(10), 0);
        assert_eq!(policy.fee_perc(10), 500);
    }

    #[test]
    fn test_with_fees() {
        let fees = FeeConfig::global(500).with_override(56, 250);
        let policy = Policy::new(OWNER, Address::ZERO).with_fees(&fees);

        assert_eq!(policy.fee_perc_global(), 500);
        assert_eq!(policy.fee_perc(56), 250);
        assert_eq!(policy.fee_perc(1), 500);
    }

    #[test]
    fn test_owner_is_first_pauser() {
        let policy = Policy::new(OWNER, Address::ZERO);

        assert!(policy.is_pauser(&OWNER));
        assert!(policy.ensure_owner(OWNER).is_ok());
        assert!(policy.ensure_owner(Address::repeat_byte(0x02)).is_err());
    }
}
