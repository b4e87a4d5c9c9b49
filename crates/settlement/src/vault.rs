//! Token movements and the engine's own holdings.
//!
//! [`TokenLedger`] is the ERC20 surface the engine needs. [`Vault`] splits
//! what the engine holds of each token into escrowed principal and accrued
//! fees, so fee collection can never reach into escrow.

use crate::error::TokenError;
use alloy_primitives::{Address, U256};
use std::collections::HashMap;

/// Fungible token balances on one chain.
pub trait TokenLedger {
    fn balance_of(&self, token: Address, owner: Address) -> U256;

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256;

    /// Move `amount` out of `from`'s own balance.
    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`, spending its
    /// allowance.
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError>;
}

/// Map-backed [`TokenLedger`] for simulations and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokens {
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
}

impl InMemoryTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, token: Address, to: Address, amount: U256) {
        *self.balances.entry((token, to)).or_default() += amount;
    }

    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((token, owner, spender), amount);
    }

    fn debit(&mut self, token: Address, owner: Address, amount: U256) -> Result<(), TokenError> {
        let available = self.balance_of(token, owner);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                token,
                owner,
                available,
                required: amount,
            });
        }
        self.balances.insert((token, owner), available - amount);
        Ok(())
    }
}

impl TokenLedger for InMemoryTokens {
    fn balance_of(&self, token: Address, owner: Address) -> U256 {
        self.balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroRecipient);
        }
        self.debit(token, from, amount)?;
        self.mint(token, to, amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let available = self.allowance(token, from, spender);
        if available < amount {
            return Err(TokenError::InsufficientAllowance {
                token,
                owner: from,
                spender,
                available,
                required: amount,
            });
        }
        self.transfer(token, from, to, amount)?;
        self.allowances
            .insert((token, from, spender), available - amount);
        Ok(())
    }
}

/// Per-token split of the engine's holdings.
#[derive(Debug, Clone, Default)]
pub struct Vault {
    principal: HashMap<Address, U256>,
    fees: HashMap<Address, U256>,
}

impl Vault {
    pub fn principal(&self, token: &Address) -> U256 {
        self.principal.get(token).copied().unwrap_or_default()
    }

    pub fn fees(&self, token: &Address) -> U256 {
        self.fees.get(token).copied().unwrap_or_default()
    }

    pub(crate) fn lock(&mut self, token: Address, amount: U256) {
        *self.principal.entry(token).or_default() += amount;
    }

    /// Drop `amount` of principal that has been paid out.
    pub(crate) fn unlock(&mut self, token: Address, amount: U256) {
        let entry = self.principal.entry(token).or_default();
        *entry = entry.saturating_sub(amount);
    }

    /// Reclassify `fee` of principal as accrued fees.
    pub(crate) fn accrue(&mut self, token: Address, fee: U256) {
        self.unlock(token, fee);
        *self.fees.entry(token).or_default() += fee;
    }

    pub(crate) fn withdraw_fees(&mut self, token: Address, amount: U256) {
        let entry = self.fees.entry(token).or_default();
        *entry = entry.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: Address = Address::repeat_byte(0x70);
    const ALICE: Address = Address::repeat_byte(0x0a);
    const BOB: Address = Address::repeat_byte(0x0b);

    #[test]
    fn test_transfer_moves_balance() {
        let mut tokens = InMemoryTokens::new();
        tokens.mint(TOKEN, ALICE, U256::from(100));

        tokens.transfer(TOKEN, ALICE, BOB, U256::from(40)).unwrap();

        assert_eq!(tokens.balance_of(TOKEN, ALICE), U256::from(60));
        assert_eq!(tokens.balance_of(TOKEN, BOB), U256::from(40));
    }

    #[test]
    fn test_transfer_insufficient_balance_leaves_state() {
        let mut tokens = InMemoryTokens::new();
        tokens.mint(TOKEN, ALICE, U256::from(10));

        let err = tokens.transfer(TOKEN, ALICE, BOB, U256::from(11)).unwrap_err();

        assert!(matches!(err, TokenError::InsufficientBalance { .. }));
        assert_eq!(tokens.balance_of(TOKEN, ALICE), U256::from(10));
        assert_eq!(tokens.balance_of(TOKEN, BOB), U256::ZERO);
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let mut tokens = InMemoryTokens::new();
        tokens.mint(TOKEN, ALICE, U256::from(100));
        tokens.approve(TOKEN, ALICE, BOB, U256::from(50));

        tokens
            .transfer_from(TOKEN, BOB, ALICE, BOB, U256::from(30))
            .unwrap();
        assert_eq!(tokens.allowance(TOKEN, ALICE, BOB), U256::from(20));

        let err = tokens
            .transfer_from(TOKEN, BOB, ALICE, BOB, U256::from(30))
            .unwrap_err();
        assert!(matches!(err, TokenError::InsufficientAllowance { .. }));
        assert_eq!(tokens.balance_of(TOKEN, ALICE), U256::from(70));
    }

    #[test]
    fn test_vault_keeps_fees_apart() {
        let mut vault = Vault::default();
        vault.lock(TOKEN, U256::from(1_000));
        vault.accrue(TOKEN, U256::from(10));

        assert_eq!(vault.principal(&TOKEN), U256::from(990));
        assert_eq!(vault.fees(&TOKEN), U256::from(10));

        vault.withdraw_fees(TOKEN, U256::from(10));
        assert_eq!(vault.fees(&TOKEN), U256::ZERO);
        assert_eq!(vault.principal(&TOKEN), U256::from(990));
    }
}
