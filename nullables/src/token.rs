//! Nullable governance token with two weighted balance classes.

use quorum_host::{ClassBalances, GovernanceToken, TransferError, WeightSource};
use quorum_types::{AccountId, AssetId};
use std::collections::BTreeMap;

/// In-memory governance token.
///
/// `normal` balances are the circulating supply; `dev` balances only feed
/// vote weight.
#[derive(Default)]
pub struct NullToken {
    holders: BTreeMap<AccountId, ClassBalances>,
    unreleased: u128,
    custody: u128,
    burned: u128,
    fail_next: Option<String>,
}

impl NullToken {
    /// A token whose whole supply starts unreleased.
    pub fn new(unreleased: u128) -> Self {
        Self {
            unreleased,
            ..Self::default()
        }
    }

    /// Give `who` circulating tokens directly (test setup).
    pub fn mint(&mut self, who: &AccountId, amount: u128) {
        self.holders.entry(who.clone()).or_default().normal += amount;
    }

    /// Give `who` dev-class tokens that only count for vote weight.
    pub fn mint_dev(&mut self, who: &AccountId, amount: u128) {
        self.holders.entry(who.clone()).or_default().dev += amount;
    }

    pub fn custody(&self) -> u128 {
        self.custody
    }

    pub fn burned(&self) -> u128 {
        self.burned
    }

    /// Make the next supply movement fail with `reason`.
    pub fn fail_next_transfer(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    fn check_injected_failure(&mut self) -> Result<(), TransferError> {
        match self.fail_next.take() {
            Some(reason) => Err(TransferError::Refused(reason)),
            None => Ok(()),
        }
    }

    fn debit_holder(&mut self, who: &AccountId, amount: u128) -> Result<(), TransferError> {
        let balance = self.holders.entry(who.clone()).or_default();
        if balance.normal < amount {
            return Err(TransferError::InsufficientBalance {
                asset: AssetId::token("governance"),
                account: who.clone(),
                needed: amount,
                available: balance.normal,
            });
        }
        balance.normal -= amount;
        Ok(())
    }
}

impl GovernanceToken for NullToken {
    fn balance_of(&self, who: &AccountId) -> u128 {
        self.holders.get(who).map(|b| b.normal).unwrap_or(0)
    }

    fn circulating_supply(&self) -> u128 {
        self.holders.values().map(|b| b.normal).sum()
    }

    fn unreleased_supply(&self) -> u128 {
        self.unreleased
    }

    fn reserve(&mut self, amount: u128) -> Result<(), TransferError> {
        self.check_injected_failure()?;
        if self.unreleased < amount {
            return Err(TransferError::InsufficientSupply {
                needed: amount,
                available: self.unreleased,
            });
        }
        self.unreleased -= amount;
        self.custody += amount;
        Ok(())
    }

    fn unreserve(&mut self, amount: u128) -> Result<(), TransferError> {
        self.check_injected_failure()?;
        if self.custody < amount {
            return Err(TransferError::InsufficientSupply {
                needed: amount,
                available: self.custody,
            });
        }
        self.custody -= amount;
        self.unreleased = self.unreleased.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(())
    }

    fn release(&mut self, to: &AccountId, amount: u128) -> Result<(), TransferError> {
        self.check_injected_failure()?;
        if self.custody < amount {
            return Err(TransferError::InsufficientSupply {
                needed: amount,
                available: self.custody,
            });
        }
        self.custody -= amount;
        let balance = self.holders.entry(to.clone()).or_default();
        balance.normal = balance.normal.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(())
    }

    fn collect(&mut self, from: &AccountId, amount: u128) -> Result<(), TransferError> {
        self.check_injected_failure()?;
        self.debit_holder(from, amount)?;
        self.custody = self.custody.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(())
    }

    fn burn(&mut self, from: &AccountId, amount: u128) -> Result<(), TransferError> {
        self.check_injected_failure()?;
        self.debit_holder(from, amount)?;
        self.burned = self.burned.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(())
    }

    fn convert(&mut self, holder: &AccountId, amount: u128) -> Result<(), TransferError> {
        self.check_injected_failure()?;
        let balance = self.holders.entry(holder.clone()).or_default();
        if balance.dev < amount {
            return Err(TransferError::InsufficientBalance {
                asset: AssetId::token("governance-dev"),
                account: holder.clone(),
                needed: amount,
                available: balance.dev,
            });
        }
        balance.dev -= amount;
        balance.normal = balance.normal.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(())
    }

    fn weights(&self) -> &dyn WeightSource {
        self
    }
}

impl WeightSource for NullToken {
    fn balances(&self, who: &AccountId) -> ClassBalances {
        self.holders.get(who).copied().unwrap_or_default()
    }

    fn total_balances(&self) -> ClassBalances {
        self.holders
            .values()
            .fold(ClassBalances::default(), |acc, b| ClassBalances {
                normal: acc.normal + b.normal,
                dev: acc.dev + b.dev,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supply_moves_between_pools() {
        let bob = AccountId::new("bob");
        let mut token = NullToken::new(1_000);
        token.reserve(400).unwrap();
        token.release(&bob, 300).unwrap();
        assert_eq!(token.unreleased_supply(), 600);
        assert_eq!(token.custody(), 100);
        assert_eq!(token.circulating_supply(), 300);

        token.unreserve(100).unwrap();
        assert_eq!(token.unreleased_supply(), 700);

        token.burn(&bob, 50).unwrap();
        assert_eq!(token.circulating_supply(), 250);
        assert_eq!(token.burned(), 50);
    }

    #[test]
    fn dev_class_counts_for_weight_only() {
        let carol = AccountId::new("carol");
        let mut token = NullToken::new(0);
        token.mint(&carol, 10);
        token.mint_dev(&carol, 20);
        assert_eq!(token.circulating_supply(), 10);
        assert_eq!(token.balances(&carol), ClassBalances { normal: 10, dev: 20 });
    }

    #[test]
    fn conversion_moves_dev_into_circulation() {
        let dave = AccountId::new("dave");
        let mut token = NullToken::new(0);
        token.mint_dev(&dave, 50);
        token.convert(&dave, 30).unwrap();
        assert_eq!(token.balances(&dave), ClassBalances { normal: 30, dev: 20 });
        assert_eq!(token.circulating_supply(), 30);
        assert!(matches!(
            token.convert(&dave, 21),
            Err(TransferError::InsufficientBalance { needed: 21, available: 20, .. })
        ));
    }

    #[test]
    fn reserve_is_bounded_by_unreleased_supply() {
        let mut token = NullToken::new(5);
        assert!(matches!(
            token.reserve(6),
            Err(TransferError::InsufficientSupply { needed: 6, available: 5 })
        ));
    }
}
