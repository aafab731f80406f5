//! A single beneficiary's position in one scheme.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};

/// `claimed <= unlocked <= assigned`, always.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub assigned: u128,
    pub unlocked: u128,
    pub claimed: u128,
}

impl LedgerEntry {
    /// Assigned but not yet unlocked.
    pub fn locked(&self) -> u128 {
        self.assigned - self.unlocked
    }

    /// Unlocked but not yet claimed.
    pub fn claimable(&self) -> u128 {
        self.unlocked - self.claimed
    }

    pub fn holds_invariant(&self) -> bool {
        self.claimed <= self.unlocked && self.unlocked <= self.assigned
    }

    pub(crate) fn credit(&mut self, amount: u128) -> Result<(), LedgerError> {
        self.assigned = self
            .assigned
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    pub(crate) fn unlock(&mut self, amount: u128) -> Result<(), LedgerError> {
        if amount > self.locked() {
            return Err(LedgerError::InsufficientLocked {
                needed: amount,
                available: self.locked(),
            });
        }
        self.unlocked += amount;
        Ok(())
    }

    pub(crate) fn claim(&mut self, amount: u128) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if amount > self.claimable() {
            return Err(LedgerError::InsufficientUnlocked {
                needed: amount,
                available: self.claimable(),
            });
        }
        self.claimed += amount;
        Ok(())
    }
}
