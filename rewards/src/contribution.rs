//! Contributor weights for one unit of work.

use crate::error::RewardError;
use quorum_ledger::share;
use quorum_types::{apply_percent, AccountId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight per contributor plus the running total.
///
/// Updates overwrite: recording a contributor again replaces their weight.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBook {
    weights: BTreeMap<AccountId, u128>,
    total: u128,
}

impl ContributionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weight_of(&self, who: &AccountId) -> u128 {
        self.weights.get(who).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u128 {
        self.total
    }

    /// Number of contributors with a non-zero weight.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, u128)> {
        self.weights.iter().map(|(who, w)| (who, *w))
    }

    /// Set `who`'s weight, replacing any earlier value. Zero removes them.
    pub fn set(&mut self, who: &AccountId, weight: u128) -> Result<(), RewardError> {
        let previous = self.weight_of(who);
        let total = (self.total - previous)
            .checked_add(weight)
            .ok_or(RewardError::Overflow)?;
        if weight == 0 {
            self.weights.remove(who);
        } else {
            self.weights.insert(who.clone(), weight);
        }
        self.total = total;
        Ok(())
    }

    /// Apply a batch of updates; on overflow nothing changes.
    pub fn apply(&mut self, updates: &[(AccountId, u128)]) -> Result<(), RewardError> {
        let mut next = self.clone();
        for (who, weight) in updates {
            next.set(who, *weight)?;
        }
        *self = next;
        Ok(())
    }

    /// `floor(pool * weight * percent / 100 / total)`; zero for anyone who
    /// did not contribute.
    pub fn payout(&self, who: &AccountId, pool: u128, percent: u32) -> Result<u128, RewardError> {
        let weight = self.weight_of(who);
        if weight == 0 || self.total == 0 {
            return Ok(0);
        }
        let scaled_weight = weight
            .checked_mul(u128::from(percent))
            .ok_or(RewardError::Overflow)?;
        let scaled_total = self.total.checked_mul(100).ok_or(RewardError::Overflow)?;
        Ok(share(pool, scaled_weight, scaled_total)?)
    }
}

/// Tokens that must be set aside so every payout at `percent` is covered:
/// `floor(pool * percent / 100)`.
pub fn reward_pool(pool: u128, percent: u32) -> Result<u128, RewardError> {
    apply_percent(pool, u128::from(percent)).ok_or(RewardError::Overflow)
}
