//! Governance token supply accounting and vote weights.

use crate::error::TransferError;
use quorum_types::{mul_div, AccountId};
use serde::{Deserialize, Serialize};

/// The DAO's own token.
///
/// Supply lives in three pools: the unreleased reserve, the treasury's
/// custody, and holder balances (the circulating supply).
pub trait GovernanceToken {
    fn balance_of(&self, who: &AccountId) -> u128;

    /// Sum of all holder balances.
    fn circulating_supply(&self) -> u128;

    fn unreleased_supply(&self) -> u128;

    /// Unreleased reserve -> custody.
    fn reserve(&mut self, amount: u128) -> Result<(), TransferError>;

    /// Custody -> unreleased reserve.
    fn unreserve(&mut self, amount: u128) -> Result<(), TransferError>;

    /// Custody -> holder.
    fn release(&mut self, to: &AccountId, amount: u128) -> Result<(), TransferError>;

    /// Holder -> custody.
    fn collect(&mut self, from: &AccountId, amount: u128) -> Result<(), TransferError>;

    /// Destroy `amount` of the holder's balance.
    fn burn(&mut self, from: &AccountId, amount: u128) -> Result<(), TransferError>;

    /// Turn `amount` of the holder's dev-class balance into circulating
    /// tokens.
    fn convert(&mut self, holder: &AccountId, amount: u128) -> Result<(), TransferError>;

    /// Class balances backing weighted votes.
    fn weights(&self) -> &dyn WeightSource;
}

/// Balances in the two weighted token classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassBalances {
    pub normal: u128,
    pub dev: u128,
}

impl ClassBalances {
    /// `normal + dev * dev_ratio_percent / 100`, or `None` on overflow.
    pub fn weight(&self, dev_ratio_percent: u32) -> Option<u128> {
        let dev = mul_div(self.dev, u128::from(dev_ratio_percent), 100)?;
        self.normal.checked_add(dev)
    }
}

/// Supplies per-account class balances for weighted proposals.
pub trait WeightSource {
    fn balances(&self, who: &AccountId) -> ClassBalances;

    /// Totals across every holder.
    fn total_balances(&self) -> ClassBalances;
}
