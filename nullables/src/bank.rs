//! Nullable asset transfer: in-memory balances, allowances, and custody.

use quorum_host::{AssetTransfer, TransferError};
use quorum_types::{AccountId, AssetId};
use std::collections::BTreeMap;

/// In-memory asset ledger for every account plus the treasury's custody.
///
/// Native payments only need a balance; token payments additionally need an
/// allowance granted via [`NullBank::approve`].
#[derive(Default)]
pub struct NullBank {
    balances: BTreeMap<(AssetId, AccountId), u128>,
    allowances: BTreeMap<(AssetId, AccountId), u128>,
    custody: BTreeMap<AssetId, u128>,
    fail_next: Option<String>,
    transfers: u64,
}

impl NullBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `who` an external balance of `asset`.
    pub fn fund(&mut self, asset: &AssetId, who: &AccountId, amount: u128) {
        *self
            .balances
            .entry((asset.clone(), who.clone()))
            .or_default() += amount;
    }

    /// Let the treasury pull up to `amount` of a token from `who`.
    pub fn approve(&mut self, asset: &AssetId, who: &AccountId, amount: u128) {
        self.allowances
            .insert((asset.clone(), who.clone()), amount);
    }

    pub fn allowance(&self, asset: &AssetId, who: &AccountId) -> u128 {
        self.allowances
            .get(&(asset.clone(), who.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Make the next movement fail with `reason`.
    pub fn fail_next_transfer(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    /// Number of successful movements so far.
    pub fn transfer_count(&self) -> u64 {
        self.transfers
    }

    fn check_injected_failure(&mut self) -> Result<(), TransferError> {
        match self.fail_next.take() {
            Some(reason) => Err(TransferError::Refused(reason)),
            None => Ok(()),
        }
    }

    fn debit(&mut self, asset: &AssetId, who: &AccountId, amount: u128) -> Result<(), TransferError> {
        let balance = self
            .balances
            .entry((asset.clone(), who.clone()))
            .or_default();
        if *balance < amount {
            return Err(TransferError::InsufficientBalance {
                asset: asset.clone(),
                account: who.clone(),
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&mut self, asset: &AssetId, who: &AccountId, amount: u128) -> Result<(), TransferError> {
        let balance = self
            .balances
            .entry((asset.clone(), who.clone()))
            .or_default();
        *balance = balance.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(())
    }
}

impl AssetTransfer for NullBank {
    fn receive(
        &mut self,
        asset: &AssetId,
        from: &AccountId,
        amount: u128,
    ) -> Result<(), TransferError> {
        self.check_injected_failure()?;
        if !asset.is_native() {
            let approved = self.allowance(asset, from);
            if approved < amount {
                return Err(TransferError::InsufficientAllowance {
                    asset: asset.clone(),
                    account: from.clone(),
                    needed: amount,
                    approved,
                });
            }
        }
        self.debit(asset, from, amount)?;
        if !asset.is_native() {
            let key = (asset.clone(), from.clone());
            if let Some(approved) = self.allowances.get_mut(&key) {
                *approved -= amount;
            }
        }
        let held = self.custody.entry(asset.clone()).or_default();
        *held = held.checked_add(amount).ok_or(TransferError::Overflow)?;
        self.transfers += 1;
        Ok(())
    }

    fn send(&mut self, asset: &AssetId, to: &AccountId, amount: u128) -> Result<(), TransferError> {
        self.check_injected_failure()?;
        let held = self.custody.entry(asset.clone()).or_default();
        if *held < amount {
            return Err(TransferError::InsufficientBalance {
                asset: asset.clone(),
                account: AccountId::new("custody"),
                needed: amount,
                available: *held,
            });
        }
        *held -= amount;
        self.credit(asset, to, amount)?;
        self.transfers += 1;
        Ok(())
    }

    fn transfer(
        &mut self,
        asset: &AssetId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TransferError> {
        self.check_injected_failure()?;
        self.debit(asset, from, amount)?;
        self.credit(asset, to, amount)?;
        self.transfers += 1;
        Ok(())
    }

    fn balance_of(&self, asset: &AssetId, who: &AccountId) -> u128 {
        self.balances
            .get(&(asset.clone(), who.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn custody_balance(&self, asset: &AssetId) -> u128 {
        self.custody.get(asset).copied().unwrap_or(0)
    }
}
