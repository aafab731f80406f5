//! Per-entity, per-beneficiary treasury book.

use crate::entry::LedgerEntry;
use crate::error::LedgerError;
use quorum_host::TransferError;
use quorum_types::{AccountId, EntityRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Ledger entries keyed by `(entity, beneficiary)`, plus running totals per
/// entity.
///
/// Each module owns its own book, so entries are only ever mutated by the
/// module that defines the entity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TreasuryLedger {
    entries: BTreeMap<(EntityRef, AccountId), LedgerEntry>,
    totals: BTreeMap<EntityRef, LedgerEntry>,
}

impl TreasuryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, entity: EntityRef, beneficiary: &AccountId) -> LedgerEntry {
        self.entries
            .get(&(entity, beneficiary.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Sum of every beneficiary's entry for `entity`.
    pub fn total(&self, entity: EntityRef) -> LedgerEntry {
        self.totals.get(&entity).copied().unwrap_or_default()
    }

    /// Beneficiaries with an entry for `entity`, in account order.
    pub fn beneficiaries(&self, entity: EntityRef) -> impl Iterator<Item = (&AccountId, &LedgerEntry)> {
        self.entries
            .range((entity, AccountId::new(""))..)
            .take_while(move |((e, _), _)| *e == entity)
            .map(|((_, who), entry)| (who, entry))
    }

    /// `assigned += amount`.
    pub fn credit(
        &mut self,
        entity: EntityRef,
        beneficiary: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.apply(entity, beneficiary, |entry| entry.credit(amount))?;
        debug!(%entity, %beneficiary, amount, "ledger credit");
        Ok(())
    }

    /// `unlocked += amount`, bounded by `assigned`.
    pub fn unlock(
        &mut self,
        entity: EntityRef,
        beneficiary: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.apply(entity, beneficiary, |entry| entry.unlock(amount))?;
        debug!(%entity, %beneficiary, amount, "ledger unlock");
        Ok(())
    }

    /// `claimed += amount`, then run `pay`.
    ///
    /// The claim is recorded before `pay` runs and rolled back if it fails,
    /// so a payout can never happen without its ledger record.
    pub fn claim<F>(
        &mut self,
        entity: EntityRef,
        beneficiary: &AccountId,
        amount: u128,
        pay: F,
    ) -> Result<(), LedgerError>
    where
        F: FnOnce() -> Result<(), TransferError>,
    {
        let before = self.entry(entity, beneficiary);
        let total_before = self.total(entity);
        self.apply(entity, beneficiary, |entry| entry.claim(amount))?;
        if let Err(e) = pay() {
            self.entries.insert((entity, beneficiary.clone()), before);
            self.totals.insert(entity, total_before);
            return Err(e.into());
        }
        debug!(%entity, %beneficiary, amount, "ledger claim");
        Ok(())
    }

    /// Apply `op` to the beneficiary entry and the entity total, committing
    /// both or neither.
    fn apply<F>(&mut self, entity: EntityRef, beneficiary: &AccountId, op: F) -> Result<(), LedgerError>
    where
        F: Fn(&mut LedgerEntry) -> Result<(), LedgerError>,
    {
        let mut entry = self.entry(entity, beneficiary);
        let mut total = self.total(entity);
        op(&mut entry)?;
        op(&mut total)?;
        self.entries.insert((entity, beneficiary.clone()), entry);
        self.totals.insert(entity, total);
        Ok(())
    }
}
