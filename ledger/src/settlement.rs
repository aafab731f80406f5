//! Settlement ledger: double-payment prevention.
//!
//! A `(entity, beneficiary, kind)` triple can be settled only ONCE. Every
//! one-shot payout in the treasury (token withdrawals, refunds, sweeps,
//! reward withdrawals, unallocated burns) goes through here.

use crate::error::LedgerError;
use quorum_host::TransferError;
use quorum_types::{AccountId, EntityRef, SettlementKind, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

type SettlementKey = (EntityRef, AccountId, SettlementKind);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub amount: u128,
    pub settled_at: Timestamp,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SettlementLedger {
    settled: BTreeMap<SettlementKey, SettlementRecord>,
    total_settled: u128,
}

impl SettlementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_settled(&self, entity: EntityRef, beneficiary: &AccountId, kind: SettlementKind) -> bool {
        self.settled
            .contains_key(&(entity, beneficiary.clone(), kind))
    }

    pub fn record(
        &self,
        entity: EntityRef,
        beneficiary: &AccountId,
        kind: SettlementKind,
    ) -> Option<&SettlementRecord> {
        self.settled.get(&(entity, beneficiary.clone(), kind))
    }

    /// Sum of every recorded settlement amount.
    pub fn total_settled(&self) -> u128 {
        self.total_settled
    }

    pub fn ensure_unsettled(
        &self,
        entity: EntityRef,
        beneficiary: &AccountId,
        kind: SettlementKind,
    ) -> Result<(), LedgerError> {
        if self.is_settled(entity, beneficiary, kind) {
            return Err(LedgerError::AlreadyWithdrawn {
                entity,
                beneficiary: beneficiary.clone(),
                kind,
            });
        }
        Ok(())
    }

    /// Flag the triple as settled without moving anything.
    pub fn mark_withdrawn(
        &mut self,
        entity: EntityRef,
        beneficiary: &AccountId,
        kind: SettlementKind,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.ensure_unsettled(entity, beneficiary, kind)?;
        let total = self
            .total_settled
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.settled.insert(
            (entity, beneficiary.clone(), kind),
            SettlementRecord {
                amount,
                settled_at: now,
            },
        );
        self.total_settled = total;
        Ok(())
    }

    /// Flag the triple as settled, then run `pay`.
    ///
    /// The flag is recorded first and removed again if `pay` fails, so the
    /// payout happens at most once and never without its record. A zero
    /// `amount` still consumes the flag but skips `pay`.
    pub fn settle_once<F>(
        &mut self,
        entity: EntityRef,
        beneficiary: &AccountId,
        kind: SettlementKind,
        amount: u128,
        now: Timestamp,
        pay: F,
    ) -> Result<(), LedgerError>
    where
        F: FnOnce(u128) -> Result<(), TransferError>,
    {
        self.mark_withdrawn(entity, beneficiary, kind, amount, now)?;
        if amount == 0 {
            return Ok(());
        }
        if let Err(e) = pay(amount) {
            self.settled.remove(&(entity, beneficiary.clone(), kind));
            self.total_settled -= amount;
            return Err(e.into());
        }
        info!(%entity, %beneficiary, %kind, amount, "settled");
        Ok(())
    }
}
