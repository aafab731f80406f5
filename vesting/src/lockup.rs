//! Token lockup.
//!
//! Every locked amount lives in the treasury ledger under
//! [`EntityRef::Lockup`]. Proposal-granted amounts stay locked until an
//! accepted unlock proposal releases them; self-locked amounts follow the
//! linear [`ReleaseSchedule`] once it has begun. Claims pay out of the shared
//! `unlocked` counter.

use crate::error::VestingError;
use crate::schedule::{ReleaseSchedule, Tranches, UnlockSource};
use quorum_governance::{Origin, ProposalEngine, ProposalParams};
use quorum_host::{Event, GovernanceToken};
use quorum_ledger::TreasuryLedger;
use quorum_types::{AccountId, EntityRef, ProposalId, Timestamp};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

const ENTITY: EntityRef = EntityRef::Lockup;

pub struct Lockup {
    ledger: TreasuryLedger,
    tranches: BTreeMap<AccountId, Tranches>,
    schedule: ReleaseSchedule,
    pending_events: Vec<Event>,
}

impl Lockup {
    pub fn new(release_duration_secs: u64) -> Result<Self, VestingError> {
        Ok(Self {
            ledger: TreasuryLedger::new(),
            tranches: BTreeMap::new(),
            schedule: ReleaseSchedule::new(release_duration_secs)?,
            pending_events: Vec::new(),
        })
    }

    pub fn schedule(&self) -> ReleaseSchedule {
        self.schedule
    }

    pub fn tranches(&self, who: &AccountId) -> Tranches {
        self.tranches.get(who).copied().unwrap_or_default()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending_events)
    }

    /// Propose granting locked tokens from the unreleased supply.
    pub fn prepare_deposit(
        &mut self,
        gov: &mut ProposalEngine,
        caller: &AccountId,
        grants: Vec<(AccountId, u128)>,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<ProposalId, VestingError> {
        gov.committee().ensure_member(caller)?;
        grant_total(&grants)?;
        let params = ProposalParams::LockupDeposit { grants };
        Ok(gov.propose(caller, Origin::Lockup, duration_secs, params, now)?)
    }

    /// Execute an accepted deposit proposal.
    pub fn deposit(
        &mut self,
        gov: &mut ProposalEngine,
        token: &mut dyn GovernanceToken,
        caller: &AccountId,
        proposal: ProposalId,
        grants: Vec<(AccountId, u128)>,
        now: Timestamp,
    ) -> Result<u128, VestingError> {
        gov.committee().ensure_member(caller)?;
        let total = grant_total(&grants)?;
        let available = token.unreleased_supply();
        if available < total {
            return Err(VestingError::InsufficientSupply {
                needed: total,
                available,
            });
        }
        let params = ProposalParams::LockupDeposit {
            grants: grants.clone(),
        };
        gov.gate(proposal, Origin::Lockup, &params, now)?;
        token.reserve(total)?;

        for (beneficiary, amount) in grants {
            self.ledger.credit(ENTITY, &beneficiary, amount)?;
            let tranches = self.tranches.entry(beneficiary.clone()).or_default();
            tranches.granted += amount;
            debug!(%beneficiary, amount, "granted tokens locked");
            self.pending_events.push(Event::TokensLocked { beneficiary, amount });
        }
        info!(%proposal, total, "lockup deposit executed");
        Ok(total)
    }

    /// Propose unlocking part of previously granted amounts.
    pub fn prepare_unlock(
        &mut self,
        gov: &mut ProposalEngine,
        caller: &AccountId,
        grants: Vec<(AccountId, u128)>,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<ProposalId, VestingError> {
        gov.committee().ensure_member(caller)?;
        grant_total(&grants)?;
        self.check_unlockable(&grants)?;
        let params = ProposalParams::LockupUnlock { grants };
        Ok(gov.propose(caller, Origin::Lockup, duration_secs, params, now)?)
    }

    /// Execute an accepted unlock proposal.
    pub fn unlock(
        &mut self,
        gov: &mut ProposalEngine,
        caller: &AccountId,
        proposal: ProposalId,
        grants: Vec<(AccountId, u128)>,
        now: Timestamp,
    ) -> Result<(), VestingError> {
        gov.committee().ensure_member(caller)?;
        grant_total(&grants)?;
        self.check_unlockable(&grants)?;
        let params = ProposalParams::LockupUnlock {
            grants: grants.clone(),
        };
        gov.gate(proposal, Origin::Lockup, &params, now)?;

        for (beneficiary, amount) in grants {
            self.apply_unlock(&beneficiary, amount, UnlockSource::ProposalTranche)?;
        }
        info!(%proposal, "lockup unlock executed");
        Ok(())
    }

    /// Lock `holder`'s own tokens for the listed beneficiaries on the linear
    /// schedule.
    pub fn transfer_and_lock(
        &mut self,
        token: &mut dyn GovernanceToken,
        holder: &AccountId,
        grants: &[(AccountId, u128)],
    ) -> Result<u128, VestingError> {
        let total = grant_total(grants)?;
        token.collect(holder, total)?;
        self.lock_scheduled(grants)?;
        debug!(%holder, total, beneficiaries = grants.len(), "tokens locked on schedule");
        Ok(total)
    }

    /// Convert `holder`'s dev-class tokens to circulating ones and lock them
    /// for the listed beneficiaries on the linear schedule.
    pub fn convert_and_lock(
        &mut self,
        token: &mut dyn GovernanceToken,
        holder: &AccountId,
        grants: &[(AccountId, u128)],
    ) -> Result<u128, VestingError> {
        let total = grant_total(grants)?;
        let available = token.weights().balances(holder).dev;
        if available < total {
            return Err(VestingError::InsufficientHolding {
                holder: holder.clone(),
                needed: total,
                available,
            });
        }
        token.convert(holder, total)?;
        if let Err(e) = token.collect(holder, total) {
            warn!(%holder, total, error = %e, "converted tokens could not be locked");
            return Err(e.into());
        }
        self.lock_scheduled(grants)?;
        debug!(%holder, total, beneficiaries = grants.len(), "dev tokens converted and locked");
        Ok(total)
    }

    fn lock_scheduled(&mut self, grants: &[(AccountId, u128)]) -> Result<(), VestingError> {
        for (beneficiary, amount) in grants {
            self.ledger.credit(ENTITY, beneficiary, *amount)?;
            self.tranches.entry(beneficiary.clone()).or_default().scheduled += *amount;
            self.pending_events.push(Event::TokensLocked {
                beneficiary: beneficiary.clone(),
                amount: *amount,
            });
        }
        Ok(())
    }

    /// Start the linear release of scheduled tranches.
    pub fn begin_release(&mut self, now: Timestamp) -> Result<(), VestingError> {
        self.schedule.begin(now)?;
        let duration_secs = self.schedule.duration_secs();
        info!(at = %now, duration_secs, "lockup release started");
        self.pending_events.push(Event::ReleaseStarted { at: now, duration_secs });
        Ok(())
    }

    /// Claim `amount` of unlocked tokens.
    pub fn claim(
        &mut self,
        token: &mut dyn GovernanceToken,
        who: &AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), VestingError> {
        if amount == 0 {
            return Err(VestingError::ZeroAmount);
        }
        self.sync_schedule(who, now)?;
        self.ledger
            .claim(ENTITY, who, amount, || token.release(who, amount))?;
        info!(beneficiary = %who, amount, "locked tokens claimed");
        self.pending_events.push(Event::TokensClaimed {
            beneficiary: who.clone(),
            amount,
        });
        Ok(())
    }

    pub fn total_assigned(&self, who: &AccountId) -> u128 {
        self.ledger.entry(ENTITY, who).assigned
    }

    /// Unlocked amount including whatever the schedule has vested by `now`.
    pub fn total_unlocked(&self, who: &AccountId, now: Timestamp) -> Result<u128, VestingError> {
        let pending = self.scheduled_pending(who, now)?;
        Ok(self.ledger.entry(ENTITY, who).unlocked + pending)
    }

    pub fn total_locked(&self, who: &AccountId, now: Timestamp) -> Result<u128, VestingError> {
        Ok(self.total_assigned(who) - self.total_unlocked(who, now)?)
    }

    pub fn total_claimed(&self, who: &AccountId) -> u128 {
        self.ledger.entry(ENTITY, who).claimed
    }

    pub fn claimable(&self, who: &AccountId, now: Timestamp) -> Result<u128, VestingError> {
        Ok(self.total_unlocked(who, now)? - self.total_claimed(who))
    }

    fn check_unlockable(&self, grants: &[(AccountId, u128)]) -> Result<(), VestingError> {
        let mut requested: BTreeMap<&AccountId, u128> = BTreeMap::new();
        for (beneficiary, amount) in grants {
            let sum = requested.entry(beneficiary).or_default();
            *sum = sum.checked_add(*amount).ok_or(VestingError::Overflow)?;
        }
        for (beneficiary, needed) in requested {
            let available = self.tranches(beneficiary).granted_locked();
            if needed > available {
                return Err(VestingError::InsufficientGranted {
                    beneficiary: beneficiary.clone(),
                    needed,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Scheduled amount vested by `now` but not yet moved into the ledger.
    fn scheduled_pending(&self, who: &AccountId, now: Timestamp) -> Result<u128, VestingError> {
        let tranches = self.tranches(who);
        let vested = self.schedule.vested(tranches.scheduled, now)?;
        Ok(vested.saturating_sub(tranches.scheduled_unlocked))
    }

    fn sync_schedule(&mut self, who: &AccountId, now: Timestamp) -> Result<(), VestingError> {
        let pending = self.scheduled_pending(who, now)?;
        if pending > 0 {
            self.apply_unlock(who, pending, UnlockSource::ScheduledTranche)?;
        }
        Ok(())
    }

    fn apply_unlock(&mut self, who: &AccountId, amount: u128, source: UnlockSource) -> Result<(), VestingError> {
        self.ledger.unlock(ENTITY, who, amount)?;
        let tranches = self.tranches.entry(who.clone()).or_default();
        match source {
            UnlockSource::ScheduledTranche => tranches.scheduled_unlocked += amount,
            UnlockSource::ProposalTranche => tranches.granted_unlocked += amount,
        }
        debug!(beneficiary = %who, amount, ?source, "tokens unlocked");
        self.pending_events.push(Event::TokensUnlocked {
            beneficiary: who.clone(),
            amount,
        });
        Ok(())
    }
}

/// Sum of a non-empty grant list with no zero entries.
fn grant_total(grants: &[(AccountId, u128)]) -> Result<u128, VestingError> {
    if grants.is_empty() {
        return Err(VestingError::EmptyGrants);
    }
    grants.iter().try_fold(0u128, |acc, (_, amount)| {
        if *amount == 0 {
            return Err(VestingError::ZeroAmount);
        }
        acc.checked_add(*amount).ok_or(VestingError::Overflow)
    })
}
