//! Burn-to-claim dividend pool.
//!
//! Revenue in any asset accumulates per asset. A holder surrenders `amount`
//! DAO tokens and receives `floor(pool * amount / circulating)` of every
//! pooled asset, where `circulating` is read at withdrawal time. Earlier
//! withdrawers therefore see a different rate than later ones.

use crate::error::VestingError;
use quorum_governance::{Origin, ProposalEngine, ProposalParams};
use quorum_host::{AssetTransfer, Event, GovernanceToken};
use quorum_types::{mul_div, AccountId, AssetId, ProposalId, Timestamp};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[derive(Default)]
pub struct DividendPool {
    enabled: bool,
    pools: BTreeMap<AssetId, u128>,
    pending_events: Vec<Event>,
}

impl DividendPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn pool(&self, asset: &AssetId) -> u128 {
        self.pools.get(asset).copied().unwrap_or(0)
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn prepare_change_state(
        &mut self,
        gov: &mut ProposalEngine,
        caller: &AccountId,
        enabled: bool,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<ProposalId, VestingError> {
        gov.committee().ensure_member(caller)?;
        let params = ProposalParams::DividendState { enabled };
        Ok(gov.propose(caller, Origin::Dividend, duration_secs, params, now)?)
    }

    pub fn change_state(
        &mut self,
        gov: &mut ProposalEngine,
        caller: &AccountId,
        proposal: ProposalId,
        enabled: bool,
        now: Timestamp,
    ) -> Result<(), VestingError> {
        gov.committee().ensure_member(caller)?;
        gov.gate(proposal, Origin::Dividend, &ProposalParams::DividendState { enabled }, now)?;
        self.enabled = enabled;
        info!(enabled, "dividend state changed");
        self.pending_events.push(Event::DividendStateChanged { enabled });
        Ok(())
    }

    /// Add revenue to the pool.
    pub fn deposit(
        &mut self,
        bank: &mut dyn AssetTransfer,
        asset: &AssetId,
        from: &AccountId,
        amount: u128,
    ) -> Result<(), VestingError> {
        if amount == 0 {
            return Err(VestingError::ZeroAmount);
        }
        let pooled = self
            .pool(asset)
            .checked_add(amount)
            .ok_or(VestingError::Overflow)?;
        bank.receive(asset, from, amount)?;
        self.pools.insert(asset.clone(), pooled);
        debug!(%asset, %from, amount, pooled, "dividend deposited");
        self.pending_events.push(Event::DividendDeposited {
            asset: asset.clone(),
            from: from.clone(),
            amount,
        });
        Ok(())
    }

    /// What surrendering `amount` tokens would pay right now.
    pub fn quote(&self, token: &dyn GovernanceToken, amount: u128) -> Result<Vec<(AssetId, u128)>, VestingError> {
        if amount == 0 {
            return Err(VestingError::ZeroAmount);
        }
        let circulating = token.circulating_supply();
        if amount > circulating {
            return Err(VestingError::ExceedsCirculating { amount, circulating });
        }
        self.pools
            .iter()
            .map(|(asset, pool)| {
                mul_div(*pool, amount, circulating)
                    .map(|payout| (asset.clone(), payout))
                    .ok_or(VestingError::Overflow)
            })
            .collect()
    }

    /// Burn `amount` of `holder`'s tokens and pay the pro-rata share of
    /// every pooled asset.
    ///
    /// Payouts go out before the burn. If a payout or the burn fails, the
    /// payouts already made are pulled back and the tokens stay with the
    /// holder.
    pub fn withdraw(
        &mut self,
        bank: &mut dyn AssetTransfer,
        token: &mut dyn GovernanceToken,
        holder: &AccountId,
        amount: u128,
    ) -> Result<Vec<(AssetId, u128)>, VestingError> {
        if !self.enabled {
            return Err(VestingError::Disabled);
        }
        let payouts = self.quote(token, amount)?;
        let held = token.balance_of(holder);
        if held < amount {
            return Err(VestingError::InsufficientHolding {
                holder: holder.clone(),
                needed: amount,
                available: held,
            });
        }
        for (asset, payout) in &payouts {
            let available = bank.custody_balance(asset);
            if available < *payout {
                return Err(VestingError::InsufficientPool {
                    asset: asset.clone(),
                    needed: *payout,
                    available,
                });
            }
        }

        let mut sent: Vec<(AssetId, u128)> = Vec::with_capacity(payouts.len());
        for (asset, payout) in &payouts {
            if *payout == 0 {
                continue;
            }
            if let Err(e) = bank.send(asset, holder, *payout) {
                self.recover_payouts(bank, holder, sent);
                return Err(e.into());
            }
            sent.push((asset.clone(), *payout));
        }
        if let Err(e) = token.burn(holder, amount) {
            self.recover_payouts(bank, holder, sent);
            return Err(e.into());
        }
        for (asset, payout) in &sent {
            self.debit_pool(asset, *payout);
        }
        info!(%holder, burned = amount, assets = payouts.len(), "dividend withdrawn");
        self.pending_events.push(Event::DividendWithdrawn {
            holder: holder.clone(),
            burned: amount,
            payouts: payouts.clone(),
        });
        Ok(payouts)
    }

    /// Pull back payouts of a failed withdrawal. Whatever cannot be
    /// recovered has left custody and is taken off its pool.
    fn recover_payouts(
        &mut self,
        bank: &mut dyn AssetTransfer,
        holder: &AccountId,
        sent: Vec<(AssetId, u128)>,
    ) {
        for (asset, payout) in sent {
            if let Err(e) = bank.receive(&asset, holder, payout) {
                warn!(%holder, %asset, payout, error = %e, "dividend payout not recovered");
                self.debit_pool(&asset, payout);
            }
        }
    }

    fn debit_pool(&mut self, asset: &AssetId, amount: u128) {
        if let Some(pool) = self.pools.get_mut(asset) {
            *pool = pool.saturating_sub(amount);
        }
    }
}
