//! Two-phase whitelist sale.
//!
//! An operator deposits `asset_amount` of some asset and sells it for the DAO
//! token at a fixed ratio. During the first phase only whitelisted investors
//! may buy, each up to their tier share of the deposit. During the second
//! phase anyone may buy whatever is left. Buyers receive the asset at once;
//! the DAO tokens they pay stay in custody until the operator ends the sale.

use crate::error::FundraisingError;
use quorum_host::{AssetTransfer, Event, GovernanceToken};
use quorum_ledger::SettlementLedger;
use quorum_types::{apply_bps, AccountId, AssetId, EntityRef, SaleId, SettlementKind, Timestamp, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTerms {
    pub asset: AssetId,
    pub asset_amount: u128,
    /// Asset units handed out per `dao_per` DAO tokens paid.
    pub asset_per: u128,
    pub dao_per: u128,
    pub whitelist: Vec<AccountId>,
    /// First-phase cap per whitelisted investor, in basis points of
    /// `asset_amount`; same order as `whitelist`.
    pub tier_bps: Vec<u32>,
    pub step1_duration_secs: u64,
    pub step2_duration_secs: u64,
    pub can_end_early: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalePhase {
    Whitelist,
    Open,
    Closed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub operator: AccountId,
    pub terms: SaleTerms,
    pub started_at: Timestamp,
    /// Asset handed out so far.
    pub sold: u128,
    /// DAO tokens collected so far.
    pub collected: u128,
    pub purchases: BTreeMap<AccountId, u128>,
    pub tiers: BTreeMap<AccountId, u32>,
    pub ended: bool,
}

impl Sale {
    pub fn phase(&self, now: Timestamp) -> SalePhase {
        let elapsed = self.started_at.elapsed_since(now);
        if self.ended {
            SalePhase::Closed
        } else if elapsed < self.terms.step1_duration_secs {
            SalePhase::Whitelist
        } else if elapsed < self.terms.step1_duration_secs.saturating_add(self.terms.step2_duration_secs) {
            SalePhase::Open
        } else {
            SalePhase::Closed
        }
    }

    pub fn remaining(&self) -> u128 {
        self.terms.asset_amount - self.sold
    }

    /// First-phase cap for `investor`, `None` if not whitelisted.
    pub fn tier_cap(&self, investor: &AccountId) -> Option<u128> {
        self.tiers
            .get(investor)
            .and_then(|bps| apply_bps(self.terms.asset_amount, u128::from(*bps)))
    }

    /// Asset bought with `dao_amount`, which must convert exactly.
    pub fn convert(&self, dao_amount: u128) -> Result<u128, FundraisingError> {
        let product = dao_amount
            .checked_mul(self.terms.asset_per)
            .ok_or(FundraisingError::Overflow)?;
        if product % self.terms.dao_per != 0 {
            return Err(FundraisingError::InexactConversion(dao_amount));
        }
        let asset = product / self.terms.dao_per;
        if asset == 0 {
            return Err(FundraisingError::InexactConversion(dao_amount));
        }
        Ok(asset)
    }
}

pub struct TieredSales {
    sales: BTreeMap<SaleId, Sale>,
    next_id: SaleId,
    dao_token: AssetId,
    settlements: SettlementLedger,
    pending_events: Vec<Event>,
}

impl TieredSales {
    /// `dao_token` is the asset identifier of the governance token, which a
    /// sale may never offer.
    pub fn new(dao_token: AssetId) -> Self {
        Self {
            sales: BTreeMap::new(),
            next_id: SaleId::FIRST,
            dao_token,
            settlements: SettlementLedger::new(),
            pending_events: Vec::new(),
        }
    }

    pub fn sale(&self, id: SaleId) -> Result<&Sale, FundraisingError> {
        self.sales.get(&id).ok_or(FundraisingError::SaleNotFound(id))
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending_events)
    }

    /// Open a sale, pulling the offered asset from the operator.
    pub fn start_sale(
        &mut self,
        bank: &mut dyn AssetTransfer,
        operator: &AccountId,
        terms: SaleTerms,
        now: Timestamp,
    ) -> Result<SaleId, FundraisingError> {
        if terms.whitelist.len() != terms.tier_bps.len() {
            return Err(FundraisingError::LengthMismatch);
        }
        let total_bps: u128 = terms.tier_bps.iter().map(|bps| u128::from(*bps)).sum();
        if total_bps > BPS_DENOMINATOR {
            return Err(FundraisingError::InvalidTerms("tier percentages exceed 100%"));
        }
        if terms.asset_amount == 0 {
            return Err(FundraisingError::InvalidTerms("asset amount must be non-zero"));
        }
        if terms.asset_per == 0 || terms.dao_per == 0 {
            return Err(FundraisingError::InvalidTerms("ratio must be non-zero"));
        }
        if terms.asset == self.dao_token {
            return Err(FundraisingError::InvalidTerms("cannot sell the DAO token"));
        }
        let id = self.next_id;
        let next = id.next().ok_or(FundraisingError::Overflow)?;
        bank.receive(&terms.asset, operator, terms.asset_amount)?;

        let tiers = terms
            .whitelist
            .iter()
            .cloned()
            .zip(terms.tier_bps.iter().copied())
            .collect();
        info!(sale = %id, %operator, asset = %terms.asset, amount = terms.asset_amount, "sale started");
        self.pending_events.push(Event::SaleStarted {
            sale: id,
            operator: operator.clone(),
            asset: terms.asset.clone(),
            asset_amount: terms.asset_amount,
        });
        self.sales.insert(
            id,
            Sale {
                id,
                operator: operator.clone(),
                terms,
                started_at: now,
                sold: 0,
                collected: 0,
                purchases: BTreeMap::new(),
                tiers,
                ended: false,
            },
        );
        self.next_id = next;
        Ok(id)
    }

    /// Pay `dao_amount` DAO tokens for the asset.
    pub fn purchase(
        &mut self,
        bank: &mut dyn AssetTransfer,
        token: &mut dyn GovernanceToken,
        id: SaleId,
        investor: &AccountId,
        dao_amount: u128,
        now: Timestamp,
    ) -> Result<u128, FundraisingError> {
        let sale = self.sale(id)?;
        let phase = sale.phase(now);
        if phase == SalePhase::Closed {
            return Err(FundraisingError::SaleClosed);
        }
        if dao_amount == 0 {
            return Err(FundraisingError::ZeroAmount);
        }
        let asset_amount = sale.convert(dao_amount)?;
        let bought = sale.purchases.get(investor).copied().unwrap_or(0);
        let total = bought
            .checked_add(asset_amount)
            .ok_or(FundraisingError::Overflow)?;
        if phase == SalePhase::Whitelist {
            let cap = sale
                .tier_cap(investor)
                .ok_or_else(|| FundraisingError::NotWhitelisted(investor.clone()))?;
            if total > cap {
                return Err(FundraisingError::AboveMaximum { max: cap, total });
            }
        }
        if asset_amount > sale.remaining() {
            return Err(FundraisingError::InsufficientSupply {
                remaining: sale.remaining(),
                requested: asset_amount,
            });
        }
        let asset = sale.terms.asset.clone();

        token.collect(investor, dao_amount)?;
        if let Err(e) = bank.send(&asset, investor, asset_amount) {
            if let Err(refund) = token.release(investor, dao_amount) {
                warn!(sale = %id, %investor, paid = dao_amount, error = %refund, "payment not returned");
            }
            return Err(e.into());
        }

        let sale = self
            .sales
            .get_mut(&id)
            .ok_or(FundraisingError::SaleNotFound(id))?;
        sale.sold += asset_amount;
        sale.collected = sale
            .collected
            .checked_add(dao_amount)
            .ok_or(FundraisingError::Overflow)?;
        sale.purchases.insert(investor.clone(), total);

        debug!(sale = %id, %investor, paid = dao_amount, received = asset_amount, "sale purchase");
        self.pending_events.push(Event::SalePurchase {
            sale: id,
            investor: investor.clone(),
            paid: dao_amount,
            received: asset_amount,
        });
        Ok(asset_amount)
    }

    /// Close the sale and hand the unsold asset and the collected DAO tokens
    /// to the operator.
    ///
    /// Allowed once both phases have elapsed, once sold out, or at any time
    /// if the sale was created with `can_end_early`.
    pub fn end_sale(
        &mut self,
        bank: &mut dyn AssetTransfer,
        token: &mut dyn GovernanceToken,
        caller: &AccountId,
        id: SaleId,
        now: Timestamp,
    ) -> Result<(), FundraisingError> {
        let sale = self.sale(id)?;
        if sale.operator != *caller {
            return Err(FundraisingError::NotOperator(caller.clone()));
        }
        if sale.ended {
            return Err(FundraisingError::SaleClosed);
        }
        let elapsed = sale.phase(now) == SalePhase::Closed;
        if !(elapsed || sale.remaining() == 0 || sale.terms.can_end_early) {
            return Err(FundraisingError::NotSoldOut);
        }
        let (asset, unsold, collected) = (sale.terms.asset.clone(), sale.remaining(), sale.collected);
        let operator = sale.operator.clone();
        let entity = EntityRef::Sale(id);

        self.settlements.settle_once(
            entity,
            &operator,
            SettlementKind::SaleClose,
            unsold.saturating_add(collected),
            now,
            |_| {
                if collected > 0 {
                    token.release(&operator, collected)?;
                }
                if unsold > 0 {
                    if let Err(e) = bank.send(&asset, &operator, unsold) {
                        if collected > 0 {
                            token.collect(&operator, collected)?;
                        }
                        return Err(e);
                    }
                }
                Ok(())
            },
        )?;

        if let Some(sale) = self.sales.get_mut(&id) {
            sale.ended = true;
        }
        info!(sale = %id, unsold, collected, "sale ended");
        self.pending_events.push(Event::SaleEnded {
            sale: id,
            unsold,
            collected,
        });
        Ok(())
    }
}
