//! Investment campaign engine.

use crate::campaign::{Campaign, CampaignState, CampaignTerms, InvestorInfo, WhitelistEntry};
use crate::error::FundraisingError;
use quorum_governance::{Origin, ProposalEngine, ProposalParams};
use quorum_host::{AssetTransfer, Event, GovernanceToken};
use quorum_ledger::{SettlementLedger, TreasuryLedger};
use quorum_types::{AccountId, CampaignId, EntityRef, ProposalId, SettlementKind, Timestamp};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub struct FundraisingEngine {
    campaigns: BTreeMap<CampaignId, Campaign>,
    next_id: CampaignId,
    /// Invested asset per investor, as `assigned` under the campaign entity.
    ledger: TreasuryLedger,
    settlements: SettlementLedger,
    /// Account that receives swept raises.
    treasury: AccountId,
    pending_events: Vec<Event>,
}

impl FundraisingEngine {
    pub fn new(treasury: AccountId) -> Self {
        Self {
            campaigns: BTreeMap::new(),
            next_id: CampaignId::FIRST,
            ledger: TreasuryLedger::new(),
            settlements: SettlementLedger::new(),
            treasury,
            pending_events: Vec::new(),
        }
    }

    pub fn campaign(&self, id: CampaignId) -> Result<&Campaign, FundraisingError> {
        self.campaigns
            .get(&id)
            .ok_or(FundraisingError::CampaignNotFound(id))
    }

    fn campaign_mut(&mut self, id: CampaignId) -> Result<&mut Campaign, FundraisingError> {
        self.campaigns
            .get_mut(&id)
            .ok_or(FundraisingError::CampaignNotFound(id))
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending_events)
    }

    /// Register a campaign and the proposal that will start it.
    ///
    /// Only committee members may create campaigns.
    pub fn create_campaign(
        &mut self,
        gov: &mut ProposalEngine,
        creator: &AccountId,
        terms: CampaignTerms,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<(CampaignId, ProposalId), FundraisingError> {
        gov.committee().ensure_member(creator)?;
        terms.validate()?;
        let id = self.next_id;
        let mut campaign = Campaign {
            id,
            creator: creator.clone(),
            terms,
            state: CampaignState::Prepared,
            start_proposal: ProposalId::FIRST,
            raised: 0,
            tokens_reserved: false,
            whitelist: BTreeMap::new(),
        };
        let proposal = gov.propose(creator, Origin::Fundraising, duration_secs, campaign.start_params(), now)?;
        campaign.start_proposal = proposal;
        self.next_id = id.next().ok_or(FundraisingError::Overflow)?;
        self.campaigns.insert(id, campaign);

        info!(campaign = %id, %proposal, %creator, "campaign created");
        self.pending_events.push(Event::CampaignCreated {
            campaign: id,
            proposal,
        });
        Ok((id, proposal))
    }

    /// Activate a prepared campaign once its proposal has been accepted,
    /// moving the campaign's tokens from the unreleased supply into custody.
    pub fn start_campaign(
        &mut self,
        gov: &mut ProposalEngine,
        token: &mut dyn GovernanceToken,
        id: CampaignId,
        now: Timestamp,
    ) -> Result<(), FundraisingError> {
        let campaign = self.campaign(id)?;
        campaign.ensure_state(campaign.state == CampaignState::Prepared, "Prepared")?;
        let total = campaign.terms.total_tokens;
        let available = token.unreleased_supply();
        if available < total {
            return Err(FundraisingError::InsufficientSupply {
                remaining: available,
                requested: total,
            });
        }
        gov.gate(campaign.start_proposal, Origin::Fundraising, &campaign.start_params(), now)?;
        token.reserve(total)?;

        let campaign = self.campaign_mut(id)?;
        campaign.state = CampaignState::Active;
        campaign.tokens_reserved = true;
        info!(campaign = %id, total_tokens = total, "campaign started");
        self.pending_events.push(Event::CampaignStarted { campaign: id });
        Ok(())
    }

    /// Set per-investor limits. A later entry for the same investor replaces
    /// the earlier one. Each minimum is checked against the maximum that will
    /// apply, the campaign default when the entry's max is zero.
    pub fn set_whitelist(
        &mut self,
        gov: &ProposalEngine,
        caller: &AccountId,
        id: CampaignId,
        investors: &[AccountId],
        mins: &[u128],
        maxs: &[u128],
    ) -> Result<(), FundraisingError> {
        gov.committee().ensure_member(caller)?;
        if investors.len() != mins.len() || investors.len() != maxs.len() {
            return Err(FundraisingError::LengthMismatch);
        }
        let campaign = self.campaign_mut(id)?;
        campaign.ensure_state(!campaign.state.is_terminal(), "Prepared or Active")?;
        let default_max = campaign.terms.max_per_investor;
        for (min, max) in mins.iter().zip(maxs) {
            let effective = if *max == 0 { default_max } else { *max };
            if effective != 0 && *min > effective {
                return Err(FundraisingError::InvalidTerms("minimum exceeds maximum"));
            }
        }
        for ((investor, min), max) in investors.iter().zip(mins).zip(maxs) {
            campaign
                .whitelist
                .insert(investor.clone(), WhitelistEntry { min: *min, max: *max });
        }
        debug!(campaign = %id, entries = investors.len(), "whitelist updated");
        self.pending_events.push(Event::WhitelistUpdated {
            campaign: id,
            entries: investors.len(),
        });
        Ok(())
    }

    /// Every whitelist entry of a campaign; committee members only.
    pub fn whitelist(
        &self,
        gov: &ProposalEngine,
        caller: &AccountId,
        id: CampaignId,
    ) -> Result<Vec<(AccountId, WhitelistEntry)>, FundraisingError> {
        gov.committee().ensure_member(caller)?;
        let campaign = self.campaign(id)?;
        Ok(campaign
            .whitelist
            .iter()
            .map(|(who, entry)| (who.clone(), *entry))
            .collect())
    }

    /// Whitelist entries for `investors`; committee members only.
    pub fn whitelist_limits(
        &self,
        gov: &ProposalEngine,
        caller: &AccountId,
        id: CampaignId,
        investors: &[AccountId],
    ) -> Result<Vec<Option<WhitelistEntry>>, FundraisingError> {
        gov.committee().ensure_member(caller)?;
        let campaign = self.campaign(id)?;
        Ok(investors
            .iter()
            .map(|who| campaign.whitelist.get(who).copied())
            .collect())
    }

    /// Invest `amount` of the campaign asset.
    ///
    /// An investment that would push the raise past the supply-derived cap
    /// is rejected, never clamped.
    pub fn invest(
        &mut self,
        bank: &mut dyn AssetTransfer,
        id: CampaignId,
        investor: &AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), FundraisingError> {
        let entity = EntityRef::Campaign(id);
        let invested = self.ledger.entry(entity, investor).assigned;
        let campaign = self.campaign(id)?;
        campaign.ensure_state(campaign.state == CampaignState::Active, "Active")?;
        if now < campaign.terms.start {
            return Err(FundraisingError::NotStarted);
        }
        if now > campaign.terms.end {
            return Err(FundraisingError::Ended);
        }
        if amount == 0 {
            return Err(FundraisingError::ZeroAmount);
        }
        if campaign.terms.whitelist_only && !campaign.whitelist.contains_key(investor) {
            return Err(FundraisingError::NotWhitelisted(investor.clone()));
        }
        let total = invested.checked_add(amount).ok_or(FundraisingError::Overflow)?;
        let (min, max) = campaign.limits_for(investor);
        if total < min {
            return Err(FundraisingError::BelowMinimum { min, total });
        }
        if max != 0 && total > max {
            return Err(FundraisingError::AboveMaximum { max, total });
        }
        let raised = campaign
            .raised
            .checked_add(amount)
            .ok_or(FundraisingError::Overflow)?;
        if let Some(cap) = campaign.terms.raise_cap()? {
            if raised > cap {
                return Err(FundraisingError::CapExceeded {
                    cap,
                    requested: raised,
                });
            }
        }
        let asset = campaign.terms.asset.clone();

        bank.receive(&asset, investor, amount)?;
        self.ledger.credit(entity, investor, amount)?;
        self.campaign_mut(id)?.raised = raised;

        debug!(campaign = %id, %investor, amount, raised, "investment recorded");
        self.pending_events.push(Event::Invested {
            campaign: id,
            investor: investor.clone(),
            amount,
        });
        Ok(())
    }

    /// Tokens not yet spoken for by investments.
    pub fn available_tokens(&self, id: CampaignId) -> Result<u128, FundraisingError> {
        let campaign = self.campaign(id)?;
        let committed = match campaign.terms.raise_cap()? {
            Some(_) => campaign.terms.tokens_for(campaign.raised, campaign.raised)?,
            None if campaign.raised > 0 => campaign.terms.total_tokens,
            None => 0,
        };
        Ok(campaign.terms.total_tokens.saturating_sub(committed))
    }

    /// Close an active campaign at or after its end time.
    pub fn finish_campaign(&mut self, id: CampaignId, now: Timestamp) -> Result<CampaignState, FundraisingError> {
        let campaign = self.campaign_mut(id)?;
        campaign.ensure_state(campaign.state == CampaignState::Active, "Active")?;
        if now < campaign.terms.end {
            return Err(FundraisingError::NotEnded);
        }
        let goal_met = campaign.raised >= campaign.terms.goal;
        campaign.state = if goal_met {
            CampaignState::Finished
        } else {
            CampaignState::Failed
        };
        let (state, raised) = (campaign.state, campaign.raised);
        info!(campaign = %id, goal_met, raised, "campaign finished");
        self.pending_events.push(Event::CampaignFinished {
            campaign: id,
            goal_met,
            raised,
        });
        Ok(state)
    }

    /// Creator proposes cancelling a campaign that has not terminated.
    pub fn propose_abort(
        &mut self,
        gov: &mut ProposalEngine,
        caller: &AccountId,
        id: CampaignId,
        refundable: bool,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<ProposalId, FundraisingError> {
        let campaign = self.campaign(id)?;
        if campaign.creator != *caller {
            return Err(FundraisingError::NotCreator(caller.clone()));
        }
        campaign.ensure_state(!campaign.state.is_terminal(), "Prepared or Active")?;
        let params = ProposalParams::AbortCampaign {
            campaign: id,
            refundable,
        };
        Ok(gov.propose(caller, Origin::Fundraising, duration_secs, params, now)?)
    }

    pub fn abort_campaign(
        &mut self,
        gov: &mut ProposalEngine,
        id: CampaignId,
        proposal: ProposalId,
        refundable: bool,
        now: Timestamp,
    ) -> Result<(), FundraisingError> {
        let campaign = self.campaign(id)?;
        campaign.ensure_state(!campaign.state.is_terminal(), "Prepared or Active")?;
        let params = ProposalParams::AbortCampaign {
            campaign: id,
            refundable,
        };
        gov.gate(proposal, Origin::Fundraising, &params, now)?;
        self.campaign_mut(id)?.state = CampaignState::Aborted { refundable };
        info!(campaign = %id, refundable, "campaign aborted");
        self.pending_events.push(Event::CampaignAborted {
            campaign: id,
            refundable,
        });
        Ok(())
    }

    /// Tokens owed to `investor` on the claim path.
    pub fn tokens_owed(&self, id: CampaignId, investor: &AccountId) -> Result<u128, FundraisingError> {
        let campaign = self.campaign(id)?;
        let invested = self.ledger.entry(EntityRef::Campaign(id), investor).assigned;
        campaign.terms.tokens_for(invested, campaign.raised)
    }

    /// One-shot token claim for an investor of a successful campaign.
    pub fn withdraw_tokens(
        &mut self,
        token: &mut dyn GovernanceToken,
        id: CampaignId,
        investor: &AccountId,
        now: Timestamp,
    ) -> Result<u128, FundraisingError> {
        let entity = EntityRef::Campaign(id);
        let campaign = self.campaign(id)?;
        campaign.ensure_state(campaign.state.is_claim_path(), "Finished")?;
        if self.ledger.entry(entity, investor).assigned == 0 {
            return Err(FundraisingError::NotInvestor(investor.clone()));
        }
        let owed = self.tokens_owed(id, investor)?;
        self.settlements.settle_once(
            entity,
            investor,
            SettlementKind::TokenWithdrawal,
            owed,
            now,
            |amount| token.release(investor, amount),
        )?;
        self.record_settlement(entity, investor, SettlementKind::TokenWithdrawal, owed);
        Ok(owed)
    }

    /// One-shot refund of exactly the invested amount on the refund path.
    pub fn refund_asset(
        &mut self,
        bank: &mut dyn AssetTransfer,
        id: CampaignId,
        investor: &AccountId,
        now: Timestamp,
    ) -> Result<u128, FundraisingError> {
        let entity = EntityRef::Campaign(id);
        let campaign = self.campaign(id)?;
        campaign.ensure_state(campaign.state.is_refund_path(), "Failed or refundable abort")?;
        let asset = campaign.terms.asset.clone();
        let invested = self.ledger.entry(entity, investor).assigned;
        if invested == 0 {
            return Err(FundraisingError::NotInvestor(investor.clone()));
        }
        self.settlements.settle_once(
            entity,
            investor,
            SettlementKind::AssetRefund,
            invested,
            now,
            |amount| bank.send(&asset, investor, amount),
        )?;
        self.record_settlement(entity, investor, SettlementKind::AssetRefund, invested);
        Ok(invested)
    }

    /// Sweep the raise to the treasury account; creator only, once.
    pub fn withdraw_asset(
        &mut self,
        bank: &mut dyn AssetTransfer,
        caller: &AccountId,
        id: CampaignId,
        now: Timestamp,
    ) -> Result<u128, FundraisingError> {
        let entity = EntityRef::Campaign(id);
        let campaign = self.campaign(id)?;
        if campaign.creator != *caller {
            return Err(FundraisingError::NotCreator(caller.clone()));
        }
        campaign.ensure_state(campaign.state.is_claim_path(), "Finished")?;
        let (asset, raised) = (campaign.terms.asset.clone(), campaign.raised);
        let treasury = self.treasury.clone();
        self.settlements.settle_once(
            entity,
            &treasury,
            SettlementKind::AssetSweep,
            raised,
            now,
            |amount| bank.send(&asset, &treasury, amount),
        )?;
        self.record_settlement(entity, &treasury, SettlementKind::AssetSweep, raised);
        Ok(raised)
    }

    /// Tokens reserved for a terminated campaign that no investor can claim.
    ///
    /// On the claim path this is the supply minus the floor-rounded amounts
    /// owed; on the refund path it is the whole supply.
    pub fn unallocated_tokens(&self, id: CampaignId) -> Result<u128, FundraisingError> {
        let campaign = self.campaign(id)?;
        if !campaign.tokens_reserved {
            return Ok(0);
        }
        if campaign.state.is_refund_path() {
            return Ok(campaign.terms.total_tokens);
        }
        let mut owed = 0u128;
        for (_, entry) in self.ledger.beneficiaries(EntityRef::Campaign(id)) {
            let tokens = campaign.terms.tokens_for(entry.assigned, campaign.raised)?;
            owed = owed.checked_add(tokens).ok_or(FundraisingError::Overflow)?;
        }
        Ok(campaign.terms.total_tokens.saturating_sub(owed))
    }

    pub fn propose_burn_unallocated(
        &mut self,
        gov: &mut ProposalEngine,
        caller: &AccountId,
        id: CampaignId,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<ProposalId, FundraisingError> {
        let campaign = self.campaign(id)?;
        if campaign.creator != *caller {
            return Err(FundraisingError::NotCreator(caller.clone()));
        }
        campaign.ensure_state(campaign.state.is_terminal(), "terminated")?;
        let params = ProposalParams::BurnUnallocated { campaign: id };
        Ok(gov.propose(caller, Origin::Fundraising, duration_secs, params, now)?)
    }

    /// Return unallocated tokens to the unreleased supply; gated, once.
    pub fn burn_unallocated(
        &mut self,
        gov: &mut ProposalEngine,
        token: &mut dyn GovernanceToken,
        caller: &AccountId,
        id: CampaignId,
        proposal: ProposalId,
        now: Timestamp,
    ) -> Result<u128, FundraisingError> {
        let entity = EntityRef::Campaign(id);
        let campaign = self.campaign(id)?;
        if campaign.creator != *caller {
            return Err(FundraisingError::NotCreator(caller.clone()));
        }
        campaign.ensure_state(campaign.state.is_terminal(), "terminated")?;
        let creator = campaign.creator.clone();
        self.settlements
            .ensure_unsettled(entity, &creator, SettlementKind::UnallocatedBurn)?;
        let amount = self.unallocated_tokens(id)?;
        gov.gate(proposal, Origin::Fundraising, &ProposalParams::BurnUnallocated { campaign: id }, now)?;
        self.settlements.settle_once(
            entity,
            &creator,
            SettlementKind::UnallocatedBurn,
            amount,
            now,
            |amount| token.unreserve(amount),
        )?;
        self.record_settlement(entity, &creator, SettlementKind::UnallocatedBurn, amount);
        Ok(amount)
    }

    pub fn investor_info(&self, id: CampaignId, investor: &AccountId) -> Result<InvestorInfo, FundraisingError> {
        let entity = EntityRef::Campaign(id);
        let campaign = self.campaign(id)?;
        let (min, max) = campaign.limits_for(investor);
        Ok(InvestorInfo {
            min,
            max,
            invested: self.ledger.entry(entity, investor).assigned,
            tokens_withdrawn: self
                .settlements
                .is_settled(entity, investor, SettlementKind::TokenWithdrawal),
            refunded: self
                .settlements
                .is_settled(entity, investor, SettlementKind::AssetRefund),
        })
    }

    /// Sum of per-investor amounts as recorded in the ledger.
    pub fn ledger_raised(&self, id: CampaignId) -> u128 {
        self.ledger.total(EntityRef::Campaign(id)).assigned
    }

    fn record_settlement(&mut self, entity: EntityRef, beneficiary: &AccountId, kind: SettlementKind, amount: u128) {
        self.pending_events.push(Event::Settled {
            entity,
            beneficiary: beneficiary.clone(),
            kind,
            amount,
        });
    }
}
