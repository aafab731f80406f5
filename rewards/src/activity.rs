//! Marketing activities.
//!
//! `Created -> ContributionsOpen -> Evaluated -> RewardsReleased`. Paying
//! the budget funds the activity and opens contributions in one step; the
//! reward pool is set aside only once the evaluation proposal passes.

use crate::contribution::{reward_pool, ContributionBook};
use crate::error::RewardError;
use quorum_governance::{Origin, ProposalEngine, ProposalParams, ProposalState};
use quorum_host::{Event, GovernanceToken};
use quorum_ledger::SettlementLedger;
use quorum_types::{AccountId, ActivityId, EntityRef, ProposalId, SettlementKind, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityState {
    Created,
    /// Budget paid; the principal records contributions.
    ContributionsOpen,
    /// Percent fixed, reward proposal pending.
    Evaluated,
    RewardsReleased,
}

impl ActivityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::ContributionsOpen => "contributions_open",
            Self::Evaluated => "evaluated",
            Self::RewardsReleased => "rewards_released",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTerms {
    /// Paid to the principal when the activity is funded.
    pub budget: u128,
    /// Shared among contributors, scaled by the evaluation percent.
    pub reward: u128,
    pub start: Timestamp,
    pub end: Timestamp,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub principal: AccountId,
    pub terms: ActivityTerms,
    pub state: ActivityState,
    pub evaluate_percent: u32,
    pub funding_proposal: ProposalId,
    pub reward_proposal: Option<ProposalId>,
    pub contributions: ContributionBook,
}

impl Activity {
    fn funding_params(&self) -> ProposalParams {
        ProposalParams::ActivityFunding {
            activity: self.id,
            principal: self.principal.clone(),
            budget: self.terms.budget,
            reward: self.terms.reward,
        }
    }

    fn reward_params(&self) -> ProposalParams {
        ProposalParams::ActivityReward {
            activity: self.id,
            reward: self.terms.reward,
            percent: self.evaluate_percent,
        }
    }

    fn ensure_state(&self, expected: ActivityState) -> Result<(), RewardError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RewardError::WrongState {
                entity: self.id.to_string(),
                state: self.state.as_str(),
                expected: expected.as_str(),
            })
        }
    }

    fn ensure_principal(&self, caller: &AccountId) -> Result<(), RewardError> {
        if self.principal == *caller {
            Ok(())
        } else {
            Err(RewardError::NotPrincipal(caller.clone()))
        }
    }
}

pub struct Activities {
    activities: BTreeMap<ActivityId, Activity>,
    next_id: ActivityId,
    settlements: SettlementLedger,
    pending_events: Vec<Event>,
}

impl Default for Activities {
    fn default() -> Self {
        Self::new()
    }
}

impl Activities {
    pub fn new() -> Self {
        Self {
            activities: BTreeMap::new(),
            next_id: ActivityId::FIRST,
            settlements: SettlementLedger::new(),
            pending_events: Vec::new(),
        }
    }

    pub fn activity(&self, id: ActivityId) -> Result<&Activity, RewardError> {
        self.activities
            .get(&id)
            .ok_or(RewardError::ActivityNotFound(id))
    }

    fn activity_mut(&mut self, id: ActivityId) -> Result<&mut Activity, RewardError> {
        self.activities
            .get_mut(&id)
            .ok_or(RewardError::ActivityNotFound(id))
    }

    pub fn contribution_of(&self, id: ActivityId, who: &AccountId) -> Result<u128, RewardError> {
        Ok(self.activity(id)?.contributions.weight_of(who))
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending_events)
    }

    /// Register an activity led by `principal` and the proposal that funds it.
    pub fn create_activity(
        &mut self,
        gov: &mut ProposalEngine,
        principal: &AccountId,
        terms: ActivityTerms,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<(ActivityId, ProposalId), RewardError> {
        if terms.start > terms.end {
            return Err(RewardError::InvalidWindow);
        }
        let id = self.next_id;
        let next = id.next().ok_or(RewardError::Overflow)?;
        let mut activity = Activity {
            id,
            principal: principal.clone(),
            terms,
            state: ActivityState::Created,
            evaluate_percent: 0,
            funding_proposal: ProposalId::FIRST,
            reward_proposal: None,
            contributions: ContributionBook::new(),
        };
        let proposal = gov.propose(principal, Origin::Activities, duration_secs, activity.funding_params(), now)?;
        activity.funding_proposal = proposal;
        self.activities.insert(id, activity);
        self.next_id = next;

        info!(activity = %id, %principal, %proposal, "activity created");
        self.pending_events.push(Event::ActivityCreated {
            activity: id,
            principal: principal.clone(),
            proposal,
        });
        Ok((id, proposal))
    }

    /// Execute the funding proposal: pay the budget to the principal and open
    /// contributions.
    pub fn pay(
        &mut self,
        gov: &mut ProposalEngine,
        token: &mut dyn GovernanceToken,
        id: ActivityId,
        now: Timestamp,
    ) -> Result<(), RewardError> {
        let activity = self.activity(id)?;
        activity.ensure_state(ActivityState::Created)?;
        let (budget, principal) = (activity.terms.budget, activity.principal.clone());
        ensure_supply(token, budget)?;
        gov.gate(activity.funding_proposal, Origin::Activities, &activity.funding_params(), now)?;
        if budget > 0 {
            token.reserve(budget)?;
            token.release(&principal, budget)?;
        }
        self.transition(id, ActivityState::ContributionsOpen)?;
        info!(activity = %id, %principal, budget, "activity funded");
        Ok(())
    }

    /// Record contributor weights; a repeated contributor is overwritten.
    pub fn update_contributions(
        &mut self,
        caller: &AccountId,
        id: ActivityId,
        updates: &[(AccountId, u128)],
    ) -> Result<(), RewardError> {
        let activity = self.activity_mut(id)?;
        activity.ensure_principal(caller)?;
        activity.ensure_state(ActivityState::ContributionsOpen)?;
        activity.contributions.apply(updates)?;
        let (contributors, total_weight) = (activity.contributions.len(), activity.contributions.total());
        debug!(activity = %id, contributors, total_weight, "contributions updated");
        self.pending_events.push(Event::ContributionsUpdated {
            entity: EntityRef::Activity(id),
            contributors,
            total_weight,
        });
        Ok(())
    }

    /// Fix the evaluation percent and propose releasing the reward.
    ///
    /// The percent is not capped; an evaluation above 100 draws
    /// more than `reward` from the unreleased supply. An evaluated activity
    /// may be evaluated again once its reward proposal was rejected or
    /// expired.
    pub fn evaluate(
        &mut self,
        gov: &mut ProposalEngine,
        caller: &AccountId,
        id: ActivityId,
        percent: u32,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<ProposalId, RewardError> {
        let activity = self.activity(id)?;
        activity.ensure_principal(caller)?;
        match (activity.state, activity.reward_proposal) {
            (ActivityState::Evaluated, Some(previous)) => {
                let state = gov.finalize(previous, &activity.reward_params(), now)?;
                if !matches!(state, ProposalState::Rejected | ProposalState::Expired) {
                    return Err(RewardError::ProposalOutstanding {
                        entity: id.to_string(),
                        proposal: previous,
                        state,
                    });
                }
                debug!(activity = %id, %previous, ?state, "re-evaluating after failed reward proposal");
            }
            _ => activity.ensure_state(ActivityState::ContributionsOpen)?,
        }
        let params = ProposalParams::ActivityReward {
            activity: id,
            reward: activity.terms.reward,
            percent,
        };
        let proposal = gov.propose(caller, Origin::Activities, duration_secs, params, now)?;

        let activity = self.activity_mut(id)?;
        activity.evaluate_percent = percent;
        activity.reward_proposal = Some(proposal);
        self.transition(id, ActivityState::Evaluated)?;
        info!(activity = %id, percent, %proposal, "activity evaluated");
        Ok(proposal)
    }

    /// Execute the reward proposal, setting the scaled reward pool aside.
    pub fn take_reward(
        &mut self,
        gov: &mut ProposalEngine,
        token: &mut dyn GovernanceToken,
        id: ActivityId,
        now: Timestamp,
    ) -> Result<u128, RewardError> {
        let activity = self.activity(id)?;
        activity.ensure_state(ActivityState::Evaluated)?;
        let proposal = activity.reward_proposal.ok_or(RewardError::WrongState {
            entity: id.to_string(),
            state: activity.state.as_str(),
            expected: ActivityState::Evaluated.as_str(),
        })?;
        let pool = reward_pool(activity.terms.reward, activity.evaluate_percent)?;
        ensure_supply(token, pool)?;
        gov.gate(proposal, Origin::Activities, &activity.reward_params(), now)?;
        if pool > 0 {
            token.reserve(pool)?;
        }
        self.transition(id, ActivityState::RewardsReleased)?;
        info!(activity = %id, pool, "activity rewards released");
        Ok(pool)
    }

    /// Withdraw `who`'s reward from each listed activity.
    ///
    /// Every activity must have released its rewards and must not have paid
    /// `who` already; the batch is checked before anything is paid. A
    /// non-contributor receives zero without error.
    pub fn withdraw_rewards(
        &mut self,
        token: &mut dyn GovernanceToken,
        who: &AccountId,
        ids: &[ActivityId],
        now: Timestamp,
    ) -> Result<u128, RewardError> {
        let ids: BTreeSet<ActivityId> = ids.iter().copied().collect();
        let mut owed = Vec::with_capacity(ids.len());
        for id in &ids {
            let activity = self.activity(*id)?;
            activity.ensure_state(ActivityState::RewardsReleased)?;
            self.settlements
                .ensure_unsettled(EntityRef::Activity(*id), who, SettlementKind::RewardWithdrawal)?;
            let amount = activity
                .contributions
                .payout(who, activity.terms.reward, activity.evaluate_percent)?;
            owed.push((*id, amount));
        }

        let mut total = 0u128;
        for (id, amount) in owed {
            let entity = EntityRef::Activity(id);
            self.settlements.settle_once(
                entity,
                who,
                SettlementKind::RewardWithdrawal,
                amount,
                now,
                |amount| token.release(who, amount),
            )?;
            total = total.checked_add(amount).ok_or(RewardError::Overflow)?;
            self.pending_events.push(Event::Settled {
                entity,
                beneficiary: who.clone(),
                kind: SettlementKind::RewardWithdrawal,
                amount,
            });
        }
        Ok(total)
    }

    fn transition(&mut self, id: ActivityId, state: ActivityState) -> Result<(), RewardError> {
        self.activity_mut(id)?.state = state;
        self.pending_events.push(Event::ActivityStateChanged {
            activity: id,
            state: state.as_str().to_string(),
        });
        Ok(())
    }
}

pub(crate) fn ensure_supply(token: &dyn GovernanceToken, needed: u128) -> Result<(), RewardError> {
    let available = token.unreleased_supply();
    if available < needed {
        return Err(RewardError::InsufficientSupply { needed, available });
    }
    Ok(())
}
