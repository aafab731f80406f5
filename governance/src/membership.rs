//! Membership-change and committee-administration proposals.
//!
//! Only current members may open these. Each binds its target into the
//! payload, so an accepted vote to add one account can never be replayed to
//! add another. Execution is open to any caller once the proposal passes.
//!
//! Replacing the whole committee and authorizing an upgrade are decided by
//! token holders rather than the committee itself: both open weighted
//! proposals and settle only once their window closes.

use crate::engine::ProposalEngine;
use crate::error::GovernanceError;
use crate::params::ProposalParams;
use crate::proposal::Origin;
use quorum_host::{Event, WeightSource};
use quorum_types::{AccountId, ProposalId, Timestamp};
use tracing::info;

impl ProposalEngine {
    fn propose_by_member(
        &mut self,
        proposer: &AccountId,
        duration_secs: u64,
        params: ProposalParams,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        self.committee.ensure_member(proposer)?;
        self.propose(proposer, Origin::Committee, duration_secs, params, now)
    }

    fn propose_weighted_by_member(
        &mut self,
        proposer: &AccountId,
        duration_secs: u64,
        params: ProposalParams,
        weights: &dyn WeightSource,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        self.committee.ensure_member(proposer)?;
        self.propose_full(proposer, Origin::Committee, duration_secs, params, weights, now)
    }

    pub fn propose_add_member(
        &mut self,
        proposer: &AccountId,
        member: &AccountId,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        self.committee.check_insert(member)?;
        let params = ProposalParams::AddMember { member: member.clone() };
        self.propose_by_member(proposer, duration_secs, params, now)
    }

    pub fn add_member(
        &mut self,
        id: ProposalId,
        member: &AccountId,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.committee.check_insert(member)?;
        let params = ProposalParams::AddMember { member: member.clone() };
        self.gate(id, Origin::Committee, &params, now)?;
        self.committee.insert(member.clone());
        info!(%member, "committee member added");
        self.pending_events.push(Event::MemberAdded { member: member.clone() });
        Ok(())
    }

    pub fn propose_remove_member(
        &mut self,
        proposer: &AccountId,
        member: &AccountId,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        self.committee.check_remove(member)?;
        let params = ProposalParams::RemoveMember { member: member.clone() };
        self.propose_by_member(proposer, duration_secs, params, now)
    }

    pub fn remove_member(
        &mut self,
        id: ProposalId,
        member: &AccountId,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.committee.check_remove(member)?;
        let params = ProposalParams::RemoveMember { member: member.clone() };
        self.gate(id, Origin::Committee, &params, now)?;
        self.committee.remove(member);
        info!(%member, "committee member removed");
        self.pending_events.push(Event::MemberRemoved { member: member.clone() });
        Ok(())
    }

    /// Propose replacing the whole committee with `members`. Holders vote
    /// with [`ProposalEngine::cast_weighted_vote`].
    pub fn propose_set_members(
        &mut self,
        proposer: &AccountId,
        members: &[AccountId],
        duration_secs: u64,
        weights: &dyn WeightSource,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        self.committee.check_replace(members)?;
        let params = ProposalParams::SetMembers { members: members.to_vec() };
        self.propose_weighted_by_member(proposer, duration_secs, params, weights, now)
    }

    pub fn set_members(
        &mut self,
        id: ProposalId,
        members: &[AccountId],
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.committee.check_replace(members)?;
        let params = ProposalParams::SetMembers { members: members.to_vec() };
        self.gate(id, Origin::Committee, &params, now)?;
        self.committee.replace(members);
        info!(size = self.committee.len(), "committee replaced");
        self.pending_events.push(Event::MembersReplaced {
            members: self.committee.members().cloned().collect(),
        });
        Ok(())
    }

    pub fn propose_dev_ratio(
        &mut self,
        proposer: &AccountId,
        percent: u32,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        self.propose_by_member(proposer, duration_secs, ProposalParams::SetDevRatio { percent }, now)
    }

    pub fn set_dev_ratio(
        &mut self,
        id: ProposalId,
        percent: u32,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.gate(id, Origin::Committee, &ProposalParams::SetDevRatio { percent }, now)?;
        self.committee.set_dev_ratio(percent);
        info!(percent, "dev ratio changed");
        self.pending_events.push(Event::DevRatioChanged { percent });
        Ok(())
    }

    /// Propose authorizing `implementation` for `component`, decided by
    /// weighted vote.
    ///
    /// Packaging and deployment of the implementation happen outside the
    /// treasury; the engine only records which one was voted in.
    pub fn propose_upgrade(
        &mut self,
        proposer: &AccountId,
        component: &str,
        implementation: &str,
        duration_secs: u64,
        weights: &dyn WeightSource,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        let params = ProposalParams::Upgrade {
            component: component.to_string(),
            implementation: implementation.to_string(),
        };
        self.propose_weighted_by_member(proposer, duration_secs, params, weights, now)
    }

    pub fn authorize_upgrade(
        &mut self,
        id: ProposalId,
        component: &str,
        implementation: &str,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let params = ProposalParams::Upgrade {
            component: component.to_string(),
            implementation: implementation.to_string(),
        };
        self.gate(id, Origin::Committee, &params, now)?;
        self.upgrades
            .insert(component.to_string(), implementation.to_string());
        info!(component, implementation, "upgrade authorized");
        self.pending_events.push(Event::UpgradeAuthorized {
            component: component.to_string(),
            implementation: implementation.to_string(),
        });
        Ok(())
    }

    /// The implementation last authorized for `component`.
    pub fn upgrade_target(&self, component: &str) -> Option<&str> {
        self.upgrades.get(component).map(String::as_str)
    }
}
