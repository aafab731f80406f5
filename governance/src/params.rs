//! Proposal parameter payloads.
//!
//! One variant per proposal kind. A proposal binds the exact payload at
//! creation; votes, finalization, and the execution gate all compare the
//! re-submitted payload structurally against the bound one, so an accepted
//! proposal can never authorize an action with different arguments.

use quorum_types::{AccountId, ActivityId, AssetId, CampaignId, ProjectId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalParams {
    /// Free-form committee resolution with no on-ledger effect.
    Generic { topic: String, values: Vec<String> },

    // ── Membership ───────────────────────────────────────────────────────
    AddMember { member: AccountId },
    RemoveMember { member: AccountId },
    SetMembers { members: Vec<AccountId> },
    SetDevRatio { percent: u32 },
    Upgrade {
        component: String,
        implementation: String,
    },

    // ── Fundraising ──────────────────────────────────────────────────────
    StartCampaign {
        campaign: CampaignId,
        creator: AccountId,
        asset: AssetId,
        total_tokens: u128,
        goal: u128,
        start: Timestamp,
        end: Timestamp,
    },
    AbortCampaign {
        campaign: CampaignId,
        refundable: bool,
    },
    BurnUnallocated { campaign: CampaignId },

    // ── Rewards ──────────────────────────────────────────────────────────
    ActivityFunding {
        activity: ActivityId,
        principal: AccountId,
        budget: u128,
        reward: u128,
    },
    ActivityReward {
        activity: ActivityId,
        reward: u128,
        percent: u32,
    },
    ProjectCreate {
        project: ProjectId,
        manager: AccountId,
        budget: u128,
        name: String,
        version: String,
    },
    ProjectAccept {
        project: ProjectId,
        budget: u128,
        grade_percent: u32,
    },

    // ── Vesting and dividends ────────────────────────────────────────────
    LockupDeposit { grants: Vec<(AccountId, u128)> },
    LockupUnlock { grants: Vec<(AccountId, u128)> },
    DividendState { enabled: bool },

    // ── Treasury wallet ──────────────────────────────────────────────────
    TreasuryTransfer {
        asset: AssetId,
        to: AccountId,
        amount: u128,
    },
}

impl ProposalParams {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Generic { .. } => "generic",
            Self::AddMember { .. } => "add_member",
            Self::RemoveMember { .. } => "remove_member",
            Self::SetMembers { .. } => "set_members",
            Self::SetDevRatio { .. } => "set_dev_ratio",
            Self::Upgrade { .. } => "upgrade",
            Self::StartCampaign { .. } => "start_campaign",
            Self::AbortCampaign { .. } => "abort_campaign",
            Self::BurnUnallocated { .. } => "burn_unallocated",
            Self::ActivityFunding { .. } => "activity_funding",
            Self::ActivityReward { .. } => "activity_reward",
            Self::ProjectCreate { .. } => "project_create",
            Self::ProjectAccept { .. } => "project_accept",
            Self::LockupDeposit { .. } => "lockup_deposit",
            Self::LockupUnlock { .. } => "lockup_unlock",
            Self::DividendState { .. } => "dividend_state",
            Self::TreasuryTransfer { .. } => "treasury_transfer",
        }
    }
}
