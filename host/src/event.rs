//! Observations recorded in the host's append-only event log.

use quorum_types::{
    AccountId, ActivityId, AssetId, CampaignId, EntityRef, ProjectId, ProposalId, SaleId,
    SettlementKind, Timestamp,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // ── Proposals ────────────────────────────────────────────────────────
    ProposalStarted {
        id: ProposalId,
        origin: String,
        fingerprint: String,
        expires_at: Timestamp,
    },
    VoteCast {
        id: ProposalId,
        voter: AccountId,
        support: bool,
        weight: u128,
    },
    ProposalAccepted {
        id: ProposalId,
    },
    ProposalRejected {
        id: ProposalId,
    },
    ProposalExpired {
        id: ProposalId,
    },
    ProposalExecuted {
        id: ProposalId,
    },

    // ── Membership ───────────────────────────────────────────────────────
    MemberAdded {
        member: AccountId,
    },
    MemberRemoved {
        member: AccountId,
    },
    MembersReplaced {
        members: Vec<AccountId>,
    },
    DevRatioChanged {
        percent: u32,
    },
    UpgradeAuthorized {
        component: String,
        implementation: String,
    },

    // ── Fundraising ──────────────────────────────────────────────────────
    CampaignCreated {
        campaign: CampaignId,
        proposal: ProposalId,
    },
    CampaignStarted {
        campaign: CampaignId,
    },
    WhitelistUpdated {
        campaign: CampaignId,
        entries: usize,
    },
    Invested {
        campaign: CampaignId,
        investor: AccountId,
        amount: u128,
    },
    CampaignFinished {
        campaign: CampaignId,
        goal_met: bool,
        raised: u128,
    },
    CampaignAborted {
        campaign: CampaignId,
        refundable: bool,
    },
    SaleStarted {
        sale: SaleId,
        operator: AccountId,
        asset: AssetId,
        asset_amount: u128,
    },
    SalePurchase {
        sale: SaleId,
        investor: AccountId,
        paid: u128,
        received: u128,
    },
    SaleEnded {
        sale: SaleId,
        unsold: u128,
        collected: u128,
    },

    // ── Rewards ──────────────────────────────────────────────────────────
    ActivityCreated {
        activity: ActivityId,
        principal: AccountId,
        proposal: ProposalId,
    },
    ActivityStateChanged {
        activity: ActivityId,
        state: String,
    },
    ProjectCreated {
        project: ProjectId,
        manager: AccountId,
        proposal: ProposalId,
    },
    ProjectStateChanged {
        project: ProjectId,
        state: String,
    },
    ContributionsUpdated {
        entity: EntityRef,
        contributors: usize,
        total_weight: u128,
    },

    // ── Vesting and dividends ────────────────────────────────────────────
    TokensLocked {
        beneficiary: AccountId,
        amount: u128,
    },
    TokensUnlocked {
        beneficiary: AccountId,
        amount: u128,
    },
    TokensClaimed {
        beneficiary: AccountId,
        amount: u128,
    },
    ReleaseStarted {
        at: Timestamp,
        duration_secs: u64,
    },
    DividendStateChanged {
        enabled: bool,
    },
    DividendDeposited {
        asset: AssetId,
        from: AccountId,
        amount: u128,
    },
    DividendWithdrawn {
        holder: AccountId,
        burned: u128,
        payouts: Vec<(AssetId, u128)>,
    },

    // ── Treasury ─────────────────────────────────────────────────────────
    Settled {
        entity: EntityRef,
        beneficiary: AccountId,
        kind: SettlementKind,
        amount: u128,
    },
    TreasuryTransfer {
        asset: AssetId,
        to: AccountId,
        amount: u128,
    },
}

impl Event {
    /// Short, stable name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProposalStarted { .. } => "proposal_started",
            Self::VoteCast { .. } => "vote_cast",
            Self::ProposalAccepted { .. } => "proposal_accepted",
            Self::ProposalRejected { .. } => "proposal_rejected",
            Self::ProposalExpired { .. } => "proposal_expired",
            Self::ProposalExecuted { .. } => "proposal_executed",
            Self::MemberAdded { .. } => "member_added",
            Self::MemberRemoved { .. } => "member_removed",
            Self::MembersReplaced { .. } => "members_replaced",
            Self::DevRatioChanged { .. } => "dev_ratio_changed",
            Self::UpgradeAuthorized { .. } => "upgrade_authorized",
            Self::CampaignCreated { .. } => "campaign_created",
            Self::CampaignStarted { .. } => "campaign_started",
            Self::WhitelistUpdated { .. } => "whitelist_updated",
            Self::Invested { .. } => "invested",
            Self::CampaignFinished { .. } => "campaign_finished",
            Self::CampaignAborted { .. } => "campaign_aborted",
            Self::SaleStarted { .. } => "sale_started",
            Self::SalePurchase { .. } => "sale_purchase",
            Self::SaleEnded { .. } => "sale_ended",
            Self::ActivityCreated { .. } => "activity_created",
            Self::ActivityStateChanged { .. } => "activity_state_changed",
            Self::ProjectCreated { .. } => "project_created",
            Self::ProjectStateChanged { .. } => "project_state_changed",
            Self::ContributionsUpdated { .. } => "contributions_updated",
            Self::TokensLocked { .. } => "tokens_locked",
            Self::TokensUnlocked { .. } => "tokens_unlocked",
            Self::TokensClaimed { .. } => "tokens_claimed",
            Self::ReleaseStarted { .. } => "release_started",
            Self::DividendStateChanged { .. } => "dividend_state_changed",
            Self::DividendDeposited { .. } => "dividend_deposited",
            Self::DividendWithdrawn { .. } => "dividend_withdrawn",
            Self::Settled { .. } => "settled",
            Self::TreasuryTransfer { .. } => "treasury_transfer",
        }
    }
}
