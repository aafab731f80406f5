//! References to module-owned entities.
//!
//! Ledger schemes and settlement flags are keyed by an [`EntityRef`] so one
//! ledger can account for every campaign, activity, and vesting pool without
//! any module reaching into another's storage.

use crate::ids::{ActivityId, CampaignId, ProjectId, SaleId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Campaign(CampaignId),
    Sale(SaleId),
    Activity(ActivityId),
    Project(ProjectId),
    /// The single token lockup pool.
    Lockup,
    /// The single dividend pool.
    Dividend,
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Campaign(id) => write!(f, "{id}"),
            Self::Sale(id) => write!(f, "{id}"),
            Self::Activity(id) => write!(f, "{id}"),
            Self::Project(id) => write!(f, "{id}"),
            Self::Lockup => write!(f, "lockup"),
            Self::Dividend => write!(f, "dividend"),
        }
    }
}

/// What a one-shot settlement pays out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SettlementKind {
    /// Investor collects purchased tokens.
    TokenWithdrawal,
    /// Investor gets the invested asset back.
    AssetRefund,
    /// Raised asset is swept to the treasury.
    AssetSweep,
    /// Unsold tokens are returned to the unreleased supply.
    UnallocatedBurn,
    /// Contributor collects a reward share.
    RewardWithdrawal,
    /// Operator closes a sale and recovers what is left.
    SaleClose,
}

impl fmt::Display for SettlementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TokenWithdrawal => "token withdrawal",
            Self::AssetRefund => "asset refund",
            Self::AssetSweep => "asset sweep",
            Self::UnallocatedBurn => "unallocated burn",
            Self::RewardWithdrawal => "reward withdrawal",
            Self::SaleClose => "sale close",
        };
        f.write_str(name)
    }
}
