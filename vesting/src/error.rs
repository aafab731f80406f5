use quorum_governance::GovernanceError;
use quorum_host::TransferError;
use quorum_ledger::LedgerError;
use quorum_types::{AccountId, AssetId, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VestingError {
    #[error("grant list is empty")]
    EmptyGrants,

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("release duration must be non-zero")]
    ZeroDuration,

    #[error("release schedule already started")]
    ReleaseAlreadyStarted,

    #[error("{beneficiary} has {available} proposal-locked, cannot unlock {needed}")]
    InsufficientGranted {
        beneficiary: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("unreleased supply {available} cannot cover {needed}")]
    InsufficientSupply { needed: u128, available: u128 },

    #[error("dividend withdrawals are disabled")]
    Disabled,

    #[error("withdrawal of {amount} exceeds circulating supply {circulating}")]
    ExceedsCirculating { amount: u128, circulating: u128 },

    #[error("{holder} holds {available}, cannot surrender {needed}")]
    InsufficientHolding {
        holder: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("custody holds {available} of {asset}, payout needs {needed}")]
    InsufficientPool {
        asset: AssetId,
        needed: u128,
        available: u128,
    },

    #[error("arithmetic overflow in vesting computation")]
    Overflow,

    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl VestingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyGrants
            | Self::ZeroAmount
            | Self::ZeroDuration
            | Self::InsufficientGranted { .. }
            | Self::InsufficientHolding { .. }
            | Self::Overflow => ErrorKind::InvalidAmount,
            Self::ReleaseAlreadyStarted | Self::Disabled => ErrorKind::InvalidState,
            Self::InsufficientSupply { .. }
            | Self::ExceedsCirculating { .. }
            | Self::InsufficientPool { .. } => ErrorKind::LimitExceeded,
            Self::Governance(e) => e.kind(),
            Self::Ledger(e) => e.kind(),
            Self::Transfer(_) => ErrorKind::Transfer,
        }
    }
}
