use quorum_governance::{GovernanceError, ProposalState};
use quorum_host::TransferError;
use quorum_ledger::LedgerError;
use quorum_types::{AccountId, ActivityId, ErrorKind, ProjectId, ProposalId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewardError {
    #[error("{0} not found")]
    ActivityNotFound(ActivityId),

    #[error("{0} not found")]
    ProjectNotFound(ProjectId),

    #[error("{entity} is {state}, expected {expected}")]
    WrongState {
        entity: String,
        state: &'static str,
        expected: &'static str,
    },

    #[error("{0} is not the activity principal")]
    NotPrincipal(AccountId),

    #[error("{0} is not the project manager")]
    NotManager(AccountId),

    #[error("{entity} is waiting on {proposal} ({state:?})")]
    ProposalOutstanding {
        entity: String,
        proposal: ProposalId,
        state: ProposalState,
    },

    #[error("start must not follow end")]
    InvalidWindow,

    #[error("unreleased supply {available} cannot cover {needed}")]
    InsufficientSupply { needed: u128, available: u128 },

    #[error("arithmetic overflow in reward computation")]
    Overflow,

    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl RewardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ActivityNotFound(_) | Self::ProjectNotFound(_) => ErrorKind::NotFound,
            Self::WrongState { .. } | Self::ProposalOutstanding { .. } => ErrorKind::InvalidState,
            Self::NotPrincipal(_) | Self::NotManager(_) => ErrorKind::Unauthorized,
            Self::InvalidWindow | Self::Overflow => ErrorKind::InvalidAmount,
            Self::InsufficientSupply { .. } => ErrorKind::LimitExceeded,
            Self::Governance(e) => e.kind(),
            Self::Ledger(e) => e.kind(),
            Self::Transfer(_) => ErrorKind::Transfer,
        }
    }
}
