use crate::proposal::{Origin, ProposalState};
use quorum_types::{AccountId, ErrorKind, ProposalId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("{0} not found")]
    ProposalNotFound(ProposalId),

    #[error("{0} is not a committee member")]
    NotMember(AccountId),

    #[error("{0} has no voting weight")]
    NoVotingWeight(AccountId),

    #[error("proposal belongs to {expected}, not {actual}")]
    WrongOrigin { expected: Origin, actual: Origin },

    #[error("{id} is {state:?}, not pending")]
    NotPending { id: ProposalId, state: ProposalState },

    #[error("voting on {0} has closed, finalize it instead")]
    VotingClosed(ProposalId),

    #[error("parameters do not match the fingerprint of {0}")]
    FingerprintMismatch(ProposalId),

    #[error("{id} is {state:?}, not accepted")]
    NotAccepted { id: ProposalId, state: ProposalState },

    #[error("{0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("{0} expired without reaching quorum")]
    ProposalExpired(ProposalId),

    #[error("wrong vote path for {0}")]
    WrongKind(ProposalId),

    #[error("proposal duration {duration}s outside [{min}s, {max}s]")]
    DurationOutOfRange { duration: u64, min: u64, max: u64 },

    #[error("{0} is already a committee member")]
    AlreadyMember(AccountId),

    #[error("committee cannot be empty")]
    EmptyCommittee,

    #[error("committee cannot exceed {max} members")]
    CommitteeFull { max: usize },

    #[error("arithmetic overflow in governance computation")]
    Overflow,

    #[error("cannot encode proposal parameters: {0}")]
    Encoding(String),
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProposalNotFound(_) => ErrorKind::NotFound,
            Self::NotMember(_) | Self::NoVotingWeight(_) | Self::WrongOrigin { .. } => {
                ErrorKind::Unauthorized
            }
            Self::NotPending { .. }
            | Self::NotAccepted { .. }
            | Self::WrongKind(_)
            | Self::AlreadyMember(_)
            | Self::EmptyCommittee
            | Self::Encoding(_) => ErrorKind::InvalidState,
            Self::VotingClosed(_) | Self::ProposalExpired(_) => ErrorKind::Expired,
            Self::FingerprintMismatch(_) => ErrorKind::FingerprintMismatch,
            Self::AlreadyExecuted(_) => ErrorKind::AlreadyExecuted,
            Self::DurationOutOfRange { .. } | Self::Overflow => ErrorKind::InvalidAmount,
            Self::CommitteeFull { .. } => ErrorKind::LimitExceeded,
        }
    }
}
