use quorum_host::TransferError;
use quorum_types::{AccountId, EntityRef, ErrorKind, SettlementKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("insufficient locked balance: need {needed}, locked {available}")]
    InsufficientLocked { needed: u128, available: u128 },

    #[error("insufficient unlocked balance: need {needed}, claimable {available}")]
    InsufficientUnlocked { needed: u128, available: u128 },

    #[error("{kind} for {beneficiary} on {entity} already settled")]
    AlreadyWithdrawn {
        entity: EntityRef,
        beneficiary: AccountId,
        kind: SettlementKind,
    },

    #[error("total weight is zero")]
    ZeroTotalWeight,

    #[error("arithmetic overflow in ledger computation")]
    Overflow,

    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroAmount
            | Self::ZeroTotalWeight
            | Self::Overflow
            | Self::InsufficientLocked { .. }
            | Self::InsufficientUnlocked { .. } => ErrorKind::InvalidAmount,
            Self::AlreadyWithdrawn { .. } => ErrorKind::AlreadyWithdrawn,
            Self::Transfer(_) => ErrorKind::Transfer,
        }
    }
}
