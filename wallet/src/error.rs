use quorum_governance::GovernanceError;
use quorum_host::TransferError;
use quorum_types::{AccountId, AssetId, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("transfer amount must be positive")]
    ZeroAmount,

    #[error("treasury holds {available} of {asset}, {needed} requested")]
    InsufficientBalance {
        asset: AssetId,
        needed: u128,
        available: u128,
    },

    #[error("cannot transfer to the treasury account {0}")]
    SelfTransfer(AccountId),

    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error("treasury transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

impl WalletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroAmount | Self::InsufficientBalance { .. } => ErrorKind::InvalidAmount,
            Self::SelfTransfer(_) => ErrorKind::InvalidState,
            Self::Governance(e) => e.kind(),
            Self::Transfer(_) => ErrorKind::Transfer,
        }
    }
}
