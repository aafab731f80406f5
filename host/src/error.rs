//! Host collaborator errors.

use quorum_types::{AccountId, AssetId};
use thiserror::Error;

/// An asset or token movement the host refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient {asset} balance for {account}: need {needed}, available {available}")]
    InsufficientBalance {
        asset: AssetId,
        account: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("insufficient {asset} allowance from {account}: need {needed}, approved {approved}")]
    InsufficientAllowance {
        asset: AssetId,
        account: AccountId,
        needed: u128,
        approved: u128,
    },

    #[error("insufficient unreleased supply: need {needed}, available {available}")]
    InsufficientSupply { needed: u128, available: u128 },

    #[error("arithmetic overflow in host balance")]
    Overflow,

    #[error("transfer refused: {0}")]
    Refused(String),
}

/// The event log could not record an observation.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("event log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("event encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
