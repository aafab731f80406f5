//! Error taxonomy shared across crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification every crate error maps onto via its `kind()` method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller is not a member, owner, or originating module.
    Unauthorized,
    /// Operation is not valid in the current state machine state.
    InvalidState,
    /// Zero, out-of-range, or overflowing amount.
    InvalidAmount,
    /// A per-investor or per-campaign cap would be exceeded.
    LimitExceeded,
    /// Re-submitted parameters differ from the ones the proposal was created with.
    FingerprintMismatch,
    /// The accepted proposal has already authorized its action.
    AlreadyExecuted,
    /// The one-shot settlement has already happened.
    AlreadyWithdrawn,
    /// The proposal expired without reaching quorum.
    Expired,
    /// No entity with the given identifier exists.
    NotFound,
    /// An asset or token transfer was refused by the host.
    Transfer,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unauthorized => "unauthorized",
            Self::InvalidState => "invalid state",
            Self::InvalidAmount => "invalid amount",
            Self::LimitExceeded => "limit exceeded",
            Self::FingerprintMismatch => "fingerprint mismatch",
            Self::AlreadyExecuted => "already executed",
            Self::AlreadyWithdrawn => "already withdrawn",
            Self::Expired => "expired",
            Self::NotFound => "not found",
            Self::Transfer => "transfer failed",
        };
        f.write_str(name)
    }
}

/// An externally supplied asset identifier could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid asset identifier: {0:?}")]
pub struct ParseAssetError(pub String);
