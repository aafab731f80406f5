use crate::campaign::CampaignState;
use quorum_governance::GovernanceError;
use quorum_host::TransferError;
use quorum_ledger::LedgerError;
use quorum_types::{AccountId, CampaignId, ErrorKind, SaleId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FundraisingError {
    #[error("{0} not found")]
    CampaignNotFound(CampaignId),

    #[error("{0} not found")]
    SaleNotFound(SaleId),

    #[error("invalid campaign terms: {0}")]
    InvalidTerms(&'static str),

    #[error("{id} is {state:?}, expected {expected}")]
    WrongState {
        id: CampaignId,
        state: CampaignState,
        expected: &'static str,
    },

    #[error("investment window has not opened yet")]
    NotStarted,

    #[error("investment window has closed")]
    Ended,

    #[error("campaign end time has not been reached")]
    NotEnded,

    #[error("{0} is not on the whitelist")]
    NotWhitelisted(AccountId),

    #[error("{0} is not the campaign creator")]
    NotCreator(AccountId),

    #[error("{0} is not the sale operator")]
    NotOperator(AccountId),

    #[error("{0} did not invest")]
    NotInvestor(AccountId),

    #[error("cumulative investment {total} below minimum {min}")]
    BelowMinimum { min: u128, total: u128 },

    #[error("cumulative investment {total} above maximum {max}")]
    AboveMaximum { max: u128, total: u128 },

    #[error("raise would reach {requested}, above cap {cap}")]
    CapExceeded { cap: u128, requested: u128 },

    #[error("only {remaining} left for sale, requested {requested}")]
    InsufficientSupply { remaining: u128, requested: u128 },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("amount {0} does not convert to a whole asset amount")]
    InexactConversion(u128),

    #[error("whitelist and limit lists differ in length")]
    LengthMismatch,

    #[error("sale has closed")]
    SaleClosed,

    #[error("sale has not sold out and cannot end early")]
    NotSoldOut,

    #[error("arithmetic overflow in fundraising computation")]
    Overflow,

    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl FundraisingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CampaignNotFound(_) | Self::SaleNotFound(_) => ErrorKind::NotFound,
            Self::InvalidTerms(_)
            | Self::ZeroAmount
            | Self::InexactConversion(_)
            | Self::LengthMismatch
            | Self::Overflow => ErrorKind::InvalidAmount,
            Self::WrongState { .. }
            | Self::NotStarted
            | Self::Ended
            | Self::NotEnded
            | Self::NotInvestor(_)
            | Self::SaleClosed
            | Self::NotSoldOut => ErrorKind::InvalidState,
            Self::NotWhitelisted(_) | Self::NotCreator(_) | Self::NotOperator(_) => {
                ErrorKind::Unauthorized
            }
            Self::BelowMinimum { .. }
            | Self::AboveMaximum { .. }
            | Self::CapExceeded { .. }
            | Self::InsufficientSupply { .. } => ErrorKind::LimitExceeded,
            Self::Governance(e) => e.kind(),
            Self::Ledger(e) => e.kind(),
            Self::Transfer(_) => ErrorKind::Transfer,
        }
    }
}
