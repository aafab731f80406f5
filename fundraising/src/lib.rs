//! Fundraising for the quorum treasury.
//!
//! Two sale formats:
//! - [`FundraisingEngine`]: time-boxed investment campaigns, started by an
//!   accepted proposal, with optional whitelist tiers and fixed or floating
//!   pricing. Terminal states decide whether investors claim tokens or get
//!   their asset refunded.
//! - [`TieredSales`]: an operator-funded two-phase sale where whitelisted
//!   investors buy up to their tier first and everyone may buy afterwards.

pub mod campaign;
pub mod engine;
pub mod error;
pub mod tiered;

pub use campaign::{Campaign, CampaignState, CampaignTerms, InvestorInfo, PriceModel, WhitelistEntry};
pub use engine::FundraisingEngine;
pub use error::FundraisingError;
pub use tiered::{Sale, SalePhase, SaleTerms, TieredSales};
