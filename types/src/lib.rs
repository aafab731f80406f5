//! Fundamental types for the quorum treasury.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account identifiers, asset identifiers, amount arithmetic, timestamps, entity
//! identifiers, governance parameters, and the error taxonomy.

pub mod account;
pub mod amount;
pub mod asset;
pub mod entity;
pub mod error;
pub mod ids;
pub mod params;
pub mod time;

pub use account::AccountId;
pub use amount::{apply_bps, apply_percent, mul_div, BPS_DENOMINATOR};
pub use asset::AssetId;
pub use entity::{EntityRef, SettlementKind};
pub use error::{ErrorKind, ParseAssetError};
pub use ids::{ActivityId, CampaignId, ProjectId, ProposalId, SaleId};
pub use params::GovernanceParams;
pub use time::Timestamp;
