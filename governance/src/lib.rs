//! Committee governance for the quorum treasury.
//!
//! Sensitive actions in every module go through a proposal: the module binds
//! the exact action parameters into a [`ProposalParams`] payload, committee
//! members (or token holders, for weighted proposals) vote, and once the
//! proposal settles as accepted the module re-submits the same payload to
//! [`ProposalEngine::gate`], which authorizes exactly one execution.
//!
//! Membership itself changes only through accepted proposals of the
//! dedicated membership kinds.

pub mod committee;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod membership;
pub mod params;
pub mod proposal;

pub use committee::Committee;
pub use engine::ProposalEngine;
pub use error::GovernanceError;
pub use fingerprint::Fingerprint;
pub use params::ProposalParams;
pub use proposal::{Origin, Proposal, ProposalKind, ProposalState, Tally};
