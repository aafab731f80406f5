//! Contribution rewards for the quorum treasury.
//!
//! Work is tracked per unit (a marketing [`Activity`] or a development
//! [`Project`]). The unit's owner records contributor weights in a
//! [`ContributionBook`]; once the committee accepts the evaluation, each
//! contributor withdraws `floor(pool * weight * percent / 100 / total_weight)`
//! exactly once. The rounding remainder stays unreleased.

pub mod activity;
pub mod contribution;
pub mod error;
pub mod project;

pub use activity::{Activities, Activity, ActivityState, ActivityTerms};
pub use contribution::ContributionBook;
pub use error::RewardError;
pub use project::{Grade, Project, ProjectState, ProjectTerms, Projects};
