//! Governance parameters.
//!
//! Every field can be overridden from configuration; the defaults describe a
//! small committee that settles proposals by simple majority once half of it
//! has voted.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Shortest allowed voting window in seconds.
    #[serde(default = "default_min_duration")]
    pub min_proposal_duration_secs: u64,

    /// Longest allowed voting window in seconds.
    #[serde(default = "default_max_duration")]
    pub max_proposal_duration_secs: u64,

    /// Fraction of the committee (basis points) that must vote before a
    /// committee proposal can be accepted or rejected by vote.
    #[serde(default = "default_committee_quorum")]
    pub committee_quorum_bps: u32,

    /// Fraction of total token weight (basis points) that must vote on a
    /// weighted proposal.
    #[serde(default = "default_full_quorum")]
    pub full_quorum_bps: u32,

    /// Percentage of a dev-class balance that counts toward voting weight.
    #[serde(default = "default_dev_ratio")]
    pub dev_ratio_percent: u32,

    /// Upper bound on committee size.
    #[serde(default = "default_max_committee")]
    pub max_committee_size: usize,
}

fn default_min_duration() -> u64 {
    60
}

fn default_max_duration() -> u64 {
    30 * 24 * 3600
}

fn default_committee_quorum() -> u32 {
    5_000
}

fn default_full_quorum() -> u32 {
    4_000
}

fn default_dev_ratio() -> u32 {
    100
}

fn default_max_committee() -> usize {
    32
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            min_proposal_duration_secs: default_min_duration(),
            max_proposal_duration_secs: default_max_duration(),
            committee_quorum_bps: default_committee_quorum(),
            full_quorum_bps: default_full_quorum(),
            dev_ratio_percent: default_dev_ratio(),
            max_committee_size: default_max_committee(),
        }
    }
}

impl GovernanceParams {
    /// Whether a voting window of `duration_secs` is allowed.
    pub fn duration_in_range(&self, duration_secs: u64) -> bool {
        duration_secs >= self.min_proposal_duration_secs
            && duration_secs <= self.max_proposal_duration_secs
    }
}
