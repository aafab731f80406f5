//! Proposals and their tally rules.

use crate::committee::Committee;
use crate::fingerprint::Fingerprint;
use crate::params::ProposalParams;
use quorum_types::{AccountId, ProposalId, Timestamp, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The module that created a proposal and may consume it through the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    Committee,
    Fundraising,
    Activities,
    Projects,
    Lockup,
    Dividend,
    Wallet,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Committee => "committee",
            Self::Fundraising => "fundraising",
            Self::Activities => "activities",
            Self::Projects => "projects",
            Self::Lockup => "lockup",
            Self::Dividend => "dividend",
            Self::Wallet => "wallet",
        };
        f.write_str(name)
    }
}

/// Proposal lifecycle. Transitions are one-way:
/// `Pending -> {Accepted, Rejected, Expired}` and `Accepted -> Executed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    Pending,
    Accepted,
    Rejected,
    Expired,
    Executed,
}

impl ProposalState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Who may vote and how much each ballot weighs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalKind {
    /// One committee member, one vote.
    Committee,
    /// Token-weighted; any holder may vote. `eligible_weight` is the total
    /// supply weight when the proposal was created.
    Full { eligible_weight: u128 },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub origin: Origin,
    pub proposer: AccountId,
    pub kind: ProposalKind,
    pub params: ProposalParams,
    pub fingerprint: Fingerprint,
    pub state: ProposalState,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    /// Supporters and the weight each ballot carried.
    pub support: BTreeMap<AccountId, u128>,
    /// Rejecters and the weight each ballot carried.
    pub reject: BTreeMap<AccountId, u128>,
    pub support_weight: u128,
    pub reject_weight: u128,
    /// Minimum participation, in basis points of eligible weight.
    pub quorum_bps: u32,
}

/// Vote totals as seen at one point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tally {
    pub support: u128,
    pub reject: u128,
    /// Weight that has not voted yet and still could.
    pub outstanding: u128,
    pub eligible: u128,
}

impl Tally {
    pub fn participated(&self) -> u128 {
        self.support.saturating_add(self.reject)
    }

    fn reaches(&self, weight: u128, quorum_bps: u32) -> bool {
        match (
            weight.checked_mul(BPS_DENOMINATOR),
            self.eligible.checked_mul(u128::from(quorum_bps)),
        ) {
            (Some(have), Some(need)) => have >= need,
            _ => false,
        }
    }

    pub fn quorum_met(&self, quorum_bps: u32) -> bool {
        self.eligible > 0 && self.reaches(self.participated(), quorum_bps)
    }

    /// Whether quorum can still be met if every outstanding voter turns up.
    pub fn quorum_reachable(&self, quorum_bps: u32) -> bool {
        self.eligible > 0
            && self.reaches(self.participated().saturating_add(self.outstanding), quorum_bps)
    }
}

impl Proposal {
    /// Whether `params` are exactly the ones this proposal was created with.
    pub fn matches(&self, params: &ProposalParams) -> bool {
        self.params == *params
    }

    /// Whether ballots may still be cast at `now`.
    pub fn voting_open(&self, now: Timestamp) -> bool {
        self.state == ProposalState::Pending && now <= self.expires_at
    }

    /// Current totals. Committee ballots only count while the voter is
    /// still a member.
    pub fn tally(&self, committee: &Committee) -> Tally {
        match self.kind {
            ProposalKind::Committee => {
                let support = self.support.keys().filter(|v| committee.is_member(v)).count() as u128;
                let reject = self.reject.keys().filter(|v| committee.is_member(v)).count() as u128;
                let eligible = committee.len() as u128;
                Tally {
                    support,
                    reject,
                    outstanding: eligible.saturating_sub(support + reject),
                    eligible,
                }
            }
            ProposalKind::Full { eligible_weight } => Tally {
                support: self.support_weight,
                reject: self.reject_weight,
                outstanding: 0,
                eligible: eligible_weight,
            },
        }
    }

    /// The terminal state this proposal would settle into at `now`, or
    /// `None` while the outcome is still open.
    ///
    /// Before expiry a committee proposal settles as soon as the remaining
    /// members can no longer change the result. Weighted proposals settle
    /// only after expiry. After expiry, missing quorum means `Expired`;
    /// otherwise support must strictly exceed reject, so a tie rejects.
    pub fn outcome(&self, committee: &Committee, now: Timestamp) -> Option<ProposalState> {
        if self.state != ProposalState::Pending {
            return Some(self.state);
        }
        let tally = self.tally(committee);
        if now > self.expires_at {
            if !tally.quorum_met(self.quorum_bps) {
                return Some(ProposalState::Expired);
            }
            return Some(if tally.support > tally.reject {
                ProposalState::Accepted
            } else {
                ProposalState::Rejected
            });
        }
        if !matches!(self.kind, ProposalKind::Committee) {
            return None;
        }
        if tally.quorum_met(self.quorum_bps)
            && tally.support > tally.reject.saturating_add(tally.outstanding)
        {
            return Some(ProposalState::Accepted);
        }
        if tally.reject >= tally.support.saturating_add(tally.outstanding)
            || !tally.quorum_reachable(self.quorum_bps)
        {
            return Some(ProposalState::Rejected);
        }
        None
    }
}
