//! Proposal engine: creates proposals, records ballots, settles outcomes,
//! and gates execution of accepted proposals.

use crate::committee::Committee;
use crate::error::GovernanceError;
use crate::fingerprint::Fingerprint;
use crate::params::ProposalParams;
use crate::proposal::{Origin, Proposal, ProposalKind, ProposalState};
use quorum_host::{Event, WeightSource};
use quorum_types::{AccountId, GovernanceParams, ProposalId, Timestamp};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub struct ProposalEngine {
    pub(crate) committee: Committee,
    params: GovernanceParams,
    proposals: BTreeMap<ProposalId, Proposal>,
    next_id: ProposalId,
    /// Components and the implementation each was last authorized to run.
    pub(crate) upgrades: BTreeMap<String, String>,
    pub(crate) pending_events: Vec<Event>,
}

impl ProposalEngine {
    pub fn new(
        members: impl IntoIterator<Item = AccountId>,
        params: GovernanceParams,
    ) -> Result<Self, GovernanceError> {
        let committee = Committee::new(members, params.dev_ratio_percent, params.max_committee_size)?;
        Ok(Self {
            committee,
            params,
            proposals: BTreeMap::new(),
            next_id: ProposalId::FIRST,
            upgrades: BTreeMap::new(),
            pending_events: Vec::new(),
        })
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    pub fn committee(&self) -> &Committee {
        &self.committee
    }

    pub fn is_member(&self, who: &AccountId) -> bool {
        self.committee.is_member(who)
    }

    pub fn proposal(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    pub fn state(&self, id: ProposalId) -> Result<ProposalState, GovernanceError> {
        self.get(id).map(|p| p.state)
    }

    /// Take every observation buffered since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending_events)
    }

    /// Create a committee proposal binding `params`.
    ///
    /// Who may propose is decided by the calling module; the engine only
    /// records the proposer.
    pub fn propose(
        &mut self,
        proposer: &AccountId,
        origin: Origin,
        duration_secs: u64,
        params: ProposalParams,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        let quorum = self.params.committee_quorum_bps;
        self.insert(proposer, origin, ProposalKind::Committee, quorum, duration_secs, params, now)
    }

    /// Create a token-weighted proposal open to every holder.
    pub fn propose_full(
        &mut self,
        proposer: &AccountId,
        origin: Origin,
        duration_secs: u64,
        params: ProposalParams,
        weights: &dyn WeightSource,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        let eligible_weight = weights
            .total_balances()
            .weight(self.committee.dev_ratio_percent())
            .ok_or(GovernanceError::Overflow)?;
        let quorum = self.params.full_quorum_bps;
        self.insert(
            proposer,
            origin,
            ProposalKind::Full { eligible_weight },
            quorum,
            duration_secs,
            params,
            now,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn insert(
        &mut self,
        proposer: &AccountId,
        origin: Origin,
        kind: ProposalKind,
        quorum_bps: u32,
        duration_secs: u64,
        params: ProposalParams,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        self.check_duration(duration_secs)?;
        let expires_at = now
            .checked_add_secs(duration_secs)
            .ok_or(GovernanceError::Overflow)?;
        let fingerprint = Fingerprint::of(&params)?;
        let id = self.next_id;
        self.next_id = id.next().ok_or(GovernanceError::Overflow)?;

        info!(%id, %origin, kind = params.label(), %fingerprint, %expires_at, "proposal started");
        self.pending_events.push(Event::ProposalStarted {
            id,
            origin: origin.to_string(),
            fingerprint: fingerprint.to_string(),
            expires_at,
        });
        self.proposals.insert(
            id,
            Proposal {
                id,
                origin,
                proposer: proposer.clone(),
                kind,
                params,
                fingerprint,
                state: ProposalState::Pending,
                created_at: now,
                expires_at,
                support: BTreeMap::new(),
                reject: BTreeMap::new(),
                support_weight: 0,
                reject_weight: 0,
                quorum_bps,
            },
        );
        Ok(id)
    }

    /// Cast a one-member-one-vote ballot on a committee proposal.
    ///
    /// A later ballot from the same member replaces the earlier one.
    pub fn cast_vote(
        &mut self,
        id: ProposalId,
        voter: &AccountId,
        support: bool,
        params: &ProposalParams,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.committee.ensure_member(voter)?;
        let proposal = self.open_for_vote(id, params, now)?;
        if !matches!(proposal.kind, ProposalKind::Committee) {
            return Err(GovernanceError::WrongKind(id));
        }
        record_ballot(proposal, voter, support, 1)?;
        debug!(%id, %voter, support, "committee vote recorded");
        self.pending_events.push(Event::VoteCast {
            id,
            voter: voter.clone(),
            support,
            weight: 1,
        });
        Ok(())
    }

    /// Cast a ballot on a weighted proposal. The voter's weight is read from
    /// `weights` now, not when the proposal was created, so a re-vote picks
    /// up any balance change in between.
    pub fn cast_weighted_vote(
        &mut self,
        id: ProposalId,
        voter: &AccountId,
        support: bool,
        params: &ProposalParams,
        weights: &dyn WeightSource,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let weight = weights
            .balances(voter)
            .weight(self.committee.dev_ratio_percent())
            .ok_or(GovernanceError::Overflow)?;
        if weight == 0 {
            return Err(GovernanceError::NoVotingWeight(voter.clone()));
        }
        let proposal = self.open_for_vote(id, params, now)?;
        if !matches!(proposal.kind, ProposalKind::Full { .. }) {
            return Err(GovernanceError::WrongKind(id));
        }
        record_ballot(proposal, voter, support, weight)?;
        debug!(%id, %voter, support, weight, "weighted vote recorded");
        self.pending_events.push(Event::VoteCast {
            id,
            voter: voter.clone(),
            support,
            weight,
        });
        Ok(())
    }

    fn open_for_vote(
        &mut self,
        id: ProposalId,
        params: &ProposalParams,
        now: Timestamp,
    ) -> Result<&mut Proposal, GovernanceError> {
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))?;
        if proposal.state != ProposalState::Pending {
            return Err(GovernanceError::NotPending {
                id,
                state: proposal.state,
            });
        }
        if !proposal.voting_open(now) {
            return Err(GovernanceError::VotingClosed(id));
        }
        if !proposal.matches(params) {
            return Err(GovernanceError::FingerprintMismatch(id));
        }
        Ok(proposal)
    }

    /// Settle a proposal if its outcome is decided.
    ///
    /// Returns the state after settling; `Pending` means the outcome is still
    /// open. Once terminal, repeated calls return the same state and change
    /// nothing.
    pub fn finalize(
        &mut self,
        id: ProposalId,
        params: &ProposalParams,
        now: Timestamp,
    ) -> Result<ProposalState, GovernanceError> {
        let proposal = self.get(id)?;
        if !proposal.matches(params) {
            return Err(GovernanceError::FingerprintMismatch(id));
        }
        self.settle(id, now)
    }

    /// Authorize exactly one execution of an accepted proposal.
    ///
    /// Only the originating module may pass the gate, and only with the
    /// bound parameters. A still-pending proposal is settled first.
    pub fn gate(
        &mut self,
        id: ProposalId,
        origin: Origin,
        params: &ProposalParams,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let proposal = self.get(id)?;
        if proposal.origin != origin {
            return Err(GovernanceError::WrongOrigin {
                expected: proposal.origin,
                actual: origin,
            });
        }
        if !proposal.matches(params) {
            return Err(GovernanceError::FingerprintMismatch(id));
        }
        match self.settle(id, now)? {
            ProposalState::Accepted => {
                if let Some(proposal) = self.proposals.get_mut(&id) {
                    proposal.state = ProposalState::Executed;
                }
                info!(%id, %origin, kind = params.label(), "proposal executed");
                self.pending_events.push(Event::ProposalExecuted { id });
                Ok(())
            }
            ProposalState::Executed => Err(GovernanceError::AlreadyExecuted(id)),
            ProposalState::Expired => Err(GovernanceError::ProposalExpired(id)),
            state => Err(GovernanceError::NotAccepted { id, state }),
        }
    }

    fn settle(&mut self, id: ProposalId, now: Timestamp) -> Result<ProposalState, GovernanceError> {
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))?;
        if proposal.state.is_terminal() {
            return Ok(proposal.state);
        }
        let Some(outcome) = proposal.outcome(&self.committee, now) else {
            return Ok(ProposalState::Pending);
        };
        proposal.state = outcome;
        let event = match outcome {
            ProposalState::Accepted => Event::ProposalAccepted { id },
            ProposalState::Rejected => Event::ProposalRejected { id },
            _ => Event::ProposalExpired { id },
        };
        info!(%id, state = ?outcome, "proposal settled");
        self.pending_events.push(event);
        Ok(outcome)
    }

    fn get(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    /// Validate a duration against the configured bounds without creating
    /// anything.
    pub fn check_duration(&self, duration_secs: u64) -> Result<(), GovernanceError> {
        if self.params.duration_in_range(duration_secs) {
            Ok(())
        } else {
            Err(GovernanceError::DurationOutOfRange {
                duration: duration_secs,
                min: self.params.min_proposal_duration_secs,
                max: self.params.max_proposal_duration_secs,
            })
        }
    }
}

/// Put `voter` in the support or reject set with `weight`, moving any
/// earlier ballot so the voter appears in at most one set.
fn record_ballot(
    proposal: &mut Proposal,
    voter: &AccountId,
    support: bool,
    weight: u128,
) -> Result<(), GovernanceError> {
    if let Some(previous) = proposal.support.remove(voter) {
        proposal.support_weight = proposal
            .support_weight
            .checked_sub(previous)
            .ok_or(GovernanceError::Overflow)?;
    }
    if let Some(previous) = proposal.reject.remove(voter) {
        proposal.reject_weight = proposal
            .reject_weight
            .checked_sub(previous)
            .ok_or(GovernanceError::Overflow)?;
    }
    let (set, total) = if support {
        (&mut proposal.support, &mut proposal.support_weight)
    } else {
        (&mut proposal.reject, &mut proposal.reject_weight)
    };
    *total = total.checked_add(weight).ok_or(GovernanceError::Overflow)?;
    set.insert(voter.clone(), weight);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_nullables::NullToken;
    use quorum_types::ErrorKind;

    const DAY: u64 = 86_400;

    fn member(n: u8) -> AccountId {
        AccountId::new(format!("member_{n}"))
    }

    fn make_engine(size: u8) -> ProposalEngine {
        ProposalEngine::new((1..=size).map(member), GovernanceParams::default()).unwrap()
    }

    fn resolution() -> ProposalParams {
        ProposalParams::Generic {
            topic: "budget".into(),
            values: vec!["q3".into()],
        }
    }

    fn t(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn open(engine: &mut ProposalEngine) -> ProposalId {
        engine
            .propose(&member(1), Origin::Committee, 7 * DAY, resolution(), t(0))
            .unwrap()
    }

    fn vote_all(engine: &mut ProposalEngine, id: ProposalId, ballots: &[bool]) {
        for (i, support) in ballots.iter().enumerate() {
            engine
                .cast_vote(id, &member(i as u8 + 1), *support, &resolution(), t(10))
                .unwrap();
        }
    }

    #[test]
    fn unanimous_support_accepts() {
        let mut engine = make_engine(5);
        let id = open(&mut engine);
        vote_all(&mut engine, id, &[true; 5]);
        assert_eq!(engine.finalize(id, &resolution(), t(20)).unwrap(), ProposalState::Accepted);
    }

    #[test]
    fn unanimous_reject_rejects() {
        let mut engine = make_engine(5);
        let id = open(&mut engine);
        vote_all(&mut engine, id, &[false; 5]);
        assert_eq!(engine.finalize(id, &resolution(), t(20)).unwrap(), ProposalState::Rejected);
    }

    #[test]
    fn three_rejects_beat_two_supports() {
        let mut engine = make_engine(5);
        let id = open(&mut engine);
        vote_all(&mut engine, id, &[true, true, false, false, false]);
        assert_eq!(engine.finalize(id, &resolution(), t(20)).unwrap(), ProposalState::Rejected);
    }

    #[test]
    fn three_supports_beat_two_rejects() {
        let mut engine = make_engine(5);
        let id = open(&mut engine);
        vote_all(&mut engine, id, &[true, true, true, false, false]);
        assert_eq!(engine.finalize(id, &resolution(), t(20)).unwrap(), ProposalState::Accepted);
    }

    #[test]
    fn undecided_proposal_stays_pending() {
        let mut engine = make_engine(5);
        let id = open(&mut engine);
        vote_all(&mut engine, id, &[true, true]);
        assert_eq!(engine.finalize(id, &resolution(), t(20)).unwrap(), ProposalState::Pending);
        assert!(engine.drain_events().iter().all(|e| !matches!(e, Event::ProposalAccepted { .. })));
    }

    #[test]
    fn no_votes_expires() {
        let mut engine = make_engine(5);
        let id = open(&mut engine);
        let after = t(7 * DAY + 1);
        assert_eq!(engine.finalize(id, &resolution(), after).unwrap(), ProposalState::Expired);
    }

    #[test]
    fn tie_after_expiry_rejects() {
        let mut engine = make_engine(4);
        let id = open(&mut engine);
        vote_all(&mut engine, id, &[true, false]);
        let after = t(7 * DAY + 1);
        assert_eq!(engine.finalize(id, &resolution(), after).unwrap(), ProposalState::Rejected);
    }

    #[test]
    fn majority_of_quorum_after_expiry_accepts() {
        let mut engine = make_engine(4);
        let id = open(&mut engine);
        vote_all(&mut engine, id, &[true, true]);
        assert_eq!(engine.finalize(id, &resolution(), t(20)).unwrap(), ProposalState::Pending);
        let after = t(7 * DAY + 1);
        assert_eq!(engine.finalize(id, &resolution(), after).unwrap(), ProposalState::Accepted);
    }

    #[test]
    fn non_member_vote_is_rejected_and_not_counted() {
        let mut engine = make_engine(5);
        let id = open(&mut engine);
        let err = engine
            .cast_vote(id, &AccountId::new("outsider"), true, &resolution(), t(10))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(engine.proposal(id).unwrap().support.is_empty());
        assert_eq!(engine.finalize(id, &resolution(), t(20)).unwrap(), ProposalState::Pending);
    }

    #[test]
    fn vote_after_expiry_must_finalize() {
        let mut engine = make_engine(3);
        let id = open(&mut engine);
        let err = engine
            .cast_vote(id, &member(1), true, &resolution(), t(7 * DAY + 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Expired);
    }

    #[test]
    fn revote_moves_ballot_between_sets() {
        let mut engine = make_engine(3);
        let id = open(&mut engine);
        engine.cast_vote(id, &member(1), true, &resolution(), t(1)).unwrap();
        engine.cast_vote(id, &member(1), false, &resolution(), t(2)).unwrap();
        engine.cast_vote(id, &member(1), false, &resolution(), t(3)).unwrap();
        let proposal = engine.proposal(id).unwrap();
        assert!(proposal.support.is_empty());
        assert_eq!(proposal.reject.len(), 1);
        assert_eq!(proposal.reject_weight, 1);
        assert_eq!(proposal.support_weight, 0);
    }

    #[test]
    fn vote_with_wrong_params_is_fingerprint_mismatch() {
        let mut engine = make_engine(3);
        let id = open(&mut engine);
        let other = ProposalParams::Generic {
            topic: "budget".into(),
            values: vec!["q4".into()],
        };
        let err = engine.cast_vote(id, &member(1), true, &other, t(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FingerprintMismatch);
        let err = engine.finalize(id, &other, t(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FingerprintMismatch);
    }

    #[test]
    fn finalize_is_idempotent_once_terminal() {
        let mut engine = make_engine(3);
        let id = open(&mut engine);
        vote_all(&mut engine, id, &[true, true, true]);
        assert_eq!(engine.finalize(id, &resolution(), t(20)).unwrap(), ProposalState::Accepted);
        engine.drain_events();
        assert_eq!(engine.finalize(id, &resolution(), t(30)).unwrap(), ProposalState::Accepted);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn gate_consumes_acceptance_once() {
        let mut engine = make_engine(3);
        let id = open(&mut engine);
        vote_all(&mut engine, id, &[true, true, true]);
        engine.gate(id, Origin::Committee, &resolution(), t(20)).unwrap();
        assert_eq!(engine.state(id).unwrap(), ProposalState::Executed);
        let err = engine.gate(id, Origin::Committee, &resolution(), t(21)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExecuted);
    }

    #[test]
    fn gate_rejects_other_origin() {
        let mut engine = make_engine(3);
        let id = open(&mut engine);
        vote_all(&mut engine, id, &[true, true, true]);
        let err = engine.gate(id, Origin::Wallet, &resolution(), t(20)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(engine.state(id).unwrap(), ProposalState::Pending);
    }

    #[test]
    fn gate_on_pending_or_expired_fails() {
        let mut engine = make_engine(3);
        let id = open(&mut engine);
        let err = engine.gate(id, Origin::Committee, &resolution(), t(20)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        let err = engine
            .gate(id, Origin::Committee, &resolution(), t(7 * DAY + 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Expired);
    }

    #[test]
    fn duration_outside_bounds_rejected() {
        let mut engine = make_engine(3);
        let err = engine
            .propose(&member(1), Origin::Committee, 1, resolution(), t(0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);
        let err = engine
            .propose(&member(1), Origin::Committee, 365 * DAY, resolution(), t(0))
            .unwrap_err();
        assert!(matches!(err, GovernanceError::DurationOutOfRange { .. }));
    }

    #[test]
    fn weighted_vote_uses_weight_at_vote_time() {
        let mut engine = make_engine(3);
        let mut token = NullToken::new(0);
        let holder = AccountId::new("holder");
        let other = AccountId::new("other");
        token.mint(&holder, 60);
        token.mint_dev(&holder, 20);
        token.mint(&other, 100);

        let id = engine
            .propose_full(&member(1), Origin::Committee, 7 * DAY, resolution(), &token, t(0))
            .unwrap();
        assert_eq!(
            engine.proposal(id).unwrap().kind,
            ProposalKind::Full { eligible_weight: 180 }
        );

        engine
            .cast_weighted_vote(id, &holder, true, &resolution(), &token, t(1))
            .unwrap();
        assert_eq!(engine.proposal(id).unwrap().support_weight, 80);

        token.mint(&holder, 40);
        engine
            .cast_weighted_vote(id, &holder, true, &resolution(), &token, t(2))
            .unwrap();
        assert_eq!(engine.proposal(id).unwrap().support_weight, 120);

        engine
            .cast_weighted_vote(id, &other, false, &resolution(), &token, t(3))
            .unwrap();

        // Weighted proposals only settle once the window closes.
        assert_eq!(engine.finalize(id, &resolution(), t(4)).unwrap(), ProposalState::Pending);
        assert_eq!(
            engine.finalize(id, &resolution(), t(7 * DAY + 1)).unwrap(),
            ProposalState::Accepted
        );
    }

    #[test]
    fn weighted_vote_needs_weight_and_right_path() {
        let mut engine = make_engine(3);
        let token = NullToken::new(0);
        let id = engine
            .propose_full(&member(1), Origin::Committee, 7 * DAY, resolution(), &token, t(0))
            .unwrap();
        let err = engine
            .cast_weighted_vote(id, &AccountId::new("nobody"), true, &resolution(), &token, t(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let err = engine.cast_vote(id, &member(1), true, &resolution(), t(1)).unwrap_err();
        assert!(matches!(err, GovernanceError::WrongKind(_)));
    }

    #[test]
    fn proposal_ids_are_monotonic_and_events_buffered() {
        let mut engine = make_engine(3);
        let first = open(&mut engine);
        let second = open(&mut engine);
        assert!(second > first);
        let events = engine.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::ProposalStarted { id, .. } if id == first));
    }
}
