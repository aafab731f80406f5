use quorum_governance::{ProposalEngine, ProposalParams};
use quorum_host::GovernanceToken;
use quorum_nullables::NullToken;
use quorum_rewards::{Activities, ActivityState, ActivityTerms, RewardError};
use quorum_types::{AccountId, ActivityId, ErrorKind, GovernanceParams, ProposalId, Timestamp};

const WEEK: u64 = 7 * 86_400;
const MEMBERS: [&str; 3] = ["alice", "bob", "carol"];

fn account(name: &str) -> AccountId {
    AccountId::new(name)
}

fn t(secs: u64) -> Timestamp {
    Timestamp::new(secs)
}

fn terms(budget: u128, reward: u128) -> ActivityTerms {
    ActivityTerms {
        budget,
        reward,
        start: t(0),
        end: t(0),
        description: "launch campaign".into(),
    }
}

struct Harness {
    gov: ProposalEngine,
    token: NullToken,
    activities: Activities,
}

impl Harness {
    fn new() -> Self {
        Self {
            gov: ProposalEngine::new(MEMBERS.map(account), GovernanceParams::default()).unwrap(),
            token: NullToken::new(1_000_000),
            activities: Activities::new(),
        }
    }

    fn approve(&mut self, proposal: ProposalId, params: &ProposalParams, now: u64) {
        for member in MEMBERS {
            self.gov
                .cast_vote(proposal, &account(member), true, params, t(now))
                .unwrap();
        }
    }

    /// Create and fund an activity led by paula.
    fn funded(&mut self, budget: u128, reward: u128) -> ActivityId {
        let (id, proposal) = self
            .activities
            .create_activity(&mut self.gov, &account("paula"), terms(budget, reward), WEEK, t(0))
            .unwrap();
        let params = ProposalParams::ActivityFunding {
            activity: id,
            principal: account("paula"),
            budget,
            reward,
        };
        self.approve(proposal, &params, 1);
        self.activities
            .pay(&mut self.gov, &mut self.token, id, t(2))
            .unwrap();
        id
    }

    fn released(&mut self, id: ActivityId, percent: u32) {
        let proposal = self
            .activities
            .evaluate(&mut self.gov, &account("paula"), id, percent, WEEK, t(10))
            .unwrap();
        let reward = self.activities.activity(id).unwrap().terms.reward;
        let params = ProposalParams::ActivityReward {
            activity: id,
            reward,
            percent,
        };
        self.approve(proposal, &params, 11);
        self.activities
            .take_reward(&mut self.gov, &mut self.token, id, t(12))
            .unwrap();
    }
}

fn contributors() -> Vec<AccountId> {
    ["paula", "quinn", "rhea", "sam", "tess", "uma"].map(account).to_vec()
}

#[test]
fn full_activity_lifecycle_pays_scaled_rewards() {
    let mut h = Harness::new();
    let id = h.funded(10_000, 100);
    assert_eq!(h.token.balance_of(&account("paula")), 10_000);
    assert_eq!(
        h.activities.activity(id).unwrap().state,
        ActivityState::ContributionsOpen
    );

    let first: Vec<_> = contributors().into_iter().map(|c| (c, 10)).collect();
    h.activities
        .update_contributions(&account("paula"), id, &first)
        .unwrap();
    let second: Vec<_> = contributors().into_iter().map(|c| (c, 20)).collect();
    h.activities
        .update_contributions(&account("paula"), id, &second)
        .unwrap();
    for who in contributors() {
        assert_eq!(h.activities.contribution_of(id, &who).unwrap(), 20);
    }

    h.released(id, 60);
    assert_eq!(
        h.activities.activity(id).unwrap().state,
        ActivityState::RewardsReleased
    );

    // floor(100 * 20 * 60 / 100 / 120)
    assert_eq!(
        h.activities
            .withdraw_rewards(&mut h.token, &account("paula"), &[id], t(20))
            .unwrap(),
        10
    );
    assert_eq!(h.token.balance_of(&account("paula")), 10_010);
    for who in contributors().iter().skip(1) {
        h.activities
            .withdraw_rewards(&mut h.token, who, &[id], t(20))
            .unwrap();
        assert_eq!(h.token.balance_of(who), 10);
    }

    let err = h
        .activities
        .withdraw_rewards(&mut h.token, &account("quinn"), &[id], t(21))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyWithdrawn);
    assert_eq!(h.token.balance_of(&account("quinn")), 10);
}

#[test]
fn non_contributor_withdraws_zero() {
    let mut h = Harness::new();
    let id = h.funded(0, 100);
    h.activities
        .update_contributions(&account("paula"), id, &[(account("quinn"), 1)])
        .unwrap();
    h.released(id, 100);
    let paid = h
        .activities
        .withdraw_rewards(&mut h.token, &account("vic"), &[id], t(20))
        .unwrap();
    assert_eq!(paid, 0);
    assert_eq!(h.token.balance_of(&account("vic")), 0);
}

#[test]
fn zero_budget_funding_moves_nothing() {
    let mut h = Harness::new();
    let id = h.funded(0, 100);
    assert_eq!(h.token.balance_of(&account("paula")), 0);
    assert_eq!(h.token.unreleased_supply(), 1_000_000);
    assert_eq!(
        h.activities.activity(id).unwrap().state,
        ActivityState::ContributionsOpen
    );
}

#[test]
fn pay_requires_accepted_funding() {
    let mut h = Harness::new();
    let (id, proposal) = h
        .activities
        .create_activity(&mut h.gov, &account("paula"), terms(500, 0), WEEK, t(0))
        .unwrap();
    let err = h.activities.pay(&mut h.gov, &mut h.token, id, t(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let params = ProposalParams::ActivityFunding {
        activity: id,
        principal: account("paula"),
        budget: 500,
        reward: 0,
    };
    for member in MEMBERS {
        h.gov.cast_vote(proposal, &account(member), false, &params, t(2)).unwrap();
    }
    let err = h.activities.pay(&mut h.gov, &mut h.token, id, t(3)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(h.token.balance_of(&account("paula")), 0);
}

#[test]
fn only_principal_manages_contributions_while_open() {
    let mut h = Harness::new();
    let id = h.funded(100, 100);
    let err = h
        .activities
        .update_contributions(&account("quinn"), id, &[(account("quinn"), 5)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    h.activities
        .evaluate(&mut h.gov, &account("paula"), id, 50, WEEK, t(5))
        .unwrap();
    let err = h
        .activities
        .update_contributions(&account("paula"), id, &[(account("quinn"), 5)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let err = h
        .activities
        .withdraw_rewards(&mut h.token, &account("quinn"), &[id], t(6))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn evaluation_above_full_pays_more_than_reward() {
    let mut h = Harness::new();
    let id = h.funded(0, 200);
    h.activities
        .update_contributions(
            &account("paula"),
            id,
            &[(account("quinn"), 20), (account("rhea"), 20), (account("sam"), 10)],
        )
        .unwrap();
    h.released(id, 120);
    assert_eq!(h.token.custody(), 240);

    // floor(200 * 20 * 120 / 100 / 50)
    for (who, expected) in [("quinn", 96), ("rhea", 96), ("sam", 48)] {
        let paid = h
            .activities
            .withdraw_rewards(&mut h.token, &account(who), &[id], t(20))
            .unwrap();
        assert_eq!(paid, expected);
        assert_eq!(h.token.balance_of(&account(who)), expected);
    }
}

#[test]
fn rejected_reward_proposal_allows_reevaluation() {
    let mut h = Harness::new();
    let id = h.funded(0, 1_000);
    h.activities
        .update_contributions(&account("paula"), id, &[(account("quinn"), 1)])
        .unwrap();
    let first = h
        .activities
        .evaluate(&mut h.gov, &account("paula"), id, 150, WEEK, t(10))
        .unwrap();

    let err = h
        .activities
        .evaluate(&mut h.gov, &account("paula"), id, 90, WEEK, t(11))
        .unwrap_err();
    assert!(matches!(err, RewardError::ProposalOutstanding { proposal, .. } if proposal == first));

    let params = ProposalParams::ActivityReward {
        activity: id,
        reward: 1_000,
        percent: 150,
    };
    for member in MEMBERS {
        h.gov.cast_vote(first, &account(member), false, &params, t(12)).unwrap();
    }
    let err = h
        .activities
        .take_reward(&mut h.gov, &mut h.token, id, t(13))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let second = h
        .activities
        .evaluate(&mut h.gov, &account("paula"), id, 90, WEEK, t(14))
        .unwrap();
    assert_ne!(first, second);
    assert_eq!(h.activities.activity(id).unwrap().reward_proposal, Some(second));
    let params = ProposalParams::ActivityReward {
        activity: id,
        reward: 1_000,
        percent: 90,
    };
    h.approve(second, &params, 15);
    let pool = h
        .activities
        .take_reward(&mut h.gov, &mut h.token, id, t(16))
        .unwrap();
    assert_eq!(pool, 900);
    let paid = h
        .activities
        .withdraw_rewards(&mut h.token, &account("quinn"), &[id], t(17))
        .unwrap();
    assert_eq!(paid, 900);
}

#[test]
fn reward_pool_is_set_aside_on_release() {
    let mut h = Harness::new();
    let id = h.funded(0, 1_000);
    h.activities
        .update_contributions(&account("paula"), id, &[(account("quinn"), 1), (account("rhea"), 2)])
        .unwrap();
    h.released(id, 50);
    assert_eq!(h.token.unreleased_supply(), 1_000_000 - 500);
    assert_eq!(h.token.custody(), 500);

    let quinn = h
        .activities
        .withdraw_rewards(&mut h.token, &account("quinn"), &[id], t(20))
        .unwrap();
    let rhea = h
        .activities
        .withdraw_rewards(&mut h.token, &account("rhea"), &[id], t(20))
        .unwrap();
    assert_eq!((quinn, rhea), (166, 333));
    assert_eq!(h.token.custody(), 1);
}

#[test]
fn batch_withdrawal_checks_every_activity_first() {
    let mut h = Harness::new();
    let done = h.funded(0, 100);
    h.activities
        .update_contributions(&account("paula"), done, &[(account("quinn"), 1)])
        .unwrap();
    h.released(done, 100);
    let open = h.funded(0, 100);

    let err = h
        .activities
        .withdraw_rewards(&mut h.token, &account("quinn"), &[done, open], t(20))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(h.token.balance_of(&account("quinn")), 0);

    let paid = h
        .activities
        .withdraw_rewards(&mut h.token, &account("quinn"), &[done, done], t(20))
        .unwrap();
    assert_eq!(paid, 100);
}
