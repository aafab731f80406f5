use quorum_governance::{GovernanceError, ProposalEngine, ProposalParams, ProposalState};
use quorum_nullables::NullToken;
use quorum_types::{AccountId, ErrorKind, GovernanceParams, Timestamp};

const WEEK: u64 = 7 * 86_400;

fn account(name: &str) -> AccountId {
    AccountId::new(name)
}

fn three_member_engine() -> ProposalEngine {
    ProposalEngine::new(
        ["alice", "bob", "carol"].map(account),
        GovernanceParams::default(),
    )
    .unwrap()
}

#[test]
fn fourth_member_joins_only_after_acceptance_and_execution() {
    let mut engine = three_member_engine();
    let dave = account("dave");
    let now = Timestamp::new(1_000);
    let id = engine
        .propose_add_member(&account("alice"), &dave, WEEK, now)
        .unwrap();
    let params = ProposalParams::AddMember { member: dave.clone() };

    // Outsider ballots never reach the tally.
    let err = engine
        .cast_vote(id, &account("mallory"), true, &params, now)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    engine.cast_vote(id, &account("alice"), true, &params, now).unwrap();
    assert!(engine.add_member(id, &dave, now).is_err());
    assert!(!engine.is_member(&dave));

    engine.cast_vote(id, &account("bob"), true, &params, now).unwrap();
    engine.cast_vote(id, &account("carol"), true, &params, now).unwrap();
    assert!(!engine.is_member(&dave));

    engine.add_member(id, &dave, now).unwrap();
    assert!(engine.is_member(&dave));
    assert_eq!(engine.committee().len(), 4);
    assert_eq!(engine.state(id).unwrap(), ProposalState::Executed);
}

#[test]
fn accepted_add_cannot_be_replayed_for_another_account() {
    let mut engine = three_member_engine();
    let now = Timestamp::new(0);
    let dave = account("dave");
    let id = engine
        .propose_add_member(&account("bob"), &dave, WEEK, now)
        .unwrap();
    let params = ProposalParams::AddMember { member: dave.clone() };
    for voter in ["alice", "bob", "carol"] {
        engine.cast_vote(id, &account(voter), true, &params, now).unwrap();
    }

    let err = engine.add_member(id, &account("eve"), now).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FingerprintMismatch);
    assert!(!engine.is_member(&account("eve")));

    engine.add_member(id, &dave, now).unwrap();
    let err = engine.add_member(id, &dave, now).unwrap_err();
    assert!(matches!(err, GovernanceError::AlreadyMember(_)));
}

#[test]
fn only_members_open_membership_proposals() {
    let mut engine = three_member_engine();
    let err = engine
        .propose_add_member(&account("mallory"), &account("mallory"), WEEK, Timestamp::new(0))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn remove_member_after_majority() {
    let mut engine = three_member_engine();
    let now = Timestamp::new(0);
    let carol = account("carol");
    let id = engine
        .propose_remove_member(&account("alice"), &carol, WEEK, now)
        .unwrap();
    let params = ProposalParams::RemoveMember { member: carol.clone() };
    engine.cast_vote(id, &account("alice"), true, &params, now).unwrap();
    engine.cast_vote(id, &account("bob"), true, &params, now).unwrap();
    engine.remove_member(id, &carol, now).unwrap();
    assert!(!engine.is_member(&carol));
    assert_eq!(engine.committee().len(), 2);
}

#[test]
fn set_members_is_decided_by_holders() {
    let mut engine = three_member_engine();
    let mut token = NullToken::new(0);
    token.mint(&account("hana"), 70);
    token.mint(&account("ivan"), 30);
    let now = Timestamp::new(0);
    let next = vec![account("xavier"), account("yolanda")];

    let err = engine
        .propose_set_members(&account("hana"), &next, WEEK, &token, now)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let id = engine
        .propose_set_members(&account("alice"), &next, WEEK, &token, now)
        .unwrap();
    let params = ProposalParams::SetMembers { members: next.clone() };

    // Committee ballots do not apply to holder votes.
    let err = engine
        .cast_vote(id, &account("alice"), true, &params, now)
        .unwrap_err();
    assert!(matches!(err, GovernanceError::WrongKind(_)));

    engine
        .cast_weighted_vote(id, &account("hana"), true, &params, &token, now)
        .unwrap();
    engine
        .cast_weighted_vote(id, &account("ivan"), false, &params, &token, now)
        .unwrap();
    assert!(engine.set_members(id, &next, now).is_err());
    assert!(engine.is_member(&account("alice")));

    let after = Timestamp::new(WEEK + 1);
    engine.set_members(id, &next, after).unwrap();
    assert!(engine.is_member(&account("xavier")));
    assert!(!engine.is_member(&account("alice")));

    let err = engine
        .propose_set_members(&account("xavier"), &[], WEEK, &token, after)
        .unwrap_err();
    assert!(matches!(err, GovernanceError::EmptyCommittee));
}

#[test]
fn removed_member_ballot_stops_counting() {
    let mut engine = three_member_engine();
    let now = Timestamp::new(0);
    let topic = ProposalParams::Generic { topic: "grant".into(), values: vec![] };
    let pending = engine
        .propose(&account("alice"), quorum_governance::Origin::Committee, WEEK, topic.clone(), now)
        .unwrap();
    engine.cast_vote(pending, &account("carol"), true, &topic, now).unwrap();

    let carol = account("carol");
    let removal = engine
        .propose_remove_member(&account("alice"), &carol, WEEK, now)
        .unwrap();
    let params = ProposalParams::RemoveMember { member: carol.clone() };
    engine.cast_vote(removal, &account("alice"), true, &params, now).unwrap();
    engine.cast_vote(removal, &account("bob"), true, &params, now).unwrap();
    engine.remove_member(removal, &carol, now).unwrap();

    let tally = engine
        .proposal(pending)
        .unwrap()
        .tally(engine.committee());
    assert_eq!(tally.support, 0);
    assert_eq!(tally.outstanding, 2);
}

#[test]
fn upgrade_authorization_records_target() {
    let mut engine = three_member_engine();
    let mut token = NullToken::new(0);
    token.mint(&account("hana"), 10);
    token.mint_dev(&account("ivan"), 40);
    let now = Timestamp::new(0);
    let id = engine
        .propose_upgrade(&account("alice"), "fundraising", "v2-impl", WEEK, &token, now)
        .unwrap();
    let params = ProposalParams::Upgrade {
        component: "fundraising".into(),
        implementation: "v2-impl".into(),
    };
    engine
        .cast_weighted_vote(id, &account("hana"), true, &params, &token, now)
        .unwrap();
    engine
        .cast_weighted_vote(id, &account("ivan"), false, &params, &token, now)
        .unwrap();

    // Dev tokens count in full at the default ratio, so 10 against 40 rejects.
    let after = Timestamp::new(WEEK + 1);
    let err = engine
        .authorize_upgrade(id, "fundraising", "v2-impl", after)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(engine.state(id).unwrap(), ProposalState::Rejected);
    assert_eq!(engine.upgrade_target("fundraising"), None);

    let id = engine
        .propose_upgrade(&account("bob"), "fundraising", "v2-impl", WEEK, &token, after)
        .unwrap();
    engine
        .cast_weighted_vote(id, &account("ivan"), true, &params, &token, after)
        .unwrap();
    let later = Timestamp::new(2 * WEEK + 2);
    engine.authorize_upgrade(id, "fundraising", "v2-impl", later).unwrap();
    assert_eq!(engine.upgrade_target("fundraising"), Some("v2-impl"));
}

#[test]
fn dev_ratio_change_is_gated() {
    let mut engine = three_member_engine();
    let now = Timestamp::new(0);
    let id = engine.propose_dev_ratio(&account("bob"), 50, WEEK, now).unwrap();
    let params = ProposalParams::SetDevRatio { percent: 50 };
    engine.cast_vote(id, &account("alice"), true, &params, now).unwrap();
    engine.cast_vote(id, &account("bob"), true, &params, now).unwrap();
    engine.set_dev_ratio(id, 50, now).unwrap();
    assert_eq!(engine.committee().dev_ratio_percent(), 50);
}
