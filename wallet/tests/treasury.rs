use quorum_governance::{ProposalEngine, ProposalParams};
use quorum_host::{AssetTransfer, Event};
use quorum_nullables::NullBank;
use quorum_types::{AccountId, AssetId, ErrorKind, GovernanceParams, ProposalId, Timestamp};
use quorum_wallet::{TreasuryWallet, WalletError};

const MEMBERS: [&str; 3] = ["alice", "bob", "carol"];
const HOUR: u64 = 3_600;

fn account(name: &str) -> AccountId {
    AccountId::new(name)
}

fn usd() -> AssetId {
    AssetId::token("usd")
}

fn setup() -> (ProposalEngine, NullBank, TreasuryWallet) {
    let gov = ProposalEngine::new(MEMBERS.map(account), GovernanceParams::default()).unwrap();
    let mut bank = NullBank::new();
    bank.fund(&usd(), &account("treasury"), 1_000);
    (gov, bank, TreasuryWallet::new(account("treasury")))
}

fn vote_all(gov: &mut ProposalEngine, proposal: ProposalId, params: &ProposalParams, support: bool) {
    for member in MEMBERS {
        gov.cast_vote(proposal, &account(member), support, params, Timestamp::new(0))
            .unwrap();
    }
}

#[test]
fn approved_transfer_executes_once() {
    let (mut gov, mut bank, mut wallet) = setup();
    let proposal = wallet
        .prepare_transfer(&mut gov, &account("alice"), usd(), account("vendor"), 400, HOUR, Timestamp::new(0))
        .unwrap();
    let params = ProposalParams::TreasuryTransfer {
        asset: usd(),
        to: account("vendor"),
        amount: 400,
    };
    vote_all(&mut gov, proposal, &params, true);

    wallet
        .execute_transfer(&mut gov, &mut bank, proposal, usd(), account("vendor"), 400, Timestamp::new(1))
        .unwrap();
    assert_eq!(wallet.balance(&bank, &usd()), 600);
    assert_eq!(bank.balance_of(&usd(), &account("vendor")), 400);
    assert_eq!(
        wallet.drain_events(),
        vec![Event::TreasuryTransfer {
            asset: usd(),
            to: account("vendor"),
            amount: 400,
        }]
    );

    let err = wallet
        .execute_transfer(&mut gov, &mut bank, proposal, usd(), account("vendor"), 400, Timestamp::new(2))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExecuted);
    assert_eq!(wallet.balance(&bank, &usd()), 600);
}

#[test]
fn transfer_parameters_are_bound() {
    let (mut gov, mut bank, mut wallet) = setup();
    let proposal = wallet
        .prepare_transfer(&mut gov, &account("bob"), usd(), account("vendor"), 400, HOUR, Timestamp::new(0))
        .unwrap();
    let params = ProposalParams::TreasuryTransfer {
        asset: usd(),
        to: account("vendor"),
        amount: 400,
    };
    vote_all(&mut gov, proposal, &params, true);

    let err = wallet
        .execute_transfer(&mut gov, &mut bank, proposal, usd(), account("mallory"), 400, Timestamp::new(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FingerprintMismatch);
    let err = wallet
        .execute_transfer(&mut gov, &mut bank, proposal, AssetId::Native, account("vendor"), 400, Timestamp::new(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    assert_eq!(wallet.balance(&bank, &usd()), 1_000);
}

#[test]
fn rejected_transfer_cannot_execute() {
    let (mut gov, mut bank, mut wallet) = setup();
    let proposal = wallet
        .prepare_transfer(&mut gov, &account("carol"), usd(), account("vendor"), 10, HOUR, Timestamp::new(0))
        .unwrap();
    let params = ProposalParams::TreasuryTransfer {
        asset: usd(),
        to: account("vendor"),
        amount: 10,
    };
    vote_all(&mut gov, proposal, &params, false);
    let err = wallet
        .execute_transfer(&mut gov, &mut bank, proposal, usd(), account("vendor"), 10, Timestamp::new(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn short_treasury_keeps_proposal_executable() {
    let (mut gov, mut bank, mut wallet) = setup();
    let proposal = wallet
        .prepare_transfer(&mut gov, &account("alice"), usd(), account("vendor"), 1_500, HOUR, Timestamp::new(0))
        .unwrap();
    let params = ProposalParams::TreasuryTransfer {
        asset: usd(),
        to: account("vendor"),
        amount: 1_500,
    };
    vote_all(&mut gov, proposal, &params, true);

    let err = wallet
        .execute_transfer(&mut gov, &mut bank, proposal, usd(), account("vendor"), 1_500, Timestamp::new(1))
        .unwrap_err();
    assert!(matches!(err, WalletError::InsufficientBalance { needed: 1_500, available: 1_000, .. }));

    bank.fund(&usd(), &account("treasury"), 500);
    wallet
        .execute_transfer(&mut gov, &mut bank, proposal, usd(), account("vendor"), 1_500, Timestamp::new(2))
        .unwrap();
    assert_eq!(wallet.balance(&bank, &usd()), 0);
}

#[test]
fn only_members_propose_valid_transfers() {
    let (mut gov, _, mut wallet) = setup();
    let err = wallet
        .prepare_transfer(&mut gov, &account("vendor"), usd(), account("vendor"), 10, HOUR, Timestamp::new(0))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let err = wallet
        .prepare_transfer(&mut gov, &account("alice"), usd(), account("vendor"), 0, HOUR, Timestamp::new(0))
        .unwrap_err();
    assert!(matches!(err, WalletError::ZeroAmount));

    let err = wallet
        .prepare_transfer(&mut gov, &account("alice"), usd(), account("treasury"), 10, HOUR, Timestamp::new(0))
        .unwrap_err();
    assert!(matches!(err, WalletError::SelfTransfer(_)));
}
