use proptest::prelude::*;

use quorum_fundraising::{CampaignTerms, FundraisingEngine, PriceModel};
use quorum_governance::ProposalEngine;
use quorum_nullables::{NullBank, NullToken};
use quorum_types::{AccountId, AssetId, GovernanceParams, Timestamp};

fn investor(n: u8) -> AccountId {
    AccountId::new(format!("investor_{n}"))
}

fn started(price_model: PriceModel) -> (FundraisingEngine, NullBank, NullToken, quorum_types::CampaignId) {
    let members = ["alice", "bob"].map(AccountId::new);
    let mut gov = ProposalEngine::new(members.clone(), GovernanceParams::default()).unwrap();
    let mut engine = FundraisingEngine::new(AccountId::new("treasury"));
    let mut token = NullToken::new(1_000_000);
    let terms = CampaignTerms {
        price_model,
        asset: AssetId::Native,
        token_rate: 3,
        asset_rate: 2,
        start: Timestamp::new(100),
        end: Timestamp::new(200),
        goal: 1,
        min_per_investor: 0,
        max_per_investor: 0,
        whitelist_only: false,
        total_tokens: 9_000,
    };
    let (id, proposal) = engine
        .create_campaign(&mut gov, &members[0], terms, 3_600, Timestamp::new(0))
        .unwrap();
    let params = engine.campaign(id).unwrap().start_params();
    for member in &members {
        gov.cast_vote(proposal, member, true, &params, Timestamp::new(1)).unwrap();
    }
    engine.start_campaign(&mut gov, &mut token, id, Timestamp::new(2)).unwrap();

    let mut bank = NullBank::new();
    for n in 0..5 {
        bank.fund(&AssetId::Native, &investor(n), 1_000_000);
    }
    (engine, bank, token, id)
}

proptest! {
    /// Whatever mix of investments succeeds or fails, the ledger's sum of
    /// per-investor amounts equals the campaign raise, which never passes
    /// the cap.
    #[test]
    fn raise_matches_ledger_and_respects_cap(
        investments in prop::collection::vec((0u8..5, 1u128..2_500), 0..40),
    ) {
        let (mut engine, mut bank, _token, id) = started(PriceModel::Fixed);
        for (n, amount) in investments {
            let _ = engine.invest(&mut bank, id, &investor(n), amount, Timestamp::new(150));
            let campaign = engine.campaign(id).unwrap();
            prop_assert_eq!(engine.ledger_raised(id), campaign.raised);
            prop_assert!(campaign.raised <= 6_000);
        }
    }

    /// Floating-price claims never hand out more than the campaign supply.
    #[test]
    fn floating_claims_fit_supply(
        investments in prop::collection::vec((0u8..5, 1u128..10_000), 1..20),
    ) {
        let (mut engine, mut bank, _token, id) = started(PriceModel::Floating);
        for (n, amount) in investments {
            engine.invest(&mut bank, id, &investor(n), amount, Timestamp::new(150)).unwrap();
        }
        engine.finish_campaign(id, Timestamp::new(200)).unwrap();
        let owed: u128 = (0..5)
            .map(|n| engine.tokens_owed(id, &investor(n)).unwrap())
            .sum();
        prop_assert!(owed <= 9_000);
        prop_assert_eq!(owed + engine.unallocated_tokens(id).unwrap(), 9_000);
    }
}
