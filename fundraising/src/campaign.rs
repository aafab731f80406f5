//! Investment campaigns: terms, state machine, and per-investor limits.

use crate::error::FundraisingError;
use quorum_governance::ProposalParams;
use quorum_types::{mul_div, AccountId, AssetId, CampaignId, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How tokens owed to an investor are computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceModel {
    /// `invested * token_rate / asset_rate`; the raise is capped by the
    /// token supply at that rate.
    Fixed,
    /// `total_tokens * invested / raised`; the whole supply is split
    /// pro-rata among investors.
    Floating,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignTerms {
    pub price_model: PriceModel,
    /// Asset investors pay with.
    pub asset: AssetId,
    pub token_rate: u128,
    pub asset_rate: u128,
    pub start: Timestamp,
    pub end: Timestamp,
    pub goal: u128,
    /// Default cumulative minimum per investor.
    pub min_per_investor: u128,
    /// Default cumulative maximum per investor; zero means unlimited.
    pub max_per_investor: u128,
    pub whitelist_only: bool,
    /// Tokens reserved for the campaign.
    pub total_tokens: u128,
}

impl CampaignTerms {
    pub fn validate(&self) -> Result<(), FundraisingError> {
        if self.token_rate == 0 || self.asset_rate == 0 {
            return Err(FundraisingError::InvalidTerms("exchange rates must be non-zero"));
        }
        if self.total_tokens == 0 {
            return Err(FundraisingError::InvalidTerms("token amount must be non-zero"));
        }
        if self.start >= self.end {
            return Err(FundraisingError::InvalidTerms("start must precede end"));
        }
        if self.max_per_investor != 0 && self.min_per_investor > self.max_per_investor {
            return Err(FundraisingError::InvalidTerms("minimum exceeds maximum"));
        }
        if let Some(cap) = self.raise_cap()? {
            if self.goal > cap {
                return Err(FundraisingError::InvalidTerms("goal exceeds raise cap"));
            }
        }
        Ok(())
    }

    /// Most asset a fixed-price campaign can take in, `None` for floating.
    pub fn raise_cap(&self) -> Result<Option<u128>, FundraisingError> {
        match self.price_model {
            PriceModel::Fixed => mul_div(self.total_tokens, self.asset_rate, self.token_rate)
                .map(Some)
                .ok_or(FundraisingError::Overflow),
            PriceModel::Floating => Ok(None),
        }
    }

    /// Tokens owed for `invested` when the campaign raised `raised` overall.
    pub fn tokens_for(&self, invested: u128, raised: u128) -> Result<u128, FundraisingError> {
        let owed = match self.price_model {
            PriceModel::Fixed => mul_div(invested, self.token_rate, self.asset_rate),
            PriceModel::Floating if raised == 0 => Some(0),
            PriceModel::Floating => mul_div(self.total_tokens, invested, raised),
        };
        owed.ok_or(FundraisingError::Overflow)
    }
}

/// `Prepared -> Active -> {Finished, Failed, Aborted}`. Terminal states are
/// final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignState {
    Prepared,
    Active,
    Finished,
    Failed,
    /// Cancelled by an accepted abort proposal. `refundable` selects the
    /// refund path; otherwise the campaign settles as it stands.
    Aborted { refundable: bool },
}

impl CampaignState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Aborted { .. })
    }

    /// Investors claim tokens and the raise can be swept.
    pub fn is_claim_path(&self) -> bool {
        matches!(self, Self::Finished | Self::Aborted { refundable: false })
    }

    /// Investors get their asset back; no token is handed out.
    pub fn is_refund_path(&self) -> bool {
        matches!(self, Self::Failed | Self::Aborted { refundable: true })
    }
}

/// Per-investor override of the default limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistEntry {
    pub min: u128,
    /// Zero falls back to the campaign default.
    pub max: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorInfo {
    pub min: u128,
    pub max: u128,
    pub invested: u128,
    pub tokens_withdrawn: bool,
    pub refunded: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub creator: AccountId,
    pub terms: CampaignTerms,
    pub state: CampaignState,
    pub start_proposal: ProposalId,
    pub raised: u128,
    /// Whether `total_tokens` were moved into custody when the campaign started.
    pub tokens_reserved: bool,
    pub whitelist: BTreeMap<AccountId, WhitelistEntry>,
}

impl Campaign {
    /// The payload the start proposal binds.
    pub fn start_params(&self) -> ProposalParams {
        ProposalParams::StartCampaign {
            campaign: self.id,
            creator: self.creator.clone(),
            asset: self.terms.asset.clone(),
            total_tokens: self.terms.total_tokens,
            goal: self.terms.goal,
            start: self.terms.start,
            end: self.terms.end,
        }
    }

    /// Effective `(min, max)` for `investor`; a max of zero means unlimited.
    pub fn limits_for(&self, investor: &AccountId) -> (u128, u128) {
        match self.whitelist.get(investor) {
            Some(entry) => {
                let max = if entry.max == 0 {
                    self.terms.max_per_investor
                } else {
                    entry.max
                };
                (entry.min, max)
            }
            None => (self.terms.min_per_investor, self.terms.max_per_investor),
        }
    }

    pub fn ensure_state(&self, ok: bool, expected: &'static str) -> Result<(), FundraisingError> {
        if ok {
            Ok(())
        } else {
            Err(FundraisingError::WrongState {
                id: self.id,
                state: self.state,
                expected,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_terms() -> CampaignTerms {
        CampaignTerms {
            price_model: PriceModel::Fixed,
            asset: AssetId::Native,
            token_rate: 2,
            asset_rate: 1,
            start: Timestamp::new(100),
            end: Timestamp::new(200),
            goal: 10_000,
            min_per_investor: 0,
            max_per_investor: 0,
            whitelist_only: false,
            total_tokens: 20_000,
        }
    }

    #[test]
    fn fixed_cap_follows_rate() {
        assert_eq!(fixed_terms().raise_cap().unwrap(), Some(10_000));
    }

    #[test]
    fn goal_above_cap_is_invalid() {
        let mut terms = fixed_terms();
        terms.goal = 10_001;
        assert!(matches!(terms.validate(), Err(FundraisingError::InvalidTerms(_))));
    }

    #[test]
    fn zero_rate_is_invalid() {
        let mut terms = fixed_terms();
        terms.asset_rate = 0;
        assert!(terms.validate().is_err());
    }

    #[test]
    fn floating_split_is_pro_rata() {
        let mut terms = fixed_terms();
        terms.price_model = PriceModel::Floating;
        assert_eq!(terms.tokens_for(1_000, 4_000).unwrap(), 5_000);
        assert_eq!(terms.tokens_for(0, 0).unwrap(), 0);
    }

    #[test]
    fn paths_are_exclusive() {
        for state in [
            CampaignState::Finished,
            CampaignState::Failed,
            CampaignState::Aborted { refundable: true },
            CampaignState::Aborted { refundable: false },
        ] {
            assert!(state.is_claim_path() != state.is_refund_path());
        }
        assert!(!CampaignState::Active.is_claim_path());
        assert!(!CampaignState::Active.is_refund_path());
    }
}
