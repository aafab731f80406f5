use crate::error::WalletError;
use quorum_governance::{Origin, ProposalEngine, ProposalParams};
use quorum_host::{AssetTransfer, Event};
use quorum_types::{AccountId, AssetId, ProposalId, Timestamp};
use tracing::info;

pub struct TreasuryWallet {
    treasury: AccountId,
    pending_events: Vec<Event>,
}

impl TreasuryWallet {
    pub fn new(treasury: AccountId) -> Self {
        Self {
            treasury,
            pending_events: Vec::new(),
        }
    }

    pub fn treasury(&self) -> &AccountId {
        &self.treasury
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn balance(&self, bank: &dyn AssetTransfer, asset: &AssetId) -> u128 {
        bank.balance_of(asset, &self.treasury)
    }

    /// Propose paying `amount` of `asset` to `to`. Committee members only.
    #[allow(clippy::too_many_arguments)]
    pub fn prepare_transfer(
        &mut self,
        gov: &mut ProposalEngine,
        caller: &AccountId,
        asset: AssetId,
        to: AccountId,
        amount: u128,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<ProposalId, WalletError> {
        gov.committee().ensure_member(caller)?;
        self.validate(&to, amount)?;
        let params = ProposalParams::TreasuryTransfer { asset, to, amount };
        Ok(gov.propose(caller, Origin::Wallet, duration_secs, params, now)?)
    }

    /// Execute an accepted transfer proposal. The balance is checked before
    /// the gate so a short treasury leaves the proposal executable later.
    #[allow(clippy::too_many_arguments)]
    pub fn execute_transfer(
        &mut self,
        gov: &mut ProposalEngine,
        bank: &mut dyn AssetTransfer,
        proposal: ProposalId,
        asset: AssetId,
        to: AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), WalletError> {
        self.validate(&to, amount)?;
        let available = self.balance(bank, &asset);
        if available < amount {
            return Err(WalletError::InsufficientBalance {
                asset,
                needed: amount,
                available,
            });
        }
        let params = ProposalParams::TreasuryTransfer {
            asset: asset.clone(),
            to: to.clone(),
            amount,
        };
        gov.gate(proposal, Origin::Wallet, &params, now)?;
        bank.transfer(&asset, &self.treasury, &to, amount)?;
        info!(%proposal, %asset, %to, amount, "treasury transfer executed");
        self.pending_events
            .push(Event::TreasuryTransfer { asset, to, amount });
        Ok(())
    }

    fn validate(&self, to: &AccountId, amount: u128) -> Result<(), WalletError> {
        if amount == 0 {
            return Err(WalletError::ZeroAmount);
        }
        if *to == self.treasury {
            return Err(WalletError::SelfTransfer(to.clone()));
        }
        Ok(())
    }
}
