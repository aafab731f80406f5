//! The assembled treasury.

use crate::config::DaoConfig;
use crate::error::DaoError;
use quorum_fundraising::{FundraisingEngine, TieredSales};
use quorum_governance::{ProposalEngine, ProposalParams};
use quorum_host::{AssetTransfer, Clock, Event, EventSink, GovernanceToken};
use quorum_rewards::{Activities, ProjectState, Projects};
use quorum_types::{AccountId, ProjectId, ProposalId, Timestamp};
use quorum_utils::format_duration;
use quorum_vesting::{DividendPool, Lockup};
use quorum_wallet::TreasuryWallet;
use tracing::{debug, info, warn};

/// Host collaborators the treasury runs against.
pub struct Host {
    pub clock: Box<dyn Clock>,
    pub bank: Box<dyn AssetTransfer>,
    pub token: Box<dyn GovernanceToken>,
    pub sink: Box<dyn EventSink>,
}

/// Every module wired to one proposal engine.
///
/// Module operations take the engine and host collaborators explicitly, so
/// callers reach them through the public fields. Cross-module hooks live
/// here as methods.
pub struct Dao {
    config: DaoConfig,
    pub host: Host,
    pub governance: ProposalEngine,
    pub fundraising: FundraisingEngine,
    pub sales: TieredSales,
    pub activities: Activities,
    pub projects: Projects,
    pub lockup: Lockup,
    pub dividends: DividendPool,
    pub wallet: TreasuryWallet,
    /// Drained events the sink has not accepted yet.
    outbox: Vec<Event>,
}

impl Dao {
    pub fn new(config: DaoConfig, host: Host) -> Result<Self, DaoError> {
        config.validate()?;
        let governance =
            ProposalEngine::new(config.committee.iter().cloned(), config.governance.clone())?;
        let treasury = config.treasury_account.clone();
        let dao = Self {
            host,
            governance,
            fundraising: FundraisingEngine::new(treasury.clone()),
            sales: TieredSales::new(config.dao_token()?),
            activities: Activities::new(),
            projects: Projects::new(),
            lockup: Lockup::new(config.release_duration_secs)?,
            dividends: DividendPool::new(),
            wallet: TreasuryWallet::new(treasury),
            outbox: Vec::new(),
            config,
        };
        info!(
            members = dao.config.committee.len(),
            treasury = %dao.config.treasury_account,
            release = %format_duration(dao.config.release_duration_secs),
            "treasury assembled"
        );
        Ok(dao)
    }

    pub fn config(&self) -> &DaoConfig {
        &self.config
    }

    pub fn now(&self) -> Timestamp {
        self.host.clock.now()
    }

    /// Forward every buffered event to the sink, module by module.
    ///
    /// Returns how many events were written. If the sink fails, the
    /// unwritten events are kept and go out first on the next flush.
    pub fn flush_events(&mut self) -> Result<usize, DaoError> {
        let batches = [
            self.governance.drain_events(),
            self.fundraising.drain_events(),
            self.sales.drain_events(),
            self.activities.drain_events(),
            self.projects.drain_events(),
            self.lockup.drain_events(),
            self.dividends.drain_events(),
            self.wallet.drain_events(),
        ];
        self.outbox.extend(batches.into_iter().flatten());

        let mut written = 0;
        let result = self
            .outbox
            .iter()
            .try_for_each(|event| {
                self.host.sink.emit(event)?;
                written += 1;
                Ok::<_, DaoError>(())
            });
        self.outbox.drain(..written);
        if let Err(e) = &result {
            warn!(written, pending = self.outbox.len(), error = %e, "event flush interrupted");
        } else {
            debug!(written, "events flushed");
        }
        result.map(|()| written)
    }

    /// Promote a project; finishing the configured release project starts
    /// the linear release of self-locked tokens.
    pub fn promote_project(
        &mut self,
        caller: &AccountId,
        id: ProjectId,
    ) -> Result<ProjectState, DaoError> {
        let now = self.now();
        let state = self.projects.promote_project(
            &mut self.governance,
            self.host.token.as_mut(),
            caller,
            id,
            now,
        )?;
        if state == ProjectState::Finished
            && self.is_release_project(id)?
            && self.lockup.schedule().started_at().is_none()
        {
            self.lockup.begin_release(now)?;
            info!(
                project = %id,
                duration = %format_duration(self.config.release_duration_secs),
                "release project finished"
            );
        }
        Ok(state)
    }

    /// Open a holder-weighted proposal to replace the whole committee.
    pub fn propose_set_members(
        &mut self,
        proposer: &AccountId,
        members: &[AccountId],
        duration_secs: u64,
    ) -> Result<ProposalId, DaoError> {
        let now = self.now();
        let weights = self.host.token.weights();
        Ok(self
            .governance
            .propose_set_members(proposer, members, duration_secs, weights, now)?)
    }

    /// Open a holder-weighted proposal authorizing an upgrade.
    pub fn propose_upgrade(
        &mut self,
        proposer: &AccountId,
        component: &str,
        implementation: &str,
        duration_secs: u64,
    ) -> Result<ProposalId, DaoError> {
        let now = self.now();
        let weights = self.host.token.weights();
        Ok(self.governance.propose_upgrade(
            proposer,
            component,
            implementation,
            duration_secs,
            weights,
            now,
        )?)
    }

    /// Vote on a weighted proposal with the voter's current token weight.
    pub fn cast_weighted_vote(
        &mut self,
        id: ProposalId,
        voter: &AccountId,
        support: bool,
        params: &ProposalParams,
    ) -> Result<(), DaoError> {
        let now = self.now();
        let weights = self.host.token.weights();
        self.governance
            .cast_weighted_vote(id, voter, support, params, weights, now)?;
        Ok(())
    }

    fn is_release_project(&self, id: ProjectId) -> Result<bool, DaoError> {
        let terms = &self.projects.project(id)?.terms;
        Ok(terms.name == self.config.release_project_name
            && terms.version == self.config.release_project_version)
    }

    /// Install the global subscriber as configured.
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber has already been set.
    pub fn init_logging(&self) -> Result<(), DaoError> {
        quorum_utils::init_logging(self.config.log_format()?, &self.config.log_level);
        Ok(())
    }
}
