//! Development projects.
//!
//! `Preparing -> Developing -> Accepting -> Finished`. The manager drives
//! every step; each promotion executes the proposal created by the step
//! before it. The acceptance grade scales the budget shared among
//! contributors.

use crate::activity::ensure_supply;
use crate::contribution::{reward_pool, ContributionBook};
use crate::error::RewardError;
use quorum_governance::{Origin, ProposalEngine, ProposalParams, ProposalState};
use quorum_host::{Event, GovernanceToken};
use quorum_ledger::SettlementLedger;
use quorum_types::{AccountId, EntityRef, ProjectId, ProposalId, SettlementKind, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectState {
    Preparing,
    Developing,
    Accepting,
    Finished,
}

impl ProjectState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preparing => "preparing",
            Self::Developing => "developing",
            Self::Accepting => "accepting",
            Self::Finished => "finished",
        }
    }
}

/// Acceptance grade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Expired,
    Failed,
    Normal,
    Good,
    Excellent,
}

impl Grade {
    /// Share of the budget paid out, in percent.
    pub fn percent(&self) -> u32 {
        match self {
            Self::Expired | Self::Failed => 0,
            Self::Normal => 80,
            Self::Good => 100,
            Self::Excellent => 120,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTerms {
    pub budget: u128,
    pub name: String,
    pub version: String,
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub manager: AccountId,
    pub terms: ProjectTerms,
    pub state: ProjectState,
    pub grade: Option<Grade>,
    /// The proposal the next promotion executes.
    pub proposal: ProposalId,
    pub contributions: ContributionBook,
}

impl Project {
    fn create_params(&self) -> ProposalParams {
        ProposalParams::ProjectCreate {
            project: self.id,
            manager: self.manager.clone(),
            budget: self.terms.budget,
            name: self.terms.name.clone(),
            version: self.terms.version.clone(),
        }
    }

    fn grade_percent(&self) -> u32 {
        self.grade.map(|g| g.percent()).unwrap_or(0)
    }

    fn accept_params(&self) -> ProposalParams {
        ProposalParams::ProjectAccept {
            project: self.id,
            budget: self.terms.budget,
            grade_percent: self.grade_percent(),
        }
    }

    fn ensure_state(&self, expected: ProjectState) -> Result<(), RewardError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RewardError::WrongState {
                entity: self.id.to_string(),
                state: self.state.as_str(),
                expected: expected.as_str(),
            })
        }
    }

    fn ensure_manager(&self, caller: &AccountId) -> Result<(), RewardError> {
        if self.manager == *caller {
            Ok(())
        } else {
            Err(RewardError::NotManager(caller.clone()))
        }
    }
}

pub struct Projects {
    projects: BTreeMap<ProjectId, Project>,
    next_id: ProjectId,
    settlements: SettlementLedger,
    pending_events: Vec<Event>,
}

impl Default for Projects {
    fn default() -> Self {
        Self::new()
    }
}

impl Projects {
    pub fn new() -> Self {
        Self {
            projects: BTreeMap::new(),
            next_id: ProjectId::FIRST,
            settlements: SettlementLedger::new(),
            pending_events: Vec::new(),
        }
    }

    pub fn project(&self, id: ProjectId) -> Result<&Project, RewardError> {
        self.projects.get(&id).ok_or(RewardError::ProjectNotFound(id))
    }

    fn project_mut(&mut self, id: ProjectId) -> Result<&mut Project, RewardError> {
        self.projects
            .get_mut(&id)
            .ok_or(RewardError::ProjectNotFound(id))
    }

    pub fn contribution_of(&self, id: ProjectId, who: &AccountId) -> Result<u128, RewardError> {
        Ok(self.project(id)?.contributions.weight_of(who))
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn create_project(
        &mut self,
        gov: &mut ProposalEngine,
        manager: &AccountId,
        terms: ProjectTerms,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<(ProjectId, ProposalId), RewardError> {
        if terms.start > terms.end {
            return Err(RewardError::InvalidWindow);
        }
        let id = self.next_id;
        let next = id.next().ok_or(RewardError::Overflow)?;
        let mut project = Project {
            id,
            manager: manager.clone(),
            terms,
            state: ProjectState::Preparing,
            grade: None,
            proposal: ProposalId::FIRST,
            contributions: ContributionBook::new(),
        };
        let proposal = gov.propose(manager, Origin::Projects, duration_secs, project.create_params(), now)?;
        project.proposal = proposal;
        info!(project = %id, %manager, name = %project.terms.name, version = %project.terms.version, "project created");
        self.projects.insert(id, project);
        self.next_id = next;

        self.pending_events.push(Event::ProjectCreated {
            project: id,
            manager: manager.clone(),
            proposal,
        });
        Ok((id, proposal))
    }

    /// Execute the outstanding proposal: `Preparing -> Developing` once the
    /// project is approved, `Accepting -> Finished` once the grade is.
    /// Finishing sets aside the graded budget for contributors.
    pub fn promote_project(
        &mut self,
        gov: &mut ProposalEngine,
        token: &mut dyn GovernanceToken,
        caller: &AccountId,
        id: ProjectId,
        now: Timestamp,
    ) -> Result<ProjectState, RewardError> {
        let project = self.project(id)?;
        project.ensure_manager(caller)?;
        let next = match project.state {
            ProjectState::Preparing => {
                gov.gate(project.proposal, Origin::Projects, &project.create_params(), now)?;
                ProjectState::Developing
            }
            ProjectState::Accepting => {
                let pool = reward_pool(project.terms.budget, project.grade_percent())?;
                ensure_supply(token, pool)?;
                gov.gate(project.proposal, Origin::Projects, &project.accept_params(), now)?;
                if pool > 0 {
                    token.reserve(pool)?;
                }
                debug!(project = %id, pool, "project budget set aside");
                ProjectState::Finished
            }
            ProjectState::Developing | ProjectState::Finished => {
                return Err(RewardError::WrongState {
                    entity: id.to_string(),
                    state: project.state.as_str(),
                    expected: "preparing or accepting",
                });
            }
        };
        self.transition(id, next)?;
        Ok(next)
    }

    /// Grade a developed project, record contributions, and propose
    /// acceptance.
    ///
    /// A project still accepting may be graded again once its acceptance
    /// proposal was rejected or expired. The new contributions apply on top
    /// of those already recorded.
    #[allow(clippy::too_many_arguments)]
    pub fn accept_project(
        &mut self,
        gov: &mut ProposalEngine,
        caller: &AccountId,
        id: ProjectId,
        grade: Grade,
        contributions: &[(AccountId, u128)],
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<ProposalId, RewardError> {
        let project = self.project(id)?;
        project.ensure_manager(caller)?;
        if project.state == ProjectState::Accepting {
            let previous = project.proposal;
            let state = gov.finalize(previous, &project.accept_params(), now)?;
            if !matches!(state, ProposalState::Rejected | ProposalState::Expired) {
                return Err(RewardError::ProposalOutstanding {
                    entity: id.to_string(),
                    proposal: previous,
                    state,
                });
            }
            debug!(project = %id, %previous, ?state, "re-grading after failed acceptance");
        } else {
            project.ensure_state(ProjectState::Developing)?;
        }
        let mut book = project.contributions.clone();
        book.apply(contributions)?;
        let params = ProposalParams::ProjectAccept {
            project: id,
            budget: project.terms.budget,
            grade_percent: grade.percent(),
        };
        let proposal = gov.propose(caller, Origin::Projects, duration_secs, params, now)?;

        let project = self.project_mut(id)?;
        project.grade = Some(grade);
        project.proposal = proposal;
        project.contributions = book;
        let (contributors, total_weight) = (project.contributions.len(), project.contributions.total());
        info!(project = %id, ?grade, %proposal, "project submitted for acceptance");
        self.pending_events.push(Event::ContributionsUpdated {
            entity: EntityRef::Project(id),
            contributors,
            total_weight,
        });
        self.transition(id, ProjectState::Accepting)?;
        Ok(proposal)
    }

    /// Overwrite one contributor's weight while acceptance is pending.
    pub fn update_contribution(
        &mut self,
        caller: &AccountId,
        id: ProjectId,
        contributor: &AccountId,
        weight: u128,
    ) -> Result<(), RewardError> {
        let project = self.project_mut(id)?;
        project.ensure_manager(caller)?;
        project.ensure_state(ProjectState::Accepting)?;
        project.contributions.set(contributor, weight)?;
        let (contributors, total_weight) = (project.contributions.len(), project.contributions.total());
        self.pending_events.push(Event::ContributionsUpdated {
            entity: EntityRef::Project(id),
            contributors,
            total_weight,
        });
        Ok(())
    }

    /// Withdraw `who`'s share from each listed finished project.
    pub fn withdraw_contributions(
        &mut self,
        token: &mut dyn GovernanceToken,
        who: &AccountId,
        ids: &[ProjectId],
        now: Timestamp,
    ) -> Result<u128, RewardError> {
        let ids: BTreeSet<ProjectId> = ids.iter().copied().collect();
        let mut owed = Vec::with_capacity(ids.len());
        for id in &ids {
            let project = self.project(*id)?;
            project.ensure_state(ProjectState::Finished)?;
            self.settlements
                .ensure_unsettled(EntityRef::Project(*id), who, SettlementKind::RewardWithdrawal)?;
            let amount = project
                .contributions
                .payout(who, project.terms.budget, project.grade_percent())?;
            owed.push((*id, amount));
        }

        let mut total = 0u128;
        for (id, amount) in owed {
            let entity = EntityRef::Project(id);
            self.settlements.settle_once(
                entity,
                who,
                SettlementKind::RewardWithdrawal,
                amount,
                now,
                |amount| token.release(who, amount),
            )?;
            total = total.checked_add(amount).ok_or(RewardError::Overflow)?;
            self.pending_events.push(Event::Settled {
                entity,
                beneficiary: who.clone(),
                kind: SettlementKind::RewardWithdrawal,
                amount,
            });
        }
        Ok(total)
    }

    fn transition(&mut self, id: ProjectId, state: ProjectState) -> Result<(), RewardError> {
        self.project_mut(id)?.state = state;
        info!(project = %id, state = state.as_str(), "project state changed");
        self.pending_events.push(Event::ProjectStateChanged {
            project: id,
            state: state.as_str().to_string(),
        });
        Ok(())
    }
}
