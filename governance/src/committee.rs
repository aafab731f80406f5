//! The committee member registry.

use crate::error::GovernanceError;
use quorum_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Current committee members plus the dev-class mixing ratio used for
/// weighted proposals.
///
/// Only the proposal engine mutates a committee, and only after a membership
/// proposal has been accepted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Committee {
    members: BTreeSet<AccountId>,
    dev_ratio_percent: u32,
    max_size: usize,
}

impl Committee {
    pub fn new(
        members: impl IntoIterator<Item = AccountId>,
        dev_ratio_percent: u32,
        max_size: usize,
    ) -> Result<Self, GovernanceError> {
        let members: BTreeSet<AccountId> = members.into_iter().collect();
        if members.is_empty() {
            return Err(GovernanceError::EmptyCommittee);
        }
        if members.len() > max_size {
            return Err(GovernanceError::CommitteeFull { max: max_size });
        }
        Ok(Self {
            members,
            dev_ratio_percent,
            max_size,
        })
    }

    pub fn is_member(&self, who: &AccountId) -> bool {
        self.members.contains(who)
    }

    pub fn members(&self) -> impl Iterator<Item = &AccountId> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn dev_ratio_percent(&self) -> u32 {
        self.dev_ratio_percent
    }

    pub fn ensure_member(&self, who: &AccountId) -> Result<(), GovernanceError> {
        if self.is_member(who) {
            Ok(())
        } else {
            Err(GovernanceError::NotMember(who.clone()))
        }
    }

    /// Check that `member` could be added right now.
    pub(crate) fn check_insert(&self, member: &AccountId) -> Result<(), GovernanceError> {
        if self.is_member(member) {
            return Err(GovernanceError::AlreadyMember(member.clone()));
        }
        if self.members.len() >= self.max_size {
            return Err(GovernanceError::CommitteeFull { max: self.max_size });
        }
        Ok(())
    }

    /// Check that `member` could be removed right now.
    pub(crate) fn check_remove(&self, member: &AccountId) -> Result<(), GovernanceError> {
        self.ensure_member(member)?;
        if self.members.len() == 1 {
            return Err(GovernanceError::EmptyCommittee);
        }
        Ok(())
    }

    pub(crate) fn check_replace(&self, members: &[AccountId]) -> Result<(), GovernanceError> {
        let unique: BTreeSet<&AccountId> = members.iter().collect();
        if unique.is_empty() {
            return Err(GovernanceError::EmptyCommittee);
        }
        if unique.len() > self.max_size {
            return Err(GovernanceError::CommitteeFull { max: self.max_size });
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, member: AccountId) {
        self.members.insert(member);
    }

    pub(crate) fn remove(&mut self, member: &AccountId) {
        self.members.remove(member);
    }

    pub(crate) fn replace(&mut self, members: &[AccountId]) {
        self.members = members.iter().cloned().collect();
    }

    pub(crate) fn set_dev_ratio(&mut self, percent: u32) {
        self.dev_ratio_percent = percent;
    }
}
