//! Unlock sources for locked tokens.

use crate::error::VestingError;
use quorum_types::{mul_div, Timestamp};
use serde::{Deserialize, Serialize};

/// Where an unlock came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnlockSource {
    /// Linear release of self-locked tokens once the schedule has begun.
    ScheduledTranche,
    /// Explicit unlock carried by an accepted proposal.
    ProposalTranche,
}

/// Linear release for scheduled tranches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseSchedule {
    /// Nothing vests yet.
    NotStarted { duration_secs: u64 },
    Linear { start: Timestamp, duration_secs: u64 },
}

impl ReleaseSchedule {
    pub fn new(duration_secs: u64) -> Result<Self, VestingError> {
        if duration_secs == 0 {
            return Err(VestingError::ZeroDuration);
        }
        Ok(Self::NotStarted { duration_secs })
    }

    pub fn duration_secs(&self) -> u64 {
        match self {
            Self::NotStarted { duration_secs } | Self::Linear { duration_secs, .. } => *duration_secs,
        }
    }

    pub fn started_at(&self) -> Option<Timestamp> {
        match self {
            Self::NotStarted { .. } => None,
            Self::Linear { start, .. } => Some(*start),
        }
    }

    /// Move to `Linear` starting at `now`; only once.
    pub fn begin(&mut self, now: Timestamp) -> Result<(), VestingError> {
        match *self {
            Self::NotStarted { duration_secs } => {
                *self = Self::Linear {
                    start: now,
                    duration_secs,
                };
                Ok(())
            }
            Self::Linear { .. } => Err(VestingError::ReleaseAlreadyStarted),
        }
    }

    /// Part of `total` vested at `now`: `floor(total * elapsed / duration)`,
    /// capped at `total`.
    pub fn vested(&self, total: u128, now: Timestamp) -> Result<u128, VestingError> {
        match *self {
            Self::NotStarted { .. } => Ok(0),
            Self::Linear { start, duration_secs } => {
                let elapsed = start.elapsed_since(now);
                if elapsed >= duration_secs {
                    return Ok(total);
                }
                mul_div(total, u128::from(elapsed), u128::from(duration_secs)).ok_or(VestingError::Overflow)
            }
        }
    }
}

/// One beneficiary's amounts per unlock source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tranches {
    pub scheduled: u128,
    pub scheduled_unlocked: u128,
    pub granted: u128,
    pub granted_unlocked: u128,
}

impl Tranches {
    pub fn granted_locked(&self) -> u128 {
        self.granted - self.granted_unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;

    #[test]
    fn nothing_vests_before_begin() {
        let schedule = ReleaseSchedule::new(180 * DAY).unwrap();
        assert_eq!(schedule.vested(2_000, Timestamp::new(1_000 * DAY)).unwrap(), 0);
    }

    #[test]
    fn linear_release_floors() {
        let mut schedule = ReleaseSchedule::new(180 * DAY).unwrap();
        schedule.begin(Timestamp::new(10 * DAY)).unwrap();
        assert_eq!(schedule.vested(2_000, Timestamp::new(40 * DAY)).unwrap(), 333);
        assert_eq!(schedule.vested(2_000, Timestamp::new(190 * DAY)).unwrap(), 2_000);
        assert_eq!(schedule.vested(2_000, Timestamp::new(400 * DAY)).unwrap(), 2_000);
    }

    #[test]
    fn begin_is_one_shot() {
        let mut schedule = ReleaseSchedule::new(10).unwrap();
        schedule.begin(Timestamp::new(5)).unwrap();
        assert!(matches!(
            schedule.begin(Timestamp::new(6)),
            Err(VestingError::ReleaseAlreadyStarted)
        ));
        assert_eq!(schedule.started_at(), Some(Timestamp::new(5)));
    }

    #[test]
    fn zero_duration_rejected() {
        assert!(matches!(ReleaseSchedule::new(0), Err(VestingError::ZeroDuration)));
    }
}
