use quorum_governance::GovernanceError;
use quorum_host::SinkError;
use quorum_rewards::RewardError;
use quorum_types::{ErrorKind, ParseAssetError};
use quorum_utils::logging::UnknownLogFormat;
use quorum_vesting::VestingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    #[error(transparent)]
    Asset(#[from] ParseAssetError),

    #[error(transparent)]
    LogFormat(#[from] UnknownLogFormat),

    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("reward error: {0}")]
    Reward(#[from] RewardError),

    #[error("vesting error: {0}")]
    Vesting(#[from] VestingError),

    #[error("event log error: {0}")]
    Sink(#[from] SinkError),
}

impl DaoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::InvalidConfig(_) | Self::Asset(_) | Self::LogFormat(_) => {
                ErrorKind::InvalidState
            }
            Self::Governance(e) => e.kind(),
            Self::Reward(e) => e.kind(),
            Self::Vesting(e) => e.kind(),
            Self::Sink(_) => ErrorKind::Transfer,
        }
    }
}
