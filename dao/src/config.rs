//! Treasury configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use quorum_types::{AccountId, AssetId, GovernanceParams, BPS_DENOMINATOR};
use quorum_utils::LogFormat;

use crate::DaoError;

/// Configuration for one treasury deployment.
///
/// Can be loaded from a TOML file via [`DaoConfig::from_toml_file`] or built
/// programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaoConfig {
    /// Initial committee members.
    #[serde(default)]
    pub committee: Vec<AccountId>,

    /// Account that receives swept raises and pays approved transfers.
    #[serde(default = "default_treasury_account")]
    pub treasury_account: AccountId,

    /// Asset identifier of the DAO token as sold in tiered sales. An empty
    /// string or the zero address means the native asset.
    #[serde(default = "default_dao_token")]
    pub dao_token: String,

    /// Finishing the project with this name and version starts the linear
    /// release of self-locked tokens.
    #[serde(default = "default_release_project_name")]
    pub release_project_name: String,

    #[serde(default = "default_release_project_version")]
    pub release_project_version: String,

    /// Length of the linear release once started.
    #[serde(default = "default_release_duration")]
    pub release_duration_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Proposal duration bounds, quorums, dev ratio, committee bound.
    #[serde(default)]
    pub governance: GovernanceParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_treasury_account() -> AccountId {
    AccountId::new("treasury")
}

fn default_dao_token() -> String {
    "dao".to_string()
}

fn default_release_project_name() -> String {
    "mainnet".to_string()
}

fn default_release_project_version() -> String {
    "1.0.0".to_string()
}

fn default_release_duration() -> u64 {
    180 * 86_400
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaoConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, DaoError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DaoError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, DaoError> {
        toml::from_str(s).map_err(|e| DaoError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, DaoError> {
        toml::to_string_pretty(self).map_err(|e| DaoError::Config(e.to_string()))
    }

    pub fn dao_token(&self) -> Result<AssetId, DaoError> {
        Ok(AssetId::from_str(&self.dao_token)?)
    }

    pub fn log_format(&self) -> Result<LogFormat, DaoError> {
        Ok(self.log_format.parse()?)
    }

    /// Reject settings no deployment can run with.
    pub fn validate(&self) -> Result<(), DaoError> {
        let gov = &self.governance;
        if self.committee.is_empty() {
            return Err(DaoError::InvalidConfig("committee cannot be empty"));
        }
        if self.committee.len() > gov.max_committee_size {
            return Err(DaoError::InvalidConfig("committee exceeds max_committee_size"));
        }
        if gov.min_proposal_duration_secs > gov.max_proposal_duration_secs {
            return Err(DaoError::InvalidConfig(
                "min_proposal_duration_secs exceeds max_proposal_duration_secs",
            ));
        }
        for bps in [gov.committee_quorum_bps, gov.full_quorum_bps] {
            if bps == 0 || u128::from(bps) > BPS_DENOMINATOR {
                return Err(DaoError::InvalidConfig("quorum must be within 1..=10000 bps"));
            }
        }
        if self.release_duration_secs == 0 {
            return Err(DaoError::InvalidConfig("release_duration_secs must be positive"));
        }
        self.dao_token()?;
        self.log_format()?;
        Ok(())
    }
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            committee: Vec::new(),
            treasury_account: default_treasury_account(),
            dao_token: default_dao_token(),
            release_project_name: default_release_project_name(),
            release_project_version: default_release_project_version(),
            release_duration_secs: default_release_duration(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            governance: GovernanceParams::default(),
        }
    }
}
