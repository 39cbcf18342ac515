//! Governor configuration with TOML file support.

use qdao_types::WalletAddress;
use qdao_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::commission::CommissionRegistry;
use crate::error::GovernanceError;

/// Commission section of the configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionConfig {
    /// Member addresses, in registry order.
    pub members: Vec<String>,

    /// Address allowed to submit crisis decisions.
    pub decision_source: String,

    #[serde(default = "default_required_signatures")]
    pub required_signatures: usize,
}

/// Configuration for a governor deployment.
///
/// The voting and timelock parameters belong to the collaborating vote module
/// and timelock; they live here so one file describes the whole deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// The governor's own address; calls targeting it are governed self-calls.
    pub governor_address: String,

    /// The timelock executor, the only caller allowed to mutate the commission.
    pub executor_address: String,

    /// Quorum as a percentage of total voting weight.
    #[serde(default = "default_quorum_percentage")]
    pub quorum_percentage: u8,

    /// Blocks between proposal creation and the start of voting.
    #[serde(default = "default_voting_delay")]
    pub voting_delay: u64,

    /// Length of the voting window in blocks.
    #[serde(default = "default_voting_period")]
    pub voting_period: u64,

    /// Minimum voting weight needed to create a proposal.
    #[serde(default)]
    pub proposal_threshold: u64,

    /// Log format for hosts that initialise tracing from this file: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Timelock delay in blocks.
    #[serde(default = "default_min_delay")]
    pub min_delay: u64,

    pub commission: CommissionConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_required_signatures() -> usize {
    3
}

fn default_quorum_percentage() -> u8 {
    4
}

fn default_voting_delay() -> u64 {
    1
}

fn default_voting_period() -> u64 {
    7
}

fn default_min_delay() -> u64 {
    1
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernorConfig {
    pub fn new(
        governor_address: &WalletAddress,
        executor_address: &WalletAddress,
        members: &[WalletAddress],
        decision_source: &WalletAddress,
        required_signatures: usize,
    ) -> Self {
        Self {
            governor_address: governor_address.to_string(),
            executor_address: executor_address.to_string(),
            quorum_percentage: default_quorum_percentage(),
            voting_delay: default_voting_delay(),
            voting_period: default_voting_period(),
            proposal_threshold: 0,
            min_delay: default_min_delay(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            commission: CommissionConfig {
                members: members.iter().map(ToString::to_string).collect(),
                decision_source: decision_source.to_string(),
                required_signatures,
            },
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, GovernanceError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GovernanceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GovernanceError> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber from `log_format` and `log_level`.
    pub fn init_logging(&self) -> Result<(), GovernanceError> {
        qdao_utils::init_tracing(LogFormat::from_name(&self.log_format), &self.log_level)
            .map_err(|e| GovernanceError::Config(format!("logging: {e}")))
    }

    pub fn governor(&self) -> Result<WalletAddress, GovernanceError> {
        parse_address(&self.governor_address)
    }

    pub fn executor(&self) -> Result<WalletAddress, GovernanceError> {
        parse_address(&self.executor_address)
    }

    /// Check the voting parameters.
    pub fn check(&self) -> Result<(), GovernanceError> {
        if self.quorum_percentage == 0 || self.quorum_percentage > 100 {
            return Err(GovernanceError::Config(format!(
                "quorum_percentage must be within 1..=100, got {}",
                self.quorum_percentage
            )));
        }
        if self.voting_period == 0 {
            return Err(GovernanceError::Config("voting_period must be positive".into()));
        }
        Ok(())
    }

    /// Build the commission registry described by this configuration.
    pub fn commission_registry(&self) -> Result<CommissionRegistry, GovernanceError> {
        let members = self
            .commission
            .members
            .iter()
            .map(|m| parse_address(m))
            .collect::<Result<Vec<_>, _>>()?;
        CommissionRegistry::new(
            members,
            parse_address(&self.commission.decision_source)?,
            self.commission.required_signatures,
        )
    }
}

fn parse_address(raw: &str) -> Result<WalletAddress, GovernanceError> {
    WalletAddress::parse(raw).map_err(|e| GovernanceError::Config(e.to_string()))
}
