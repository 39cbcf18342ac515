//! Proposals, their payload identity and lifecycle records.

use qdao_types::{ProposalId, WalletAddress};
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

/// Lifecycle state of a proposal as seen by the execution queue.
///
/// Discriminants match the host governor's numbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    Pending = 0,
    Active = 1,
    Canceled = 2,
    Defeated = 3,
    Succeeded = 4,
    Queued = 5,
    Expired = 6,
    Executed = 7,
}

/// Outcome of a commission gathering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommissionDecision {
    #[default]
    Pending = 0,
    Approved = 1,
    Declined = 2,
}

impl CommissionDecision {
    /// Byte bound into the decision digest. `Pending` is never signable.
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn is_final(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One call made when a proposal executes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalCall {
    pub target: WalletAddress,
    pub value: u128,
    pub calldata: Vec<u8>,
}

/// The action payload a proposal was created with.
///
/// Supplied by the vote module and echoed back on queue/execute; the governor
/// only hashes it to recover the proposal id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalPayload {
    pub targets: Vec<WalletAddress>,
    pub values: Vec<u128>,
    pub calldatas: Vec<Vec<u8>>,
    pub description_hash: [u8; 32],
}

impl ProposalPayload {
    pub fn new(
        targets: Vec<WalletAddress>,
        values: Vec<u128>,
        calldatas: Vec<Vec<u8>>,
        description: &str,
    ) -> Self {
        Self {
            targets,
            values,
            calldatas,
            description_hash: description_hash(description),
        }
    }

    /// Single-call payload, the common case.
    pub fn single(target: WalletAddress, calldata: Vec<u8>, description: &str) -> Self {
        Self::new(vec![target], vec![0], vec![calldata], description)
    }

    /// Check that the parallel arrays line up and are non-empty.
    pub fn check(&self) -> Result<(), GovernanceError> {
        if self.targets.is_empty() {
            return Err(GovernanceError::InvalidPayload("empty proposal".into()));
        }
        if self.targets.len() != self.values.len() || self.targets.len() != self.calldatas.len() {
            return Err(GovernanceError::InvalidPayload(format!(
                "length mismatch: {} targets, {} values, {} calldatas",
                self.targets.len(),
                self.values.len(),
                self.calldatas.len()
            )));
        }
        Ok(())
    }

    /// Proposal id: Blake2b-256 over the bincode encoding of the payload.
    pub fn id(&self) -> Result<ProposalId, GovernanceError> {
        let bytes = bincode::serialize(self).map_err(|e| GovernanceError::Codec(e.to_string()))?;
        Ok(ProposalId::new(qdao_crypto::blake2b_256(&bytes)))
    }

    /// The individual calls, in order.
    pub fn calls(&self) -> Vec<ProposalCall> {
        self.targets
            .iter()
            .zip(&self.values)
            .zip(&self.calldatas)
            .map(|((target, value), calldata)| ProposalCall {
                target: target.clone(),
                value: *value,
                calldata: calldata.clone(),
            })
            .collect()
    }
}

/// Blake2b-256 of a proposal description.
pub fn description_hash(description: &str) -> [u8; 32] {
    qdao_crypto::blake2b_256(description.as_bytes())
}

/// Per-proposal crisis gathering status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionGathering {
    pub decision: CommissionDecision,
    pub submitted: bool,
}

/// What the validation gate recorded about a proposal.
///
/// Created once by `Governor::validate`; never deleted, only transitioned by
/// `Governor::submit`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub crisis_required: bool,
    pub gathering: Option<CommissionGathering>,
}

impl ProposalRecord {
    pub(crate) fn settled_by_vote() -> Self {
        Self {
            crisis_required: false,
            gathering: None,
        }
    }

    pub(crate) fn awaiting_commission() -> Self {
        Self {
            crisis_required: true,
            gathering: Some(CommissionGathering::default()),
        }
    }

    /// Whether a commission decision has been accepted for this proposal.
    pub fn gathering_submitted(&self) -> bool {
        self.gathering.is_some_and(|g| g.submitted)
    }

    /// Whether the commission approved the proposal.
    pub fn commission_approved(&self) -> bool {
        self.gathering
            .is_some_and(|g| g.submitted && g.decision == CommissionDecision::Approved)
    }
}
