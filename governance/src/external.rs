//! Seams to the collaborators the governor composes with but does not own:
//! the weighted vote tally and the timelocked execution queue.

use qdao_types::ProposalId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::proposal::ProposalPayload;

/// Where a proposal is in its voting window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingPhase {
    /// Created, voting delay not yet elapsed.
    Pending,
    /// Voting window open.
    Active,
    /// Voting window closed; the tally is final.
    Closed,
    /// Withdrawn before it could be decided.
    Canceled,
}

/// Final weighted vote counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalVotes {
    pub against: u128,
    pub for_votes: u128,
    pub abstain: u128,
}

/// Read-only view of the vote module.
pub trait VoteTally {
    /// `None` if the proposal is unknown.
    fn phase(&self, id: &ProposalId) -> Option<VotingPhase>;

    fn proposal_votes(&self, id: &ProposalId) -> Option<ProposalVotes>;

    fn quorum_reached(&self, id: &ProposalId) -> bool;

    fn voting_closed(&self, id: &ProposalId) -> bool {
        self.phase(id) == Some(VotingPhase::Closed)
    }
}

/// Status of a proposal's operation in the timelock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    /// Never scheduled.
    Unset,
    /// Scheduled, delay not yet elapsed.
    Waiting,
    /// Scheduled and executable.
    Ready,
    Done,
    /// Scheduled but not executed within the grace period.
    Expired,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("operation {0} is already scheduled")]
    AlreadyScheduled(ProposalId),

    #[error("operation {0} is not ready")]
    NotReady(ProposalId),

    #[error("operation {0} is unknown")]
    Unknown(ProposalId),
}

/// The timelocked execution queue.
pub trait ExecutionQueue {
    fn operation_status(&self, id: &ProposalId) -> OperationStatus;

    fn schedule(&mut self, id: ProposalId, payload: &ProposalPayload) -> Result<(), QueueError>;

    fn mark_executed(&mut self, id: &ProposalId) -> Result<(), QueueError>;
}
