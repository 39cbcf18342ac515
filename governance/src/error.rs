use qdao_types::{ProposalId, WalletAddress};
use thiserror::Error;

use crate::external::QueueError;
use crate::proposal::ProposalState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("only the commission decision source can submit a crisis decision (caller {0})")]
    UnauthorizedSubmitter(WalletAddress),

    #[error("no commission gathering was created for proposal {0}")]
    NoGatheringRecord(ProposalId),

    #[error("proposal {0} was settled by the vote; no commission decision is needed")]
    CommissionNotNeeded(ProposalId),

    #[error("commission has already submitted the decision for proposal {0}")]
    AlreadyResolved(ProposalId),

    #[error("signature at index {index} is invalid")]
    InvalidSignature { index: usize },

    #[error("not enough signatures: {have} < {need}")]
    InsufficientSignatures { have: usize, need: usize },

    #[error("invalid commission membership change for {0}")]
    InvalidMembership(WalletAddress),

    #[error("required signatures must be within 1..={members}, got {requested}")]
    InvalidThreshold { requested: usize, members: usize },

    #[error("a commission decision must be Approved or Declined")]
    InvalidDecision,

    #[error("unknown proposal {0}")]
    UnknownProposal(ProposalId),

    #[error("voting on proposal {0} has not closed")]
    VotingNotClosed(ProposalId),

    #[error("proposal {0} needs validation")]
    ValidationRequired(ProposalId),

    #[error("proposal {id} is not successful (state {state:?})")]
    NotSuccessful { id: ProposalId, state: ProposalState },

    #[error("proposal {id} is not ready for execution (state {state:?})")]
    NotReady { id: ProposalId, state: ProposalState },

    #[error("only the governance executor may call this (caller {0})")]
    OnlyGovernance(WalletAddress),

    #[error("invalid proposal payload: {0}")]
    InvalidPayload(String),

    #[error("execution queue: {0}")]
    Queue(#[from] QueueError),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("config error: {0}")]
    Config(String),
}
