//! Dual-path governance for the QDAO governor.
//!
//! A proposal is decided by weighted majority voting with quorum. When the
//! voting window closes without quorum, a fixed commission may resolve it
//! instead by submitting a threshold of member signatures over a canonical
//! decision digest.
//!
//! Flow: vote module closes the window → [`Governor::validate`] classifies the
//! proposal and opens a commission gathering if quorum failed →
//! [`Governor::submit`] accepts one signed decision → [`Governor::state`]
//! reports the blended lifecycle state to the execution queue.
//!
//! The commission itself can only be changed by proposals that pass through
//! this same lifecycle (see [`GovernorCall`]).

pub mod call;
pub mod commission;
pub mod config;
pub mod decision;
pub mod error;
pub mod events;
pub mod external;
pub mod governor;
pub mod proposal;

pub use call::GovernorCall;
pub use commission::{CommissionChange, CommissionRegistry};
pub use config::{CommissionConfig, GovernorConfig};
pub use decision::{decision_digest, sign_decision, verify_batch, CommissionSignature};
pub use error::GovernanceError;
pub use events::{EventLog, GovernanceEvent};
pub use external::{
    ExecutionQueue, OperationStatus, ProposalVotes, QueueError, VoteTally, VotingPhase,
};
pub use governor::Governor;
pub use proposal::{
    description_hash, CommissionDecision, CommissionGathering, ProposalCall, ProposalPayload,
    ProposalRecord, ProposalState,
};
