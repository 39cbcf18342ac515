//! Events emitted by the governor on every successful state change.

use qdao_types::{ProposalId, WalletAddress};

use crate::commission::CommissionChange;
use crate::proposal::CommissionDecision;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GovernanceEvent {
    /// The validation gate classified a proposal.
    ProposalValidated { id: ProposalId, crisis_required: bool },
    /// Quorum failed; the commission may now decide.
    CommissionGatheringOpened { id: ProposalId },
    /// A signed commission decision was accepted.
    CommissionDecisionSubmitted {
        id: ProposalId,
        decision: CommissionDecision,
        signers: Vec<WalletAddress>,
    },
    ProposalQueued { id: ProposalId },
    ProposalExecuted { id: ProposalId },
    CommissionMemberAdded { member: WalletAddress },
    CommissionMemberRemoved { member: WalletAddress },
    RequiredSignaturesChanged { old: usize, new: usize },
}

impl From<CommissionChange> for GovernanceEvent {
    fn from(change: CommissionChange) -> Self {
        match change {
            CommissionChange::MemberAdded(member) => Self::CommissionMemberAdded { member },
            CommissionChange::MemberRemoved(member) => Self::CommissionMemberRemoved { member },
            CommissionChange::RequiredSignaturesChanged { old, new } => {
                Self::RequiredSignaturesChanged { old, new }
            }
        }
    }
}

/// Append-only event history with synchronous fan-out.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast.
#[derive(Default)]
pub struct EventLog {
    history: Vec<GovernanceEvent>,
    listeners: Vec<Box<dyn Fn(&GovernanceEvent) + Send + Sync>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: GovernanceEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
        self.history.push(event);
    }

    pub fn events(&self) -> &[GovernanceEvent] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
