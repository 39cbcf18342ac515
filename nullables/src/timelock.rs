//! Nullable timelock: delayed execution queue keyed by proposal id.

use std::collections::HashMap;
use std::rc::Rc;

use qdao_governance::{ExecutionQueue, OperationStatus, ProposalPayload, QueueError};
use qdao_types::{BlockHeight, ProposalId, WalletAddress};

use crate::clock::NullClock;

struct Operation {
    ready_at: BlockHeight,
    done: bool,
    payload: ProposalPayload,
}

pub struct NullTimelock {
    address: WalletAddress,
    clock: Rc<NullClock>,
    min_delay: u64,
    /// Blocks after `ready_at` during which execution is still allowed.
    grace_period: Option<u64>,
    operations: HashMap<ProposalId, Operation>,
}

impl NullTimelock {
    pub fn new(address: WalletAddress, clock: Rc<NullClock>, min_delay: u64) -> Self {
        Self {
            address,
            clock,
            min_delay,
            grace_period: None,
            operations: HashMap::new(),
        }
    }

    pub fn with_grace_period(mut self, blocks: u64) -> Self {
        self.grace_period = Some(blocks);
        self
    }

    /// The executor identity the governor checks self-calls against.
    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    pub fn scheduled_payload(&self, id: &ProposalId) -> Option<&ProposalPayload> {
        self.operations.get(id).map(|op| &op.payload)
    }
}

impl ExecutionQueue for NullTimelock {
    fn operation_status(&self, id: &ProposalId) -> OperationStatus {
        let Some(op) = self.operations.get(id) else {
            return OperationStatus::Unset;
        };
        let now = self.clock.now();
        if op.done {
            OperationStatus::Done
        } else if now < op.ready_at {
            OperationStatus::Waiting
        } else if self
            .grace_period
            .is_some_and(|grace| op.ready_at.blocks_until(now) >= grace)
        {
            OperationStatus::Expired
        } else {
            OperationStatus::Ready
        }
    }

    fn schedule(&mut self, id: ProposalId, payload: &ProposalPayload) -> Result<(), QueueError> {
        if self.operations.contains_key(&id) {
            return Err(QueueError::AlreadyScheduled(id));
        }
        self.operations.insert(
            id,
            Operation {
                ready_at: self.clock.now().after(self.min_delay),
                done: false,
                payload: payload.clone(),
            },
        );
        Ok(())
    }

    fn mark_executed(&mut self, id: &ProposalId) -> Result<(), QueueError> {
        match self.operation_status(id) {
            OperationStatus::Ready => {}
            OperationStatus::Unset => return Err(QueueError::Unknown(*id)),
            _ => return Err(QueueError::NotReady(*id)),
        }
        if let Some(op) = self.operations.get_mut(id) {
            op.done = true;
        }
        Ok(())
    }
}
