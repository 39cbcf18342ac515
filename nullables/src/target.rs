//! A governed target contract: holds a string state that only its owner
//! (the timelock) can change.

use qdao_governance::ProposalCall;
use qdao_types::WalletAddress;

pub struct NullTarget {
    address: WalletAddress,
    state: String,
}

impl NullTarget {
    pub fn new(address: WalletAddress) -> Self {
        Self {
            address,
            state: String::new(),
        }
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// Calldata for `change_state(new_state)`.
    pub fn encode_change_state(new_state: &str) -> Vec<u8> {
        new_state.as_bytes().to_vec()
    }

    /// Apply calls addressed to this target; returns how many were applied.
    pub fn dispatch(&mut self, calls: &[ProposalCall]) -> usize {
        let mut applied = 0;
        for call in calls.iter().filter(|c| c.target == self.address) {
            self.state = String::from_utf8_lossy(&call.calldata).into_owned();
            applied += 1;
        }
        applied
    }
}
