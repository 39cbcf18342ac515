//! Calls a proposal can make into the governor itself.
//!
//! A proposal whose target is the governor's own address carries an encoded
//! [`GovernorCall`] as calldata. This is the only route to the commission
//! registry.

use qdao_types::WalletAddress;
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernorCall {
    AddCommissionMember(WalletAddress),
    RemoveCommissionMember(WalletAddress),
    SetRequiredSignatures(usize),
}

impl GovernorCall {
    pub fn encode(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(self).map_err(|e| GovernanceError::Codec(e.to_string()))
    }

    pub fn decode(calldata: &[u8]) -> Result<Self, GovernanceError> {
        bincode::deserialize(calldata).map_err(|e| GovernanceError::Codec(e.to_string()))
    }
}
