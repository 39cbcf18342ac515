//! Commission registry: the fixed-size group that resolves proposals the
//! vote could not settle.
//!
//! Members are kept in insertion order without duplicates. The registry is
//! only mutated through governed calls (see [`crate::call::GovernorCall`]);
//! the methods here enforce the membership rules, the caller check lives
//! in the governor.

use qdao_types::WalletAddress;
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

/// A successful registry mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommissionChange {
    MemberAdded(WalletAddress),
    MemberRemoved(WalletAddress),
    RequiredSignaturesChanged { old: usize, new: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRegistry {
    members: Vec<WalletAddress>,
    /// The only caller allowed to submit a crisis decision.
    decision_source: WalletAddress,
    required_signatures: usize,
}

impl CommissionRegistry {
    /// Build a registry. Members must be non-empty and duplicate-free, and
    /// `1 <= required_signatures <= members.len()`.
    pub fn new(
        members: Vec<WalletAddress>,
        decision_source: WalletAddress,
        required_signatures: usize,
    ) -> Result<Self, GovernanceError> {
        let mut registry = Self {
            members: Vec::with_capacity(members.len()),
            decision_source,
            required_signatures: 0,
        };
        for member in members {
            registry.add_member(member)?;
        }
        registry.check_threshold(required_signatures)?;
        registry.required_signatures = required_signatures;
        Ok(registry)
    }

    pub fn members(&self) -> &[WalletAddress] {
        &self.members
    }

    pub fn decision_source(&self) -> &WalletAddress {
        &self.decision_source
    }

    pub fn required_signatures(&self) -> usize {
        self.required_signatures
    }

    /// Number of registered members.
    pub fn address_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_member(&self, identity: &WalletAddress) -> bool {
        self.members.contains(identity)
    }

    /// Whether a decision can currently be reached at all.
    ///
    /// False once removals have shrunk the commission below the threshold; the
    /// threshold is never lowered implicitly, so submissions fail closed.
    pub fn threshold_reachable(&self) -> bool {
        self.required_signatures <= self.members.len()
    }

    pub fn add_member(
        &mut self,
        identity: WalletAddress,
    ) -> Result<CommissionChange, GovernanceError> {
        if !identity.is_valid() || self.is_member(&identity) {
            return Err(GovernanceError::InvalidMembership(identity));
        }
        self.members.push(identity.clone());
        Ok(CommissionChange::MemberAdded(identity))
    }

    pub fn remove_member(
        &mut self,
        identity: &WalletAddress,
    ) -> Result<CommissionChange, GovernanceError> {
        let Some(pos) = self.members.iter().position(|m| m == identity) else {
            return Err(GovernanceError::InvalidMembership(identity.clone()));
        };
        self.members.remove(pos);
        Ok(CommissionChange::MemberRemoved(identity.clone()))
    }

    pub fn set_required_signatures(
        &mut self,
        required: usize,
    ) -> Result<CommissionChange, GovernanceError> {
        self.check_threshold(required)?;
        let old = std::mem::replace(&mut self.required_signatures, required);
        Ok(CommissionChange::RequiredSignaturesChanged { old, new: required })
    }

    fn check_threshold(&self, required: usize) -> Result<(), GovernanceError> {
        if required == 0 || required > self.members.len() {
            return Err(GovernanceError::InvalidThreshold {
                requested: required,
                members: self.members.len(),
            });
        }
        Ok(())
    }
}
