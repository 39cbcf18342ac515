//! Crisis decision digests and commission signature batches.
//!
//! Members sign `decision_digest(id, decision)` off-chain; the decision source
//! relays the batch to [`crate::Governor::submit`]. Binding both the id and the
//! decision keeps an approval from being replayed as a decline or against a
//! different proposal.

use std::collections::HashSet;

use qdao_types::{DecisionDigest, KeyPair, ProposalId, PublicKey, Signature, WalletAddress};
use serde::{Deserialize, Serialize};

use crate::commission::CommissionRegistry;
use crate::error::GovernanceError;
use crate::proposal::CommissionDecision;

/// Domain separator for decision digests.
pub const DECISION_DOMAIN: &[u8] = b"qdao/commission-decision/v1";

/// Canonical digest binding a proposal id to a claimed outcome.
pub fn decision_digest(id: &ProposalId, decision: CommissionDecision) -> DecisionDigest {
    DecisionDigest::new(qdao_crypto::blake2b_256_multi(&[
        DECISION_DOMAIN,
        id.as_bytes(),
        &[decision.as_byte()],
    ]))
}

/// A member's signature over a decision digest, with the key that made it.
///
/// Ed25519 has no public-key recovery, so the signer key travels with the
/// signature and the member identity is derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSignature {
    pub signer: PublicKey,
    pub signature: Signature,
}

impl CommissionSignature {
    /// Identity the signature claims to come from.
    pub fn signer_address(&self) -> WalletAddress {
        qdao_crypto::derive_address(&self.signer)
    }

    fn verify(&self, digest: &DecisionDigest) -> bool {
        qdao_crypto::verify_signature(digest.as_bytes(), &self.signature, &self.signer)
    }
}

/// Sign a decision as a commission member (off-chain helper).
pub fn sign_decision(
    keypair: &KeyPair,
    id: &ProposalId,
    decision: CommissionDecision,
) -> CommissionSignature {
    let digest = decision_digest(id, decision);
    CommissionSignature {
        signer: keypair.public.clone(),
        signature: qdao_crypto::sign_message(digest.as_bytes(), &keypair.private),
    }
}

/// Verify a batch against the registry and return the distinct signers.
///
/// All-or-nothing: the first signature that does not verify, does not come
/// from a current member, or repeats a member already counted fails the
/// whole batch. The threshold is checked afterwards.
pub fn verify_batch(
    registry: &CommissionRegistry,
    digest: &DecisionDigest,
    signatures: &[CommissionSignature],
) -> Result<Vec<WalletAddress>, GovernanceError> {
    let mut seen = HashSet::with_capacity(signatures.len());
    let mut signers = Vec::with_capacity(signatures.len());
    for (index, sig) in signatures.iter().enumerate() {
        if !sig.verify(digest) {
            return Err(GovernanceError::InvalidSignature { index });
        }
        let signer = sig.signer_address();
        if !registry.is_member(&signer) || !seen.insert(signer.clone()) {
            return Err(GovernanceError::InvalidSignature { index });
        }
        signers.push(signer);
    }

    let need = registry.required_signatures();
    if signers.len() < need {
        return Err(GovernanceError::InsufficientSignatures {
            have: signers.len(),
            need,
        });
    }
    Ok(signers)
}
