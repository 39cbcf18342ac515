//! The governor: validation gate, crisis decisions and lifecycle state.
//!
//! Per-proposal records are created by [`Governor::validate`] and only ever
//! transitioned afterwards. Every mutating entry point takes `&mut self`, so
//! calls on one governor are serialized; hosts that process proposals
//! concurrently wrap it in a lock.

use std::collections::HashMap;

use qdao_types::{DecisionDigest, ProposalId, WalletAddress};

use crate::call::GovernorCall;
use crate::commission::{CommissionChange, CommissionRegistry};
use crate::config::GovernorConfig;
use crate::decision::{self, CommissionSignature};
use crate::error::GovernanceError;
use crate::events::{EventLog, GovernanceEvent};
use crate::external::{ExecutionQueue, OperationStatus, VoteTally, VotingPhase};
use crate::proposal::{
    CommissionDecision, CommissionGathering, ProposalCall, ProposalPayload, ProposalRecord,
    ProposalState,
};

pub struct Governor {
    /// The governor's own address. Proposal calls targeting it are self-calls.
    address: WalletAddress,
    /// The timelock that executes proposals; the only caller allowed to
    /// mutate the commission.
    executor: WalletAddress,
    commission: CommissionRegistry,
    records: HashMap<ProposalId, ProposalRecord>,
    events: EventLog,
}

impl Governor {
    pub fn new(
        address: WalletAddress,
        executor: WalletAddress,
        commission: CommissionRegistry,
    ) -> Self {
        Self {
            address,
            executor,
            commission,
            records: HashMap::new(),
            events: EventLog::new(),
        }
    }

    pub fn from_config(config: &GovernorConfig) -> Result<Self, GovernanceError> {
        config.check()?;
        Ok(Self::new(
            config.governor()?,
            config.executor()?,
            config.commission_registry()?,
        ))
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    pub fn executor(&self) -> &WalletAddress {
        &self.executor
    }

    pub fn commission(&self) -> &CommissionRegistry {
        &self.commission
    }

    pub fn record(&self, id: &ProposalId) -> Option<&ProposalRecord> {
        self.records.get(id)
    }

    pub fn events(&self) -> &[GovernanceEvent] {
        self.events.events()
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Validation gate ────────────────────────────────────────────────

    /// Classify a proposal once its voting window has closed.
    ///
    /// Permissionless and idempotent: once a record exists, further calls
    /// return `Ok(())` without touching state.
    pub fn validate(
        &mut self,
        tally: &dyn VoteTally,
        id: &ProposalId,
    ) -> Result<(), GovernanceError> {
        if self.records.contains_key(id) {
            tracing::debug!(proposal = %id, "already validated");
            return Ok(());
        }
        match tally.phase(id) {
            None => return Err(GovernanceError::UnknownProposal(*id)),
            Some(VotingPhase::Closed) => {}
            Some(_) => return Err(GovernanceError::VotingNotClosed(*id)),
        }

        let record = if tally.quorum_reached(id) {
            ProposalRecord::settled_by_vote()
        } else {
            ProposalRecord::awaiting_commission()
        };
        let crisis_required = record.crisis_required;
        self.records.insert(*id, record);

        tracing::info!(proposal = %id, crisis_required, "proposal validated");
        self.events.emit(GovernanceEvent::ProposalValidated {
            id: *id,
            crisis_required,
        });
        if crisis_required {
            self.events.emit(GovernanceEvent::CommissionGatheringOpened { id: *id });
        }
        Ok(())
    }

    /// Whether the proposal needs a commission decision.
    ///
    /// Before validation this is read from the tally: the window has closed
    /// without quorum.
    pub fn is_commission_needed(&self, tally: &dyn VoteTally, id: &ProposalId) -> bool {
        match self.records.get(id) {
            Some(record) => record.crisis_required,
            None => tally.voting_closed(id) && !tally.quorum_reached(id),
        }
    }

    /// Whether the vote alone settled the proposal.
    pub fn no_need_in_validation(&self, tally: &dyn VoteTally, id: &ProposalId) -> bool {
        match self.records.get(id) {
            Some(record) => !record.crisis_required,
            None => tally.voting_closed(id) && tally.quorum_reached(id),
        }
    }

    pub fn successful_commission_gathering(&self, id: &ProposalId) -> bool {
        self.records
            .get(id)
            .is_some_and(ProposalRecord::gathering_submitted)
    }

    // ── Crisis decisions ───────────────────────────────────────────────

    /// Digest commission members sign for `decision` on `id`.
    pub fn decision_digest(&self, id: &ProposalId, decision: CommissionDecision) -> DecisionDigest {
        decision::decision_digest(id, decision)
    }

    /// Accept a signed commission decision for a proposal that failed quorum.
    ///
    /// Every check runs before any mutation; a rejected call leaves the
    /// gathering open. An accepted `Approved` decision overrides the
    /// vote-path `Defeated` classification to `Succeeded`.
    pub fn submit(
        &mut self,
        tally: &dyn VoteTally,
        caller: &WalletAddress,
        id: &ProposalId,
        decision: CommissionDecision,
        signatures: &[CommissionSignature],
    ) -> Result<(), GovernanceError> {
        let signers = match self.check_submission(tally, caller, id, decision, signatures) {
            Ok(signers) => signers,
            Err(e) => {
                tracing::warn!(proposal = %id, %caller, error = %e, "commission decision rejected");
                return Err(e);
            }
        };

        if let Some(record) = self.records.get_mut(id) {
            record.gathering = Some(CommissionGathering {
                decision,
                submitted: true,
            });
        }

        tracing::info!(
            proposal = %id,
            ?decision,
            signers = signers.len(),
            "commission decision accepted"
        );
        self.events.emit(GovernanceEvent::CommissionDecisionSubmitted {
            id: *id,
            decision,
            signers,
        });
        Ok(())
    }

    fn check_submission(
        &self,
        tally: &dyn VoteTally,
        caller: &WalletAddress,
        id: &ProposalId,
        decision: CommissionDecision,
        signatures: &[CommissionSignature],
    ) -> Result<Vec<WalletAddress>, GovernanceError> {
        if caller != self.commission.decision_source() {
            return Err(GovernanceError::UnauthorizedSubmitter(caller.clone()));
        }
        if self.no_need_in_validation(tally, id) {
            return Err(GovernanceError::CommissionNotNeeded(*id));
        }
        let gathering = self
            .records
            .get(id)
            .and_then(|r| r.gathering)
            .ok_or(GovernanceError::NoGatheringRecord(*id))?;
        if gathering.submitted {
            return Err(GovernanceError::AlreadyResolved(*id));
        }
        if !decision.is_final() {
            return Err(GovernanceError::InvalidDecision);
        }
        let digest = decision::decision_digest(id, decision);
        decision::verify_batch(&self.commission, &digest, signatures)
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Current lifecycle state, blending the vote outcome, any commission
    /// decision and the execution queue.
    pub fn state(
        &self,
        tally: &dyn VoteTally,
        queue: &dyn ExecutionQueue,
        id: &ProposalId,
    ) -> Result<ProposalState, GovernanceError> {
        let phase = tally
            .phase(id)
            .ok_or(GovernanceError::UnknownProposal(*id))?;
        let decided = match phase {
            VotingPhase::Pending => return Ok(ProposalState::Pending),
            VotingPhase::Active => return Ok(ProposalState::Active),
            VotingPhase::Canceled => return Ok(ProposalState::Canceled),
            VotingPhase::Closed => {
                if self
                    .records
                    .get(id)
                    .is_some_and(ProposalRecord::commission_approved)
                {
                    ProposalState::Succeeded
                } else {
                    vote_outcome(tally, id)
                }
            }
        };
        if decided != ProposalState::Succeeded {
            return Ok(decided);
        }
        Ok(match queue.operation_status(id) {
            OperationStatus::Unset => ProposalState::Succeeded,
            OperationStatus::Waiting | OperationStatus::Ready => ProposalState::Queued,
            OperationStatus::Done => ProposalState::Executed,
            OperationStatus::Expired => ProposalState::Expired,
        })
    }

    /// Hand a succeeded proposal to the execution queue.
    pub fn queue(
        &mut self,
        tally: &dyn VoteTally,
        queue: &mut dyn ExecutionQueue,
        payload: &ProposalPayload,
    ) -> Result<ProposalId, GovernanceError> {
        payload.check()?;
        let id = payload.id()?;
        self.ensure_resolved(tally, &id)?;
        let state = self.state(tally, &*queue, &id)?;
        if state != ProposalState::Succeeded {
            return Err(GovernanceError::NotSuccessful { id, state });
        }
        queue.schedule(id, payload)?;

        tracing::info!(proposal = %id, "proposal queued");
        self.events.emit(GovernanceEvent::ProposalQueued { id });
        Ok(id)
    }

    /// Execute a queued proposal whose delay has elapsed.
    ///
    /// Self-calls are applied to the commission with the executor as caller;
    /// they are staged on a copy and committed only if all of them succeed.
    /// The remaining calls are returned for the host to dispatch.
    pub fn execute(
        &mut self,
        tally: &dyn VoteTally,
        queue: &mut dyn ExecutionQueue,
        payload: &ProposalPayload,
    ) -> Result<Vec<ProposalCall>, GovernanceError> {
        payload.check()?;
        let id = payload.id()?;
        self.ensure_resolved(tally, &id)?;
        let state = self.state(tally, &*queue, &id)?;
        if state != ProposalState::Queued || queue.operation_status(&id) != OperationStatus::Ready {
            return Err(GovernanceError::NotReady { id, state });
        }

        let mut staged = self.commission.clone();
        let mut changes = Vec::new();
        let mut external = Vec::new();
        for call in payload.calls() {
            if call.target == self.address {
                let governed = GovernorCall::decode(&call.calldata)?;
                changes.push(apply_to(&mut staged, governed)?);
            } else {
                external.push(call);
            }
        }
        queue.mark_executed(&id)?;
        self.commission = staged;

        for change in changes {
            self.record_change(change);
        }
        tracing::info!(proposal = %id, external_calls = external.len(), "proposal executed");
        self.events.emit(GovernanceEvent::ProposalExecuted { id });
        Ok(external)
    }

    /// Apply a governed call directly. Only the executor may do this.
    pub fn apply_call(
        &mut self,
        caller: &WalletAddress,
        call: GovernorCall,
    ) -> Result<(), GovernanceError> {
        if caller != &self.executor {
            return Err(GovernanceError::OnlyGovernance(caller.clone()));
        }
        let change = apply_to(&mut self.commission, call)?;
        self.record_change(change);
        Ok(())
    }

    /// Closed proposals must be settled by the vote or by an accepted
    /// commission decision before they can be queued or executed.
    fn ensure_resolved(
        &self,
        tally: &dyn VoteTally,
        id: &ProposalId,
    ) -> Result<(), GovernanceError> {
        if tally.phase(id).is_none() {
            return Err(GovernanceError::UnknownProposal(*id));
        }
        if tally.voting_closed(id)
            && !self.no_need_in_validation(tally, id)
            && !self.successful_commission_gathering(id)
        {
            return Err(GovernanceError::ValidationRequired(*id));
        }
        Ok(())
    }

    fn record_change(&mut self, change: CommissionChange) {
        tracing::info!(?change, "commission changed");
        self.events.emit(change.into());
    }
}

/// Vote-path outcome of a closed proposal.
fn vote_outcome(tally: &dyn VoteTally, id: &ProposalId) -> ProposalState {
    let votes = tally.proposal_votes(id).unwrap_or_default();
    if tally.quorum_reached(id) && votes.for_votes > votes.against {
        ProposalState::Succeeded
    } else {
        ProposalState::Defeated
    }
}

fn apply_to(
    registry: &mut CommissionRegistry,
    call: GovernorCall,
) -> Result<CommissionChange, GovernanceError> {
    match call {
        GovernorCall::AddCommissionMember(member) => registry.add_member(member),
        GovernorCall::RemoveCommissionMember(member) => registry.remove_member(&member),
        GovernorCall::SetRequiredSignatures(required) => registry.set_required_signatures(required),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::sign_decision;
    use crate::external::{ProposalVotes, QueueError};
    use qdao_crypto::{derive_address, keypair_from_seed};
    use qdao_types::KeyPair;

    /// Fixed tally answers for a single proposal.
    struct FixedTally {
        phase: Option<VotingPhase>,
        votes: ProposalVotes,
        quorum: bool,
    }

    impl FixedTally {
        fn closed(quorum: bool, for_votes: u128, against: u128) -> Self {
            Self {
                phase: Some(VotingPhase::Closed),
                votes: ProposalVotes {
                    against,
                    for_votes,
                    abstain: 0,
                },
                quorum,
            }
        }
    }

    impl VoteTally for FixedTally {
        fn phase(&self, _id: &ProposalId) -> Option<VotingPhase> {
            self.phase
        }

        fn proposal_votes(&self, _id: &ProposalId) -> Option<ProposalVotes> {
            self.phase.map(|_| self.votes)
        }

        fn quorum_reached(&self, _id: &ProposalId) -> bool {
            self.quorum
        }
    }

    #[derive(Default)]
    struct FixedQueue {
        status: Option<OperationStatus>,
    }

    impl ExecutionQueue for FixedQueue {
        fn operation_status(&self, _id: &ProposalId) -> OperationStatus {
            self.status.unwrap_or(OperationStatus::Unset)
        }

        fn schedule(
            &mut self,
            id: ProposalId,
            _payload: &ProposalPayload,
        ) -> Result<(), QueueError> {
            if self.status.is_some() {
                return Err(QueueError::AlreadyScheduled(id));
            }
            self.status = Some(OperationStatus::Ready);
            Ok(())
        }

        fn mark_executed(&mut self, id: &ProposalId) -> Result<(), QueueError> {
            match self.status {
                Some(OperationStatus::Ready) => {
                    self.status = Some(OperationStatus::Done);
                    Ok(())
                }
                _ => Err(QueueError::NotReady(*id)),
            }
        }
    }

    fn members() -> Vec<KeyPair> {
        (1..=4).map(|i| keypair_from_seed(&[i; 32])).collect()
    }

    fn governor(keys: &[KeyPair]) -> Governor {
        let registry = CommissionRegistry::new(
            keys.iter().map(|k| derive_address(&k.public)).collect(),
            WalletAddress::new("qdao_source"),
            3,
        )
        .unwrap();
        Governor::new(
            WalletAddress::new("qdao_governor"),
            WalletAddress::new("qdao_timelock"),
            registry,
        )
    }

    fn source() -> WalletAddress {
        WalletAddress::new("qdao_source")
    }

    fn payload() -> ProposalPayload {
        ProposalPayload::single(WalletAddress::new("qdao_unit"), b"state".to_vec(), "p")
    }

    fn approvals(keys: &[KeyPair], id: &ProposalId) -> Vec<CommissionSignature> {
        keys.iter()
            .map(|k| sign_decision(k, id, CommissionDecision::Approved))
            .collect()
    }

    #[test]
    fn validate_unknown_and_open_proposals_fail() {
        let keys = members();
        let mut gov = governor(&keys);
        let id = payload().id().unwrap();
        let unknown = FixedTally {
            phase: None,
            votes: ProposalVotes::default(),
            quorum: false,
        };
        assert_eq!(
            gov.validate(&unknown, &id),
            Err(GovernanceError::UnknownProposal(id))
        );
        let active = FixedTally {
            phase: Some(VotingPhase::Active),
            ..FixedTally::closed(false, 0, 0)
        };
        assert_eq!(
            gov.validate(&active, &id),
            Err(GovernanceError::VotingNotClosed(id))
        );
        assert!(gov.record(&id).is_none());
    }

    #[test]
    fn validate_is_idempotent() {
        let keys = members();
        let mut gov = governor(&keys);
        let id = payload().id().unwrap();
        let tally = FixedTally::closed(false, 5, 1);
        gov.validate(&tally, &id).unwrap();
        let events = gov.events().len();
        let record = gov.record(&id).cloned();
        gov.validate(&tally, &id).unwrap();
        assert_eq!(gov.events().len(), events);
        assert_eq!(gov.record(&id).cloned(), record);
        assert!(gov.is_commission_needed(&tally, &id));
    }

    #[test]
    fn quorum_reached_for_majority_succeeds_without_gathering() {
        let keys = members();
        let mut gov = governor(&keys);
        let id = payload().id().unwrap();
        let tally = FixedTally::closed(true, 10, 3);
        gov.validate(&tally, &id).unwrap();
        let record = gov.record(&id).unwrap();
        assert!(!record.crisis_required);
        assert!(record.gathering.is_none());
        assert!(gov.no_need_in_validation(&tally, &id));
        assert_eq!(
            gov.state(&tally, &FixedQueue::default(), &id).unwrap(),
            ProposalState::Succeeded
        );
    }

    #[test]
    fn quorum_reached_tie_is_defeated() {
        let keys = members();
        let mut gov = governor(&keys);
        let id = payload().id().unwrap();
        let tally = FixedTally::closed(true, 3, 3);
        gov.validate(&tally, &id).unwrap();
        assert_eq!(
            gov.state(&tally, &FixedQueue::default(), &id).unwrap(),
            ProposalState::Defeated
        );
    }

    #[test]
    fn no_quorum_majority_for_is_still_defeated_until_commission() {
        let keys = members();
        let mut gov = governor(&keys);
        let id = payload().id().unwrap();
        let tally = FixedTally::closed(false, 9, 0);
        gov.validate(&tally, &id).unwrap();
        let queue = FixedQueue::default();
        assert_eq!(gov.state(&tally, &queue, &id).unwrap(), ProposalState::Defeated);

        let sigs = approvals(&keys[..3], &id);
        gov.submit(&tally, &source(), &id, CommissionDecision::Approved, &sigs)
            .unwrap();
        assert_eq!(gov.state(&tally, &queue, &id).unwrap(), ProposalState::Succeeded);
        assert!(gov.successful_commission_gathering(&id));
    }

    #[test]
    fn pending_decision_is_rejected() {
        let keys = members();
        let mut gov = governor(&keys);
        let id = payload().id().unwrap();
        let tally = FixedTally::closed(false, 0, 0);
        gov.validate(&tally, &id).unwrap();
        let sigs: Vec<_> = keys
            .iter()
            .map(|k| sign_decision(k, &id, CommissionDecision::Pending))
            .collect();
        assert_eq!(
            gov.submit(&tally, &source(), &id, CommissionDecision::Pending, &sigs),
            Err(GovernanceError::InvalidDecision)
        );
    }

    #[test]
    fn unauthorized_submitter_checked_first() {
        let keys = members();
        let mut gov = governor(&keys);
        let id = payload().id().unwrap();
        let tally = FixedTally::closed(true, 1, 0);
        let stranger = WalletAddress::new("qdao_stranger");
        assert_eq!(
            gov.submit(&tally, &stranger, &id, CommissionDecision::Approved, &[]),
            Err(GovernanceError::UnauthorizedSubmitter(stranger))
        );
    }

    #[test]
    fn queue_and_execute_blend_state() {
        let keys = members();
        let mut gov = governor(&keys);
        let payload = payload();
        let id = payload.id().unwrap();
        let tally = FixedTally::closed(true, 4, 1);
        let mut queue = FixedQueue::default();

        assert_eq!(gov.queue(&tally, &mut queue, &payload).unwrap(), id);
        assert_eq!(gov.state(&tally, &queue, &id).unwrap(), ProposalState::Queued);
        let calls = gov.execute(&tally, &mut queue, &payload).unwrap();
        assert_eq!(calls, payload.calls());
        assert_eq!(gov.state(&tally, &queue, &id).unwrap(), ProposalState::Executed);
        assert!(matches!(
            gov.execute(&tally, &mut queue, &payload),
            Err(GovernanceError::NotReady { .. })
        ));
    }

    #[test]
    fn self_calls_are_atomic() {
        let keys = members();
        let mut gov = governor(&keys);
        let newcomer = WalletAddress::new("qdao_newcomer");
        let existing = derive_address(&keys[0].public);
        let payload = ProposalPayload::new(
            vec![gov.address().clone(), gov.address().clone()],
            vec![0, 0],
            vec![
                GovernorCall::AddCommissionMember(newcomer.clone()).encode().unwrap(),
                GovernorCall::AddCommissionMember(existing.clone()).encode().unwrap(),
            ],
            "add twice",
        );
        let tally = FixedTally::closed(true, 4, 1);
        let mut queue = FixedQueue::default();
        gov.queue(&tally, &mut queue, &payload).unwrap();
        assert_eq!(
            gov.execute(&tally, &mut queue, &payload),
            Err(GovernanceError::InvalidMembership(existing))
        );
        assert!(!gov.commission().is_member(&newcomer));
        assert_eq!(queue.operation_status(&payload.id().unwrap()), OperationStatus::Ready);
    }

    #[test]
    fn apply_call_requires_executor() {
        let keys = members();
        let mut gov = governor(&keys);
        let outsider = WalletAddress::new("qdao_outsider");
        assert_eq!(
            gov.apply_call(&outsider, GovernorCall::SetRequiredSignatures(2)),
            Err(GovernanceError::OnlyGovernance(outsider))
        );
        let executor = gov.executor().clone();
        gov.apply_call(&executor, GovernorCall::SetRequiredSignatures(2))
            .unwrap();
        assert_eq!(gov.commission().required_signatures(), 2);
        assert_eq!(
            gov.events().last(),
            Some(&GovernanceEvent::RequiredSignaturesChanged { old: 3, new: 2 })
        );
    }

    #[test]
    fn from_config_builds_governor() {
        let keys = members();
        let addrs: Vec<_> = keys.iter().map(|k| derive_address(&k.public)).collect();
        let config = GovernorConfig::new(
            &WalletAddress::new("qdao_governor"),
            &WalletAddress::new("qdao_timelock"),
            &addrs,
            &addrs[0],
            2,
        );
        let gov = Governor::from_config(&config).unwrap();
        assert_eq!(gov.commission().address_count(), 4);
        assert_eq!(gov.commission().decision_source(), &addrs[0]);
    }
}
