//! Shared fixture: a governor wired to a nullable chain.
//!
//! Ten accounts derived from fixed seeds. Accounts 0..6 form the commission
//! (threshold 3) and account 0 is the decision source. Accounts 6..10 are
//! outsiders.

#![allow(dead_code)]

use std::rc::Rc;

use qdao_crypto::{derive_address, keypair_from_seed};
use qdao_governance::{
    sign_decision, CommissionDecision, CommissionRegistry, CommissionSignature, GovernanceError,
    Governor, GovernorCall, ProposalPayload, ProposalState,
};
use qdao_nullables::{NullClock, NullTarget, NullTimelock, NullVoteTally, VoteType};
use qdao_types::{KeyPair, ProposalId, WalletAddress};

pub const ACCOUNTS: usize = 10;
pub const MEMBERS: usize = 6;
pub const REQUIRED_SIGNATURES: usize = 3;
pub const SUPPLY: u128 = 1_000_000;

pub const VOTING_DELAY: u64 = 1;
pub const VOTING_PERIOD: u64 = 7;
pub const QUORUM_PERCENTAGE: u8 = 4;
pub const MIN_DELAY: u64 = 1;

/// How voting weight is spread over the accounts.
#[derive(Clone, Copy)]
pub enum Distribution {
    /// Account 0 keeps almost everything; the others cannot reach quorum
    /// without it.
    Whale,
    /// Every account holds an equal share.
    Even,
}

pub struct Chain {
    pub clock: Rc<NullClock>,
    pub tally: NullVoteTally,
    pub timelock: NullTimelock,
    pub governor: Governor,
    pub unit: NullTarget,
    pub keys: Vec<KeyPair>,
    pub accounts: Vec<WalletAddress>,
}

impl Chain {
    pub fn new(distribution: Distribution) -> Self {
        qdao_utils::init_test_tracing();

        let keys: Vec<KeyPair> = (0..ACCOUNTS)
            .map(|i| keypair_from_seed(&[i as u8 + 1; 32]))
            .collect();
        let accounts: Vec<WalletAddress> = keys.iter().map(|k| derive_address(&k.public)).collect();

        let clock = NullClock::new(0);
        let mut tally = NullVoteTally::new(
            Rc::clone(&clock),
            VOTING_DELAY,
            VOTING_PERIOD,
            QUORUM_PERCENTAGE,
        );
        let share = match distribution {
            Distribution::Whale => SUPPLY / (ACCOUNTS as u128 * 20),
            Distribution::Even => SUPPLY / ACCOUNTS as u128,
        };
        for account in &accounts[1..] {
            tally.set_weight(account.clone(), share);
        }
        tally.set_weight(accounts[0].clone(), SUPPLY - share * (ACCOUNTS as u128 - 1));

        let executor = WalletAddress::new("qdao_timelock");
        let timelock = NullTimelock::new(executor.clone(), Rc::clone(&clock), MIN_DELAY);
        let commission = CommissionRegistry::new(
            accounts[..MEMBERS].to_vec(),
            accounts[0].clone(),
            REQUIRED_SIGNATURES,
        )
        .expect("valid commission");
        let governor = Governor::new(WalletAddress::new("qdao_governor"), executor, commission);

        Self {
            clock,
            tally,
            timelock,
            governor,
            unit: NullTarget::new(WalletAddress::new("qdao_unit")),
            keys,
            accounts,
        }
    }

    pub fn decision_source(&self) -> WalletAddress {
        self.accounts[0].clone()
    }

    /// Payload changing the unit's state.
    pub fn unit_payload(&self, new_state: &str, description: &str) -> ProposalPayload {
        ProposalPayload::single(
            self.unit.address().clone(),
            NullTarget::encode_change_state(new_state),
            description,
        )
    }

    /// Payload making a governed call on the governor itself.
    pub fn self_call_payload(&self, call: GovernorCall, description: &str) -> ProposalPayload {
        ProposalPayload::single(
            self.governor.address().clone(),
            call.encode().expect("encodable call"),
            description,
        )
    }

    /// Propose and mine into the active window.
    pub fn propose(&mut self, payload: &ProposalPayload) -> ProposalId {
        let id = self
            .tally
            .propose(&self.accounts[0], payload)
            .expect("proposal accepted");
        self.clock.mine(VOTING_DELAY);
        id
    }

    pub fn vote(&mut self, account: usize, id: &ProposalId, support: VoteType) {
        self.tally
            .cast_vote(&self.accounts[account], id, support)
            .expect("vote accepted");
    }

    /// Mine past the end of the voting window.
    pub fn close_voting(&self) {
        self.clock.mine(VOTING_PERIOD);
    }

    /// Propose, cast the given votes and close the window.
    pub fn run_vote(
        &mut self,
        payload: &ProposalPayload,
        votes: &[(usize, VoteType)],
    ) -> ProposalId {
        let id = self.propose(payload);
        for &(account, support) in votes {
            self.vote(account, &id, support);
        }
        self.close_voting();
        id
    }

    pub fn sign(
        &self,
        accounts: impl IntoIterator<Item = usize>,
        id: &ProposalId,
        decision: CommissionDecision,
    ) -> Vec<CommissionSignature> {
        accounts
            .into_iter()
            .map(|i| sign_decision(&self.keys[i], id, decision))
            .collect()
    }

    pub fn validate(&mut self, id: &ProposalId) -> Result<(), GovernanceError> {
        self.governor.validate(&self.tally, id)
    }

    pub fn submit_as(
        &mut self,
        caller: &WalletAddress,
        id: &ProposalId,
        decision: CommissionDecision,
        signatures: &[CommissionSignature],
    ) -> Result<(), GovernanceError> {
        self.governor
            .submit(&self.tally, caller, id, decision, signatures)
    }

    pub fn submit(
        &mut self,
        id: &ProposalId,
        decision: CommissionDecision,
        signatures: &[CommissionSignature],
    ) -> Result<(), GovernanceError> {
        let source = self.decision_source();
        self.submit_as(&source, id, decision, signatures)
    }

    pub fn state(&self, id: &ProposalId) -> ProposalState {
        self.governor
            .state(&self.tally, &self.timelock, id)
            .expect("known proposal")
    }

    pub fn queue(&mut self, payload: &ProposalPayload) -> Result<ProposalId, GovernanceError> {
        self.governor
            .queue(&self.tally, &mut self.timelock, payload)
    }

    /// Execute and dispatch the external calls to the unit.
    pub fn execute(&mut self, payload: &ProposalPayload) -> Result<(), GovernanceError> {
        let calls = self
            .governor
            .execute(&self.tally, &mut self.timelock, payload)?;
        self.unit.dispatch(&calls);
        Ok(())
    }

    /// Queue, wait out the timelock delay and execute.
    pub fn queue_and_execute(&mut self, payload: &ProposalPayload) -> Result<(), GovernanceError> {
        self.queue(payload)?;
        self.clock.mine(MIN_DELAY);
        self.execute(payload)
    }
}

/// Votes that miss quorum under [`Distribution::Whale`]: two against, three
/// abstaining.
pub fn low_turnout() -> Vec<(usize, VoteType)> {
    vec![
        (1, VoteType::Against),
        (2, VoteType::Against),
        (3, VoteType::Abstain),
        (4, VoteType::Abstain),
        (5, VoteType::Abstain),
    ]
}
