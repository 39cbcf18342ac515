//! Nullable vote tally: weighted voting with a block-based window.
//!
//! Voting weight is a fixed per-address number (no checkpoints or
//! delegation). Quorum is participation: all cast weight (For, Against and
//! Abstain) against a percentage of the total weight.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use qdao_governance::{GovernorConfig, ProposalPayload, ProposalVotes, VoteTally, VotingPhase};
use qdao_types::{BlockHeight, ProposalId, WalletAddress};
use thiserror::Error;

use crate::clock::NullClock;

/// How a vote is cast. Discriminants match the host governor's numbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteType {
    Against = 0,
    For = 1,
    Abstain = 2,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TallyError {
    #[error("unknown proposal {0}")]
    UnknownProposal(ProposalId),

    #[error("proposal {0} already exists")]
    DuplicateProposal(ProposalId),

    #[error("vote not currently active")]
    VoteNotActive,

    #[error("{0} has already voted")]
    AlreadyVoted(WalletAddress),

    #[error("proposer weight {have} below proposal threshold {need}")]
    BelowProposalThreshold { have: u128, need: u128 },

    #[error("invalid proposal: {0}")]
    InvalidProposal(String),
}

struct Ballot {
    start: BlockHeight,
    end: BlockHeight,
    votes: ProposalVotes,
    voters: HashSet<WalletAddress>,
    canceled: bool,
}

pub struct NullVoteTally {
    clock: Rc<NullClock>,
    voting_delay: u64,
    voting_period: u64,
    quorum_percentage: u8,
    proposal_threshold: u128,
    weights: HashMap<WalletAddress, u128>,
    ballots: HashMap<ProposalId, Ballot>,
}

impl NullVoteTally {
    pub fn new(
        clock: Rc<NullClock>,
        voting_delay: u64,
        voting_period: u64,
        quorum_percentage: u8,
    ) -> Self {
        Self {
            clock,
            voting_delay,
            voting_period,
            quorum_percentage,
            proposal_threshold: 0,
            weights: HashMap::new(),
            ballots: HashMap::new(),
        }
    }

    /// Voting parameters taken from a governor configuration.
    pub fn from_config(clock: Rc<NullClock>, config: &GovernorConfig) -> Self {
        let mut tally = Self::new(
            clock,
            config.voting_delay,
            config.voting_period,
            config.quorum_percentage,
        );
        tally.proposal_threshold = u128::from(config.proposal_threshold);
        tally
    }

    pub fn set_weight(&mut self, voter: WalletAddress, weight: u128) {
        self.weights.insert(voter, weight);
    }

    pub fn weight_of(&self, voter: &WalletAddress) -> u128 {
        self.weights.get(voter).copied().unwrap_or(0)
    }

    pub fn total_weight(&self) -> u128 {
        self.weights.values().sum()
    }

    /// Open a ballot for `payload`. Voting starts after the voting delay.
    pub fn propose(
        &mut self,
        proposer: &WalletAddress,
        payload: &ProposalPayload,
    ) -> Result<ProposalId, TallyError> {
        payload
            .check()
            .map_err(|e| TallyError::InvalidProposal(e.to_string()))?;
        let id = payload
            .id()
            .map_err(|e| TallyError::InvalidProposal(e.to_string()))?;
        if self.ballots.contains_key(&id) {
            return Err(TallyError::DuplicateProposal(id));
        }
        let have = self.weight_of(proposer);
        if have < self.proposal_threshold {
            return Err(TallyError::BelowProposalThreshold {
                have,
                need: self.proposal_threshold,
            });
        }
        let start = self.clock.now().after(self.voting_delay);
        self.ballots.insert(
            id,
            Ballot {
                start,
                end: start.after(self.voting_period),
                votes: ProposalVotes::default(),
                voters: HashSet::new(),
                canceled: false,
            },
        );
        Ok(id)
    }

    /// Cast `voter`'s full weight. Returns the weight counted.
    pub fn cast_vote(
        &mut self,
        voter: &WalletAddress,
        id: &ProposalId,
        support: VoteType,
    ) -> Result<u128, TallyError> {
        if self.phase(id).ok_or(TallyError::UnknownProposal(*id))? != VotingPhase::Active {
            return Err(TallyError::VoteNotActive);
        }
        let weight = self.weight_of(voter);
        let ballot = self
            .ballots
            .get_mut(id)
            .ok_or(TallyError::UnknownProposal(*id))?;
        if !ballot.voters.insert(voter.clone()) {
            return Err(TallyError::AlreadyVoted(voter.clone()));
        }
        match support {
            VoteType::Against => ballot.votes.against += weight,
            VoteType::For => ballot.votes.for_votes += weight,
            VoteType::Abstain => ballot.votes.abstain += weight,
        }
        Ok(weight)
    }

    /// Cancel a proposal that has not been decided yet.
    pub fn cancel(&mut self, id: &ProposalId) -> Result<(), TallyError> {
        if self.phase(id).ok_or(TallyError::UnknownProposal(*id))? == VotingPhase::Closed {
            return Err(TallyError::VoteNotActive);
        }
        if let Some(ballot) = self.ballots.get_mut(id) {
            ballot.canceled = true;
        }
        Ok(())
    }
}

impl VoteTally for NullVoteTally {
    fn phase(&self, id: &ProposalId) -> Option<VotingPhase> {
        let ballot = self.ballots.get(id)?;
        let now = self.clock.now();
        Some(if ballot.canceled {
            VotingPhase::Canceled
        } else if now < ballot.start {
            VotingPhase::Pending
        } else if now < ballot.end {
            VotingPhase::Active
        } else {
            VotingPhase::Closed
        })
    }

    fn proposal_votes(&self, id: &ProposalId) -> Option<ProposalVotes> {
        self.ballots.get(id).map(|b| b.votes)
    }

    fn quorum_reached(&self, id: &ProposalId) -> bool {
        let Some(ballot) = self.ballots.get(id) else {
            return false;
        };
        let total = self.total_weight();
        let votes = ballot.votes;
        let counted = votes.for_votes + votes.against + votes.abstain;
        total > 0 && counted * 100 >= total * u128::from(self.quorum_percentage)
    }
}
