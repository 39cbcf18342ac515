//! Nullable infrastructure for deterministic testing.
//!
//! The governor consumes its vote module and timelock through the
//! [`qdao_governance::VoteTally`] and [`qdao_governance::ExecutionQueue`] traits.
//! This crate provides in-memory implementations that:
//! - Advance only when a test mines blocks
//! - Can be driven programmatically (weights, votes, cancellation)
//! - Never touch the filesystem or network
//!
//! Usage: build one [`NullClock`], share it between the tally and the
//! timelock, and pass both into the governor's operations.

pub mod clock;
pub mod tally;
pub mod target;
pub mod timelock;

pub use clock::NullClock;
pub use tally::{NullVoteTally, TallyError, VoteType};
pub use target::NullTarget;
pub use timelock::NullTimelock;
