//! Nullable clock: deterministic block height for testing.

use qdao_types::BlockHeight;
use std::cell::Cell;
use std::rc::Rc;

/// A deterministic block clock.
///
/// The chain only advances when you mine. Shared between the vote tally and
/// the timelock through an `Rc`.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_height: u64) -> Rc<Self> {
        Rc::new(Self {
            current: Cell::new(initial_height),
        })
    }

    /// Current block height.
    pub fn now(&self) -> BlockHeight {
        BlockHeight::new(self.current.get())
    }

    /// Advance by a number of blocks.
    pub fn mine(&self, blocks: u64) {
        self.current.set(self.current.get() + blocks);
    }
}
