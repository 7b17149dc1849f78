//! Round bookkeeping inferred from call volume, or adopted from the host.

use serde::{Deserialize, Serialize};

/// Counts decisions and rolls the round over once the whole population has
/// acted. The round number never decreases.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundTracker {
    round: u32,
    actions_this_round: u32,
}

impl RoundTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn actions_this_round(&self) -> u32 {
        self.actions_this_round
    }

    /// Counts one decision. Returns true when this call completed a round.
    ///
    /// `population` is read at call time only, so growth mid-round moves the
    /// threshold for the remaining calls without recounting earlier ones.
    pub fn advance_if_complete(&mut self, population: u32) -> bool {
        self.actions_this_round = self.actions_this_round.saturating_add(1);
        if self.actions_this_round < population.max(1) {
            return false;
        }
        self.actions_this_round = 0;
        self.round = self.round.saturating_add(1);
        true
    }

    /// A robot created this round does not act until the next one; count it
    /// as already done.
    pub fn credit_newcomer(&mut self) {
        self.actions_this_round = self.actions_this_round.saturating_add(1);
    }

    /// Adopts a host-announced round. Stale announcements are ignored.
    pub fn observe_round(&mut self, round: u32) -> bool {
        if round <= self.round {
            return false;
        }
        self.round = round;
        self.actions_this_round = 0;
        true
    }
}
