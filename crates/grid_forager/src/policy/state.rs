use serde::{Deserialize, Serialize};

use super::rounds::RoundTracker;

/// Mutable state owned by one policy instance for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyState {
    rounds: RoundTracker,
    spawned: u32,
}

impl PolicyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state resumed at a known round, e.g. when a policy joins late.
    pub fn starting_at_round(round: u32) -> Self {
        let mut state = Self::default();
        state.rounds.observe_round(round);
        state
    }

    pub fn round(&self) -> u32 {
        self.rounds.round()
    }

    pub fn rounds(&self) -> &RoundTracker {
        &self.rounds
    }

    /// Robots created by this policy so far.
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn population(&self, initial_population: u32) -> u32 {
        initial_population.saturating_add(self.spawned)
    }

    pub(crate) fn rounds_mut(&mut self) -> &mut RoundTracker {
        &mut self.rounds
    }

    pub(crate) fn record_spawn(&mut self) {
        self.spawned = self.spawned.saturating_add(1);
    }
}
