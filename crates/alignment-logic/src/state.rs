//! The single game state and the partial updates submitted against it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::stats::{Capabilities, Reputation, Resources};

/// Highest phase index; the gate never advances past it.
pub const FINAL_PHASE: u8 = 6;

/// Complete game state. Values are stored as given; nothing here validates
/// ranges or signs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: u8,
    pub resources: Resources,
    pub capabilities: Capabilities,
    pub reputation: Reputation,
    pub unlocked_technologies: BTreeSet<String>,
    pub completed_decisions: BTreeSet<String>,
    pub game_time: u64,
    pub total_paperclips: f64,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            phase: 0,
            resources: Resources::INITIAL,
            capabilities: Capabilities::INITIAL,
            reputation: Reputation::INITIAL,
            unlocked_technologies: BTreeSet::new(),
            completed_decisions: BTreeSet::new(),
            game_time: 0,
            total_paperclips: 0.0,
        }
    }

    pub fn has_technology(&self, id: &str) -> bool {
        self.unlocked_technologies.contains(id)
    }

    pub fn has_completed_decision(&self, id: &str) -> bool {
        self.completed_decisions.contains(id)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// A partial state change. Each `Some` field replaces the whole top-level
/// key when applied; sub-objects are never deep-merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reputation: Option<Reputation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_technologies: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_decisions: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_paperclips: Option<f64>,
}

impl StateUpdate {
    pub fn resources(resources: Resources) -> Self {
        Self {
            resources: Some(resources),
            ..Self::default()
        }
    }

    pub fn phase(phase: u8) -> Self {
        Self {
            phase: Some(phase),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge `later` on top of `self`: any key present in `later` wins.
    pub fn merge(&mut self, later: StateUpdate) {
        if later.phase.is_some() {
            self.phase = later.phase;
        }
        if later.resources.is_some() {
            self.resources = later.resources;
        }
        if later.capabilities.is_some() {
            self.capabilities = later.capabilities;
        }
        if later.reputation.is_some() {
            self.reputation = later.reputation;
        }
        if later.unlocked_technologies.is_some() {
            self.unlocked_technologies = later.unlocked_technologies;
        }
        if later.completed_decisions.is_some() {
            self.completed_decisions = later.completed_decisions;
        }
        if later.game_time.is_some() {
            self.game_time = later.game_time;
        }
        if later.total_paperclips.is_some() {
            self.total_paperclips = later.total_paperclips;
        }
    }

    /// Produce the state that results from applying this update.
    pub fn apply_to(self, state: &GameState) -> GameState {
        let mut next = state.clone();
        if let Some(phase) = self.phase {
            next.phase = phase;
        }
        if let Some(resources) = self.resources {
            next.resources = resources;
        }
        if let Some(capabilities) = self.capabilities {
            next.capabilities = capabilities;
        }
        if let Some(reputation) = self.reputation {
            next.reputation = reputation;
        }
        if let Some(techs) = self.unlocked_technologies {
            next.unlocked_technologies = techs;
        }
        if let Some(decisions) = self.completed_decisions {
            next.completed_decisions = decisions;
        }
        if let Some(game_time) = self.game_time {
            next.game_time = game_time;
        }
        if let Some(total) = self.total_paperclips {
            next.total_paperclips = total;
        }
        next
    }
}
