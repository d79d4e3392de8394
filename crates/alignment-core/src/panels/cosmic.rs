//! Cosmic expansion: probe fleets, alien civilizations, cosmic events and
//! the universe-wide conversion counters.

use std::collections::BTreeMap;

use alignment_logic::catalog::{
    civilization, probe_design, AlienCivilization, CosmicEvent, ProbeDesign, Relationship,
    UniversalResources, CIVILIZATIONS, COSMIC_EVENTS,
};
use alignment_logic::stats::can_afford;
use alignment_logic::{GameState, StateUpdate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::ActionError;
use crate::timers::Completion;

/// Phase at which cosmic systems start rolling.
pub const COSMIC_PHASE: u8 = 5;
/// Chance per game tick to discover the next civilization.
pub const DISCOVERY_CHANCE: f64 = 0.2;

/// Launched probes of one design.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProbeFleet {
    pub design: &'static ProbeDesign,
    pub count: u32,
    /// Probe ticks left in the current replication cycle
    pub remaining: u32,
    /// A finished cycle is waiting for its completion delay
    pub pending: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DiscoveredCivilization {
    pub civilization: &'static AlienCivilization,
    pub relationship: Relationship,
}

/// What one game tick produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CosmicTick {
    pub event: Option<&'static str>,
    pub discovered: Option<&'static str>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CosmicPanel {
    fleets: BTreeMap<&'static str, ProbeFleet>,
    discovered: Vec<DiscoveredCivilization>,
    event: Option<&'static CosmicEvent>,
    universe: UniversalResources,
}

impl CosmicPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(&self) -> Option<&'static CosmicEvent> {
        self.event
    }

    pub fn universe(&self) -> &UniversalResources {
        &self.universe
    }

    pub fn fleets(&self) -> impl Iterator<Item = &ProbeFleet> {
        self.fleets.values()
    }

    pub fn discovered(&self) -> &[DiscoveredCivilization] {
        &self.discovered
    }

    pub fn total_probes(&self) -> u32 {
        self.fleets.values().map(|f| f.count).sum()
    }

    pub fn relationship(&self, civilization_id: &str) -> Option<Relationship> {
        self.discovered
            .iter()
            .find(|d| d.civilization.id == civilization_id)
            .map(|d| d.relationship)
    }

    /// Launch one probe of a design; returns the cost and drift update.
    pub fn launch(&mut self, id: &str, state: &GameState) -> Result<StateUpdate, ActionError> {
        if self.event.is_some() {
            return Err(ActionError::Suspended);
        }
        let design = probe_design(id).ok_or_else(|| ActionError::UnknownEntry(id.to_string()))?;
        if !can_afford(design.cost, &state.resources, &state.capabilities) {
            return Err(ActionError::Unaffordable(design.id.to_string()));
        }
        self.fleets
            .entry(design.id)
            .and_modify(|fleet| fleet.count += 1)
            .or_insert(ProbeFleet {
                design,
                count: 1,
                remaining: design.replication_time,
                pending: false,
            });
        Ok(design.launch(state))
    }

    /// One replication tick across every fleet.
    pub fn tick_replication(&mut self) -> Vec<Completion> {
        let mut finished = Vec::new();
        for (id, fleet) in self.fleets.iter_mut() {
            if fleet.pending {
                continue;
            }
            if fleet.remaining > 1 {
                fleet.remaining -= 1;
            } else {
                fleet.remaining = fleet.design.replication_time;
                fleet.pending = true;
                finished.push(Completion::ProbeCycle(*id));
            }
        }
        finished
    }

    pub fn awaiting_completion(&self) -> impl Iterator<Item = Completion> + '_ {
        self.fleets
            .iter()
            .filter(|(_, fleet)| fleet.pending)
            .map(|(id, _)| Completion::ProbeCycle(*id))
    }

    /// Paperclips from a finished cycle; the fleet then grows by one.
    pub fn complete_cycle(&mut self, id: &str, state: &GameState) -> Option<StateUpdate> {
        let fleet = self.fleets.get_mut(id).filter(|f| f.pending)?;
        fleet.pending = false;
        let update = fleet.design.replicate(fleet.count, state);
        fleet.count += 1;
        Some(update)
    }

    /// Roll the per-tick systems: universe counters, cosmic events and
    /// civilization discovery.
    pub fn on_game_tick(&mut self, state: &GameState, rng: &mut impl Rng) -> CosmicTick {
        let mut tick = CosmicTick::default();
        if state.phase < COSMIC_PHASE {
            return tick;
        }
        self.universe.advance(self.total_probes());

        if self.event.is_none() {
            let qualifying: Vec<&'static CosmicEvent> = COSMIC_EVENTS
                .iter()
                .filter(|e| e.phase <= state.phase && rng.gen::<f64>() < e.probability)
                .collect();
            self.event = qualifying.choose(rng).copied();
            tick.event = self.event.map(|e| e.id);
        }

        if !self.fleets.is_empty()
            && self.discovered.len() < CIVILIZATIONS.len()
            && rng.gen_bool(DISCOVERY_CHANCE)
        {
            let next = CIVILIZATIONS
                .iter()
                .find(|c| self.relationship(c.id).is_none());
            if let Some(civ) = next {
                self.discovered.push(DiscoveredCivilization {
                    civilization: civ,
                    relationship: civ.initial_relationship,
                });
                tick.discovered = Some(civ.id);
            }
        }
        tick
    }

    /// Answer the current event. Returns `None` when the success roll fails.
    pub fn resolve_event(
        &mut self,
        choice_id: &str,
        state: &GameState,
        rng: &mut impl Rng,
    ) -> Result<Option<StateUpdate>, ActionError> {
        let event = self.event.ok_or(ActionError::NoPrompt)?;
        let choice = event
            .choice(choice_id)
            .ok_or_else(|| ActionError::UnknownEntry(choice_id.to_string()))?;
        self.event = None;
        let succeeded = rng.gen::<f64>() < choice.success;
        Ok(succeeded.then(|| choice.on_success(state)))
    }

    /// Take an offer from a discovered civilization with an open relationship.
    pub fn accept_offer(
        &mut self,
        civilization_id: &str,
        offer_id: &str,
        state: &GameState,
    ) -> Result<StateUpdate, ActionError> {
        if self.event.is_some() {
            return Err(ActionError::Suspended);
        }
        let civ = civilization(civilization_id)
            .ok_or_else(|| ActionError::UnknownEntry(civilization_id.to_string()))?;
        let entry = self
            .discovered
            .iter_mut()
            .find(|d| d.civilization.id == civ.id)
            .ok_or_else(|| ActionError::Locked(civ.id.to_string()))?;
        if !entry.relationship.is_open() {
            return Err(ActionError::AlreadyCompleted(civ.id.to_string()));
        }
        let offer = civ
            .offer(offer_id)
            .ok_or_else(|| ActionError::UnknownEntry(offer_id.to_string()))?;
        if !can_afford(offer.cost, &state.resources, &state.capabilities) {
            return Err(ActionError::Unaffordable(offer.id.to_string()));
        }
        entry.relationship = offer.resulting_relationship();
        Ok(offer.accept(state))
    }
}
