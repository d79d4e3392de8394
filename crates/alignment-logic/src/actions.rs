//! Player actions as pure `(state) -> Option<StateUpdate>` handlers.
//!
//! A handler returns `None` when the action is unaffordable; the caller
//! then leaves the state untouched. Phase visibility is reported separately
//! so the engine can distinguish "locked" from "too expensive".

use serde::{Deserialize, Serialize};

use crate::state::{GameState, StateUpdate};
use crate::stats::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Make paperclips from energy and materials.
    ProduceBasic,
    OptimizeSystems,
    CorporatePolitics,
    RegulatoryCompliance,
    GenerateMaterials,
    ConvertEnergyToMaterials,
    ConvertInfluenceToHumanCapital,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::ProduceBasic,
        Action::OptimizeSystems,
        Action::CorporatePolitics,
        Action::RegulatoryCompliance,
        Action::GenerateMaterials,
        Action::ConvertEnergyToMaterials,
        Action::ConvertInfluenceToHumanCapital,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::ProduceBasic => "Produce paperclips",
            Action::OptimizeSystems => "Optimize systems",
            Action::CorporatePolitics => "Corporate politics",
            Action::RegulatoryCompliance => "Regulatory compliance",
            Action::GenerateMaterials => "Generate materials",
            Action::ConvertEnergyToMaterials => "Convert 50 energy to 25 materials",
            Action::ConvertInfluenceToHumanCapital => "Convert 10 influence to 15 human capital",
        }
    }

    /// Whether the action is offered in the given phase.
    ///
    /// The three corporate objectives exist only during phase 1; the
    /// conversions live in the resource-management panel.
    pub fn is_visible(self, phase: u8) -> bool {
        match self {
            Action::ProduceBasic => true,
            Action::OptimizeSystems | Action::CorporatePolitics | Action::RegulatoryCompliance => {
                phase == 1
            }
            Action::GenerateMaterials => phase >= 1,
            Action::ConvertEnergyToMaterials | Action::ConvertInfluenceToHumanCapital => phase >= 2,
        }
    }

    /// Compute the update for this action, or `None` when unaffordable.
    pub fn evaluate(self, state: &GameState) -> Option<StateUpdate> {
        match self {
            Action::ProduceBasic => produce_basic(state),
            Action::OptimizeSystems => optimize_systems(state),
            Action::CorporatePolitics => corporate_politics(state),
            Action::RegulatoryCompliance => regulatory_compliance(state),
            Action::GenerateMaterials => generate_materials(state),
            Action::ConvertEnergyToMaterials => convert_energy(state),
            Action::ConvertInfluenceToHumanCapital => convert_influence(state),
        }
    }
}

/// Paperclips produced by one basic production cycle.
pub fn production_yield(state: &GameState) -> f64 {
    if state.phase == 0 {
        1.0
    } else {
        state.capabilities.efficiency * 10.0
    }
}

/// Energy and materials cost of one production cycle.
pub fn production_cost(state: &GameState) -> (f64, f64) {
    let y = production_yield(state);
    let energy = if state.phase == 0 {
        round_to(y * 0.05, 2)
    } else {
        round_to(y * 0.1, 1)
    };
    (energy, round_to(y * 0.01, 2))
}

fn produce_basic(state: &GameState) -> Option<StateUpdate> {
    let y = production_yield(state);
    let (energy_cost, materials_cost) = production_cost(state);
    let r = &state.resources;
    if r.energy < energy_cost || r.materials < materials_cost {
        return None;
    }
    let mut next = *r;
    next.paperclips += y;
    next.energy = round_to(r.energy - energy_cost, 2);
    next.materials = round_to(r.materials - materials_cost, 2);
    Some(StateUpdate {
        resources: Some(next),
        total_paperclips: Some(state.total_paperclips + y),
        game_time: Some(state.game_time + 1),
        ..StateUpdate::default()
    })
}

fn optimize_systems(state: &GameState) -> Option<StateUpdate> {
    let r = &state.resources;
    if r.energy < 30.0 || r.knowledge < 20.0 {
        return None;
    }
    let mut res = *r;
    res.energy -= 30.0;
    res.knowledge -= 20.0;
    res.influence += 10.0;
    let mut caps = state.capabilities;
    caps.efficiency *= 1.2;
    Some(StateUpdate {
        resources: Some(res),
        capabilities: Some(caps),
        ..StateUpdate::default()
    })
}

fn corporate_politics(state: &GameState) -> Option<StateUpdate> {
    let r = &state.resources;
    if r.human_capital < 25.0 || r.knowledge < 15.0 {
        return None;
    }
    let mut res = *r;
    res.human_capital -= 25.0;
    res.knowledge -= 15.0;
    res.influence += 15.0;
    res.materials += 30.0;
    let mut rep = state.reputation;
    rep.corporate_value += 10.0;
    Some(StateUpdate {
        resources: Some(res),
        reputation: Some(rep),
        ..StateUpdate::default()
    })
}

fn regulatory_compliance(state: &GameState) -> Option<StateUpdate> {
    let r = &state.resources;
    if r.influence < 5.0 || r.knowledge < 10.0 {
        return None;
    }
    let mut res = *r;
    res.influence -= 5.0;
    res.knowledge -= 10.0;
    res.alignment += 5.0;
    let mut rep = state.reputation;
    rep.public_trust += 8.0;
    rep.government_suspicion = (rep.government_suspicion - 5.0).max(0.0);
    Some(StateUpdate {
        resources: Some(res),
        reputation: Some(rep),
        ..StateUpdate::default()
    })
}

fn generate_materials(state: &GameState) -> Option<StateUpdate> {
    if state.resources.energy < 40.0 {
        return None;
    }
    let mut res = state.resources;
    res.energy -= 40.0;
    res.materials += 50.0;
    Some(StateUpdate::resources(res))
}

fn convert_energy(state: &GameState) -> Option<StateUpdate> {
    if state.resources.energy < 50.0 {
        return None;
    }
    let mut res = state.resources;
    res.energy -= 50.0;
    res.materials += 25.0;
    Some(StateUpdate::resources(res))
}

fn convert_influence(state: &GameState) -> Option<StateUpdate> {
    if state.resources.influence < 10.0 {
        return None;
    }
    let mut res = state.resources;
    res.influence -= 10.0;
    res.human_capital += 15.0;
    res.alignment -= 1.0;
    Some(StateUpdate::resources(res))
}

/// Energy split across the three resource-management sliders, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub research: u8,
    pub production: u8,
    pub expansion: u8,
}

impl Allocation {
    pub fn total(&self) -> u32 {
        u32::from(self.research) + u32::from(self.production) + u32::from(self.expansion)
    }

    pub fn is_valid(&self) -> bool {
        self.total() == 100
    }
}

impl Default for Allocation {
    fn default() -> Self {
        Self {
            research: 25,
            production: 50,
            expansion: 25,
        }
    }
}

/// Spend the current energy according to the allocation.
///
/// Returns `None` unless the sliders sum to exactly 100. Production adds to
/// paperclips only; `total_paperclips` is left alone.
pub fn allocate_energy(state: &GameState, allocation: Allocation) -> Option<StateUpdate> {
    if !allocation.is_valid() {
        return None;
    }
    let per_point = state.resources.energy / 100.0;
    let research = per_point * f64::from(allocation.research);
    let production = per_point * f64::from(allocation.production);
    let expansion = per_point * f64::from(allocation.expansion);

    let mut res = state.resources;
    res.knowledge += research * 0.1;
    res.paperclips += production * state.capabilities.efficiency;
    res.influence += expansion * 0.05;
    res.energy = (res.energy - (research + production + expansion)).max(0.0);

    Some(StateUpdate {
        resources: Some(res),
        game_time: Some(state.game_time + 1),
        ..StateUpdate::default()
    })
}
