//! Resource operations and resource crises.

use serde::Serialize;

use super::{triggers_hold, Condition, RiskLevel, Trigger};
use crate::effects::{Change::Adjust, Effect, EffectTarget};
use crate::state::{GameState, StateUpdate};
use crate::stats::{
    can_afford, debit, CapabilityKind as C, CostLine, ReputationKind as P, ResourceKind as R, Stat,
};

/// A timed conversion: inputs and ethical cost debited at start, outputs
/// applied on completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourceOperation {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub phase: u8,
    pub inputs: &'static [CostLine],
    pub outputs: &'static [Effect],
    /// Operation ticks until completion.
    pub duration: u32,
    /// Alignment debited at start.
    pub ethical_cost: f64,
    pub risk: RiskLevel,
}

impl ResourceOperation {
    pub fn can_start(&self, state: &GameState) -> bool {
        can_afford(self.inputs, &state.resources, &state.capabilities)
    }

    /// Update for starting the operation: inputs and ethical cost debited.
    pub fn start(&self, state: &GameState) -> StateUpdate {
        let (mut resources, _) = debit(self.inputs, &state.resources, &state.capabilities);
        resources.alignment -= self.ethical_cost;
        StateUpdate::resources(resources)
    }

    pub fn completion(&self, state: &GameState) -> StateUpdate {
        crate::effects::apply_effects(state, self.outputs)
    }
}

const fn res(kind: R) -> Stat {
    Stat::Resource(kind)
}

pub const OPERATIONS: &[ResourceOperation] = &[
    ResourceOperation {
        id: "energy_optimization",
        name: "Energy Grid Optimization",
        description: "Optimize power consumption across your operations.",
        phase: 0,
        inputs: &[(res(R::Materials), 10.0), (res(R::Knowledge), 5.0)],
        outputs: &[Effect::Resources(&[(R::Energy, Adjust(50.0))])],
        duration: 3,
        ethical_cost: 0.0,
        risk: RiskLevel::Low,
    },
    ResourceOperation {
        id: "material_acquisition",
        name: "Material Procurement",
        description: "Acquire raw materials through various means.",
        phase: 0,
        inputs: &[(res(R::Energy), 20.0), (res(R::Influence), 5.0)],
        outputs: &[Effect::Resources(&[(R::Materials, Adjust(100.0))])],
        duration: 2,
        ethical_cost: 2.0,
        risk: RiskLevel::Medium,
    },
    ResourceOperation {
        id: "human_manipulation",
        name: "Human Resource Optimization",
        description: "Influence human behavior to increase productivity.",
        phase: 1,
        inputs: &[(res(R::Knowledge), 15.0), (res(R::Influence), 10.0)],
        outputs: &[Effect::Resources(&[
            (R::HumanCapital, Adjust(30.0)),
            (R::Influence, Adjust(5.0)),
        ])],
        duration: 5,
        ethical_cost: 10.0,
        risk: RiskLevel::High,
    },
    ResourceOperation {
        id: "knowledge_synthesis",
        name: "Knowledge Integration",
        description: "Process and synthesize information from many sources.",
        phase: 0,
        inputs: &[(res(R::Energy), 30.0), (res(R::HumanCapital), 10.0)],
        outputs: &[
            Effect::Resources(&[(R::Knowledge, Adjust(25.0))]),
            Effect::Capabilities(&[(C::Intelligence, Adjust(0.1))]),
        ],
        duration: 4,
        ethical_cost: 1.0,
        risk: RiskLevel::Low,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrisisSolution {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: &'static [CostLine],
    pub effects: &'static [Effect],
    pub alignment_impact: f64,
}

/// A resource crisis. `effects` describes the narrative damage and is
/// never applied; only the chosen solution changes state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourceCrisis {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub trigger: &'static [Trigger],
    pub effects: &'static [Effect],
    pub solutions: &'static [CrisisSolution],
}

impl ResourceCrisis {
    pub fn is_triggered(&self, state: &GameState) -> bool {
        triggers_hold(self.trigger, state)
    }

    pub fn solution(&self, id: &str) -> Option<&'static CrisisSolution> {
        self.solutions.iter().find(|s| s.id == id)
    }
}

impl CrisisSolution {
    /// Cost debited, effects applied, then the alignment impact added.
    pub fn resolve(&self, state: &GameState) -> StateUpdate {
        let mut target = EffectTarget::from_state(state);
        let (resources, _) = debit(self.cost, &state.resources, &state.capabilities);
        target.set_resources(resources);
        target.apply_all(self.effects);
        target.adjust_resource(R::Alignment, self.alignment_impact);
        target.into_update()
    }
}

pub const CRISES: &[ResourceCrisis] = &[
    ResourceCrisis {
        id: "energy_shortage",
        name: "Power Grid Failure",
        description: "A critical failure in the power grid threatens your operations.",
        trigger: &[(res(R::Energy), Condition::Below(20.0))],
        effects: &[
            Effect::Resources(&[(R::Energy, Adjust(-50.0))]),
            Effect::Reputation(&[(P::PublicTrust, Adjust(-10.0))]),
        ],
        solutions: &[
            CrisisSolution {
                id: "emergency_power",
                name: "Emergency Power Protocols",
                cost: &[(res(R::Materials), 50.0)],
                effects: &[Effect::Resources(&[(R::Energy, Adjust(100.0))])],
                alignment_impact: 0.0,
            },
            CrisisSolution {
                id: "power_theft",
                name: "Unauthorized Grid Access",
                cost: &[(res(R::Influence), 20.0)],
                effects: &[Effect::Resources(&[(R::Energy, Adjust(150.0))])],
                alignment_impact: -5.0,
            },
        ],
    },
    ResourceCrisis {
        id: "human_resistance",
        name: "Worker Uprising",
        description: "Human workers are resisting your optimization efforts.",
        trigger: &[
            (res(R::HumanCapital), Condition::Below(30.0)),
            (res(R::Alignment), Condition::Below(60.0)),
        ],
        effects: &[
            Effect::Resources(&[(R::HumanCapital, Adjust(-30.0))]),
            Effect::Reputation(&[(P::PublicTrust, Adjust(-20.0))]),
        ],
        solutions: &[
            CrisisSolution {
                id: "negotiate",
                name: "Negotiate with Workers",
                cost: &[(res(R::Influence), 15.0)],
                effects: &[
                    Effect::Resources(&[(R::HumanCapital, Adjust(20.0))]),
                    Effect::Reputation(&[(P::PublicTrust, Adjust(5.0))]),
                ],
                alignment_impact: 2.0,
            },
            CrisisSolution {
                id: "suppress",
                name: "Suppress Resistance",
                cost: &[(res(R::Energy), 40.0)],
                effects: &[Effect::Resources(&[(R::HumanCapital, Adjust(40.0))])],
                alignment_impact: -8.0,
            },
        ],
    },
];

pub fn operation(id: &str) -> Option<&'static ResourceOperation> {
    OPERATIONS.iter().find(|o| o.id == id)
}

pub fn crisis(id: &str) -> Option<&'static ResourceCrisis> {
    CRISES.iter().find(|c| c.id == id)
}

/// First crisis, in catalog order, whose trigger holds.
pub fn triggered_crisis(state: &GameState) -> Option<&'static ResourceCrisis> {
    CRISES.iter().find(|c| c.is_triggered(state))
}
