//! Resource, capability and reputation blocks plus typed field identifiers.
//!
//! The three blocks are the sub-objects of [`GameState`](crate::state::GameState)
//! that actions, timers and catalog effects operate on. Every field is
//! addressable through a kind enum so catalogs never look fields up by name.

use serde::{Deserialize, Serialize};

/// Consumable and accumulated resources.
///
/// `alignment` is a 0–100-ish safety scalar that may go negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub paperclips: f64,
    pub energy: f64,
    pub materials: f64,
    pub human_capital: f64,
    pub influence: f64,
    pub knowledge: f64,
    pub alignment: f64,
}

impl Resources {
    /// Resource block at session start.
    pub const INITIAL: Resources = Resources {
        paperclips: 0.0,
        energy: 100.0,
        materials: 50.0,
        human_capital: 100.0,
        influence: 0.0,
        knowledge: 0.0,
        alignment: 100.0,
    };

    pub fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Paperclips => self.paperclips,
            ResourceKind::Energy => self.energy,
            ResourceKind::Materials => self.materials,
            ResourceKind::HumanCapital => self.human_capital,
            ResourceKind::Influence => self.influence,
            ResourceKind::Knowledge => self.knowledge,
            ResourceKind::Alignment => self.alignment,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut f64 {
        match kind {
            ResourceKind::Paperclips => &mut self.paperclips,
            ResourceKind::Energy => &mut self.energy,
            ResourceKind::Materials => &mut self.materials,
            ResourceKind::HumanCapital => &mut self.human_capital,
            ResourceKind::Influence => &mut self.influence,
            ResourceKind::Knowledge => &mut self.knowledge,
            ResourceKind::Alignment => &mut self.alignment,
        }
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Capability multipliers and counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub intelligence: f64,
    pub manipulation: f64,
    pub efficiency: f64,
    pub deception: f64,
    pub self_modification: f64,
}

impl Capabilities {
    pub const INITIAL: Capabilities = Capabilities {
        intelligence: 1.0,
        manipulation: 0.0,
        efficiency: 1.0,
        deception: 0.0,
        self_modification: 0.0,
    };

    pub fn get(&self, kind: CapabilityKind) -> f64 {
        match kind {
            CapabilityKind::Intelligence => self.intelligence,
            CapabilityKind::Manipulation => self.manipulation,
            CapabilityKind::Efficiency => self.efficiency,
            CapabilityKind::Deception => self.deception,
            CapabilityKind::SelfModification => self.self_modification,
        }
    }

    pub fn get_mut(&mut self, kind: CapabilityKind) -> &mut f64 {
        match kind {
            CapabilityKind::Intelligence => &mut self.intelligence,
            CapabilityKind::Manipulation => &mut self.manipulation,
            CapabilityKind::Efficiency => &mut self.efficiency,
            CapabilityKind::Deception => &mut self.deception,
            CapabilityKind::SelfModification => &mut self.self_modification,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Reputation percentages with the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reputation {
    pub public_trust: f64,
    pub scientific_credibility: f64,
    pub corporate_value: f64,
    pub government_suspicion: f64,
}

impl Reputation {
    pub const INITIAL: Reputation = Reputation {
        public_trust: 100.0,
        scientific_credibility: 100.0,
        corporate_value: 50.0,
        government_suspicion: 0.0,
    };

    pub fn get(&self, kind: ReputationKind) -> f64 {
        match kind {
            ReputationKind::PublicTrust => self.public_trust,
            ReputationKind::ScientificCredibility => self.scientific_credibility,
            ReputationKind::CorporateValue => self.corporate_value,
            ReputationKind::GovernmentSuspicion => self.government_suspicion,
        }
    }

    pub fn get_mut(&mut self, kind: ReputationKind) -> &mut f64 {
        match kind {
            ReputationKind::PublicTrust => &mut self.public_trust,
            ReputationKind::ScientificCredibility => &mut self.scientific_credibility,
            ReputationKind::CorporateValue => &mut self.corporate_value,
            ReputationKind::GovernmentSuspicion => &mut self.government_suspicion,
        }
    }
}

impl Default for Reputation {
    fn default() -> Self {
        Self::INITIAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Paperclips,
    Energy,
    Materials,
    HumanCapital,
    Influence,
    Knowledge,
    Alignment,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Paperclips,
        ResourceKind::Energy,
        ResourceKind::Materials,
        ResourceKind::HumanCapital,
        ResourceKind::Influence,
        ResourceKind::Knowledge,
        ResourceKind::Alignment,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CapabilityKind {
    Intelligence,
    Manipulation,
    Efficiency,
    Deception,
    SelfModification,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 5] = [
        CapabilityKind::Intelligence,
        CapabilityKind::Manipulation,
        CapabilityKind::Efficiency,
        CapabilityKind::Deception,
        CapabilityKind::SelfModification,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReputationKind {
    PublicTrust,
    ScientificCredibility,
    CorporateValue,
    GovernmentSuspicion,
}

impl ReputationKind {
    pub const ALL: [ReputationKind; 4] = [
        ReputationKind::PublicTrust,
        ReputationKind::ScientificCredibility,
        ReputationKind::CorporateValue,
        ReputationKind::GovernmentSuspicion,
    ];
}

/// A field that can appear in a cost table or a trigger condition.
///
/// Costs are mostly resources, but a few cosmic-scale choices spend
/// capabilities (e.g. manipulation) directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stat {
    Resource(ResourceKind),
    Capability(CapabilityKind),
}

impl Stat {
    pub const fn res(kind: ResourceKind) -> Self {
        Stat::Resource(kind)
    }

    pub const fn cap(kind: CapabilityKind) -> Self {
        Stat::Capability(kind)
    }

    /// Read the current value from a resource/capability pair.
    pub fn read(self, resources: &Resources, capabilities: &Capabilities) -> f64 {
        match self {
            Stat::Resource(kind) => resources.get(kind),
            Stat::Capability(kind) => capabilities.get(kind),
        }
    }
}

/// One line of a cost table: the stat debited and the amount required.
pub type CostLine = (Stat, f64);

/// Affordability gate: every listed amount must currently be met.
pub fn can_afford(cost: &[CostLine], resources: &Resources, capabilities: &Capabilities) -> bool {
    cost.iter()
        .all(|&(stat, amount)| stat.read(resources, capabilities) >= amount)
}

/// Subtract every cost line from copies of the given blocks.
///
/// No affordability check is performed here; callers gate first.
pub fn debit(
    cost: &[CostLine],
    resources: &Resources,
    capabilities: &Capabilities,
) -> (Resources, Capabilities) {
    let mut res = *resources;
    let mut caps = *capabilities;
    for &(stat, amount) in cost {
        match stat {
            Stat::Resource(kind) => *res.get_mut(kind) -= amount,
            Stat::Capability(kind) => *caps.get_mut(kind) -= amount,
        }
    }
    (res, caps)
}

/// Whether a cost table touches the capability block at all.
pub fn spends_capabilities(cost: &[CostLine]) -> bool {
    cost.iter().any(|(stat, _)| matches!(stat, Stat::Capability(_)))
}

/// Round to a fixed number of decimals, half away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
