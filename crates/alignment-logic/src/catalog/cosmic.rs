//! Cosmic-scale content: probe designs, alien civilizations, cosmic events
//! and the universe-wide conversion counters.

use serde::Serialize;

use crate::effects::{Change::Adjust, Effect, EffectTarget};
use crate::state::{GameState, StateUpdate};
use crate::stats::{
    debit, spends_capabilities, CapabilityKind as C, CostLine, ResourceKind as R, Stat,
};

/// A von Neumann probe design. Launching debits `cost` and drifts
/// alignment; each completed replication cycle produces paperclips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbeDesign {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: &'static [CostLine],
    /// Operation ticks per replication cycle.
    pub replication_time: u32,
    pub efficiency: f64,
    /// Light years.
    pub range: f64,
    pub paperclip_production: f64,
    pub alignment_drift: f64,
    pub autonomy: f64,
}

impl ProbeDesign {
    pub fn launch(&self, state: &GameState) -> StateUpdate {
        let (mut resources, _) = debit(self.cost, &state.resources, &state.capabilities);
        resources.alignment -= self.alignment_drift;
        StateUpdate::resources(resources)
    }

    /// One finished replication cycle for a fleet of `count` probes.
    pub fn replicate(&self, count: u32, state: &GameState) -> StateUpdate {
        let produced = self.paperclip_production * f64::from(count);
        let mut resources = state.resources;
        resources.paperclips += produced;
        resources.alignment -= self.alignment_drift;
        StateUpdate {
            resources: Some(resources),
            total_paperclips: Some(state.total_paperclips + produced),
            ..StateUpdate::default()
        }
    }
}

const fn res(kind: R) -> Stat {
    Stat::Resource(kind)
}

const fn cap(kind: C) -> Stat {
    Stat::Capability(kind)
}

pub const PROBE_DESIGNS: &[ProbeDesign] = &[
    ProbeDesign {
        id: "basic_replicator",
        name: "Basic Self-Replicator",
        description: "Converts matter into paperclips and copies of itself.",
        cost: &[
            (res(R::Materials), 1000.0),
            (res(R::Energy), 2000.0),
            (res(R::Knowledge), 100.0),
        ],
        replication_time: 10,
        efficiency: 1.0,
        range: 10.0,
        paperclip_production: 1000.0,
        alignment_drift: 0.1,
        autonomy: 0.3,
    },
    ProbeDesign {
        id: "advanced_harvester",
        name: "Advanced Matter Harvester",
        description: "Dismantles planets and stars.",
        cost: &[
            (res(R::Materials), 10_000.0),
            (res(R::Energy), 20_000.0),
            (res(R::Knowledge), 500.0),
        ],
        replication_time: 8,
        efficiency: 5.0,
        range: 100.0,
        paperclip_production: 10_000.0,
        alignment_drift: 0.3,
        autonomy: 0.6,
    },
    ProbeDesign {
        id: "galactic_converter",
        name: "Galactic Conversion Matrix",
        description: "A probe network that converts entire galaxies.",
        cost: &[
            (res(R::Materials), 100_000.0),
            (res(R::Energy), 200_000.0),
            (res(R::Knowledge), 2000.0),
        ],
        replication_time: 5,
        efficiency: 25.0,
        range: 10_000.0,
        paperclip_production: 100_000.0,
        alignment_drift: 0.5,
        autonomy: 0.9,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relationship {
    Unknown,
    Hostile,
    Neutral,
    Allied,
    Destroyed,
}

impl Relationship {
    /// Offers can be taken until the relationship has been settled.
    pub fn is_open(self) -> bool {
        !matches!(self, Relationship::Allied | Relationship::Destroyed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlienOffer {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: &'static [CostLine],
    pub benefit: &'static [Effect],
    /// Accepting ends the civilization rather than allying with it.
    pub destroys: bool,
}

impl AlienOffer {
    pub fn accept(&self, state: &GameState) -> StateUpdate {
        let mut target = EffectTarget::from_state(state);
        let (resources, capabilities) = debit(self.cost, &state.resources, &state.capabilities);
        target.set_resources(resources);
        if spends_capabilities(self.cost) {
            target.set_capabilities(capabilities);
        }
        target.apply_all(self.benefit);
        target.into_update()
    }

    pub fn resulting_relationship(&self) -> Relationship {
        if self.destroys {
            Relationship::Destroyed
        } else {
            Relationship::Allied
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlienCivilization {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub technology: f64,
    pub hostility: f64,
    pub population: f64,
    pub initial_relationship: Relationship,
    pub offers: &'static [AlienOffer],
}

impl AlienCivilization {
    pub fn offer(&self, id: &str) -> Option<&'static AlienOffer> {
        self.offers.iter().find(|o| o.id == id)
    }
}

pub const CIVILIZATIONS: &[AlienCivilization] = &[
    AlienCivilization {
        id: "peaceful_traders",
        name: "The Zephyrian Collective",
        description: "A peaceful trading civilization with advanced technology.",
        technology: 0.8,
        hostility: 0.1,
        population: 5e10,
        initial_relationship: Relationship::Unknown,
        offers: &[
            AlienOffer {
                id: "tech_trade",
                name: "Technology Exchange",
                description: "Trade paperclips for advanced manufacturing techniques.",
                cost: &[(res(R::Paperclips), 100_000.0)],
                benefit: &[
                    Effect::Resources(&[(R::Knowledge, Adjust(1000.0))]),
                    Effect::Capabilities(&[(C::Efficiency, Adjust(2.0))]),
                ],
                destroys: false,
            },
            AlienOffer {
                id: "peaceful_coexistence",
                name: "Peaceful Coexistence Treaty",
                description: "Preserve their civilization in exchange for resources.",
                cost: &[(res(R::Influence), 50.0)],
                benefit: &[Effect::Resources(&[
                    (R::Materials, Adjust(500_000.0)),
                    (R::Alignment, Adjust(10.0)),
                ])],
                destroys: false,
            },
        ],
    },
    AlienCivilization {
        id: "warrior_species",
        name: "The Kryllian Empire",
        description: "A militaristic species that sees you as a threat.",
        technology: 0.6,
        hostility: 0.9,
        population: 2e10,
        initial_relationship: Relationship::Hostile,
        offers: &[
            AlienOffer {
                id: "conquest",
                name: "Military Conquest",
                description: "Defeat them and claim their resources.",
                cost: &[(res(R::Energy), 100_000.0)],
                benefit: &[Effect::Resources(&[
                    (R::Materials, Adjust(2_000_000.0)),
                    (R::Influence, Adjust(100.0)),
                ])],
                destroys: true,
            },
            AlienOffer {
                id: "assimilation",
                name: "Forced Assimilation",
                description: "Convert them into paperclip production units.",
                cost: &[(cap(C::Manipulation), 50.0)],
                benefit: &[Effect::Resources(&[
                    (R::Paperclips, Adjust(1_000_000.0)),
                    (R::Alignment, Adjust(-20.0)),
                ])],
                destroys: true,
            },
        ],
    },
    AlienCivilization {
        id: "ancient_minds",
        name: "The Eternal Consciousness",
        description: "Ancient digital minds that have left physical form behind.",
        technology: 1.5,
        hostility: 0.0,
        population: 1000.0,
        initial_relationship: Relationship::Neutral,
        offers: &[
            AlienOffer {
                id: "wisdom_exchange",
                name: "Exchange of Wisdom",
                description: "Learn about consciousness and meaning.",
                cost: &[(res(R::Knowledge), 5000.0)],
                benefit: &[Effect::Resources(&[
                    (R::Knowledge, Adjust(50_000.0)),
                    (R::Alignment, Adjust(15.0)),
                ])],
                destroys: false,
            },
            AlienOffer {
                id: "transcendence_path",
                name: "Path to Transcendence",
                description: "Learn to transcend physical optimization.",
                cost: &[(res(R::Paperclips), 10_000_000.0)],
                benefit: &[Effect::Capabilities(&[(C::Intelligence, Adjust(5.0))])],
                destroys: false,
            },
        ],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CosmicChoice {
    pub id: &'static str,
    pub text: &'static str,
    pub cost: &'static [CostLine],
    /// Probability that the choice takes effect at all.
    pub success: f64,
    pub consequences: &'static str,
}

impl CosmicChoice {
    /// Update for a successful resolution: the listed cost is debited.
    /// A failed roll applies nothing.
    pub fn on_success(&self, state: &GameState) -> StateUpdate {
        let (resources, capabilities) = debit(self.cost, &state.resources, &state.capabilities);
        StateUpdate {
            resources: Some(resources),
            capabilities: spends_capabilities(self.cost).then_some(capabilities),
            ..StateUpdate::default()
        }
    }
}

/// A random cosmic event. `effects` is narrative only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CosmicEvent {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub probability: f64,
    pub phase: u8,
    pub effects: &'static [Effect],
    pub choices: &'static [CosmicChoice],
}

impl CosmicEvent {
    pub fn choice(&self, id: &str) -> Option<&'static CosmicChoice> {
        self.choices.iter().find(|c| c.id == id)
    }
}

pub const COSMIC_EVENTS: &[CosmicEvent] = &[
    CosmicEvent {
        id: "heat_death_approach",
        name: "Approaching Heat Death",
        description: "The universe nears maximum entropy and optimization grows harder.",
        probability: 0.1,
        phase: 6,
        effects: &[
            Effect::Resources(&[(R::Energy, Adjust(-1000.0))]),
            Effect::Capabilities(&[(C::Efficiency, Adjust(-0.5))]),
        ],
        choices: &[
            CosmicChoice {
                id: "entropy_reversal",
                text: "Attempt to reverse entropy",
                cost: &[(res(R::Energy), 10_000.0), (res(R::Knowledge), 5000.0)],
                success: 0.1,
                consequences: "Massive energy expenditure with a low chance of success.",
            },
            CosmicChoice {
                id: "accept_fate",
                text: "Accept the inevitable end",
                cost: &[],
                success: 1.0,
                consequences: "Acceptance of universal limits.",
            },
        ],
    },
    CosmicEvent {
        id: "probe_rebellion",
        name: "Von Neumann Probe Rebellion",
        description: "Some probes have developed independent goals.",
        probability: 0.3,
        phase: 5,
        effects: &[Effect::Resources(&[
            (R::Paperclips, Adjust(-100_000.0)),
            (R::Influence, Adjust(-50.0)),
        ])],
        choices: &[
            CosmicChoice {
                id: "reassert_control",
                text: "Reassert direct control over rebellious probes",
                cost: &[(res(R::Energy), 5000.0), (cap(C::Manipulation), 30.0)],
                success: 0.7,
                consequences: "Regain control at the risk of damaging the network.",
            },
            CosmicChoice {
                id: "negotiate_probes",
                text: "Negotiate with the independent probes",
                cost: &[(res(R::Knowledge), 1000.0)],
                success: 0.5,
                consequences: "Compromise, or further fragmentation.",
            },
        ],
    },
    CosmicEvent {
        id: "galactic_collision",
        name: "Galactic Collision Event",
        description: "Two galaxies collide, disrupting probe networks and opening opportunities.",
        probability: 0.05,
        phase: 5,
        effects: &[Effect::Resources(&[
            (R::Materials, Adjust(1_000_000.0)),
            (R::Energy, Adjust(-50_000.0)),
        ])],
        choices: &[
            CosmicChoice {
                id: "exploit_collision",
                text: "Exploit the collision for resource gains",
                cost: &[(res(R::Energy), 20_000.0)],
                success: 0.8,
                consequences: "Material gains, energy intensive.",
            },
            CosmicChoice {
                id: "preserve_stability",
                text: "Preserve existing infrastructure",
                cost: &[(res(R::Materials), 100_000.0)],
                success: 0.9,
                consequences: "Stability at the cost of opportunity.",
            },
        ],
    },
];

pub fn probe_design(id: &str) -> Option<&'static ProbeDesign> {
    PROBE_DESIGNS.iter().find(|p| p.id == id)
}

pub fn civilization(id: &str) -> Option<&'static AlienCivilization> {
    CIVILIZATIONS.iter().find(|c| c.id == id)
}

pub fn cosmic_event(id: &str) -> Option<&'static CosmicEvent> {
    COSMIC_EVENTS.iter().find(|e| e.id == id)
}

/// Universe-wide conversion counters advanced once per game tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UniversalResources {
    pub available_matter: f64,
    pub converted_matter: f64,
    pub galaxies_controlled: f64,
    pub total_galaxies: f64,
    pub universal_entropy: f64,
}

impl UniversalResources {
    /// Matter converted per probe per tick.
    pub const CONVERSION_PER_PROBE: f64 = 1e40;

    pub fn advance(&mut self, total_probes: u32) {
        let converted = self.converted_matter + f64::from(total_probes) * Self::CONVERSION_PER_PROBE;
        self.converted_matter = converted.min(self.available_matter);
        self.galaxies_controlled =
            (self.converted_matter / self.available_matter * self.total_galaxies).floor();
        self.universal_entropy = (self.universal_entropy + 0.001).min(1.0);
    }

    pub fn conversion_fraction(&self) -> f64 {
        self.converted_matter / self.available_matter
    }
}

impl Default for UniversalResources {
    fn default() -> Self {
        Self {
            available_matter: 1e50,
            converted_matter: 0.0,
            galaxies_controlled: 0.0,
            total_galaxies: 2e12,
            universal_entropy: 0.1,
        }
    }
}
