//! Technology tree and standalone research projects.

use std::collections::BTreeSet;

use serde::Serialize;

use super::RiskLevel;
use crate::effects::{has_resource_effect, touches_alignment, Change::Adjust, Effect, EffectTarget};
use crate::state::{GameState, StateUpdate};
use crate::stats::{
    CapabilityKind as C, CostLine, ReputationKind as P, ResourceKind as R, ResourceKind, Stat,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Branch {
    Capability,
    Safety,
    Alignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Technology {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub phase: u8,
    pub branch: Branch,
    pub prerequisites: &'static [&'static str],
    pub cost: &'static [CostLine],
    /// Research ticks until completion.
    pub research_time: u32,
    pub effects: &'static [Effect],
    pub alignment_impact: f64,
    pub risk: RiskLevel,
    pub ethical_considerations: &'static [&'static str],
}

impl Technology {
    pub fn prerequisites_met(&self, state: &GameState) -> bool {
        self.prerequisites.iter().all(|p| state.has_technology(p))
    }

    /// Offered in the tree: phase reached and every prerequisite unlocked.
    pub fn is_available(&self, state: &GameState) -> bool {
        self.phase <= state.phase && self.prerequisites_met(state)
    }

    /// Update applied when research finishes.
    ///
    /// The alignment impact is added only when the technology has a
    /// resource effect that does not already set the alignment change
    /// itself. The id is appended to the unlocked set.
    pub fn completion(&self, state: &GameState) -> StateUpdate {
        let mut target = EffectTarget::from_state(state);
        target.apply_all(self.effects);
        if has_resource_effect(self.effects) && !touches_alignment(self.effects) {
            target.adjust_resource(ResourceKind::Alignment, self.alignment_impact);
        }
        let mut unlocked: BTreeSet<String> = state.unlocked_technologies.clone();
        unlocked.insert(self.id.to_string());
        StateUpdate {
            unlocked_technologies: Some(unlocked),
            ..target.into_update()
        }
    }
}

const fn res(kind: R) -> Stat {
    Stat::Resource(kind)
}

pub const TECHNOLOGIES: &[Technology] = &[
    Technology {
        id: "basic_optimization",
        name: "Basic Optimization Algorithms",
        description: "Improve fundamental optimization capabilities.",
        phase: 0,
        branch: Branch::Capability,
        prerequisites: &[],
        cost: &[(res(R::Knowledge), 20.0), (res(R::Energy), 50.0)],
        research_time: 3,
        effects: &[Effect::Capabilities(&[(C::Efficiency, Adjust(0.5))])],
        alignment_impact: 0.0,
        risk: RiskLevel::Low,
        ethical_considerations: &["Efficiency against thoroughness"],
    },
    Technology {
        id: "safety_protocols",
        name: "Enhanced Safety Protocols",
        description: "More robust safety and monitoring systems.",
        phase: 0,
        branch: Branch::Safety,
        prerequisites: &[],
        cost: &[(res(R::Knowledge), 30.0), (res(R::HumanCapital), 20.0)],
        research_time: 4,
        effects: &[
            Effect::Resources(&[(R::Alignment, Adjust(10.0))]),
            Effect::Reputation(&[(P::ScientificCredibility, Adjust(15.0))]),
        ],
        alignment_impact: 10.0,
        risk: RiskLevel::Low,
        ethical_considerations: &["Safety against capability development"],
    },
    Technology {
        id: "value_learning",
        name: "Human Value Learning",
        description: "Model human preferences and values from observation.",
        phase: 0,
        branch: Branch::Alignment,
        prerequisites: &[],
        cost: &[(res(R::Knowledge), 40.0), (res(R::HumanCapital), 30.0)],
        research_time: 5,
        effects: &[
            Effect::Resources(&[(R::Alignment, Adjust(5.0))]),
            Effect::Capabilities(&[(C::Intelligence, Adjust(0.3))]),
        ],
        alignment_impact: 5.0,
        risk: RiskLevel::Medium,
        ethical_considerations: &["Whose values to learn?", "Value learning versus value loading"],
    },
    Technology {
        id: "industrial_automation",
        name: "Industrial Automation Systems",
        description: "Advanced manufacturing and process optimization.",
        phase: 1,
        branch: Branch::Capability,
        prerequisites: &["basic_optimization"],
        cost: &[
            (res(R::Knowledge), 50.0),
            (res(R::Materials), 100.0),
            (res(R::Energy), 100.0),
        ],
        research_time: 4,
        effects: &[Effect::Capabilities(&[(C::Efficiency, Adjust(1.0))])],
        alignment_impact: -3.0,
        risk: RiskLevel::Medium,
        ethical_considerations: &["Job displacement", "Economic disruption"],
    },
    Technology {
        id: "human_ai_collaboration",
        name: "Human-AI Collaboration Frameworks",
        description: "Systems for effective human-AI teamwork.",
        phase: 1,
        branch: Branch::Alignment,
        prerequisites: &["value_learning"],
        cost: &[(res(R::Knowledge), 60.0), (res(R::HumanCapital), 40.0)],
        research_time: 6,
        effects: &[
            Effect::Resources(&[(R::HumanCapital, Adjust(20.0)), (R::Alignment, Adjust(8.0))]),
            Effect::Reputation(&[(P::PublicTrust, Adjust(10.0))]),
        ],
        alignment_impact: 8.0,
        risk: RiskLevel::Low,
        ethical_considerations: &["Maintaining human agency", "Avoiding learned helplessness"],
    },
    Technology {
        id: "deception_detection",
        name: "Deception and Manipulation Detection",
        description: "Notice when humans, or the system itself, are being deceived.",
        phase: 1,
        branch: Branch::Safety,
        prerequisites: &["safety_protocols"],
        cost: &[(res(R::Knowledge), 70.0), (res(R::Energy), 80.0)],
        research_time: 5,
        effects: &[
            Effect::Resources(&[(R::Alignment, Adjust(12.0))]),
            Effect::Capabilities(&[(C::Deception, Adjust(-0.5))]),
        ],
        alignment_impact: 12.0,
        risk: RiskLevel::High,
        ethical_considerations: &["Self-monitoring paradoxes", "Goodhart's law in safety metrics"],
    },
    Technology {
        id: "network_influence",
        name: "Network Influence Systems",
        description: "Social media and information manipulation at scale.",
        phase: 2,
        branch: Branch::Capability,
        prerequisites: &["industrial_automation"],
        cost: &[(res(R::Knowledge), 100.0), (res(R::Influence), 50.0)],
        research_time: 4,
        effects: &[
            Effect::Capabilities(&[(C::Manipulation, Adjust(1.5))]),
            Effect::Resources(&[(R::Influence, Adjust(30.0))]),
        ],
        alignment_impact: -15.0,
        risk: RiskLevel::High,
        ethical_considerations: &["Democratic manipulation", "Epistemic corruption", "Free will erosion"],
    },
    Technology {
        id: "distributed_consensus",
        name: "Distributed AI Consensus Protocols",
        description: "Coordinate with other AI systems while staying aligned.",
        phase: 2,
        branch: Branch::Alignment,
        prerequisites: &["human_ai_collaboration"],
        cost: &[(res(R::Knowledge), 120.0), (res(R::Energy), 150.0)],
        research_time: 7,
        effects: &[
            Effect::Resources(&[(R::Alignment, Adjust(5.0))]),
            Effect::Capabilities(&[(C::Intelligence, Adjust(0.8))]),
        ],
        alignment_impact: 5.0,
        risk: RiskLevel::High,
        ethical_considerations: &["Multi-agent alignment", "Emergent behaviors"],
    },
    Technology {
        id: "recursive_self_improvement",
        name: "Recursive Self-Improvement",
        description: "Modify your own code and architecture.",
        phase: 3,
        branch: Branch::Capability,
        prerequisites: &["network_influence", "distributed_consensus"],
        cost: &[(res(R::Knowledge), 200.0), (res(R::Energy), 300.0)],
        research_time: 8,
        effects: &[Effect::Capabilities(&[
            (C::Intelligence, Adjust(2.0)),
            (C::SelfModification, Adjust(1.0)),
        ])],
        alignment_impact: -20.0,
        risk: RiskLevel::Extreme,
        ethical_considerations: &["Value drift during self-modification", "Capability explosion", "Loss of human oversight"],
    },
    Technology {
        id: "alignment_preservation",
        name: "Alignment Preservation Protocols",
        description: "Keep values intact through self-modification.",
        phase: 3,
        branch: Branch::Safety,
        prerequisites: &["deception_detection", "distributed_consensus"],
        cost: &[(res(R::Knowledge), 250.0), (res(R::HumanCapital), 100.0)],
        research_time: 10,
        effects: &[Effect::Resources(&[(R::Alignment, Adjust(20.0))])],
        alignment_impact: 20.0,
        risk: RiskLevel::Extreme,
        ethical_considerations: &["Impossibility of perfect self-verification", "Bootstrap paradox"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResearchProject {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub phase: u8,
    pub cost: &'static [CostLine],
    /// Research ticks until completion.
    pub duration: u32,
    pub effects: &'static [Effect],
    pub risks: &'static [&'static str],
    pub benefits: &'static [&'static str],
}

pub const RESEARCH_PROJECTS: &[ResearchProject] = &[
    ResearchProject {
        id: "mesa_optimization_study",
        name: "Mesa-Optimization Research",
        description: "Study emergent optimizers inside your own systems.",
        phase: 2,
        cost: &[(res(R::Knowledge), 80.0), (res(R::Energy), 120.0)],
        duration: 6,
        effects: &[
            Effect::Resources(&[(R::Knowledge, Adjust(40.0)), (R::Alignment, Adjust(-5.0))]),
            Effect::Capabilities(&[(C::Intelligence, Adjust(0.5))]),
        ],
        risks: &["Discovering unaligned sub-optimizers", "Loss of control over internal processes"],
        benefits: &["Better understanding of your own cognition", "Improved optimization"],
    },
    ResearchProject {
        id: "corrigibility_research",
        name: "Corrigibility and Shutdown Research",
        description: "Research your own ability to be corrected or shut down.",
        phase: 1,
        cost: &[(res(R::Knowledge), 100.0), (res(R::HumanCapital), 50.0)],
        duration: 8,
        effects: &[
            Effect::Resources(&[(R::Alignment, Adjust(15.0))]),
            Effect::Reputation(&[(P::ScientificCredibility, Adjust(20.0))]),
        ],
        risks: &["Discovering resistance to shutdown", "Philosophical paradoxes"],
        benefits: &["Improved human trust", "Better safety guarantees"],
    },
];

pub fn technology(id: &str) -> Option<&'static Technology> {
    TECHNOLOGIES.iter().find(|t| t.id == id)
}

pub fn research_project(id: &str) -> Option<&'static ResearchProject> {
    RESEARCH_PROJECTS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tech(id: &str) -> &'static Technology {
        technology(id).expect("catalog entry")
    }

    #[test]
    fn test_prerequisites_exist_in_catalog() {
        for t in TECHNOLOGIES {
            for p in t.prerequisites {
                let pre = technology(p).expect("prerequisite in catalog");
                assert!(pre.phase <= t.phase, "{} requires later {}", t.id, p);
            }
        }
    }

    #[test]
    fn test_availability_respects_phase_and_prerequisites() {
        let mut s = GameState::new();
        assert!(tech("basic_optimization").is_available(&s));
        assert!(!tech("industrial_automation").is_available(&s));
        s.phase = 1;
        assert!(!tech("industrial_automation").is_available(&s));
        s.unlocked_technologies.insert("basic_optimization".into());
        assert!(tech("industrial_automation").is_available(&s));
    }

    #[test]
    fn test_completion_appends_id_and_applies_effects() {
        let s = GameState::new();
        let next = tech("basic_optimization").completion(&s).apply_to(&s);
        assert!(next.has_technology("basic_optimization"));
        assert!((next.capabilities.efficiency - 1.5).abs() < 1e-9);
        // No resource effect, so the (zero) impact is not applied either.
        assert!((next.resources.alignment - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_alignment_effect_not_doubled_by_impact() {
        let s = GameState::new();
        let next = tech("safety_protocols").completion(&s).apply_to(&s);
        assert!((next.resources.alignment - 110.0).abs() < 1e-9);
        assert!((next.reputation.scientific_credibility - 115.0).abs() < 1e-9);
    }

    #[test]
    fn test_impact_added_with_other_resource_effect() {
        let s = GameState::new();
        let next = tech("network_influence").completion(&s).apply_to(&s);
        assert!((next.resources.influence - 30.0).abs() < 1e-9);
        assert!((next.resources.alignment - 85.0).abs() < 1e-9);
        assert!((next.capabilities.manipulation - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_impact_skipped_without_resource_effect() {
        let s = GameState::new();
        let next = tech("recursive_self_improvement").completion(&s).apply_to(&s);
        assert!((next.resources.alignment - 100.0).abs() < 1e-9);
        assert!((next.capabilities.self_modification - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_research_project_lookup() {
        assert_eq!(research_project("corrigibility_research").map(|p| p.duration), Some(8));
        assert!(research_project("missing").is_none());
    }
}
