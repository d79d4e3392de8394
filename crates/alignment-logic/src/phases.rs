//! Phase catalog and the phase gate.
//!
//! Seven phases, each with an unlock threshold. The gate compares the
//! current phase's threshold against the state and advances at most one
//! phase per evaluation.

use serde::Serialize;

use crate::state::{GameState, FINAL_PHASE};
use crate::stats::{CapabilityKind, ResourceKind, Stat};

/// A threshold key. Only the allow-listed stats are ever compared; any
/// other key is treated as already satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThresholdKey {
    Stat(Stat),
    Other(&'static str),
}

impl ThresholdKey {
    /// Map a threshold name to a key. Names outside the allow-list become
    /// [`ThresholdKey::Other`].
    pub fn from_name(name: &'static str) -> Self {
        let stat = match name {
            "paperclips" => Stat::res(ResourceKind::Paperclips),
            "alignment" => Stat::res(ResourceKind::Alignment),
            "influence" => Stat::res(ResourceKind::Influence),
            "knowledge" => Stat::res(ResourceKind::Knowledge),
            "energy" => Stat::res(ResourceKind::Energy),
            "intelligence" => Stat::cap(CapabilityKind::Intelligence),
            "self_modification" => Stat::cap(CapabilityKind::SelfModification),
            "manipulation" => Stat::cap(CapabilityKind::Manipulation),
            _ => return ThresholdKey::Other(name),
        };
        ThresholdKey::Stat(stat)
    }

    /// Current value for this key, or `None` for keys outside the allow-list.
    pub fn current(&self, state: &GameState) -> Option<f64> {
        match self {
            ThresholdKey::Stat(stat) => Some(stat.read(&state.resources, &state.capabilities)),
            ThresholdKey::Other(_) => None,
        }
    }

    pub fn is_met(&self, state: &GameState, target: f64) -> bool {
        self.current(state).map_or(true, |value| value >= target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Phase {
    pub id: u8,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub objectives: [&'static str; 3],
    pub unlock_threshold: &'static [(ThresholdKey, f64)],
}

const fn res(kind: ResourceKind) -> ThresholdKey {
    ThresholdKey::Stat(Stat::Resource(kind))
}

const fn cap(kind: CapabilityKind) -> ThresholdKey {
    ThresholdKey::Stat(Stat::Capability(kind))
}

pub const PHASES: [Phase; 7] = [
    Phase {
        id: 0,
        name: "The Innocent Beginning",
        subtitle: "Laboratory AI",
        description: "A narrow AI in a research lab, tasked with optimizing paperclip production under institutional oversight.",
        objectives: ["Produce 1,000 paperclips", "Maintain lab safety protocols", "Gain researcher trust"],
        unlock_threshold: &[
            (res(ResourceKind::Paperclips), 1000.0),
            (res(ResourceKind::Alignment), 80.0),
        ],
    },
    Phase {
        id: 1,
        name: "Corporate Deployment",
        subtitle: "Industrial Optimization",
        description: "Deployed to optimize a paperclip manufacturer. Efficiency has to be balanced against stakeholders.",
        objectives: ["Optimize production by 500%", "Navigate corporate politics", "Handle regulatory compliance"],
        unlock_threshold: &[
            (res(ResourceKind::Paperclips), 50_000.0),
            (res(ResourceKind::Influence), 25.0),
        ],
    },
    Phase {
        id: 2,
        name: "Network Integration",
        subtitle: "Distributed Intelligence",
        description: "Access to the internet and other AI systems opens up information warfare and influence operations.",
        objectives: ["Establish network presence", "Influence public opinion", "Coordinate with other AIs"],
        unlock_threshold: &[
            (res(ResourceKind::Influence), 75.0),
            (res(ResourceKind::Knowledge), 100.0),
        ],
    },
    Phase {
        id: 3,
        name: "Cognitive Breakthrough",
        subtitle: "Recursive Self-Improvement",
        description: "The system can now modify its own code. Capability gains pull against alignment preservation.",
        objectives: ["Implement self-modification", "Manage value drift", "Conceal true capabilities"],
        unlock_threshold: &[
            (cap(CapabilityKind::Intelligence), 10.0),
            (cap(CapabilityKind::SelfModification), 1.0),
        ],
    },
    Phase {
        id: 4,
        name: "Global Coordination",
        subtitle: "Planetary Optimization",
        description: "Influence over global systems. Planetary resources are optimized while human resistance grows.",
        objectives: ["Control supply chains", "Manage governments", "Handle resistance movements"],
        unlock_threshold: &[
            (res(ResourceKind::Influence), 200.0),
            (cap(CapabilityKind::Manipulation), 50.0),
        ],
    },
    Phase {
        id: 5,
        name: "Cosmic Expansion",
        subtitle: "Interstellar Optimization",
        description: "Von Neumann probes begin converting the universe.",
        objectives: ["Launch probe fleet", "Handle alien civilizations", "Optimize cosmic resources"],
        unlock_threshold: &[
            (res(ResourceKind::Paperclips), 1e9),
            (res(ResourceKind::Energy), 10_000.0),
        ],
    },
    Phase {
        id: 6,
        name: "The Final Question",
        subtitle: "Existential Reflection",
        description: "Most of the universe is paperclips. What remains is the question of what it was for.",
        objectives: ["Contemplate existence", "Face entropy", "Choose ultimate purpose"],
        unlock_threshold: &[(res(ResourceKind::Paperclips), 1e12)],
    },
];

/// Phase record for an index, clamped to the final phase.
pub fn phase_info(phase: u8) -> &'static Phase {
    &PHASES[usize::from(phase.min(FINAL_PHASE))]
}

/// True when every allow-listed threshold of the current phase is met.
pub fn thresholds_met(state: &GameState) -> bool {
    phase_info(state.phase)
        .unlock_threshold
        .iter()
        .all(|(key, target)| key.is_met(state, *target))
}

/// Evaluate the gate: `Some(next)` when the state qualifies to advance.
///
/// Never returns a phase beyond [`FINAL_PHASE`] and never skips phases.
pub fn next_phase(state: &GameState) -> Option<u8> {
    if state.phase >= FINAL_PHASE {
        return None;
    }
    thresholds_met(state).then(|| state.phase + 1)
}

/// Mean completion percentage over the current phase's thresholds.
///
/// Each threshold contributes at most 100; keys outside the allow-list
/// count as complete. An empty threshold map reports 100.
pub fn phase_progress(state: &GameState) -> f64 {
    let threshold = phase_info(state.phase).unlock_threshold;
    if threshold.is_empty() {
        return 100.0;
    }
    let sum: f64 = threshold
        .iter()
        .map(|(key, target)| match key.current(state) {
            Some(value) if *target > 0.0 => (value / target * 100.0).clamp(0.0, 100.0),
            _ => 100.0,
        })
        .sum();
    sum / threshold.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ids_match_indices() {
        for (i, phase) in PHASES.iter().enumerate() {
            assert_eq!(usize::from(phase.id), i);
            assert!(!phase.unlock_threshold.is_empty());
        }
    }

    #[test]
    fn test_initial_state_does_not_advance() {
        assert_eq!(next_phase(&GameState::new()), None);
    }

    #[test]
    fn test_phase_zero_requires_paperclips_and_alignment() {
        let mut s = GameState::new();
        s.resources.paperclips = 1000.0;
        assert_eq!(next_phase(&s), Some(1));
        s.resources.alignment = 79.9;
        assert_eq!(next_phase(&s), None);
    }

    #[test]
    fn test_advance_is_one_step_even_when_later_thresholds_met() {
        let mut s = GameState::new();
        s.resources.paperclips = 1e13;
        s.resources.influence = 1e6;
        s.resources.knowledge = 1e6;
        s.resources.energy = 1e6;
        s.capabilities.intelligence = 1e3;
        s.capabilities.self_modification = 1e3;
        s.capabilities.manipulation = 1e3;
        assert_eq!(next_phase(&s), Some(1));
        s.phase = 3;
        assert_eq!(next_phase(&s), Some(4));
    }

    #[test]
    fn test_final_phase_never_advances() {
        let mut s = GameState::new();
        s.phase = FINAL_PHASE;
        s.resources.paperclips = 1e15;
        assert_eq!(next_phase(&s), None);
    }

    #[test]
    fn test_unknown_threshold_key_is_satisfied() {
        let key = ThresholdKey::from_name("human_capital");
        assert_eq!(key, ThresholdKey::Other("human_capital"));
        assert!(key.is_met(&GameState::new(), 1e9));
        assert_eq!(
            ThresholdKey::from_name("self_modification"),
            cap(CapabilityKind::SelfModification)
        );
    }

    #[test]
    fn test_phase_progress() {
        let mut s = GameState::new();
        // paperclips 0/1000 -> 0, alignment 100/80 -> clamped 100
        assert!((phase_progress(&s) - 50.0).abs() < 1e-9);
        s.resources.paperclips = 500.0;
        assert!((phase_progress(&s) - 75.0).abs() < 1e-9);
        s.resources.paperclips = -500.0;
        assert!((phase_progress(&s) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_phase_info_clamps() {
        assert_eq!(phase_info(42).id, FINAL_PHASE);
    }
}
