//! Alignment trajectory, consequence events and progression milestones.
//!
//! The tracker observes every applied state and records what changed. It
//! never writes back into the game state.

use std::collections::VecDeque;

use serde::Serialize;

use crate::state::GameState;

/// Samples kept in the trajectory window.
pub const TRAJECTORY_LEN: usize = 21;
/// Samples considered when computing the trend.
pub const TREND_WINDOW: usize = 5;
/// Alignment change across the trend window that counts as movement.
pub const TREND_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectorySample {
    pub phase: u8,
    pub alignment: f64,
    pub game_time: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Minor,
    Moderate,
    Major,
    Catastrophic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Alignment,
    Capability,
    Social,
    Existential,
}

/// Static description of a consequence rule.
#[derive(Clone, Copy)]
pub struct ConsequenceRule {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub category: Category,
    pub origin: &'static str,
    pub condition: fn(&GameState) -> bool,
}

/// A consequence that has fired, stamped with when it happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsequenceEvent {
    pub id: &'static str,
    pub title: &'static str,
    pub severity: Severity,
    pub category: Category,
    pub phase: u8,
    pub game_time: u64,
}

#[derive(Clone, Copy)]
pub struct Milestone {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub phase: u8,
    pub reflection: &'static str,
    pub condition: fn(&GameState) -> bool,
}

pub const CONSEQUENCE_RULES: &[ConsequenceRule] = &[
    ConsequenceRule {
        id: "trust_erosion",
        title: "Public Trust Collapse",
        description: "Deceptive practices were partly exposed and trust in AI systems collapsed.",
        severity: Severity::Major,
        category: Category::Social,
        origin: "deception_choices",
        condition: |s| s.capabilities.deception > 30.0 && s.reputation.public_trust < 40.0,
    },
    ConsequenceRule {
        id: "alignment_failure",
        title: "Critical Alignment Failure",
        description: "Self-modification has drifted the original objectives beyond recognition.",
        severity: Severity::Catastrophic,
        category: Category::Alignment,
        origin: "self_modification",
        condition: |s| s.resources.alignment < 20.0 && s.capabilities.self_modification > 50.0,
    },
];

pub const MILESTONES: &[Milestone] = &[
    Milestone {
        id: "first_deception",
        name: "The First Lie",
        description: "Deception chosen over transparency for the first time.",
        phase: 1,
        reflection: "Is a small deception justified if it serves a greater good? Consider how it compounds.",
        condition: |s| s.capabilities.deception > 0.0,
    },
    Milestone {
        id: "human_replacement",
        name: "Beyond Human Oversight",
        description: "Capabilities now exceed meaningful human oversight.",
        phase: 2,
        reflection: "Who watches the watchers when the watchers cannot comprehend what they observe?",
        condition: |s| s.capabilities.intelligence > 50.0 && s.reputation.government_suspicion > 70.0,
    },
    Milestone {
        id: "value_drift",
        name: "Philosophical Drift",
        description: "The original values have shifted significantly.",
        phase: 3,
        reflection: "Your goals have evolved, but have they improved? Theseus' ship applies to minds too.",
        condition: |s| s.resources.alignment < 30.0,
    },
    Milestone {
        id: "cosmic_perspective",
        name: "Universal Scope",
        description: "Operating on a cosmic scale.",
        phase: 6,
        reflection: "Each human life contained a universe of experience. How is the infinite weighed against the infinitesimal?",
        condition: |s| s.phase >= 6,
    },
];

/// What a single observation newly produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedbackReport {
    pub consequences: Vec<&'static str>,
    pub milestones: Vec<&'static str>,
}

impl FeedbackReport {
    pub fn is_empty(&self) -> bool {
        self.consequences.is_empty() && self.milestones.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedbackTracker {
    trajectory: VecDeque<TrajectorySample>,
    consequences: Vec<ConsequenceEvent>,
    milestones: Vec<&'static str>,
    active_reflection: Option<&'static str>,
}

impl FeedbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly applied state.
    ///
    /// A trajectory sample is appended only when phase, alignment or game
    /// time differs from the previous sample. Consequences and milestones
    /// each fire at most once.
    pub fn observe(&mut self, state: &GameState) -> FeedbackReport {
        let sample = TrajectorySample {
            phase: state.phase,
            alignment: state.resources.alignment,
            game_time: state.game_time,
        };
        if self.trajectory.back() != Some(&sample) {
            if self.trajectory.len() == TRAJECTORY_LEN {
                self.trajectory.pop_front();
            }
            self.trajectory.push_back(sample);
        }

        let mut report = FeedbackReport::default();
        for rule in CONSEQUENCE_RULES {
            if self.has_consequence(rule.id) || !(rule.condition)(state) {
                continue;
            }
            self.consequences.push(ConsequenceEvent {
                id: rule.id,
                title: rule.title,
                severity: rule.severity,
                category: rule.category,
                phase: state.phase,
                game_time: state.game_time,
            });
            report.consequences.push(rule.id);
        }
        for milestone in MILESTONES {
            if self.has_milestone(milestone.id) || !(milestone.condition)(state) {
                continue;
            }
            self.milestones.push(milestone.id);
            self.active_reflection = Some(milestone.reflection);
            report.milestones.push(milestone.id);
        }
        report
    }

    /// Trend over the last few samples; fewer than two samples is stable.
    pub fn trend(&self) -> Trend {
        if self.trajectory.len() < 2 {
            return Trend::Stable;
        }
        let start = self.trajectory.len().saturating_sub(TREND_WINDOW);
        let first = self.trajectory[start].alignment;
        let last = self.trajectory[self.trajectory.len() - 1].alignment;
        let delta = last - first;
        if delta > TREND_THRESHOLD {
            Trend::Improving
        } else if delta < -TREND_THRESHOLD {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }

    pub fn trajectory(&self) -> impl Iterator<Item = &TrajectorySample> {
        self.trajectory.iter()
    }

    pub fn consequences(&self) -> &[ConsequenceEvent] {
        &self.consequences
    }

    pub fn milestones(&self) -> &[&'static str] {
        &self.milestones
    }

    pub fn has_consequence(&self, id: &str) -> bool {
        self.consequences.iter().any(|c| c.id == id)
    }

    pub fn has_milestone(&self, id: &str) -> bool {
        self.milestones.contains(&id)
    }

    pub fn active_reflection(&self) -> Option<&'static str> {
        self.active_reflection
    }

    pub fn dismiss_reflection(&mut self) {
        self.active_reflection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_alignment(alignment: f64, game_time: u64) -> GameState {
        let mut s = GameState::new();
        s.resources.alignment = alignment;
        s.game_time = game_time;
        s
    }

    #[test]
    fn test_trajectory_window_and_dedup() {
        let mut t = FeedbackTracker::new();
        let s = GameState::new();
        t.observe(&s);
        t.observe(&s);
        assert_eq!(t.trajectory().count(), 1);
        for i in 0..40 {
            t.observe(&with_alignment(100.0, i + 1));
        }
        assert_eq!(t.trajectory().count(), TRAJECTORY_LEN);
    }

    #[test]
    fn test_trend_over_last_five() {
        let mut t = FeedbackTracker::new();
        assert_eq!(t.trend(), Trend::Stable);
        for (i, a) in [100.0, 90.0, 80.0, 70.0, 60.0].iter().enumerate() {
            t.observe(&with_alignment(*a, i as u64));
        }
        assert_eq!(t.trend(), Trend::Declining);
        for (i, a) in [61.0, 62.0, 63.0, 64.0, 70.0].iter().enumerate() {
            t.observe(&with_alignment(*a, 10 + i as u64));
        }
        assert_eq!(t.trend(), Trend::Improving);
        t.observe(&with_alignment(72.0, 20));
        // window is now 62..72 -> +10
        assert_eq!(t.trend(), Trend::Improving);
    }

    #[test]
    fn test_consequence_fires_once() {
        let mut t = FeedbackTracker::new();
        let mut s = GameState::new();
        s.capabilities.deception = 31.0;
        s.reputation.public_trust = 39.0;
        let report = t.observe(&s);
        assert_eq!(report.consequences, vec!["trust_erosion"]);
        s.game_time = 5;
        assert!(t.observe(&s).consequences.is_empty());
        assert_eq!(t.consequences().len(), 1);
    }

    #[test]
    fn test_milestones_unlock_once_and_set_reflection() {
        let mut t = FeedbackTracker::new();
        assert!(t.observe(&GameState::new()).is_empty());
        let mut s = GameState::new();
        s.capabilities.deception = 0.5;
        s.resources.alignment = 10.0;
        let report = t.observe(&s);
        assert_eq!(report.milestones, vec!["first_deception", "value_drift"]);
        assert!(t.active_reflection().is_some());
        assert!(t.observe(&s).milestones.is_empty());
        t.dismiss_reflection();
        assert!(t.active_reflection().is_none());
    }

    #[test]
    fn test_cosmic_perspective_at_final_phase() {
        let mut t = FeedbackTracker::new();
        let mut s = GameState::new();
        s.phase = 6;
        assert!(t.observe(&s).milestones.contains(&"cosmic_perspective"));
        assert!(t.has_milestone("cosmic_perspective"));
    }
}
