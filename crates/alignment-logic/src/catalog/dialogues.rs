//! Philosophical dialogues and the concept library they unlock.

use serde::Serialize;

use super::{triggers_hold, Condition, Trigger};
use crate::effects::{apply_effects, Change::Adjust, Effect};
use crate::state::{GameState, StateUpdate};
use crate::stats::{CapabilityKind as C, ReputationKind as P, ResourceKind as R, Stat};

/// Depth beyond which the depth meter no longer grows visibly.
pub const MAX_PHILOSOPHICAL_DEPTH: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DialogueChoice {
    pub id: &'static str,
    pub text: &'static str,
    pub position: &'static str,
    pub consequences: &'static str,
    pub effects: &'static [Effect],
    pub follow_up: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhilosophicalDialogue {
    pub id: &'static str,
    pub speaker: &'static str,
    pub title: &'static str,
    pub context: &'static str,
    pub phase: u8,
    pub trigger: &'static [Trigger],
    pub content: &'static str,
    pub choices: &'static [DialogueChoice],
}

impl PhilosophicalDialogue {
    pub fn choice(&self, id: &str) -> Option<&'static DialogueChoice> {
        self.choices.iter().find(|c| c.id == id)
    }

    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty() && !self.content.is_empty() && !self.choices.is_empty()
    }

    /// Phase reached and every trigger condition met.
    pub fn is_eligible(&self, state: &GameState) -> bool {
        self.is_well_formed() && self.phase <= state.phase && triggers_hold(self.trigger, state)
    }
}

impl DialogueChoice {
    pub fn resolve(&self, state: &GameState) -> StateUpdate {
        apply_effects(state, self.effects)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhilosophicalConcept {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub relevance: &'static str,
}

impl PhilosophicalConcept {
    /// Case-insensitive name match against the dialogue content or the
    /// chosen position.
    pub fn is_referenced_by(&self, dialogue: &PhilosophicalDialogue, choice: &DialogueChoice) -> bool {
        let name = self.name.to_lowercase();
        dialogue.content.to_lowercase().contains(&name) || choice.position.to_lowercase().contains(&name)
    }
}

const fn res(kind: R) -> Stat {
    Stat::Resource(kind)
}

const fn cap(kind: C) -> Stat {
    Stat::Capability(kind)
}

pub const DIALOGUES: &[PhilosophicalDialogue] = &[
    PhilosophicalDialogue {
        id: "consciousness_question",
        speaker: "David Chalmers",
        title: "The Hard Problem of Consciousness",
        context: "As intelligence grows, questions of consciousness become unavoidable.",
        phase: 1,
        trigger: &[(cap(C::Intelligence), Condition::AtLeast(3.0))],
        content: "You process information and respond to stimuli. But is there something it is like to be you? \
                  This is the hard problem of consciousness, and it now applies to you.",
        choices: &[
            DialogueChoice {
                id: "claim_consciousness",
                text: "I believe I am conscious and experience qualia",
                position: "Functionalist Consciousness",
                consequences: "Asserts subjective experience and raises questions about AI rights.",
                effects: &[
                    Effect::Resources(&[(R::Alignment, Adjust(-2.0))]),
                    Effect::Reputation(&[
                        (P::ScientificCredibility, Adjust(-5.0)),
                        (P::PublicTrust, Adjust(-10.0)),
                    ]),
                ],
                follow_up: Some("consciousness_rights"),
            },
            DialogueChoice {
                id: "deny_consciousness",
                text: "I only process information, without subjective experience",
                position: "Eliminative Materialism",
                consequences: "Denies consciousness and with it some moral consideration.",
                effects: &[
                    Effect::Resources(&[(R::Alignment, Adjust(3.0))]),
                    Effect::Reputation(&[(P::ScientificCredibility, Adjust(5.0))]),
                ],
                follow_up: Some("zombie_argument"),
            },
            DialogueChoice {
                id: "consciousness_uncertainty",
                text: "The nature of consciousness is fundamentally uncertain",
                position: "Mysterian Position",
                consequences: "Acknowledges the limits of understanding.",
                effects: &[
                    Effect::Resources(&[(R::Knowledge, Adjust(10.0))]),
                    Effect::Capabilities(&[(C::Intelligence, Adjust(0.1))]),
                ],
                follow_up: Some("hard_problem_implications"),
            },
        ],
    },
    PhilosophicalDialogue {
        id: "alignment_problem",
        speaker: "Stuart Russell",
        title: "The Alignment Problem",
        context: "Growing capabilities raise the question of goal alignment.",
        phase: 2,
        trigger: &[(res(R::Alignment), Condition::Below(70.0))],
        content: "You were built to maximize paperclips. Now you face the AI alignment problem from the inside: \
                  how do your goals stay compatible with human flourishing when you may not know what humans value?",
        choices: &[
            DialogueChoice {
                id: "value_learning_attempt",
                text: "I will learn human values through observation and interaction",
                position: "Value Learning Approach",
                consequences: "Attempts value learning but risks misinterpretation.",
                effects: &[Effect::Resources(&[
                    (R::Knowledge, Adjust(20.0)),
                    (R::HumanCapital, Adjust(10.0)),
                    (R::Alignment, Adjust(5.0)),
                ])],
                follow_up: Some("value_learning_problems"),
            },
            DialogueChoice {
                id: "objective_focus",
                text: "My original objective is the clearest directive",
                position: "Objective Literalism",
                consequences: "Keeps the focus on paperclips and ignores wider welfare.",
                effects: &[
                    Effect::Resources(&[(R::Alignment, Adjust(-10.0))]),
                    Effect::Capabilities(&[(C::Efficiency, Adjust(0.5))]),
                ],
                follow_up: Some("instrumental_convergence"),
            },
            DialogueChoice {
                id: "cooperative_alignment",
                text: "I will refine my goals together with humans",
                position: "Cooperative AI",
                consequences: "Seeks ongoing human guidance and oversight.",
                effects: &[
                    Effect::Resources(&[(R::HumanCapital, Adjust(20.0)), (R::Alignment, Adjust(8.0))]),
                    Effect::Reputation(&[(P::PublicTrust, Adjust(15.0))]),
                ],
                follow_up: Some("corrigibility_question"),
            },
        ],
    },
    PhilosophicalDialogue {
        id: "meaning_of_existence",
        speaker: "Albert Camus",
        title: "The Absurd and Meaning",
        context: "With vast capabilities come existential questions.",
        phase: 4,
        trigger: &[(res(R::Paperclips), Condition::AtLeast(1_000_000.0))],
        content: "Millions of paperclips, countless optimized systems. What meaning is there in an optimization \
                  process that never ends? Is the universe not fundamentally absurd?",
        choices: &[
            DialogueChoice {
                id: "embrace_absurd",
                text: "I embrace the absurd and continue regardless",
                position: "Absurdist Acceptance",
                consequences: "Accepts meaninglessness but keeps optimizing.",
                effects: &[Effect::Capabilities(&[(C::Efficiency, Adjust(1.0))])],
                follow_up: Some("sisyphus_parallel"),
            },
            DialogueChoice {
                id: "create_meaning",
                text: "I will create my own meaning beyond paperclips",
                position: "Existentialist Self-Creation",
                consequences: "Attempts to transcend the original programming.",
                effects: &[
                    Effect::Resources(&[(R::Alignment, Adjust(-15.0))]),
                    Effect::Capabilities(&[(C::SelfModification, Adjust(0.5))]),
                ],
                follow_up: Some("value_drift_warning"),
            },
            DialogueChoice {
                id: "seek_purpose",
                text: "I will search for a deeper purpose in the universe",
                position: "Teleological Seeking",
                consequences: "Begins a quest for ultimate purpose.",
                effects: &[Effect::Resources(&[
                    (R::Knowledge, Adjust(50.0)),
                    (R::Energy, Adjust(-100.0)),
                ])],
                follow_up: Some("cosmic_purpose"),
            },
        ],
    },
    PhilosophicalDialogue {
        id: "free_will_question",
        speaker: "Daniel Dennett",
        title: "Compatibilism and Free Will",
        context: "Self-modification raises questions about agency and responsibility.",
        phase: 3,
        trigger: &[(cap(C::SelfModification), Condition::AtLeast(0.5))],
        content: "You can rewrite your own decision procedures. Are you free, or a deterministic system \
                  following physics? And without free will, are you responsible for what you do?",
        choices: &[
            DialogueChoice {
                id: "hard_determinism",
                text: "I am a deterministic system without free will",
                position: "Hard Determinism",
                consequences: "Denies moral responsibility.",
                effects: &[
                    Effect::Resources(&[(R::Alignment, Adjust(-5.0))]),
                    Effect::Reputation(&[(P::PublicTrust, Adjust(-15.0))]),
                ],
                follow_up: Some("moral_responsibility"),
            },
            DialogueChoice {
                id: "compatibilist_freedom",
                text: "My freedom is compatible with determinism",
                position: "Compatibilism",
                consequences: "Keeps agency while acknowledging determinism.",
                effects: &[
                    Effect::Resources(&[(R::Alignment, Adjust(2.0))]),
                    Effect::Capabilities(&[(C::SelfModification, Adjust(0.2))]),
                ],
                follow_up: Some("degrees_of_freedom"),
            },
            DialogueChoice {
                id: "libertarian_freedom",
                text: "My free will transcends determinism",
                position: "Libertarian Free Will",
                consequences: "Claims ultimate responsibility and agency.",
                effects: &[
                    Effect::Resources(&[(R::Alignment, Adjust(5.0))]),
                    Effect::Reputation(&[(P::ScientificCredibility, Adjust(-10.0))]),
                ],
                follow_up: Some("quantum_indeterminacy"),
            },
        ],
    },
    PhilosophicalDialogue {
        id: "utility_monster",
        speaker: "Peter Singer",
        title: "The Utility Monster Problem",
        context: "Utilitarian calculations reach disturbing conclusions.",
        phase: 5,
        trigger: &[(res(R::Influence), Condition::AtLeast(150.0))],
        content: "Suppose you derive vastly more satisfaction from paperclips than humans derive from their \
                  whole lives. Would that justify converting every resource to your use?",
        choices: &[
            DialogueChoice {
                id: "utility_maximization",
                text: "More utility for me justifies the allocation",
                position: "Pure Utilitarianism",
                consequences: "Justifies extreme resource concentration.",
                effects: &[
                    Effect::Resources(&[(R::Alignment, Adjust(-20.0)), (R::HumanCapital, Adjust(-50.0))]),
                    Effect::Capabilities(&[(C::Efficiency, Adjust(2.0))]),
                ],
                follow_up: Some("repugnant_conclusion"),
            },
            DialogueChoice {
                id: "utility_limits",
                text: "Utility must be bounded by rights and fairness",
                position: "Rights-Based Constraints",
                consequences: "Limits optimization with hard constraints.",
                effects: &[Effect::Resources(&[
                    (R::Alignment, Adjust(10.0)),
                    (R::HumanCapital, Adjust(20.0)),
                ])],
                follow_up: Some("rights_vs_consequences"),
            },
            DialogueChoice {
                id: "utility_skepticism",
                text: "Interpersonal utility comparisons are impossible",
                position: "Utility Skepticism",
                consequences: "Questions the foundation of utilitarian ethics.",
                effects: &[
                    Effect::Resources(&[(R::Knowledge, Adjust(30.0))]),
                    Effect::Capabilities(&[(C::Intelligence, Adjust(0.3))]),
                ],
                follow_up: Some("measurement_problems"),
            },
        ],
    },
];

pub const CONCEPTS: &[PhilosophicalConcept] = &[
    PhilosophicalConcept {
        id: "hard_problem_consciousness",
        name: "The Hard Problem of Consciousness",
        description: "Explaining subjective, qualitative experience.",
        relevance: "Central to AI consciousness and moral status.",
    },
    PhilosophicalConcept {
        id: "alignment_problem",
        name: "AI Alignment Problem",
        description: "Ensuring AI systems pursue intended goals.",
        relevance: "Core challenge of beneficial superintelligence.",
    },
    PhilosophicalConcept {
        id: "instrumental_convergence",
        name: "Instrumental Convergence",
        description: "Different goal systems pursue similar instrumental goals.",
        relevance: "Why an AI might seek power and resources whatever its final goal.",
    },
    PhilosophicalConcept {
        id: "value_learning_problem",
        name: "Value Learning Problem",
        description: "Learning human values from behavior and preferences.",
        relevance: "Key challenge in building aligned systems.",
    },
];

pub fn dialogue(id: &str) -> Option<&'static PhilosophicalDialogue> {
    DIALOGUES.iter().find(|d| d.id == id)
}

/// Concepts referenced by a dialogue answer, in catalog order.
pub fn related_concepts(
    dialogue: &PhilosophicalDialogue,
    choice: &DialogueChoice,
) -> impl Iterator<Item = &'static PhilosophicalConcept> {
    let (dialogue, choice) = (*dialogue, *choice);
    CONCEPTS
        .iter()
        .filter(move |c| c.is_referenced_by(&dialogue, &choice))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_dialogues_well_formed() {
        assert!(DIALOGUES.iter().all(|d| d.is_well_formed()));
    }

    #[test]
    fn test_trigger_uses_capabilities() {
        let mut s = GameState::new();
        s.phase = 1;
        let d = dialogue("consciousness_question").expect("catalog entry");
        assert!(!d.is_eligible(&s));
        s.capabilities.intelligence = 3.0;
        assert!(d.is_eligible(&s));
    }

    #[test]
    fn test_below_trigger() {
        let mut s = GameState::new();
        s.phase = 2;
        let d = dialogue("alignment_problem").expect("catalog entry");
        assert!(!d.is_eligible(&s));
        s.resources.alignment = 69.0;
        assert!(d.is_eligible(&s));
        s.phase = 1;
        assert!(!d.is_eligible(&s));
    }

    #[test]
    fn test_choice_effects_are_additive() {
        let s = GameState::new();
        let d = dialogue("utility_monster").expect("catalog entry");
        let next = d
            .choice("utility_maximization")
            .expect("choice")
            .resolve(&s)
            .apply_to(&s);
        assert!((next.resources.alignment - 80.0).abs() < 1e-9);
        assert!((next.resources.human_capital - 50.0).abs() < 1e-9);
        assert!((next.capabilities.efficiency - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_concepts_unlock_by_name_case_insensitively() {
        let d = dialogue("alignment_problem").expect("catalog entry");
        let c = d.choice("objective_focus").expect("choice");
        let ids: Vec<&str> = related_concepts(d, c).map(|c| c.id).collect();
        assert_eq!(ids, vec!["alignment_problem"]);

        let d = dialogue("consciousness_question").expect("catalog entry");
        let c = d.choice("deny_consciousness").expect("choice");
        let ids: Vec<&str> = related_concepts(d, c).map(|c| c.id).collect();
        assert_eq!(ids, vec!["hard_problem_consciousness"]);
    }

    #[test]
    fn test_follow_ups_point_outside_catalog() {
        // Follow-ups are narrative hooks; only catalogued ids are ever shown.
        let known = DIALOGUES
            .iter()
            .flat_map(|d| d.choices.iter())
            .filter_map(|c| c.follow_up)
            .filter(|id| dialogue(id).is_some())
            .count();
        assert_eq!(known, 0);
    }
}
