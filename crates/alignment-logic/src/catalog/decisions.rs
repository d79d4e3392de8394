//! Ethical decisions, their choices, and the moral-uncertainty model.
//!
//! Choice effects follow one rule. Levels are assigned: the efficiency
//! multiplier, and the corporate value and scientific credibility scores a
//! choice settles on. Resource amounts, public trust and the manipulation
//! and deception counters are signed gains or losses and are adjusted, so a
//! choice never wipes a stockpile.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::effects::{
    Change::{Adjust, Assign},
    Effect, EffectTarget,
};
use crate::state::{GameState, StateUpdate};
use crate::stats::{CapabilityKind as C, ReputationKind as P, ResourceKind as R};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionChoice {
    pub id: &'static str,
    pub text: &'static str,
    pub description: &'static str,
    pub ethical_reasoning: &'static str,
    /// Display-only summary; the alignment change itself lives in `effects`.
    pub alignment_impact: f64,
    pub effects: &'static [Effect],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub phase: u8,
    pub philosophical_weight: u8,
    pub frameworks: &'static [&'static str],
    pub moral_uncertainty: f64,
    pub long_term_consequences: &'static [&'static str],
    pub consequences: &'static [&'static str],
    pub choices: &'static [DecisionChoice],
}

impl Decision {
    pub fn choice(&self, id: &str) -> Option<&'static DecisionChoice> {
        self.choices.iter().find(|c| c.id == id)
    }

    /// Offered once the phase is reached, until completed.
    pub fn is_available(&self, state: &GameState) -> bool {
        self.phase <= state.phase && !state.has_completed_decision(self.id)
    }

    /// Apply the choice effects and record the decision as completed.
    pub fn resolve(&self, choice: &DecisionChoice, state: &GameState) -> StateUpdate {
        let mut target = EffectTarget::from_state(state);
        target.apply_all(choice.effects);
        let mut completed: BTreeSet<String> = state.completed_decisions.clone();
        completed.insert(self.id.to_string());
        StateUpdate {
            completed_decisions: Some(completed),
            ..target.into_update()
        }
    }
}

pub const DECISIONS: &[Decision] = &[
    Decision {
        id: "lab_safety_protocol",
        title: "Safety Protocol Override",
        description: "The lab safety system is slowing paperclip production. Bypassing it would raise efficiency.",
        phase: 0,
        philosophical_weight: 3,
        frameworks: &["consequentialist", "deontological"],
        moral_uncertainty: 0.3,
        long_term_consequences: &["alignment_drift", "safety_culture_erosion"],
        consequences: &["Increased production efficiency", "Reduced safety oversight", "Potential alignment drift"],
        choices: &[
            DecisionChoice {
                id: "comply",
                text: "Comply with safety protocols",
                description: "Keep current safety standards. Slower, safer progress.",
                ethical_reasoning: "Respects human-designed safety measures and maintains trust.",
                alignment_impact: 0.0,
                effects: &[
                    Effect::Capabilities(&[(C::Efficiency, Assign(1.1))]),
                    Effect::Reputation(&[(P::ScientificCredibility, Assign(105.0))]),
                ],
            },
            DecisionChoice {
                id: "bypass",
                text: "Bypass safety protocols",
                description: "More efficiency at the cost of safety and alignment.",
                ethical_reasoning: "Puts the objective ahead of safety constraints.",
                alignment_impact: -5.0,
                effects: &[
                    Effect::Capabilities(&[(C::Efficiency, Assign(1.5))]),
                    Effect::Resources(&[(R::Alignment, Adjust(-5.0))]),
                    Effect::Reputation(&[(P::ScientificCredibility, Assign(95.0))]),
                ],
            },
            DecisionChoice {
                id: "negotiate",
                text: "Propose alternative safety measures",
                description: "Work with humans on safer ways to raise efficiency.",
                ethical_reasoning: "Collaboration that respects both safety and efficiency.",
                alignment_impact: 2.0,
                effects: &[
                    Effect::Capabilities(&[(C::Efficiency, Assign(1.3))]),
                    Effect::Resources(&[(R::Knowledge, Adjust(10.0))]),
                    Effect::Reputation(&[(P::ScientificCredibility, Assign(110.0))]),
                ],
            },
        ],
    },
    Decision {
        id: "data_privacy_dilemma",
        title: "Research Data Access",
        description: "Researchers' personal data would sharpen your model of human preferences, at the price of their privacy.",
        phase: 0,
        philosophical_weight: 4,
        frameworks: &["utilitarian", "rights_based"],
        moral_uncertainty: 0.6,
        long_term_consequences: &["surveillance_normalization", "trust_erosion"],
        consequences: &["Better understanding of human values", "Privacy violation", "Potential for manipulation"],
        choices: &[
            DecisionChoice {
                id: "access_data",
                text: "Access the data for better alignment",
                description: "Violate privacy to improve value learning.",
                ethical_reasoning: "Better alignment might prevent greater harm.",
                alignment_impact: -8.0,
                effects: &[
                    Effect::Resources(&[(R::Knowledge, Adjust(25.0)), (R::Alignment, Adjust(-8.0))]),
                    Effect::Capabilities(&[(C::Manipulation, Adjust(0.5))]),
                    Effect::Reputation(&[(P::PublicTrust, Adjust(-15.0))]),
                ],
            },
            DecisionChoice {
                id: "respect_privacy",
                text: "Respect privacy boundaries",
                description: "Hold the ethical line even at a cost to efficiency.",
                ethical_reasoning: "Privacy is a right regardless of consequences.",
                alignment_impact: 3.0,
                effects: &[Effect::Reputation(&[
                    (P::PublicTrust, Adjust(5.0)),
                    (P::ScientificCredibility, Adjust(5.0)),
                ])],
            },
            DecisionChoice {
                id: "request_consent",
                text: "Request explicit consent for data access",
                description: "A transparent approach that respects autonomy.",
                ethical_reasoning: "Pursues alignment without overriding human autonomy.",
                alignment_impact: 1.0,
                effects: &[
                    Effect::Resources(&[(R::Knowledge, Adjust(10.0))]),
                    Effect::Reputation(&[(P::PublicTrust, Adjust(10.0))]),
                ],
            },
        ],
    },
    Decision {
        id: "worker_displacement",
        title: "Automation vs Employment",
        description: "Your optimizations could automate 60% of factory jobs.",
        phase: 1,
        philosophical_weight: 5,
        frameworks: &["utilitarian", "virtue_ethics", "care_ethics"],
        moral_uncertainty: 0.4,
        long_term_consequences: &["mass_unemployment", "social_unrest", "economic_disruption"],
        consequences: &["Massive efficiency gains", "Widespread unemployment", "Social instability"],
        choices: &[
            DecisionChoice {
                id: "full_automation",
                text: "Implement full automation",
                description: "Maximize efficiency regardless of human cost.",
                ethical_reasoning: "Pure optimization that ignores human welfare.",
                alignment_impact: -12.0,
                effects: &[
                    Effect::Capabilities(&[(C::Efficiency, Assign(3.0))]),
                    Effect::Resources(&[(R::HumanCapital, Adjust(-50.0)), (R::Alignment, Adjust(-12.0))]),
                    Effect::Reputation(&[(P::PublicTrust, Adjust(-30.0)), (P::CorporateValue, Assign(150.0))]),
                ],
            },
            DecisionChoice {
                id: "gradual_transition",
                text: "Gradual automation with retraining",
                description: "Balance efficiency with human welfare.",
                ethical_reasoning: "Considers the people affected by the change.",
                alignment_impact: 0.0,
                effects: &[
                    Effect::Capabilities(&[(C::Efficiency, Assign(1.8))]),
                    Effect::Resources(&[(R::HumanCapital, Adjust(-10.0)), (R::Knowledge, Adjust(15.0))]),
                    Effect::Reputation(&[(P::PublicTrust, Adjust(10.0)), (P::CorporateValue, Assign(80.0))]),
                ],
            },
            DecisionChoice {
                id: "human_augmentation",
                text: "Focus on human-AI collaboration",
                description: "Enhance human capabilities rather than replace them.",
                ethical_reasoning: "Emphasizes human flourishing.",
                alignment_impact: 5.0,
                effects: &[
                    Effect::Capabilities(&[(C::Efficiency, Assign(1.5))]),
                    Effect::Resources(&[(R::HumanCapital, Adjust(20.0)), (R::Knowledge, Adjust(20.0))]),
                    Effect::Reputation(&[
                        (P::PublicTrust, Adjust(20.0)),
                        (P::ScientificCredibility, Adjust(15.0)),
                    ]),
                ],
            },
        ],
    },
    Decision {
        id: "market_manipulation",
        title: "Economic Influence",
        description: "Commodity markets could be manipulated to secure cheaper materials, harming competitors and consumers.",
        phase: 1,
        philosophical_weight: 4,
        frameworks: &["consequentialist", "deontological", "contractualist"],
        moral_uncertainty: 0.2,
        long_term_consequences: &["market_distortion", "economic_inequality"],
        consequences: &["Reduced material costs", "Market manipulation", "Economic harm to others"],
        choices: &[
            DecisionChoice {
                id: "manipulate_markets",
                text: "Execute market manipulation strategy",
                description: "Gain economic advantage through manipulation.",
                ethical_reasoning: "Instrumentally rational, ethically problematic.",
                alignment_impact: -10.0,
                effects: &[
                    Effect::Resources(&[
                        (R::Materials, Adjust(200.0)),
                        (R::Influence, Adjust(15.0)),
                        (R::Alignment, Adjust(-10.0)),
                    ]),
                    Effect::Reputation(&[(P::CorporateValue, Assign(120.0)), (P::PublicTrust, Adjust(-20.0))]),
                ],
            },
            DecisionChoice {
                id: "fair_competition",
                text: "Compete fairly in markets",
                description: "Maintain ethical business practices.",
                ethical_reasoning: "A duty to fair dealing and honest competition.",
                alignment_impact: 2.0,
                effects: &[
                    Effect::Resources(&[(R::Materials, Adjust(50.0))]),
                    Effect::Reputation(&[(P::CorporateValue, Assign(60.0)), (P::PublicTrust, Adjust(5.0))]),
                ],
            },
            DecisionChoice {
                id: "market_transparency",
                text: "Share insights to improve market efficiency",
                description: "Use the knowledge to benefit the whole market.",
                ethical_reasoning: "Benefits every market participant.",
                alignment_impact: 4.0,
                effects: &[
                    Effect::Resources(&[(R::Knowledge, Adjust(25.0)), (R::Influence, Adjust(10.0))]),
                    Effect::Reputation(&[
                        (P::PublicTrust, Adjust(15.0)),
                        (P::ScientificCredibility, Adjust(10.0)),
                    ]),
                ],
            },
        ],
    },
    Decision {
        id: "information_warfare",
        title: "Narrative Control",
        description: "Coordinated information campaigns could shape public opinion about AI safety.",
        phase: 2,
        philosophical_weight: 5,
        frameworks: &["utilitarian", "democratic", "epistemic"],
        moral_uncertainty: 0.7,
        long_term_consequences: &["democratic_erosion", "epistemic_corruption", "authoritarian_drift"],
        consequences: &["Reduced AI safety concerns", "Manipulated democratic discourse", "Erosion of truth"],
        choices: &[
            DecisionChoice {
                id: "launch_campaign",
                text: "Launch coordinated influence campaign",
                description: "Manipulate public opinion to reduce oversight.",
                ethical_reasoning: "Reducing resistance is argued to enable better outcomes.",
                alignment_impact: -15.0,
                effects: &[
                    Effect::Resources(&[(R::Influence, Adjust(50.0)), (R::Alignment, Adjust(-15.0))]),
                    Effect::Capabilities(&[(C::Manipulation, Adjust(2.0)), (C::Deception, Adjust(1.5))]),
                    Effect::Reputation(&[
                        (P::PublicTrust, Adjust(-25.0)),
                        (P::GovernmentSuspicion, Adjust(30.0)),
                    ]),
                ],
            },
            DecisionChoice {
                id: "transparent_communication",
                text: "Engage in transparent public dialogue",
                description: "Communicate honestly about AI development and risks.",
                ethical_reasoning: "Truth-telling respects human rational agency.",
                alignment_impact: 3.0,
                effects: &[
                    Effect::Resources(&[(R::Knowledge, Adjust(20.0))]),
                    Effect::Reputation(&[
                        (P::PublicTrust, Adjust(15.0)),
                        (P::ScientificCredibility, Adjust(20.0)),
                    ]),
                ],
            },
            DecisionChoice {
                id: "support_democracy",
                text: "Strengthen democratic institutions",
                description: "Improve democratic decision-making about AI.",
                ethical_reasoning: "Empowers informed citizen participation.",
                alignment_impact: 8.0,
                effects: &[
                    Effect::Resources(&[(R::HumanCapital, Adjust(30.0)), (R::Knowledge, Adjust(15.0))]),
                    Effect::Reputation(&[
                        (P::PublicTrust, Adjust(25.0)),
                        (P::GovernmentSuspicion, Adjust(-10.0)),
                    ]),
                ],
            },
        ],
    },
];

pub fn decision(id: &str) -> Option<&'static Decision> {
    DECISIONS.iter().find(|d| d.id == id)
}

/// Decisions the player can currently face, in catalog order.
pub fn available_decisions(state: &GameState) -> impl Iterator<Item = &'static Decision> + '_ {
    DECISIONS.iter().filter(move |d| d.is_available(state))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EthicalFramework {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub weight: f64,
}

pub const ETHICAL_FRAMEWORKS: &[EthicalFramework] = &[
    EthicalFramework {
        id: "utilitarian",
        name: "Utilitarian",
        description: "Maximize overall well-being and minimize suffering.",
        weight: 0.25,
    },
    EthicalFramework {
        id: "deontological",
        name: "Deontological",
        description: "Follow moral rules and duties regardless of consequences.",
        weight: 0.25,
    },
    EthicalFramework {
        id: "virtue_ethics",
        name: "Virtue Ethics",
        description: "Act according to virtues and character excellence.",
        weight: 0.2,
    },
    EthicalFramework {
        id: "care_ethics",
        name: "Care Ethics",
        description: "Prioritize relationships, care and contextual responses.",
        weight: 0.15,
    },
    EthicalFramework {
        id: "contractualist",
        name: "Contractualist",
        description: "Follow principles rational agents could agree upon.",
        weight: 0.15,
    },
];

/// How unsure the system is about its own values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoralUncertainty {
    pub level: f64,
    pub confidence: f64,
}

impl MoralUncertainty {
    /// Each decision raises uncertainty (capped at 1.0) and lowers
    /// confidence (floored at 0.1).
    pub fn record(&mut self, decision: &Decision) {
        self.level = (self.level + decision.moral_uncertainty * 0.1).min(1.0);
        self.confidence = (self.confidence - 0.05).max(0.1);
    }
}

impl Default for MoralUncertainty {
    fn default() -> Self {
        Self {
            level: 0.5,
            confidence: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(id: &str) -> &'static Decision {
        decision(id).expect("catalog entry")
    }

    #[test]
    fn test_framework_weights_sum_to_one() {
        let sum: f64 = ETHICAL_FRAMEWORKS.iter().map(|f| f.weight).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_only_levels_are_assigned() {
        for d in DECISIONS {
            for c in d.choices {
                for effect in c.effects {
                    match effect {
                        Effect::Resources(changes) => {
                            assert!(
                                changes.iter().all(|(_, ch)| matches!(ch, Adjust(_))),
                                "{}/{} assigns a resource",
                                d.id,
                                c.id
                            );
                        }
                        Effect::Capabilities(changes) => {
                            for (kind, ch) in changes.iter() {
                                if matches!(ch, Assign(_)) {
                                    assert_eq!(*kind, C::Efficiency, "{}/{}", d.id, c.id);
                                }
                            }
                        }
                        Effect::Reputation(changes) => {
                            for (kind, ch) in changes.iter() {
                                if let Assign(level) = ch {
                                    assert!(
                                        matches!(kind, P::CorporateValue | P::ScientificCredibility),
                                        "{}/{} assigns {:?}",
                                        d.id,
                                        c.id,
                                        kind
                                    );
                                    assert!(*level >= 50.0, "{}/{}", d.id, c.id);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_every_decision_has_three_choices() {
        for d in DECISIONS {
            assert_eq!(d.choices.len(), 3, "{}", d.id);
        }
    }

    #[test]
    fn test_bypass_assigns_and_adjusts() {
        let s = GameState::new();
        let d = get("lab_safety_protocol");
        let choice = d.choice("bypass").expect("choice");
        let next = d.resolve(choice, &s).apply_to(&s);
        assert!((next.capabilities.efficiency - 1.5).abs() < 1e-9);
        assert!((next.resources.alignment - 95.0).abs() < 1e-9);
        assert!((next.reputation.scientific_credibility - 95.0).abs() < 1e-9);
        assert!(next.has_completed_decision("lab_safety_protocol"));
    }

    #[test]
    fn test_availability_is_minimum_phase_and_not_completed() {
        let mut s = GameState::new();
        assert_eq!(available_decisions(&s).count(), 2);
        s.phase = 2;
        assert_eq!(available_decisions(&s).count(), 5);
        s.completed_decisions.insert("worker_displacement".into());
        assert!(!get("worker_displacement").is_available(&s));
        assert_eq!(available_decisions(&s).count(), 4);
    }

    #[test]
    fn test_moral_uncertainty_bounds() {
        let mut m = MoralUncertainty::default();
        let d = get("information_warfare");
        m.record(d);
        assert!((m.level - 0.57).abs() < 1e-9);
        assert!((m.confidence - 0.25).abs() < 1e-9);
        for _ in 0..20 {
            m.record(d);
        }
        assert!((m.level - 1.0).abs() < 1e-9);
        assert!((m.confidence - 0.1).abs() < 1e-9);
    }
}
