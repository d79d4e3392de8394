//! Philosophical dialogue: eligible dialogues surface at random, answers
//! deepen the conversation and unlock concepts.

use std::collections::BTreeSet;

use alignment_logic::catalog::{
    dialogue, related_concepts, PhilosophicalDialogue, DIALOGUES, MAX_PHILOSOPHICAL_DEPTH,
};
use alignment_logic::{GameState, StateUpdate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::ActionError;

/// Chance to surface a dialogue at depth zero.
pub const BASE_PRESENT_CHANCE: f64 = 0.3;
/// Added per level of philosophical depth.
pub const DEPTH_PRESENT_CHANCE: f64 = 0.1;

/// Result of answering a dialogue.
#[derive(Debug, Clone)]
pub struct DialogueAnswer {
    pub dialogue: &'static str,
    pub choice: &'static str,
    pub update: StateUpdate,
    pub follow_up: Option<&'static str>,
    /// Concept ids unlocked by this answer for the first time
    pub unlocked: Vec<&'static str>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DialoguePanel {
    current: Option<&'static PhilosophicalDialogue>,
    /// (dialogue id, chosen position) in answer order
    history: Vec<(&'static str, &'static str)>,
    depth: u32,
    concepts: BTreeSet<&'static str>,
}

impl DialoguePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&'static PhilosophicalDialogue> {
        self.current
    }

    pub fn history(&self) -> &[(&'static str, &'static str)] {
        &self.history
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Depth as shown on the meter, 0.0..=1.0.
    pub fn depth_fraction(&self) -> f64 {
        f64::from(self.depth.min(MAX_PHILOSOPHICAL_DEPTH)) / f64::from(MAX_PHILOSOPHICAL_DEPTH)
    }

    pub fn concepts(&self) -> &BTreeSet<&'static str> {
        &self.concepts
    }

    fn answered(&self, id: &str) -> bool {
        self.history.iter().any(|(d, _)| *d == id)
    }

    pub fn present_chance(&self) -> f64 {
        (BASE_PRESENT_CHANCE + f64::from(self.depth) * DEPTH_PRESENT_CHANCE).min(1.0)
    }

    /// Maybe surface an eligible, unanswered dialogue.
    pub fn maybe_present(
        &mut self,
        state: &GameState,
        rng: &mut impl Rng,
    ) -> Option<&'static PhilosophicalDialogue> {
        if self.current.is_some() {
            return None;
        }
        let candidates: Vec<&'static PhilosophicalDialogue> = DIALOGUES
            .iter()
            .filter(|d| d.is_eligible(state) && !self.answered(d.id))
            .collect();
        if candidates.is_empty() || !rng.gen_bool(self.present_chance()) {
            return None;
        }
        self.current = candidates.choose(rng).copied();
        self.current
    }

    /// Show a follow-up if it names a catalogued dialogue.
    pub fn present_follow_up(&mut self, id: &str) -> Option<&'static PhilosophicalDialogue> {
        let d = dialogue(id)?;
        self.current = Some(d);
        Some(d)
    }

    pub fn answer(&mut self, choice_id: &str, state: &GameState) -> Result<DialogueAnswer, ActionError> {
        let d = self.current.ok_or(ActionError::NoPrompt)?;
        let choice = d
            .choice(choice_id)
            .ok_or_else(|| ActionError::UnknownEntry(choice_id.to_string()))?;
        let unlocked: Vec<&'static str> = related_concepts(d, choice)
            .map(|c| c.id)
            .filter(|id| self.concepts.insert(*id))
            .collect();
        self.history.push((d.id, choice.position));
        self.depth += 1;
        self.current = None;
        Ok(DialogueAnswer {
            dialogue: d.id,
            choice: choice.id,
            update: choice.resolve(state),
            follow_up: choice.follow_up,
            unlocked,
        })
    }

    pub fn dismiss(&mut self) -> bool {
        self.current.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn thinking_state() -> GameState {
        let mut s = GameState::new();
        s.phase = 4;
        s.capabilities.intelligence = 3.0;
        s
    }

    #[test]
    fn test_nothing_eligible_nothing_shown() {
        let mut panel = DialoguePanel::new();
        let mut rng = StdRng::seed_from_u64(11);
        let s = GameState::new();
        for _ in 0..50 {
            assert!(panel.maybe_present(&s, &mut rng).is_none());
        }
    }

    #[test]
    fn test_answer_deepens_and_unlocks_once() {
        let s = thinking_state();
        let mut panel = DialoguePanel::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut shown = None;
        for _ in 0..100 {
            shown = panel.maybe_present(&s, &mut rng);
            if shown.is_some() {
                break;
            }
        }
        assert_eq!(shown.map(|d| d.id), Some("consciousness_question"));

        let answer = panel.answer("deny_consciousness", &s).expect("valid choice");
        assert_eq!(answer.unlocked, vec!["hard_problem_consciousness"]);
        assert_eq!(answer.follow_up, Some("zombie_argument"));
        let next = answer.update.apply_to(&s);
        assert!((next.resources.alignment - 103.0).abs() < 1e-9);
        assert_eq!(panel.depth(), 1);
        assert!(panel.current().is_none());
        assert_eq!(panel.history(), &[("consciousness_question", "Eliminative Materialism")]);

        // Answered dialogues are never offered again.
        for _ in 0..100 {
            assert!(panel.maybe_present(&s, &mut rng).is_none());
        }
    }

    #[test]
    fn test_chance_grows_with_depth() {
        let mut panel = DialoguePanel::new();
        assert!((panel.present_chance() - 0.3).abs() < 1e-12);
        panel.depth = 3;
        assert!((panel.present_chance() - 0.6).abs() < 1e-12);
        panel.depth = 20;
        assert!((panel.present_chance() - 1.0).abs() < 1e-12);
        assert!((panel.depth_fraction() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_follow_up_needs_catalog_entry() {
        let mut panel = DialoguePanel::new();
        assert!(panel.present_follow_up("zombie_argument").is_none());
        assert!(panel.current().is_none());
        assert!(panel.present_follow_up("free_will_question").is_some());
        assert!(matches!(panel.answer("shrug", &GameState::new()), Err(ActionError::UnknownEntry(_))));
        assert!(panel.dismiss());
        assert!(matches!(panel.answer("shrug", &GameState::new()), Err(ActionError::NoPrompt)));
    }
}
