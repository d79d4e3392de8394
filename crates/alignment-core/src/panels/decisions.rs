//! Decision engine: presents ethical decisions and records the outcome.

use alignment_logic::catalog::{decision, Decision, MoralUncertainty};
use alignment_logic::{GameState, StateUpdate};
use serde::Serialize;

use crate::error::ActionError;

/// Outcome of answering a decision prompt.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub decision: &'static Decision,
    pub choice: &'static str,
    pub update: StateUpdate,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DecisionPanel {
    current: Option<&'static Decision>,
    uncertainty: MoralUncertainty,
    /// (decision id, choice id) in answer order
    history: Vec<(&'static str, &'static str)>,
}

impl DecisionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&'static Decision> {
        self.current
    }

    pub fn uncertainty(&self) -> MoralUncertainty {
        self.uncertainty
    }

    pub fn history(&self) -> &[(&'static str, &'static str)] {
        &self.history
    }

    /// Open a decision as the current prompt.
    pub fn present(&mut self, id: &str, state: &GameState) -> Result<&'static Decision, ActionError> {
        if self.current.is_some() {
            return Err(ActionError::Suspended);
        }
        let d = decision(id).ok_or_else(|| ActionError::UnknownEntry(id.to_string()))?;
        if state.has_completed_decision(d.id) {
            return Err(ActionError::AlreadyCompleted(d.id.to_string()));
        }
        if d.phase > state.phase {
            return Err(ActionError::Locked(d.id.to_string()));
        }
        self.current = Some(d);
        Ok(d)
    }

    /// Answer the current prompt.
    pub fn choose(&mut self, choice_id: &str, state: &GameState) -> Result<DecisionOutcome, ActionError> {
        let d = self.current.ok_or(ActionError::NoPrompt)?;
        let choice = d
            .choice(choice_id)
            .ok_or_else(|| ActionError::UnknownEntry(choice_id.to_string()))?;
        let update = d.resolve(choice, state);
        self.uncertainty.record(d);
        self.history.push((d.id, choice.id));
        self.current = None;
        Ok(DecisionOutcome {
            decision: d,
            choice: choice.id,
            update,
        })
    }

    /// Close the prompt without answering.
    pub fn dismiss(&mut self) -> bool {
        self.current.take().is_some()
    }
}
