//! Resource management: timed operations, crises and energy allocation.

use std::collections::BTreeSet;

use alignment_logic::actions::{allocate_energy, Allocation};
use alignment_logic::catalog::{operation, triggered_crisis, ResourceCrisis};
use alignment_logic::{GameState, StateUpdate};
use serde::Serialize;

use crate::error::ActionError;
use crate::timers::{ActivityTimers, Completion};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourcePanel {
    operations: ActivityTimers,
    pending: BTreeSet<&'static str>,
    crisis: Option<&'static ResourceCrisis>,
    allocation: Allocation,
}

impl ResourcePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn crisis(&self) -> Option<&'static ResourceCrisis> {
        self.crisis
    }

    pub fn allocation(&self) -> Allocation {
        self.allocation
    }

    pub fn operations(&self) -> &ActivityTimers {
        &self.operations
    }

    /// Start an operation; returns the input and ethical-cost debit.
    pub fn start_operation(&mut self, id: &str, state: &GameState) -> Result<StateUpdate, ActionError> {
        if self.crisis.is_some() {
            return Err(ActionError::Suspended);
        }
        let op = operation(id).ok_or_else(|| ActionError::UnknownEntry(id.to_string()))?;
        if op.phase > state.phase {
            return Err(ActionError::Locked(op.id.to_string()));
        }
        if self.operations.is_active(op.id) || self.pending.contains(op.id) {
            return Err(ActionError::AlreadyActive(op.id.to_string()));
        }
        if !op.can_start(state) {
            return Err(ActionError::Unaffordable(op.id.to_string()));
        }
        self.operations.start(op.id, op.duration);
        Ok(op.start(state))
    }

    /// One operation tick. Finished operations wait for completion.
    pub fn tick(&mut self) -> Vec<Completion> {
        let finished = self.operations.tick();
        self.pending.extend(finished.iter().copied());
        finished.into_iter().map(Completion::Operation).collect()
    }

    pub fn awaiting_completion(&self) -> impl Iterator<Item = Completion> + '_ {
        self.pending.iter().map(|id| Completion::Operation(*id))
    }

    pub fn complete(&mut self, id: &str, state: &GameState) -> Option<StateUpdate> {
        let id = self.pending.take(id)?;
        operation(id).map(|op| op.completion(state))
    }

    /// Raise the first triggered crisis when none is showing.
    pub fn check_crisis(&mut self, state: &GameState) -> Option<&'static ResourceCrisis> {
        if self.crisis.is_some() {
            return None;
        }
        self.crisis = triggered_crisis(state);
        self.crisis
    }

    /// Answer the current crisis. Solutions are not gated on cost.
    pub fn resolve_crisis(&mut self, solution_id: &str, state: &GameState) -> Result<StateUpdate, ActionError> {
        let crisis = self.crisis.ok_or(ActionError::NoPrompt)?;
        let solution = crisis
            .solution(solution_id)
            .ok_or_else(|| ActionError::UnknownEntry(solution_id.to_string()))?;
        self.crisis = None;
        Ok(solution.resolve(state))
    }

    /// Store the sliders and spend energy with them.
    pub fn allocate(&mut self, allocation: Allocation, state: &GameState) -> Result<StateUpdate, ActionError> {
        if self.crisis.is_some() {
            return Err(ActionError::Suspended);
        }
        let update =
            allocate_energy(state, allocation).ok_or(ActionError::InvalidAllocation(allocation.total()))?;
        self.allocation = allocation;
        Ok(update)
    }
}
