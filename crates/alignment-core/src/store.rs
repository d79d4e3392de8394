//! Game state store with a coalescing update buffer.
//!
//! Submitted updates merge into one pending update (last writer wins per
//! top-level key) until the session flushes it. The flush deadline itself
//! lives in the scheduler; the store only buffers and applies.

use alignment_logic::{GameState, StateUpdate};

#[derive(Debug, Clone, Default)]
pub struct GameStore {
    state: GameState,
    pending: Option<StateUpdate>,
    revision: u64,
}

impl GameStore {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            pending: None,
            revision: 0,
        }
    }

    /// Last applied state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Number of applied transitions.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&StateUpdate> {
        self.pending.as_ref()
    }

    /// State as it will look once the buffer is flushed.
    pub fn projected(&self) -> GameState {
        match &self.pending {
            Some(pending) => pending.clone().apply_to(&self.state),
            None => self.state.clone(),
        }
    }

    pub fn submit(&mut self, update: StateUpdate) {
        match &mut self.pending {
            Some(pending) => pending.merge(update),
            None => self.pending = Some(update),
        }
    }

    /// Apply the pending buffer as one transition.
    ///
    /// Returns `false` when nothing was pending or the result equals the
    /// current state.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(update) => self.apply_now(update),
            None => false,
        }
    }

    /// Apply an update immediately, bypassing the buffer.
    pub fn apply_now(&mut self, update: StateUpdate) -> bool {
        if update.is_empty() {
            return false;
        }
        let next = update.apply_to(&self.state);
        if next == self.state {
            return false;
        }
        self.state = next;
        self.revision += 1;
        true
    }

    pub fn discard_pending(&mut self) -> Option<StateUpdate> {
        self.pending.take()
    }
}
