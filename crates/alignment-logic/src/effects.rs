//! Catalog effects as a tagged union over the three stat blocks.
//!
//! Each effect targets exactly one sub-object and carries a list of typed
//! field changes. A change either adjusts the current value or assigns a
//! new one. Applying a list of effects yields a [`StateUpdate`] whose
//! touched sub-objects are complete copies of the applied result.

use serde::Serialize;

use crate::state::{GameState, StateUpdate};
use crate::stats::{CapabilityKind, Capabilities, Reputation, ReputationKind, ResourceKind, Resources};

/// How a single field is changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Change {
    /// Add the amount to the current value (may be negative).
    Adjust(f64),
    /// Replace the current value.
    Assign(f64),
}

impl Change {
    pub fn apply(self, current: f64) -> f64 {
        match self {
            Change::Adjust(delta) => current + delta,
            Change::Assign(value) => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Effect {
    Resources(&'static [(ResourceKind, Change)]),
    Capabilities(&'static [(CapabilityKind, Change)]),
    Reputation(&'static [(ReputationKind, Change)]),
}

/// Working copy of the three stat blocks plus which of them were touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectTarget {
    pub resources: Resources,
    pub capabilities: Capabilities,
    pub reputation: Reputation,
    touched: [bool; 3],
}

impl EffectTarget {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            resources: state.resources,
            capabilities: state.capabilities,
            reputation: state.reputation,
            touched: [false; 3],
        }
    }

    pub fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::Resources(changes) => {
                for &(kind, change) in changes.iter() {
                    let field = self.resources.get_mut(kind);
                    *field = change.apply(*field);
                }
                self.touched[0] = true;
            }
            Effect::Capabilities(changes) => {
                for &(kind, change) in changes.iter() {
                    let field = self.capabilities.get_mut(kind);
                    *field = change.apply(*field);
                }
                self.touched[1] = true;
            }
            Effect::Reputation(changes) => {
                for &(kind, change) in changes.iter() {
                    let field = self.reputation.get_mut(kind);
                    *field = change.apply(*field);
                }
                self.touched[2] = true;
            }
        }
    }

    pub fn apply_all(&mut self, effects: &[Effect]) {
        for effect in effects {
            self.apply(effect);
        }
    }

    /// Adjust a single resource outside of a catalog effect.
    pub fn adjust_resource(&mut self, kind: ResourceKind, delta: f64) {
        *self.resources.get_mut(kind) += delta;
        self.touched[0] = true;
    }

    /// Replace the resource block wholesale (e.g. after a cost debit).
    pub fn set_resources(&mut self, resources: Resources) {
        self.resources = resources;
        self.touched[0] = true;
    }

    pub fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
        self.touched[1] = true;
    }

    /// Only the touched sub-objects are emitted.
    pub fn into_update(self) -> StateUpdate {
        StateUpdate {
            resources: self.touched[0].then_some(self.resources),
            capabilities: self.touched[1].then_some(self.capabilities),
            reputation: self.touched[2].then_some(self.reputation),
            ..StateUpdate::default()
        }
    }
}

/// Apply a list of effects to the given state and return the update.
pub fn apply_effects(state: &GameState, effects: &[Effect]) -> StateUpdate {
    let mut target = EffectTarget::from_state(state);
    target.apply_all(effects);
    target.into_update()
}

/// Whether any effect in the list targets the resource block.
pub fn has_resource_effect(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::Resources(_)))
}

/// Whether any resource effect already changes alignment.
pub fn touches_alignment(effects: &[Effect]) -> bool {
    effects.iter().any(|e| match e {
        Effect::Resources(changes) => changes
            .iter()
            .any(|(kind, _)| *kind == ResourceKind::Alignment),
        _ => false,
    })
}
