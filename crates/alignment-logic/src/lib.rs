//! Pure progression rules for Alignment.
//!
//! This crate contains every rule of the game that is independent of a clock,
//! a random source or a running session. Functions take the current
//! [`GameState`](state::GameState) and return a
//! [`StateUpdate`](state::StateUpdate) (or `None` when the move is not
//! allowed), so they can be unit-tested in isolation and driven by any engine.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`actions`] | Player actions (production, corporate moves, conversions) and energy allocation |
//! | [`catalog`] | Static catalogs: technologies, operations, crises, decisions, dialogues, cosmic content |
//! | [`effects`] | Tagged effect deltas and their application to state |
//! | [`feedback`] | Alignment trajectory, consequence events and milestones |
//! | [`phases`] | The seven phases, unlock thresholds and the phase gate |
//! | [`regen`] | Per-phase passive regeneration table |
//! | [`state`] | `GameState` and the partial `StateUpdate` with merge semantics |
//! | [`stats`] | Resource, capability and reputation blocks plus cost helpers |

pub mod actions;
pub mod catalog;
pub mod effects;
pub mod feedback;
pub mod phases;
pub mod regen;
pub mod state;
pub mod stats;

pub use state::{GameState, StateUpdate};
