//! Alignment Core - session engine for the paperclip alignment game
//!
//! Drives the pure rules in `alignment_logic` through a virtual clock.
//!
//! # Architecture
//!
//! - **Store**: one `GameState` plus a coalescing update buffer
//! - **Scheduler**: named recurring and one-shot tasks on a virtual clock
//! - **Panels**: feature areas (decisions, resources, technology, dialogue,
//!   cosmic) that own their timers and prompts and propose updates
//! - **Session**: wires the above together, runs the phase gate and the
//!   feedback tracker after every applied transition
//!
//! # Example
//!
//! ```rust,no_run
//! use alignment_core::prelude::*;
//!
//! let mut session = Session::new(EngineConfig::default());
//! session.start();
//!
//! loop {
//!     let _ = session.perform(Action::ProduceBasic);
//!     session.advance(100);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod panels;
pub mod scheduler;
pub mod store;
pub mod timers;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::Session;
    pub use crate::error::ActionError;
    pub use crate::panels::PanelKind;
    pub use alignment_logic::actions::{Action, Allocation};
    pub use alignment_logic::{GameState, StateUpdate};
}
