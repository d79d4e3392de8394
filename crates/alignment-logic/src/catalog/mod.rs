//! Static content tables.
//!
//! Every entry is keyed by a `&'static str` id and carries a minimum phase.
//! Costs are [`CostLine`](crate::stats::CostLine) tables and effects are
//! [`Effect`](crate::effects::Effect) lists, so nothing is looked up by
//! field name at runtime.

pub mod cosmic;
pub mod decisions;
pub mod dialogues;
pub mod operations;
pub mod technologies;

use serde::Serialize;

use crate::state::GameState;
use crate::stats::Stat;

pub use cosmic::*;
pub use decisions::*;
pub use dialogues::*;
pub use operations::*;
pub use technologies::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Extreme,
}

/// Comparison used by crisis and dialogue triggers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Condition {
    AtLeast(f64),
    Below(f64),
    Above(f64),
}

impl Condition {
    pub fn holds(self, value: f64) -> bool {
        match self {
            Condition::AtLeast(n) => value >= n,
            Condition::Below(n) => value < n,
            Condition::Above(n) => value > n,
        }
    }
}

pub type Trigger = (Stat, Condition);

/// All trigger conditions hold; an empty list always holds.
pub fn triggers_hold(triggers: &[Trigger], state: &GameState) -> bool {
    triggers
        .iter()
        .all(|&(stat, condition)| condition.holds(stat.read(&state.resources, &state.capabilities)))
}
