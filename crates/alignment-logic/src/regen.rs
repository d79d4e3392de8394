//! Passive regeneration applied by the 2-second ticker.

use crate::stats::Resources;

/// One regenerating field: rate per tick, cap, and an optional faster
/// recovery rate used while the value is negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegenRule {
    pub rate: f64,
    pub cap: f64,
    pub negative_rate: Option<f64>,
}

impl RegenRule {
    const fn new(rate: f64, cap: f64) -> Self {
        Self {
            rate,
            cap,
            negative_rate: None,
        }
    }

    const fn with_recovery(rate: f64, cap: f64, negative_rate: f64) -> Self {
        Self {
            rate,
            cap,
            negative_rate: Some(negative_rate),
        }
    }

    /// Values below the cap rise by the rate and are clamped to the cap.
    /// Values at or above the cap are left alone.
    pub fn step(&self, value: f64) -> f64 {
        if value >= self.cap {
            return value;
        }
        match self.negative_rate {
            Some(recovery) if value < 0.0 => value + recovery,
            _ => (value + self.rate).min(self.cap),
        }
    }
}

/// Regeneration table for one phase band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegenTable {
    pub energy: RegenRule,
    pub knowledge: Option<RegenRule>,
    pub human_capital: Option<RegenRule>,
}

const PHASE_ZERO: RegenTable = RegenTable {
    energy: RegenRule::new(0.5, 100.0),
    knowledge: None,
    human_capital: None,
};

const PHASE_ONE: RegenTable = RegenTable {
    energy: RegenRule::new(0.4, 100.0),
    knowledge: Some(RegenRule::new(0.3, 100.0)),
    human_capital: Some(RegenRule::with_recovery(0.2, 100.0, 0.5)),
};

const LATER_PHASES: RegenTable = RegenTable {
    energy: RegenRule::new(0.6, 200.0),
    knowledge: Some(RegenRule::new(0.4, 150.0)),
    human_capital: Some(RegenRule::with_recovery(0.3, 120.0, 0.7)),
};

pub fn regen_table(phase: u8) -> &'static RegenTable {
    match phase {
        0 => &PHASE_ZERO,
        1 => &PHASE_ONE,
        _ => &LATER_PHASES,
    }
}

/// Resources after one regeneration tick in the given phase.
pub fn regenerate(phase: u8, resources: &Resources) -> Resources {
    let table = regen_table(phase);
    let mut next = *resources;
    next.energy = table.energy.step(next.energy);
    if let Some(rule) = table.knowledge {
        next.knowledge = rule.step(next.knowledge);
    }
    if let Some(rule) = table.human_capital {
        next.human_capital = rule.step(next.human_capital);
    }
    next
}
