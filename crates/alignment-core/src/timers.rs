//! Tick-counted timed activities owned by the panels.

use std::collections::BTreeMap;

use serde::Serialize;

/// A finished activity whose effects are waiting for the completion delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Completion {
    Operation(&'static str),
    Technology(&'static str),
    Project(&'static str),
    ProbeCycle(&'static str),
}

/// In-progress activities keyed by catalog id, with remaining ticks.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityTimers {
    active: BTreeMap<&'static str, u32>,
}

impl ActivityTimers {
    pub fn new() -> Self {
        Self {
            active: BTreeMap::new(),
        }
    }

    /// Start an activity. Returns `false` if it is already running.
    pub fn start(&mut self, id: &'static str, ticks: u32) -> bool {
        if self.active.contains_key(id) {
            return false;
        }
        self.active.insert(id, ticks);
        true
    }

    /// Advance every activity by one tick and drain the finished ones.
    ///
    /// An activity with one tick left (or zero) finishes on this tick.
    pub fn tick(&mut self) -> Vec<&'static str> {
        let mut finished = Vec::new();
        self.active.retain(|id, remaining| {
            if *remaining > 1 {
                *remaining -= 1;
                true
            } else {
                finished.push(*id);
                false
            }
        });
        finished
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains_key(id)
    }

    pub fn remaining(&self, id: &str) -> Option<u32> {
        self.active.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        self.active.iter().map(|(id, ticks)| (*id, *ticks))
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

impl Default for ActivityTimers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finishes_after_duration_ticks() {
        let mut t = ActivityTimers::new();
        assert!(t.start("basic_optimization", 3));
        assert!(t.tick().is_empty());
        assert!(t.tick().is_empty());
        assert_eq!(t.remaining("basic_optimization"), Some(1));
        assert_eq!(t.tick(), vec!["basic_optimization"]);
        assert!(t.is_empty());
    }

    #[test]
    fn test_duplicate_start_rejected() {
        let mut t = ActivityTimers::new();
        assert!(t.start("energy_optimization", 3));
        assert!(!t.start("energy_optimization", 9));
        assert_eq!(t.remaining("energy_optimization"), Some(3));
    }

    #[test]
    fn test_zero_duration_finishes_on_first_tick() {
        let mut t = ActivityTimers::new();
        t.start("instant", 0);
        assert_eq!(t.tick(), vec!["instant"]);
    }

    #[test]
    fn test_independent_activities() {
        let mut t = ActivityTimers::new();
        t.start("a", 1);
        t.start("b", 2);
        assert_eq!(t.tick(), vec!["a"]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.tick(), vec!["b"]);
    }
}
