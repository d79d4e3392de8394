//! Virtual-clock task scheduler.
//!
//! Time only moves when the owner calls [`Scheduler::pop_due`] with a
//! horizon. Due tasks fire in deadline order; ties fire in registration
//! order. Recurring tasks keep their registration slot when re-armed.

use serde::Serialize;

use crate::timers::Completion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TaskId {
    Regeneration,
    Operations,
    Research,
    ProbeReplication,
    DebounceFlush,
    Complete(Completion),
    DialogueFollowUp(&'static str),
    DecisionConsequence(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct Task {
    id: TaskId,
    due: u64,
    every: Option<u64>,
    seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: u64,
    next_seq: u64,
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Register a recurring task. An already registered task is left as is.
    pub fn every(&mut self, id: TaskId, interval_ms: u64) -> bool {
        if self.is_scheduled(id) {
            return false;
        }
        let seq = self.bump_seq();
        self.tasks.push(Task {
            id,
            due: self.now + interval_ms,
            every: Some(interval_ms.max(1)),
            seq,
        });
        true
    }

    /// Arm a one-shot task, replacing any pending task with the same id.
    pub fn once(&mut self, id: TaskId, delay_ms: u64) {
        self.cancel(id);
        let seq = self.bump_seq();
        self.tasks.push(Task {
            id,
            due: self.now + delay_ms,
            every: None,
            seq,
        });
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Deadline of a scheduled task.
    pub fn due(&self, id: TaskId) -> Option<u64> {
        self.tasks.iter().find(|t| t.id == id).map(|t| t.due)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drop every task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Pop the earliest task due at or before `horizon`, moving the clock
    /// to its deadline. Recurring tasks are re-armed one period later.
    pub fn pop_due(&mut self, horizon: u64) -> Option<TaskId> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= horizon)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;

        let task = self.tasks[index];
        self.now = self.now.max(task.due);
        match task.every {
            Some(period) => self.tasks[index].due = task.due + period,
            None => {
                self.tasks.swap_remove(index);
            }
        }
        Some(task.id)
    }

    /// Move the clock forward without firing anything.
    pub fn settle(&mut self, time: u64) {
        self.now = self.now.max(time);
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler, horizon: u64) -> Vec<(u64, TaskId)> {
        let mut fired = Vec::new();
        while let Some(id) = s.pop_due(horizon) {
            fired.push((s.now(), id));
        }
        s.settle(horizon);
        fired
    }

    #[test]
    fn test_recurring_fires_each_period() {
        let mut s = Scheduler::new();
        s.every(TaskId::Regeneration, 2000);
        let fired = drain(&mut s, 6500);
        assert_eq!(
            fired,
            vec![
                (2000, TaskId::Regeneration),
                (4000, TaskId::Regeneration),
                (6000, TaskId::Regeneration),
            ]
        );
        assert_eq!(s.now(), 6500);
        assert_eq!(s.due(TaskId::Regeneration), Some(8000));
    }

    #[test]
    fn test_once_rearms() {
        let mut s = Scheduler::new();
        s.once(TaskId::DebounceFlush, 30);
        drain(&mut s, 20);
        s.once(TaskId::DebounceFlush, 30);
        assert!(drain(&mut s, 49).is_empty());
        assert_eq!(drain(&mut s, 50), vec![(50, TaskId::DebounceFlush)]);
        assert!(!s.is_scheduled(TaskId::DebounceFlush));
    }

    #[test]
    fn test_ties_fire_in_registration_order() {
        let mut s = Scheduler::new();
        s.every(TaskId::Regeneration, 2000);
        s.every(TaskId::Operations, 2000);
        s.every(TaskId::ProbeReplication, 1000);
        let fired: Vec<TaskId> = drain(&mut s, 2000).into_iter().map(|(_, id)| id).collect();
        assert_eq!(
            fired,
            vec![
                TaskId::ProbeReplication,
                TaskId::Regeneration,
                TaskId::Operations,
                TaskId::ProbeReplication,
            ]
        );
    }

    #[test]
    fn test_recurring_registration_is_idempotent() {
        let mut s = Scheduler::new();
        assert!(s.every(TaskId::Research, 3000));
        assert!(!s.every(TaskId::Research, 10));
        assert_eq!(s.due(TaskId::Research), Some(3000));
    }

    #[test]
    fn test_clear_and_cancel() {
        let mut s = Scheduler::new();
        s.every(TaskId::Regeneration, 2000);
        s.once(TaskId::DecisionConsequence("market_manipulation"), 10_000);
        assert!(s.cancel(TaskId::Regeneration));
        assert!(!s.cancel(TaskId::Regeneration));
        s.clear();
        assert!(s.is_empty());
        assert!(drain(&mut s, 100_000).is_empty());
    }
}
