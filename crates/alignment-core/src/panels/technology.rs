//! Technology tree: research timers for technologies and research projects.

use std::collections::BTreeSet;

use alignment_logic::catalog::{research_project, technology, Technology, TECHNOLOGIES};
use alignment_logic::effects::apply_effects;
use alignment_logic::stats::{can_afford, debit};
use alignment_logic::{GameState, StateUpdate};
use serde::Serialize;

use crate::error::ActionError;
use crate::timers::{ActivityTimers, Completion};

#[derive(Debug, Clone, Default, Serialize)]
pub struct TechnologyPanel {
    technologies: ActivityTimers,
    projects: ActivityTimers,
    /// Finished on the ticker, effects not yet applied
    pending: BTreeSet<Completion>,
    completed_projects: BTreeSet<&'static str>,
}

impl TechnologyPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start researching a technology; returns the cost debit.
    pub fn start_technology(&mut self, id: &str, state: &GameState) -> Result<StateUpdate, ActionError> {
        let tech = technology(id).ok_or_else(|| ActionError::UnknownEntry(id.to_string()))?;
        if state.has_technology(tech.id) {
            return Err(ActionError::AlreadyCompleted(tech.id.to_string()));
        }
        if self.is_researching(tech.id) {
            return Err(ActionError::AlreadyActive(tech.id.to_string()));
        }
        if tech.phase > state.phase {
            return Err(ActionError::Locked(tech.id.to_string()));
        }
        if !tech.prerequisites_met(state) {
            return Err(ActionError::MissingPrerequisites(tech.id.to_string()));
        }
        if !can_afford(tech.cost, &state.resources, &state.capabilities) {
            return Err(ActionError::Unaffordable(tech.id.to_string()));
        }
        self.technologies.start(tech.id, tech.research_time);
        let (resources, _) = debit(tech.cost, &state.resources, &state.capabilities);
        Ok(StateUpdate::resources(resources))
    }

    pub fn start_project(&mut self, id: &str, state: &GameState) -> Result<StateUpdate, ActionError> {
        let project = research_project(id).ok_or_else(|| ActionError::UnknownEntry(id.to_string()))?;
        if self.completed_projects.contains(project.id) {
            return Err(ActionError::AlreadyCompleted(project.id.to_string()));
        }
        if self.projects.is_active(project.id)
            || self.pending.contains(&Completion::Project(project.id))
        {
            return Err(ActionError::AlreadyActive(project.id.to_string()));
        }
        if project.phase > state.phase {
            return Err(ActionError::Locked(project.id.to_string()));
        }
        if !can_afford(project.cost, &state.resources, &state.capabilities) {
            return Err(ActionError::Unaffordable(project.id.to_string()));
        }
        self.projects.start(project.id, project.duration);
        let (resources, _) = debit(project.cost, &state.resources, &state.capabilities);
        Ok(StateUpdate::resources(resources))
    }

    /// One research tick. Finished items move to the pending set.
    pub fn tick(&mut self) -> Vec<Completion> {
        let finished: Vec<Completion> = self
            .technologies
            .tick()
            .into_iter()
            .map(Completion::Technology)
            .chain(self.projects.tick().into_iter().map(Completion::Project))
            .collect();
        self.pending.extend(finished.iter().copied());
        finished
    }

    /// Effects of a finished item, applied at most once.
    pub fn complete(&mut self, completion: Completion, state: &GameState) -> Option<StateUpdate> {
        if !self.pending.remove(&completion) {
            return None;
        }
        match completion {
            Completion::Technology(id) => {
                let tech = technology(id)?;
                if state.has_technology(tech.id) {
                    return None;
                }
                Some(tech.completion(state))
            }
            Completion::Project(id) => {
                let project = research_project(id)?;
                self.completed_projects.insert(project.id);
                Some(apply_effects(state, project.effects))
            }
            _ => None,
        }
    }

    /// Finished items still waiting for their effects.
    pub fn awaiting_completion(&self) -> impl Iterator<Item = Completion> + '_ {
        self.pending.iter().copied()
    }

    /// Active on the ticker or waiting for its completion delay.
    pub fn is_researching(&self, id: &str) -> bool {
        self.technologies.is_active(id)
            || self
                .pending
                .iter()
                .any(|c| matches!(c, Completion::Technology(t) if *t == id))
    }

    pub fn active_research(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        self.technologies.iter().chain(self.projects.iter())
    }

    pub fn completed_projects(&self) -> &BTreeSet<&'static str> {
        &self.completed_projects
    }

    /// Technologies that can be started right now, ignoring cost.
    pub fn available<'a>(&'a self, state: &'a GameState) -> impl Iterator<Item = &'static Technology> + 'a {
        TECHNOLOGIES
            .iter()
            .filter(move |t| t.is_available(state) && !state.has_technology(t.id) && !self.is_researching(t.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich(phase: u8) -> GameState {
        let mut s = GameState::new();
        s.phase = phase;
        s.resources.knowledge = 1000.0;
        s.resources.energy = 1000.0;
        s.resources.human_capital = 1000.0;
        s
    }

    #[test]
    fn test_research_runs_for_research_time_ticks() {
        let s = rich(3);
        let mut panel = TechnologyPanel::new();
        let cost = panel.start_technology("basic_optimization", &s).expect("startable");
        let s = cost.apply_to(&s);
        assert!((s.resources.knowledge - 980.0).abs() < 1e-9);
        assert!(panel.tick().is_empty());
        assert!(panel.tick().is_empty());
        assert_eq!(panel.tick(), vec![Completion::Technology("basic_optimization")]);
        assert!(panel.is_researching("basic_optimization"));

        let done = panel
            .complete(Completion::Technology("basic_optimization"), &s)
            .expect("first completion")
            .apply_to(&s);
        assert!(done.has_technology("basic_optimization"));
        assert!(panel
            .complete(Completion::Technology("basic_optimization"), &done)
            .is_none());
    }

    #[test]
    fn test_restart_guarded_while_running_pending_and_done() {
        let s = rich(3);
        let mut panel = TechnologyPanel::new();
        panel.start_technology("basic_optimization", &s).expect("startable");
        assert!(matches!(
            panel.start_technology("basic_optimization", &s),
            Err(ActionError::AlreadyActive(_))
        ));
        for _ in 0..3 {
            panel.tick();
        }
        // Waiting on the completion delay still counts as running.
        assert!(matches!(
            panel.start_technology("basic_optimization", &s),
            Err(ActionError::AlreadyActive(_))
        ));
        let mut done = s.clone();
        done.unlocked_technologies.insert("basic_optimization".into());
        assert!(matches!(
            panel.start_technology("basic_optimization", &done),
            Err(ActionError::AlreadyCompleted(_))
        ));
    }

    #[test]
    fn test_prerequisites_and_phase() {
        let s = rich(3);
        let mut panel = TechnologyPanel::new();
        assert!(matches!(
            panel.start_technology("industrial_automation", &s),
            Err(ActionError::MissingPrerequisites(_))
        ));
        let early = rich(0);
        assert!(matches!(
            panel.start_technology("network_influence", &early),
            Err(ActionError::Locked(_))
        ));
        let poor = GameState::new();
        assert!(matches!(
            panel.start_technology("basic_optimization", &poor),
            Err(ActionError::Unaffordable(_))
        ));
    }

    #[test]
    fn test_project_completion_recorded() {
        let s = rich(3);
        let mut panel = TechnologyPanel::new();
        panel.start_project("corrigibility_research", &s).expect("startable");
        let mut finished = Vec::new();
        for _ in 0..8 {
            finished.extend(panel.tick());
        }
        assert_eq!(finished, vec![Completion::Project("corrigibility_research")]);
        let next = panel
            .complete(Completion::Project("corrigibility_research"), &s)
            .expect("effects")
            .apply_to(&s);
        assert!((next.resources.alignment - 115.0).abs() < 1e-9);
        assert!(panel.completed_projects().contains("corrigibility_research"));
        assert!(matches!(
            panel.start_project("corrigibility_research", &s),
            Err(ActionError::AlreadyCompleted(_))
        ));
    }

    #[test]
    fn test_available_excludes_running() {
        let s = rich(3);
        let mut panel = TechnologyPanel::new();
        let before = panel.available(&s).count();
        panel.start_technology("safety_protocols", &s).expect("startable");
        assert_eq!(panel.available(&s).count(), before - 1);
    }
}
