//! Session engine - main entry point for playing a game
//!
//! A [`Session`] owns the game store, the virtual-clock scheduler, every
//! feature panel, the feedback tracker and the RNG. All time is virtual:
//! nothing happens until the owner calls [`Session::advance`].

use alignment_logic::actions::{Action, Allocation};
use alignment_logic::catalog::{decision, Decision};
use alignment_logic::feedback::{FeedbackReport, FeedbackTracker};
use alignment_logic::phases::{next_phase, phase_info, phase_progress};
use alignment_logic::regen::regenerate;
use alignment_logic::{GameState, StateUpdate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EngineConfig;
use crate::error::ActionError;
use crate::panels::*;
use crate::scheduler::{Scheduler, TaskId};
use crate::store::GameStore;
use crate::timers::Completion;

/// One game session.
pub struct Session<R: Rng = StdRng> {
    config: EngineConfig,
    store: GameStore,
    scheduler: Scheduler,
    rng: R,
    /// Past the intro screen
    playing: bool,
    /// game_time seen by the last cosmic roll
    last_game_time: u64,

    decisions: DecisionPanel,
    resources: ResourcePanel,
    technology: TechnologyPanel,
    dialogue: DialoguePanel,
    cosmic: CosmicPanel,
    feedback: FeedbackTracker,
}

impl Session<StdRng> {
    /// Create a session seeded from `config.rng_seed`, or from entropy.
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        Self::with_state(config, rng, GameState::new())
    }

    /// Start from a given snapshot instead of the initial state.
    pub fn with_state(config: EngineConfig, rng: R, state: GameState) -> Self {
        let last_game_time = state.game_time;
        Self {
            config,
            store: GameStore::new(state),
            scheduler: Scheduler::new(),
            rng,
            playing: false,
            last_game_time,
            decisions: DecisionPanel::new(),
            resources: ResourcePanel::new(),
            technology: TechnologyPanel::new(),
            dialogue: DialoguePanel::new(),
            cosmic: CosmicPanel::new(),
            feedback: FeedbackTracker::new(),
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Leave the intro and start the tickers.
    pub fn start(&mut self) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.scheduler
            .every(TaskId::Regeneration, self.config.regen_interval_ms);
        self.register_tickers();
        self.rearm_completions();
        log::info!(
            "Session started in phase {} ({})",
            self.state().phase,
            phase_info(self.state().phase).name
        );
    }

    /// Tear down: every task is cleared and buffered updates are dropped.
    /// Finished activities keep waiting and complete after the next `start`.
    pub fn stop(&mut self) {
        self.playing = false;
        self.scheduler.clear();
        if self.store.discard_pending().is_some() {
            log::debug!("Dropped buffered update on stop");
        }
        log::info!("Session stopped at {} ms", self.scheduler.now());
    }

    /// Run the virtual clock forward, firing every task due on the way.
    pub fn advance(&mut self, ms: u64) {
        let horizon = self.scheduler.now() + ms;
        while let Some(task) = self.scheduler.pop_due(horizon) {
            self.run(task);
        }
        self.scheduler.settle(horizon);
    }

    /// Fire-and-forget update, coalesced with anything else buffered.
    pub fn submit_update(&mut self, update: StateUpdate) {
        if update.is_empty() {
            return;
        }
        self.store.submit(update);
        self.scheduler
            .once(TaskId::DebounceFlush, self.config.debounce_ms);
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        self.store.state()
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn phase_progress(&self) -> f64 {
        phase_progress(self.state())
    }

    pub fn visible_panels(&self) -> Vec<PanelKind> {
        let phase = self.state().phase;
        PanelKind::ALL
            .into_iter()
            .filter(|k| k.is_visible(phase))
            .collect()
    }

    pub fn decision_panel(&self) -> &DecisionPanel {
        &self.decisions
    }

    pub fn resource_panel(&self) -> &ResourcePanel {
        &self.resources
    }

    pub fn technology_panel(&self) -> &TechnologyPanel {
        &self.technology
    }

    pub fn dialogue_panel(&self) -> &DialoguePanel {
        &self.dialogue
    }

    pub fn cosmic_panel(&self) -> &CosmicPanel {
        &self.cosmic
    }

    pub fn feedback(&self) -> &FeedbackTracker {
        &self.feedback
    }

    // ── Player operations ──────────────────────────────────────────────

    pub fn perform(&mut self, action: Action) -> Result<(), ActionError> {
        let result = self.try_perform(action);
        logged(action.label(), result)
    }

    fn try_perform(&mut self, action: Action) -> Result<(), ActionError> {
        self.ensure_playing()?;
        let state = self.store.state();
        if !action.is_visible(state.phase) {
            return Err(ActionError::Locked(action.label().to_string()));
        }
        let update = action
            .evaluate(state)
            .ok_or_else(|| ActionError::Unaffordable(action.label().to_string()))?;
        self.submit_update(update);
        Ok(())
    }

    pub fn allocate(&mut self, allocation: Allocation) -> Result<(), ActionError> {
        let result = self.require(PanelKind::Resources).and_then(|_| {
            let update = self.resources.allocate(allocation, self.store.state())?;
            self.submit_update(update);
            Ok(())
        });
        logged("allocate", result)
    }

    pub fn present_decision(&mut self, id: &str) -> Result<&'static Decision, ActionError> {
        let result = self
            .require(PanelKind::Decisions)
            .and_then(|_| self.decisions.present(id, self.store.state()));
        if let Ok(d) = &result {
            log::info!("Decision presented: {}", d.title);
        }
        logged(id, result)
    }

    pub fn choose_decision(&mut self, choice_id: &str) -> Result<(), ActionError> {
        let result = self.require(PanelKind::Decisions).and_then(|_| {
            let outcome = self.decisions.choose(choice_id, self.store.state())?;
            log::info!("Decision {} resolved with {}", outcome.decision.id, outcome.choice);
            self.submit_update(outcome.update);
            if !outcome.decision.long_term_consequences.is_empty() {
                self.scheduler.once(
                    TaskId::DecisionConsequence(outcome.decision.id),
                    self.config.decision_consequence_ms,
                );
            }
            Ok(())
        });
        logged(choice_id, result)
    }

    pub fn start_research(&mut self, id: &str) -> Result<(), ActionError> {
        let result = self.require(PanelKind::Technology).and_then(|_| {
            let update = self.technology.start_technology(id, self.store.state())?;
            self.submit_update(update);
            Ok(())
        });
        logged(id, result)
    }

    pub fn start_project(&mut self, id: &str) -> Result<(), ActionError> {
        let result = self.require(PanelKind::Technology).and_then(|_| {
            let update = self.technology.start_project(id, self.store.state())?;
            self.submit_update(update);
            Ok(())
        });
        logged(id, result)
    }

    pub fn start_operation(&mut self, id: &str) -> Result<(), ActionError> {
        let result = self.require(PanelKind::Resources).and_then(|_| {
            let update = self.resources.start_operation(id, self.store.state())?;
            self.submit_update(update);
            Ok(())
        });
        logged(id, result)
    }

    pub fn resolve_crisis(&mut self, solution_id: &str) -> Result<(), ActionError> {
        let result = self.require(PanelKind::Resources).and_then(|_| {
            let update = self.resources.resolve_crisis(solution_id, self.store.state())?;
            log::info!("Crisis resolved with {}", solution_id);
            self.submit_update(update);
            Ok(())
        });
        logged(solution_id, result)
    }

    pub fn launch_probe(&mut self, id: &str) -> Result<(), ActionError> {
        let result = self.require(PanelKind::Cosmic).and_then(|_| {
            let update = self.cosmic.launch(id, self.store.state())?;
            log::info!("Probe launched: {} (fleet of {})", id, self.cosmic.total_probes());
            self.submit_update(update);
            Ok(())
        });
        logged(id, result)
    }

    /// Answer the current cosmic event; `Ok(false)` when the roll failed.
    pub fn resolve_cosmic_event(&mut self, choice_id: &str) -> Result<bool, ActionError> {
        let result = self.require(PanelKind::Cosmic).and_then(|_| {
            let outcome = self
                .cosmic
                .resolve_event(choice_id, self.store.state(), &mut self.rng)?;
            let succeeded = outcome.is_some();
            log::info!(
                "Cosmic event answered with {}: {}",
                choice_id,
                if succeeded { "success" } else { "failure" }
            );
            if let Some(update) = outcome {
                self.submit_update(update);
            }
            Ok(succeeded)
        });
        logged(choice_id, result)
    }

    pub fn accept_offer(&mut self, civilization_id: &str, offer_id: &str) -> Result<(), ActionError> {
        let result = self.require(PanelKind::Cosmic).and_then(|_| {
            let update = self
                .cosmic
                .accept_offer(civilization_id, offer_id, self.store.state())?;
            log::info!("Accepted {} from {}", offer_id, civilization_id);
            self.submit_update(update);
            Ok(())
        });
        logged(offer_id, result)
    }

    /// Answer the current dialogue; returns the concepts it unlocked.
    pub fn answer_dialogue(&mut self, choice_id: &str) -> Result<Vec<&'static str>, ActionError> {
        let result = self.require(PanelKind::Dialogue).and_then(|_| {
            let answer = self.dialogue.answer(choice_id, self.store.state())?;
            for concept in &answer.unlocked {
                log::info!("Concept unlocked: {}", concept);
            }
            self.submit_update(answer.update);
            if let Some(follow_up) = answer.follow_up {
                self.scheduler.once(
                    TaskId::DialogueFollowUp(follow_up),
                    self.config.dialogue_follow_up_ms,
                );
            }
            Ok(answer.unlocked)
        });
        logged(choice_id, result)
    }

    /// Close the presented decision without choosing.
    pub fn dismiss_decision(&mut self) -> Result<(), ActionError> {
        let result = self.require(PanelKind::Decisions).and_then(|_| {
            if self.decisions.dismiss() {
                Ok(())
            } else {
                Err(ActionError::NoPrompt)
            }
        });
        logged("dismiss decision", result)
    }

    /// Close the current dialogue unanswered; it can be presented again.
    pub fn dismiss_dialogue(&mut self) -> Result<(), ActionError> {
        let result = self.require(PanelKind::Dialogue).and_then(|_| {
            if self.dialogue.dismiss() {
                Ok(())
            } else {
                Err(ActionError::NoPrompt)
            }
        });
        logged("dismiss dialogue", result)
    }

    pub fn dismiss_reflection(&mut self) {
        self.feedback.dismiss_reflection();
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn ensure_playing(&self) -> Result<(), ActionError> {
        if self.playing {
            Ok(())
        } else {
            Err(ActionError::NotPlaying)
        }
    }

    fn require(&self, panel: PanelKind) -> Result<(), ActionError> {
        self.ensure_playing()?;
        if panel.is_visible(self.state().phase) {
            Ok(())
        } else {
            Err(ActionError::Locked(panel.label().to_string()))
        }
    }

    /// Register the tickers of every visible panel. Already registered
    /// tickers keep their schedule.
    fn register_tickers(&mut self) {
        let phase = self.state().phase;
        let tickers = [
            (PanelKind::Resources, TaskId::Operations, self.config.operation_interval_ms),
            (PanelKind::Technology, TaskId::Research, self.config.research_interval_ms),
            (PanelKind::Cosmic, TaskId::ProbeReplication, self.config.probe_interval_ms),
        ];
        for (panel, task, interval) in tickers {
            if panel.is_visible(phase) && self.scheduler.every(task, interval) {
                log::debug!("{} ticker registered every {} ms", panel.label(), interval);
            }
        }
    }

    fn run(&mut self, task: TaskId) {
        match task {
            TaskId::Regeneration => {
                let state = self.store.state();
                let update = StateUpdate::resources(regenerate(state.phase, &state.resources));
                if self.store.apply_now(update) {
                    self.after_transition();
                }
            }
            TaskId::Operations => {
                let finished = self.resources.tick();
                self.defer_completions(finished);
            }
            TaskId::Research => {
                let finished = self.technology.tick();
                self.defer_completions(finished);
            }
            TaskId::ProbeReplication => {
                let finished = self.cosmic.tick_replication();
                self.defer_completions(finished);
            }
            TaskId::Complete(completion) => self.complete(completion),
            TaskId::DebounceFlush => {
                if self.store.flush() {
                    log::debug!("Flushed buffered update (revision {})", self.store.revision());
                    self.after_transition();
                }
            }
            TaskId::DialogueFollowUp(id) => match self.dialogue.present_follow_up(id) {
                Some(d) => log::info!("Follow-up dialogue: {}", d.title),
                None => log::debug!("Follow-up {} has no dialogue", id),
            },
            TaskId::DecisionConsequence(id) => {
                if let Some(d) = decision(id) {
                    log::info!(
                        "Long-term consequences of {} unfolding: {}",
                        d.title,
                        d.long_term_consequences.join(", ")
                    );
                }
            }
        }
    }

    fn defer_completions(&mut self, finished: Vec<Completion>) {
        for completion in finished {
            self.scheduler
                .once(TaskId::Complete(completion), self.config.completion_delay_ms);
        }
    }

    /// Completion tasks are lost when the scheduler is cleared.
    fn rearm_completions(&mut self) {
        let waiting: Vec<Completion> = self
            .resources
            .awaiting_completion()
            .chain(self.technology.awaiting_completion())
            .chain(self.cosmic.awaiting_completion())
            .filter(|c| !self.scheduler.is_scheduled(TaskId::Complete(*c)))
            .collect();
        if !waiting.is_empty() {
            log::debug!("Re-arming {} pending completions", waiting.len());
        }
        self.defer_completions(waiting);
    }

    fn complete(&mut self, completion: Completion) {
        // Built on the buffered state so completions in one flush window stack.
        let state = self.store.projected();
        let update = match completion {
            Completion::Operation(id) => self.resources.complete(id, &state),
            Completion::Technology(_) | Completion::Project(_) => {
                self.technology.complete(completion, &state)
            }
            Completion::ProbeCycle(id) => self.cosmic.complete_cycle(id, &state),
        };
        match update {
            Some(update) => {
                log::info!("Completed {:?}", completion);
                self.submit_update(update);
            }
            None => log::debug!("Nothing to complete for {:?}", completion),
        }
    }

    /// Everything that reacts to a newly applied state: feedback, the phase
    /// gate, then the probabilistic panels.
    fn after_transition(&mut self) {
        loop {
            let report = self.feedback.observe(self.store.state());
            self.log_feedback(&report);
            if !self.playing {
                return;
            }
            let Some(next) = next_phase(self.store.state()) else {
                break;
            };
            self.store.apply_now(StateUpdate::phase(next));
            log::info!("Phase {} reached: {}", next, phase_info(next).name);
            self.register_tickers();
        }

        let state = self.store.state();
        if state.game_time != self.last_game_time {
            self.last_game_time = state.game_time;
            let tick = self.cosmic.on_game_tick(state, &mut self.rng);
            if let Some(id) = tick.event {
                log::info!("Cosmic event: {}", id);
            }
            if let Some(id) = tick.discovered {
                log::info!("Civilization discovered: {}", id);
            }
        }
        if PanelKind::Dialogue.is_visible(state.phase) {
            if let Some(d) = self.dialogue.maybe_present(state, &mut self.rng) {
                log::info!("{} wants to talk: {}", d.speaker, d.title);
            }
        }
        if PanelKind::Resources.is_visible(state.phase) {
            if let Some(crisis) = self.resources.check_crisis(state) {
                log::info!("Resource crisis: {}", crisis.name);
            }
        }
    }

    fn log_feedback(&self, report: &FeedbackReport) {
        for id in &report.consequences {
            log::info!("Consequence: {}", id);
        }
        for id in &report.milestones {
            log::info!("Milestone reached: {}", id);
        }
    }
}

fn logged<T>(what: &str, result: Result<T, ActionError>) -> Result<T, ActionError> {
    if let Err(err) = &result {
        log::debug!("Rejected {}: {}", what, err);
    }
    result
}
