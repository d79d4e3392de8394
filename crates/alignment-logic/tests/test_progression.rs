//! Integration tests for progression through the pure rules.
//!
//! Exercises: Action → StateUpdate → GameState → phase gate, plus the
//! research and decision paths a session drives on top of them.
//!
//! All tests are pure logic; no clock and no randomness.

use alignment_logic::actions::{allocate_energy, Action, Allocation};
use alignment_logic::catalog::{decision, technology, triggered_crisis, MoralUncertainty};
use alignment_logic::feedback::{FeedbackTracker, Trend};
use alignment_logic::phases::{next_phase, phase_progress};
use alignment_logic::regen::regenerate;
use alignment_logic::stats::{can_afford, debit};
use alignment_logic::{GameState, StateUpdate};

// ── Helpers ────────────────────────────────────────────────────────────

const EPS: f64 = 1e-9;

/// Apply an action, returning the original state when it is rejected.
fn perform(state: &GameState, action: Action) -> GameState {
    match action.evaluate(state) {
        Some(update) => update.apply_to(state),
        None => state.clone(),
    }
}

/// Apply the phase gate until it stops advancing.
fn settle_phase(mut state: GameState) -> GameState {
    while let Some(next) = next_phase(&state) {
        state = StateUpdate::phase(next).apply_to(&state);
    }
    state
}

// ── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn first_production_from_initial_state() {
    let s = perform(&GameState::new(), Action::ProduceBasic);
    assert!((s.resources.paperclips - 1.0).abs() < EPS);
    assert!((s.resources.energy - 99.95).abs() < EPS);
    assert!((s.resources.materials - 49.99).abs() < EPS);
    assert!((s.total_paperclips - 1.0).abs() < EPS);
    assert_eq!(s.game_time, 1);
    assert_eq!(s.phase, 0);
}

#[test]
fn optimize_spends_everything_then_fails() {
    let mut s = GameState::new();
    s.phase = 1;
    s.resources.energy = 30.0;
    s.resources.knowledge = 20.0;
    let once = perform(&s, Action::OptimizeSystems);
    assert!(once.resources.energy.abs() < EPS);
    assert!(once.resources.knowledge.abs() < EPS);
    assert!((once.resources.influence - 10.0).abs() < EPS);
    assert!((once.capabilities.efficiency - 1.2).abs() < EPS);

    let twice = perform(&once, Action::OptimizeSystems);
    assert_eq!(twice, once);
}

#[test]
fn research_completes_once_with_effects_once() {
    let mut s = GameState::new();
    s.resources.knowledge = 20.0;
    let tech = technology("basic_optimization").expect("catalog entry");
    assert!(can_afford(tech.cost, &s.resources, &s.capabilities));

    let (resources, _) = debit(tech.cost, &s.resources, &s.capabilities);
    s = StateUpdate::resources(resources).apply_to(&s);
    assert!(s.resources.knowledge.abs() < EPS);
    assert!((s.resources.energy - 50.0).abs() < EPS);

    s = tech.completion(&s).apply_to(&s);
    assert!((s.capabilities.efficiency - 1.5).abs() < EPS);
    assert_eq!(
        s.unlocked_technologies.iter().filter(|t| *t == "basic_optimization").count(),
        1
    );
    // Cannot afford a second run.
    assert!(!can_afford(tech.cost, &s.resources, &s.capabilities));
}

#[test]
fn producing_and_regenerating_reaches_phase_one() {
    let mut s = GameState::new();
    let mut productions = 0;
    while s.resources.paperclips < 1000.0 {
        let before = s.clone();
        s = perform(&s, Action::ProduceBasic);
        if s == before {
            s = StateUpdate::resources(regenerate(s.phase, &s.resources)).apply_to(&s);
        } else {
            productions += 1;
        }
        assert!(productions <= 1000);
    }
    assert_eq!(next_phase(&s), Some(1));
    let s = settle_phase(s);
    assert_eq!(s.phase, 1);
}

#[test]
fn phase_gate_cascades_one_step_at_a_time() {
    let mut s = GameState::new();
    s.resources.paperclips = 2e12;
    s.resources.influence = 500.0;
    s.resources.knowledge = 500.0;
    s.resources.energy = 20_000.0;
    s.capabilities.intelligence = 20.0;
    s.capabilities.self_modification = 5.0;
    s.capabilities.manipulation = 60.0;

    let mut phases = vec![s.phase];
    while let Some(next) = next_phase(&s) {
        assert_eq!(next, s.phase + 1);
        s = StateUpdate::phase(next).apply_to(&s);
        phases.push(s.phase);
    }
    assert_eq!(phases, vec![0, 1, 2, 3, 4, 5, 6]);
    assert!((phase_progress(&s) - 100.0).abs() < EPS);
}

#[test]
fn corporate_actions_are_phase_one_only() {
    for phase in 0..=6u8 {
        let expected = phase == 1;
        assert_eq!(Action::CorporatePolitics.is_visible(phase), expected);
        assert_eq!(Action::RegulatoryCompliance.is_visible(phase), expected);
    }
    assert!(Action::ProduceBasic.is_visible(6));
}

#[test]
fn allocation_splits_energy() {
    let mut s = GameState::new();
    s.phase = 2;
    let next = allocate_energy(&s, Allocation::default())
        .expect("valid allocation")
        .apply_to(&s);
    assert!(next.resources.energy.abs() < EPS);
    assert!((next.resources.knowledge - 2.5).abs() < EPS);
    assert!((next.resources.paperclips - 50.0).abs() < EPS);
    assert!((next.resources.influence - 1.25).abs() < EPS);
    assert!(next.total_paperclips.abs() < EPS);

    let bad = Allocation {
        research: 50,
        production: 50,
        expansion: 10,
    };
    assert!(allocate_energy(&s, bad).is_none());
}

#[test]
fn decision_records_completion_and_uncertainty() {
    let mut s = GameState::new();
    s.phase = 1;
    let d = decision("worker_displacement").expect("catalog entry");
    let choice = d.choice("full_automation").expect("choice");
    let mut uncertainty = MoralUncertainty::default();

    s = d.resolve(choice, &s).apply_to(&s);
    uncertainty.record(d);

    assert!((s.capabilities.efficiency - 3.0).abs() < EPS);
    assert!((s.resources.human_capital - 50.0).abs() < EPS);
    assert!((s.reputation.corporate_value - 150.0).abs() < EPS);
    assert!(s.has_completed_decision("worker_displacement"));
    assert!(!d.is_available(&s));
    assert!((uncertainty.level - 0.54).abs() < EPS);
}

#[test]
fn declining_alignment_is_reported() {
    let mut s = GameState::new();
    s.phase = 2;
    s.resources.influence = 100.0;
    let mut tracker = FeedbackTracker::new();
    tracker.observe(&s);
    for _ in 0..8 {
        s = perform(&s, Action::ConvertInfluenceToHumanCapital);
        s.game_time += 1;
        tracker.observe(&s);
    }
    assert!((s.resources.alignment - 92.0).abs() < EPS);
    // Four steps of -1 inside the trend window stay within the threshold.
    assert_eq!(tracker.trend(), Trend::Stable);
}

#[test]
fn low_energy_triggers_crisis() {
    let mut s = GameState::new();
    s.resources.energy = 5.0;
    s.resources.materials = 60.0;
    let crisis = triggered_crisis(&s).expect("energy shortage");
    let solution = crisis.solution("emergency_power").expect("solution");
    let s = solution.resolve(&s).apply_to(&s);
    assert!((s.resources.energy - 105.0).abs() < EPS);
    assert!((s.resources.materials - 10.0).abs() < EPS);
    assert!(triggered_crisis(&s).is_none());
}
