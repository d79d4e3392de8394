//! Integration tests for a full session on the virtual clock.
//!
//! Exercises: player operation → debounce buffer → applied transition →
//! phase gate / feedback / panels, with seeded RNGs throughout.

use alignment_core::prelude::*;
use alignment_core::scheduler::TaskId;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ────────────────────────────────────────────────────────────

const EPS: f64 = 1e-9;

fn session_with(state: GameState, seed: u64) -> Session {
    let mut session = Session::with_state(EngineConfig::default(), StdRng::seed_from_u64(seed), state);
    session.start();
    session
}

fn in_phase(phase: u8) -> GameState {
    let mut s = GameState::new();
    s.phase = phase;
    s
}

fn late_game() -> GameState {
    let mut s = in_phase(5);
    s.resources.paperclips = 1e7;
    s.resources.materials = 1e7;
    s.resources.energy = 1e7;
    s.resources.knowledge = 1e6;
    s
}

// ── Progression ────────────────────────────────────────────────────────

#[test]
fn playing_from_scratch_reaches_phase_one() {
    let mut session = Session::new(EngineConfig {
        rng_seed: Some(1),
        ..EngineConfig::default()
    });
    session.start();
    while session.state().phase == 0 {
        let _ = session.perform(Action::ProduceBasic);
        session.advance(100);
        assert!(session.now() < 200_000, "stalled in phase 0");
    }
    assert_eq!(session.state().phase, 1);
    assert!(session.state().resources.paperclips >= 1000.0);
    assert!(session.feedback().trajectory().count() > 1);
    assert_eq!(session.visible_panels(), vec![PanelKind::Decisions]);
}

#[test]
fn config_from_json_drives_timing() {
    let config = EngineConfig::from_json_str(r#"{ "regen_interval_ms": 500, "rng_seed": 3 }"#)
        .expect("valid config");
    let mut s = GameState::new();
    s.resources.energy = 50.0;
    let mut session = Session::with_state(config, StdRng::seed_from_u64(3), s);
    session.start();
    session.advance(500);
    assert!((session.state().resources.energy - 50.5).abs() < EPS);
}

// ── Timed activities ───────────────────────────────────────────────────

#[test]
fn operation_completes_on_the_operations_ticker() {
    let mut s = in_phase(2);
    s.resources.influence = 50.0;
    s.resources.knowledge = 50.0;
    let mut session = session_with(s, 2);
    session.start_operation("material_acquisition").expect("startable");
    session.advance(4099);
    assert!((session.state().resources.materials - 50.0).abs() < EPS);
    assert!((session.state().resources.alignment - 98.0).abs() < EPS);
    session.advance(31);
    assert!((session.state().resources.materials - 150.0).abs() < EPS);
    assert!(session.resource_panel().operations().is_empty());
}

#[test]
fn probe_cycle_adds_paperclips_and_grows_fleet() {
    let mut session = session_with(late_game(), 4);
    session.launch_probe("basic_replicator").expect("affordable");
    session.advance(20_099);
    assert!((session.state().resources.paperclips - 1e7).abs() < 1e-3);
    session.advance(31);
    let state = session.state();
    assert!((state.resources.paperclips - (1e7 + 1000.0)).abs() < 1e-3);
    assert!((state.total_paperclips - 1000.0).abs() < 1e-6);
    assert!((state.resources.alignment - 99.8).abs() < 1e-9);
    assert_eq!(session.cosmic_panel().total_probes(), 2);
}

#[test]
fn technologies_finishing_on_one_tick_both_unlock() {
    let mut s = in_phase(3);
    s.resources.knowledge = 100.0;
    s.resources.energy = 200.0;
    let mut session = session_with(s, 9);
    // Four research ticks from t=0 and three from t=3001 both end at 12000.
    session.start_research("safety_protocols").expect("startable");
    session.advance(3001);
    session.start_research("basic_optimization").expect("startable");
    session.advance(20_000);

    let state = session.state();
    assert!(state.has_technology("safety_protocols"));
    assert!(state.has_technology("basic_optimization"));
    assert!((state.capabilities.efficiency - 1.5).abs() < EPS);
    assert!((state.reputation.scientific_credibility - 115.0).abs() < EPS);
    assert_eq!(
        session.start_research("basic_optimization"),
        Err(ActionError::AlreadyCompleted("basic_optimization".into()))
    );
}

#[test]
fn research_finished_before_stop_completes_after_restart() {
    let mut s = in_phase(3);
    s.resources.knowledge = 100.0;
    s.resources.energy = 200.0;
    let mut session = session_with(s, 10);
    session.start_research("basic_optimization").expect("startable");
    // Third tick at 9000 has fired; the completion is due at 9100.
    session.advance(9050);
    session.stop();
    session.start();
    session.advance(1000);

    assert!(session.state().has_technology("basic_optimization"));
    assert!((session.state().capabilities.efficiency - 1.5).abs() < EPS);
    assert!(!session.technology_panel().is_researching("basic_optimization"));
}

#[test]
fn probe_cycle_finished_before_stop_completes_after_restart() {
    let mut session = session_with(late_game(), 11);
    session.launch_probe("basic_replicator").expect("affordable");
    session.advance(20_050);
    session.stop();
    session.start();
    session.advance(1000);

    assert_eq!(session.cosmic_panel().total_probes(), 2);
    assert!(session.cosmic_panel().fleets().all(|f| !f.pending));
    assert!((session.state().total_paperclips - 1000.0).abs() < 1e-6);
}

// ── Randomness ─────────────────────────────────────────────────────────

#[test]
fn seeded_sessions_are_reproducible() {
    fn play(seed: u64) -> (GameState, Vec<&'static str>, Option<&'static str>) {
        let mut session = session_with(late_game(), seed);
        session.launch_probe("basic_replicator").expect("affordable");
        for _ in 0..400 {
            let _ = session.perform(Action::ProduceBasic);
            session.advance(250);
        }
        let discovered = session
            .cosmic_panel()
            .discovered()
            .iter()
            .map(|d| d.civilization.id)
            .collect();
        let event = session.cosmic_panel().event().map(|e| e.id);
        (session.state().clone(), discovered, event)
    }
    assert_eq!(play(99), play(99));
    let (_, discovered, event) = play(99);
    assert!(!discovered.is_empty());
    assert!(event.is_some());
}

#[test]
fn dialogue_answer_schedules_follow_up() {
    let mut s = in_phase(4);
    s.capabilities.intelligence = 3.0;
    let mut session = session_with(s, 5);
    for _ in 0..100 {
        if session.dialogue_panel().current().is_some() {
            break;
        }
        session.advance(2000);
    }
    assert_eq!(
        session.dialogue_panel().current().map(|d| d.id),
        Some("consciousness_question")
    );

    let unlocked = session.answer_dialogue("deny_consciousness").expect("valid choice");
    assert_eq!(unlocked, vec!["hard_problem_consciousness"]);
    assert!(session
        .scheduler()
        .is_scheduled(TaskId::DialogueFollowUp("zombie_argument")));
    session.advance(30);
    assert!((session.state().resources.alignment - 103.0).abs() < EPS);

    // The follow-up has no catalogue entry, so nothing is shown.
    session.advance(5000);
    assert!(session.dialogue_panel().current().is_none());
    assert_eq!(session.dialogue_panel().depth(), 1);
}

// ── Feedback ───────────────────────────────────────────────────────────

#[test]
fn first_deception_unlocks_reflection() {
    let mut session = session_with(in_phase(1), 6);
    let mut capabilities = session.state().capabilities;
    capabilities.deception = 1.0;
    session.submit_update(StateUpdate {
        capabilities: Some(capabilities),
        ..StateUpdate::default()
    });
    assert!(session.feedback().active_reflection().is_none());
    session.advance(30);
    assert!(session.feedback().has_milestone("first_deception"));
    assert!(session.feedback().active_reflection().is_some());
    session.dismiss_reflection();
    assert!(session.feedback().active_reflection().is_none());
}

#[test]
fn dismissed_decision_can_be_presented_again() {
    let mut session = session_with(in_phase(1), 12);
    assert_eq!(session.dismiss_decision(), Err(ActionError::NoPrompt));
    session.present_decision("lab_safety_protocol").expect("available");
    assert_eq!(session.dismiss_decision(), Ok(()));
    assert!(session.decision_panel().current().is_none());
    assert_eq!(session.dismiss_dialogue(), Err(ActionError::Locked("philosophical dialogue".into())));
    session.present_decision("lab_safety_protocol").expect("still open");
}

#[test]
fn decision_then_allocation_in_one_flush() {
    let mut s = in_phase(2);
    s.resources.energy = 100.0;
    let mut session = session_with(s, 8);
    session.present_decision("lab_safety_protocol").expect("available");
    session.choose_decision("bypass").expect("valid choice");
    assert_eq!(
        session.allocate(Allocation {
            research: 50,
            production: 30,
            expansion: 30,
        }),
        Err(ActionError::InvalidAllocation(110))
    );
    session.advance(30);
    let state = session.state();
    assert!(state.has_completed_decision("lab_safety_protocol"));
    assert!((state.capabilities.efficiency - 1.5).abs() < EPS);
    assert!((state.resources.alignment - 95.0).abs() < EPS);
}
