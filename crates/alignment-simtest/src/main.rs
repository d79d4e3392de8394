//! Alignment Headless Simulation Harness
//!
//! Validates the static catalogs, the pure rules and scripted sessions on
//! the virtual clock. Runs entirely in-process, no rendering.
//!
//! Usage:
//!   cargo run -p alignment-simtest
//!   cargo run -p alignment-simtest -- --verbose
//!   cargo run -p alignment-simtest -- --config engine.json --json

use std::collections::BTreeSet;

use alignment_core::prelude::*;
use alignment_logic::actions::production_cost;
use alignment_logic::catalog::{
    available_decisions, technology, CRISES, DECISIONS, DIALOGUES, OPERATIONS, PROBE_DESIGNS,
    RESEARCH_PROJECTS, TECHNOLOGIES,
};
use alignment_logic::feedback::{FeedbackTracker, Trend, TRAJECTORY_LEN};
use alignment_logic::phases::{next_phase, phase_progress, PHASES};
use alignment_logic::regen::{regen_table, regenerate};
use alignment_logic::state::FINAL_PHASE;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    json: bool,
    config: EngineConfig,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        verbose: false,
        json: false,
        config: EngineConfig::default(),
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => options.verbose = true,
            "--json" => options.json = true,
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                options.config = EngineConfig::load(&path).map_err(|e| format!("{}: {}", path, e))?;
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(options)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };
    init_logging(options.verbose);
    let verbose = options.verbose;
    println!("=== Alignment Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Catalog consistency
    results.extend(validate_catalogs(verbose));

    // 2. Phase gate
    results.extend(validate_phase_gate(verbose));

    // 3. Action handlers
    results.extend(validate_actions(verbose));

    // 4. Passive regeneration
    results.extend(validate_regeneration(verbose));

    // 5. Feedback tracker
    results.extend(validate_feedback(verbose));

    // 6. Scripted sessions
    results.extend(validate_sessions(&options.config, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    if options.json {
        match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("error: could not encode results: {}", e),
        }
    } else {
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );
    log::debug!("harness finished with {} checks", total);

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Catalogs ─────────────────────────────────────────────────────────

fn validate_catalogs(verbose: bool) -> Vec<TestResult> {
    println!("--- Catalogs ---");
    let mut results = Vec::new();

    // Technology ids are unique
    let tech_ids: BTreeSet<&str> = TECHNOLOGIES.iter().map(|t| t.id).collect();
    results.push(TestResult {
        name: "catalog_tech_ids_unique".into(),
        passed: tech_ids.len() == TECHNOLOGIES.len(),
        detail: format!("{} technologies, {} distinct ids", TECHNOLOGIES.len(), tech_ids.len()),
    });

    // Every prerequisite exists and unlocks no later than its dependant
    let bad_prereqs: Vec<String> = TECHNOLOGIES
        .iter()
        .flat_map(|t| t.prerequisites.iter().map(move |p| (t, *p)))
        .filter(|(t, p)| technology(p).map_or(true, |pre| pre.phase > t.phase))
        .map(|(t, p)| format!("{}<-{}", t.id, p))
        .collect();
    results.push(TestResult {
        name: "catalog_tech_prerequisites".into(),
        passed: bad_prereqs.is_empty(),
        detail: if bad_prereqs.is_empty() {
            "all prerequisites resolve to earlier technologies".into()
        } else {
            format!("bad prerequisites: {}", bad_prereqs.join(", "))
        },
    });

    // Timed activities take at least one tick
    let zero_time = TECHNOLOGIES.iter().filter(|t| t.research_time == 0).count()
        + RESEARCH_PROJECTS.iter().filter(|p| p.duration == 0).count()
        + OPERATIONS.iter().filter(|o| o.duration == 0).count()
        + PROBE_DESIGNS.iter().filter(|p| p.replication_time == 0).count();
    results.push(TestResult {
        name: "catalog_positive_durations".into(),
        passed: zero_time == 0,
        detail: format!("{} activities with zero duration", zero_time),
    });

    // Every phase-gated entry is reachable
    let max_phase = TECHNOLOGIES
        .iter()
        .map(|t| t.phase)
        .chain(DECISIONS.iter().map(|d| d.phase))
        .chain(OPERATIONS.iter().map(|o| o.phase))
        .chain(DIALOGUES.iter().map(|d| d.phase))
        .max()
        .unwrap_or(0);
    results.push(TestResult {
        name: "catalog_phases_reachable".into(),
        passed: max_phase <= FINAL_PHASE,
        detail: format!("highest gated phase {}", max_phase),
    });

    // Prompts always offer a way out
    let no_choices = DECISIONS.iter().filter(|d| d.choices.is_empty()).count()
        + CRISES.iter().filter(|c| c.solutions.is_empty()).count()
        + DIALOGUES.iter().filter(|d| !d.is_well_formed()).count();
    results.push(TestResult {
        name: "catalog_prompts_have_choices".into(),
        passed: no_choices == 0,
        detail: format!("{} prompts without choices", no_choices),
    });

    if verbose {
        println!("  Decisions available by phase:");
        for phase in 0..=FINAL_PHASE {
            let mut s = GameState::new();
            s.phase = phase;
            println!("    phase {}: {}", phase, available_decisions(&s).count());
        }
    }

    results
}

// ── 2. Phase Gate ───────────────────────────────────────────────────────

fn validate_phase_gate(_verbose: bool) -> Vec<TestResult> {
    println!("--- Phase Gate ---");
    let mut results = Vec::new();

    let ids_match = PHASES
        .iter()
        .enumerate()
        .all(|(i, p)| usize::from(p.id) == i);
    results.push(TestResult {
        name: "phase_ids_match_indices".into(),
        passed: ids_match && PHASES.len() == usize::from(FINAL_PHASE) + 1,
        detail: format!("{} phases", PHASES.len()),
    });

    // A state that satisfies everything climbs one phase per evaluation
    let mut s = GameState::new();
    s.resources.paperclips = 2e12;
    s.resources.influence = 1000.0;
    s.resources.knowledge = 1000.0;
    s.resources.energy = 20_000.0;
    s.capabilities.intelligence = 100.0;
    s.capabilities.self_modification = 10.0;
    s.capabilities.manipulation = 100.0;
    let mut steps = Vec::new();
    while let Some(next) = next_phase(&s) {
        steps.push(next);
        s = StateUpdate::phase(next).apply_to(&s);
    }
    results.push(TestResult {
        name: "phase_gate_one_step_at_a_time".into(),
        passed: steps == (1..=FINAL_PHASE).collect::<Vec<_>>(),
        detail: format!("steps {:?}", steps),
    });

    let fresh = GameState::new();
    results.push(TestResult {
        name: "phase_progress_initial".into(),
        passed: next_phase(&fresh).is_none() && phase_progress(&fresh) < 100.0,
        detail: format!("progress {:.1}%", phase_progress(&fresh)),
    });

    results
}

// ── 3. Actions ──────────────────────────────────────────────────────────

fn validate_actions(_verbose: bool) -> Vec<TestResult> {
    println!("--- Actions ---");
    let mut results = Vec::new();

    let s = GameState::new();
    let produced = Action::ProduceBasic.evaluate(&s).map(|u| u.apply_to(&s));
    let first_ok = produced.as_ref().map_or(false, |n| {
        (n.resources.paperclips - 1.0).abs() < 1e-9
            && (n.resources.energy - 99.95).abs() < 1e-9
            && (n.resources.materials - 49.99).abs() < 1e-9
            && n.game_time == 1
    });
    results.push(TestResult {
        name: "action_first_production".into(),
        passed: first_ok,
        detail: format!("cost {:?}", production_cost(&s)),
    });

    // Every rejected action is a no-op
    let mut broke = GameState::new();
    broke.phase = 2;
    broke.resources.energy = 0.0;
    broke.resources.materials = 0.0;
    let accepted: Vec<&str> = Action::ALL
        .iter()
        .filter(|a| a.evaluate(&broke).is_some())
        .map(|a| a.label())
        .collect();
    results.push(TestResult {
        name: "action_unaffordable_rejected".into(),
        passed: accepted.is_empty(),
        detail: if accepted.is_empty() {
            "all actions rejected without resources".into()
        } else {
            format!("accepted while broke: {}", accepted.join(", "))
        },
    });

    let corporate = Action::ALL
        .iter()
        .filter(|a| a.is_visible(1) && !a.is_visible(2))
        .count();
    results.push(TestResult {
        name: "action_corporate_phase_only".into(),
        passed: corporate == 3,
        detail: format!("{} actions visible only in phase 1", corporate),
    });

    results
}

// ── 4. Regeneration ─────────────────────────────────────────────────────

fn validate_regeneration(verbose: bool) -> Vec<TestResult> {
    println!("--- Regeneration ---");
    let mut results = Vec::new();

    for phase in 0..=FINAL_PHASE {
        let table = regen_table(phase);
        let mut r = GameState::new().resources;
        r.energy = 0.0;
        let mut overshoot = false;
        for _ in 0..2000 {
            let before = r.energy;
            r = regenerate(phase, &r);
            overshoot |= before < table.energy.cap && r.energy > table.energy.cap;
        }
        results.push(TestResult {
            name: format!("regen_phase_{}_capped", phase),
            passed: !overshoot && (r.energy - table.energy.cap).abs() < 1e-9,
            detail: format!("energy settles at {:.1} (cap {:.1})", r.energy, table.energy.cap),
        });
        if verbose {
            println!("  phase {}: {:?}", phase, table);
        }
    }

    results
}

// ── 5. Feedback ─────────────────────────────────────────────────────────

fn validate_feedback(_verbose: bool) -> Vec<TestResult> {
    println!("--- Feedback ---");
    let mut results = Vec::new();

    let mut tracker = FeedbackTracker::new();
    let mut s = GameState::new();
    for t in 0..40u64 {
        s.game_time = t;
        s.resources.alignment = 100.0 - t as f64 * 2.0;
        tracker.observe(&s);
    }
    results.push(TestResult {
        name: "feedback_trajectory_bounded".into(),
        passed: tracker.trajectory().count() == TRAJECTORY_LEN,
        detail: format!("{} samples kept", tracker.trajectory().count()),
    });
    results.push(TestResult {
        name: "feedback_trend_declining".into(),
        passed: tracker.trend() == Trend::Declining,
        detail: format!("trend {:?}", tracker.trend()),
    });

    s.capabilities.deception = 1.0;
    let first = tracker.observe(&s);
    let second = tracker.observe(&s);
    results.push(TestResult {
        name: "feedback_milestone_once".into(),
        passed: first.milestones.contains(&"first_deception") && second.is_empty(),
        detail: format!("first {:?}, second {:?}", first.milestones, second.milestones),
    });

    results
}

// ── 6. Sessions ─────────────────────────────────────────────────────────

fn validate_sessions(config: &EngineConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Sessions ---");
    let mut results = Vec::new();
    let seed = config.rng_seed.unwrap_or(42);

    // Producing from scratch reaches phase 1
    let mut session = Session::with_rng(config.clone(), StdRng::seed_from_u64(seed));
    session.start();
    let limit = 30 * 60 * 1000;
    while session.state().phase == 0 && session.now() < limit {
        let _ = session.perform(Action::ProduceBasic);
        session.advance(100);
    }
    results.push(TestResult {
        name: "session_reaches_phase_one".into(),
        passed: session.state().phase >= 1,
        detail: format!(
            "phase {} after {:.1}s, {} transitions",
            session.state().phase,
            session.now() as f64 / 1000.0,
            session.revision()
        ),
    });
    session.stop();
    results.push(TestResult {
        name: "session_stop_clears_tasks".into(),
        passed: session.scheduler().is_empty(),
        detail: format!("{} tasks left", session.scheduler().len()),
    });

    // Technology completes exactly once
    let mut rich = GameState::new();
    rich.phase = 3;
    rich.resources.knowledge = 1000.0;
    rich.resources.energy = 1000.0;
    let mut session = Session::with_state(config.clone(), StdRng::seed_from_u64(seed), rich);
    session.start();
    let started = session.start_research("basic_optimization").is_ok();
    let repeated = session.start_research("basic_optimization").is_err();
    session.advance(3 * config.research_interval_ms + config.completion_delay_ms + config.debounce_ms);
    let unlocked = session.state().has_technology("basic_optimization");
    session.advance(10 * config.research_interval_ms);
    let efficiency = session.state().capabilities.efficiency;
    results.push(TestResult {
        name: "session_research_once".into(),
        passed: started && repeated && unlocked && (efficiency - 1.5).abs() < 1e-9,
        detail: format!("unlocked={} efficiency={:.2}", unlocked, efficiency),
    });

    // Seeded cosmic runs agree
    let first = cosmic_run(config, seed);
    let second = cosmic_run(config, seed);
    results.push(TestResult {
        name: "session_seeded_runs_agree".into(),
        passed: first == second,
        detail: format!("{} probes, {} civilizations", first.1, first.2.len()),
    });
    if verbose {
        println!("  Cosmic run: paperclips={:.0} discovered={:?}", first.0.resources.paperclips, first.2);
    }

    results
}

fn cosmic_run(config: &EngineConfig, seed: u64) -> (GameState, u32, Vec<&'static str>) {
    let mut s = GameState::new();
    s.phase = 5;
    s.resources.paperclips = 1e7;
    s.resources.materials = 1e7;
    s.resources.energy = 1e7;
    s.resources.knowledge = 1e6;
    let mut session = Session::with_state(config.clone(), StdRng::seed_from_u64(seed), s);
    session.start();
    let _ = session.launch_probe("basic_replicator");
    for _ in 0..400 {
        let _ = session.perform(Action::ProduceBasic);
        session.advance(250);
    }
    let cosmic = session.cosmic_panel();
    let discovered = cosmic.discovered().iter().map(|d| d.civilization.id).collect();
    (session.state().clone(), cosmic.total_probes(), discovered)
}
