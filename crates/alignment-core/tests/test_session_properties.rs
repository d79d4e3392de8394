//! Property tests for sessions driven by arbitrary player scripts.

use alignment_core::prelude::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn arb_step() -> impl Strategy<Value = (Action, u64)> {
    (prop::sample::select(Action::ALL.to_vec()), 0u64..3000)
}

fn arb_start() -> impl Strategy<Value = GameState> {
    (0u8..=6, 0.0..200.0f64, 0.0..100.0f64, 0.0..100.0f64).prop_map(
        |(phase, energy, knowledge, influence)| {
            let mut s = GameState::new();
            s.phase = phase;
            s.resources.energy = energy;
            s.resources.knowledge = knowledge;
            s.resources.influence = influence;
            s
        },
    )
}

proptest! {
    #[test]
    fn phase_and_total_paperclips_never_decrease(
        start in arb_start(),
        script in prop::collection::vec(arb_step(), 1..60),
        seed in any::<u64>(),
    ) {
        let mut session = Session::with_state(EngineConfig::default(), StdRng::seed_from_u64(seed), start);
        session.start();
        let mut phase = session.state().phase;
        let mut total = session.state().total_paperclips;
        for (action, wait) in script {
            let _ = session.perform(action);
            session.advance(wait);
            let state = session.state();
            prop_assert!(state.phase >= phase);
            prop_assert!(state.phase <= 6);
            prop_assert!(state.total_paperclips >= total);
            phase = state.phase;
            total = state.total_paperclips;
        }
    }

    #[test]
    fn rejected_actions_buffer_nothing(
        start in arb_start(),
        action in prop::sample::select(Action::ALL.to_vec()),
    ) {
        let mut session = Session::with_state(EngineConfig::default(), StdRng::seed_from_u64(0), start);
        session.start();
        let before = session.state().clone();
        if session.perform(action).is_err() {
            // Short of the first regeneration tick, nothing else can move.
            session.advance(1999);
            prop_assert_eq!(session.state(), &before);
            prop_assert_eq!(session.revision(), 0);
        }
    }
}
