//! Property tests for the simulation invariants.
//!
//! Each property drives the public simulation API with generated inputs and
//! checks an invariant that must hold after every step.

use glam::Vec2;
use portal_dodge::Tuning;
use portal_dodge::sim::splitter;
use portal_dodge::sim::{GameState, MovementIntent, Obstacle, Orientation, Player, TickInput, tick};
use proptest::prelude::*;

fn any_intent() -> impl Strategy<Value = MovementIntent> {
    any::<(bool, bool, bool, bool)>().prop_map(|(left, right, up, down)| MovementIntent {
        left,
        right,
        up,
        down,
    })
}

fn any_dt() -> impl Strategy<Value = f32> {
    0.0_f32..6.0
}

fn any_orientation() -> impl Strategy<Value = Orientation> {
    prop_oneof![
        Just(Orientation::Down),
        Just(Orientation::Up),
        Just(Orientation::Side),
    ]
}

proptest! {
    #[test]
    fn speed_never_exceeds_cap(
        steps in prop::collection::vec((any_intent(), any_dt(), any::<bool>()), 1..200),
    ) {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        for (intent, dt, suppressed) in steps {
            player.update(intent, dt, suppressed, &tuning);
            prop_assert!(
                player.vel.length() <= tuning.player_max_speed + 1e-3,
                "speed {} over cap", player.vel.length()
            );
        }
    }

    #[test]
    fn player_stays_in_field(
        x in -5000.0_f32..5000.0,
        y in -5000.0_f32..5000.0,
        steps in prop::collection::vec((any_intent(), any_dt()), 1..100),
    ) {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.pos = Vec2::new(x, y);
        for (intent, dt) in steps {
            player.update(intent, dt, false, &tuning);
            let r = player.radius;
            prop_assert!(player.pos.x >= r && player.pos.x <= tuning.field_width - r);
            prop_assert!(player.pos.y >= r && player.pos.y <= tuning.field_height - r);
        }
    }

    #[test]
    fn split_happens_at_most_once(
        size in 1_u32..120,
        offset in -60.0_f32..60.0,
        orientation in any_orientation(),
        calls in 2_usize..20,
    ) {
        let tuning = Tuning::default();
        let mid = Vec2::new(tuning.field_width, tuning.field_height) * 0.5;
        let mut parent = Obstacle::new(mid + Vec2::splat(offset - size as f32 / 2.0), size);
        parent.behavior.splitter = true;
        let mut obstacles = vec![parent];

        let axis = orientation.primary_axis();
        // Each call sweeps in from well outside the field
        let far = axis.of(Vec2::new(tuning.field_width, tuning.field_height));

        let first = splitter::maybe_split(&mut obstacles, 0, -far, orientation, 100, &tuning);
        let after_first = obstacles.len();
        prop_assert_eq!(after_first, if first { 3 } else { 1 });
        for _ in 0..calls {
            prop_assert!(!splitter::maybe_split(&mut obstacles, 0, -far, orientation, 100, &tuning));
            // Children never split
            for i in 1..obstacles.len() {
                prop_assert!(!splitter::maybe_split(&mut obstacles, i, 2.0 * far, orientation, 100, &tuning));
            }
        }
        if first {
            prop_assert_eq!(obstacles.len(), after_first);
        }
    }

    #[test]
    fn population_stays_bounded(
        seed in any::<u64>(),
        start_score in 0_u64..100_000,
        steps in prop::collection::vec((any_intent(), any_dt()), 1..300),
    ) {
        let mut state = GameState::new(seed, Tuning::default());
        state.stats.tick_score = start_score;
        // Keep the run alive so the field keeps updating
        state.player.lives = u32::MAX / 2;
        let cap = state.tuning.obstacle_cap();
        for (intent, dt) in steps {
            tick(&mut state, &TickInput { intent, pause: false }, dt);
            prop_assert!(state.obstacles.len() <= cap, "{} > {}", state.obstacles.len(), cap);
            prop_assert!(state.obstacles.obstacles().iter().all(|o| o.size > 0));
        }
    }

    #[test]
    fn orientation_never_regresses(
        seed in any::<u64>(),
        score_bumps in prop::collection::vec(0_u64..3000, 1..40),
    ) {
        let mut state = GameState::new(seed, Tuning::default());
        state.player.lives = u32::MAX / 2;
        let mut seen = vec![state.orientation()];
        for bump in score_bumps {
            state.stats.tick_score += bump;
            for _ in 0..30 {
                tick(&mut state, &TickInput::default(), 1.0);
                let now = state.orientation();
                let last = *seen.last().unwrap();
                prop_assert!(now >= last, "{:?} after {:?}", now, last);
                if now != last {
                    seen.push(now);
                }
            }
        }
        // A subsequence of down, up, side
        prop_assert!(seen.windows(2).all(|w| w[0].next() == Some(w[1])));
    }

    #[test]
    fn immunity_limits_damage(seed in any::<u64>(), frames in 1_usize..80) {
        let mut state = GameState::new(seed, Tuning::default());
        state.tuning.pickup_spawn_chance = 0.0;
        let start = state.player.lives;
        for _ in 0..frames {
            // Park a large obstacle on top of the player every frame
            let pos = state.player.pos - Vec2::splat(30.0);
            state.obstacles.obstacles_mut()[0] = Obstacle::new(pos, 60);
            tick(&mut state, &TickInput::default(), 1.0);
        }
        // The first hit grants longer immunity than the whole run
        prop_assert!(start - state.player.lives <= 1);
    }
}
