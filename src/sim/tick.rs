//! Per-frame simulation tick
//!
//! Advances the game by one frame scaled by `dt` (1.0 at the target rate).
//! The order is fixed: pause, timers, fall speed, player, obstacles,
//! pickups, portal, collisions, score.

use super::collision::{self, Contact};
use super::obstacles::StepContext;
use super::player::MovementIntent;
use super::portal::PortalStep;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub intent: MovementIntent,
    /// Pause toggle
    pub pause: bool,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing simulated (paused or already over)
    Idle,
    /// Hit-freeze frame: only timers advanced
    Frozen,
    /// Full frame simulated
    Stepped(Contact),
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickOutcome {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return TickOutcome::Idle;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }
    if state.phase != GamePhase::Playing {
        return TickOutcome::Idle;
    }

    let dt = dt.max(0.0);
    let tuning = &state.tuning;

    state.player.tick_timers(dt);
    state.stats.decay_shake(dt);
    if state.player.hit_freeze_timer > 0.0 {
        state.player.hit_freeze_timer = (state.player.hit_freeze_timer - dt).max(0.0);
        return TickOutcome::Frozen;
    }

    state.frames += 1;
    state.sim_time_ms += dt * 1000.0 / crate::consts::TARGET_FPS;

    let orientation = state.portal.orientation();
    state.stats.update_fall_speed(orientation, tuning);

    state
        .player
        .update(input.intent, dt, state.portal.is_homing(), tuning);

    let ctx = StepContext {
        orientation,
        fall_speed: state.stats.fall_speed,
        player_pos: state.player.pos,
        sim_time_ms: state.sim_time_ms,
        dt,
        tuning,
    };
    let report = state
        .obstacles
        .update(&ctx, state.stats.tick_score, &mut state.rng);
    for _ in 0..report.splits {
        state.events.push(GameEvent::Split);
    }

    state
        .pickups
        .maybe_spawn(&mut state.rng, orientation, state.portal.is_busy(), tuning);
    state
        .pickups
        .update(state.stats.fall_speed, orientation, dt, tuning);

    let step = state
        .portal
        .update(state.stats.displayed_score(), &mut state.player, dt, tuning);
    if step == PortalStep::Entered {
        if let Some(next) = state.portal.complete(tuning) {
            log::info!(
                "Portal entered at score {}: {} -> {}",
                state.stats.displayed_score(),
                orientation.as_str(),
                next.as_str()
            );
            state.pickups.clear();
            state
                .obstacles
                .reseed(next, state.stats.tick_score, &mut state.rng, tuning);
            state.player.place(next.entry_point(tuning), tuning);
            state.stats.on_flip(next, tuning);
            state.events.push(GameEvent::PortalEntered(next));
        }
    }

    let contact = collision::resolve(
        &mut state.player,
        &state.obstacles,
        &mut state.pickups,
        state.portal.is_busy(),
        tuning,
        &mut state.events,
    );
    // Only an unshielded hit starts a freeze
    if state.player.hit_freeze_timer > 0.0 {
        state.stats.shake = tuning.hit_shake;
    }

    if contact == Contact::GameOver {
        let final_score = state.stats.displayed_score();
        state.stats.game_over = true;
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { final_score });
        log::info!("Game over - final score {} ({} frames)", final_score, state.frames);
        return TickOutcome::Stepped(contact);
    }

    let orientation = state.portal.orientation();
    state.stats.accrue(dt);
    state
        .stats
        .scroll_backdrop(orientation, dt, tuning.field_height);

    TickOutcome::Stepped(contact)
}
