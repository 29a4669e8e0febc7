//! Frame step, countdown timer and level lifecycle
//!
//! Two periodic tasks drive a session: [`step`] once per rendered frame and
//! [`tick_timer`] once per wall-clock second. Both only act while a level is
//! being played.

use super::levels::{LEVELS, level_index};
use super::particles::{self, Burst};
use super::physics::Contact;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::error::GameError;

/// Slack allowed when comparing accumulated frame times against an interval
pub(crate) const TIME_EPSILON_MS: f32 = 0.01;

/// Advance the session by one frame of `dt_ms` milliseconds
///
/// Order within a playing frame: spawn, integrate + collide, prune, particles,
/// completion check.
pub fn step(state: &mut GameState, dt_ms: f32) {
    match state.phase {
        GamePhase::Playing => {}
        GamePhase::LevelComplete => {
            particles::update(&mut state.particles, dt_ms);
            state.advance_ms -= dt_ms;
            if state.advance_ms <= 0.0 {
                advance_level(state);
            }
            return;
        }
        GamePhase::Selecting | GamePhase::Paused | GamePhase::GameOver { .. } => return,
    }

    spawn_balls(state, dt_ms);

    let physics = state.physics;
    let mut contacts = Vec::new();
    physics.update(
        &mut state.balls,
        &state.obstacles,
        &state.collectors,
        state.settings.canvas_width,
        dt_ms,
        &mut contacts,
    );
    for contact in contacts {
        apply_contact(state, contact);
    }

    let floor = state.settings.canvas_height + OFFSCREEN_MARGIN;
    for ball in state.balls.iter_mut().filter(|b| !b.removed) {
        if ball.pos.y > floor {
            ball.removed = true;
        }
    }

    particles::update(&mut state.particles, dt_ms);
    state.balls.retain(|b| !b.removed);

    check_level_complete(state);
}

/// One second of the level countdown
pub fn tick_timer(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_left = state.time_left.saturating_sub(1);
    if state.time_left == 0 {
        log::info!("Time up on level {}", state.level());
        game_over(state, false);
    }
}

/// Spawn the next ball once the level's interval has elapsed
///
/// The first ball of a level drops on the first frame. Never exceeds the quota.
fn spawn_balls(state: &mut GameState, dt_ms: f32) {
    let config = state.level_config();
    if state.spawned_balls >= config.ball_count {
        return;
    }

    let interval = config.spawn_interval_ms();
    let remainder = match state.since_spawn_ms {
        None => Some(0.0),
        Some(elapsed) => {
            let elapsed = elapsed + dt_ms;
            state.since_spawn_ms = Some(elapsed);
            (elapsed >= interval - TIME_EPSILON_MS).then(|| (elapsed - interval).clamp(0.0, interval))
        }
    };

    if let Some(remainder) = remainder {
        let id = state.spawn_ball();
        state.since_spawn_ms = Some(remainder);
        log::debug!(
            "Spawned ball {} ({}/{})",
            id,
            state.spawned_balls,
            config.ball_count
        );
    }
}

/// Turn a physics contact into score, particles and events
fn apply_contact(state: &mut GameState, contact: Contact) {
    let max_particles = state.settings.max_particles();

    match contact {
        Contact::Balls { a, b, a_pos, b_pos } => {
            for (id, pos) in [(a, a_pos), (b, b_pos)] {
                if let Some(color) = state.balls.iter().find(|ball| ball.id == id).map(|ball| ball.color) {
                    particles::emit(
                        &mut state.particles,
                        &mut state.rng,
                        pos,
                        Burst::collision(color),
                        max_particles,
                    );
                }
            }
        }
        Contact::Spring { pos, .. } => {
            particles::emit(
                &mut state.particles,
                &mut state.rng,
                pos,
                Burst::spring(),
                max_particles,
            );
            state.push_event(GameEvent::SpringBounce { pos });
        }
        Contact::Collected {
            ball,
            pos,
            color,
            matched,
            ..
        } => {
            let delta = if matched { MATCH_POINTS } else { MISMATCH_POINTS };
            state.score += delta;
            log::debug!(
                "Ball {} collected ({}), score {}",
                ball,
                if matched { "match" } else { "mismatch" },
                state.score
            );

            particles::emit(
                &mut state.particles,
                &mut state.rng,
                pos,
                Burst::collection(color, matched),
                max_particles,
            );
            state.push_event(GameEvent::BallCollected {
                pos,
                color,
                matched,
                delta,
            });
            state.push_event(GameEvent::ScoreChanged { score: state.score });
        }
    }
}

/// Level is done once the quota has spawned and nothing is left in play
fn check_level_complete(state: &mut GameState) {
    let config = state.level_config();
    if state.spawned_balls < config.ball_count || state.active_balls() > 0 {
        return;
    }

    let level = state.level();
    state.push_event(GameEvent::LevelComplete { level });

    if state.level_index + 1 >= LEVELS.len() {
        log::info!("Final level {} cleared", level);
        game_over(state, true);
    } else {
        log::info!("Level {} cleared, advancing shortly", level);
        state.drag = None;
        state.advance_ms = LEVEL_ADVANCE_DELAY_MS;
        state.phase = GamePhase::LevelComplete;
    }
}

fn advance_level(state: &mut GameState) {
    state.level_index += 1;
    start_level(state);
}

/// Load the current level: clear entities, set gravity and clock, place collectors
///
/// The score is carried over.
pub fn start_level(state: &mut GameState) {
    state.clear_level();

    let config = *state.level_config();
    state.time_left = config.time_limit;
    state.physics.set_gravity(config.gravity);
    state.create_collectors();
    state.level_epoch = state.level_epoch.wrapping_add(1);
    state.phase = GamePhase::Playing;

    log::info!(
        "Level {} started: {} balls every {}s, gravity {}, {}s",
        state.level(),
        config.ball_count,
        config.spawn_rate,
        config.gravity,
        config.time_limit
    );
    let level = state.level();
    state.push_event(GameEvent::LevelStarted { level });
}

/// Pick a level by 1-based number and start it
pub fn select_level(state: &mut GameState, level: usize) -> Result<(), GameError> {
    let index = level_index(level).inspect_err(|e| log::warn!("Rejected level selection: {}", e))?;
    state.level_index = index;
    start_level(state);
    Ok(())
}

/// Restart the current level, keeping the score
pub fn reset_level(state: &mut GameState) {
    if state.phase == GamePhase::Selecting {
        log::warn!("Reset ignored: no level selected");
        return;
    }
    log::info!("Resetting level {}", state.level());
    start_level(state);
}

/// Zero the score and go back to level selection
pub fn new_game(state: &mut GameState) {
    state.clear_level();
    state.score = 0;
    state.phase = GamePhase::Selecting;
    state.push_event(GameEvent::ScoreChanged { score: 0 });
    log::info!("New game");
}

/// Flip between Playing and Paused; ignored in any other phase
pub fn toggle_pause(state: &mut GameState) {
    state.phase = match state.phase {
        GamePhase::Playing => {
            log::info!("Paused");
            GamePhase::Paused
        }
        GamePhase::Paused => {
            log::info!("Resumed");
            GamePhase::Playing
        }
        other => other,
    };
}

fn game_over(state: &mut GameState, win: bool) {
    state.phase = GamePhase::GameOver { win };
    state.drag = None;
    log::info!(
        "Game over ({}), final score {}",
        if win { "win" } else { "out of time" },
        state.score
    );
    let score = state.score;
    state.push_event(GameEvent::GameOver { win, score });
}
