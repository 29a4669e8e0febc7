//! Platform layer
//!
//! Turns host timestamps into simulation work:
//! - one [`step`] per animation frame
//! - one [`tick_timer`] per second of unpaused play
//!
//! The browser binding lives in `web` (wasm32 only).

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::TIMER_PERIOD_MS;
use crate::sim::{GamePhase, GameState, step, tick_timer};

/// Slack for float drift when summing frame deltas into whole seconds
const TIMER_EPSILON_MS: f64 = 1e-3;

/// Drives a [`GameState`] from host timestamps (milliseconds)
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Previous frame timestamp; None after a pause or before the first frame
    last_time: Option<f64>,
    /// Unpaused play time not yet counted by the countdown
    timer_accum_ms: f64,
    /// Level epoch the accumulator belongs to
    epoch: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp so the next frame simulates no elapsed time
    pub fn reset_baseline(&mut self) {
        self.last_time = None;
    }

    /// Run one animation frame at host time `now_ms`
    ///
    /// Returns the simulated frame delta in milliseconds.
    pub fn frame(&mut self, state: &mut GameState, now_ms: f64) -> f32 {
        if state.level_epoch != self.epoch {
            self.epoch = state.level_epoch;
            self.timer_accum_ms = 0.0;
        }

        match state.phase {
            GamePhase::Playing | GamePhase::LevelComplete => {}
            GamePhase::Paused => {
                // Resume picks up from a fresh baseline
                self.last_time = None;
                return 0.0;
            }
            GamePhase::Selecting | GamePhase::GameOver { .. } => {
                self.last_time = None;
                self.timer_accum_ms = 0.0;
                return 0.0;
            }
        }

        let elapsed = match self.last_time {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        // Physics gets a bounded step; the countdown follows the wall clock
        let dt = elapsed.min(f64::from(state.settings.max_frame_ms));

        let timed = state.phase == GamePhase::Playing;
        step(state, dt as f32);

        if timed {
            self.run_timer(state, elapsed);
        }
        dt as f32
    }

    /// Fire the countdown for every whole second of play accumulated
    fn run_timer(&mut self, state: &mut GameState, elapsed: f64) {
        if state.level_epoch != self.epoch {
            // Level changed during this frame; its clock starts fresh
            self.epoch = state.level_epoch;
            self.timer_accum_ms = 0.0;
            return;
        }

        self.timer_accum_ms += elapsed;
        let period = f64::from(TIMER_PERIOD_MS);
        while self.timer_accum_ms >= period - TIMER_EPSILON_MS {
            self.timer_accum_ms = (self.timer_accum_ms - period).max(0.0);
            tick_timer(state);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
    }
}
