//! Gravity Ball - a color-sorting physics puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, level lifecycle)
//! - `platform`: Frame clock driving the simulation, plus the browser binding
//! - `settings`: Tunable physics and canvas configuration
//! - `error`: Error type for rejected commands and bad configuration

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default canvas size (pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Reference frame time the simulation is tuned against (60 fps)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Integration speeds up gravity so that tuning matches a 60 fps frame
    pub const FRAMES_PER_SECOND: f32 = 60.0;
    /// Wall-clock countdown period
    pub const TIMER_PERIOD_MS: f32 = 1000.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 20.0;
    pub const BALL_MASS: f32 = 1.0;
    /// Spawn height (above the canvas top)
    pub const BALL_SPAWN_Y: f32 = -50.0;
    /// Horizontal margin kept clear when picking a spawn x
    pub const BALL_SPAWN_MARGIN: f32 = 50.0;
    /// Max horizontal spawn speed (either direction)
    pub const BALL_SPAWN_MAX_VX: f32 = 25.0;
    /// Max spawn spin (either direction, radians/sec)
    pub const BALL_SPAWN_MAX_SPIN: f32 = 2.5;
    /// Balls further than this below the canvas bottom are pruned
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Collector defaults
    pub const COLLECTOR_RADIUS: f32 = 50.0;
    /// Distance from the canvas bottom to the collector centers
    pub const COLLECTOR_INSET: f32 = 50.0;

    /// Obstacles may not be dragged closer than this to the canvas bottom
    pub const DRAG_BOTTOM_MARGIN: f32 = 100.0;
    /// Rotation applied by a double-click/double-tap
    pub const ROTATE_STEP: f32 = std::f32::consts::FRAC_PI_4;

    /// Score policy
    pub const MATCH_POINTS: i64 = 10;
    pub const MISMATCH_POINTS: i64 = -5;

    /// Pause between a cleared level and the next one
    pub const LEVEL_ADVANCE_DELAY_MS: f32 = 2000.0;

    /// Minimum distance used when normalizing contact vectors
    pub const CONTACT_EPSILON: f32 = 1e-4;
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Express a world-space point in the local frame of a body at `origin` rotated by `angle`
#[inline]
pub fn to_local(point: Vec2, origin: Vec2, angle: f32) -> Vec2 {
    rotate(point - origin, -angle)
}
