//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod levels;
pub mod particles;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, ball_ball_collision, ball_box_collision, ball_ramp_collision};
pub use input::{Command, PointerAction, apply};
pub use levels::{LEVELS, LevelConfig};
pub use particles::{Particle, ParticleTint};
pub use physics::{Contact, PhysicsEngine};
pub use state::{
    ActiveDrag, Ball, BallColor, Collector, GameEvent, GamePhase, GameState, Obstacle,
    ObstacleKind, Snapshot,
};
pub use tick::{new_game, reset_level, select_level, step, tick_timer, toggle_pause};
