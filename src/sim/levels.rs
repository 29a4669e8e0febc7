//! Level table
//!
//! Fixed and ordered; levels are selected by 1-based number.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Per-level tuning, immutable during play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Seconds between ball spawns
    pub spawn_rate: f32,
    /// Spawn quota for the level
    pub ball_count: u32,
    /// Gravity magnitude (scaled to a 60 fps frame)
    pub gravity: f32,
    /// Countdown in seconds
    pub time_limit: u32,
}

impl LevelConfig {
    /// Spawn interval in milliseconds
    pub fn spawn_interval_ms(&self) -> f32 {
        self.spawn_rate * 1000.0
    }
}

pub static LEVELS: [LevelConfig; 3] = [
    LevelConfig {
        spawn_rate: 1.5,
        ball_count: 10,
        gravity: 9.8,
        time_limit: 60,
    },
    LevelConfig {
        spawn_rate: 1.0,
        ball_count: 15,
        gravity: 12.0,
        time_limit: 50,
    },
    LevelConfig {
        spawn_rate: 0.8,
        ball_count: 20,
        gravity: 15.0,
        time_limit: 45,
    },
];

/// Map a 1-based level number to a table index, rejecting anything outside the table
pub fn level_index(level: usize) -> Result<usize, GameError> {
    if level == 0 || level > LEVELS.len() {
        return Err(GameError::LevelOutOfRange {
            requested: level,
            available: LEVELS.len(),
        });
    }
    Ok(level - 1)
}
