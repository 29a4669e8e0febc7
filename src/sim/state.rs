//! Game state and core simulation types
//!
//! Everything the presentation layer reads lives here: entities, score,
//! timer and the current phase of play.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::levels::{LEVELS, LevelConfig};
use super::particles::Particle;
use super::physics::PhysicsEngine;
use crate::consts::*;
use crate::settings::Settings;
use crate::to_local;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to pick a level
    Selecting,
    /// Active gameplay
    Playing,
    /// Gameplay suspended; neither frames nor the timer advance
    Paused,
    /// Level cleared, waiting out the delay before the next one
    LevelComplete,
    /// Run ended
    GameOver { win: bool },
}

/// Ball (and collector) colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallColor {
    Red,
    Green,
    Blue,
}

impl BallColor {
    pub const ALL: [BallColor; 3] = [BallColor::Red, BallColor::Green, BallColor::Blue];

    pub fn as_str(&self) -> &'static str {
        match self {
            BallColor::Red => "red",
            BallColor::Green => "green",
            BallColor::Blue => "blue",
        }
    }

}

/// A falling ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub color: BallColor,
    /// Visual spin (radians)
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Set once the ball has been collected or left the canvas
    pub removed: bool,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, color: BallColor) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            mass: BALL_MASS,
            color,
            rotation: 0.0,
            rotation_speed: 0.0,
            removed: false,
        }
    }
}

/// Player-placed obstacle shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Flat box; balls bounce and roll on it
    Platform,
    /// Box with a diagonal slope from its top-left to bottom-right corner
    Ramp,
    /// Pad that kicks balls upward
    Spring,
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Platform => "platform",
            ObstacleKind::Ramp => "ramp",
            ObstacleKind::Spring => "spring",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "platform" => Some(ObstacleKind::Platform),
            "ramp" => Some(ObstacleKind::Ramp),
            "spring" => Some(ObstacleKind::Spring),
            _ => None,
        }
    }

    /// Width and height when placed
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::Platform => Vec2::new(100.0, 20.0),
            ObstacleKind::Ramp => Vec2::new(100.0, 50.0),
            ObstacleKind::Spring => Vec2::new(60.0, 20.0),
        }
    }
}

/// A player-placed obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Center
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Radians, clockwise on screen (y grows downward)
    pub rotation: f32,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size: kind.size(),
            rotation: 0.0,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Whether a canvas point lies inside the (rotated) obstacle box
    pub fn contains_point(&self, point: Vec2) -> bool {
        let local = to_local(point, self.pos, self.rotation);
        let half = self.half_extents();
        local.x.abs() <= half.x && local.y.abs() <= half.y
    }
}

/// A fixed sink at the bottom of the canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collector {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub color: BallColor,
}

/// Obstacle currently being dragged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveDrag {
    pub obstacle_id: u32,
    /// Pointer position minus obstacle center at drag start
    pub offset: Vec2,
}

/// Notifications for the presentation layer, drained each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: usize },
    ScoreChanged { score: i64 },
    /// A ball reached a collector; `delta` is the score change to float at `pos`
    BallCollected {
        pos: Vec2,
        color: BallColor,
        matched: bool,
        delta: i64,
    },
    SpringBounce { pos: Vec2 },
    LevelComplete { level: usize },
    GameOver { win: bool, score: i64 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) physics: PhysicsEngine,
    /// Current level (0-based index into the level table)
    pub level_index: usize,
    /// Score; may go negative
    pub score: i64,
    /// Seconds left on the level clock
    pub time_left: u32,
    pub phase: GamePhase,
    pub balls: Vec<Ball>,
    pub obstacles: Vec<Obstacle>,
    pub collectors: Vec<Collector>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Balls spawned so far this level
    pub spawned_balls: u32,
    /// Time since the last spawn (None until the first ball of a level)
    pub(crate) since_spawn_ms: Option<f32>,
    /// Remaining delay before advancing from LevelComplete
    pub(crate) advance_ms: f32,
    /// Obstacle kind placed by `pointer_down` on empty canvas
    pub selected_obstacle: Option<ObstacleKind>,
    pub drag: Option<ActiveDrag>,
    pub(crate) events: Vec<GameEvent>,
    /// Bumped every time a level (re)starts
    pub(crate) level_epoch: u32,
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given seed, waiting for level selection
    ///
    /// Settings that fail validation are replaced by the defaults.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Settings::default()
            }
        };
        let physics = PhysicsEngine::new(settings.physics, LEVELS[0].gravity);
        Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            physics,
            level_index: 0,
            score: 0,
            time_left: LEVELS[0].time_limit,
            phase: GamePhase::Selecting,
            balls: Vec::new(),
            obstacles: Vec::new(),
            collectors: Vec::new(),
            particles: Vec::new(),
            spawned_balls: 0,
            since_spawn_ms: None,
            advance_ms: 0.0,
            selected_obstacle: None,
            drag: None,
            events: Vec::new(),
            level_epoch: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Configuration of the current level
    pub fn level_config(&self) -> &'static LevelConfig {
        &LEVELS[self.level_index]
    }

    /// 1-based level number for display
    pub fn level(&self) -> usize {
        self.level_index + 1
    }

    pub fn canvas(&self) -> Vec2 {
        Vec2::new(self.settings.canvas_width, self.settings.canvas_height)
    }

    pub fn physics(&self) -> &PhysicsEngine {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsEngine {
        &mut self.physics
    }

    /// A level is loaded and not over (playing, paused or between levels)
    pub fn is_running(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::Playing | GamePhase::Paused | GamePhase::LevelComplete
        )
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Balls still in play (not flagged for removal)
    pub fn active_balls(&self) -> usize {
        self.balls.iter().filter(|b| !b.removed).count()
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear entities and per-level counters
    pub(crate) fn clear_level(&mut self) {
        self.balls.clear();
        self.obstacles.clear();
        self.collectors.clear();
        self.particles.clear();
        self.drag = None;
        self.selected_obstacle = None;
        self.spawned_balls = 0;
        self.since_spawn_ms = None;
        self.advance_ms = 0.0;
    }

    /// Place the red, green and blue collectors along the canvas bottom
    pub(crate) fn create_collectors(&mut self) {
        let canvas = self.canvas();
        let spacing = canvas.x / 4.0;
        let y = canvas.y - COLLECTOR_INSET;
        let xs = [spacing, canvas.x / 2.0, canvas.x - spacing];

        for (x, color) in xs.into_iter().zip(BallColor::ALL) {
            let id = self.next_entity_id();
            self.collectors.push(Collector {
                id,
                pos: Vec2::new(x, y),
                radius: COLLECTOR_RADIUS,
                color,
            });
        }
    }

    /// Drop a new ball with random color, x position, drift and spin
    pub(crate) fn spawn_ball(&mut self) -> u32 {
        let id = self.next_entity_id();
        let width = self.settings.canvas_width;

        // Settings are public; keep the range non-empty on a shrunken canvas
        let max_x = (width - BALL_SPAWN_MARGIN).max(BALL_SPAWN_MARGIN + 1.0);
        let x = self.rng.random_range(BALL_SPAWN_MARGIN..max_x);
        let color = BallColor::ALL[self.rng.random_range(0..BallColor::ALL.len())];

        let mut ball = Ball::new(id, Vec2::new(x, BALL_SPAWN_Y), color);
        ball.vel.x = self
            .rng
            .random_range(-BALL_SPAWN_MAX_VX..BALL_SPAWN_MAX_VX);
        ball.rotation_speed = self
            .rng
            .random_range(-BALL_SPAWN_MAX_SPIN..BALL_SPAWN_MAX_SPIN);

        self.balls.push(ball);
        self.spawned_balls += 1;
        id
    }

    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Topmost (most recently placed) obstacle under a canvas point
    pub fn obstacle_at(&self, point: Vec2) -> Option<&Obstacle> {
        self.obstacles.iter().rev().find(|o| o.contains_point(point))
    }

    /// Serializable view for the presentation layer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            level: self.level(),
            score: self.score,
            time_left: self.time_left,
            running: self.is_running(),
            paused: self.is_paused(),
            balls: &self.balls,
            obstacles: &self.obstacles,
            collectors: &self.collectors,
            particles: &self.particles,
        }
    }
}

/// Read-only frame view handed to renderers
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub level: usize,
    pub score: i64,
    pub time_left: u32,
    pub running: bool,
    pub paused: bool,
    pub balls: &'a [Ball],
    pub obstacles: &'a [Obstacle],
    pub collectors: &'a [Collector],
    pub particles: &'a [Particle],
}
