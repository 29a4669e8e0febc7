//! Game settings
//!
//! Canvas size, physics tuning and effect quality. Loaded from an optional
//! JSON document; any field left out keeps its default.

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::error::GameError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Preset from a UI or command-line name, case-insensitive
    pub fn parse(name: &str) -> Option<Self> {
        [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High]
            .into_iter()
            .find(|preset| format!("{:?}", preset).eq_ignore_ascii_case(name))
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Physics coefficients shared by every level (gravity is per level)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Velocity multiplier applied every frame
    pub damping: f32,
    /// Velocity kept along a surface after contact
    pub friction: f32,
    /// Velocity kept after a bounce
    pub elasticity: f32,
    /// Extra kick multiplier for springs
    pub spring_force: f32,
    /// Smallest upward speed a spring hands out (px/s)
    pub spring_min_kick: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            damping: 0.99,
            friction: 0.8,
            elasticity: 0.8,
            spring_force: 1.5,
            spring_min_kick: 30.0,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Canvas width in pixels
    pub canvas_width: f32,
    /// Canvas height in pixels
    pub canvas_height: f32,
    /// Physics coefficients
    pub physics: PhysicsTuning,
    /// Effect quality preset
    pub quality: QualityPreset,
    /// Particle effects (collisions, collection, springs)
    pub particles: bool,
    /// Longest frame delta simulated in one step (ms)
    pub max_frame_ms: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            physics: PhysicsTuning::default(),
            quality: QualityPreset::Medium,
            particles: true,
            max_frame_ms: 100.0,
        }
    }
}

impl Settings {
    /// Create settings for a specific canvas size
    pub fn with_canvas(width: f32, height: f32) -> Self {
        Self {
            canvas_width: width,
            canvas_height: height,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Switch effect quality by name; unknown names keep the current preset
    pub fn set_quality(&mut self, name: &str) -> bool {
        match QualityPreset::parse(name) {
            Some(preset) => {
                self.quality = preset;
                log::info!("Effect quality set to {:?}", preset);
                true
            }
            None => {
                log::warn!("Unknown quality preset '{}'", name);
                false
            }
        }
    }

    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check ranges that would make the simulation misbehave
    pub fn validate(&self) -> Result<(), GameError> {
        let min_canvas = 2.0 * crate::consts::BALL_SPAWN_MARGIN + 1.0;
        if !(self.canvas_width >= min_canvas) || !(self.canvas_height >= min_canvas) {
            return Err(GameError::InvalidSettings(format!(
                "canvas must be at least {min_canvas}x{min_canvas}, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        let p = &self.physics;
        for (name, value) in [
            ("damping", p.damping),
            ("friction", p.friction),
            ("elasticity", p.elasticity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GameError::InvalidSettings(format!(
                    "{name} must be within 0..=1, got {value}"
                )));
            }
        }
        if !(p.spring_force >= 0.0) || !(p.spring_min_kick >= 0.0) {
            return Err(GameError::InvalidSettings(
                "spring_force and spring_min_kick must be non-negative".to_string(),
            ));
        }
        if !(self.max_frame_ms > 0.0) {
            return Err(GameError::InvalidSettings(format!(
                "max_frame_ms must be positive, got {}",
                self.max_frame_ms
            )));
        }
        Ok(())
    }

    /// Load settings from a JSON file, falling back to defaults (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&std::path::Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
