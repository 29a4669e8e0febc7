//! Cosmetic particle bursts
//!
//! Particles never affect gameplay. Their life is counted in 60 fps frames.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::BallColor;
use crate::consts::FRAME_MS;

/// Particle color source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleTint {
    Ball(BallColor),
    Mismatch,
    Spring,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per 60 fps frame
    pub vel: Vec2,
    pub tint: ParticleTint,
    pub size: f32,
    /// Frames left to live
    pub life: f32,
}

/// Shape of a radial burst
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub count: usize,
    pub tint: ParticleTint,
    /// Speed range (min, spread)
    pub speed: (f32, f32),
    pub size: (f32, f32),
    pub life: (f32, f32),
}

impl Burst {
    /// Two balls bumping into each other (per ball)
    pub fn collision(color: BallColor) -> Self {
        Self {
            count: 8,
            tint: ParticleTint::Ball(color),
            speed: (2.0, 3.0),
            size: (3.0, 3.0),
            life: (30.0, 20.0),
        }
    }

    /// A ball landing in a collector
    pub fn collection(color: BallColor, matched: bool) -> Self {
        if matched {
            Self {
                count: 12,
                tint: ParticleTint::Ball(color),
                speed: (3.0, 4.0),
                size: (4.0, 4.0),
                life: (40.0, 30.0),
            }
        } else {
            Self {
                count: 6,
                tint: ParticleTint::Mismatch,
                speed: (1.0, 2.0),
                size: (4.0, 4.0),
                life: (40.0, 30.0),
            }
        }
    }

    /// A spring launch
    pub fn spring() -> Self {
        Self {
            count: 10,
            tint: ParticleTint::Spring,
            speed: (2.0, 4.0),
            size: (2.0, 3.0),
            life: (30.0, 20.0),
        }
    }
}

/// Emit a burst at `pos`, evenly spaced in angle with jittered speed, size and life
///
/// When `max` would be exceeded the oldest particles are dropped.
pub fn emit<R: Rng>(particles: &mut Vec<Particle>, rng: &mut R, pos: Vec2, burst: Burst, max: usize) {
    if max == 0 {
        return;
    }

    for i in 0..burst.count {
        let angle = std::f32::consts::TAU * i as f32 / burst.count as f32;
        let speed = burst.speed.0 + rng.random::<f32>() * burst.speed.1;
        particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            tint: burst.tint,
            size: burst.size.0 + rng.random::<f32>() * burst.size.1,
            life: burst.life.0 + rng.random::<f32>() * burst.life.1,
        });
    }

    if particles.len() > max {
        let excess = particles.len() - max;
        particles.drain(..excess);
    }
}

/// Move, drop slightly, age, and discard dead particles
pub fn update(particles: &mut Vec<Particle>, dt_ms: f32) {
    let k = dt_ms / FRAME_MS;
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * k;
        particle.vel.y += 0.1 * k;
        particle.life -= k;
    }
    particles.retain(|p| p.life > 0.0);
}
