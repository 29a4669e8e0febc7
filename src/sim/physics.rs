//! Ball integration and collision response
//!
//! One call to [`PhysicsEngine::update`] advances every ball, resolves
//! ball-ball, ball-obstacle and ball-collector contacts, then keeps balls
//! inside the side and top walls. Contacts the rest of the game cares about
//! are reported as [`Contact`] values rather than callbacks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{
    ball_ball_collision, ball_box_collision, ball_disc_collision, ball_in_collector,
    ball_ramp_collision, bounce_velocity,
};
use super::state::{Ball, BallColor, Collector, Obstacle, ObstacleKind};
use crate::consts::FRAMES_PER_SECOND;
use crate::settings::PhysicsTuning;

/// A contact that has gameplay or visual consequences
#[derive(Debug, Clone, PartialEq)]
pub enum Contact {
    /// Two balls touched
    Balls {
        a: u32,
        b: u32,
        a_pos: Vec2,
        b_pos: Vec2,
    },
    /// A spring kicked a ball upward
    Spring { ball: u32, obstacle: u32, pos: Vec2 },
    /// A ball entered a collector and was flagged for removal
    Collected {
        ball: u32,
        collector: u32,
        pos: Vec2,
        color: BallColor,
        matched: bool,
    },
}

/// Tunable rigid-ball physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsEngine {
    /// Downward acceleration per 60 fps frame
    pub gravity: f32,
    pub damping: f32,
    pub friction: f32,
    pub elasticity: f32,
    pub spring_force: f32,
    pub spring_min_kick: f32,
}

impl PhysicsEngine {
    pub fn new(tuning: PhysicsTuning, gravity: f32) -> Self {
        Self {
            gravity,
            damping: tuning.damping,
            friction: tuning.friction,
            elasticity: tuning.elasticity,
            spring_force: tuning.spring_force,
            spring_min_kick: tuning.spring_min_kick,
        }
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping;
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.friction = friction;
    }

    pub fn set_elasticity(&mut self, elasticity: f32) {
        self.elasticity = elasticity;
    }

    pub fn set_spring_force(&mut self, spring_force: f32) {
        self.spring_force = spring_force;
    }

    /// Advance all balls by `dt_ms` and resolve every contact
    ///
    /// Balls already flagged as removed are left untouched.
    pub fn update(
        &self,
        balls: &mut [Ball],
        obstacles: &[Obstacle],
        collectors: &[Collector],
        canvas_width: f32,
        dt_ms: f32,
        contacts: &mut Vec<Contact>,
    ) {
        let dt = dt_ms / 1000.0;

        for ball in balls.iter_mut().filter(|b| !b.removed) {
            self.integrate(ball, dt);
        }

        self.resolve_collisions(balls, obstacles, collectors, contacts);

        for ball in balls.iter_mut().filter(|b| !b.removed) {
            self.constrain_to_walls(ball, canvas_width);
        }
    }

    /// Gravity, damping, then position and spin
    pub fn integrate(&self, ball: &mut Ball, dt: f32) {
        ball.vel.y += self.gravity * dt * FRAMES_PER_SECOND;
        ball.vel *= self.damping;
        ball.pos += ball.vel * dt;
        ball.rotation += ball.rotation_speed * dt;
    }

    /// Pairwise collision pass in ball order
    pub fn resolve_collisions(
        &self,
        balls: &mut [Ball],
        obstacles: &[Obstacle],
        collectors: &[Collector],
        contacts: &mut Vec<Contact>,
    ) {
        for i in 0..balls.len() {
            if balls[i].removed {
                continue;
            }

            for j in (i + 1)..balls.len() {
                if balls[j].removed {
                    continue;
                }
                let (head, tail) = balls.split_at_mut(j);
                if self.resolve_ball_pair(&mut head[i], &mut tail[0]) {
                    contacts.push(Contact::Balls {
                        a: head[i].id,
                        b: tail[0].id,
                        a_pos: head[i].pos,
                        b_pos: tail[0].pos,
                    });
                }
            }

            let ball = &mut balls[i];
            for obstacle in obstacles {
                self.resolve_obstacle(ball, obstacle, contacts);
            }

            for collector in collectors {
                if ball_in_collector(ball.pos, collector.pos, collector.radius) {
                    ball.removed = true;
                    contacts.push(Contact::Collected {
                        ball: ball.id,
                        collector: collector.id,
                        pos: ball.pos,
                        color: ball.color,
                        matched: ball.color == collector.color,
                    });
                    break;
                }
            }
        }
    }

    /// Separate two overlapping balls and exchange an elastic impulse
    ///
    /// Returns true if they were touching.
    pub fn resolve_ball_pair(&self, a: &mut Ball, b: &mut Ball) -> bool {
        let result = ball_ball_collision(a.pos, a.radius, b.pos, b.radius);
        if !result.hit {
            return false;
        }

        let n = result.normal;
        let push = n * (result.penetration * 0.5);
        a.pos -= push;
        b.pos += push;

        let approach = (b.vel - a.vel).dot(n);
        if approach < 0.0 {
            let impulse = 2.0 * approach / (a.mass + b.mass) * self.elasticity;
            a.vel += n * (impulse * b.mass);
            b.vel -= n * (impulse * a.mass);
        }
        true
    }

    /// Dispatch on obstacle kind
    pub fn resolve_obstacle(&self, ball: &mut Ball, obstacle: &Obstacle, contacts: &mut Vec<Contact>) {
        match obstacle.kind {
            ObstacleKind::Platform => {
                self.resolve_platform(ball, obstacle);
            }
            ObstacleKind::Ramp => {
                self.resolve_ramp(ball, obstacle);
            }
            ObstacleKind::Spring => {
                if self.resolve_spring(ball, obstacle) {
                    contacts.push(Contact::Spring {
                        ball: ball.id,
                        obstacle: obstacle.id,
                        pos: ball.pos,
                    });
                }
            }
        }
    }

    /// Push out, bounce, and slow rolling on flat tops and bottoms
    pub fn resolve_platform(&self, ball: &mut Ball, platform: &Obstacle) -> bool {
        let result = ball_box_collision(ball.pos, ball.radius, platform);
        if !result.hit {
            return false;
        }

        ball.pos += result.normal * result.penetration;

        if ball.vel.dot(result.normal) < 0.0 {
            ball.vel = bounce_velocity(ball.vel, result.normal, self.elasticity);
            if result.normal.y.abs() > 0.9 {
                ball.vel.x *= self.friction;
            }
        }
        true
    }

    /// Push out along the slope normal, bounce, and bleed tangential speed
    pub fn resolve_ramp(&self, ball: &mut Ball, ramp: &Obstacle) -> bool {
        let result = ball_ramp_collision(ball.pos, ball.radius, ramp);
        if !result.hit {
            return false;
        }

        let n = result.normal;
        ball.pos += n * result.penetration;

        if ball.vel.dot(n) < 0.0 {
            ball.vel = bounce_velocity(ball.vel, n, self.elasticity);
            let tangent = Vec2::new(-n.y, n.x);
            let along = ball.vel.dot(tangent);
            ball.vel -= tangent * (along * (1.0 - self.friction));
        }
        true
    }

    /// Kick the ball upward regardless of how it arrived
    pub fn resolve_spring(&self, ball: &mut Ball, spring: &Obstacle) -> bool {
        let result = ball_disc_collision(ball.pos, ball.radius, spring.pos, spring.size.x / 2.0);
        if !result.hit {
            return false;
        }

        ball.pos += result.normal * result.penetration;
        let kick = (ball.vel.y.abs() * self.spring_force * self.elasticity).max(self.spring_min_kick);
        ball.vel.y = -kick;
        true
    }

    /// Side walls and ceiling; the bottom is open
    pub fn constrain_to_walls(&self, ball: &mut Ball, canvas_width: f32) {
        if ball.pos.x - ball.radius < 0.0 {
            ball.pos.x = ball.radius;
            ball.vel.x = ball.vel.x.abs() * self.elasticity;
        } else if ball.pos.x + ball.radius > canvas_width {
            ball.pos.x = canvas_width - ball.radius;
            ball.vel.x = -ball.vel.x.abs() * self.elasticity;
        }

        if ball.pos.y - ball.radius < 0.0 {
            ball.pos.y = ball.radius;
            ball.vel.y = ball.vel.y.abs() * self.elasticity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CANVAS_WIDTH, FRAME_MS};
    use proptest::prelude::*;

    fn engine() -> PhysicsEngine {
        PhysicsEngine::new(PhysicsTuning::default(), 9.8)
    }

    fn ball_at(id: u32, x: f32, y: f32) -> Ball {
        Ball::new(id, Vec2::new(x, y), BallColor::Red)
    }

    #[test]
    fn test_integrate_one_frame() {
        let physics = engine();
        let mut ball = ball_at(1, 100.0, 100.0);
        physics.integrate(&mut ball, 1.0 / 60.0);
        // One 60 fps frame adds exactly `gravity`, then damping
        assert!((ball.vel.y - 9.8 * 0.99).abs() < 1e-4);
        assert!(ball.pos.y > 100.0);
        assert_eq!(ball.pos.x, 100.0);
    }

    #[test]
    fn test_balls_separate_and_bounce() {
        let physics = engine();
        let mut a = ball_at(1, 0.0, 0.0);
        let mut b = ball_at(2, 30.0, 0.0);
        a.vel = Vec2::new(10.0, 0.0);
        b.vel = Vec2::new(-10.0, 0.0);

        assert!(physics.resolve_ball_pair(&mut a, &mut b));
        assert!((a.pos.x + 5.0).abs() < 1e-4);
        assert!((b.pos.x - 35.0).abs() < 1e-4);
        assert!((a.vel.x + 6.0).abs() < 1e-4);
        assert!((b.vel.x - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_separating_balls_keep_velocity() {
        let physics = engine();
        let mut a = ball_at(1, 0.0, 0.0);
        let mut b = ball_at(2, 30.0, 0.0);
        a.vel = Vec2::new(-10.0, 0.0);
        b.vel = Vec2::new(10.0, 0.0);

        assert!(physics.resolve_ball_pair(&mut a, &mut b));
        assert_eq!(a.vel.x, -10.0);
        assert_eq!(b.vel.x, 10.0);
    }

    #[test]
    fn test_coincident_balls_do_not_produce_nan() {
        let physics = engine();
        let mut a = ball_at(1, 100.0, 100.0);
        let mut b = ball_at(2, 100.0, 100.0);
        b.vel = Vec2::new(0.0, 5.0);
        physics.resolve_ball_pair(&mut a, &mut b);
        assert!(a.pos.is_finite() && b.pos.is_finite());
        assert!(a.vel.is_finite() && b.vel.is_finite());
        assert!((b.pos.x - a.pos.x - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_platform_bounce_with_friction() {
        let physics = engine();
        let platform = Obstacle::new(10, ObstacleKind::Platform, Vec2::new(100.0, 100.0));
        let mut ball = ball_at(1, 100.0, 75.0);
        ball.vel = Vec2::new(50.0, 100.0);

        assert!(physics.resolve_platform(&mut ball, &platform));
        assert!((ball.pos.y - 70.0).abs() < 1e-4);
        assert!((ball.vel.y + 60.0).abs() < 1e-3);
        assert!((ball.vel.x - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_platform_side_hit_keeps_tangential_speed() {
        let physics = engine();
        let platform = Obstacle::new(10, ObstacleKind::Platform, Vec2::new(100.0, 100.0));
        // Right face is at x = 150
        let mut ball = ball_at(1, 165.0, 100.0);
        ball.vel = Vec2::new(-100.0, 30.0);

        assert!(physics.resolve_platform(&mut ball, &platform));
        assert!((ball.pos.x - 170.0).abs() < 1e-4);
        assert!((ball.vel.x - 60.0).abs() < 1e-3);
        // Side contact: no friction on the vertical component
        assert!((ball.vel.y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_ramp_bleeds_tangential_speed() {
        let physics = engine();
        let ramp = Obstacle::new(10, ObstacleKind::Ramp, Vec2::new(200.0, 200.0));
        // Unit normal and tangent of the 100x50 slope
        let normal = Vec2::new(50.0, -100.0).normalize();
        let tangent = Vec2::new(-normal.y, normal.x);
        let mut ball = ball_at(1, 200.0 + normal.x * 15.0, 200.0 + normal.y * 15.0);
        ball.vel = normal * -100.0 + tangent * 50.0;

        assert!(physics.resolve_ramp(&mut ball, &ramp));
        // 100 in, 60 out along the normal; friction keeps 80% along the slope
        assert!((ball.vel.dot(normal) - 60.0).abs() < 1e-2);
        assert!((ball.vel.dot(tangent) - 40.0).abs() < 1e-2);
    }

    #[test]
    fn test_ramp_deflects_falling_ball() {
        let physics = engine();
        let ramp = Obstacle::new(10, ObstacleKind::Ramp, Vec2::new(200.0, 200.0));
        let mut ball = ball_at(1, 205.0, 185.0);
        ball.vel = Vec2::new(0.0, 200.0);

        assert!(physics.resolve_ramp(&mut ball, &ramp));
        // Pushed clear of the slope, now heading up-right off a down-right slope
        let again = ball_ramp_collision(ball.pos, ball.radius, &ramp);
        assert!(!again.hit || again.penetration < 1e-3);
        assert!(ball.vel.x > 0.0);
        assert!(ball.vel.y < 200.0);
    }

    #[test]
    fn test_spring_kicks_upward() {
        let physics = engine();
        let spring = Obstacle::new(10, ObstacleKind::Spring, Vec2::new(100.0, 300.0));
        let mut ball = ball_at(1, 100.0, 260.0);
        ball.vel = Vec2::new(0.0, 200.0);

        assert!(physics.resolve_spring(&mut ball, &spring));
        assert!((ball.vel.y + 200.0 * 1.5 * 0.8).abs() < 1e-3);
        assert!(ball.pos.distance(spring.pos) >= 50.0 - 1e-3);
    }

    #[test]
    fn test_spring_kicks_resting_ball() {
        let physics = engine();
        let spring = Obstacle::new(10, ObstacleKind::Spring, Vec2::new(100.0, 300.0));
        let mut ball = ball_at(1, 100.0, 260.0);
        assert!(physics.resolve_spring(&mut ball, &spring));
        assert!(ball.vel.y < 0.0);
        assert_eq!(ball.vel.y, -PhysicsTuning::default().spring_min_kick);
    }

    #[test]
    fn test_setters_change_response() {
        let mut physics = engine();
        physics.set_gravity(15.0);
        physics.set_damping(0.5);
        physics.set_friction(0.5);
        physics.set_elasticity(0.6);
        physics.set_spring_force(2.0);

        let mut ball = ball_at(1, 100.0, 100.0);
        physics.integrate(&mut ball, 1.0 / 60.0);
        assert!((ball.vel.y - 7.5).abs() < 1e-4);

        let platform = Obstacle::new(10, ObstacleKind::Platform, Vec2::new(100.0, 100.0));
        let mut ball = ball_at(2, 100.0, 75.0);
        ball.vel = Vec2::new(50.0, 100.0);
        assert!(physics.resolve_platform(&mut ball, &platform));
        assert!((ball.vel.y + 20.0).abs() < 1e-3);
        assert!((ball.vel.x - 25.0).abs() < 1e-3);

        let spring = Obstacle::new(11, ObstacleKind::Spring, Vec2::new(100.0, 300.0));
        let mut ball = ball_at(3, 100.0, 260.0);
        ball.vel = Vec2::new(0.0, 200.0);
        assert!(physics.resolve_spring(&mut ball, &spring));
        assert!((ball.vel.y + 240.0).abs() < 1e-3);
    }

    #[test]
    fn test_collector_flags_ball_once() {
        let physics = engine();
        let collectors = [
            Collector {
                id: 20,
                pos: Vec2::new(100.0, 500.0),
                radius: 50.0,
                color: BallColor::Red,
            },
            Collector {
                id: 21,
                pos: Vec2::new(110.0, 500.0),
                radius: 50.0,
                color: BallColor::Blue,
            },
        ];
        let mut balls = vec![ball_at(1, 105.0, 500.0)];
        let mut contacts = Vec::new();

        physics.resolve_collisions(&mut balls, &[], &collectors, &mut contacts);
        physics.resolve_collisions(&mut balls, &[], &collectors, &mut contacts);

        assert!(balls[0].removed);
        assert_eq!(contacts.len(), 1);
        assert!(matches!(
            contacts[0],
            Contact::Collected {
                ball: 1,
                collector: 20,
                matched: true,
                ..
            }
        ));
    }

    #[test]
    fn test_walls() {
        let physics = engine();
        let mut ball = ball_at(1, 5.0, 5.0);
        ball.vel = Vec2::new(-100.0, -100.0);
        physics.constrain_to_walls(&mut ball, CANVAS_WIDTH);
        assert_eq!(ball.pos, Vec2::new(20.0, 20.0));
        assert!((ball.vel.x - 80.0).abs() < 1e-4);
        assert!((ball.vel.y - 80.0).abs() < 1e-4);

        let mut ball = ball_at(2, CANVAS_WIDTH, 300.0);
        ball.vel = Vec2::new(100.0, 0.0);
        physics.constrain_to_walls(&mut ball, CANVAS_WIDTH);
        assert_eq!(ball.pos.x, CANVAS_WIDTH - 20.0);
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn test_update_dispatches_each_obstacle_kind() {
        let physics = engine();
        let obstacles = [
            Obstacle::new(10, ObstacleKind::Platform, Vec2::new(100.0, 100.0)),
            Obstacle::new(11, ObstacleKind::Ramp, Vec2::new(300.0, 100.0)),
            Obstacle::new(12, ObstacleKind::Spring, Vec2::new(500.0, 100.0)),
        ];
        let mut balls = vec![
            ball_at(1, 100.0, 75.0),
            ball_at(2, 300.0 + 6.7, 100.0 - 13.4),
            ball_at(3, 500.0, 60.0),
        ];
        for ball in &mut balls {
            ball.vel = Vec2::new(0.0, 100.0);
        }
        let mut contacts = Vec::new();
        physics.update(&mut balls, &obstacles, &[], CANVAS_WIDTH, FRAME_MS, &mut contacts);

        assert!(balls.iter().all(|b| b.vel.y < 100.0));
        assert!(balls[0].vel.y < 0.0);
        assert!(balls[2].vel.y < 0.0);
        assert_eq!(
            contacts,
            vec![Contact::Spring {
                ball: 3,
                obstacle: 12,
                pos: balls[2].pos,
            }]
        );
    }

    #[test]
    fn test_no_floor() {
        let physics = engine();
        let mut balls = vec![ball_at(1, 400.0, 590.0)];
        let mut contacts = Vec::new();
        for _ in 0..60 {
            physics.update(&mut balls, &[], &[], CANVAS_WIDTH, FRAME_MS, &mut contacts);
        }
        assert!(balls[0].pos.y > 700.0);
    }

    proptest! {
        #[test]
        fn walls_keep_balls_inside(
            x in -500.0f32..1500.0,
            y in -500.0f32..600.0,
            vx in -1000.0f32..1000.0,
            vy in -1000.0f32..1000.0,
        ) {
            let physics = engine();
            let mut balls = vec![ball_at(1, x, y)];
            balls[0].vel = Vec2::new(vx, vy);
            let mut contacts = Vec::new();
            physics.update(&mut balls, &[], &[], CANVAS_WIDTH, FRAME_MS, &mut contacts);

            let ball = &balls[0];
            prop_assert!(ball.pos.x >= ball.radius);
            prop_assert!(ball.pos.x <= CANVAS_WIDTH - ball.radius);
            prop_assert!(ball.pos.y >= ball.radius);
        }

        #[test]
        fn spring_always_sends_ball_up(vy in -2000.0f32..2000.0, dx in -30.0f32..30.0) {
            let physics = engine();
            let spring = Obstacle::new(10, ObstacleKind::Spring, Vec2::new(300.0, 300.0));
            let mut ball = ball_at(1, 300.0 + dx, 290.0);
            ball.vel.y = vy;
            prop_assert!(physics.resolve_spring(&mut ball, &spring));
            prop_assert!(ball.vel.y < 0.0);
        }
    }
}
