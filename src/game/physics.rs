//! Ball physics and the deterministic shot simulation
//!
//! Both the authoritative match loop and any advisory/predictive caller go
//! through [`SimulationEngine::simulate`]; there is exactly one copy of the
//! integration and collision code.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::util::time::{frame_delta, MAX_SIMULATION_FRAMES};

use super::field::{FieldConfig, GoalSide};

/// Below this speed (units/s) the ball is considered at rest
pub const MIN_SPEED: f32 = 5.0;

/// One recorded ball position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub position: Vec2,
    /// Simulated seconds since the shot was taken
    pub time: f32,
}

/// Field boundary that was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallSide {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollisionKind {
    Peg { index: usize },
    Wall { side: WallSide },
}

/// A contact resolved during simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    #[serde(flatten)]
    pub kind: CollisionKind,
    /// Ball center after the contact was resolved
    pub position: Vec2,
    /// Index into the trajectory of the frame the contact happened on
    pub frame: u32,
}

impl CollisionEvent {
    pub fn peg_index(&self) -> Option<usize> {
        match self.kind {
            CollisionKind::Peg { index } => Some(index),
            CollisionKind::Wall { .. } => None,
        }
    }

    pub fn is_peg(&self) -> bool {
        self.peg_index().is_some()
    }
}

/// Why a simulation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Goal,
    Stopped,
    /// Frame cap reached; velocity forced to zero
    FrameCap,
}

/// Complete, immutable outcome of one shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Initial sample plus one sample per simulated frame
    pub trajectory: Vec<TrajectorySample>,
    pub collisions: Vec<CollisionEvent>,
    pub final_position: Vec2,
    pub goal: Option<GoalSide>,
    pub frame_count: u32,
    pub end_reason: EndReason,
}

impl SimulationResult {
    pub fn peg_collision_count(&self) -> usize {
        self.collisions.iter().filter(|c| c.is_peg()).count()
    }
}

/// Ball state while a shot is in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

impl BallState {
    pub fn launch(position: Vec2, radius: f32, angle: f32, speed: f32) -> Self {
        Self {
            position,
            velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
            radius,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    pub fn apply_friction(&mut self, friction: f32) {
        self.velocity *= friction;
    }
}

/// Rejected shot inputs
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ShotError {
    #[error("Shot angle must be finite, got {0}")]
    NonFiniteAngle(f32),

    #[error("Shot power must be finite, got {0}")]
    NonFinitePower(f32),

    #[error("Start position must be finite")]
    NonFiniteStart,
}

/// Clamp the ball against solid walls, reporting each wall it crossed.
/// The left and right walls are open while the ball is level with the goal.
pub fn resolve_walls(
    ball: &mut BallState,
    field: &FieldConfig,
    mut on_hit: impl FnMut(WallSide, Vec2),
) {
    let r = ball.radius;
    let in_mouth = field.in_goal_span(ball.position.y);

    if !in_mouth && ball.position.x - r < 0.0 {
        ball.position.x = r;
        if ball.velocity.x < 0.0 {
            ball.velocity.x = -ball.velocity.x * field.wall_restitution;
        }
        on_hit(WallSide::Left, ball.position);
    } else if !in_mouth && ball.position.x + r > field.width {
        ball.position.x = field.width - r;
        if ball.velocity.x > 0.0 {
            ball.velocity.x = -ball.velocity.x * field.wall_restitution;
        }
        on_hit(WallSide::Right, ball.position);
    }

    if ball.position.y - r < 0.0 {
        ball.position.y = r;
        if ball.velocity.y < 0.0 {
            ball.velocity.y = -ball.velocity.y * field.wall_restitution;
        }
        on_hit(WallSide::Top, ball.position);
    } else if ball.position.y + r > field.height {
        ball.position.y = field.height - r;
        if ball.velocity.y > 0.0 {
            ball.velocity.y = -ball.velocity.y * field.wall_restitution;
        }
        on_hit(WallSide::Bottom, ball.position);
    }
}

/// Which goal, if any, the ball center is currently inside
pub fn goal_crossed(ball: &BallState, field: &FieldConfig) -> Option<GoalSide> {
    if !field.in_goal_span(ball.position.y) {
        return None;
    }
    if ball.position.x < field.goal_depth {
        Some(GoalSide::Left)
    } else if ball.position.x > field.width - field.goal_depth {
        Some(GoalSide::Right)
    } else {
        None
    }
}

/// Bounce the ball off a single peg. Returns true if they overlapped.
pub fn resolve_peg(ball: &mut BallState, peg: Vec2, peg_radius: f32, restitution: f32) -> bool {
    let delta = ball.position - peg;
    let dist = delta.length();
    let min_dist = ball.radius + peg_radius;
    if dist >= min_dist || dist <= 0.0 {
        return false;
    }

    let normal = delta / dist;
    let approach = ball.velocity.dot(normal);
    if approach < 0.0 {
        ball.velocity -= normal * ((1.0 + restitution) * approach);
    }
    ball.position += normal * (min_dist - dist);
    true
}

/// Resolve every overlapping peg in list order, one after another.
/// A later peg sees the position left behind by earlier pushes.
pub fn resolve_pegs(ball: &mut BallState, field: &FieldConfig, mut on_hit: impl FnMut(usize, Vec2)) {
    for (index, peg) in field.pegs.iter().enumerate() {
        if resolve_peg(ball, peg.position, field.peg_radius, field.peg_restitution) {
            on_hit(index, ball.position);
        }
    }
}

/// Fixed-timestep shot simulator
#[derive(Debug, Clone, Copy)]
pub struct SimulationEngine {
    dt: f32,
    max_frames: u32,
    min_speed: f32,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self {
            dt: frame_delta(),
            max_frames: MAX_SIMULATION_FRAMES,
            min_speed: MIN_SPEED,
        }
    }
}

impl SimulationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    /// Simulate one shot to completion.
    ///
    /// `angle` is in radians, `power` is a fraction of the field's maximum
    /// shot power. Non-finite input is rejected; finite power outside
    /// `[0, 1]` is clamped.
    pub fn simulate(
        &self,
        field: &FieldConfig,
        start: Vec2,
        angle: f32,
        power: f32,
    ) -> Result<SimulationResult, ShotError> {
        if !angle.is_finite() {
            return Err(ShotError::NonFiniteAngle(angle));
        }
        if !power.is_finite() {
            return Err(ShotError::NonFinitePower(power));
        }
        if !start.is_finite() {
            return Err(ShotError::NonFiniteStart);
        }
        let power = power.clamp(0.0, 1.0);

        let mut ball = BallState::launch(
            start,
            field.ball_radius,
            angle,
            power * field.max_shot_power,
        );
        let mut trajectory = Vec::with_capacity(64);
        trajectory.push(TrajectorySample {
            position: start,
            time: 0.0,
        });
        let mut collisions = Vec::new();
        let mut goal = None;
        let mut end_reason = EndReason::FrameCap;
        let mut frame_count = 0;

        for frame in 1..=self.max_frames {
            frame_count = frame;
            let time = frame as f32 * self.dt;

            ball.integrate(self.dt);

            resolve_walls(&mut ball, field, |side, position| {
                collisions.push(CollisionEvent {
                    kind: CollisionKind::Wall { side },
                    position,
                    frame,
                });
            });

            if let Some(side) = goal_crossed(&ball, field) {
                ball.apply_friction(field.friction);
                trajectory.push(TrajectorySample {
                    position: ball.position,
                    time,
                });
                goal = Some(side);
                end_reason = EndReason::Goal;
                break;
            }

            resolve_pegs(&mut ball, field, |index, position| {
                collisions.push(CollisionEvent {
                    kind: CollisionKind::Peg { index },
                    position,
                    frame,
                });
            });

            ball.apply_friction(field.friction);

            let stopped = ball.speed() < self.min_speed;
            if stopped {
                ball.velocity = Vec2::ZERO;
            }
            trajectory.push(TrajectorySample {
                position: ball.position,
                time,
            });
            if stopped {
                end_reason = EndReason::Stopped;
                break;
            }
        }

        if end_reason == EndReason::FrameCap {
            ball.velocity = Vec2::ZERO;
        }

        Ok(SimulationResult {
            trajectory,
            collisions,
            final_position: ball.position,
            goal,
            frame_count,
            end_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::field::{FieldLayout, Peg};
    use std::f32::consts::{FRAC_PI_2, PI};

    fn open_field() -> FieldConfig {
        FieldConfig::empty()
    }

    #[test]
    fn simulation_is_deterministic() {
        let field = FieldConfig::from_layout(FieldLayout::Classic, 1).unwrap();
        let engine = SimulationEngine::new();
        for &(angle, power) in &[(0.3, 1.0), (2.1, 0.6), (4.4, 0.85)] {
            let a = engine.simulate(&field, field.ball_start, angle, power).unwrap();
            let b = engine.simulate(&field, field.ball_start, angle, power).unwrap();
            assert_eq!(a, b);
            assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
        }
    }

    #[test]
    fn straight_shot_scores_right_on_open_field() {
        let mut field = open_field();
        field.goal_width = field.height;
        let engine = SimulationEngine::new();

        let result = engine.simulate(&field, field.center(), 0.0, 1.0).unwrap();

        assert_eq!(result.goal, Some(GoalSide::Right));
        assert_eq!(result.end_reason, EndReason::Goal);
        assert!(result.frame_count < 60);
        assert_eq!(result.trajectory.len() as u32, result.frame_count + 1);
        for pair in result.trajectory.windows(2) {
            assert!(pair[1].position.x >= pair[0].position.x);
        }
    }

    #[test]
    fn shot_into_left_mouth_scores_left() {
        let field = open_field();
        let engine = SimulationEngine::new();

        let result = engine.simulate(&field, field.center(), PI, 1.0).unwrap();

        assert_eq!(result.goal, Some(GoalSide::Left));
        let last = result.trajectory.last().unwrap().position;
        assert!(last.x < field.goal_depth);
        assert!(field.in_goal_span(last.y));
    }

    #[test]
    fn head_on_elastic_peg_bounce_negates_velocity() {
        let mut ball = BallState {
            position: Vec2::new(80.0, 100.0),
            velocity: Vec2::new(450.0, 0.0),
            radius: 10.0,
        };
        let before = ball.velocity;

        let hit = resolve_peg(&mut ball, Vec2::new(100.0, 100.0), 12.0, 1.0);

        assert!(hit);
        assert_eq!(ball.velocity, -before);
        assert_eq!(ball.position, Vec2::new(78.0, 100.0));
    }

    #[test]
    fn head_on_peg_sends_ball_straight_back() {
        let mut field = open_field();
        field.friction = 1.0;
        field.peg_restitution = 1.0;
        field.pegs = vec![Peg::new(600.0, field.height / 2.0)];
        let engine = SimulationEngine::new();

        let result = engine.simulate(&field, field.center(), 0.0, 0.5).unwrap();

        let first_hit = result
            .collisions
            .iter()
            .find(|c| c.is_peg())
            .expect("ball should reach the peg");
        let hit_frame = first_hit.frame as usize;
        let step_in = result.trajectory[1].position.x - result.trajectory[0].position.x;
        let step_out = result.trajectory[hit_frame + 2].position.x
            - result.trajectory[hit_frame + 1].position.x;
        assert!((step_out + step_in).abs() < 1e-3);
        for sample in &result.trajectory {
            assert_eq!(sample.position.y, field.height / 2.0);
        }
        assert_eq!(result.goal, Some(GoalSide::Left));
    }

    #[test]
    fn walls_contain_ball_outside_goal_mouth() {
        let field = FieldConfig::from_layout(FieldLayout::Classic, 3).unwrap();
        let engine = SimulationEngine::new();
        for step in 0..36 {
            let angle = (step as f32 * 10.0).to_radians();
            let result = engine.simulate(&field, field.ball_start, angle, 1.0).unwrap();
            for sample in &result.trajectory {
                let p = sample.position;
                assert!(p.y >= 0.0 && p.y <= field.height);
                if !field.in_goal_span(p.y) {
                    assert!(p.x >= 0.0 && p.x <= field.width);
                }
            }
        }
    }

    #[test]
    fn wall_bounce_scales_perpendicular_velocity() {
        let field = open_field();
        let mut ball = BallState {
            position: Vec2::new(300.0, 5.0),
            velocity: Vec2::new(100.0, -200.0),
            radius: 10.0,
        };
        let mut hits = Vec::new();

        resolve_walls(&mut ball, &field, |side, _| hits.push(side));

        assert_eq!(hits, vec![WallSide::Top]);
        assert_eq!(ball.position.y, 10.0);
        assert_eq!(ball.velocity, Vec2::new(100.0, 200.0 * field.wall_restitution));
    }

    #[test]
    fn side_wall_is_open_inside_goal_span() {
        let field = open_field();
        let mut ball = BallState {
            position: Vec2::new(5.0, field.height / 2.0),
            velocity: Vec2::new(-100.0, 0.0),
            radius: 10.0,
        };
        let mut hits = 0;

        resolve_walls(&mut ball, &field, |_, _| hits += 1);

        assert_eq!(hits, 0);
        assert_eq!(goal_crossed(&ball, &field), Some(GoalSide::Left));
    }

    #[test]
    fn friction_never_speeds_ball_up() {
        let field = open_field();
        let engine = SimulationEngine::new();

        let result = engine.simulate(&field, field.center(), 0.0, 0.2).unwrap();

        assert_eq!(result.end_reason, EndReason::Stopped);
        assert!(result.collisions.is_empty());
        let steps: Vec<f32> = result
            .trajectory
            .windows(2)
            .map(|pair| pair[1].position.distance(pair[0].position))
            .collect();
        for pair in steps.windows(2) {
            assert!(pair[1] <= pair[0]);
        }

        let mut ball = BallState::launch(Vec2::ZERO, 10.0, 1.0, 300.0);
        let before = ball.speed();
        ball.apply_friction(field.friction);
        assert!(ball.speed() <= before);
    }

    #[test]
    fn frame_cap_forces_stop() {
        let mut field = open_field();
        field.friction = 1.0;
        field.wall_restitution = 1.0;
        let engine = SimulationEngine::new();

        let result = engine.simulate(&field, field.center(), FRAC_PI_2, 1.0).unwrap();

        assert_eq!(result.end_reason, EndReason::FrameCap);
        assert_eq!(result.frame_count, engine.max_frames());
        assert_eq!(result.trajectory.len(), engine.max_frames() as usize + 1);
        assert!(result.goal.is_none());
    }

    #[test]
    fn zero_power_stops_on_first_frame() {
        let field = open_field();
        let result = SimulationEngine::new()
            .simulate(&field, field.center(), 1.0, 0.0)
            .unwrap();
        assert_eq!(result.frame_count, 1);
        assert_eq!(result.end_reason, EndReason::Stopped);
        assert_eq!(result.final_position, field.center());
    }

    #[test]
    fn overlapping_pegs_resolve_in_list_order() {
        let mut field = open_field();
        let upper = Peg::new(120.0, 95.0);
        let lower = Peg::new(120.0, 105.0);
        let start = BallState {
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::new(10.0, 0.0),
            radius: 10.0,
        };

        field.pegs = vec![upper, lower];
        let mut forward = start;
        let mut order = Vec::new();
        resolve_pegs(&mut forward, &field, |index, _| order.push(index));
        assert_eq!(order, vec![0, 1]);

        field.pegs = vec![lower, upper];
        let mut reversed = start;
        resolve_pegs(&mut reversed, &field, |_, _| {});

        assert!(forward.position.y > 100.0);
        assert!(reversed.position.y < 100.0);
    }

    #[test]
    fn rejects_non_finite_input_and_clamps_power() {
        let field = open_field();
        let engine = SimulationEngine::new();
        assert!(matches!(
            engine.simulate(&field, field.center(), f32::NAN, 0.5),
            Err(ShotError::NonFiniteAngle(_))
        ));
        assert!(matches!(
            engine.simulate(&field, field.center(), 0.0, f32::INFINITY),
            Err(ShotError::NonFinitePower(_))
        ));

        let over = engine.simulate(&field, field.center(), 0.7, 1.5).unwrap();
        let full = engine.simulate(&field, field.center(), 0.7, 1.0).unwrap();
        assert_eq!(over, full);
    }
}
