//! Field geometry and the preset field catalog

use std::str::FromStr;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Which goal a shot ends in (or which goal an actor attacks/defends)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalSide {
    Left,
    Right,
}

impl GoalSide {
    pub fn opposite(self) -> Self {
        match self {
            GoalSide::Left => GoalSide::Right,
            GoalSide::Right => GoalSide::Left,
        }
    }
}

/// A static circular obstacle. All pegs on a field share one radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub position: Vec2,
}

impl Peg {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
        }
    }
}

/// Immutable playing field description, shared by every shot in a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field width (x runs 0..width, left goal at x = 0)
    pub width: f32,
    /// Field height (y runs 0..height)
    pub height: f32,
    /// Vertical size of each goal mouth, centered on the side walls
    pub goal_width: f32,
    /// How far inside the field the scoring line sits
    pub goal_depth: f32,
    pub pegs: Vec<Peg>,
    pub peg_radius: f32,
    pub ball_radius: f32,
    /// Per-frame velocity multiplier in (0, 1]
    pub friction: f32,
    pub wall_restitution: f32,
    pub peg_restitution: f32,
    /// Launch speed (units/s) of a full-power shot
    pub max_shot_power: f32,
    pub ball_start: Vec2,
}

pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
pub const DEFAULT_FIELD_HEIGHT: f32 = 480.0;

impl FieldConfig {
    /// Standard dimensions and physics with no pegs
    pub fn empty() -> Self {
        Self {
            width: DEFAULT_FIELD_WIDTH,
            height: DEFAULT_FIELD_HEIGHT,
            goal_width: 140.0,
            goal_depth: 18.0,
            pegs: Vec::new(),
            peg_radius: 12.0,
            ball_radius: 10.0,
            friction: 0.985,
            wall_restitution: 0.75,
            peg_restitution: 0.85,
            max_shot_power: 900.0,
            ball_start: Vec2::new(DEFAULT_FIELD_WIDTH / 2.0, DEFAULT_FIELD_HEIGHT / 2.0),
        }
    }

    /// Build a validated field from one of the preset layouts
    pub fn from_layout(layout: FieldLayout, seed: u64) -> Result<Self, FieldError> {
        let mut field = Self::empty();
        field.pegs = match layout {
            FieldLayout::Classic => field.classic_pegs(),
            FieldLayout::Diamond => field.diamond_pegs(),
            FieldLayout::Scattered => field.scattered_pegs(seed),
        };
        field.validate()?;
        Ok(field)
    }

    /// Upper edge (smaller y) of the goal mouth
    pub fn goal_top(&self) -> f32 {
        (self.height - self.goal_width) / 2.0
    }

    /// Lower edge (larger y) of the goal mouth
    pub fn goal_bottom(&self) -> f32 {
        (self.height + self.goal_width) / 2.0
    }

    /// True when `y` lies strictly inside the goal mouth
    pub fn in_goal_span(&self, y: f32) -> bool {
        y > self.goal_top() && y < self.goal_bottom()
    }

    /// Center of a goal mouth on its side wall
    pub fn goal_mouth(&self, side: GoalSide) -> Vec2 {
        match side {
            GoalSide::Left => Vec2::new(0.0, self.height / 2.0),
            GoalSide::Right => Vec2::new(self.width, self.height / 2.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn diagonal(&self) -> f32 {
        Vec2::new(self.width, self.height).length()
    }

    /// Check the geometry invariants the simulation relies on
    pub fn validate(&self) -> Result<(), FieldError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(FieldError::Dimensions);
        }
        if !(self.goal_width > 0.0 && self.goal_width < self.height) {
            return Err(FieldError::GoalSpan {
                goal_width: self.goal_width,
                height: self.height,
            });
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(FieldError::Friction(self.friction));
        }
        if !(self.ball_radius > 0.0 && self.peg_radius > 0.0 && self.max_shot_power > 0.0) {
            return Err(FieldError::Dimensions);
        }
        if !self.contains(self.ball_start) {
            return Err(FieldError::StartOutside);
        }
        for (index, peg) in self.pegs.iter().enumerate() {
            if !peg.position.is_finite() || !self.contains(peg.position) {
                return Err(FieldError::PegOutside(index));
            }
            if self.blocks_goal_mouth(peg.position) {
                return Err(FieldError::PegBlocksGoal(index));
            }
        }
        Ok(())
    }

    fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// A peg must leave the scoring strip in front of either goal clear
    fn blocks_goal_mouth(&self, position: Vec2) -> bool {
        let reach = self.goal_depth + self.peg_radius + self.ball_radius;
        let near_side = position.x < reach || position.x > self.width - reach;
        let in_mouth = position.y + self.peg_radius > self.goal_top()
            && position.y - self.peg_radius < self.goal_bottom();
        near_side && in_mouth
    }

    /// A peg needs a ball-width gap around the kickoff spot
    fn clear_of_start(&self, position: Vec2) -> bool {
        position.distance(self.ball_start) > 2.0 * (self.ball_radius + self.peg_radius)
    }

    fn classic_pegs(&self) -> Vec<Peg> {
        let spacing = 80.0;
        let mut pegs = Vec::new();
        for row in 0..5 {
            let y = 80.0 + row as f32 * spacing;
            let offset = if row % 2 == 1 { spacing / 2.0 } else { 0.0 };
            for col in 0..6 {
                let x = 180.0 + offset + col as f32 * spacing;
                let peg = Peg::new(x, y);
                if self.clear_of_start(peg.position) && !self.blocks_goal_mouth(peg.position) {
                    pegs.push(peg);
                }
            }
        }
        pegs
    }

    fn diamond_pegs(&self) -> Vec<Peg> {
        let center = self.center();
        let mut pegs = Vec::new();
        for (half_w, half_h) in [(110.0_f32, 80.0_f32), (220.0, 160.0)] {
            // Vertices then edge midpoints, walking clockwise
            let points = [
                Vec2::new(half_w, 0.0),
                Vec2::new(0.0, half_h),
                Vec2::new(-half_w, 0.0),
                Vec2::new(0.0, -half_h),
            ];
            for i in 0..points.len() {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                pegs.push(Peg { position: center + a });
                pegs.push(Peg {
                    position: center + (a + b) / 2.0,
                });
            }
        }
        pegs
    }

    fn scattered_pegs(&self, seed: u64) -> Vec<Peg> {
        const TARGET_PEGS: usize = 18;
        const MAX_ATTEMPTS: usize = 2_000;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let margin = self.goal_depth + self.peg_radius + self.ball_radius * 2.0;
        let min_gap = 2.0 * self.peg_radius + 2.0 * self.ball_radius;
        let mut pegs: Vec<Peg> = Vec::with_capacity(TARGET_PEGS);

        for _ in 0..MAX_ATTEMPTS {
            if pegs.len() == TARGET_PEGS {
                break;
            }
            let candidate = Vec2::new(
                rng.gen_range(margin..self.width - margin),
                rng.gen_range(self.peg_radius * 2.0..self.height - self.peg_radius * 2.0),
            );
            if !self.clear_of_start(candidate) || self.blocks_goal_mouth(candidate) {
                continue;
            }
            if pegs
                .iter()
                .any(|p| p.position.distance(candidate) < min_gap)
            {
                continue;
            }
            pegs.push(Peg {
                position: candidate,
            });
        }
        pegs
    }
}

/// Named peg arrangements served by the field catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldLayout {
    /// Staggered grid across the middle of the field
    Classic,
    /// Two nested diamonds around kickoff
    Diamond,
    /// Seeded random scatter
    Scattered,
}

impl FromStr for FieldLayout {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "diamond" => Ok(Self::Diamond),
            "scattered" => Ok(Self::Scattered),
            other => Err(FieldError::UnknownLayout(other.to_string())),
        }
    }
}

/// Field catalog errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FieldError {
    #[error("Field dimensions, radii and shot power must be positive")]
    Dimensions,

    #[error("Goal width {goal_width} must be positive and smaller than field height {height}")]
    GoalSpan { goal_width: f32, height: f32 },

    #[error("Friction {0} must lie in (0, 1]")]
    Friction(f32),

    #[error("Ball start position lies outside the field")]
    StartOutside,

    #[error("Peg {0} lies outside the field")]
    PegOutside(usize),

    #[error("Peg {0} overlaps a goal mouth")]
    PegBlocksGoal(usize),

    #[error("Unknown field layout: {0}")]
    UnknownLayout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_span_is_centered() {
        let field = FieldConfig::empty();
        assert!((field.goal_top() + field.goal_bottom() - field.height).abs() < 1e-4);
        assert!(field.in_goal_span(field.height / 2.0));
        assert!(!field.in_goal_span(field.goal_top()));
        assert!(!field.in_goal_span(field.goal_bottom()));
    }

    #[test]
    fn every_preset_validates() {
        for layout in [FieldLayout::Classic, FieldLayout::Diamond, FieldLayout::Scattered] {
            let field = FieldConfig::from_layout(layout, 7).unwrap();
            assert!(!field.pegs.is_empty(), "{layout:?} produced no pegs");
        }
    }

    #[test]
    fn scattered_layout_is_seeded() {
        let a = FieldConfig::from_layout(FieldLayout::Scattered, 42).unwrap();
        let b = FieldConfig::from_layout(FieldLayout::Scattered, 42).unwrap();
        let c = FieldConfig::from_layout(FieldLayout::Scattered, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.pegs, c.pegs);
    }

    #[test]
    fn rejects_peg_in_goal_mouth() {
        let mut field = FieldConfig::empty();
        field.pegs.push(Peg::new(10.0, field.height / 2.0));
        assert_eq!(field.validate(), Err(FieldError::PegBlocksGoal(0)));
    }

    #[test]
    fn rejects_goal_wider_than_field() {
        let mut field = FieldConfig::empty();
        field.goal_width = field.height;
        assert!(matches!(field.validate(), Err(FieldError::GoalSpan { .. })));
    }

    #[test]
    fn parses_layout_names() {
        assert_eq!("Diamond".parse::<FieldLayout>(), Ok(FieldLayout::Diamond));
        assert!("hexagon".parse::<FieldLayout>().is_err());
    }
}
