//! Heuristic evaluation of a simulated shot

use serde::{Deserialize, Serialize};

use super::field::{FieldConfig, GoalSide};
use super::physics::SimulationResult;
use super::profile::{DifficultyProfile, ScoringWeights};

/// Score subtracted per peg hit; busy paths are hard to predict
pub const PEG_CHAOS_PENALTY: f32 = 1.5;
/// Weight boost per goal of score difference in adaptive scoring
pub const ADAPTIVE_STEP: f32 = 0.2;
/// Score differences beyond this no longer change the weights
pub const ADAPTIVE_MAX_LEAD: u32 = 3;

/// Current match score from the shooting actor's point of view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub own: u32,
    pub opponent: u32,
}

/// Pure scorer for simulation outcomes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotScorer {
    weights: ScoringWeights,
    adaptive: bool,
}

impl ShotScorer {
    pub fn new(weights: ScoringWeights, adaptive: bool) -> Self {
        Self { weights, adaptive }
    }

    pub fn for_profile(profile: &DifficultyProfile) -> Self {
        Self::new(profile.scoring_weights, profile.adaptive_scoring)
    }

    /// Proximity and safety weights after the score-differential adjustment
    pub fn effective_weights(&self, scores: ScoreSnapshot) -> (f32, f32) {
        let mut proximity = self.weights.proximity;
        let mut safety = self.weights.safety;
        if !self.adaptive {
            return (proximity, safety);
        }

        if scores.own < scores.opponent {
            let deficit = (scores.opponent - scores.own).min(ADAPTIVE_MAX_LEAD);
            proximity *= 1.0 + ADAPTIVE_STEP * deficit as f32;
        } else if scores.own > scores.opponent {
            let lead = (scores.own - scores.opponent).min(ADAPTIVE_MAX_LEAD);
            safety *= 1.0 + ADAPTIVE_STEP * lead as f32;
        }
        (proximity, safety)
    }

    /// Weighted score of one outcome; higher is better for the shooter
    pub fn score(
        &self,
        result: &SimulationResult,
        field: &FieldConfig,
        target: GoalSide,
        own: GoalSide,
        scores: ScoreSnapshot,
    ) -> f32 {
        let (proximity_weight, safety_weight) = self.effective_weights(scores);
        let mut total = 0.0;

        match result.goal {
            Some(side) if side == target => total += self.weights.goal,
            Some(side) if side == own => total += self.weights.own_goal,
            _ => {}
        }

        let end = result.final_position;
        let diagonal = field.diagonal();
        let to_target = end.distance(field.goal_mouth(target)) / diagonal;
        let from_own = end.distance(field.goal_mouth(own)) / diagonal;
        let from_center = end.distance(field.center()) / (diagonal / 2.0);

        total += proximity_weight * (1.0 - to_target);
        total += safety_weight * from_own;
        total += self.weights.position * (1.0 - from_center);
        total -= PEG_CHAOS_PENALTY * result.peg_collision_count() as f32;

        total
    }
}
