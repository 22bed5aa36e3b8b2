//! AI difficulty tiers and their tuning tables

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Upper bound on the angle grid, a tenth of a degree apart over a full turn
pub const MAX_ANGLE_VALUES: usize = 3600;

/// Named AI difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Coarse search, wide selection, large aim error
    Easy,
    /// Balanced
    Medium,
    /// Fine search, almost always plays the best shot
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

/// Weights for each term of the shot score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Bonus for scoring in the target goal
    pub goal: f32,
    /// Added when the shot ends in our own goal (negative)
    pub own_goal: f32,
    /// Reward for finishing near the target goal mouth
    pub proximity: f32,
    /// Reward for finishing far from our own goal mouth
    pub safety: f32,
    /// Reward for finishing near the field center
    pub position: f32,
}

/// How the selector picks from the ranked candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// 40%: better half, otherwise top 5
    Easy,
    /// 20%: top 5, otherwise top 3
    Medium,
    /// 90%: best shot, otherwise top 2
    Hard,
}

/// Maximum humanization applied to the chosen shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorMagnitude {
    pub angle_degrees: f32,
    /// Fraction of full power
    pub power_fraction: f32,
}

/// Complete tuning for one AI tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub tier: Difficulty,
    pub angle_step_degrees: f32,
    /// Ordered power fractions tried at every angle
    pub power_levels: Vec<f32>,
    pub scoring_weights: ScoringWeights,
    /// Whether the score-differential adjustment is applied
    pub adaptive_scoring: bool,
    pub selection_policy: SelectionPolicy,
    pub error_magnitude: ErrorMagnitude,
}

impl DifficultyProfile {
    pub fn for_tier(tier: Difficulty) -> Self {
        match tier {
            Difficulty::Easy => Self {
                tier,
                angle_step_degrees: 15.0,
                power_levels: vec![0.4, 0.7, 1.0],
                scoring_weights: ScoringWeights {
                    goal: 100.0,
                    own_goal: -150.0,
                    proximity: 20.0,
                    safety: 10.0,
                    position: 5.0,
                },
                adaptive_scoring: false,
                selection_policy: SelectionPolicy::Easy,
                error_magnitude: ErrorMagnitude {
                    angle_degrees: 8.0,
                    power_fraction: 0.15,
                },
            },
            Difficulty::Medium => Self {
                tier,
                angle_step_degrees: 10.0,
                power_levels: vec![0.3, 0.5, 0.7, 0.9, 1.0],
                scoring_weights: ScoringWeights {
                    goal: 100.0,
                    own_goal: -200.0,
                    proximity: 30.0,
                    safety: 20.0,
                    position: 10.0,
                },
                adaptive_scoring: true,
                selection_policy: SelectionPolicy::Medium,
                error_magnitude: ErrorMagnitude {
                    angle_degrees: 4.0,
                    power_fraction: 0.08,
                },
            },
            Difficulty::Hard => Self {
                tier,
                angle_step_degrees: 5.0,
                power_levels: vec![0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0],
                scoring_weights: ScoringWeights {
                    goal: 100.0,
                    own_goal: -300.0,
                    proximity: 40.0,
                    safety: 30.0,
                    position: 10.0,
                },
                adaptive_scoring: true,
                selection_policy: SelectionPolicy::Hard,
                error_magnitude: ErrorMagnitude {
                    angle_degrees: 1.5,
                    power_fraction: 0.03,
                },
            },
        }
    }

    /// Number of (angle, power) pairs a full search evaluates
    pub fn combination_count(&self) -> usize {
        self.angle_values_degrees().len() * self.power_levels.len()
    }

    /// `0, step, 2*step, ...` strictly below 360 degrees, at most
    /// [`MAX_ANGLE_VALUES`] of them
    pub fn angle_values_degrees(&self) -> Vec<f32> {
        if !(self.angle_step_degrees > 0.0) {
            return Vec::new();
        }
        (0u32..)
            .map(|i| i as f32 * self.angle_step_degrees)
            .take_while(|deg| *deg < 360.0)
            .take(MAX_ANGLE_VALUES)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_grid_stops_below_full_turn() {
        let profile = DifficultyProfile::for_tier(Difficulty::Easy);
        let angles = profile.angle_values_degrees();
        assert_eq!(angles.len(), 24);
        assert_eq!(angles[0], 0.0);
        assert_eq!(*angles.last().unwrap(), 345.0);
        assert_eq!(profile.combination_count(), 72);
    }

    #[test]
    fn harder_tiers_search_finer_and_err_less() {
        let easy = DifficultyProfile::for_tier(Difficulty::Easy);
        let medium = DifficultyProfile::for_tier(Difficulty::Medium);
        let hard = DifficultyProfile::for_tier(Difficulty::Hard);
        assert!(easy.combination_count() < medium.combination_count());
        assert!(medium.combination_count() < hard.combination_count());
        assert!(hard.error_magnitude.angle_degrees < easy.error_magnitude.angle_degrees);
        assert!(!easy.adaptive_scoring && hard.adaptive_scoring);
    }

    #[test]
    fn degenerate_step_yields_no_angles() {
        let mut profile = DifficultyProfile::for_tier(Difficulty::Medium);
        profile.angle_step_degrees = 0.0;
        assert_eq!(profile.combination_count(), 0);
    }

    #[test]
    fn tiny_step_is_capped() {
        let mut profile = DifficultyProfile::for_tier(Difficulty::Hard);
        profile.angle_step_degrees = 1e-9;
        let angles = profile.angle_values_degrees();
        assert_eq!(angles.len(), MAX_ANGLE_VALUES);
        assert!(angles.iter().all(|deg| *deg < 360.0));
    }

    #[test]
    fn parses_tier_names() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("insane".parse::<Difficulty>().is_err());
    }
}
