//! Exhaustive shot search over the (angle, power) grid

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::util::time::Timer;

use super::field::{FieldConfig, GoalSide};
use super::physics::{SimulationEngine, SimulationResult};
use super::profile::DifficultyProfile;
use super::scoring::{ScoreSnapshot, ShotScorer};
use super::Shot;

/// Combinations simulated between cooperative yields
pub const SEARCH_BATCH_SIZE: usize = 20;

/// One evaluated grid point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotCandidate {
    /// Radians
    pub angle: f32,
    pub power: f32,
    pub score: f32,
    pub result: SimulationResult,
}

impl ShotCandidate {
    pub fn shot(&self) -> Shot {
        Shot {
            angle: self.angle,
            power: self.power,
        }
    }
}

/// Grid search driver. Runs on the caller's task and yields to the
/// scheduler after every batch so a shared runtime stays responsive.
#[derive(Debug, Clone, Copy)]
pub struct ShotSearchPlanner {
    engine: SimulationEngine,
    batch_size: usize,
}

impl Default for ShotSearchPlanner {
    fn default() -> Self {
        Self::new(SimulationEngine::default())
    }
}

impl ShotSearchPlanner {
    pub fn new(engine: SimulationEngine) -> Self {
        Self {
            engine,
            batch_size: SEARCH_BATCH_SIZE,
        }
    }

    /// Simulate and score every combination, best first.
    ///
    /// Angles run `0, step, 2*step, ...` below 360 degrees in the outer loop
    /// and `profile.power_levels` in the inner loop. Equal scores keep that
    /// enumeration order.
    pub async fn evaluate_all_shots(
        &self,
        start: Vec2,
        field: &FieldConfig,
        scores: ScoreSnapshot,
        target: GoalSide,
        own: GoalSide,
        profile: &DifficultyProfile,
    ) -> Vec<ShotCandidate> {
        let timer = Timer::new();
        let scorer = ShotScorer::for_profile(profile);

        let combinations: Vec<(f32, f32)> = profile
            .angle_values_degrees()
            .into_iter()
            .flat_map(|deg| {
                profile
                    .power_levels
                    .iter()
                    .map(move |&power| (deg.to_radians(), power))
            })
            .collect();

        let mut candidates = Vec::with_capacity(combinations.len());
        for batch in combinations.chunks(self.batch_size) {
            for &(angle, power) in batch {
                match self.engine.simulate(field, start, angle, power) {
                    Ok(result) => {
                        let score = scorer.score(&result, field, target, own, scores);
                        candidates.push(ShotCandidate {
                            angle,
                            power,
                            score,
                            result,
                        });
                    }
                    Err(e) => {
                        warn!(angle, power, error = %e, "Skipping invalid search combination");
                    }
                }
            }
            tokio::task::yield_now().await;
        }

        // Stable sort keeps enumeration order among equal scores
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            tier = ?profile.tier,
            candidates = candidates.len(),
            best_score = candidates.first().map(|c| c.score),
            elapsed_ms = timer.elapsed_ms(),
            "Shot search complete"
        );

        candidates
    }
}
