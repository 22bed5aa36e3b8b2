//! AI opponent: search, pick, then humanize

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::field::{FieldConfig, GoalSide};
use super::humanize::ErrorInjector;
use super::physics::SimulationEngine;
use super::planner::{ShotCandidate, ShotSearchPlanner};
use super::profile::DifficultyProfile;
use super::scoring::ScoreSnapshot;
use super::selection::ShotSelector;
use super::Shot;

/// A computer-controlled player.
///
/// `plan_shot` takes `&mut self`, so one actor can never have two searches
/// in flight at once.
#[derive(Debug, Clone)]
pub struct AiPlayer {
    own_goal: GoalSide,
    profile: DifficultyProfile,
    planner: ShotSearchPlanner,
    selector: ShotSelector,
    injector: ErrorInjector,
}

impl AiPlayer {
    pub fn new(
        own_goal: GoalSide,
        profile: DifficultyProfile,
        engine: SimulationEngine,
        seed: u64,
    ) -> Self {
        let mut seeder = ChaCha8Rng::seed_from_u64(seed);
        Self {
            own_goal,
            profile,
            planner: ShotSearchPlanner::new(engine),
            selector: ShotSelector::new(seeder.gen()),
            injector: ErrorInjector::new(seeder.gen()),
        }
    }

    pub fn target_goal(&self) -> GoalSide {
        self.own_goal.opposite()
    }

    /// Decide the next shot from `start`. The returned angle is normalized
    /// into `[0, 2π)`.
    pub async fn plan_shot(&mut self, field: &FieldConfig, start: Vec2, scores: ScoreSnapshot) -> Shot {
        let ranked = self
            .planner
            .evaluate_all_shots(
                start,
                field,
                scores,
                self.target_goal(),
                self.own_goal,
                &self.profile,
            )
            .await;

        // An empty search plays the safe zero-power shot
        let selected = self.selector.select(&ranked, self.profile.selection_policy);
        let chosen = selected.map(ShotCandidate::shot).unwrap_or_default();
        let shot = self
            .injector
            .add_error(chosen, &self.profile.error_magnitude)
            .normalized();

        debug!(
            tier = ?self.profile.tier,
            own_goal = ?self.own_goal,
            chosen_score = selected.map(|c| c.score),
            chosen_angle = chosen.angle,
            chosen_power = chosen.power,
            angle = shot.angle,
            power = shot.power,
            "AI shot planned"
        );
        shot
    }
}
