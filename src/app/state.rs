//! Application state shared by every match

use std::sync::Arc;

use uuid::Uuid;

use crate::config::Config;
use crate::game::{
    AiPlayer, Controller, DifficultyProfile, FieldConfig, FieldError, GameMatch, GoalSide,
    MatchHandle, SimulationEngine,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub field: Arc<FieldConfig>,
    pub engine: SimulationEngine,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, FieldError> {
        let config = Arc::new(config);

        // Field is fixed for the lifetime of the process
        let field = Arc::new(FieldConfig::from_layout(config.field_layout, config.match_seed)?);

        Ok(Self {
            config,
            field,
            engine: SimulationEngine::new(),
        })
    }

    /// Build a match between the two configured AI tiers
    pub fn create_ai_match(&self) -> (GameMatch, MatchHandle) {
        let seed = self.config.match_seed;
        let left = AiPlayer::new(
            GoalSide::Left,
            DifficultyProfile::for_tier(self.config.left_tier),
            self.engine,
            seed,
        );
        let right = AiPlayer::new(
            GoalSide::Right,
            DifficultyProfile::for_tier(self.config.right_tier),
            self.engine,
            seed.wrapping_add(1),
        );

        GameMatch::new(
            Uuid::new_v4(),
            seed,
            self.field.clone(),
            self.engine,
            Controller::Ai(Box::new(left)),
            Controller::Ai(Box::new(right)),
            self.config.match_settings(),
        )
    }
}
