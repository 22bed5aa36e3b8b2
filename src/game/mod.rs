//! Shot simulation, AI decision making and the authoritative match loop

pub mod ai;
pub mod field;
pub mod humanize;
pub mod r#match;
pub mod physics;
pub mod planner;
pub mod playback;
pub mod profile;
pub mod scoring;
pub mod selection;

pub use ai::AiPlayer;
pub use field::{FieldConfig, FieldError, FieldLayout, GoalSide, Peg};
pub use humanize::ErrorInjector;
pub use physics::{
    CollisionEvent, CollisionKind, EndReason, ShotError, SimulationEngine, SimulationResult,
    TrajectorySample, WallSide,
};
pub use planner::{ShotCandidate, ShotSearchPlanner};
pub use playback::{PlaybackStep, TrajectoryPlayer};
pub use profile::{Difficulty, DifficultyProfile, ErrorMagnitude, ScoringWeights, SelectionPolicy};
pub use r#match::{Controller, GameMatch, MatchHandle, MatchSettings, MatchSummary};
pub use scoring::{ScoreSnapshot, ShotScorer};
pub use selection::ShotSelector;

use serde::{Deserialize, Serialize};

use crate::net::protocol::ClientMsg;

/// One discrete action: launch angle in radians and power in `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub angle: f32,
    pub power: f32,
}

impl Shot {
    /// Same shot with the angle wrapped into `[0, 2π)`
    pub fn normalized(self) -> Self {
        Self {
            angle: normalize_angle(self.angle),
            power: self.power,
        }
    }
}

/// Wrap an angle into `[0, 2π)`
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Message from a remote player, tagged with the goal that player defends
#[derive(Debug, Clone)]
pub struct PlayerInput {
    pub side: GoalSide,
    pub msg: ClientMsg,
    pub received_at: u64,
}
