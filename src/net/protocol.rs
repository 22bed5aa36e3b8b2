//! Wire message definitions
//! These are the serde types exchanged with remote peers; the transport and
//! its encoding live outside this crate.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::field::{FieldConfig, GoalSide};
use crate::game::physics::SimulationResult;
use crate::game::scoring::ScoreSnapshot;

/// Messages sent from a remote player to the authority
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Shoot the ball
    TakeShot {
        /// Launch direction in radians
        angle: f32,
        /// Fraction of maximum shot power (0.0 - 1.0)
        power: f32,
    },

    /// Concede the match
    LeaveMatch,
}

/// Messages broadcast by the authority
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Match created; peers can build their local field from this
    MatchStarted {
        match_id: Uuid,
        /// Seed used for AI decisions and procedural layouts
        seed: u64,
        field: FieldConfig,
        goals_to_win: u32,
    },

    /// A player may now shoot
    TurnStarted {
        turn: u32,
        /// Goal defended by the shooting player
        shooter: GoalSide,
        ball: Vec2,
    },

    /// Authoritative outcome of a shot
    ShotResolved {
        turn: u32,
        shooter: GoalSide,
        angle: f32,
        power: f32,
        result: SimulationResult,
    },

    /// Score changed after a goal
    ScoreUpdate {
        score: MatchScore,
    },

    /// Match has ended
    MatchEnd {
        /// Goal defended by the winner, `None` for a draw
        winner: Option<GoalSide>,
        score: MatchScore,
        turns: u32,
    },

    /// Error message
    Error {
        code: String,
        message: String,
    },
}

/// Goals credited to each player, keyed by the goal that player defends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub left: u32,
    pub right: u32,
}

impl MatchScore {
    pub fn goals(&self, side: GoalSide) -> u32 {
        match side {
            GoalSide::Left => self.left,
            GoalSide::Right => self.right,
        }
    }

    /// Credit a ball that ended in `goal` to the player attacking it
    pub fn record_goal(&mut self, goal: GoalSide) {
        match goal.opposite() {
            GoalSide::Left => self.left += 1,
            GoalSide::Right => self.right += 1,
        }
    }

    /// Scores as seen by the player defending `side`
    pub fn snapshot_for(&self, side: GoalSide) -> ScoreSnapshot {
        ScoreSnapshot {
            own: self.goals(side),
            opponent: self.goals(side.opposite()),
        }
    }

    /// Player with more goals, `None` when level
    pub fn leader(&self) -> Option<GoalSide> {
        match self.left.cmp(&self.right) {
            std::cmp::Ordering::Greater => Some(GoalSide::Left),
            std::cmp::Ordering::Less => Some(GoalSide::Right),
            std::cmp::Ordering::Equal => None,
        }
    }
}
