//! Match state and authoritative turn loop

use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::net::protocol::{ClientMsg, MatchScore, ServerMsg};
use crate::util::time::unix_millis;

use super::ai::AiPlayer;
use super::field::{FieldConfig, GoalSide};
use super::physics::{ShotError, SimulationEngine, SimulationResult};
use super::{PlayerInput, Shot};

/// Rules for a single match
#[derive(Debug, Clone, Copy)]
pub struct MatchSettings {
    pub goals_to_win: u32,
    pub max_turns: u32,
    /// How long a remote player may take before a zero-power shot is played
    pub turn_timeout: Duration,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            goals_to_win: 3,
            max_turns: 30,
            turn_timeout: Duration::from_secs(30),
        }
    }
}

/// Who decides the shots for one side
#[derive(Debug)]
pub enum Controller {
    Ai(Box<AiPlayer>),
    /// Shots arrive as [`PlayerInput`] over the match input channel
    Remote,
}

/// How a match finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MatchEnding {
    GoalLimit,
    TurnLimit,
    /// The player defending `side` left
    Forfeit { side: GoalSide },
    /// Every remote input sender was dropped
    Abandoned,
}

/// Final report returned by [`GameMatch::run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: Uuid,
    pub winner: Option<GoalSide>,
    pub score: MatchScore,
    pub turns: u32,
    pub ending: MatchEnding,
}

/// Match state (owned by match task)
#[derive(Debug, Clone)]
pub struct MatchState {
    pub id: Uuid,
    pub seed: u64,
    pub turn: u32,
    /// Goal defended by the player about to shoot
    pub shooter: GoalSide,
    pub ball: Vec2,
    pub score: MatchScore,
}

impl MatchState {
    pub fn new(id: Uuid, seed: u64, ball: Vec2) -> Self {
        Self {
            id,
            seed,
            turn: 0,
            shooter: GoalSide::Left,
            ball,
            score: MatchScore::default(),
        }
    }
}

/// Handle to a running match
#[derive(Clone)]
pub struct MatchHandle {
    pub id: Uuid,
    pub input_tx: mpsc::Sender<PlayerInput>,
    pub events_tx: broadcast::Sender<ServerMsg>,
}

impl MatchHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMsg> {
        self.events_tx.subscribe()
    }
}

enum TurnAction {
    Shoot(Shot),
    Forfeit(GoalSide),
    Abandon,
}

/// The authoritative game match
pub struct GameMatch {
    state: MatchState,
    field: Arc<FieldConfig>,
    engine: SimulationEngine,
    settings: MatchSettings,
    left: Controller,
    right: Controller,
    input_rx: mpsc::Receiver<PlayerInput>,
    events_tx: broadcast::Sender<ServerMsg>,
}

impl GameMatch {
    /// Create a new match. `left` defends the left goal and shoots first.
    pub fn new(
        id: Uuid,
        seed: u64,
        field: Arc<FieldConfig>,
        engine: SimulationEngine,
        left: Controller,
        right: Controller,
        settings: MatchSettings,
    ) -> (Self, MatchHandle) {
        let (input_tx, input_rx) = mpsc::channel(64);
        let (events_tx, _) = broadcast::channel(256);

        let handle = MatchHandle {
            id,
            input_tx,
            events_tx: events_tx.clone(),
        };

        let game_match = Self {
            state: MatchState::new(id, seed, field.ball_start),
            field,
            engine,
            settings,
            left,
            right,
            input_rx,
            events_tx,
        };

        (game_match, handle)
    }

    /// Run turns until a player reaches the goal limit, the turn limit is
    /// hit, or a player leaves
    pub async fn run(mut self) -> MatchSummary {
        info!(match_id = %self.state.id, seed = self.state.seed, "Match started");
        self.broadcast(ServerMsg::MatchStarted {
            match_id: self.state.id,
            seed: self.state.seed,
            field: (*self.field).clone(),
            goals_to_win: self.settings.goals_to_win,
        });

        let ending = loop {
            if self.state.turn >= self.settings.max_turns {
                break MatchEnding::TurnLimit;
            }
            self.state.turn += 1;
            let shooter = self.state.shooter;
            self.broadcast(ServerMsg::TurnStarted {
                turn: self.state.turn,
                shooter,
                ball: self.state.ball,
            });

            let shot = match self.next_action(shooter).await {
                TurnAction::Shoot(shot) => shot,
                TurnAction::Forfeit(side) => break MatchEnding::Forfeit { side },
                TurnAction::Abandon => break MatchEnding::Abandoned,
            };

            if let Err(e) = self.resolve_shot(shooter, shot) {
                warn!(match_id = %self.state.id, error = %e, "Shot rejected, turn skipped");
            }

            if self.state.score.goals(shooter) >= self.settings.goals_to_win
                || self.state.score.goals(shooter.opposite()) >= self.settings.goals_to_win
            {
                break MatchEnding::GoalLimit;
            }

            self.state.shooter = shooter.opposite();
        };

        let winner = match ending {
            MatchEnding::Forfeit { side } => Some(side.opposite()),
            _ => self.state.score.leader(),
        };

        info!(
            match_id = %self.state.id,
            ?winner,
            left = self.state.score.left,
            right = self.state.score.right,
            turns = self.state.turn,
            ?ending,
            "Match ended"
        );
        self.broadcast(ServerMsg::MatchEnd {
            winner,
            score: self.state.score,
            turns: self.state.turn,
        });

        MatchSummary {
            match_id: self.state.id,
            winner,
            score: self.state.score,
            turns: self.state.turn,
            ending,
        }
    }

    fn broadcast(&self, msg: ServerMsg) {
        // No subscribers is fine; the match is authoritative either way
        let _ = self.events_tx.send(msg);
    }

    fn ai_for(&mut self, side: GoalSide) -> Option<&mut AiPlayer> {
        let controller = match side {
            GoalSide::Left => &mut self.left,
            GoalSide::Right => &mut self.right,
        };
        match controller {
            Controller::Ai(ai) => Some(ai.as_mut()),
            Controller::Remote => None,
        }
    }

    async fn next_action(&mut self, shooter: GoalSide) -> TurnAction {
        let field = Arc::clone(&self.field);
        let ball = self.state.ball;
        let scores = self.state.score.snapshot_for(shooter);

        if let Some(ai) = self.ai_for(shooter) {
            return TurnAction::Shoot(ai.plan_shot(&field, ball, scores).await);
        }
        self.await_remote_shot(shooter).await
    }

    async fn await_remote_shot(&mut self, shooter: GoalSide) -> TurnAction {
        let deadline = tokio::time::sleep(self.settings.turn_timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => {
                    warn!(match_id = %self.state.id, ?shooter, "Turn timed out, playing zero-power shot");
                    return TurnAction::Shoot(Shot::default());
                }
                input = self.input_rx.recv() => {
                    let Some(input) = input else {
                        return TurnAction::Abandon;
                    };
                    match input.msg {
                        ClientMsg::LeaveMatch => return TurnAction::Forfeit(input.side),
                        ClientMsg::TakeShot { .. } if input.side != shooter => {
                            self.broadcast(ServerMsg::Error {
                                code: "not_your_turn".to_string(),
                                message: format!("It is the {shooter:?} player's turn"),
                            });
                        }
                        ClientMsg::TakeShot { angle, power } => {
                            if angle.is_finite() && power.is_finite() {
                                debug!(
                                    match_id = %self.state.id,
                                    ?shooter,
                                    input_age_ms = unix_millis().saturating_sub(input.received_at),
                                    "Remote shot accepted"
                                );
                                let power = power.clamp(0.0, 1.0);
                                return TurnAction::Shoot(Shot { angle, power }.normalized());
                            }
                            self.broadcast(ServerMsg::Error {
                                code: "invalid_shot".to_string(),
                                message: "Angle and power must be finite".to_string(),
                            });
                        }
                    }
                }
            }
        }
    }

    /// Run the trusted simulation for a shot and apply it to match state
    fn resolve_shot(&mut self, shooter: GoalSide, shot: Shot) -> Result<SimulationResult, ShotError> {
        let result = self
            .engine
            .simulate(&self.field, self.state.ball, shot.angle, shot.power)?;

        self.broadcast(ServerMsg::ShotResolved {
            turn: self.state.turn,
            shooter,
            angle: shot.angle,
            power: shot.power,
            result: result.clone(),
        });

        if let Some(goal) = result.goal {
            self.state.score.record_goal(goal);
            self.state.ball = self.field.ball_start;
            info!(
                match_id = %self.state.id,
                turn = self.state.turn,
                ?shooter,
                ?goal,
                own_goal = goal == shooter,
                "Goal scored"
            );
            self.broadcast(ServerMsg::ScoreUpdate {
                score: self.state.score,
            });
        } else {
            self.state.ball = result.final_position;
        }

        Ok(result)
    }
}
