//! Frame-by-frame replay of a finished simulation

use super::field::GoalSide;
use super::physics::{CollisionEvent, SimulationResult, TrajectorySample};

pub type CollisionHandler = Box<dyn FnMut(&CollisionEvent) + Send>;
pub type CompletionHandler = Box<dyn FnMut(Option<GoalSide>) + Send>;

/// Result of one [`TrajectoryPlayer::advance`] call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackStep {
    Frame(TrajectorySample),
    Finished,
}

/// Pull-based player driven by the presentation layer's own clock.
///
/// Each `advance` first reports the collisions recorded for the current
/// frame, then hands out that frame's sample. After the last sample the
/// completion handler runs exactly once and every later call returns
/// [`PlaybackStep::Finished`] until [`reset`](Self::reset).
pub struct TrajectoryPlayer {
    trajectory: Vec<TrajectorySample>,
    collisions: Vec<CollisionEvent>,
    goal: Option<GoalSide>,
    index: usize,
    next_event: usize,
    completed: bool,
    on_collision: Option<CollisionHandler>,
    on_complete: Option<CompletionHandler>,
}

impl TrajectoryPlayer {
    pub fn new(result: SimulationResult) -> Self {
        Self {
            trajectory: result.trajectory,
            collisions: result.collisions,
            goal: result.goal,
            index: 0,
            next_event: 0,
            completed: false,
            on_collision: None,
            on_complete: None,
        }
    }

    pub fn on_collision(mut self, handler: impl FnMut(&CollisionEvent) + Send + 'static) -> Self {
        self.on_collision = Some(Box::new(handler));
        self
    }

    pub fn on_complete(mut self, handler: impl FnMut(Option<GoalSide>) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(handler));
        self
    }

    pub fn advance(&mut self) -> PlaybackStep {
        if self.index >= self.trajectory.len() {
            if !self.completed {
                self.completed = true;
                if let Some(handler) = self.on_complete.as_mut() {
                    handler(self.goal);
                }
            }
            return PlaybackStep::Finished;
        }

        // The log is in frame order, so a cursor is enough
        while let Some(event) = self.collisions.get(self.next_event) {
            if event.frame as usize > self.index {
                break;
            }
            if event.frame as usize == self.index {
                if let Some(handler) = self.on_collision.as_mut() {
                    handler(event);
                }
            }
            self.next_event += 1;
        }

        let sample = self.trajectory[self.index];
        self.index += 1;
        PlaybackStep::Frame(sample)
    }

    /// Rewind to the first frame; completion will fire again at the end
    pub fn reset(&mut self) {
        self.index = 0;
        self.next_event = 0;
        self.completed = false;
    }

    pub fn frame_index(&self) -> usize {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::field::{FieldConfig, Peg};
    use crate::game::physics::SimulationEngine;
    use std::sync::{Arc, Mutex};

    fn bouncing_shot() -> SimulationResult {
        let mut field = FieldConfig::empty();
        field.pegs = vec![Peg::new(600.0, field.height / 2.0)];
        SimulationEngine::new()
            .simulate(&field, field.center(), 0.0, 0.8)
            .unwrap()
    }

    #[test]
    fn replays_every_sample_then_finishes_once() {
        let result = bouncing_shot();
        let expected: Vec<_> = result.trajectory.clone();
        let goal = result.goal;
        let completions = Arc::new(Mutex::new(Vec::new()));
        let sink = completions.clone();
        let mut player = TrajectoryPlayer::new(result)
            .on_complete(move |outcome| sink.lock().unwrap().push(outcome));

        let mut played = Vec::new();
        while let PlaybackStep::Frame(sample) = player.advance() {
            played.push(sample);
        }
        assert_eq!(played, expected);
        assert!(player.is_finished());

        for _ in 0..3 {
            assert_eq!(player.advance(), PlaybackStep::Finished);
        }
        assert_eq!(*completions.lock().unwrap(), vec![goal]);
    }

    #[test]
    fn collisions_fire_on_their_own_frame() {
        let result = bouncing_shot();
        let expected: Vec<u32> = result.collisions.iter().map(|c| c.frame).collect();
        assert!(!expected.is_empty());

        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();
        let mut player = TrajectoryPlayer::new(result).on_collision(move |event| {
            sink.lock().unwrap().push(event.frame);
        });

        loop {
            let before = player.frame_index();
            match player.advance() {
                PlaybackStep::Frame(_) => {
                    // Every event reported so far belongs to a frame already handed out
                    assert!(fired.lock().unwrap().iter().all(|&f| f as usize <= before));
                }
                PlaybackStep::Finished => break,
            }
        }
        assert_eq!(*fired.lock().unwrap(), expected);
    }

    #[test]
    fn reset_replays_and_completes_again() {
        let result = bouncing_shot();
        let len = result.trajectory.len();
        let completions = Arc::new(Mutex::new(0));
        let sink = completions.clone();
        let mut player =
            TrajectoryPlayer::new(result).on_complete(move |_| *sink.lock().unwrap() += 1);

        for _ in 0..=len {
            player.advance();
        }
        player.reset();
        assert_eq!(player.frame_index(), 0);
        assert!(!player.is_finished());
        for _ in 0..=len {
            player.advance();
        }

        assert_eq!(*completions.lock().unwrap(), 2);
    }

    #[test]
    fn works_without_handlers() {
        let mut player = TrajectoryPlayer::new(bouncing_shot());
        let mut frames = 0;
        while player.advance() != PlaybackStep::Finished {
            frames += 1;
        }
        assert!(frames > 1);
    }
}
