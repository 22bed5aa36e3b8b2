//! Client-side ordering of trusted outcomes against local playback

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::game::physics::SimulationResult;

/// Holds trusted messages while a local animation is still playing.
///
/// Anything offered during playback waits until
/// [`finish_playback`](Self::finish_playback) and is then released in
/// arrival order.
#[derive(Debug)]
pub struct OutcomeGate<T> {
    playing: bool,
    pending: VecDeque<T>,
}

impl<T> Default for OutcomeGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OutcomeGate<T> {
    pub fn new() -> Self {
        Self {
            playing: false,
            pending: VecDeque::new(),
        }
    }

    pub fn begin_playback(&mut self) {
        self.playing = true;
    }

    /// Returns the message back if it may be applied now, or queues it
    pub fn offer(&mut self, msg: T) -> Option<T> {
        if self.playing {
            self.pending.push_back(msg);
            debug!(queued = self.pending.len(), "Deferred trusted outcome until playback ends");
            None
        } else {
            Some(msg)
        }
    }

    /// End playback and release everything that arrived meanwhile
    pub fn finish_playback(&mut self) -> Vec<T> {
        self.playing = false;
        self.pending.drain(..).collect()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Pick the result that may mutate game state.
///
/// The trusted result always wins; a differing advisory prediction is only
/// reported.
pub fn reconcile(advisory: Option<SimulationResult>, trusted: SimulationResult) -> SimulationResult {
    if let Some(advisory) = advisory {
        if advisory != trusted {
            warn!(
                advisory_frames = advisory.frame_count,
                trusted_frames = trusted.frame_count,
                advisory_goal = ?advisory.goal,
                trusted_goal = ?trusted.goal,
                "Advisory simulation diverged from trusted result"
            );
        }
    }
    trusted
}
