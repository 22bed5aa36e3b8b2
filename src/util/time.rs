//! Time utilities for shot simulation

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Simulation rate configuration
pub const SIMULATION_FPS: u32 = 60; // 60 frames per simulated second
/// Hard cap on frames per shot (10 simulated seconds)
pub const MAX_SIMULATION_FRAMES: u32 = 600;

/// Calculate delta time for physics (in seconds)
pub fn frame_delta() -> f32 {
    1.0 / SIMULATION_FPS as f32
}

/// A simple timer for measuring durations
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_delta_matches_rate() {
        assert!((frame_delta() * SIMULATION_FPS as f32 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn fresh_timer_starts_near_zero() {
        let timer = Timer::default();
        assert!(timer.elapsed_ms() < 1_000);
    }
}
