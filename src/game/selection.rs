//! Tiered stochastic pick from the ranked candidate list

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::planner::ShotCandidate;
use super::profile::SelectionPolicy;

/// Chooses which ranked candidate the AI actually plays
#[derive(Debug, Clone)]
pub struct ShotSelector {
    rng: ChaCha8Rng,
}

impl ShotSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Index into a ranked list of `len` candidates, `None` when empty
    pub fn pick_index(&mut self, len: usize, policy: SelectionPolicy) -> Option<usize> {
        if len == 0 {
            return None;
        }

        let pool = match policy {
            SelectionPolicy::Easy => {
                if self.rng.gen_bool(0.4) {
                    (len + 1) / 2
                } else {
                    5
                }
            }
            SelectionPolicy::Medium => {
                if self.rng.gen_bool(0.2) {
                    5
                } else {
                    3
                }
            }
            SelectionPolicy::Hard => {
                if self.rng.gen_bool(0.9) {
                    1
                } else {
                    2
                }
            }
        };

        Some(self.rng.gen_range(0..pool.min(len)))
    }

    /// The candidate to play, falling back to the top-ranked one. `None`
    /// only for an empty list.
    pub fn select<'a>(
        &mut self,
        ranked: &'a [ShotCandidate],
        policy: SelectionPolicy,
    ) -> Option<&'a ShotCandidate> {
        let index = self.pick_index(ranked.len(), policy)?;
        ranked.get(index).or_else(|| ranked.first())
    }
}
