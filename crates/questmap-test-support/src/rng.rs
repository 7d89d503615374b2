//! Scripted pickers for pinning the answer shuffle in tests.
//!
//! `questmap_core::rng::shuffle` asks its RNG for one swap partner per
//! position, walking from the last slot down to slot 1. The pickers here
//! answer those requests predictably so a test can name the exact order
//! choices end up in.

use questmap_core::rng::DeterministicRng;

/// Always swaps with the lowest allowed slot.
///
/// Under `shuffle` this rotates the choices left by one, so a correct answer
/// pushed last lands second from the end. Use it when the order is irrelevant.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestPickRng;

impl DeterministicRng for LowestPickRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// Hands out swap partners from a script and records the bounds each
/// request asked for.
///
/// Panics when the script runs out or a scripted pick falls outside the
/// requested bounds, since either means the test pinned the wrong shuffle.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPickRng {
    picks: Vec<u32>,
    next: usize,
    requested: Vec<(u32, u32)>,
}

impl ScriptedPickRng {
    /// Creates a picker that answers requests with `picks` in order.
    #[must_use]
    pub fn new(picks: Vec<u32>) -> Self {
        Self {
            picks,
            next: 0,
            requested: Vec::new(),
        }
    }

    /// The inclusive `(min, max)` bounds requested so far.
    #[must_use]
    pub fn requested(&self) -> &[(u32, u32)] {
        &self.requested
    }

    /// Scripted picks not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.picks.len() - self.next
    }
}

impl DeterministicRng for ScriptedPickRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.requested.push((min, max));
        let Some(&pick) = self.picks.get(self.next) else {
            panic!(
                "shuffle requested pick #{} in [{min}, {max}] but only {} were scripted",
                self.next + 1,
                self.picks.len()
            );
        };
        assert!(
            (min..=max).contains(&pick),
            "scripted pick {pick} is outside [{min}, {max}]"
        );
        self.next += 1;
        pick
    }
}
