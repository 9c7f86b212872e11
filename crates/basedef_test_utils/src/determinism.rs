//! Determinism testing harness.
//!
//! The simulation must replay identically from the same inputs: the map
//! generator is a seeded PRNG, the production tick walks the registry in
//! insertion order, and state hashing sorts reservoir entries before
//! feeding them to the hasher. This harness runs the same session build
//! repeatedly and compares end-state hashes.

use basedef_core::prelude::*;

/// Result of repeated determinism runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// End-state hash from each run.
    pub hashes: Vec<u64>,
    /// Frames advanced in each run.
    pub frames: u32,
}

impl DeterminismResult {
    /// Whether every run produced the same hash.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert that all runs matched, with the hashes in the message.
    ///
    /// # Panics
    ///
    /// Panics if runs produced different hashes.
    pub fn assert_deterministic(&self) {
        assert!(
            self.is_deterministic(),
            "simulation diverged across {} runs over {} frames: {:?}",
            self.hashes.len(),
            self.frames,
            self.hashes
        );
    }
}

/// Build a session with `build`, advance it `frames` times by `dt` seconds,
/// and repeat `runs` times, collecting the end-state hashes.
pub fn verify_session<F>(build: F, frames: u32, dt: f64, runs: u32) -> DeterminismResult
where
    F: Fn() -> GameSession,
{
    let mut hashes = Vec::with_capacity(runs as usize);
    for run in 0..runs {
        let mut session = build();
        for _ in 0..frames {
            session.advance(dt);
        }
        let hash = session.state_hash();
        tracing::debug!(run, hash, "determinism run complete");
        hashes.push(hash);
    }
    DeterminismResult { hashes, frames }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::session_with_base;

    #[test]
    fn test_identical_builds_match() {
        let result = verify_session(|| session_with_base(5, 5), 120, 1.0 / 60.0, 3);
        assert_eq!(result.hashes.len(), 3);
        result.assert_deterministic();
    }
}
