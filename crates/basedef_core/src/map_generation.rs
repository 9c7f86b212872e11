//! Procedural deposit scattering.
//!
//! Deposits are single-tile and isolation-constrained: a deposit is only
//! placed on an empty tile whose full 3x3 neighbourhood is empty, so no two
//! deposits are ever adjacent (including diagonally). Placement uses
//! rejection sampling with a bounded attempt budget; under-placement on a
//! crowded map degrades gracefully to a sparser map and is not an error.
//!
//! All randomness comes from a seeded PRNG - no system randomness in the
//! simulation core.

use serde::{Deserialize, Serialize};

use crate::grid::{DepositGrid, DepositKind, TilePos, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH};

/// Attempts allowed per requested deposit before giving up.
pub const ATTEMPTS_PER_DEPOSIT: u32 = 50;

/// Configuration for deposit generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    /// Number of tree deposits to attempt.
    pub trees: u32,
    /// Number of gold deposits to attempt.
    pub gold: u32,
    /// Number of iron deposits to attempt.
    pub iron: u32,
    /// Random seed for deterministic generation.
    pub seed: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new_game()
    }
}

impl GenerationConfig {
    /// Deposit counts used when starting a new game (50 tree / 20 gold /
    /// 20 iron).
    #[must_use]
    pub const fn new_game() -> Self {
        Self {
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
            trees: 50,
            gold: 20,
            iron: 20,
            seed: 12345,
        }
    }

    /// Denser counts used for the pre-game background map (50 tree /
    /// 40 gold / 30 iron).
    #[must_use]
    pub const fn startup() -> Self {
        Self {
            gold: 40,
            iron: 30,
            ..Self::new_game()
        }
    }

    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the map dimensions.
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Simple deterministic RNG for map generation.
pub struct MapRng {
    state: u64,
}

impl MapRng {
    /// Create a new RNG from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9E37_79B9_7F4A_7C15),
        }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(0x5_DEEC_E66D).wrapping_add(11);
        self.state
    }

    /// Uniform value in `[0, bound)`.
    fn next_below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0);
        (self.next() % u64::from(bound)) as u32
    }

    /// A uniformly random in-bounds tile position.
    pub fn next_tile(&mut self, width: u32, height: u32) -> TilePos {
        let x = self.next_below(width) as i32;
        let y = self.next_below(height) as i32;
        TilePos::new(x, y)
    }
}

/// Scatter up to `count` isolated deposits of `kind` onto empty tiles.
///
/// Repeatedly picks a random tile and accepts it only if the tile and its
/// full 3x3 neighbourhood are deposit-free. Gives up after
/// `count * ATTEMPTS_PER_DEPOSIT` attempts. Returns the number actually
/// placed, which may be less than requested.
///
/// Callable multiple times with different kinds in one generation pass;
/// earlier placements are respected by the isolation check.
pub fn scatter_deposits(
    grid: &mut DepositGrid,
    kind: DepositKind,
    count: u32,
    rng: &mut MapRng,
) -> u32 {
    let mut placed = 0;
    let mut attempts = 0;
    let budget = count.saturating_mul(ATTEMPTS_PER_DEPOSIT);

    while placed < count && attempts < budget {
        let pos = rng.next_tile(grid.width(), grid.height());
        if grid.deposit_at(pos) == Some(DepositKind::None) && grid.is_isolated(pos) {
            grid.set_deposit(pos, kind);
            placed += 1;
        }
        attempts += 1;
    }

    if placed < count {
        tracing::debug!(
            ?kind,
            requested = count,
            placed,
            "deposit scattering under-placed after attempt budget"
        );
    }

    placed
}

/// Generate a fresh deposit grid from a configuration.
///
/// Kinds are scattered in a fixed order (tree, gold, iron) so the same seed
/// always yields the same map.
#[must_use]
pub fn generate_deposits(config: &GenerationConfig) -> DepositGrid {
    let mut grid = DepositGrid::new(config.width, config.height);
    let mut rng = MapRng::new(config.seed);

    scatter_deposits(&mut grid, DepositKind::Tree, config.trees, &mut rng);
    scatter_deposits(&mut grid, DepositKind::Gold, config.gold, &mut rng);
    scatter_deposits(&mut grid, DepositKind::Iron, config.iron, &mut rng);

    grid
}
