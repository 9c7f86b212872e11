//! Game session: the single-threaded frame loop state.
//!
//! One call to [`GameSession::advance`] is one frame. Each frame the
//! powered set is recomputed from scratch, then the tick accumulator is
//! advanced by scaled elapsed time and at most one production tick fires.
//! The tick always observes the connectivity computed in the same frame.
//!
//! All mutation happens on the simulation thread; a renderer runs off a
//! snapshot of the read accessors.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::buildings::{BuildingKind, BuildingRegistry, DeletionOutcome, PlacementOutcome};
use crate::connectivity::{self, ConnectivitySet};
use crate::economy::{production_tick, EconomyEvent, EconomyState};
use crate::grid::{DepositGrid, TilePos};
use crate::map_generation::{generate_deposits, GenerationConfig};

/// Simulation speed selection (the pause / 1x / 3x control).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeScale {
    /// Time does not advance.
    Paused,
    /// Real time.
    #[default]
    Normal,
    /// Triple speed.
    Fast,
}

impl TimeScale {
    /// Multiplier applied to elapsed frame time.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Paused => 0.0,
            Self::Normal => 1.0,
            Self::Fast => 3.0,
        }
    }
}

/// Full state of one game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// The deposit map, fixed after generation.
    grid: DepositGrid,
    /// All placed buildings.
    registry: BuildingRegistry,
    /// Resource counters and cannon reservoirs.
    economy: EconomyState,
    /// Powered set for the current frame. Derived state; rebuilt every
    /// frame and after load, never persisted as truth.
    #[serde(skip)]
    connected: ConnectivitySet,
    /// Accumulated scaled seconds toward the next production tick.
    tick_accumulator: f64,
    /// Current speed selection.
    time_scale: TimeScale,
    /// Production ticks fired since the session started.
    ticks_fired: u64,
}

impl GameSession {
    /// Start a session on a freshly generated map.
    #[must_use]
    pub fn new(config: &GenerationConfig) -> Self {
        Self::from_grid(generate_deposits(config))
    }

    /// Start a session on an existing deposit grid (e.g. a loaded save).
    #[must_use]
    pub fn from_grid(grid: DepositGrid) -> Self {
        Self {
            grid,
            registry: BuildingRegistry::new(),
            economy: EconomyState::new(),
            connected: ConnectivitySet::new(),
            tick_accumulator: 0.0,
            time_scale: TimeScale::default(),
            ticks_fired: 0,
        }
    }

    /// Reset everything and regenerate the map: buildings, economy,
    /// connectivity, and the tick accumulator all return to their
    /// new-game state.
    pub fn new_game(&mut self, config: &GenerationConfig) {
        self.grid = generate_deposits(config);
        self.registry.clear();
        self.economy = EconomyState::new();
        self.connected = ConnectivitySet::new();
        self.tick_accumulator = 0.0;
        self.time_scale = TimeScale::default();
        self.ticks_fired = 0;
        tracing::info!(seed = config.seed, "new game started");
    }

    /// Advance one frame by `dt_seconds` of real time.
    ///
    /// Recomputes connectivity first, then fires at most one production
    /// tick if the scaled accumulator crossed 1.0, subtracting exactly 1.0
    /// and keeping the fractional remainder. Multiple owed ticks are not
    /// batched; they fire one per subsequent frame.
    pub fn advance(&mut self, dt_seconds: f64) -> Vec<EconomyEvent> {
        self.connected = connectivity::recompute(&self.registry);
        self.tick_accumulator += dt_seconds * self.time_scale.multiplier();

        if self.tick_accumulator < 1.0 {
            return Vec::new();
        }

        let events = production_tick(
            &mut self.economy,
            &self.registry,
            &self.grid,
            &self.connected,
        );
        self.tick_accumulator -= 1.0;
        self.ticks_fired += 1;

        tracing::debug!(
            tick = self.ticks_fired,
            remainder = self.tick_accumulator,
            "production tick fired"
        );

        events
    }

    /// Request a building placement. Pure gate; rejections change nothing.
    pub fn try_place(&mut self, kind: BuildingKind, pos: TilePos) -> PlacementOutcome {
        self.registry.try_place(&self.grid, kind, pos)
    }

    /// Request a placement at a world-space position (UI boundary).
    pub fn try_place_at_world(
        &mut self,
        kind: BuildingKind,
        world_x: f32,
        world_y: f32,
    ) -> PlacementOutcome {
        self.try_place(kind, TilePos::from_world(world_x, world_y))
    }

    /// Request a deletion. The Base is protected; deleting a cannon also
    /// reclaims its ammo reservoir.
    pub fn try_delete(&mut self, pos: TilePos) -> DeletionOutcome {
        let outcome = self.registry.try_delete(pos);
        if let DeletionOutcome::Removed(building) = outcome {
            if building.kind == BuildingKind::Cannon {
                self.economy.reclaim_reservoir(building.pos);
            }
        }
        outcome
    }

    /// The deposit map.
    #[must_use]
    pub fn grid(&self) -> &DepositGrid {
        &self.grid
    }

    /// The building registry.
    #[must_use]
    pub fn registry(&self) -> &BuildingRegistry {
        &self.registry
    }

    /// The economy counters and reservoirs.
    #[must_use]
    pub fn economy(&self) -> &EconomyState {
        &self.economy
    }

    /// The powered set computed in the most recent frame.
    #[must_use]
    pub fn connected(&self) -> &ConnectivitySet {
        &self.connected
    }

    /// Whether the Base has been placed (drives the build-bar Base button).
    #[must_use]
    pub fn base_placed(&self) -> bool {
        self.registry.base_placed()
    }

    /// Current speed selection.
    #[must_use]
    pub const fn time_scale(&self) -> TimeScale {
        self.time_scale
    }

    /// Select a simulation speed.
    pub fn set_time_scale(&mut self, scale: TimeScale) {
        self.time_scale = scale;
    }

    /// Production ticks fired so far.
    #[must_use]
    pub const fn ticks_fired(&self) -> u64 {
        self.ticks_fired
    }

    /// Fractional progress toward the next tick (test/HUD visibility).
    #[must_use]
    pub const fn tick_accumulator(&self) -> f64 {
        self.tick_accumulator
    }

    /// Rebuild derived state after deserialization.
    pub(crate) fn refresh_connectivity(&mut self) {
        self.connected = connectivity::recompute(&self.registry);
    }

    /// Hash of the full session state, for determinism checks.
    ///
    /// Two sessions that received identical inputs must hash identically.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.grid.width().hash(&mut hasher);
        self.grid.height().hash(&mut hasher);
        for tile in self.grid.tiles() {
            tile.code().hash(&mut hasher);
        }

        self.registry.len().hash(&mut hasher);
        for building in self.registry.iter() {
            building.kind.hash(&mut hasher);
            building.pos.hash(&mut hasher);
        }

        self.economy.gold.hash(&mut hasher);
        self.economy.wood.hash(&mut hasher);
        self.economy.iron.hash(&mut hasher);
        self.economy.ammo_cores.hash(&mut hasher);

        // Reservoirs in sorted order; HashMap iteration is unordered.
        let mut reservoirs: Vec<_> = self.economy.cannon_ammo.iter().collect();
        reservoirs.sort_by_key(|(pos, _)| (pos.y, pos.x));
        for (pos, ammo) in reservoirs {
            pos.hash(&mut hasher);
            ammo.hash(&mut hasher);
        }

        self.tick_accumulator.to_bits().hash(&mut hasher);
        self.ticks_fired.hash(&mut hasher);

        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DepositKind;

    fn blank_session() -> GameSession {
        GameSession::from_grid(DepositGrid::new(40, 40))
    }

    /// Base plus a transporter so placed producers are powered.
    fn powered_session() -> GameSession {
        let mut session = blank_session();
        assert!(session
            .try_place(BuildingKind::Base, TilePos::new(0, 0))
            .is_accepted());
        assert!(session
            .try_place(BuildingKind::Transporter, TilePos::new(3, 0))
            .is_accepted());
        session
    }

    #[test]
    fn test_accumulator_carries_remainder() {
        let mut session = powered_session();

        let events = session.advance(0.6);
        assert!(events.is_empty());
        assert_eq!(session.ticks_fired(), 0);

        session.advance(0.6);
        assert_eq!(session.ticks_fired(), 1);
        assert!((session.tick_accumulator() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_at_most_one_tick_per_frame() {
        let mut session = powered_session();

        // Five owed seconds still fire only one tick this frame...
        session.advance(5.0);
        assert_eq!(session.ticks_fired(), 1);

        // ...and the backlog drains one tick per subsequent frame.
        session.advance(0.0);
        assert_eq!(session.ticks_fired(), 2);
    }

    #[test]
    fn test_paused_time_does_not_accumulate() {
        let mut session = powered_session();
        session.set_time_scale(TimeScale::Paused);

        session.advance(10.0);
        assert_eq!(session.ticks_fired(), 0);
        assert_eq!(session.tick_accumulator(), 0.0);
    }

    #[test]
    fn test_fast_time_triples_accumulation() {
        let mut session = powered_session();
        session.set_time_scale(TimeScale::Fast);

        session.advance(0.4);
        assert_eq!(session.ticks_fired(), 1);
    }

    #[test]
    fn test_tick_sees_same_frame_connectivity() {
        let mut session = blank_session();
        session.try_place(BuildingKind::Base, TilePos::new(0, 0));
        session.try_place(BuildingKind::Transporter, TilePos::new(3, 0));

        let mut grid_session = session.clone();
        // A gold mine placed this frame harvests this frame's tick.
        grid_session.grid.set_deposit(TilePos::new(5, 1), DepositKind::Gold);
        assert!(grid_session
            .try_place(BuildingKind::GoldMine, TilePos::new(5, 0))
            .is_accepted());

        grid_session.advance(1.0);
        assert_eq!(grid_session.economy().gold, 5);
    }

    #[test]
    fn test_connectivity_recomputed_every_frame() {
        let mut session = powered_session();
        session.advance(0.0);
        assert!(session.connected().contains(TilePos::new(3, 0)));

        session.try_delete(TilePos::new(3, 0));
        session.advance(0.0);
        assert!(!session.connected().contains(TilePos::new(3, 0)));
        assert_eq!(session.connected().len(), 1);
    }

    #[test]
    fn test_deleting_cannon_reclaims_reservoir() {
        let mut session = powered_session();
        let cannon = TilePos::new(2, 1);
        assert!(session.try_place(BuildingKind::Cannon, cannon).is_accepted());

        session.economy.ammo_cores = 3;
        session.advance(1.0);
        assert_eq!(session.economy().reservoir(cannon), 3);

        session.try_delete(cannon);
        assert!(session.economy().cannon_ammo.is_empty());
    }

    #[test]
    fn test_new_game_resets_everything() {
        let mut session = powered_session();
        session.economy.gold = 99;
        session.advance(2.0);
        session.set_time_scale(TimeScale::Fast);

        session.new_game(&GenerationConfig::new_game().with_seed(404));

        assert!(session.registry().is_empty());
        assert!(!session.base_placed());
        assert_eq!(session.economy().gold, 0);
        assert_eq!(session.tick_accumulator(), 0.0);
        assert_eq!(session.ticks_fired(), 0);
        assert_eq!(session.time_scale(), TimeScale::Normal);
        assert!(session.connected().is_empty());
    }

    #[test]
    fn test_state_hash_is_reproducible() {
        let config = GenerationConfig::new_game().with_seed(21);
        let build = |_: ()| {
            let mut s = GameSession::new(&config);
            s.try_place(BuildingKind::Base, TilePos::new(1, 1));
            s.try_place(BuildingKind::Transporter, TilePos::new(4, 1));
            s.advance(1.5);
            s
        };
        assert_eq!(build(()).state_hash(), build(()).state_hash());
    }

    #[test]
    fn test_state_hash_tracks_changes() {
        let mut session = powered_session();
        let before = session.state_hash();
        session.try_place(BuildingKind::Archer, TilePos::new(9, 9));
        assert_ne!(before, session.state_hash());
    }
}
