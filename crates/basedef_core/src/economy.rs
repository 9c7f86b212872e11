//! Economy state and the fixed-interval production tick.
//!
//! All counters are plain non-negative integers mutated only by the tick.
//! The tick is a pure transition over explicit state - economy, registry,
//! grid, and the connectivity set computed in the same frame - and returns
//! events for the HUD/headless layer.
//!
//! Two ordered passes per tick:
//! 1. Harvesting (order-insensitive): each powered harvester adjacent to
//!    its deposit kind adds its yield to the matching global counter.
//! 2. Conversion and distribution (order-sensitive, runs second so it sees
//!    this tick's fresh iron): factories convert iron to ammo cores one
//!    unit each, then cannons greedily drain the shared ammo pool into
//!    their reservoirs, all in registry order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::buildings::{BuildingKind, BuildingRegistry};
use crate::connectivity::ConnectivitySet;
use crate::grid::{DepositGrid, TilePos};

/// Gold added per powered gold mine per tick.
pub const GOLD_YIELD: u32 = 5;

/// Wood added per powered sawmill per tick.
pub const WOOD_YIELD: u32 = 2;

/// Iron added per powered iron mine per tick.
pub const IRON_YIELD: u32 = 1;

/// Iron consumed (and ammo cores produced) per powered factory per tick.
pub const FACTORY_CONVERSION: u32 = 1;

/// Maximum ammo cores a cannon reservoir can hold.
pub const CANNON_AMMO_CAP: u32 = 20;

/// Global resource counters plus per-cannon ammo reservoirs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyState {
    /// Gold stockpile.
    pub gold: u32,
    /// Wood stockpile.
    pub wood: u32,
    /// Iron stockpile.
    pub iron: u32,
    /// Refined ammo cores awaiting distribution.
    pub ammo_cores: u32,
    /// Ammo reservoirs keyed by cannon tile position. Entries exist only
    /// for tiles currently holding a cannon.
    pub cannon_ammo: HashMap<TilePos, u32>,
}

impl EconomyState {
    /// A zeroed economy (new-game state).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reservoir level of the cannon at `pos` (0 if absent).
    #[must_use]
    pub fn reservoir(&self, pos: TilePos) -> u32 {
        self.cannon_ammo.get(&pos).copied().unwrap_or(0)
    }

    /// Drop the reservoir entry for a deleted cannon. The stored ammo is
    /// lost with the building.
    pub fn reclaim_reservoir(&mut self, pos: TilePos) {
        self.cannon_ammo.remove(&pos);
    }
}

/// Events generated by one production tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EconomyEvent {
    /// A gold mine harvested from an adjacent gold deposit.
    GoldMined {
        /// The mine's position.
        pos: TilePos,
        /// Gold added.
        amount: u32,
    },
    /// A sawmill harvested from an adjacent tree deposit.
    WoodCut {
        /// The sawmill's position.
        pos: TilePos,
        /// Wood added.
        amount: u32,
    },
    /// An iron mine harvested from an adjacent iron deposit.
    IronMined {
        /// The mine's position.
        pos: TilePos,
        /// Iron added.
        amount: u32,
    },
    /// A factory converted iron into an ammo core.
    AmmoForged {
        /// The factory's position.
        pos: TilePos,
    },
    /// A cannon pulled ammo cores from the shared pool.
    AmmoLoaded {
        /// The cannon's position.
        pos: TilePos,
        /// Units moved into the reservoir.
        amount: u32,
    },
}

/// Run one production tick.
///
/// Only buildings whose position is in `connected` participate; an
/// unpowered building produces and consumes nothing. A powered harvester
/// with no adjacent deposit of its kind is a silent no-op, not an error.
///
/// The caller guarantees `connected` was recomputed from `registry` in the
/// same frame.
pub fn production_tick(
    economy: &mut EconomyState,
    registry: &BuildingRegistry,
    grid: &DepositGrid,
    connected: &ConnectivitySet,
) -> Vec<EconomyEvent> {
    let mut events = Vec::new();

    // Pass 1: harvesting.
    for building in registry.iter() {
        if !connected.contains(building.pos) {
            continue;
        }
        let Some(required) = building.kind.required_deposit() else {
            continue;
        };
        if !grid.has_adjacent_deposit(building.pos, required) {
            continue;
        }

        match building.kind {
            BuildingKind::GoldMine => {
                economy.gold += GOLD_YIELD;
                events.push(EconomyEvent::GoldMined {
                    pos: building.pos,
                    amount: GOLD_YIELD,
                });
            }
            BuildingKind::Sawmill => {
                economy.wood += WOOD_YIELD;
                events.push(EconomyEvent::WoodCut {
                    pos: building.pos,
                    amount: WOOD_YIELD,
                });
            }
            BuildingKind::IronMine => {
                economy.iron += IRON_YIELD;
                events.push(EconomyEvent::IronMined {
                    pos: building.pos,
                    amount: IRON_YIELD,
                });
            }
            _ => {}
        }
    }

    // Pass 2: conversion and distribution, in registry order.
    for building in registry.iter() {
        if !connected.contains(building.pos) {
            continue;
        }
        match building.kind {
            BuildingKind::Factory => {
                // One unit of conversion per factory per tick; factories
                // contend for the shared iron pool in registry order.
                if economy.iron >= FACTORY_CONVERSION {
                    economy.iron -= FACTORY_CONVERSION;
                    economy.ammo_cores += FACTORY_CONVERSION;
                    events.push(EconomyEvent::AmmoForged { pos: building.pos });
                }
            }
            BuildingKind::Cannon => {
                let reservoir = economy.cannon_ammo.entry(building.pos).or_insert(0);
                let mut loaded = 0;
                while *reservoir < CANNON_AMMO_CAP && economy.ammo_cores > 0 {
                    *reservoir += 1;
                    economy.ammo_cores -= 1;
                    loaded += 1;
                }
                if loaded > 0 {
                    events.push(EconomyEvent::AmmoLoaded {
                        pos: building.pos,
                        amount: loaded,
                    });
                }
            }
            _ => {}
        }
    }

    tracing::trace!(
        gold = economy.gold,
        wood = economy.wood,
        iron = economy.iron,
        ammo_cores = economy.ammo_cores,
        events = events.len(),
        "production tick complete"
    );

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity;
    use crate::grid::DepositKind;

    /// Build a powered test rig: base at (0,0), a transporter at (3,0),
    /// and the given buildings placed on a grid with the given deposits.
    fn rig(
        deposits: &[(i32, i32, DepositKind)],
        buildings: &[(BuildingKind, i32, i32)],
    ) -> (DepositGrid, BuildingRegistry, ConnectivitySet) {
        let mut grid = DepositGrid::new(40, 40);
        for &(x, y, kind) in deposits {
            grid.set_deposit(TilePos::new(x, y), kind);
        }

        let mut registry = BuildingRegistry::new();
        assert!(registry
            .try_place(&grid, BuildingKind::Base, TilePos::new(0, 0))
            .is_accepted());
        assert!(registry
            .try_place(&grid, BuildingKind::Transporter, TilePos::new(3, 0))
            .is_accepted());
        for &(kind, x, y) in buildings {
            let outcome = registry.try_place(&grid, kind, TilePos::new(x, y));
            assert!(outcome.is_accepted(), "fixture placement failed: {kind:?}");
        }

        let connected = connectivity::recompute(&registry);
        (grid, registry, connected)
    }

    #[test]
    fn test_gold_mine_yield() {
        // One powered gold mine, 5 gold per tick.
        let (grid, registry, connected) = rig(
            &[(5, 1, DepositKind::Gold)],
            &[(BuildingKind::GoldMine, 5, 0)],
        );
        let mut economy = EconomyState::new();

        production_tick(&mut economy, &registry, &grid, &connected);
        assert_eq!(economy.gold, 5);
        production_tick(&mut economy, &registry, &grid, &connected);
        assert_eq!(economy.gold, 10);
    }

    #[test]
    fn test_all_harvester_yields() {
        let (grid, registry, connected) = rig(
            &[
                (5, 1, DepositKind::Gold),
                (1, 3, DepositKind::Tree),
                (3, 3, DepositKind::Iron),
            ],
            &[
                (BuildingKind::GoldMine, 5, 0),
                (BuildingKind::Sawmill, 1, 2),
                (BuildingKind::IronMine, 3, 2),
            ],
        );
        let mut economy = EconomyState::new();

        let events = production_tick(&mut economy, &registry, &grid, &connected);
        assert_eq!(economy.gold, GOLD_YIELD);
        assert_eq!(economy.wood, WOOD_YIELD);
        assert_eq!(economy.iron, IRON_YIELD);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_unpowered_building_is_inert() {
        // Gold mine far outside transporter range.
        let (grid, registry, connected) = rig(
            &[(30, 31, DepositKind::Gold)],
            &[(BuildingKind::GoldMine, 30, 30)],
        );
        assert!(!connected.contains(TilePos::new(30, 30)));

        let mut economy = EconomyState::new();
        production_tick(&mut economy, &registry, &grid, &connected);
        assert_eq!(economy.gold, 0);
    }

    #[test]
    fn test_harvester_without_deposit_is_noop() {
        // Powered sawmill with no tree anywhere near: silently idle.
        let (grid, registry, connected) =
            rig(&[], &[(BuildingKind::Archer, 1, 1)]);
        let mut registry = registry;
        // Force a sawmill in without the adjacency rule by building next
        // to a tree, then checking a mine whose deposit is the wrong kind.
        let mut grid = grid;
        grid.set_deposit(TilePos::new(2, 1), DepositKind::Tree);
        assert!(registry
            .try_place(&grid, BuildingKind::Sawmill, TilePos::new(2, 2))
            .is_accepted());
        // Remove the deposit again to model a mill that lost its tree.
        grid.set_deposit(TilePos::new(2, 1), DepositKind::None);

        let connected = connectivity::recompute(&registry);
        assert!(connected.contains(TilePos::new(2, 2)));

        let mut economy = EconomyState::new();
        let events = production_tick(&mut economy, &registry, &grid, &connected);
        assert_eq!(economy.wood, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_factory_consumes_fresh_iron_same_tick() {
        // Iron mined in pass 1 is converted in pass 2 of the same tick.
        let (grid, registry, connected) = rig(
            &[(5, 1, DepositKind::Iron)],
            &[(BuildingKind::IronMine, 5, 0), (BuildingKind::Factory, 2, 1)],
        );
        let mut economy = EconomyState::new();

        production_tick(&mut economy, &registry, &grid, &connected);
        assert_eq!(economy.iron, 0);
        assert_eq!(economy.ammo_cores, 1);
    }

    #[test]
    fn test_factory_idles_without_iron() {
        let (grid, registry, connected) = rig(&[], &[(BuildingKind::Factory, 2, 1)]);
        let mut economy = EconomyState::new();

        let events = production_tick(&mut economy, &registry, &grid, &connected);
        assert_eq!(economy.ammo_cores, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_factories_contend_in_registry_order() {
        // Two factories, one unit of iron: only the first-placed converts.
        let (grid, registry, connected) = rig(
            &[],
            &[(BuildingKind::Factory, 2, 1), (BuildingKind::Factory, 4, 1)],
        );
        let mut economy = EconomyState::new();
        economy.iron = 1;

        let events = production_tick(&mut economy, &registry, &grid, &connected);
        assert_eq!(economy.ammo_cores, 1);
        assert_eq!(
            events,
            vec![EconomyEvent::AmmoForged {
                pos: TilePos::new(2, 1)
            }]
        );
    }

    #[test]
    fn test_cannon_tops_off_reservoir() {
        // Reservoir 19, pool 5 -> reservoir 20, pool 4.
        let (grid, registry, connected) = rig(&[], &[(BuildingKind::Cannon, 2, 1)]);
        let mut economy = EconomyState::new();
        economy.ammo_cores = 5;
        economy.cannon_ammo.insert(TilePos::new(2, 1), 19);

        production_tick(&mut economy, &registry, &grid, &connected);
        assert_eq!(economy.reservoir(TilePos::new(2, 1)), 20);
        assert_eq!(economy.ammo_cores, 4);
    }

    #[test]
    fn test_first_cannon_starves_later_ones() {
        // A single cannon may drain up to its full cap in one tick,
        // leaving later cannons (registry order) with the remainder.
        let (grid, registry, connected) = rig(
            &[],
            &[(BuildingKind::Cannon, 2, 1), (BuildingKind::Cannon, 4, 1)],
        );
        let mut economy = EconomyState::new();
        economy.ammo_cores = 25;

        production_tick(&mut economy, &registry, &grid, &connected);
        assert_eq!(economy.reservoir(TilePos::new(2, 1)), CANNON_AMMO_CAP);
        assert_eq!(economy.reservoir(TilePos::new(4, 1)), 5);
        assert_eq!(economy.ammo_cores, 0);
    }

    #[test]
    fn test_reservoir_never_exceeds_cap_and_pool_never_negative() {
        let (grid, registry, connected) = rig(&[], &[(BuildingKind::Cannon, 2, 1)]);
        let mut economy = EconomyState::new();
        economy.ammo_cores = 100;

        for _ in 0..10 {
            production_tick(&mut economy, &registry, &grid, &connected);
            let r = economy.reservoir(TilePos::new(2, 1));
            assert!(r <= CANNON_AMMO_CAP);
        }
        assert_eq!(economy.reservoir(TilePos::new(2, 1)), CANNON_AMMO_CAP);
        assert_eq!(economy.ammo_cores, 80);
    }

    #[test]
    fn test_reclaim_reservoir() {
        let mut economy = EconomyState::new();
        economy.cannon_ammo.insert(TilePos::new(1, 1), 7);
        economy.reclaim_reservoir(TilePos::new(1, 1));
        assert_eq!(economy.reservoir(TilePos::new(1, 1)), 0);
        assert!(economy.cannon_ammo.is_empty());
    }
}
