//! Building registry and placement validation.
//!
//! Placement is a pure gate: every precondition is checked in a fixed order
//! and the first failure rejects the request with a discrete outcome, never
//! an error. A rejected placement has no side effects.
//!
//! Invariants maintained here:
//! - at most one Base exists per session
//! - no two buildings share a tile
//! - no building stands on a deposit tile

use serde::{Deserialize, Serialize};

use crate::grid::{DepositGrid, DepositKind, TilePos};

/// The kinds of structure a player can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    /// The single command structure; root of the transporter network.
    Base,
    /// Harvests adjacent gold deposits.
    GoldMine,
    /// Relay node that extends the powered network.
    Transporter,
    /// Harvests adjacent tree deposits.
    Sawmill,
    /// Defensive structure (no attack behaviour in the core).
    Archer,
    /// Harvests adjacent iron deposits.
    IronMine,
    /// Converts iron into ammo cores.
    Factory,
    /// Defensive structure with a local ammo reservoir.
    Cannon,
}

impl BuildingKind {
    /// All placeable kinds, in build-bar order.
    pub const ALL: [Self; 8] = [
        Self::Base,
        Self::GoldMine,
        Self::Transporter,
        Self::Sawmill,
        Self::Archer,
        Self::IronMine,
        Self::Factory,
        Self::Cannon,
    ];

    /// Deposit kind this building must be placed next to, if any.
    #[must_use]
    pub const fn required_deposit(self) -> Option<DepositKind> {
        match self {
            Self::GoldMine => Some(DepositKind::Gold),
            Self::Sawmill => Some(DepositKind::Tree),
            Self::IronMine => Some(DepositKind::Iron),
            _ => None,
        }
    }

    /// Whether this kind harvests raw resources in the production tick.
    #[must_use]
    pub const fn is_harvester(self) -> bool {
        matches!(self, Self::GoldMine | Self::Sawmill | Self::IronMine)
    }

    /// Whether this kind attaches to the transporter network as a
    /// producer or consumer (everything except Base and Transporter).
    #[must_use]
    pub const fn needs_network(self) -> bool {
        !matches!(self, Self::Base | Self::Transporter)
    }
}

/// A placed structure: a kind at a fixed tile position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// What was built.
    pub kind: BuildingKind,
    /// Where it stands.
    pub pos: TilePos,
}

impl Building {
    /// Create a new building.
    #[must_use]
    pub const fn new(kind: BuildingKind, pos: TilePos) -> Self {
        Self { kind, pos }
    }
}

/// Outcome of a placement request.
///
/// Checks run in declaration order and short-circuit; the first failing
/// check names the rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementOutcome {
    /// The building was inserted into the registry.
    Accepted,
    /// Target tile lies outside the map.
    OutOfBounds,
    /// Another building already occupies the tile.
    Occupied,
    /// The tile holds a deposit; deposits are never built over.
    BlockedByDeposit,
    /// A Base already exists and only one is allowed.
    BaseAlreadyExists,
    /// The kind requires an orthogonally adjacent deposit that is missing.
    AdjacencyNotMet,
}

impl PlacementOutcome {
    /// Whether the request was accepted.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Outcome of a deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletionOutcome {
    /// The building at the tile was removed.
    Removed(Building),
    /// No building occupies the tile.
    NotFound,
    /// The Base cannot be deleted.
    Protected,
}

/// The set of placed buildings.
///
/// Insertion order is preserved and is the iteration order of the
/// production tick, so factory/cannon contention for shared pools is
/// resolved oldest-first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingRegistry {
    buildings: Vec<Building>,
    base_placed: bool,
}

impl BuildingRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of placed buildings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Whether a Base has been placed.
    #[must_use]
    pub const fn base_placed(&self) -> bool {
        self.base_placed
    }

    /// Iterate over buildings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Building> {
        self.buildings.iter()
    }

    /// The building occupying a tile, if any.
    #[must_use]
    pub fn building_at(&self, pos: TilePos) -> Option<&Building> {
        self.buildings.iter().find(|b| b.pos == pos)
    }

    /// Iterate over buildings of one kind, in insertion order.
    pub fn of_kind(&self, kind: BuildingKind) -> impl Iterator<Item = &Building> {
        self.buildings.iter().filter(move |b| b.kind == kind)
    }

    /// Validate and apply a placement request.
    ///
    /// Preconditions are checked in order: bounds, occupancy, deposit
    /// blockage, base uniqueness, kind-specific deposit adjacency. On
    /// acceptance the building is inserted; on rejection nothing changes.
    pub fn try_place(
        &mut self,
        grid: &DepositGrid,
        kind: BuildingKind,
        pos: TilePos,
    ) -> PlacementOutcome {
        if !grid.in_bounds(pos) {
            return PlacementOutcome::OutOfBounds;
        }

        if self.building_at(pos).is_some() {
            return PlacementOutcome::Occupied;
        }

        if grid
            .deposit_at(pos)
            .is_some_and(DepositKind::is_deposit)
        {
            return PlacementOutcome::BlockedByDeposit;
        }

        if kind == BuildingKind::Base && self.base_placed {
            return PlacementOutcome::BaseAlreadyExists;
        }

        if let Some(required) = kind.required_deposit() {
            if !grid.has_adjacent_deposit(pos, required) {
                return PlacementOutcome::AdjacencyNotMet;
            }
        }

        self.buildings.push(Building::new(kind, pos));
        if kind == BuildingKind::Base {
            self.base_placed = true;
        }

        tracing::debug!(?kind, %pos, "building placed");
        PlacementOutcome::Accepted
    }

    /// Remove the building at `pos`, unless it is the Base.
    pub fn try_delete(&mut self, pos: TilePos) -> DeletionOutcome {
        let Some(index) = self.buildings.iter().position(|b| b.pos == pos) else {
            return DeletionOutcome::NotFound;
        };

        if self.buildings[index].kind == BuildingKind::Base {
            return DeletionOutcome::Protected;
        }

        let removed = self.buildings.remove(index);
        tracing::debug!(kind = ?removed.kind, pos = %removed.pos, "building deleted");
        DeletionOutcome::Removed(removed)
    }

    /// Clear all buildings and the base flag (new-game reset).
    pub fn clear(&mut self) {
        self.buildings.clear();
        self.base_placed = false;
    }
}
