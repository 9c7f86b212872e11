//! Powered-network reachability.
//!
//! Which buildings are "powered" is derived from scratch every frame from
//! the building registry - the connectivity set is a disposable view,
//! never a source of truth, and nothing is memoised across frames.
//!
//! The network model has two layers:
//! 1. A relay chain: transporters link to a Base (or to an
//!    already-linked transporter) within Manhattan distance
//!    [`LINK_RANGE`], up to [`MAX_RELAY_HOPS`] hops deep. Past the hop
//!    ceiling the chain carries no further.
//! 2. Last-mile attachment: any producer/consumer building within
//!    [`LINK_RANGE`] of a linked transporter is powered, regardless of how
//!    deep that transporter sits in the chain.
//!
//! Recomputation is O(B^2) in the number of buildings, which is fine for a
//! player-placed registry on a 40x40 map.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::buildings::{BuildingKind, BuildingRegistry};
use crate::grid::TilePos;

/// Maximum transporter hops outward from a Base.
pub const MAX_RELAY_HOPS: u32 = 5;

/// Maximum Manhattan distance of a single network link.
pub const LINK_RANGE: i32 = 5;

/// The set of tile positions currently powered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivitySet {
    positions: HashSet<TilePos>,
}

impl ConnectivitySet {
    /// An empty set (nothing powered).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the building at `pos` is powered.
    #[must_use]
    pub fn contains(&self, pos: TilePos) -> bool {
        self.positions.contains(&pos)
    }

    /// Number of powered positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing is powered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over powered positions (arbitrary order).
    pub fn iter(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.positions.iter().copied()
    }

    fn insert(&mut self, pos: TilePos) -> bool {
        self.positions.insert(pos)
    }
}

/// Recompute the powered set from the current registry.
///
/// Pure function of the registry: same buildings in, same set out. The
/// result wholly replaces any previous set.
#[must_use]
pub fn recompute(registry: &BuildingRegistry) -> ConnectivitySet {
    let mut connected = ConnectivitySet::new();
    let mut queue: VecDeque<(TilePos, u32)> = VecDeque::new();

    // Every Base is powered at depth 0.
    for base in registry.of_kind(BuildingKind::Base) {
        connected.insert(base.pos);
        queue.push_back((base.pos, 0));
    }

    // Relay chain: breadth-first over transporters, bounded by hop count.
    while let Some((node, depth)) = queue.pop_front() {
        if depth >= MAX_RELAY_HOPS {
            continue;
        }
        for transporter in registry.of_kind(BuildingKind::Transporter) {
            if connected.contains(transporter.pos) {
                continue;
            }
            if node.manhattan_distance(transporter.pos) <= LINK_RANGE {
                connected.insert(transporter.pos);
                queue.push_back((transporter.pos, depth + 1));
            }
        }
    }

    // Last-mile: producers/consumers attach to any linked transporter in
    // range, with no hop bookkeeping of their own.
    for building in registry.iter().filter(|b| b.kind.needs_network()) {
        let attached = registry.of_kind(BuildingKind::Transporter).any(|t| {
            connected.contains(t.pos)
                && building.pos.manhattan_distance(t.pos) <= LINK_RANGE
        });
        if attached {
            connected.insert(building.pos);
        }
    }

    connected
}

/// The transporter link segments implied by a powered set, for HUD display.
///
/// Returns each pair of powered buildings within link range of each other
/// where at least one endpoint is a transporter, deduplicated by ordering
/// the pair by registry index.
#[must_use]
pub fn powered_links(
    registry: &BuildingRegistry,
    connected: &ConnectivitySet,
) -> Vec<(TilePos, TilePos)> {
    let buildings: Vec<_> = registry.iter().collect();
    let mut links = Vec::new();

    for (i, a) in buildings.iter().enumerate() {
        for b in buildings.iter().skip(i + 1) {
            if a.kind != BuildingKind::Transporter && b.kind != BuildingKind::Transporter {
                continue;
            }
            if !connected.contains(a.pos) || !connected.contains(b.pos) {
                continue;
            }
            if a.pos.manhattan_distance(b.pos) <= LINK_RANGE {
                links.push((a.pos, b.pos));
            }
        }
    }

    links
}
