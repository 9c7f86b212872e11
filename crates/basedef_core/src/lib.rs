//! # Basedef Core
//!
//! Deterministic simulation core for the base-defence game.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO inside the tick (persistence lives at the [`save`] boundary)
//! - No system randomness (map generation uses a seeded PRNG)
//!
//! The frame loop is single-threaded and cooperative: each frame
//! recomputes the powered network from the building registry, then fires
//! at most one fixed-interval production tick against that same-frame
//! connectivity.
//!
//! ## Crate Structure
//!
//! - [`grid`] - tile positions and the deposit map
//! - [`map_generation`] - isolation-constrained deposit scattering
//! - [`buildings`] - registry and placement/deletion validation
//! - [`connectivity`] - powered-network reachability
//! - [`economy`] - resource counters and the production tick
//! - [`session`] - the per-frame driver tying it all together
//! - [`save`] - legacy grid saves and full snapshots

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod buildings;
pub mod connectivity;
pub mod economy;
pub mod error;
pub mod grid;
pub mod map_generation;
pub mod save;
pub mod session;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::buildings::{
        Building, BuildingKind, BuildingRegistry, DeletionOutcome, PlacementOutcome,
    };
    pub use crate::connectivity::{
        powered_links, recompute, ConnectivitySet, LINK_RANGE, MAX_RELAY_HOPS,
    };
    pub use crate::economy::{
        production_tick, EconomyEvent, EconomyState, CANNON_AMMO_CAP, GOLD_YIELD, IRON_YIELD,
        WOOD_YIELD,
    };
    pub use crate::error::{GameError, Result};
    pub use crate::grid::{DepositGrid, DepositKind, TilePos};
    pub use crate::map_generation::{generate_deposits, GenerationConfig, MapRng};
    pub use crate::session::{GameSession, TimeScale};
}
