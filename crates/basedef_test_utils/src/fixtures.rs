//! Test fixtures and helpers.
//!
//! Pre-built grids, sessions, and building layouts for consistent
//! testing across crates.

use basedef_core::prelude::*;

/// An empty 40x40 deposit grid.
#[must_use]
pub fn empty_grid() -> DepositGrid {
    DepositGrid::new(40, 40)
}

/// A grid with deposits planted at the given tiles.
///
/// # Panics
///
/// Panics if any position is out of bounds.
#[must_use]
pub fn grid_with_deposits(deposits: &[(i32, i32, DepositKind)]) -> DepositGrid {
    let mut grid = empty_grid();
    for &(x, y, kind) in deposits {
        assert!(
            grid.set_deposit(TilePos::new(x, y), kind),
            "deposit fixture out of bounds at ({x}, {y})"
        );
    }
    grid
}

/// A session on an empty grid with a Base already placed at `(x, y)`.
///
/// # Panics
///
/// Panics if the placement is rejected.
#[must_use]
pub fn session_with_base(x: i32, y: i32) -> GameSession {
    let mut session = GameSession::from_grid(empty_grid());
    let outcome = session.try_place(BuildingKind::Base, TilePos::new(x, y));
    assert!(outcome.is_accepted(), "base fixture rejected: {outcome:?}");
    session
}

/// Place a straight line of transporters starting at `start`, stepping by
/// `(dx, dy)` per hop. Returns the positions placed.
///
/// # Panics
///
/// Panics if any placement is rejected.
pub fn place_transporter_line(
    session: &mut GameSession,
    start: TilePos,
    dx: i32,
    dy: i32,
    count: u32,
) -> Vec<TilePos> {
    let mut placed = Vec::new();
    for i in 0..count {
        let i = i as i32;
        let pos = TilePos::new(start.x + dx * i, start.y + dy * i);
        let outcome = session.try_place(BuildingKind::Transporter, pos);
        assert!(outcome.is_accepted(), "transporter fixture rejected at {pos}");
        placed.push(pos);
    }
    placed
}
