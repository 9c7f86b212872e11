//! Tile grid and deposit map.
//!
//! The world is a fixed-size grid of tiles. Each tile holds at most one
//! harvestable deposit, placed once during map generation and immutable
//! afterwards. All distance checks in the simulation are Manhattan
//! (grid-native), never Euclidean.

use serde::{Deserialize, Serialize};

/// Default map width in tiles.
pub const DEFAULT_MAP_WIDTH: u32 = 40;

/// Default map height in tiles.
pub const DEFAULT_MAP_HEIGHT: u32 = 40;

/// Size of one tile in world units (used by the UI boundary to convert
/// mouse/world coordinates into tile coordinates).
pub const TILE_SIZE: f32 = 64.0;

/// A tile coordinate on the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TilePos {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

/// Orthogonal (4-connected) neighbour offsets.
pub const ORTHOGONAL_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl TilePos {
    /// Create a new tile position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another tile.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The four orthogonal neighbours of this tile (may be out of bounds).
    #[must_use]
    pub fn orthogonal_neighbours(self) -> [Self; 4] {
        ORTHOGONAL_OFFSETS.map(|(dx, dy)| Self::new(self.x + dx, self.y + dy))
    }

    /// Convert a world-space position to the tile containing it.
    #[must_use]
    pub fn from_world(world_x: f32, world_y: f32) -> Self {
        Self {
            x: (world_x / TILE_SIZE).floor() as i32,
            y: (world_y / TILE_SIZE).floor() as i32,
        }
    }
}

impl std::fmt::Display for TilePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Kind of harvestable deposit occupying a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DepositKind {
    /// Empty tile, buildable.
    #[default]
    None,
    /// Tree deposit, harvested by sawmills.
    Tree,
    /// Gold deposit, harvested by gold mines.
    Gold,
    /// Iron deposit, harvested by iron mines.
    Iron,
}

impl DepositKind {
    /// Numeric code used by the legacy save format.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Tree => 1,
            Self::Gold => 2,
            Self::Iron => 3,
        }
    }

    /// Decode a legacy save code. Returns `None` for unknown codes.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Tree),
            2 => Some(Self::Gold),
            3 => Some(Self::Iron),
            _ => None,
        }
    }

    /// Whether this tile holds an actual deposit.
    #[must_use]
    pub const fn is_deposit(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// The deposit map: a row-major grid of [`DepositKind`] values.
///
/// Static after generation; the placement validator and the production tick
/// only ever read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositGrid {
    /// Grid width in tiles.
    width: u32,
    /// Grid height in tiles.
    height: u32,
    /// Tile data stored in row-major order.
    tiles: Vec<DepositKind>,
}

impl DepositGrid {
    /// Create a new grid with every tile empty.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0, "DepositGrid width must be positive");
        assert!(height > 0, "DepositGrid height must be positive");

        let tile_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            tiles: vec![DepositKind::None; tile_count],
        }
    }

    /// Rebuild a grid from raw row-major tiles (used by the save layer).
    ///
    /// # Panics
    ///
    /// Panics if the tile count does not match `width * height`.
    #[must_use]
    pub fn from_tiles(width: u32, height: u32, tiles: Vec<DepositKind>) -> Self {
        assert_eq!(
            tiles.len(),
            (width as usize) * (height as usize),
            "tile count must match grid dimensions"
        );
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, pos: TilePos) -> usize {
        (pos.y as usize) * (self.width as usize) + (pos.x as usize)
    }

    /// Check whether a tile position lies within the grid.
    #[must_use]
    pub const fn in_bounds(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Deposit kind at a tile. Returns `None` if out of bounds.
    #[must_use]
    pub fn deposit_at(&self, pos: TilePos) -> Option<DepositKind> {
        if self.in_bounds(pos) {
            Some(self.tiles[self.index(pos)])
        } else {
            None
        }
    }

    /// Set the deposit at a tile. Returns `false` if out of bounds.
    ///
    /// Only the map generator and the save loader mutate the grid.
    pub fn set_deposit(&mut self, pos: TilePos, kind: DepositKind) -> bool {
        if self.in_bounds(pos) {
            let index = self.index(pos);
            self.tiles[index] = kind;
            true
        } else {
            false
        }
    }

    /// Whether any orthogonal neighbour of `pos` holds a deposit of `kind`.
    ///
    /// This is the adjacency rule shared by the placement validator and the
    /// harvesting pass of the production tick.
    #[must_use]
    pub fn has_adjacent_deposit(&self, pos: TilePos, kind: DepositKind) -> bool {
        pos.orthogonal_neighbours()
            .into_iter()
            .any(|n| self.deposit_at(n) == Some(kind))
    }

    /// Whether the full 3x3 neighbourhood around `pos` (clipped at grid
    /// edges) is free of deposits. The centre tile counts.
    #[must_use]
    pub fn is_isolated(&self, pos: TilePos) -> bool {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let n = TilePos::new(pos.x + dx, pos.y + dy);
                if let Some(kind) = self.deposit_at(n) {
                    if kind.is_deposit() {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Count tiles holding a deposit of `kind`.
    #[must_use]
    pub fn count_deposits(&self, kind: DepositKind) -> usize {
        self.tiles.iter().filter(|&&t| t == kind).count()
    }

    /// Iterate over all tiles with their positions, row-major.
    pub fn iter_tiles(&self) -> impl Iterator<Item = (TilePos, DepositKind)> + '_ {
        self.tiles.iter().enumerate().map(move |(i, &kind)| {
            let x = (i as u32 % self.width) as i32;
            let y = (i as u32 / self.width) as i32;
            (TilePos::new(x, y), kind)
        })
    }

    /// Raw row-major tile slice (used by the save layer and state hashing).
    #[must_use]
    pub fn tiles(&self) -> &[DepositKind] {
        &self.tiles
    }
}

impl Default for DepositGrid {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT)
    }
}
