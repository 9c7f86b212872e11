//! Persistence: legacy grid saves and full-session snapshots.
//!
//! Two formats coexist:
//!
//! - The **legacy grid format**: row-major whitespace-delimited deposit
//!   codes (0-3), one row per line, H rows of W columns. This is the only
//!   state the original design persisted - continuing from it resumes
//!   with an empty registry and zero resources on a previously-harvested
//!   map.
//! - The **snapshot format**: a bincode encoding of the whole
//!   [`GameSession`] - grid, buildings, economy, reservoirs, and tick
//!   accumulator - closing that gap. Prefer snapshots for new saves;
//!   keep the grid format for loading old files.

use std::io::{Read, Write};
use std::path::Path;

use crate::error::{GameError, Result};
use crate::grid::{DepositGrid, DepositKind};
use crate::session::GameSession;

/// Write a deposit grid in the legacy text format.
pub fn write_grid<W: Write>(grid: &DepositGrid, mut writer: W) -> Result<()> {
    let width = grid.width() as usize;
    for (i, tile) in grid.tiles().iter().enumerate() {
        if i % width == width - 1 {
            writeln!(writer, "{}", tile.code())?;
        } else {
            write!(writer, "{} ", tile.code())?;
        }
    }
    Ok(())
}

/// Read a deposit grid from the legacy text format.
///
/// Dimensions are inferred: the first line fixes the width and every
/// subsequent line must match it.
pub fn read_grid<R: Read>(mut reader: R) -> Result<DepositGrid> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut width = 0usize;
    let mut rows = 0usize;
    let mut tiles = Vec::new();

    for (row, line) in text.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if width == 0 {
            width = tokens.len();
        } else if tokens.len() != width {
            return Err(GameError::RaggedRow {
                row,
                found: tokens.len(),
                expected: width,
            });
        }

        for (column, token) in tokens.iter().enumerate() {
            let kind = token
                .parse::<u8>()
                .ok()
                .and_then(DepositKind::from_code)
                .ok_or_else(|| GameError::InvalidDepositCode {
                    token: (*token).to_string(),
                    row,
                    column,
                })?;
            tiles.push(kind);
        }
        rows += 1;
    }

    if tiles.is_empty() {
        return Err(GameError::EmptySave);
    }

    Ok(DepositGrid::from_tiles(width as u32, rows as u32, tiles))
}

/// Write a deposit grid to a file in the legacy format.
pub fn save_grid_file<P: AsRef<Path>>(grid: &DepositGrid, path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_grid(grid, std::io::BufWriter::new(file))
}

/// Load a deposit grid from a legacy-format file.
pub fn load_grid_file<P: AsRef<Path>>(path: P) -> Result<DepositGrid> {
    let file = std::fs::File::open(path)?;
    read_grid(std::io::BufReader::new(file))
}

/// Encode a full session snapshot.
pub fn write_snapshot<W: Write>(session: &GameSession, writer: W) -> Result<()> {
    bincode::serialize_into(writer, session).map_err(|e| GameError::Snapshot(e.to_string()))
}

/// Decode a full session snapshot.
///
/// The powered set is derived state and is rebuilt after decoding rather
/// than trusted from the file.
pub fn read_snapshot<R: Read>(reader: R) -> Result<GameSession> {
    let mut session: GameSession =
        bincode::deserialize_from(reader).map_err(|e| GameError::Snapshot(e.to_string()))?;
    session.refresh_connectivity();
    Ok(session)
}

/// Write a session snapshot to a file.
pub fn save_snapshot_file<P: AsRef<Path>>(session: &GameSession, path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_snapshot(session, std::io::BufWriter::new(file))
}

/// Load a session snapshot from a file.
pub fn load_snapshot_file<P: AsRef<Path>>(path: P) -> Result<GameSession> {
    let file = std::fs::File::open(path)?;
    read_snapshot(std::io::BufReader::new(file))
}
