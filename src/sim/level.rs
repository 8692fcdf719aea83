/// Level loader.
///
/// ## Sources (priority order):
///   1. Level file given on the command line / in `config.toml`
///   2. Built-in embedded level
///
/// ## Format:
///   A fixed-size block of exactly `width × height` bytes, row-major.
///   `width` counts the trailing newline of each row, so a 60-byte row is
///   59 tiles plus `'\n'`. Bytes past `width × height` are ignored; fewer
///   is an error. Nothing is ever padded or guessed.
///
/// ## Tile legend:
///   'X' = Wall        ' ' = Empty       '.' = Path
///   '$' = Gem         'O' = Rock        '@' = Player
///   'E' = Exit        '\n' = row end (border column)

use std::io;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::domain::grid::Grid;
use crate::domain::tile::Tile;

/// Level dimensions in bytes per row (including the newline) × rows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LevelDims {
    pub width: usize,
    pub height: usize,
}

impl LevelDims {
    /// Total bytes in a level file. `None` if the size does not fit `usize`.
    pub fn byte_len(self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }
}

/// Dimensions of the built-in level.
pub const BUILTIN_DIMS: LevelDims = LevelDims { width: 60, height: 26 };

const BUILTIN_LEVEL: &str = include_str!("../../levels/level_1.txt");

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read level {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("level is truncated: expected {expected} bytes ({width}x{height}), got {actual}")]
    Truncated {
        expected: usize,
        actual: usize,
        width: usize,
        height: usize,
    },
    #[error("bad level size {width}x{height}")]
    BadDimensions { width: usize, height: usize },
    #[error("row {row} is not {width} bytes ending in a newline")]
    BadRowLength { row: usize, width: usize },
    #[error("unknown tile {byte:?} at row {row}, col {col}")]
    UnknownTile { row: usize, col: usize, byte: char },
    #[error("level has no player ('@')")]
    NoPlayer,
    #[error("level has {count} players, expected one")]
    MultiplePlayers { count: usize },
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load a level file with fixed dimensions.
pub fn load_level_file(path: &Path, dims: LevelDims) -> Result<Grid, LevelError> {
    let bytes = std::fs::read(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let grid = parse_level(&bytes, dims)?;
    info!(
        "loaded level {} ({}x{}, {} gems, {} rocks)",
        path.display(),
        dims.width,
        dims.height,
        grid.count(Tile::Gem),
        grid.count(Tile::Rock),
    );
    Ok(grid)
}

/// The level compiled into the binary.
pub fn builtin_level() -> Result<Grid, LevelError> {
    let grid = parse_level(BUILTIN_LEVEL.as_bytes(), BUILTIN_DIMS)?;
    info!("loaded built-in level ({}x{})", BUILTIN_DIMS.width, BUILTIN_DIMS.height);
    Ok(grid)
}

/// Decode exactly `dims.byte_len()` bytes into a grid. Each row must end
/// with its newline in the last column, and nowhere else.
pub fn parse_level(bytes: &[u8], dims: LevelDims) -> Result<Grid, LevelError> {
    let bad_dims = LevelError::BadDimensions { width: dims.width, height: dims.height };
    if dims.width < 2 || dims.height == 0 {
        return Err(bad_dims);
    }
    let expected = dims.byte_len().ok_or(bad_dims)?;
    if bytes.len() < expected {
        return Err(LevelError::Truncated {
            expected,
            actual: bytes.len(),
            width: dims.width,
            height: dims.height,
        });
    }

    let mut cells = Vec::with_capacity(expected);
    for (row, line) in bytes[..expected].chunks_exact(dims.width).enumerate() {
        let (&last, body) = line.split_last().ok_or(LevelError::BadRowLength {
            row,
            width: dims.width,
        })?;
        if last != b'\n' || body.contains(&b'\n') {
            return Err(LevelError::BadRowLength { row, width: dims.width });
        }
        for (col, &b) in line.iter().enumerate() {
            let tile = Tile::from_level_byte(b).ok_or(LevelError::UnknownTile {
                row,
                col,
                byte: b as char,
            })?;
            cells.push(tile);
        }
    }

    let players = cells.iter().filter(|&&t| t == Tile::Player).count();
    match players {
        0 => return Err(LevelError::NoPlayer),
        1 => {}
        count => return Err(LevelError::MultiplePlayers { count }),
    }

    // Length was checked above.
    Grid::from_cells(dims.width, dims.height, cells).ok_or(LevelError::Truncated {
        expected,
        actual: bytes.len(),
        width: dims.width,
        height: dims.height,
    })
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
