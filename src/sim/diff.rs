/// Render differ: minimal per-tick draw list.
///
/// A cell is emitted when its tile differs between the previous committed
/// grid and the new one. Gem cells (`Gem`, `FallingGem`) are emitted every
/// tick regardless, with a two-phase shimmer keyed by tick and position.
/// Tiles outside the drawable set (`Border`, the transient `*Settling`
/// markers) never produce a command.
///
/// The tick counter only affects `shimmer`, never what is drawn where.

use crate::domain::grid::Grid;
use crate::domain::tile::Tile;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DrawCmd {
    pub row: usize,
    pub col: usize,
    pub tile: Tile,
    /// Alternate gem colour this tick. Always false for other tiles.
    pub shimmer: bool,
}

/// Can the renderer draw this tile?
pub fn is_drawable(tile: Tile) -> bool {
    match tile {
        Tile::Wall
        | Tile::Empty
        | Tile::Path
        | Tile::Gem
        | Tile::Rock
        | Tile::FallingGem
        | Tile::FallingRock
        | Tile::Player
        | Tile::Exit => true,
        Tile::GemSettling | Tile::RockSettling | Tile::Border => false,
    }
}

/// Two-phase gem colour cycle: 8 ticks per phase, offset diagonally.
#[inline]
pub fn shimmer_phase(tick: u32, row: usize, col: usize) -> bool {
    let l = tick
        .wrapping_add(row as u32)
        .wrapping_add((3 * col) as u32);
    (l % 16) / 8 == 1
}

fn command(tick: u32, row: usize, col: usize, tile: Tile) -> Option<DrawCmd> {
    if !is_drawable(tile) {
        return None;
    }
    let shimmer = tile.is_gem_like() && shimmer_phase(tick, row, col);
    Some(DrawCmd { row, col, tile, shimmer })
}

/// Changed or animated cells between two grids of equal size.
pub fn diff(prev: &Grid, next: &Grid, tick: u32) -> Vec<DrawCmd> {
    debug_assert_eq!((prev.width(), prev.height()), (next.width(), next.height()));
    next.cells()
        .filter(|&(row, col, tile)| {
            tile.is_gem_like() || prev.get(row, col) != tile
        })
        .filter_map(|(row, col, tile)| command(tick, row, col, tile))
        .collect()
}

/// Every drawable cell. Used for the first paint.
pub fn full_frame(grid: &Grid, tick: u32) -> Vec<DrawCmd> {
    grid.cells()
        .filter_map(|(row, col, tile)| command(tick, row, col, tile))
        .collect()
}
