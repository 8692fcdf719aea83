/// Grid: the bounded, row-major tile buffer.
///
/// Coordinates are `(row, col)`. `width` counts every byte of a level row,
/// including the trailing `Border` column, so a level of `width × height`
/// bytes maps 1:1 onto the cell buffer.
///
/// Reads outside the grid return `Tile::Wall`; writes outside are ignored.
/// The physics pass and player resolver rely on this to stay total at
/// the edges.

use std::fmt;

use super::tile::Tile;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// A grid filled with one tile.
    #[cfg(test)]
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Grid { width, height, cells: vec![tile; width * height] }
    }

    /// Build from a pre-decoded, row-major cell vector.
    /// Returns `None` if the length does not match.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Tile>) -> Option<Self> {
        if cells.len() != width * height {
            return None;
        }
        Some(Grid { width, height, cells })
    }

    /// Fixture constructor: one string per row, level alphabet plus the
    /// in-flight chars (`o`, `S`, `i`, `p`). The `Border` column is appended.
    /// Panics on ragged rows or unknown chars.
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows[0].len() + 1;
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            assert_eq!(row.len() + 1, width, "ragged fixture row {row:?}");
            for b in row.bytes() {
                let t = match b {
                    b'o' => Tile::FallingRock,
                    b'S' => Tile::FallingGem,
                    b'i' => Tile::RockSettling,
                    b'p' => Tile::GemSettling,
                    other => Tile::from_level_byte(other)
                        .unwrap_or_else(|| panic!("unknown fixture char {:?}", other as char)),
                };
                cells.push(t);
            }
            cells.push(Tile::Border);
        }
        Grid { width, height, cells }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile {
        if row < self.height && col < self.width {
            self.cells[row * self.width + col]
        } else {
            Tile::Wall // out of bounds = wall
        }
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, tile: Tile) {
        if row < self.height && col < self.width {
            self.cells[row * self.width + col] = tile;
        }
    }

    /// Overwrite this grid with `other`, reusing the allocation.
    /// Both grids must have the same dimensions.
    pub fn copy_from(&mut self, other: &Grid) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.cells.copy_from_slice(&other.cells);
    }

    /// First cell holding `tile`, scanning row-major.
    pub fn find(&self, tile: Tile) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&t| t == tile)
            .map(|i| (i / self.width, i % self.width))
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.cells.iter().filter(|&&t| t == tile).count()
    }

    /// Iterate `(row, col, tile)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        let w = self.width;
        self.cells.iter().enumerate().map(move |(i, &t)| (i / w, i % w, t))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let t = self.get(row, col);
                if t == Tile::Border {
                    continue;
                }
                write!(f, "{}", t.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_appends_border_column() {
        let g = Grid::from_rows(&["XXX", "X@X", "XXX"]);
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        assert_eq!(g.get(1, 3), Tile::Border);
        assert_eq!(g.get(1, 1), Tile::Player);
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let g = Grid::filled(2, 2, Tile::Empty);
        assert_eq!(g.get(5, 0), Tile::Wall);
        assert_eq!(g.get(0, 2), Tile::Wall);
    }

    #[test]
    fn out_of_bounds_write_is_ignored() {
        let mut g = Grid::filled(2, 2, Tile::Empty);
        g.set(2, 2, Tile::Rock);
        assert_eq!(g.count(Tile::Rock), 0);
    }

    #[test]
    fn copy_from_is_independent() {
        let a = Grid::from_rows(&["X X", "XOX"]);
        let mut b = Grid::filled(a.width(), a.height(), Tile::Empty);
        b.copy_from(&a);
        assert_eq!(a, b);
        b.set(0, 1, Tile::Gem);
        assert_eq!(a.get(0, 1), Tile::Empty);
    }

    #[test]
    fn find_scans_row_major() {
        let g = Grid::from_rows(&["XXXX", "X $X", "X$ X"]);
        assert_eq!(g.find(Tile::Gem), Some((1, 2)));
        assert_eq!(g.find(Tile::Player), None);
    }

    #[test]
    fn display_skips_border() {
        let g = Grid::from_rows(&["XX", "@E"]);
        assert_eq!(g.to_string(), "XX\n@E\n");
    }
}
