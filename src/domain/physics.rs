/// Rock and gem physics: one cellular-automaton sweep per tick.
///
/// ## Scan order
///
/// Interior cells only, rows bottom → top, columns right → left.
/// Lower rows are final by the time a row is visited, so "what is below"
/// is always a resolved cell. An object moved down or right lands on an
/// already-visited cell and is not moved twice in one pass.
///
/// ## Transition table ("below" = same column, row + 1)
///
/// ┌───────────────────┬─────────────────────────────────┬─────────────────────────────┐
/// │ Cell              │ Condition                       │ Result                      │
/// ├───────────────────┼─────────────────────────────────┼─────────────────────────────┤
/// │ Settling          │ always                          │ → Falling                   │
/// │ Resting           │ below Empty                     │ → Falling in place          │
/// │ Resting           │ below resting, left+down-left   │ → Falling in place          │
/// │                   │   Empty (else right+down-right) │                             │
/// │ Resting           │ otherwise                       │ unchanged                   │
/// │ Falling           │ below Empty                     │ move down                   │
/// │ Falling           │ below resting, left+down-left   │ move left as Settling       │
/// │ Falling           │ below resting, right+down-right │ move right as Falling       │
/// │ Falling           │ below resting, both sides shut  │ unchanged                   │
/// │ Falling           │ below Falling                   │ unchanged (wait)            │
/// │ Falling           │ below Player                    │ crush, cell left as is      │
/// │ Falling           │ otherwise                       │ land → Resting              │
/// └───────────────────┴─────────────────────────────────┴─────────────────────────────┘
///
/// The left roll goes through a Settling tile because the scan has not
/// reached the left neighbour yet; it is finalized to Falling when the
/// scan gets there, never stepped twice. The right neighbour was already
/// visited, so it is written as Falling directly.

use super::grid::Grid;
use super::tile::Tile;

/// Summary of one physics pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhysicsReport {
    /// A falling object reached the player's cell.
    pub crushed: bool,
    /// Falling objects that came to rest this pass.
    pub landed: u32,
    /// Falling objects that changed cell this pass.
    pub moved: u32,
}

/// Advance every rock and gem by at most one step.
pub fn physics_pass(grid: &mut Grid) -> PhysicsReport {
    let mut report = PhysicsReport::default();
    let (w, h) = (grid.width(), grid.height());
    if w < 3 || h < 3 {
        return report;
    }

    for row in (1..h - 1).rev() {
        for col in (1..w - 1).rev() {
            let tile = grid.get(row, col);
            match tile {
                Tile::GemSettling | Tile::RockSettling => {
                    grid.set(row, col, tile.falling());
                }
                Tile::Gem | Tile::Rock => update_resting(grid, row, col, tile),
                Tile::FallingGem | Tile::FallingRock => {
                    update_falling(grid, row, col, tile, &mut report);
                }
                Tile::Wall
                | Tile::Empty
                | Tile::Path
                | Tile::Player
                | Tile::Exit
                | Tile::Border => {}
            }
        }
    }

    report
}

/// Left and down-left both Empty.
#[inline]
fn can_roll_left(grid: &Grid, row: usize, col: usize) -> bool {
    grid.get(row, col - 1) == Tile::Empty && grid.get(row + 1, col - 1) == Tile::Empty
}

/// Right and down-right both Empty.
#[inline]
fn can_roll_right(grid: &Grid, row: usize, col: usize) -> bool {
    grid.get(row, col + 1) == Tile::Empty && grid.get(row + 1, col + 1) == Tile::Empty
}

fn update_resting(grid: &mut Grid, row: usize, col: usize, tile: Tile) {
    let below = grid.get(row + 1, col);
    if below == Tile::Empty {
        grid.set(row, col, tile.falling());
    } else if below.is_resting_object()
        && (can_roll_left(grid, row, col) || can_roll_right(grid, row, col))
    {
        // Starts to roll; the sideways step happens next pass.
        grid.set(row, col, tile.falling());
    }
}

fn update_falling(grid: &mut Grid, row: usize, col: usize, tile: Tile, report: &mut PhysicsReport) {
    let below = grid.get(row + 1, col);
    match below {
        Tile::Empty => {
            grid.set(row, col, Tile::Empty);
            grid.set(row + 1, col, tile);
            report.moved += 1;
        }
        Tile::Rock | Tile::Gem => {
            if can_roll_left(grid, row, col) {
                grid.set(row, col, Tile::Empty);
                grid.set(row, col - 1, tile.settling());
                report.moved += 1;
            } else if can_roll_right(grid, row, col) {
                grid.set(row, col, Tile::Empty);
                grid.set(row, col + 1, tile);
                report.moved += 1;
            }
        }
        Tile::FallingRock | Tile::FallingGem => {}
        Tile::Player => {
            report.crushed = true;
        }
        Tile::Wall
        | Tile::Path
        | Tile::Exit
        | Tile::GemSettling
        | Tile::RockSettling
        | Tile::Border => {
            grid.set(row, col, tile.resting());
            report.landed += 1;
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(rows: &[&str]) -> (Grid, PhysicsReport) {
        let mut g = Grid::from_rows(rows);
        let r = physics_pass(&mut g);
        (g, r)
    }

    fn assert_rows(g: &Grid, rows: &[&str]) {
        assert_eq!(*g, Grid::from_rows(rows), "\n{g}");
    }

    // ── Settling ──

    #[test]
    fn settling_finalizes_to_falling() {
        let (g, _) = pass(&["XXXX", "XipX", "XOOX", "XXXX"]);
        assert_rows(&g, &["XXXX", "XoSX", "XOOX", "XXXX"]);
    }

    // ── Resting objects ──

    #[test]
    fn resting_over_empty_starts_falling_in_place() {
        let (g, r) = pass(&["XXX", "XOX", "X X", "XXX"]);
        assert_rows(&g, &["XXX", "XoX", "X X", "XXX"]);
        assert_eq!(r.moved, 0);
    }

    #[test]
    fn resting_gem_over_empty_starts_falling() {
        let (g, _) = pass(&["XXX", "X$X", "X X", "XXX"]);
        assert_eq!(g.get(1, 1), Tile::FallingGem);
    }

    #[test]
    fn resting_on_rock_with_room_left_starts_falling_in_place() {
        let (g, _) = pass(&["XXXX", "X OX", "X OX", "XXXX"]);
        assert_rows(&g, &["XXXX", "X oX", "X OX", "XXXX"]);
    }

    #[test]
    fn resting_on_gem_with_room_right_starts_falling_in_place() {
        let (g, _) = pass(&["XXXX", "XO X", "X$ X", "XXXX"]);
        assert_rows(&g, &["XXXX", "Xo X", "X$ X", "XXXX"]);
    }

    #[test]
    fn resting_on_rock_boxed_in_stays() {
        let (g, _) = pass(&["XXXXX", "X.O.X", "X OOX", "XXXXX"]);
        assert_eq!(g.get(1, 2), Tile::Rock);
    }

    #[test]
    fn resting_on_path_or_player_stays() {
        let (g, _) = pass(&["XXXX", "XOOX", "X.@X", "XXXX"]);
        assert_eq!(g.get(1, 1), Tile::Rock);
        assert_eq!(g.get(1, 2), Tile::Rock);
    }

    // ── Falling objects ──

    #[test]
    fn falling_moves_down_one_row() {
        let (g, r) = pass(&["XXX", "XoX", "X X", "X X", "XXX"]);
        assert_rows(&g, &["XXX", "X X", "XoX", "X X", "XXX"]);
        assert_eq!(r.moved, 1);
    }

    #[test]
    fn falling_lands_on_wall_and_path() {
        let (g, r) = pass(&["XXXX", "XoSX", "X..X", "XXXX"]);
        assert_rows(&g, &["XXXX", "XO$X", "X..X", "XXXX"]);
        assert_eq!(r.landed, 2);
        let (g, _) = pass(&["XXX", "XoX", "XXX"]);
        assert_eq!(g.get(1, 1), Tile::Rock);
    }

    #[test]
    fn falling_lands_on_exit() {
        let (g, _) = pass(&["XXX", "XSX", "XEX", "XXX"]);
        assert_eq!(g.get(1, 1), Tile::Gem);
    }

    #[test]
    fn falling_onto_rock_rolls_left_via_settling_then_finalizes() {
        // Left neighbour is visited after the source in the same row,
        // so the Settling marker is finalized within the same pass.
        let (g, r) = pass(&["XXXX", "X oX", "X OX", "XXXX"]);
        assert_rows(&g, &["XXXX", "Xo X", "X OX", "XXXX"]);
        assert_eq!(r.moved, 1);
    }

    #[test]
    fn falling_onto_rock_rolls_right_directly() {
        let (g, _) = pass(&["XXXX", "Xo X", "XO X", "XXXX"]);
        assert_rows(&g, &["XXXX", "X oX", "XO X", "XXXX"]);
    }

    #[test]
    fn falling_prefers_left_roll() {
        let (g, _) = pass(&["XXXXX", "X o X", "X O X", "XXXXX"]);
        assert_rows(&g, &["XXXXX", "Xo  X", "X O X", "XXXXX"]);
    }

    #[test]
    fn falling_on_rock_with_no_room_waits() {
        let (g, r) = pass(&["XXXXX", "X.o.X", "X.O.X", "XXXXX"]);
        assert_eq!(g.get(1, 2), Tile::FallingRock);
        assert_eq!(r, PhysicsReport::default());
    }

    #[test]
    fn falling_waits_for_falling_below() {
        // The lower object is blocked on a rock with no room, so it stays
        // Falling, and the upper one waits behind it.
        let (g, _) = pass(&["XXXXX", "X.o.X", "X.o.X", "X.O.X", "XXXXX"]);
        assert_eq!(g.get(1, 2), Tile::FallingRock);
        assert_eq!(g.get(2, 2), Tile::FallingRock);
    }

    #[test]
    fn stacked_fall_moves_as_a_column() {
        // Bottom-up scan: the lower object moves first, freeing the cell.
        let (g, _) = pass(&["XXX", "XoX", "XSX", "X X", "XXX"]);
        assert_rows(&g, &["XXX", "X X", "XoX", "XSX", "XXX"]);
    }

    // ── Crush ──

    #[test]
    fn falling_onto_player_crushes_and_leaves_cell() {
        let (g, r) = pass(&["XXX", "XoX", "X@X", "XXX"]);
        assert!(r.crushed);
        assert_eq!(g.get(1, 1), Tile::FallingRock);
        assert_eq!(g.get(2, 1), Tile::Player);
    }

    #[test]
    fn falling_gem_crushes_too() {
        let (g, r) = pass(&["XXX", "XSX", "X@X", "XXX"]);
        assert!(r.crushed);
        assert_eq!(g.get(1, 1), Tile::FallingGem);
        assert_eq!(g.get(2, 1), Tile::Player);
    }

    #[test]
    fn resting_rock_over_player_is_harmless() {
        let (g, r) = pass(&["XXX", "XOX", "X@X", "XXX"]);
        assert!(!r.crushed);
        assert_eq!(g.get(1, 1), Tile::Rock);
    }

    // ── Multi-pass ──

    #[test]
    fn straight_fall_over_several_passes() {
        let mut g = Grid::from_rows(&["XXX", "XOX", "X X", "X X", "X X", "XXX"]);
        physics_pass(&mut g);
        assert_eq!(g.get(1, 1), Tile::FallingRock);
        for row in 2..=4 {
            physics_pass(&mut g);
            assert_eq!(g.get(row, 1), Tile::FallingRock);
            assert_eq!(g.get(row - 1, 1), Tile::Empty);
        }
        physics_pass(&mut g);
        assert_eq!(g.get(4, 1), Tile::Rock);
        let settled = g.clone();
        physics_pass(&mut g);
        assert_eq!(g, settled);
    }

    #[test]
    fn rock_rolls_off_rock_in_four_passes() {
        let mut g = Grid::from_rows(&["XXXX", "X OX", "X OX", "XXXX"]);
        physics_pass(&mut g);
        assert_rows(&g, &["XXXX", "X oX", "X OX", "XXXX"]);
        physics_pass(&mut g);
        assert_rows(&g, &["XXXX", "Xo X", "X OX", "XXXX"]);
        physics_pass(&mut g);
        assert_rows(&g, &["XXXX", "X  X", "XoOX", "XXXX"]);
        physics_pass(&mut g);
        assert_rows(&g, &["XXXX", "X  X", "XOOX", "XXXX"]);
    }

    #[test]
    fn ring_of_rocks_without_room_stays_put() {
        let (g, _) = pass(&["OOO", "O O", "OOO"]);
        assert_rows(&g, &["OOO", "O O", "OOO"]);
    }
}
