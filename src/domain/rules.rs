/// Player action rules, as a truth table.
///
/// One directional input is resolved against the tile adjacent to the
/// player. The grid and player position are mutated in place; counters
/// and terminal flags are left to the caller via `PlayerOutcome`.
///
/// ## Truth Table
///
/// ┌───────────────────────┬────────────────┬──────────────────────────────┐
/// │ Target tile           │ Direction      │ Result                       │
/// ├───────────────────────┼────────────────┼──────────────────────────────┤
/// │ Empty / Path          │ any            │ Moved, Empty left behind     │
/// │ Gem                   │ any            │ Collected (move + counter)   │
/// │ Exit                  │ any            │ Won, player stays            │
/// │ Rock                  │ Left / Right   │ Pushed if cell beyond Empty  │
/// │ Rock                  │ Up / Down      │ Blocked                      │
/// │ FallingRock / Gem     │ Up             │ Killed                       │
/// │ FallingRock / Gem     │ Down/Left/Right│ Blocked                      │
/// │ anything else         │ any            │ Blocked                      │
/// └───────────────────────┴────────────────┴──────────────────────────────┘
///
/// Only walking *up* into a falling object kills. The other directions
/// are blocked; see DESIGN.md for the open question.

use super::grid::Grid;
use super::tile::Tile;

/// One logical input per tick. `None` is a real value: "no key this tick".
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `(d_row, d_col)` unit step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::None => (0, 0),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// What the resolver did with this tick's input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlayerOutcome {
    /// No input this tick.
    Idle,
    Moved,
    /// Moved onto a gem at `at`.
    Collected { at: (usize, usize) },
    /// Pushed a rock; it now rests at `rock_to`.
    Pushed { rock_to: (usize, usize) },
    Blocked,
    Won,
    Killed,
}

/// `pos` moved `n` cells in `dir`, or `None` if it would leave usize space.
fn offset(pos: (usize, usize), dir: Direction, n: isize) -> Option<(usize, usize)> {
    let (dr, dc) = dir.delta();
    let row = pos.0.checked_add_signed(dr * n)?;
    let col = pos.1.checked_add_signed(dc * n)?;
    Some((row, col))
}

fn tile_at(grid: &Grid, pos: Option<(usize, usize)>) -> Tile {
    match pos {
        Some((r, c)) => grid.get(r, c),
        None => Tile::Wall,
    }
}

fn move_player(grid: &mut Grid, pos: &mut (usize, usize), to: (usize, usize)) {
    grid.set(pos.0, pos.1, Tile::Empty);
    grid.set(to.0, to.1, Tile::Player);
    *pos = to;
}

/// Resolve one input against `grid`. `pos` is the cached player position
/// and is updated when the player moves.
pub fn resolve_player(grid: &mut Grid, pos: &mut (usize, usize), dir: Direction) -> PlayerOutcome {
    if dir == Direction::None {
        return PlayerOutcome::Idle;
    }

    let next = offset(*pos, dir, 1);
    let target = match next {
        Some(t) => t,
        None => return PlayerOutcome::Blocked,
    };

    match grid.get(target.0, target.1) {
        Tile::Empty | Tile::Path => {
            move_player(grid, pos, target);
            PlayerOutcome::Moved
        }
        Tile::Gem => {
            move_player(grid, pos, target);
            PlayerOutcome::Collected { at: target }
        }
        Tile::Exit => PlayerOutcome::Won,
        Tile::Rock if dir.is_horizontal() => {
            let beyond = offset(*pos, dir, 2);
            match beyond {
                Some(b) if tile_at(grid, beyond) == Tile::Empty => {
                    grid.set(b.0, b.1, Tile::Rock);
                    move_player(grid, pos, target);
                    PlayerOutcome::Pushed { rock_to: b }
                }
                _ => PlayerOutcome::Blocked,
            }
        }
        Tile::Rock => PlayerOutcome::Blocked,
        Tile::FallingRock | Tile::FallingGem if dir == Direction::Up => PlayerOutcome::Killed,
        Tile::FallingRock | Tile::FallingGem => PlayerOutcome::Blocked,
        Tile::Wall
        | Tile::GemSettling
        | Tile::RockSettling
        | Tile::Player
        | Tile::Border => PlayerOutcome::Blocked,
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(rows: &[&str]) -> (Grid, (usize, usize)) {
        let g = Grid::from_rows(rows);
        let p = g.find(Tile::Player).expect("fixture has a player");
        (g, p)
    }

    // ── Movement ──

    #[test]
    fn none_is_idle() {
        let (mut g, mut p) = setup(&["XXX", "X@X", "XXX"]);
        let before = g.clone();
        assert_eq!(resolve_player(&mut g, &mut p, Direction::None), PlayerOutcome::Idle);
        assert_eq!(g, before);
    }

    #[test]
    fn walk_into_empty_and_path() {
        let (mut g, mut p) = setup(&["XXXXX", "X .@X", "XXXXX"]);
        assert_eq!(resolve_player(&mut g, &mut p, Direction::Left), PlayerOutcome::Moved);
        assert_eq!(p, (1, 2));
        assert_eq!(g.get(1, 3), Tile::Empty);
        assert_eq!(resolve_player(&mut g, &mut p, Direction::Left), PlayerOutcome::Moved);
        assert_eq!(p, (1, 1));
        assert_eq!(g.get(1, 2), Tile::Empty);
        assert_eq!(g.get(1, 1), Tile::Player);
    }

    #[test]
    fn wall_blocks() {
        let (mut g, mut p) = setup(&["XXX", "X@X", "XXX"]);
        for d in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert_eq!(resolve_player(&mut g, &mut p, d), PlayerOutcome::Blocked);
        }
        assert_eq!(p, (1, 1));
    }

    // ── Gems ──

    #[test]
    fn collect_gem_from_every_direction() {
        let cases = [
            (Direction::Up, &["XXX", "X$X", "X@X", "XXX"][..], (1, 1)),
            (Direction::Down, &["XXX", "X@X", "X$X", "XXX"][..], (2, 1)),
            (Direction::Left, &["XXXX", "X$@X", "XXXX"][..], (1, 1)),
            (Direction::Right, &["XXXX", "X@$X", "XXXX"][..], (1, 2)),
        ];
        for (dir, rows, gem) in cases {
            let (mut g, mut p) = setup(rows);
            let start = p;
            assert_eq!(resolve_player(&mut g, &mut p, dir), PlayerOutcome::Collected { at: gem });
            assert_eq!(p, gem);
            assert_eq!(g.get(start.0, start.1), Tile::Empty);
            assert_eq!(g.count(Tile::Gem), 0);
        }
    }

    // ── Exit ──

    #[test]
    fn exit_wins_without_moving() {
        let (mut g, mut p) = setup(&["XXXX", "X@EX", "XXXX"]);
        assert_eq!(resolve_player(&mut g, &mut p, Direction::Right), PlayerOutcome::Won);
        assert_eq!(p, (1, 1));
        assert_eq!(g.get(1, 1), Tile::Player);
        assert_eq!(g.get(1, 2), Tile::Exit);
    }

    // ── Push ──

    #[test]
    fn push_rock_right() {
        let (mut g, mut p) = setup(&["XXXXX", "X@O X", "XXXXX"]);
        assert_eq!(
            resolve_player(&mut g, &mut p, Direction::Right),
            PlayerOutcome::Pushed { rock_to: (1, 3) }
        );
        assert_eq!(p, (1, 2));
        assert_eq!(g.get(1, 1), Tile::Empty);
        assert_eq!(g.get(1, 2), Tile::Player);
        assert_eq!(g.get(1, 3), Tile::Rock);
    }

    #[test]
    fn push_rock_left() {
        let (mut g, mut p) = setup(&["XXXXX", "X O@X", "XXXXX"]);
        assert_eq!(
            resolve_player(&mut g, &mut p, Direction::Left),
            PlayerOutcome::Pushed { rock_to: (1, 1) }
        );
        assert_eq!(p, (1, 2));
        assert_eq!(g.get(1, 1), Tile::Rock);
    }

    #[test]
    fn push_blocked_when_beyond_not_empty() {
        for beyond in [".", "O", "$", "X"] {
            let row = format!("X@O{beyond}X");
            let (mut g, mut p) = setup(&["XXXXX", &row, "XXXXX"]);
            let before = g.clone();
            assert_eq!(resolve_player(&mut g, &mut p, Direction::Right), PlayerOutcome::Blocked);
            assert_eq!(g, before);
            assert_eq!(p, (1, 1));
        }
    }

    #[test]
    fn rock_blocks_vertically() {
        let (mut g, mut p) = setup(&["XXX", "XOX", "X@X", "X X", "XXX"]);
        assert_eq!(resolve_player(&mut g, &mut p, Direction::Up), PlayerOutcome::Blocked);
        assert_eq!(g.get(1, 1), Tile::Rock);
    }

    // ── Falling objects ──

    #[test]
    fn walking_up_into_falling_object_kills() {
        for above in ["o", "S"] {
            let (mut g, mut p) = setup(&["XXX", &format!("X{above}X"), "X@X", "XXX"]);
            assert_eq!(resolve_player(&mut g, &mut p, Direction::Up), PlayerOutcome::Killed);
            assert_eq!(p, (2, 1));
        }
    }

    #[test]
    fn walking_sideways_into_falling_object_is_blocked() {
        let (mut g, mut p) = setup(&["XXXX", "X@oX", "XXXX"]);
        assert_eq!(resolve_player(&mut g, &mut p, Direction::Right), PlayerOutcome::Blocked);
        assert_eq!(g.get(1, 2), Tile::FallingRock);
    }

    #[test]
    fn walking_down_into_falling_object_is_blocked() {
        for below in ["o", "S"] {
            let (mut g, mut p) = setup(&["XXX", "X@X", &format!("X{below}X"), "XXX"]);
            assert_eq!(resolve_player(&mut g, &mut p, Direction::Down), PlayerOutcome::Blocked);
            assert_eq!(p, (1, 1));
            assert_eq!(g.get(1, 1), Tile::Player);
        }
    }

    #[test]
    fn walking_left_into_falling_gem_is_blocked() {
        let (mut g, mut p) = setup(&["XXXX", "XS@X", "XXXX"]);
        assert_eq!(resolve_player(&mut g, &mut p, Direction::Left), PlayerOutcome::Blocked);
        assert_eq!(g.get(1, 1), Tile::FallingGem);
        assert_eq!(p, (1, 2));
    }
}
