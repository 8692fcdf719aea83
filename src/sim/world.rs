/// GameState: the complete snapshot of a running game.
///
/// ## Double buffer
///
/// Two named grids, never aliased:
///   - `committed`: the board at the start of a tick. Read-only during it.
///   - `working`:   rebuilt from `committed` each tick and mutated by the
///                player resolver and the physics pass.
///
/// `step()` copies committed → working, mutates working, and on a
/// non-terminal tick calls `commit()` (working → committed). A terminal
/// tick keeps `working` for final inspection and commits nothing.
///
/// The player position is cached; it is derived from the grid only once,
/// at construction.

use crate::domain::grid::Grid;
use crate::domain::tile::Tile;
use super::level::LevelError;

/// How a finished game ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameResult {
    Died,
    Won,
}

/// Final report for the presenter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Outcome {
    pub result: GameResult,
    pub gems_collected: u32,
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub committed: Grid,
    pub working: Grid,
    /// Cached `(row, col)` of the player.
    pub player: (usize, usize),
    /// Wrapping tick counter. Cosmetic only (gem shimmer phase).
    pub tick: u32,
    pub gems_collected: u32,
    pub dead: bool,
    pub won: bool,
}

impl GameState {
    /// Build from a loaded grid. Fails if the grid has no player.
    pub fn new(grid: Grid) -> Result<Self, LevelError> {
        let player = grid.find(Tile::Player).ok_or(LevelError::NoPlayer)?;
        Ok(GameState {
            working: grid.clone(),
            committed: grid,
            player,
            tick: 0,
            gems_collected: 0,
            dead: false,
            won: false,
        })
    }

    /// Once dead or won, no further ticks are processed.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.dead || self.won
    }

    /// Copy the working grid over the committed one.
    pub fn commit(&mut self) {
        self.committed.copy_from(&self.working);
    }

    /// Start a tick: working = committed.
    pub fn snapshot(&mut self) {
        self.working.copy_from(&self.committed);
    }

    /// Final outcome, if the game has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        let result = if self.dead {
            GameResult::Died
        } else if self.won {
            GameResult::Won
        } else {
            return None;
        };
        Some(Outcome { result, gems_collected: self.gems_collected })
    }
}
