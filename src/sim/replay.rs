/// Headless replay: run a scripted move list without a terminal.
///
/// ## Script format
///   `U` `D` `L` `R` = one tick with that direction (case-insensitive)
///   `.`             = one tick with no input
///   whitespace      = ignored
///
/// Replays stop at the first terminal tick; remaining moves are unused.

use thiserror::Error;

use crate::domain::rules::Direction;
use super::step::step;
use super::world::{GameState, Outcome};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("invalid move {ch:?} at position {pos} (expected U, D, L, R or .)")]
    InvalidMove { pos: usize, ch: char },
}

/// Result of a replay run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReplayReport {
    /// Ticks actually processed.
    pub ticks: usize,
    /// `None` if the script ran out before the game ended.
    pub outcome: Option<Outcome>,
}

pub fn parse_moves(script: &str) -> Result<Vec<Direction>, ReplayError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(pos, ch)| match ch.to_ascii_uppercase() {
            'U' => Ok(Direction::Up),
            'D' => Ok(Direction::Down),
            'L' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            '.' => Ok(Direction::None),
            _ => Err(ReplayError::InvalidMove { pos, ch }),
        })
        .collect()
}

/// Feed `moves` to `state`, one per tick.
pub fn run(state: &mut GameState, moves: &[Direction]) -> ReplayReport {
    let mut ticks = 0;
    for &dir in moves {
        if state.is_terminal() { break; }
        step(state, dir);
        ticks += 1;
    }
    ReplayReport { ticks, outcome: state.outcome() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Grid;
    use crate::sim::world::GameResult;

    #[test]
    fn parses_script() {
        assert_eq!(
            parse_moves("Ud l\n.R").unwrap(),
            vec![Direction::Up, Direction::Down, Direction::Left, Direction::None, Direction::Right]
        );
    }

    #[test]
    fn rejects_unknown_chars() {
        assert_eq!(parse_moves("UUx"), Err(ReplayError::InvalidMove { pos: 2, ch: 'x' }));
    }

    #[test]
    fn stops_at_terminal_tick() {
        let mut s = GameState::new(Grid::from_rows(&["XXXXXX", "X@$ EX", "XXXXXX"])).unwrap();
        let moves = parse_moves("RRRRRR").unwrap();
        let report = run(&mut s, &moves);
        assert_eq!(report.ticks, 3);
        assert_eq!(
            report.outcome,
            Some(Outcome { result: GameResult::Won, gems_collected: 1 })
        );
    }

    #[test]
    fn unfinished_replay_has_no_outcome() {
        let mut s = GameState::new(Grid::from_rows(&["XXXXX", "X@  X", "XXXXX"])).unwrap();
        let report = run(&mut s, &[Direction::Right, Direction::None]);
        assert_eq!(report, ReplayReport { ticks: 2, outcome: None });
        assert_eq!(s.player, (1, 2));
    }
}
