/// Presentation layer: diff-driven terminal renderer.
///
/// How it works:
///   1. The simulation hands over a list of `DrawCmd`s (changed cells
///      plus animated gems) computed by `sim::diff`
///   2. Each command is mapped to a glyph + colours (`style_for`)
///   3. All terminal commands are batched with `queue!`, flushed once
///
/// Nothing else is ever redrawn, which keeps frames cheap and flicker-free.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::tile::Tile;
use crate::sim::diff::DrawCmd;
use crate::sim::world::{GameResult, Outcome};

const BG: Color = Color::Rgb { r: 10, g: 10, b: 40 };
const WALL_BG: Color = Color::Rgb { r: 51, g: 51, b: 81 };
const WALL_FG: Color = Color::Rgb { r: 91, g: 91, b: 91 };
const PATH_BG: Color = Color::Rgb { r: 80, g: 76, b: 60 };
const PATH_FG: Color = Color::Rgb { r: 51, g: 0, b: 25 };
const ROCK_FG: Color = Color::Rgb { r: 202, g: 198, b: 194 };
const PLAYER_FG: Color = Color::Rgb { r: 235, g: 51, b: 51 };
const EXIT_FG: Color = Color::Rgb { r: 251, g: 251, b: 15 };
const GEM_FG: Color = Color::Rgb { r: 153, g: 51, b: 255 };
const GEM_ALT_FG: Color = Color::Rgb { r: 33, g: 61, b: 255 };
const TEXT_FG: Color = Color::Rgb { r: 200, g: 200, b: 200 };

/// Glyph and colours for a cell. `None` for tiles that are never drawn.
pub fn style_for(tile: Tile, shimmer: bool) -> Option<(char, Color, Color)> {
    match tile {
        Tile::Wall => Some(('X', WALL_FG, WALL_BG)),
        Tile::Path => Some((' ', PATH_FG, PATH_BG)),
        Tile::Empty => Some((' ', BG, BG)),
        Tile::Rock => Some(('O', ROCK_FG, BG)),
        Tile::FallingRock => Some(('o', ROCK_FG, BG)),
        Tile::Gem | Tile::FallingGem => {
            let fg = if shimmer { GEM_ALT_FG } else { GEM_FG };
            Some(('$', fg, BG))
        }
        Tile::Player => Some(('@', PLAYER_FG, BG)),
        Tile::Exit => Some(('E', EXIT_FG, BG)),
        Tile::GemSettling | Tile::RockSettling | Tile::Border => None,
    }
}

/// Message shown when the game ends.
pub fn end_message(outcome: &Outcome) -> String {
    match outcome.result {
        GameResult::Died => "You died! Better luck next time!".to_string(),
        GameResult::Won => format!("You won! You collected {} gems!", outcome.gems_collected),
    }
}

pub struct Renderer {
    writer: BufWriter<Stdout>,
    /// Board height in rows; status lines go below it.
    board_h: u16,
}

impl Renderer {
    pub fn new(board_h: usize) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16 * 1024, io::stdout()),
            board_h: board_h.min(u16::MAX as usize - 2) as u16,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BG),
            Clear(ClearType::All)
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Apply one tick's draw list.
    pub fn draw(&mut self, cmds: &[DrawCmd]) -> io::Result<()> {
        for cmd in cmds {
            let (ch, fg, bg) = match style_for(cmd.tile, cmd.shimmer) {
                Some(s) => s,
                None => continue,
            };
            let (col, row) = match (u16::try_from(cmd.col), u16::try_from(cmd.row)) {
                (Ok(c), Ok(r)) => (c, r),
                _ => continue,
            };
            queue!(
                self.writer,
                MoveTo(col, row),
                SetBackgroundColor(bg),
                SetForegroundColor(fg),
                Print(ch)
            )?;
        }
        Ok(())
    }

    /// Status line under the board.
    pub fn draw_status(&mut self, gems: u32) -> io::Result<()> {
        queue!(
            self.writer,
            MoveTo(0, self.board_h),
            ResetColor,
            SetForegroundColor(TEXT_FG),
            Print(format!("Gems: {gems:<4}  arrows/WASD move, q quits")),
            ResetColor
        )
    }

    pub fn draw_end_message(&mut self, outcome: &Outcome) -> io::Result<()> {
        queue!(
            self.writer,
            MoveTo(0, self.board_h + 1),
            ResetColor,
            SetForegroundColor(TEXT_FG),
            Print(end_message(outcome)),
            ResetColor
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
