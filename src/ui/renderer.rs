/// Presentation layer: diff-based terminal renderer for the 80x25 screen.
///
/// How it works:
///   1. The game composes into a `Screen` (palette-indexed cells)
///   2. `present` compares each cell with `back` (what the terminal shows)
///   3. Only changed cells are emitted, batched with `queue!`, one flush
///
/// The 80x25 screen is centred in larger terminals. Smaller terminals are
/// refused at `init`.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::palette::ColorIndex;
use crate::domain::screen::{Cell, Screen, TEXT_COLS, TEXT_ROWS};
use crate::error::{NibblesError, Result};

/// Standard 16-colour text palette.
pub fn term_color(c: ColorIndex) -> Color {
    match c & 0x0f {
        0 => Color::Black,
        1 => Color::DarkBlue,
        2 => Color::DarkGreen,
        3 => Color::DarkCyan,
        4 => Color::DarkRed,
        5 => Color::DarkMagenta,
        6 => Color::DarkYellow,
        7 => Color::Grey,
        8 => Color::DarkGrey,
        9 => Color::Blue,
        10 => Color::Green,
        11 => Color::Cyan,
        12 => Color::Red,
        13 => Color::Magenta,
        14 => Color::Yellow,
        _ => Color::White,
    }
}

/// Sentinel used to invalidate the back buffer so every cell is redrawn.
const INVALID: Cell = Cell { glyph: '?', fg: 0xff, bg: 0xff };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    back: Vec<Cell>,
    origin: (u16, u16),
    term_size: (u16, u16),
    /// Text cursor, 1-indexed screen position, shown during text entry.
    cursor: Option<(usize, usize)>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            back: vec![INVALID; TEXT_COLS * TEXT_ROWS],
            origin: (0, 0),
            term_size: (0, 0),
            cursor: None,
        }
    }

    pub fn init(&mut self) -> Result<()> {
        let (cols, rows) = terminal::size()?;
        if (cols as usize) < TEXT_COLS || (rows as usize) < TEXT_ROWS {
            return Err(NibblesError::UnsupportedDisplay { cols, rows });
        }
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Color::Black),
            Clear(ClearType::All)
        )?;
        self.set_size(cols, rows);
        log::info!("terminal {cols}x{rows}, screen origin {:?}", self.origin);
        Ok(())
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

    fn set_size(&mut self, cols: u16, rows: u16) {
        self.term_size = (cols, rows);
        self.origin = (
            cols.saturating_sub(TEXT_COLS as u16) / 2,
            rows.saturating_sub(TEXT_ROWS as u16) / 2,
        );
        self.back.fill(INVALID);
    }

    pub fn set_cursor(&mut self, at: Option<(usize, usize)>) {
        self.cursor = at;
    }

    /// Emit every cell that differs from what the terminal already shows.
    pub fn present(&mut self, screen: &Screen) -> io::Result<()> {
        let (cols, rows) = terminal::size().unwrap_or(self.term_size);
        if (cols, rows) != self.term_size {
            self.set_size(cols, rows);
            queue!(self.writer, SetBackgroundColor(Color::Black), Clear(ClearType::All))?;
        }

        let mut last_fg: Option<ColorIndex> = None;
        let mut last_bg: Option<ColorIndex> = None;
        let mut next_pos: Option<(usize, usize)> = None;

        queue!(self.writer, cursor::Hide)?;

        for row in 1..=TEXT_ROWS {
            for col in 1..=TEXT_COLS {
                let cell = screen.cell(row, col);
                let idx = (row - 1) * TEXT_COLS + (col - 1);
                if self.back[idx] == cell {
                    continue;
                }

                if next_pos != Some((row, col)) {
                    queue!(
                        self.writer,
                        MoveTo(self.origin.0 + col as u16 - 1, self.origin.1 + row as u16 - 1)
                    )?;
                }
                if last_fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(term_color(cell.fg)))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.writer, SetBackgroundColor(term_color(cell.bg)))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.writer, Print(cell.glyph))?;

                self.back[idx] = cell;
                next_pos = Some((row, col + 1));
            }
        }

        if let Some((row, col)) = self.cursor {
            queue!(
                self.writer,
                MoveTo(self.origin.0 + col as u16 - 1, self.origin.1 + row as u16 - 1),
                cursor::Show
            )?;
        }

        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bright_half_maps_to_light_colours() {
        assert_eq!(term_color(1), Color::DarkBlue);
        assert_eq!(term_color(9), Color::Blue);
        assert_eq!(term_color(14), Color::Yellow);
        assert_eq!(term_color(15), Color::White);
    }

    #[test]
    fn invalid_cell_never_matches_a_real_one() {
        for fg in 0..16u8 {
            assert_ne!(Cell { glyph: '?', fg, bg: 0 }, INVALID);
        }
    }
}
