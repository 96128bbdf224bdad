/// Text-cell model of the 80x25 display.
///
/// Everything the game shows is composed here first (pixel glyphs, HUD,
/// banners); `ui::renderer` diffs it against what the terminal already has.
/// Rows and columns are 1-indexed like the classic text screen.

use super::palette::{ColorIndex, BLACK, WHITE};

pub const TEXT_COLS: usize = 80;
pub const TEXT_ROWS: usize = 25;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub glyph: char,
    pub fg: ColorIndex,
    pub bg: ColorIndex,
}

impl Cell {
    pub const BLANK: Cell = Cell { glyph: ' ', fg: WHITE, bg: BLACK };
}

#[derive(Clone)]
pub struct Screen {
    cells: Vec<Cell>,
}

impl Screen {
    pub fn new() -> Self {
        Screen { cells: vec![Cell::BLANK; TEXT_COLS * TEXT_ROWS] }
    }

    #[inline]
    fn index(row: usize, col: usize) -> usize {
        assert!(
            (1..=TEXT_ROWS).contains(&row) && (1..=TEXT_COLS).contains(&col),
            "text cell ({row}, {col}) is off screen"
        );
        (row - 1) * TEXT_COLS + (col - 1)
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[Self::index(row, col)]
    }

    pub fn put(&mut self, row: usize, col: usize, glyph: char, fg: ColorIndex, bg: ColorIndex) {
        self.cells[Self::index(row, col)] = Cell { glyph, fg, bg };
    }

    /// Write text left to right. Characters past column 80 are dropped.
    pub fn put_str(&mut self, row: usize, col: usize, text: &str, fg: ColorIndex, bg: ColorIndex) {
        for (i, ch) in text.chars().enumerate() {
            let c = col + i;
            if c > TEXT_COLS { break; }
            self.put(row, c, ch, fg, bg);
        }
    }

    /// Write text horizontally centred on `row`.
    pub fn center(&mut self, row: usize, text: &str, fg: ColorIndex, bg: ColorIndex) {
        let col = center_col(text.chars().count());
        self.put_str(row, col, text, fg, bg);
    }

    /// Blank every cell in the given colours.
    pub fn fill(&mut self, fg: ColorIndex, bg: ColorIndex) {
        self.cells.fill(Cell { glyph: ' ', fg, bg });
    }

    /// Read a row back as a string.
    #[cfg(test)]
    pub fn row_text(&self, row: usize) -> String {
        (1..=TEXT_COLS).map(|c| self.cell(row, c).glyph).collect()
    }
}

/// Column where text of `len` characters starts when centred:
/// 41 - len/2, rounded half to even.
pub fn center_col(len: usize) -> usize {
    let twice = 82_i64 - len as i64;
    let col = if twice % 2 == 0 {
        twice / 2
    } else {
        let floor = twice.div_euclid(2);
        if floor % 2 == 0 { floor } else { floor + 1 }
    };
    col.max(1) as usize
}
