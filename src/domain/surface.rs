/// Pixel surface: an 80x50 logical pixel grid drawn on the 80x25 text screen.
///
/// Each text cell holds two vertically stacked pixels. A cell whose pixels
/// agree is drawn as `█`; otherwise it is `▀` or `▄` with the two colours
/// split across foreground and background. Text mode cannot show bright
/// backgrounds, so the bright (index > 7) colour always goes to the
/// foreground and the glyph is flipped to match.
///
/// Pixel row 0 is a sentinel for "nowhere": painting it does nothing and it
/// is never occupied. Anything else outside 1..=50 x 1..=80 is a bug in the
/// caller and panics.

use super::palette::{is_bright, ColorIndex};
use super::screen::{Cell, Screen};

pub const PIXEL_COLS: usize = 80;
pub const PIXEL_ROWS: usize = 50;

const FULL: char = '█';
const UPPER: char = '▀';
const LOWER: char = '▄';

#[derive(Clone, Copy, Debug)]
struct Pixel {
    color: ColorIndex,
    /// Text row (1..=25) this pixel is drawn in.
    char_row: usize,
    /// +1 when the sister pixel is below (this one is the top half), -1 when above.
    sister: i8,
}

pub struct PixelSurface {
    pixels: Vec<Pixel>,
}

impl PixelSurface {
    pub fn new(background: ColorIndex) -> Self {
        let mut pixels = Vec::with_capacity(PIXEL_ROWS * PIXEL_COLS);
        for row in 1..=PIXEL_ROWS {
            for _ in 1..=PIXEL_COLS {
                pixels.push(Pixel {
                    color: background,
                    char_row: (row + 1) / 2,
                    sister: ((row % 2) * 2) as i8 - 1,
                });
            }
        }
        PixelSurface { pixels }
    }

    #[inline]
    fn index(row: usize, col: usize) -> usize {
        assert!(
            (1..=PIXEL_ROWS).contains(&row) && (1..=PIXEL_COLS).contains(&col),
            "pixel ({row}, {col}) is outside the play grid"
        );
        (row - 1) * PIXEL_COLS + (col - 1)
    }

    /// Row of the pixel sharing a text cell with `row`.
    #[inline]
    pub fn sister_row(&self, row: usize) -> usize {
        let p = self.pixels[Self::index(row, 1)];
        (row as isize + p.sister as isize) as usize
    }

    /// Text row that pixel row `row` is drawn in.
    #[inline]
    pub fn char_row(row: usize) -> usize {
        (row + 1) / 2
    }

    pub fn color_at(&self, row: usize, col: usize) -> ColorIndex {
        self.pixels[Self::index(row, col)].color
    }

    /// Is anything other than `background` painted at (row, col)?
    pub fn occupied(&self, row: usize, col: usize, background: ColorIndex) -> bool {
        if row == 0 {
            return false;
        }
        self.color_at(row, col) != background
    }

    /// Set one pixel and redraw its text cell.
    pub fn paint(&mut self, screen: &mut Screen, row: usize, col: usize, color: ColorIndex) {
        if row == 0 {
            return;
        }
        let idx = Self::index(row, col);
        self.pixels[idx].color = color;
        self.redraw(screen, row, col);
    }

    /// Redraw the text cell containing (row, col) from stored pixel colours.
    /// Used to restore the playfield after something wrote text over it.
    pub fn redraw(&self, screen: &mut Screen, row: usize, col: usize) {
        if row == 0 {
            return;
        }
        let p = self.pixels[Self::index(row, col)];
        let sister_color = self.color_at(self.sister_row(row), col);
        let cell = cell_for(p.color, sister_color, p.sister > 0);
        screen.put(p.char_row, col, cell.glyph, cell.fg, cell.bg);
    }

    /// Paint every pixel in the inclusive rectangle.
    pub fn clear_rect(
        &mut self,
        screen: &mut Screen,
        top_left: (usize, usize),
        bottom_right: (usize, usize),
        color: ColorIndex,
    ) {
        for row in top_left.0..=bottom_right.0 {
            for col in top_left.1..=bottom_right.1 {
                self.paint(screen, row, col, color);
            }
        }
    }

    /// Forget everything and show a blank field in `background`.
    pub fn reset(&mut self, screen: &mut Screen, background: ColorIndex) {
        self.clear_rect(screen, (1, 1), (PIXEL_ROWS, PIXEL_COLS), background);
    }
}

/// Text cell for a pixel of `color` whose sister has `sister_color`.
/// `is_top` is true when the painted pixel is the upper half.
pub fn cell_for(color: ColorIndex, sister_color: ColorIndex, is_top: bool) -> Cell {
    if color == sister_color {
        return Cell { glyph: FULL, fg: color, bg: color };
    }
    // The painted pixel keeps the foreground only when it is bright.
    let (fg, bg, fg_is_top) = if is_bright(color) {
        (color, sister_color, is_top)
    } else {
        (sister_color, color, !is_top)
    };
    let glyph = if fg_is_top { UPPER } else { LOWER };
    Cell { glyph, fg, bg }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: ColorIndex = 1;

    fn fixture() -> (PixelSurface, Screen) {
        let mut screen = Screen::new();
        let mut surface = PixelSurface::new(BG);
        surface.reset(&mut screen, BG);
        (surface, screen)
    }

    #[test]
    fn sisters_share_a_text_row() {
        let s = PixelSurface::new(BG);
        for row in 1..=PIXEL_ROWS {
            let sister = s.sister_row(row);
            assert_eq!(PixelSurface::char_row(row), PixelSurface::char_row(sister));
            assert_eq!(s.sister_row(sister), row);
        }
    }

    #[test]
    fn odd_rows_are_top_halves() {
        let s = PixelSurface::new(BG);
        assert_eq!(s.sister_row(1), 2);
        assert_eq!(s.sister_row(2), 1);
        assert_eq!(s.sister_row(49), 50);
    }

    #[test]
    fn paint_is_visible_to_occupied_immediately() {
        let (mut s, mut scr) = fixture();
        for &(r, c) in &[(1, 1), (3, 40), (50, 80), (25, 2)] {
            s.paint(&mut scr, r, c, 12);
            assert!(s.occupied(r, c, BG));
            s.paint(&mut scr, r, c, BG);
            assert!(!s.occupied(r, c, BG));
        }
    }

    #[test]
    fn row_zero_is_a_sentinel() {
        let (mut s, mut scr) = fixture();
        s.paint(&mut scr, 0, 10, 12);
        assert!(!s.occupied(0, 10, BG));
    }

    #[test]
    #[should_panic]
    fn painting_past_the_grid_panics() {
        let (mut s, mut scr) = fixture();
        s.paint(&mut scr, 51, 1, 12);
    }

    #[test]
    fn equal_sisters_draw_a_full_block() {
        let (mut s, mut scr) = fixture();
        s.paint(&mut scr, 9, 7, 12);
        s.paint(&mut scr, 10, 7, 12);
        assert_eq!(scr.cell(5, 7), Cell { glyph: FULL, fg: 12, bg: 12 });
    }

    #[test]
    fn bright_colour_always_lands_in_foreground() {
        // Bright top pixel over dark bottom.
        let (mut s, mut scr) = fixture();
        s.paint(&mut scr, 9, 7, 14);
        assert_eq!(scr.cell(5, 7), Cell { glyph: UPPER, fg: 14, bg: BG });

        // Dark top pixel painted over a bright bottom one.
        let (mut s, mut scr) = fixture();
        s.paint(&mut scr, 10, 7, 14);
        s.paint(&mut scr, 9, 7, 4);
        assert_eq!(scr.cell(5, 7), Cell { glyph: LOWER, fg: 14, bg: 4 });

        // Bright bottom pixel.
        let (mut s, mut scr) = fixture();
        s.paint(&mut scr, 10, 7, 13);
        assert_eq!(scr.cell(5, 7), Cell { glyph: LOWER, fg: 13, bg: BG });
    }

    #[test]
    fn glyph_choice_is_symmetric_in_paint_order() {
        for (top, bottom) in [(14u8, 1u8), (1, 14), (12, 13), (2, 3)] {
            let (mut a, mut sa) = fixture();
            a.paint(&mut sa, 21, 30, top);
            a.paint(&mut sa, 22, 30, bottom);
            let (mut b, mut sb) = fixture();
            b.paint(&mut sb, 22, 30, bottom);
            b.paint(&mut sb, 21, 30, top);
            let (ca, cb) = (sa.cell(11, 30), sb.cell(11, 30));
            // Same picture: whichever half the foreground covers has that colour.
            let shown = |c: Cell| if c.glyph == UPPER { (c.fg, c.bg) } else { (c.bg, c.fg) };
            assert_eq!(shown(ca), (top, bottom));
            assert_eq!(shown(cb), (top, bottom));
        }
    }

    #[test]
    fn redraw_restores_text_overwritten_cells() {
        let (mut s, mut scr) = fixture();
        s.paint(&mut scr, 21, 30, 12);
        scr.put(11, 30, 'X', 15, 4);
        s.redraw(&mut scr, 21, 30);
        assert_eq!(scr.cell(11, 30), Cell { glyph: UPPER, fg: 12, bg: BG });
    }

    #[test]
    fn clear_rect_blanks_the_area() {
        let (mut s, mut scr) = fixture();
        s.clear_rect(&mut scr, (3, 1), (4, 80), 12);
        assert!(s.occupied(4, 80, BG));
        s.clear_rect(&mut scr, (3, 1), (4, 80), BG);
        assert!((1..=80).all(|c| !s.occupied(3, c, BG) && !s.occupied(4, c, BG)));
    }
}
