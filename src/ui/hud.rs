/// HUD and overlays drawn over the playfield.
///
/// Everything here writes text into the session's `Screen`. The only state
/// touched besides the screen is the surface redraw that uncovers the
/// playfield when a banner goes away.

use crate::domain::palette::{Palette, WHITE};
use crate::domain::screen::{center_col, Screen};
use crate::sim::session::Session;

/// Inner width of the banner box.
const BANNER_TEXT: usize = 29;
/// Outer width of a banner, frame included.
const BANNER_WIDTH: usize = BANNER_TEXT + 4;

/// Pixel rows covered by the three-row banner (text rows 11..=13).
const BANNER_PIXEL_ROWS: (usize, usize) = (21, 26);
/// Pixel rows covered by the game-over box (text rows 10..=14).
const GAME_OVER_PIXEL_ROWS: (usize, usize) = (19, 28);

pub const PAUSE_TEXT: &str = " Game Paused ... Push Space  ";
pub const DEATH_TEXT: [&str; 2] = [" Sammy Dies! Push Space! --->", " <---- Jake Dies! Push Space "];

pub fn level_text(level: u32) -> String {
    format!("     Level {level},  Push Space")
}

// ── Score line ──

pub fn sammy_line(lives: u32, score: i32) -> String {
    format!("SAMMY-->  Lives: {lives}     {score:7}00")
}

pub fn jake_line(lives: u32, score: i32) -> String {
    format!("{score:7}00  Lives: {lives}  <--JAKE")
}

/// Score and lives on text row 1. Jake's half only in two-player games.
pub fn draw_score(s: &mut Session) {
    let bg = s.palette.background;
    let [sammy, jake] = &s.snakes;
    if s.settings.players == 2 {
        s.screen.put_str(1, 1, &jake_line(jake.lives, jake.score), WHITE, bg);
    }
    s.screen.put_str(1, 49, &sammy_line(sammy.lives, sammy.score), WHITE, bg);
}

// ── Banners ──

fn frame_top() -> String {
    format!("█{}█", "▀".repeat(BANNER_WIDTH - 2))
}

fn frame_bottom() -> String {
    format!("█{}█", "▄".repeat(BANNER_WIDTH - 2))
}

fn frame_line(text: &str) -> String {
    let inner: String = text.chars().chain(std::iter::repeat(' ')).take(BANNER_TEXT).collect();
    format!("█ {inner} █")
}

/// Three-row message box on text rows 11..=13; the text is cut or padded
/// to 29 characters.
pub fn draw_banner(screen: &mut Screen, palette: &Palette, text: &str) {
    let (fg, bg) = (palette.dialog_fg, palette.dialog_bg);
    screen.center(11, &frame_top(), fg, bg);
    screen.center(12, &frame_line(text), fg, bg);
    screen.center(13, &frame_bottom(), fg, bg);
}

/// Repaint the playfield from the surface inside the given pixel rows and
/// the banner's columns.
fn uncover(s: &mut Session, rows: (usize, usize)) {
    let left = center_col(BANNER_WIDTH);
    for row in rows.0..=rows.1 {
        for col in left..left + BANNER_WIDTH {
            s.surface.redraw(&mut s.screen, row, col);
        }
    }
    s.draw_target();
}

/// Take the banner down and show what was under it.
pub fn dismiss_banner(s: &mut Session) {
    uncover(s, BANNER_PIXEL_ROWS);
}

pub fn draw_game_over(screen: &mut Screen, palette: &Palette) {
    let (fg, bg) = (palette.dialog_fg, palette.dialog_bg);
    screen.center(10, &frame_top(), fg, bg);
    screen.center(11, &frame_line("      G A M E   O V E R"), fg, bg);
    screen.center(12, &frame_line(""), fg, bg);
    screen.center(13, &frame_line("     Play Again?   (Y/N)"), fg, bg);
    screen.center(14, &frame_bottom(), fg, bg);
}

pub fn clear_game_over(s: &mut Session) {
    uncover(s, GAME_OVER_PIXEL_ROWS);
}

/// Shown while the board is being set up for the first time.
pub fn draw_field_intro(screen: &mut Screen, palette: &Palette) {
    screen.fill(palette.snakes[0], palette.background);
    screen.center(1, "Nibbles!", palette.snakes[0], palette.background);
    screen.center(11, "Initializing Playing Field...", palette.snakes[0], palette.background);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snake::Point;
    use crate::sim::session::tests::session;
    use crate::sim::session::Target;

    #[test]
    fn score_lines_show_hundreds() {
        assert_eq!(sammy_line(5, 0), "SAMMY-->  Lives: 5           000");
        assert_eq!(sammy_line(4, 12), "SAMMY-->  Lives: 4          1200");
        assert_eq!(jake_line(3, -10), "    -1000  Lives: 3  <--JAKE");
    }

    #[test]
    fn single_player_hud_leaves_jake_out() {
        let mut s = session(1);
        draw_score(&mut s);
        assert!(s.screen.row_text(1).starts_with('█'));
        assert!(s.screen.row_text(1).ends_with("SAMMY-->  Lives: 5           000"));
    }

    #[test]
    fn two_player_hud_has_both_halves() {
        let mut s = session(2);
        s.snakes[1].score = 7;
        draw_score(&mut s);
        assert!(s.screen.row_text(1).starts_with("      700  Lives: 5  <--JAKE"));
    }

    #[test]
    fn banner_is_33_wide_from_column_24() {
        let s = session(1);
        let mut screen = s.screen.clone();
        draw_banner(&mut screen, &s.palette, PAUSE_TEXT);
        let row = screen.row_text(12);
        assert_eq!(&row.chars().skip(23).take(33).collect::<String>(), "█  Game Paused ... Push Space   █");
        assert_eq!(screen.cell(11, 24).bg, s.palette.dialog_bg);
        assert_eq!(screen.cell(13, 56).glyph, '█');
        assert_ne!(screen.cell(13, 57).bg, s.palette.dialog_bg);
    }

    #[test]
    fn long_banner_text_is_cut() {
        assert_eq!(frame_line(&"x".repeat(40)).chars().count(), BANNER_WIDTH);
        assert_eq!(frame_line(&level_text(12)), "█      Level 12,  Push Space    █");
    }

    #[test]
    fn dismissing_restores_playfield_and_target() {
        let mut s = session(1);
        let color = s.palette.snakes[1];
        s.surface.paint(&mut s.screen, 24, 30, color);
        s.place_target(Target { value: 4, char_row: 12, col: 40 });
        let before = s.screen.clone();

        draw_banner(&mut s.screen, &s.palette, &level_text(1));
        assert_ne!(s.screen.cell(12, 40).glyph, '4');
        dismiss_banner(&mut s);

        for row in 11..=13 {
            assert_eq!(s.screen.row_text(row), before.row_text(row));
        }
        assert_eq!(s.screen.cell(12, 30), before.cell(12, 30));
        assert!(s.is_occupied(Point::new(24, 30)));
    }

    #[test]
    fn game_over_box_clears_back_to_the_field() {
        let mut s = session(2);
        let before = s.screen.clone();
        draw_game_over(&mut s.screen, &s.palette);
        assert!(s.screen.row_text(11).contains("G A M E   O V E R"));
        assert!(s.screen.row_text(13).contains("Play Again?   (Y/N)"));
        clear_game_over(&mut s);
        for row in 10..=14 {
            assert_eq!(s.screen.row_text(row), before.row_text(row));
        }
    }
}
