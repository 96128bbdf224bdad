/// Intro and setup screens.
///
/// The intro shows the title, the rules and the control chart under a
/// marching border of sparkles until a key is pressed. The setup screen asks
/// the four classic questions and re-asks any that get an answer it cannot
/// use.

use std::time::Duration;

use crate::config::Settings;
use crate::domain::palette::{BLACK, WHITE};
use crate::domain::screen::{Screen, TEXT_COLS};
use crate::error::Result;
use super::input::{Key, WAIT_POLL};
use super::sound::tunes;
use super::Console;

const GREY: u8 = 7;
const SPARKLE_COLOR: u8 = 4;
const SPARKLE_STEP_MS: u64 = 50;

const SPARKLES: &str = "*    *    *    *    *    *    *    *    *    *    *    *    *    *    *    *    *    ";

const INTRO_LINES: [(usize, &str); 13] = [
    (6, "(A terminal edition of QBasic Nibbles)"),
    (8, "Nibbles is a game for one or two players.  Navigate your snakes"),
    (9, "around the game board trying to eat up numbers while avoiding"),
    (10, "running into walls or other snakes.  The more numbers you eat up,"),
    (11, "the more points you gain and the longer your snake becomes."),
    (13, " Game Controls "),
    (15, "  General             Player 1               Player 2    "),
    (16, "                        (Up)                   (Up)      "),
    (17, "P - Pause                ↑                      W       "),
    (18, "                     (Left) ←   → (Right)   (Left) A   D (Right)  "),
    (19, "                         ↓                      S       "),
    (20, "                       (Down)                 (Down)     "),
    (24, "Press any key to continue"),
];

// ── Intro ──

pub fn draw_intro(screen: &mut Screen) {
    screen.fill(WHITE, BLACK);
    screen.center(4, "N i b b l e s", WHITE, BLACK);
    for (row, text) in INTRO_LINES {
        screen.center(row, text, GREY, BLACK);
    }
}

/// One frame (1..=5) of the sparkle border: rows 1 and 22 scroll in
/// opposite directions, columns 1 and 80 between them.
pub fn sparkle_frame(screen: &mut Screen, frame: usize) {
    let line = |start: usize| -> String { SPARKLES.chars().skip(start - 1).take(TEXT_COLS).collect() };
    screen.put_str(1, 1, &line(frame), SPARKLE_COLOR, BLACK);
    screen.put_str(22, 1, &line(6 - frame), SPARKLE_COLOR, BLACK);
    for b in 2..=21 {
        let glyph = if (frame + b) % 5 == 1 { '*' } else { ' ' };
        screen.put(b, TEXT_COLS, glyph, SPARKLE_COLOR, BLACK);
        screen.put(23 - b, 1, glyph, SPARKLE_COLOR, BLACK);
    }
}

pub fn intro(screen: &mut Screen, con: &mut Console) -> Result<()> {
    draw_intro(screen);
    con.play(tunes::INTRO);
    con.input.flush()?;
    loop {
        for frame in 1..=5 {
            sparkle_frame(screen, frame);
            con.show(screen)?;
            if con.input.next_key(Duration::from_millis(SPARKLE_STEP_MS))?.is_some() {
                return Ok(());
            }
        }
    }
}

// ── Setup ──

/// Leading integer of `text`, 0 when there is none.
pub fn leading_int(text: &str) -> i64 {
    let t = text.trim_start();
    let (sign, digits) = match t.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, t.strip_prefix('+').unwrap_or(t)),
    };
    let n: String = digits.chars().take_while(|c| c.is_ascii_digit()).take(9).collect();
    n.parse::<i64>().map(|v| v * sign).unwrap_or(0)
}

pub fn parse_players(text: &str) -> Option<usize> {
    match leading_int(text) {
        1 => Some(1),
        2 => Some(2),
        _ => None,
    }
}

pub fn parse_skill(text: &str) -> Option<u32> {
    let v = leading_int(text);
    (1..=100).contains(&v).then_some(v as u32)
}

/// First letter of the answer if it is one of `choices`, upper-cased.
pub fn parse_choice(text: &str, choices: &[char]) -> Option<char> {
    let t = text.trim().to_uppercase();
    let mut chars = t.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if choices.contains(&c) => Some(c),
        _ => None,
    }
}

/// Text entry at (row, col) with a visible cursor. Returns on Enter.
pub fn read_line(screen: &mut Screen, con: &mut Console, row: usize, col: usize, max: usize) -> Result<String> {
    let max = max.min(TEXT_COLS + 1 - col);
    let mut text = String::new();
    con.input.flush()?;
    loop {
        let len = text.chars().count();
        con.renderer.set_cursor(Some((row, (col + len).min(TEXT_COLS))));
        con.show(screen)?;
        let key = match con.input.next_key(WAIT_POLL)? {
            Some(k) => k,
            None => continue,
        };
        match key {
            Key::Enter => break,
            Key::Backspace => {
                if text.pop().is_some() {
                    screen.put(row, col + len - 1, ' ', GREY, BLACK);
                }
            }
            k => {
                if let Some(c) = k.as_char() {
                    if len < max && !c.is_control() {
                        screen.put(row, col + len, c, GREY, BLACK);
                        text.push(c);
                    }
                }
            }
        }
    }
    con.renderer.set_cursor(None);
    Ok(text)
}

/// Ask `prompt` at (row, col) until `parse` accepts the answer. The row is
/// wiped from `wipe_from` to its end before each try.
fn ask<T>(
    screen: &mut Screen,
    con: &mut Console,
    at: (usize, usize),
    wipe_from: usize,
    prompt: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T> {
    loop {
        screen.put_str(at.0, wipe_from, &" ".repeat(TEXT_COLS + 1 - wipe_from), GREY, BLACK);
        let shown = format!("{prompt}? ");
        screen.put_str(at.0, at.1, &shown, GREY, BLACK);
        let col = at.1 + shown.chars().count();
        let answer = read_line(screen, con, at.0, col, TEXT_COLS + 1 - col)?;
        if let Some(v) = parse(&answer) {
            return Ok(v);
        }
        log::debug!("setup answer {answer:?} rejected for {prompt:?}");
    }
}

/// The setup questions. Lives are not asked and come from `base`.
pub fn setup(screen: &mut Screen, con: &mut Console, base: &Settings) -> Result<Settings> {
    screen.fill(GREY, BLACK);

    let players = ask(screen, con, (5, 20), 4, "How many players (1 or 2)", parse_players)?;

    screen.put_str(8, 21, "Skill level (1 to 100)", GREY, BLACK);
    screen.put_str(9, 22, "1   = Novice", GREY, BLACK);
    screen.put_str(10, 22, "90  = Expert", GREY, BLACK);
    screen.put_str(11, 22, "100 = Twiddle Fingers", GREY, BLACK);
    screen.put_str(12, 15, "(Computer speed may affect your skill level)", GREY, BLACK);
    let skill = ask(screen, con, (8, 43), 43, "", parse_skill)?;

    let ramp = ask(
        screen, con, (15, 15), 15,
        "Increase game speed during play (Y or N)",
        |t| parse_choice(t, &['Y', 'N']),
    )?;
    let monitor = ask(
        screen, con, (17, 17), 17,
        "Monochrome or color monitor (M or C)",
        |t| parse_choice(t, &['M', 'C']),
    )?;

    Ok(Settings {
        players,
        skill,
        increase_speed: ramp == 'Y',
        monochrome: monitor == 'M',
        lives: base.lives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intro_text_is_centred() {
        let mut screen = Screen::new();
        draw_intro(&mut screen);
        assert!(screen.row_text(4).trim() == "N i b b l e s");
        let row = screen.row_text(24);
        let col = row.find("Press").unwrap() + 1;
        assert_eq!(col, crate::domain::screen::center_col(25));
    }

    #[test]
    fn sparkles_march() {
        let mut screen = Screen::new();
        sparkle_frame(&mut screen, 1);
        assert_eq!(screen.cell(1, 1).glyph, '*');
        assert_eq!(screen.cell(1, 6).glyph, '*');
        assert_eq!(screen.cell(22, 2).glyph, '*');
        assert_eq!(screen.cell(22, 1).glyph, ' ');
        // (1 + 5) % 5 == 1: column 80 lit on row 5, column 1 on row 18.
        assert_eq!(screen.cell(5, 80).glyph, '*');
        assert_eq!(screen.cell(18, 1).glyph, '*');

        sparkle_frame(&mut screen, 2);
        assert_eq!(screen.cell(1, 1).glyph, ' ');
        assert_eq!(screen.cell(1, 5).glyph, '*');
        assert_eq!(screen.cell(5, 80).glyph, ' ');
        assert_eq!(screen.cell(4, 80).glyph, '*');
        assert_eq!(screen.cell(1, 1).fg, SPARKLE_COLOR);
    }

    #[test]
    fn answers_are_read_like_basic_val() {
        assert_eq!(leading_int("42abc"), 42);
        assert_eq!(leading_int("  7"), 7);
        assert_eq!(leading_int("x"), 0);
        assert_eq!(leading_int("-3"), -3);
        assert_eq!(leading_int(""), 0);
    }

    #[test]
    fn invalid_answers_are_refused() {
        assert_eq!(parse_players("2"), Some(2));
        assert_eq!(parse_players("3"), None);
        assert_eq!(parse_skill("100"), Some(100));
        assert_eq!(parse_skill("0"), None);
        assert_eq!(parse_skill("101"), None);
        assert_eq!(parse_choice("y", &['Y', 'N']), Some('Y'));
        assert_eq!(parse_choice(" c ", &['M', 'C']), Some('C'));
        assert_eq!(parse_choice("yes", &['Y', 'N']), None);
        assert_eq!(parse_choice("", &['Y', 'N']), None);
    }
}
