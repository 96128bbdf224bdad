/// Session: the complete state of a running game.
///
/// One `Session` lives for the whole program run. It owns the text screen,
/// the pixel surface drawn onto it, both snakes (with their body rings),
/// the level counter and the current round. Nothing is global; the loop in
/// `main` passes it to the step function, the level builder and the HUD.
///
/// ## Lifecycle
///   - `start_game`    new game: scores, lives and level 1
///   - `restart_level` after a death: same board, snakes back at the start
///   - `next_level`    after the last target: new board, optional speed-up
/// Each of these starts a fresh `Round`.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::Settings;
use crate::domain::level;
use crate::domain::palette::Palette;
use crate::domain::ring::MAX_TARGET;
use crate::domain::screen::Screen;
use crate::domain::snake::{Point, Snake};
use crate::domain::surface::PixelSurface;

/// Milliseconds shaved off the tick delay per level with the speed ramp on.
pub const RAMP_STEP_MS: i64 = 10;

pub const PLAYER_NAMES: [&str; 2] = ["Sammy", "Jake"];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Intro,
    Setup,
    LevelIntro,
    Playing,
    Paused,
    LifeLost,
    LevelComplete,
    GameOver,
}

/// The number the snakes are racing to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Target {
    pub value: u32,
    /// Text row the digit is drawn in; either pixel of that cell eats it.
    pub char_row: usize,
    pub col: usize,
}

impl Target {
    pub fn hit_by(&self, p: Point) -> bool {
        !p.is_nowhere() && PixelSurface::char_row(p.row) == self.char_row && p.col == self.col
    }

    pub fn glyph(&self) -> char {
        char::from_digit(self.value % 10, 10).unwrap_or('?')
    }
}

#[derive(Clone, Debug)]
pub struct Round {
    /// Value of the next target, 1..=MAX_TARGET.
    pub number: u32,
    /// None when a new target has to be placed.
    pub target: Option<Target>,
}

impl Round {
    pub fn new() -> Self {
        Round { number: 1, target: None }
    }
}

pub struct Session {
    pub settings: Settings,
    pub palette: Palette,
    pub phase: Phase,

    pub screen: Screen,
    pub surface: PixelSurface,
    pub snakes: [Snake; 2],

    pub level: u32,
    pub round: Round,
    /// Base tick delay; shrinks with the speed ramp, can go below 1.
    pub delay_ms: i64,

    pub rng: StdRng,
}

impl Session {
    pub fn new(settings: Settings, rng: StdRng) -> Self {
        let palette = Palette::select(settings.monochrome);
        let delay_ms = settings.tick_delay_ms();
        let snakes = [
            Snake::new(PLAYER_NAMES[0], palette.snakes[0], settings.lives),
            Snake::new(PLAYER_NAMES[1], palette.snakes[1], settings.lives),
        ];
        Session {
            surface: PixelSurface::new(palette.background),
            screen: Screen::new(),
            settings,
            palette,
            phase: Phase::Intro,
            snakes,
            level: 1,
            round: Round::new(),
            delay_ms,
            rng,
        }
    }

    /// Replace the setup choices (after the setup screen).
    pub fn apply_settings(&mut self, settings: Settings) {
        self.palette = Palette::select(settings.monochrome);
        for (i, snake) in self.snakes.iter_mut().enumerate() {
            snake.color = self.palette.snakes[i];
        }
        self.settings = settings;
    }

    pub fn players(&self) -> usize {
        self.settings.players
    }

    /// Delay actually slept per tick.
    pub fn tick_delay_ms(&self) -> u64 {
        self.delay_ms.max(1) as u64
    }

    // ── Level transitions ──

    pub fn start_game(&mut self) {
        for snake in &mut self.snakes {
            snake.lives = self.settings.lives;
            snake.score = 0;
        }
        self.level = 1;
        self.delay_ms = self.settings.tick_delay_ms();
        self.load_level();
        self.phase = Phase::LevelIntro;
        log::info!("new game: {} player(s), delay {} ms", self.players(), self.delay_ms);
    }

    pub fn restart_level(&mut self) {
        self.load_level();
        self.phase = Phase::Playing;
    }

    pub fn next_level(&mut self) {
        self.clear_target();
        self.level += 1;
        if self.settings.increase_speed {
            self.delay_ms -= RAMP_STEP_MS;
        }
        self.load_level();
        self.phase = Phase::LevelIntro;
        log::info!("level {} (delay {} ms)", self.level, self.tick_delay_ms());
    }

    fn load_level(&mut self) {
        let spawn = level::build_level(&mut self.surface, &mut self.screen, self.level, &self.palette);
        for (i, snake) in self.snakes.iter_mut().enumerate() {
            let (pos, dir) = spawn.starts[i];
            snake.respawn(pos, dir);
        }
        for i in 0..2 {
            if i >= self.players() || self.snakes[i].lives == 0 {
                self.snakes[i].park();
            }
        }
        self.round = Round::new();
    }

    // ── Round queries ──

    /// Snakes taking part: index 0 always, index 1 in two-player games.
    pub fn active(&self) -> std::ops::Range<usize> {
        0..self.players()
    }

    /// The game ends once every playing snake is out of lives. Until then a
    /// snake with no lives left sits out, parked like the idle second snake.
    pub fn is_game_over(&self) -> bool {
        self.active().all(|i| self.snakes[i].lives == 0)
    }

    pub fn is_occupied(&self, p: Point) -> bool {
        self.surface.occupied(p.row, p.col, self.palette.background)
    }

    // ── Target ──

    /// Place a target if the board has none. The chosen pixel and its
    /// sister must both be empty so the digit never covers half a glyph.
    pub fn ensure_target(&mut self) -> Option<Target> {
        if self.round.target.is_some() {
            return None;
        }
        let (row, col) = loop {
            let row = self.rng.gen_range(3..=49);
            let col = self.rng.gen_range(2..=79);
            let sister = self.surface.sister_row(row);
            if !self.is_occupied(Point::new(row, col)) && !self.is_occupied(Point::new(sister, col)) {
                break (row, col);
            }
        };
        let target = Target {
            value: self.round.number,
            char_row: PixelSurface::char_row(row),
            col,
        };
        self.place_target(target);
        Some(target)
    }

    pub fn place_target(&mut self, target: Target) {
        self.round.target = Some(target);
        self.draw_target();
    }

    pub fn draw_target(&mut self) {
        if let Some(t) = self.round.target {
            self.screen.put(t.char_row, t.col, t.glyph(), self.palette.snakes[0], self.palette.background);
        }
    }

    /// Remove the target and blank its digit.
    pub fn clear_target(&mut self) {
        if let Some(t) = self.round.target.take() {
            self.screen.put(t.char_row, t.col, ' ', self.palette.dialog_fg, self.palette.background);
        }
    }

    /// Was that the last target of the level?
    pub fn sequence_done(&self) -> bool {
        self.round.number > MAX_TARGET
    }

    // ── Erase effect ──

    /// One pass of the staggered body erase for snake `idx`.
    pub fn erase_pass(&mut self, idx: usize, pass: usize) {
        let bg = self.palette.background;
        for p in self.snakes[idx].body.erase_pass(pass) {
            self.surface.paint(&mut self.screen, p.row, p.col, bg);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;

    pub(crate) fn settings(players: usize) -> Settings {
        Settings { players, skill: 50, increase_speed: false, monochrome: false, lives: 5 }
    }

    pub(crate) fn session(players: usize) -> Session {
        let mut s = Session::new(settings(players), StdRng::seed_from_u64(7));
        s.start_game();
        s.phase = Phase::Playing;
        s
    }

    #[test]
    fn single_player_parks_the_second_snake() {
        let s = session(1);
        assert!(s.snakes[1].is_parked());
        assert_eq!(s.active(), 0..1);
        assert!(!s.is_occupied(s.snakes[1].pos));
    }

    #[test]
    fn targets_land_on_fully_empty_cells() {
        let mut s = session(2);
        for _ in 0..200 {
            let t = s.ensure_target().unwrap();
            let top = t.char_row * 2 - 1;
            assert!(!s.is_occupied(Point::new(top, t.col)));
            assert!(!s.is_occupied(Point::new(top + 1, t.col)));
            s.clear_target();
        }
    }

    #[test]
    fn ensure_target_keeps_an_existing_one() {
        let mut s = session(1);
        let first = s.ensure_target();
        assert!(first.is_some());
        assert_eq!(s.ensure_target(), None);
        assert_eq!(s.round.target, first);
    }

    #[test]
    fn target_digit_is_drawn_and_cleared() {
        let mut s = session(1);
        s.place_target(Target { value: 3, char_row: 12, col: 40 });
        assert_eq!(s.screen.cell(12, 40).glyph, '3');
        s.clear_target();
        assert_eq!(s.screen.cell(12, 40).glyph, ' ');
        assert_eq!(s.round.target, None);
    }

    #[test]
    fn either_half_of_the_cell_eats_the_target() {
        let t = Target { value: 1, char_row: 13, col: 53 };
        assert!(t.hit_by(Point::new(25, 53)));
        assert!(t.hit_by(Point::new(26, 53)));
        assert!(!t.hit_by(Point::new(27, 53)));
        assert!(!t.hit_by(Point::NOWHERE));
    }

    #[test]
    fn game_over_only_counts_playing_snakes() {
        let mut s = session(1);
        s.snakes[1].lives = 0;
        assert!(!s.is_game_over());
        s.snakes[0].lives = 0;
        assert!(s.is_game_over());
    }

    #[test]
    fn snake_out_of_lives_sits_out_until_both_are() {
        let mut s = session(2);
        s.snakes[1].lives = 0;
        assert!(!s.is_game_over());
        s.restart_level();
        assert!(s.snakes[1].is_parked());
        assert!(!s.snakes[0].is_parked());

        s.snakes[0].lives = 0;
        assert!(s.is_game_over());
    }

    /// Run Sammy into the right-hand wall.
    fn crash_sammy(s: &mut Session) {
        s.snakes[0].pos = Point::new(25, 79);
        s.snakes[0].direction = crate::domain::snake::Direction::Right;
        crate::sim::step::step(s, crate::sim::step::TickInput::default());
        assert_eq!(s.phase, Phase::LifeLost);
    }

    #[test]
    fn death_with_lives_left_restarts_the_level() {
        let mut s = session(2);
        crash_sammy(&mut s);
        assert_eq!(s.snakes[0].lives, 4);
        assert!(!s.is_game_over());

        s.restart_level();
        let spawn = level::LevelLayout::for_level(1).spawn();
        for i in 0..2 {
            assert_eq!(s.snakes[i].pos, spawn.starts[i].0);
            assert_eq!(s.snakes[i].direction, spawn.starts[i].1);
            assert!(s.snakes[i].alive);
        }
        assert_eq!(s.level, 1);
        assert_eq!(s.phase, Phase::Playing);
    }

    #[test]
    fn death_on_the_last_life_ends_the_game() {
        let mut s = session(1);
        s.snakes[0].lives = 1;
        crash_sammy(&mut s);
        assert_eq!(s.snakes[0].lives, 0);
        assert!(s.is_game_over());
    }

    #[test]
    fn delay_never_sleeps_below_one_ms() {
        let mut s = session(1);
        s.delay_ms = -25;
        assert_eq!(s.tick_delay_ms(), 1);
    }
}
