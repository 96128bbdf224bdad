/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::WriteLogger;

use config::{GameConfig, LogConfig};
use domain::ring::ERASE_PASSES;
use error::{NibblesError, Result};
use sim::event::GameEvent;
use sim::session::{Phase, Session, PLAYER_NAMES};
use sim::step;
use ui::gamepad::GamepadState;
use ui::hud;
use ui::input::{InputState, Key};
use ui::menu;
use ui::renderer::Renderer;
use ui::sound::{tunes, SoundEngine};
use ui::Console;

/// Pause between passes of the body erase.
const ERASE_PASS_MS: u64 = 20;
/// How long "Initializing Playing Field..." stays up.
const FIELD_INTRO: Duration = Duration::from_secs(1);

fn main() {
    let config = match GameConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("nibbles: {e}");
            std::process::exit(2);
        }
    };

    init_logging(&config.log);
    for w in &config.warnings {
        log::warn!("{w}");
    }

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        log::error!("terminal init failed: {e}");
        eprintln!("Terminal init failed: {e}");
        std::process::exit(1);
    }

    let input = InputState::new(GamepadState::new(&config.gamepad));
    let mut console = Console::new(renderer, input, SoundEngine::new());

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mut session = Session::new(config.game.clone(), StdRng::seed_from_u64(seed));

    let result = run(&mut session, &mut console, &config);

    if let Err(e) = console.renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(()) | Err(NibblesError::Interrupted) => {
            log::info!("session over");
            println!("Thanks for playing Nibbles!");
        }
        Err(e) => {
            log::error!("game error: {e}");
            eprintln!("Game error: {e}");
            std::process::exit(1);
        }
    }
}

/// Log to a file; the terminal belongs to the game.
fn init_logging(cfg: &LogConfig) {
    let file = match File::create(&cfg.file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Cannot open log file {}: {e}", cfg.file.display());
            return;
        }
    };
    if let Err(e) = WriteLogger::init(cfg.level, simplelog::Config::default(), file) {
        eprintln!("Logger init failed: {e}");
    }
}

fn run(s: &mut Session, con: &mut Console, config: &GameConfig) -> Result<()> {
    s.phase = Phase::Intro;
    menu::intro(&mut s.screen, con)?;

    loop {
        if !config.skip_setup {
            s.phase = Phase::Setup;
            let settings = menu::setup(&mut s.screen, con, &config.game)?;
            s.apply_settings(settings);
        }
        log::info!("settings: {:?}", s.settings);

        hud::draw_field_intro(&mut s.screen, &s.palette);
        con.show(&s.screen)?;
        std::thread::sleep(FIELD_INTRO);

        play_game(s, con)?;

        if !still_wants_to_play(s, con)? {
            return Ok(());
        }
    }
}

// ── Game ──

fn play_game(s: &mut Session, con: &mut Console) -> Result<()> {
    s.start_game();
    hud::draw_score(s);
    level_banner(s, con)?;

    while !s.is_game_over() {
        play_round(s, con)?;
    }
    s.phase = Phase::GameOver;
    log::info!(
        "game over on level {}: Sammy {} / Jake {}",
        s.level, s.snakes[0].score, s.snakes[1].score
    );
    Ok(())
}

/// Tick until somebody dies, then clear the board for the next round.
fn play_round(s: &mut Session, con: &mut Console) -> Result<()> {
    hud::draw_score(s);
    con.play(tunes::ROUND_START);
    s.phase = Phase::Playing;

    loop {
        s.ensure_target();
        con.show(&s.screen)?;
        con.sleep_ms(s.tick_delay_ms());

        let keys = con.input.tick_keys()?;
        if keys.pause {
            s.phase = Phase::Paused;
            banner(s, con, hud::PAUSE_TEXT)?;
            s.phase = Phase::Playing;
        }

        let events = step::step(s, keys.input);
        process_events(s, con, &events);

        match s.phase {
            Phase::LevelComplete => finish_level(s, con)?,
            Phase::LifeLost => return finish_life_lost(s, con),
            _ => {}
        }
    }
}

fn process_events(s: &mut Session, con: &Console, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::TargetEaten { snake, value } => {
                con.play(tunes::PICKUP);
                hud::draw_score(s);
                let body = &s.snakes[*snake].body;
                log::debug!("{} ate {value} (length {})", PLAYER_NAMES[*snake], body.len());
            }
            GameEvent::SnakeDied { snake } => {
                con.play(tunes::DEATH);
                hud::draw_score(s);
                log::debug!("{} crashed at {:?}", PLAYER_NAMES[*snake], s.snakes[*snake].pos);
            }
            GameEvent::LevelCleared { level } => log::info!("level {level} cleared"),
        }
    }
}

fn finish_level(s: &mut Session, con: &mut Console) -> Result<()> {
    for i in s.active() {
        erase_slowly(s, con, i)?;
    }
    s.next_level();
    hud::draw_score(s);
    level_banner(s, con)
}

fn finish_life_lost(s: &mut Session, con: &mut Console) -> Result<()> {
    for i in s.active() {
        erase_slowly(s, con, i)?;
        if !s.snakes[i].alive {
            hud::draw_score(s);
            banner(s, con, hud::DEATH_TEXT[i])?;
        }
    }
    if !s.is_game_over() {
        s.restart_level();
        hud::draw_score(s);
    }
    Ok(())
}

fn erase_slowly(s: &mut Session, con: &mut Console, idx: usize) -> Result<()> {
    for pass in 0..ERASE_PASSES {
        s.erase_pass(idx, pass);
        con.show(&s.screen)?;
        con.sleep_ms(ERASE_PASS_MS);
    }
    Ok(())
}

// ── Banners ──

/// Show a banner until Space, then uncover the board.
fn banner(s: &mut Session, con: &mut Console, text: &str) -> Result<()> {
    hud::draw_banner(&mut s.screen, &s.palette, text);
    con.wait_for(&s.screen, |k| k == Key::Char(' '))?;
    hud::dismiss_banner(s);
    con.show(&s.screen)
}

fn level_banner(s: &mut Session, con: &mut Console) -> Result<()> {
    s.phase = Phase::LevelIntro;
    let text = hud::level_text(s.level);
    banner(s, con, &text)?;
    s.phase = Phase::Playing;
    Ok(())
}

fn still_wants_to_play(s: &mut Session, con: &mut Console) -> Result<bool> {
    hud::draw_game_over(&mut s.screen, &s.palette);
    let key = con.wait_for(&s.screen, |k| k.is_char('y') || k.is_char('n'))?;
    hud::clear_game_over(s);
    con.show(&s.screen)?;
    Ok(key.is_char('y'))
}
