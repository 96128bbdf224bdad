/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Missing file or keys fall back to defaults; a file that does not parse is
/// reported and ignored. Values that parse but make no sense for the game
/// (three players, skill 0) are refused at startup.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use log::LevelFilter;

use crate::error::{NibblesError, Result};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub game: Settings,
    /// Use `game` as-is instead of asking on the setup screen.
    pub skip_setup: bool,
    pub log: LogConfig,
    pub gamepad: GamepadConfig,
    /// Problems met while loading, for the log once it is up.
    pub warnings: Vec<String>,
}

/// Choices made before play starts (setup screen or config file).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub players: usize,
    pub skill: u32,
    pub increase_speed: bool,
    pub monochrome: bool,
    pub lives: u32,
}

impl Settings {
    /// Tick delay in ms: skill 1 crawls (199 ms), skill 100 is 1 ms.
    pub fn tick_delay_ms(&self) -> i64 {
        (100 - self.skill as i64) * 2 + 1
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=2).contains(&self.players) {
            return Err(NibblesError::Config(format!("players must be 1 or 2, got {}", self.players)));
        }
        if !(1..=100).contains(&self.skill) {
            return Err(NibblesError::Config(format!("skill must be 1..=100, got {}", self.skill)));
        }
        if self.lives == 0 {
            return Err(NibblesError::Config("lives must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: LevelFilter,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub pause: Vec<String>,
    pub confirm: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    log: TomlLog,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_players")]
    players: usize,
    #[serde(default = "default_skill")]
    skill: u32,
    #[serde(default)]
    increase_speed: bool,
    #[serde(default)]
    monochrome: bool,
    #[serde(default = "default_lives")]
    lives: u32,
    #[serde(default)]
    skip_setup: bool,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
}

// ── Defaults ──

fn default_players() -> usize { 1 }
fn default_skill() -> u32 { 50 }
fn default_lives() -> u32 { crate::domain::snake::START_LIVES }
fn default_log_file() -> String { "nibbles.log".into() }
fn default_log_level() -> String { "info".into() }
fn default_pause() -> Vec<String> { vec!["Start".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            players: default_players(),
            skill: default_skill(),
            increase_speed: false,
            monochrome: false,
            lives: default_lives(),
            skip_setup: false,
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { file: default_log_file(), level: default_log_level() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { pause: default_pause(), confirm: default_confirm() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&candidate_dirs())
    }

    /// Load the first `config.toml` found in `search_dirs`, or defaults.
    fn load_from(search_dirs: &[PathBuf]) -> Result<Self> {
        let mut warnings = Vec::new();
        match read_config(search_dirs, &mut warnings) {
            Some((path, text)) => Self::from_text(&text, &path, warnings),
            None => Self::from_toml(TomlConfig::default(), warnings),
        }
    }

    /// Build from the text of `source`. Text that does not parse gives the
    /// defaults plus a warning.
    fn from_text(text: &str, source: &Path, mut warnings: Vec<String>) -> Result<Self> {
        let toml_cfg = match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => cfg,
            Err(e) => {
                warnings.push(format!("{} parse error, using defaults: {e}", source.display()));
                TomlConfig::default()
            }
        };
        Self::from_toml(toml_cfg, warnings)
    }

    fn from_toml(cfg: TomlConfig, mut warnings: Vec<String>) -> Result<Self> {
        let game = Settings {
            players: cfg.game.players,
            skill: cfg.game.skill,
            increase_speed: cfg.game.increase_speed,
            monochrome: cfg.game.monochrome,
            lives: cfg.game.lives,
        };
        game.validate()?;

        let level = cfg.log.level.parse::<LevelFilter>().unwrap_or_else(|_| {
            warnings.push(format!("unknown log level {:?}, using info", cfg.log.level));
            LevelFilter::Info
        });

        Ok(GameConfig {
            game,
            skip_setup: cfg.game.skip_setup,
            log: LogConfig { file: PathBuf::from(cfg.log.file), level },
            gamepad: GamepadConfig { pause: cfg.gamepad.pause, confirm: cfg.gamepad.confirm },
            warnings,
        })
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories and read the first one.
fn read_config(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> Option<(PathBuf, String)> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return Some((path, text)),
                Err(e) => {
                    warnings.push(format!("could not read {}: {e}", path.display()));
                }
            }
        }
    }
    None
}
