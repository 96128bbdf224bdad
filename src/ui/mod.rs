pub mod gamepad;
pub mod hud;
pub mod input;
pub mod menu;
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
pub mod music;
pub mod renderer;
pub mod sound;

use std::time::Duration;

use crate::domain::screen::Screen;
use crate::error::Result;
use input::{InputState, Key, WAIT_POLL};
use renderer::Renderer;
use sound::SoundEngine;

/// The terminal as the game sees it: display, keys and speaker.
pub struct Console {
    pub renderer: Renderer,
    pub input: InputState,
    sound: Option<SoundEngine>,
}

impl Console {
    pub fn new(renderer: Renderer, input: InputState, sound: Option<SoundEngine>) -> Self {
        Console { renderer, input, sound }
    }

    pub fn show(&mut self, screen: &Screen) -> Result<()> {
        self.renderer.present(screen)?;
        Ok(())
    }

    pub fn play(&self, tune: &str) {
        if let Some(sfx) = &self.sound {
            sfx.play(tune);
        }
    }

    /// Show `screen`, then wait for a key accepted by `want`.
    pub fn wait_for(&mut self, screen: &Screen, want: impl Fn(Key) -> bool) -> Result<Key> {
        self.show(screen)?;
        self.input.await_key(want, WAIT_POLL)
    }

    pub fn sleep_ms(&self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}
