/// Fatal error taxonomy for a game session.
///
/// Nothing inside the tick loop is recoverable: every game-state branch has a
/// defined next state. What remains are startup problems (display, config)
/// and terminal I/O failures, all of which end the session.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NibblesError {
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),

    #[error("terminal is {cols}x{rows}, at least 80x25 is required")]
    UnsupportedDisplay { cols: u16, rows: u16 },

    #[error("unsupported configuration: {0}")]
    Config(String),

    /// Ctrl+C while any screen was waiting for input.
    #[error("interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, NibblesError>;
