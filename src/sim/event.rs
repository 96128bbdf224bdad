/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and logging.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    TargetEaten { snake: usize, value: u32 },
    SnakeDied { snake: usize },
    /// The last target of the level was eaten.
    LevelCleared { level: u32 },
}
