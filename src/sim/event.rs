/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and logging.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    GemCollected { row: usize, col: usize },
    RockPushed { row: usize, col: usize },
    /// Objects that came to rest this tick.
    ObjectsLanded { count: u32 },
    /// A falling object came down onto the player.
    PlayerCrushed,
    /// The player walked up into a falling object.
    PlayerStruck,
    ExitReached,
}
