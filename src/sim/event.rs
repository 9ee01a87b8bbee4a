/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and logging.

use crate::domain::grid::Coord;
use crate::domain::heading::DeathCause;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Moved { head: Coord },
    FoodEaten { at: Coord, score: u32 },
    FoodPlaced { at: Coord },
    SpeedUp { interval_ms: u64 },
    NewHighScore { score: u32 },
    Died { cause: DeathCause },
    BoardFilled,
}
