use thiserror::Error;

use crate::types::Direction;
use crate::types::SpriteIndex;
use crate::wave::State;

#[derive(Debug, Error)]
pub enum WfcError {
    #[error("no rules loaded")]
    EmptyRuleTable,

    #[error("generator not ready to generate (state: {state:?})")]
    NotReady { state: State },

    #[error("no generation in progress (state: {state:?})")]
    NotGenerating { state: State },

    #[error("grid has not been initialized")]
    NotInitialized,

    /// No sprite satisfies every collapsed neighbor of the tile at `position`.
    #[error("no available tiles for tile {position}")]
    Contradiction { position: usize },

    #[error("no steps to undo")]
    EmptyHistory,

    #[error("sprite {0} is not in the rule table")]
    UnknownSprite(SpriteIndex),

    #[error("rule for sprite {sprite} permits unknown sprite {target} {direction}")]
    DanglingReference {
        sprite: SpriteIndex,
        direction: Direction,
        target: SpriteIndex,
    },

    #[error("sprite {0} must have a positive weight")]
    InvalidWeight(SpriteIndex),

    #[error("tile index {index} out of bounds for a grid of {len} tiles")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("failed to read rules: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}
