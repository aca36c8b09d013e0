pub use crate::error::WfcError;

pub use crate::rules::Rule;
pub use crate::rules::RuleTable;

pub use crate::types::Dimensions;
pub use crate::types::Direction;
pub use crate::types::SpriteIndex;

pub use crate::observer::Event;
pub use crate::observer::Observer;

pub use crate::wave::Progress;
pub use crate::wave::State;
pub use crate::wave::Wave;
pub use crate::wave::WaveConfig;

pub use rand;
pub use ndarray;
