mod util;

pub mod entropy;
pub mod error;
pub mod grid;
pub mod history;
pub mod observer;
pub mod presets;
pub mod prelude;
pub mod rng;
pub mod rules;
pub mod tile;
pub mod types;
pub mod wave;

pub use error::WfcError;
pub use grid::Grid;
pub use observer::Event;
pub use observer::Observer;
pub use rng::Lcg;
pub use rules::Rule;
pub use rules::RuleTable;
pub use tile::Tile;
pub use types::Dimensions;
pub use types::Direction;
pub use types::Entropy;
pub use types::SpriteCoords;
pub use types::SpriteIndex;
pub use wave::Progress;
pub use wave::State;
pub use wave::Wave;
pub use wave::WaveConfig;
