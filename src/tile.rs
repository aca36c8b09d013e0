use serde::Deserialize;
use serde::Serialize;

use crate::types::Entropy;
use crate::types::SpriteIndex;

/// One cell of the grid.
///
/// A tile is collapsed once it holds a sprite; its entropy is then `Known(0)` and its candidate
/// list is no longer maintained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Row-major offset of the tile in its grid.
    pub position: usize,

    /// The sprite the tile collapsed to. `None` while uncollapsed.
    pub sprite: Option<SpriteIndex>,

    pub entropy: Entropy,

    /// Sprites still allowed by the collapsed neighbors, in rule order.
    pub available: Vec<SpriteIndex>,
}

impl Tile {
    /// An uncollapsed, unconstrained tile.
    pub fn new(position: usize) -> Self {
        Tile {
            position,
            sprite: None,
            entropy: Entropy::Unconstrained,
            available: Vec::new(),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.sprite.is_some()
    }

    pub fn collapse(&mut self, sprite: SpriteIndex) {
        self.sprite = Some(sprite);
        self.entropy = Entropy::Known(0);
        self.available.clear();
    }

    /// Forget the tile's value and constraints.
    pub fn uncollapse(&mut self) {
        self.sprite = None;
        self.entropy = Entropy::Unconstrained;
        self.available.clear();
    }
}
