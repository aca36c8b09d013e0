use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// this is effectively a u32 in memory, but keeps sprite indices from being mixed up with tile
// offsets
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteIndex(pub u32);

impl From<u32> for SpriteIndex {
    fn from(value: u32) -> Self {
        SpriteIndex(value)
    }
}

impl From<SpriteIndex> for u32 {
    fn from(value: SpriteIndex) -> Self {
        value.0
    }
}

impl fmt::Display for SpriteIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four orthogonal directions of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Order in which neighbors contribute to a tile's candidate set.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };

        f.write_str(name)
    }
}

/// Number of sprites still possible for a tile.
///
/// `Known(0)` means the tile is collapsed. `Unconstrained` is used while no collapsed neighbor
/// restricts the tile, and orders above every known count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entropy {
    Known(usize),
    Unconstrained,
}

impl Entropy {
    pub fn is_collapsed(self) -> bool {
        self == Entropy::Known(0)
    }
}

impl PartialOrd for Entropy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entropy {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Entropy::Known(a), Entropy::Known(b)) => a.cmp(b),
            (Entropy::Known(_), Entropy::Unconstrained) => Ordering::Less,
            (Entropy::Unconstrained, Entropy::Known(_)) => Ordering::Greater,
            (Entropy::Unconstrained, Entropy::Unconstrained) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entropy::Known(n) => write!(f, "{n}"),
            Entropy::Unconstrained => f.write_str("inf"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Dimensions { width, height }
    }
}

/// Column and row of a sprite inside a sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteCoords {
    pub x: u32,
    pub y: u32,
}
