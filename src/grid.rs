use ndarray::Array2;

use crate::tile::Tile;
use crate::types::Dimensions;
use crate::types::Direction;

/// `[row, column]`
pub type NdIndex = [usize; 2];

/// Neighbor offsets of a tile, in [`Direction::ALL`] order. `None` across a grid boundary.
pub type NeighborIndices = [Option<usize>; 4];

/// A row-major grid of tiles, stored as a `(height, width)` array.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Array2<Tile>,
}

impl Grid {
    /// Allocate `width * height` uncollapsed tiles.
    pub fn new(dims: Dimensions) -> Self {
        let Dimensions { width, height } = dims;

        let tiles = Array2::from_shape_fn((height, width), |(row, col)| Tile::new(row * width + col));

        Grid {
            width,
            height,
            tiles,
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Converts a row-major offset into an `NdIndex`. `None` outside the grid.
    pub fn nd_index(&self, offset: usize) -> Option<NdIndex> {
        if offset >= self.len() {
            return None;
        }

        Some([offset / self.width, offset % self.width])
    }

    pub fn get(&self, offset: usize) -> Option<&Tile> {
        self.tiles.get(self.nd_index(offset)?)
    }

    pub fn get_mut(&mut self, offset: usize) -> Option<&mut Tile> {
        let index = self.nd_index(offset)?;
        self.tiles.get_mut(index)
    }

    /// Offset of the neighbor of `offset` in `direction`, if both lie inside the grid.
    pub fn neighbor(&self, offset: usize, direction: Direction) -> Option<usize> {
        let [row, col] = self.nd_index(offset)?;

        let [row, col] = match direction {
            Direction::Up if row > 0 => [row - 1, col],
            Direction::Down if row + 1 < self.height => [row + 1, col],
            Direction::Left if col > 0 => [row, col - 1],
            Direction::Right if col + 1 < self.width => [row, col + 1],
            _ => return None,
        };

        Some(row * self.width + col)
    }

    /// For a given offset, returns the offsets of all its neighbors
    pub fn neighbors(&self, offset: usize) -> NeighborIndices {
        Direction::ALL.map(|direction| self.neighbor(offset, direction))
    }

    /// Tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn tiles(&self) -> &Array2<Tile> {
        &self.tiles
    }

    pub fn to_vec(&self) -> Vec<Tile> {
        self.tiles.iter().cloned().collect()
    }

    /// Number of tiles not yet collapsed.
    pub fn remaining(&self) -> usize {
        self.tiles.iter().filter(|tile| !tile.is_collapsed()).count()
    }

    /// A deep copy of every tile.
    pub fn snapshot(&self) -> Array2<Tile> {
        self.tiles.clone()
    }

    /// Put back a copy taken with [`Grid::snapshot`] on a grid of the same shape.
    pub fn restore(&mut self, snapshot: Array2<Tile>) {
        debug_assert_eq!(snapshot.dim(), self.tiles.dim(), "snapshot shape mismatch");
        self.tiles = snapshot;
    }
}
