use ndarray::Array2;

use crate::tile::Tile;

/// One collapse, with the tiles as they were just before it.
#[derive(Clone, Debug)]
pub struct Step {
    pub collapsed: usize,
    pub snapshot: Array2<Tile>,
}

/// Undo stack of collapse steps.
///
/// Every step holds a full copy of the grid, so each collapse costs O(width * height) in time and
/// memory. Storing only the tiles a collapse touched would be cheaper.
#[derive(Clone, Debug, Default)]
pub struct History {
    steps: Vec<Step>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, collapsed: usize, snapshot: Array2<Tile>) {
        self.steps.push(Step {
            collapsed,
            snapshot,
        });
    }

    pub fn pop(&mut self) -> Option<Step> {
        self.steps.pop()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}
