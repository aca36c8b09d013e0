use crate::tile::Tile;

/// Notifications sent by a generator while it collapses its grid.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A tile collapsed and more tiles remain.
    TileCollapsed { generator: String, tile: Tile },

    /// The last tile collapsed. Sent once per generation.
    GenerationComplete { generator: String, tiles: Vec<Tile> },
}

impl Event {
    pub fn generator(&self) -> &str {
        match self {
            Event::TileCollapsed { generator, .. } => generator,
            Event::GenerationComplete { generator, .. } => generator,
        }
    }
}

/// Receives the events of a generator, e.g. to redraw the collapsed tile.
pub trait Observer {
    fn notify(&mut self, event: &Event);
}

impl<F> Observer for F
where
    F: FnMut(&Event),
{
    fn notify(&mut self, event: &Event) {
        self(event)
    }
}
