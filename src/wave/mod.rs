use std::thread;
use std::time::Duration;

use log::debug;
use log::info;
use log::warn;

use crate::entropy::check_settled;
use crate::entropy::recompute_all;
use crate::entropy::viable_sprites;
use crate::error::WfcError;
use crate::grid::Grid;
use crate::history::History;
use crate::observer::Event;
use crate::observer::Observer;
use crate::rng::Lcg;
use crate::rules::RuleTable;
use crate::tile::Tile;
use crate::types::Dimensions;
use crate::types::Entropy;
use crate::types::SpriteCoords;
use crate::types::SpriteIndex;

pub use config::WaveConfig;
pub mod config;

/// Lifecycle of a [`Wave`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// No grid allocated. Load rules and call `initialize`.
    Uninitialized,
    /// Grid allocated, nothing generated yet. Tiles may be pre-seeded with `set_tile`.
    Ready,
    /// Generation started and tiles remain.
    Collapsing,
    /// Every tile holds a sprite.
    Collapsed,
    /// The last operation hit a contradiction. `undo` or `initialize` recovers.
    Failed,
}

/// Outcome of a single collapse.
#[derive(Clone, Debug, PartialEq)]
pub enum Progress {
    /// The tile collapsed and more remain.
    Collapsed(Tile),
    /// No tile remains uncollapsed.
    Complete,
}

/// A tile-grid generator.
///
/// The wave collapses one tile at a time, always picking among the tiles with the fewest
/// remaining candidates, and records every collapse so it can be undone.
pub struct Wave {
    name: String,
    dims: Dimensions,
    sprite_sheet: Dimensions,
    rules: RuleTable,

    grid: Grid,
    history: History,
    rng: Lcg,
    state: State,

    auto_run: bool,
    starting_index: Option<usize>,
    step_delay: Duration,

    observers: Vec<Box<dyn Observer>>,
}

impl Wave {
    pub fn new(config: WaveConfig) -> Self {
        let rng = config.seed.map(Lcg::new).unwrap_or_else(Lcg::from_time);
        let step_delay = config.step_delay();

        Wave {
            name: config.name,
            dims: config.grid,
            sprite_sheet: config.sprite_sheet,
            rules: config.rules,

            grid: Grid::new(Dimensions::new(0, 0)),
            history: History::new(),
            rng,
            state: State::Uninitialized,

            auto_run: config.auto_run,
            starting_index: config.starting_index,
            step_delay,

            observers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.grid.get(index)
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Number of collapses that can be undone.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of tiles not yet collapsed.
    pub fn remaining(&self) -> usize {
        self.grid.remaining()
    }

    pub fn is_complete(&self) -> bool {
        self.state == State::Collapsed
    }

    /// Current PRNG state.
    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    /// Register an observer for this wave's events.
    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: Observer + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Allocate a fresh grid of uncollapsed tiles. Any previous grid and history are dropped.
    pub fn initialize(&mut self) -> Result<(), WfcError> {
        if self.rules.is_empty() {
            return Err(WfcError::EmptyRuleTable);
        }
        self.rules.validate()?;

        let Dimensions { width, height } = self.dims;
        if width == 0 || height == 0 {
            return Err(WfcError::InvalidDimensions { width, height });
        }

        self.grid = Grid::new(self.dims);
        self.history.clear();
        self.state = State::Ready;

        debug!(
            "{}: initialized {width}x{height} grid with {} rules",
            self.name,
            self.rules.len()
        );

        Ok(())
    }

    /// Replace the rule set. Takes effect for the next entropy computation.
    pub fn load_rules(&mut self, rules: RuleTable) -> Result<(), WfcError> {
        rules.validate()?;
        self.rules = rules;

        Ok(())
    }

    pub fn set_weight(&mut self, sprite: SpriteIndex, weight: u32) -> Result<(), WfcError> {
        self.rules.set_weight(sprite, weight)
    }

    /// Drop rules, tiles and history. The wave must be given rules and initialized again.
    pub fn reset(&mut self) {
        self.rules = RuleTable::new();
        self.grid = Grid::new(Dimensions::new(0, 0));
        self.history.clear();
        self.state = State::Uninitialized;
    }

    /// Change the grid size. The current grid is dropped and `initialize` must run again.
    pub fn set_dimensions(&mut self, width: usize, height: usize) {
        self.dims = Dimensions::new(width, height);
        self.grid = Grid::new(Dimensions::new(0, 0));
        self.history.clear();
        self.state = State::Uninitialized;
    }

    /// Force the tile at `index` to `sprite` and update its neighbors' constraints.
    ///
    /// Meant for pre-seeding a grid before `generate`. If the new value leaves a neighbor without
    /// candidates, the tile is put back and the contradiction is returned.
    pub fn set_tile(&mut self, index: usize, sprite: SpriteIndex) -> Result<(), WfcError> {
        if self.state == State::Uninitialized {
            return Err(WfcError::NotInitialized);
        }

        if !self.rules.contains(sprite) {
            return Err(WfcError::UnknownSprite(sprite));
        }

        let len = self.grid.len();
        let tile = self
            .grid
            .get_mut(index)
            .ok_or(WfcError::IndexOutOfBounds { index, len })?;

        let previous = tile.clone();
        tile.collapse(sprite);

        if let Err(e) = recompute_all(&mut self.grid, &self.rules) {
            if let Some(tile) = self.grid.get_mut(index) {
                *tile = previous;
            }

            return Err(e);
        }

        debug!("{}: tile {index} set to sprite {sprite}", self.name);

        Ok(())
    }

    /// Sprite sheet column and row of the sprite at `index`. `None` while the tile is uncollapsed
    /// or when `index` is outside the grid.
    pub fn sprite_coords(&self, index: usize) -> Option<SpriteCoords> {
        let sprite = self.grid.get(index)?.sprite?.0;

        let width = self.sprite_sheet.width as u32;
        if width == 0 {
            return None;
        }

        Some(SpriteCoords {
            x: sprite % width,
            y: sprite / width,
        })
    }

    /// Start generating.
    ///
    /// Collapses the starting tile, then either keeps collapsing until the grid is complete
    /// (automatic mode) or returns so the caller can drive the rest with [`Wave::step`].
    pub fn generate(&mut self) -> Result<Progress, WfcError> {
        if self.state != State::Ready {
            return Err(WfcError::NotReady { state: self.state });
        }

        check_settled(&self.grid, &self.rules).map_err(|e| self.failed(e))?;

        let len = self.grid.len();
        let start = match self.starting_index {
            Some(index) if index < len => index,
            Some(index) => return Err(WfcError::IndexOutOfBounds { index, len }),
            None => self.rng.uniform_int(0, len as i64 - 1) as usize,
        };

        let already_set = self.grid.get(start).is_some_and(Tile::is_collapsed);

        let first = if already_set {
            debug!("{}: starting tile {start} was set by hand", self.name);
            None
        } else {
            let sprite = self.resolve(start)?;
            Some(self.collapse_at(start, sprite)?)
        };

        self.state = State::Collapsing;

        let mut progress = match first {
            Some(tile) => self.settle(tile),
            None if self.grid.remaining() == 0 => self.complete(),
            None => self.advance()?,
        };

        if !self.auto_run {
            return Ok(progress);
        }

        while let Progress::Collapsed(_) = progress {
            if !self.step_delay.is_zero() {
                thread::sleep(self.step_delay);
            }

            progress = self.advance()?;
        }

        Ok(progress)
    }

    /// Collapse exactly one more tile of a generation in progress.
    pub fn step(&mut self) -> Result<Progress, WfcError> {
        if self.state != State::Collapsing {
            return Err(WfcError::NotGenerating { state: self.state });
        }

        self.advance()
    }

    /// Roll back the most recent collapse.
    pub fn undo(&mut self) -> Result<(), WfcError> {
        if self.state == State::Uninitialized {
            return Err(WfcError::NotInitialized);
        }

        let step = self.history.pop().ok_or(WfcError::EmptyHistory)?;

        self.grid.restore(step.snapshot);
        if let Some(tile) = self.grid.get_mut(step.collapsed) {
            tile.uncollapse();
        }

        recompute_all(&mut self.grid, &self.rules).map_err(|e| self.failed(e))?;

        self.state = if self.history.is_empty() {
            State::Ready
        } else {
            State::Collapsing
        };

        debug!(
            "{}: undid collapse of tile {}, {} steps left",
            self.name,
            step.collapsed,
            self.history.len()
        );

        Ok(())
    }

    fn advance(&mut self) -> Result<Progress, WfcError> {
        let Some(index) = self.lowest_entropy() else {
            return Ok(self.complete());
        };

        let sprite = self.resolve(index)?;
        let tile = self.collapse_at(index, sprite)?;

        Ok(self.settle(tile))
    }

    /// Picks at random one of the uncollapsed tiles with the lowest entropy.
    fn lowest_entropy(&mut self) -> Option<usize> {
        let min = self
            .grid
            .iter()
            .filter(|tile| !tile.is_collapsed())
            .map(|tile| tile.entropy)
            .min()?;

        let lowest: Vec<usize> = self
            .grid
            .iter()
            .filter(|tile| !tile.is_collapsed() && tile.entropy == min)
            .map(|tile| tile.position)
            .collect();

        self.rng.pick_one(&lowest).copied()
    }

    /// Draws the sprite the tile at `index` will collapse to.
    ///
    /// A constrained tile draws from its candidates by weight. An unconstrained tile draws
    /// uniformly from [`viable_sprites`] rather than every key, so a sprite that forbids
    /// everything toward one of the tile's in-bounds sides is never placed there.
    fn resolve(&mut self, index: usize) -> Result<SpriteIndex, WfcError> {
        let len = self.grid.len();
        let tile = self
            .grid
            .get(index)
            .ok_or(WfcError::IndexOutOfBounds { index, len })?;

        let sprite = match tile.entropy {
            Entropy::Unconstrained => {
                let viable = viable_sprites(&self.grid, &self.rules, index);
                self.rng.pick_one(&viable).copied()
            }
            Entropy::Known(_) => self.rng.pick_weighted(&tile.available, &self.rules),
        };

        sprite.ok_or_else(|| self.failed(WfcError::Contradiction { position: index }))
    }

    /// Collapses the tile at `index`, recording the grid as it was beforehand.
    fn collapse_at(&mut self, index: usize, sprite: SpriteIndex) -> Result<Tile, WfcError> {
        let snapshot = self.grid.snapshot();

        let len = self.grid.len();
        let tile = self
            .grid
            .get_mut(index)
            .ok_or(WfcError::IndexOutOfBounds { index, len })?;

        tile.collapse(sprite);
        let collapsed = tile.clone();

        self.history.push(index, snapshot);
        debug!("{}: collapsed tile {index} to sprite {sprite}", self.name);

        recompute_all(&mut self.grid, &self.rules).map_err(|e| self.failed(e))?;

        Ok(collapsed)
    }

    fn settle(&mut self, tile: Tile) -> Progress {
        if self.grid.remaining() == 0 {
            return self.complete();
        }

        self.emit(Event::TileCollapsed {
            generator: self.name.clone(),
            tile: tile.clone(),
        });

        Progress::Collapsed(tile)
    }

    fn complete(&mut self) -> Progress {
        self.state = State::Collapsed;
        info!(
            "{}: generation complete after {} steps",
            self.name,
            self.history.len()
        );

        self.emit(Event::GenerationComplete {
            generator: self.name.clone(),
            tiles: self.grid.to_vec(),
        });

        Progress::Complete
    }

    fn failed(&mut self, error: WfcError) -> WfcError {
        warn!("{}: generation failed: {error}", self.name);
        self.state = State::Failed;

        error
    }

    fn emit(&mut self, event: Event) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }
}
