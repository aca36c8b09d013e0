//! Derives every uncollapsed tile's candidates and entropy from its collapsed neighbors.
//!
//! A tile's candidates in one direction come from the neighbor on that side, read from the
//! neighbor's rule for the opposite direction: the candidates contributed from above are the
//! upper neighbor's `down` list. The tile's candidate set is the intersection of every
//! contributing direction. Nothing here backtracks; an empty intersection is reported as a
//! contradiction and the caller decides what to do with it.

use log::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::WfcError;
use crate::grid::Grid;
use crate::rules::RuleTable;
use crate::types::Direction;
use crate::types::Entropy;
use crate::types::SpriteIndex;
use crate::util::dedup_in_order;
use crate::util::retain_common;

/// New constraints for one uncollapsed tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Derivation {
    pub entropy: Entropy,
    pub available: Vec<SpriteIndex>,
}

impl Derivation {
    fn unconstrained() -> Self {
        Derivation {
            entropy: Entropy::Unconstrained,
            available: Vec::new(),
        }
    }
}

/// Computes the constraints of the tile at `offset`. Collapsed tiles yield `None`.
pub fn derive(grid: &Grid, rules: &RuleTable, offset: usize) -> Result<Option<Derivation>, WfcError> {
    let tile = grid.get(offset).ok_or(WfcError::IndexOutOfBounds {
        index: offset,
        len: grid.len(),
    })?;

    if tile.is_collapsed() {
        return Ok(None);
    }

    let mut available: Option<Vec<SpriteIndex>> = None;

    for (direction, neighbor) in Direction::ALL.into_iter().zip(grid.neighbors(offset)) {
        let neighbor = neighbor.and_then(|n| grid.get(n)).and_then(|n| n.sprite);

        let Some(sprite) = neighbor else {
            continue;
        };

        let permitted = rules.permitted(sprite, direction.opposite());

        match available.as_mut() {
            None => available = Some(dedup_in_order(permitted)),
            Some(list) => retain_common(list, permitted),
        }
    }

    match available {
        None => Ok(Some(Derivation::unconstrained())),
        Some(list) if list.is_empty() => Err(WfcError::Contradiction { position: offset }),
        Some(list) => Ok(Some(Derivation {
            entropy: Entropy::Known(list.len()),
            available: list,
        })),
    }
}

// The first error in offset order wins, whatever order the tiles finish in.
#[cfg(feature = "parallel")]
fn derive_all(grid: &Grid, rules: &RuleTable) -> Result<Vec<Option<Derivation>>, WfcError> {
    let derived: Vec<_> = (0..grid.len())
        .into_par_iter()
        .map(|offset| derive(grid, rules, offset))
        .collect();

    derived.into_iter().collect()
}

#[cfg(not(feature = "parallel"))]
fn derive_all(grid: &Grid, rules: &RuleTable) -> Result<Vec<Option<Derivation>>, WfcError> {
    (0..grid.len())
        .map(|offset| derive(grid, rules, offset))
        .collect()
}

/// Recompute the candidates and entropy of every uncollapsed tile.
///
/// All tiles are derived before any is written, so on a contradiction the grid is left exactly as
/// it was.
pub fn recompute_all(grid: &mut Grid, rules: &RuleTable) -> Result<(), WfcError> {
    let derived = derive_all(grid, rules)?;

    let mut constrained = 0;
    for (offset, derivation) in derived.into_iter().enumerate() {
        let (Some(derivation), Some(tile)) = (derivation, grid.get_mut(offset)) else {
            continue;
        };

        if derivation.entropy != Entropy::Unconstrained {
            constrained += 1;
        }

        tile.entropy = derivation.entropy;
        tile.available = derivation.available;
    }

    trace!("entropy recomputed, {constrained} constrained tiles");

    Ok(())
}

/// Sprites that can sit at `offset` without forbidding every sprite on one of its in-bounds sides.
///
/// A rule with an empty list toward an existing neighbor could never be completed, so it is left
/// out of the draw for unconstrained tiles.
pub fn viable_sprites(grid: &Grid, rules: &RuleTable, offset: usize) -> Vec<SpriteIndex> {
    let sides: Vec<Direction> = Direction::ALL
        .into_iter()
        .zip(grid.neighbors(offset))
        .filter_map(|(direction, neighbor)| neighbor.map(|_| direction))
        .collect();

    rules
        .iter()
        .filter(|(_, rule)| sides.iter().all(|&side| !rule.permitted(side).is_empty()))
        .map(|(&sprite, _)| sprite)
        .collect()
}

/// Checks that every pair of adjacent collapsed tiles accepts each other.
///
/// Used on tiles placed by hand before a generation starts, since they never went through
/// [`derive`].
pub fn check_settled(grid: &Grid, rules: &RuleTable) -> Result<(), WfcError> {
    for tile in grid.iter() {
        let Some(sprite) = tile.sprite else {
            continue;
        };

        for (direction, neighbor) in Direction::ALL.into_iter().zip(grid.neighbors(tile.position)) {
            let Some(offset) = neighbor else {
                continue;
            };

            let Some(other) = grid.get(offset).and_then(|n| n.sprite) else {
                continue;
            };

            if !rules.permitted(sprite, direction).contains(&other) {
                return Err(WfcError::Contradiction { position: offset });
            }
        }
    }

    Ok(())
}
