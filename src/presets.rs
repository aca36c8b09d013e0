//! Ready-made rule tables.

use crate::error::WfcError;
use crate::rules::Rule;
use crate::rules::RuleTable;
use crate::types::Dimensions;
use crate::types::Direction;
use crate::types::SpriteIndex;

pub const TREE: SpriteIndex = SpriteIndex(0);
pub const TREE_TOP: SpriteIndex = SpriteIndex(1);
pub const GRASS: SpriteIndex = SpriteIndex(4);

/// The terrain sprites live on an 11x3 sheet.
pub const TERRAIN_SHEET: Dimensions = Dimensions {
    width: 11,
    height: 3,
};

/// Trees, tree tops and grass. A tree top only grows above a tree.
pub fn terrain_rules() -> RuleTable {
    let mut rules = RuleTable::new();

    rules.insert(
        TREE,
        Rule::with_weight(1)
            .permit(Direction::Up, [0, 1, 4])
            .permit(Direction::Down, [0, 4])
            .permit(Direction::Left, [0, 1, 4])
            .permit(Direction::Right, [0, 1, 4]),
    );
    rules.insert(
        TREE_TOP,
        Rule::with_weight(1)
            .permit(Direction::Up, [1, 4])
            .permit(Direction::Down, [0, 1])
            .permit(Direction::Left, [0, 1, 4])
            .permit(Direction::Right, [0, 1, 4]),
    );
    rules.insert(
        GRASS,
        Rule::with_weight(1)
            .permit(Direction::Up, [0, 4])
            .permit(Direction::Down, [0, 1, 4])
            .permit(Direction::Left, [0, 1, 4])
            .permit(Direction::Right, [0, 1, 4]),
    );

    rules
}

/// Bias a terrain table toward trees (`density > 0`) or grass (`density < 0`).
///
/// The magnitude becomes the weight of the favored sprite; zero leaves the table as it is.
pub fn apply_density(rules: &mut RuleTable, density: i32) -> Result<(), WfcError> {
    match density {
        d if d < 0 => rules.set_weight(GRASS, d.unsigned_abs()),
        d if d > 0 => rules.set_weight(TREE, d as u32),
        _ => Ok(()),
    }
}
