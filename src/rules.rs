use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::WfcError;
use crate::types::Direction;
use crate::types::SpriteIndex;

fn default_weight() -> u32 {
    1
}

/// Adjacency permissions of one sprite.
///
/// Each list names the sprites allowed next to this one in that direction, seen from this sprite.
/// Rules are taken as written: if `A` permits `B` above it but `B` does not permit `A` below it,
/// nothing complains until the pair produces a contradiction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default = "default_weight")]
    pub weight: u32,

    #[serde(default)]
    pub up: Vec<SpriteIndex>,
    #[serde(default)]
    pub down: Vec<SpriteIndex>,
    #[serde(default)]
    pub left: Vec<SpriteIndex>,
    #[serde(default)]
    pub right: Vec<SpriteIndex>,
}

impl Rule {
    /// A rule permitting nothing in any direction.
    pub fn with_weight(weight: u32) -> Self {
        Rule {
            weight,
            ..Default::default()
        }
    }

    /// Replace the permitted list for `direction`. Returns `self` to allow chaining.
    pub fn permit<I>(mut self, direction: Direction, sprites: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        *self.permitted_mut(direction) = sprites.into_iter().map(SpriteIndex).collect();
        self
    }

    pub fn permitted(&self, direction: Direction) -> &[SpriteIndex] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    fn permitted_mut(&mut self, direction: Direction) -> &mut Vec<SpriteIndex> {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

/// All rules of a generator, keyed by sprite index in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable(BTreeMap<SpriteIndex, Rule>);

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table such as `{"0": {"weight": 1, "right": [1]}, "1": {"left": [0]}}`.
    pub fn from_json(json: &str) -> Result<Self, WfcError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, WfcError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn insert(&mut self, sprite: SpriteIndex, rule: Rule) -> Option<Rule> {
        self.0.insert(sprite, rule)
    }

    pub fn get(&self, sprite: SpriteIndex) -> Option<&Rule> {
        self.0.get(&sprite)
    }

    pub fn contains(&self, sprite: SpriteIndex) -> bool {
        self.0.contains_key(&sprite)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = SpriteIndex> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, SpriteIndex, Rule> {
        self.0.iter()
    }

    /// Weight of `sprite`, or 0 when the sprite has no rule.
    pub fn weight(&self, sprite: SpriteIndex) -> u32 {
        self.0.get(&sprite).map(|rule| rule.weight).unwrap_or(0)
    }

    /// Sprites that `sprite` permits in `direction`. Empty when the sprite has no rule.
    pub fn permitted(&self, sprite: SpriteIndex, direction: Direction) -> &[SpriteIndex] {
        self.0
            .get(&sprite)
            .map(|rule| rule.permitted(direction))
            .unwrap_or(&[])
    }

    /// Change the weight of one sprite, e.g. to get more or less of a terrain type.
    pub fn set_weight(&mut self, sprite: SpriteIndex, weight: u32) -> Result<(), WfcError> {
        if weight == 0 {
            return Err(WfcError::InvalidWeight(sprite));
        }

        let rule = self
            .0
            .get_mut(&sprite)
            .ok_or(WfcError::UnknownSprite(sprite))?;
        rule.weight = weight;

        Ok(())
    }

    /// Check weights and references. Every sprite named in a direction list must have a rule of
    /// its own. Directional symmetry is not checked.
    pub fn validate(&self) -> Result<(), WfcError> {
        for (&sprite, rule) in &self.0 {
            if rule.weight == 0 {
                return Err(WfcError::InvalidWeight(sprite));
            }

            for direction in Direction::ALL {
                if let Some(&target) = rule
                    .permitted(direction)
                    .iter()
                    .find(|target| !self.0.contains_key(target))
                {
                    return Err(WfcError::DanglingReference {
                        sprite,
                        direction,
                        target,
                    });
                }
            }
        }

        Ok(())
    }
}

impl FromIterator<(SpriteIndex, Rule)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (SpriteIndex, Rule)>>(iter: I) -> Self {
        RuleTable(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RuleTable {
    type Item = (&'a SpriteIndex, &'a Rule);
    type IntoIter = btree_map::Iter<'a, SpriteIndex, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
