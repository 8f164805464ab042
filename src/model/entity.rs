//! Entity ids and their resolved positions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// User-facing entity identifier (block or set id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub i64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId(id)
    }
}

/// 1-based position of an entity within its category's id list.
///
/// A `Null` entity is a placeholder kept in the id list so later indices
/// stay stable; it carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityIndex {
    Live(usize),
    Null(usize),
}

impl EntityIndex {
    /// Interpret a signed lookup result: positive is live, negative is a
    /// null placeholder, zero is not a valid position.
    pub fn from_signed(index: i64) -> Option<Self> {
        match index {
            0 => None,
            n if n > 0 => Some(EntityIndex::Live(n as usize)),
            n => Some(EntityIndex::Null(n.unsigned_abs() as usize)),
        }
    }

    /// The 1-based position regardless of status.
    pub fn position(self) -> usize {
        match self {
            EntityIndex::Live(n) | EntityIndex::Null(n) => n,
        }
    }

    /// The 0-based row of this entity in a per-entity table, or `None` for
    /// position 0.
    pub fn row(self) -> Option<usize> {
        self.position().checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_signed() {
        assert_eq!(EntityIndex::from_signed(3), Some(EntityIndex::Live(3)));
        assert_eq!(EntityIndex::from_signed(-4), Some(EntityIndex::Null(4)));
        assert_eq!(EntityIndex::from_signed(0), None);
    }

    #[test]
    fn test_row_is_zero_based() {
        assert_eq!(EntityIndex::Live(3).row(), Some(2));
        assert_eq!(EntityIndex::Null(1).row(), Some(0));
        assert_eq!(EntityIndex::Live(0).row(), None);
    }
}
