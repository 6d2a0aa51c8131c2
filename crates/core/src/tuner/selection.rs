use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Shortcut selections over the rows or columns of a grid.
///
/// `Odd` and `Even` count from one, so `Odd` picks the first, third, ...
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkSelection {
    All,
    None,
    Odd,
    Even,
    /// First and last.
    Edge,
}

impl BulkSelection {
    /// Indices picked out of `count` lines.
    pub fn indices(self, count: usize) -> BTreeSet<usize> {
        match self {
            Self::All => (0..count).collect(),
            Self::None => BTreeSet::new(),
            Self::Odd => (0..count).step_by(2).collect(),
            Self::Even => (1..count).step_by(2).collect(),
            Self::Edge => [0, count.saturating_sub(1)].into_iter().filter(|&i| i < count).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: BTreeSet<usize>) -> Vec<usize> {
        s.into_iter().collect()
    }

    #[test]
    fn bulk_indices() {
        assert_eq!(v(BulkSelection::All.indices(3)), [0, 1, 2]);
        assert_eq!(v(BulkSelection::Odd.indices(5)), [0, 2, 4]);
        assert_eq!(v(BulkSelection::Even.indices(5)), [1, 3]);
        assert_eq!(v(BulkSelection::Edge.indices(4)), [0, 3]);
        assert_eq!(v(BulkSelection::Edge.indices(1)), [0]);
        assert!(BulkSelection::Edge.indices(0).is_empty());
        assert!(BulkSelection::None.indices(4).is_empty());
    }
}
