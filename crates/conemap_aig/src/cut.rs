//! The implementation chosen for an AND node by the upstream mapper.

use crate::ids::NodeId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Leaf storage for a cut; typical cut sizes fit inline.
pub type CutLeaves = SmallVec<[NodeId; 8]>;

/// The best cut of an AND node: its implementation's input boundary plus the
/// depth class that selects the implementation delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestCut {
    /// Boundary nodes, in the order the mapper produced them.
    pub leaves: CutLeaves,
    /// Index into the delay table.
    pub depth_class: usize,
}

impl BestCut {
    /// Creates a cut from its leaves and depth class.
    pub fn new(leaves: impl IntoIterator<Item = NodeId>, depth_class: usize) -> Self {
        Self {
            leaves: leaves.into_iter().collect(),
            depth_class,
        }
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Returns `true` if the cut has no leaves (never valid on a mapped node).
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Returns `true` if `node` is one of the leaves.
    pub fn contains(&self, node: NodeId) -> bool {
        self.leaves.contains(&node)
    }
}
