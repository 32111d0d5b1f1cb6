//! Required times of nodes absorbed inside chosen implementations.
//!
//! The structural nodes between a visible AND gate and the leaves of its best
//! cut disappear into a single mapped implementation whose delay is already
//! charged at the gate. They therefore inherit the gate's required time
//! unchanged. A node absorbed by several implementations keeps the tightest.

use crate::error::RequiredTimeError;
use conemap_aig::{Network, NodeId, TopoOrder};
use conemap_common::tighten;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Statistics of one interior assignment run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteriorSummary {
    /// Cones walked, one per visible AND gate.
    pub cones_walked: usize,
    /// Distinct invisible nodes found inside some cone.
    pub interior_nodes: usize,
    /// Times an interior required time was lowered.
    pub tightenings: usize,
}

/// Bounded FIFO for one cone walk.
///
/// Like a fixed array with front/back cursors, slots are never reused within
/// a walk, so `capacity` bounds the number of distinct nodes a cone may
/// reach. A node already queued in the current walk is not queued again.
struct ConeQueue {
    slots: Vec<NodeId>,
    front: usize,
    capacity: usize,
}

impl ConeQueue {
    fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            front: 0,
            capacity,
        }
    }

    fn reset(&mut self) {
        self.slots.clear();
        self.front = 0;
    }

    /// Returns `false` if the queue is full.
    fn push(&mut self, node: NodeId) -> bool {
        if self.slots.contains(&node) {
            return true;
        }
        if self.slots.len() == self.capacity {
            return false;
        }
        self.slots.push(node);
        true
    }

    fn pop(&mut self) -> Option<NodeId> {
        let node = self.slots.get(self.front).copied()?;
        self.front += 1;
        Some(node)
    }
}

/// Assigns every visible AND gate's required time to the invisible nodes
/// enclosed by its best cut.
///
/// Must run after [`compute_visible_required`](crate::compute_visible_required)
/// on the same network, which establishes the visible set. `cone_capacity`
/// bounds the nodes a single walk may reach, leaves included; a larger cone
/// means the upstream mapper broke its cone-size guarantee and fails with
/// [`RequiredTimeError::ConeOverflow`]. Boundary flags are clear when this
/// returns, on success and on failure.
pub fn assign_invisible_required(
    network: &mut Network,
    order: &TopoOrder,
    cone_capacity: usize,
) -> Result<InteriorSummary, RequiredTimeError> {
    let mut summary = InteriorSummary::default();
    let mut absorbed = vec![false; network.len()];
    let mut queue = ConeQueue::new(cone_capacity);

    for id in order.iter() {
        let node = &network[id];
        if !node.kind.is_and() || !node.flags.visible {
            continue;
        }
        let leaves = node
            .best_cut
            .as_ref()
            .ok_or(RequiredTimeError::MissingBestCut { node: id })?
            .leaves
            .clone();

        for &leaf in &leaves {
            network[leaf].flags.boundary = true;
        }
        let walked = walk_cone(network, id, &mut queue, &mut absorbed, &mut summary);
        for &leaf in &leaves {
            network[leaf].flags.boundary = false;
        }
        walked?;
        summary.cones_walked += 1;
    }

    summary.interior_nodes = absorbed.iter().filter(|&&a| a).count();
    debug!(
        cones_walked = summary.cones_walked,
        interior_nodes = summary.interior_nodes,
        tightenings = summary.tightenings,
        "interior required times assigned"
    );
    Ok(summary)
}

/// Breadth-first walk from the fanins of `root` down to the boundary.
fn walk_cone(
    network: &mut Network,
    root: NodeId,
    queue: &mut ConeQueue,
    absorbed: &mut [bool],
    summary: &mut InteriorSummary,
) -> Result<(), RequiredTimeError> {
    let overflow = RequiredTimeError::ConeOverflow {
        node: root,
        capacity: queue.capacity,
    };
    let required = network[root].required;

    queue.reset();
    for fanin in network[root].fanins() {
        if !queue.push(fanin) {
            return Err(overflow);
        }
    }

    while let Some(id) = queue.pop() {
        let node = &mut network[id];
        if node.flags.boundary {
            continue;
        }
        if !node.flags.visible {
            absorbed[id.index()] = true;
            if tighten(&mut node.required, required) {
                summary.tightenings += 1;
                trace!(node = %id, consumer = %root, required, "interior node absorbed");
            }
        }
        for fanin in node.fanins() {
            if !queue.push(fanin) {
                return Err(overflow);
            }
        }
    }
    Ok(())
}
