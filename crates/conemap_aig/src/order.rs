//! Explicit topological orders over a network.

use crate::ids::NodeId;
use crate::network::Network;
use conemap_common::{ConemapResult, InternalError};

/// A precomputed topological order: every fanin and every best-cut leaf of a
/// node appears before the node.
///
/// Forward iteration runs inputs to outputs, [`rev`](Self::rev) runs outputs
/// to inputs. The order is only valid for the network it was built for and
/// only as long as that network's structure is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoOrder {
    ids: Vec<NodeId>,
}

impl TopoOrder {
    /// The creation order of `network`.
    ///
    /// Builder-made networks are topological by construction; networks read
    /// from elsewhere should pass [`Network::validate`] first.
    pub fn of(network: &Network) -> Self {
        Self {
            ids: network.iter().map(|n| n.id).collect(),
        }
    }

    /// Adopts a caller-provided order after checking it.
    ///
    /// Fails if `ids` is not a permutation of the network's nodes, if a fanin
    /// or cut leaf is not in the network, or if one comes after its consumer.
    pub fn from_ids(network: &Network, ids: Vec<NodeId>) -> ConemapResult<Self> {
        if ids.len() != network.len() {
            return Err(InternalError::new(format!(
                "order lists {} nodes but the network has {}",
                ids.len(),
                network.len()
            )));
        }

        let mut position = vec![usize::MAX; network.len()];
        for (pos, &id) in ids.iter().enumerate() {
            let Some(slot) = position.get_mut(id.index()) else {
                return Err(InternalError::new(format!(
                    "order lists {id}, which is not in the network"
                )));
            };
            if *slot != usize::MAX {
                return Err(InternalError::new(format!("order lists {id} twice")));
            }
            *slot = pos;
        }

        for (pos, &id) in ids.iter().enumerate() {
            let node = network.node(id);
            let leaves = node.best_cut.iter().flat_map(|cut| cut.leaves.iter().copied());
            for pred in node.fanins().chain(leaves) {
                let Some(&pred_pos) = position.get(pred.index()) else {
                    return Err(InternalError::new(format!(
                        "{id} refers to {pred}, which is not in the network"
                    )));
                };
                if pred_pos > pos {
                    return Err(InternalError::new(format!(
                        "order places {pred} after its consumer {id}"
                    )));
                }
            }
        }

        Ok(Self { ids })
    }

    /// Number of nodes in the order.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the order is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The order as a slice.
    pub fn as_slice(&self) -> &[NodeId] {
        &self.ids
    }

    /// Iterates inputs to outputs.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// Iterates outputs to inputs.
    pub fn rev(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().rev().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cut::BestCut;

    fn ids(raw: &[u32]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId::from_raw).collect()
    }

    /// a, b, c inputs; m = a & b; n = m & c; o = n.
    fn chain() -> Network {
        let mut net = Network::new();
        let a = net.add_pi("a");
        let b = net.add_pi("b");
        let c = net.add_pi("c");
        let m = net.add_and(a, b).unwrap();
        let n = net.add_and(m, c).unwrap();
        net.add_po("o", n, 1.0).unwrap();
        net.set_best_cut(n, BestCut::new([a, b, c], 0)).unwrap();
        net
    }

    #[test]
    fn creation_order_forward_and_reverse() {
        let net = chain();
        let order = TopoOrder::of(&net);
        assert_eq!(order.len(), 6);
        assert_eq!(order.iter().collect::<Vec<_>>(), ids(&[0, 1, 2, 3, 4, 5]));
        assert_eq!(order.rev().collect::<Vec<_>>(), ids(&[5, 4, 3, 2, 1, 0]));
    }

    #[test]
    fn accepts_alternative_topological_order() {
        let net = chain();
        let order = TopoOrder::from_ids(&net, ids(&[2, 0, 1, 3, 4, 5])).unwrap();
        assert_eq!(order.as_slice()[0], NodeId::from_raw(2));
    }

    #[test]
    fn rejects_fanin_after_consumer() {
        let net = chain();
        let err = TopoOrder::from_ids(&net, ids(&[0, 1, 2, 4, 3, 5])).unwrap_err();
        assert!(err.message.contains("n3 after its consumer n4"));
    }

    #[test]
    fn rejects_leaf_after_consumer() {
        // d feeds nothing structurally; only the cut of n refers to it.
        let mut net = Network::new();
        let a = net.add_pi("a");
        let b = net.add_pi("b");
        let d = net.add_pi("d");
        let n = net.add_and(a, b).unwrap();
        net.add_po("o", n, 1.0).unwrap();
        net.set_best_cut(n, BestCut::new([a, b, d], 0)).unwrap();

        let err = TopoOrder::from_ids(&net, ids(&[0, 1, 3, 2, 4])).unwrap_err();
        assert!(err.message.contains("n2 after its consumer n3"));
    }

    #[test]
    fn rejects_duplicates_and_strangers() {
        let net = chain();
        assert!(TopoOrder::from_ids(&net, ids(&[0, 0, 2, 3, 4, 5])).is_err());
        assert!(TopoOrder::from_ids(&net, ids(&[0, 1, 2, 3, 4, 9])).is_err());
        assert!(TopoOrder::from_ids(&net, ids(&[0, 1, 2])).is_err());
    }

    #[test]
    fn rejects_fanin_outside_network() {
        let json = r#"{"nodes": [
            {"id": 0, "kind": "primary_input", "name": "a"},
            {"id": 1, "kind": "primary_output", "name": "o", "fanin0": {"node": 7}}
        ]}"#;
        let net: Network = serde_json::from_str(json).unwrap();
        let err = TopoOrder::from_ids(&net, ids(&[0, 1])).unwrap_err();
        assert!(err.message.contains("n1 refers to n7, which is not in the network"));
    }

    #[test]
    fn empty_network() {
        let order = TopoOrder::of(&Network::new());
        assert!(order.is_empty());
        assert_eq!(order.rev().count(), 0);
    }
}
