//! The mapped network: dense, ID-indexed node storage with a builder API.

use crate::cut::BestCut;
use crate::ids::NodeId;
use crate::node::{Lit, Node, NodeKind};
use conemap_common::{ConemapResult, InternalError, Time};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// An and-inverter graph whose AND nodes carry the mapper's best cuts.
///
/// Nodes are appended and never removed or reordered. Every builder method
/// requires fanins and cut leaves to exist already, which keeps creation
/// order topological. Networks read from JSON are checked with
/// [`validate`](Self::validate) instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Network {
    nodes: Vec<Node>,
}

impl Network {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind, name: Option<String>) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        let mut node = Node::new(id, kind);
        node.name = name;
        self.nodes.push(node);
        id
    }

    fn check_exists(&self, id: NodeId, what: &str) -> ConemapResult<()> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(InternalError::new(format!(
                "{what} {id} does not exist (network has {} nodes)",
                self.nodes.len()
            )))
        }
    }

    /// Checks that `id` exists and may drive other nodes.
    fn check_source(&self, id: NodeId, what: &str) -> ConemapResult<()> {
        self.check_exists(id, what)?;
        if self.nodes[id.index()].kind.is_co() {
            return Err(InternalError::new(format!(
                "{what} {id} is a combinational output"
            )));
        }
        Ok(())
    }

    /// Adds the constant node.
    pub fn add_const(&mut self) -> NodeId {
        self.push(NodeKind::Const, None)
    }

    /// Adds a primary input port.
    pub fn add_pi(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::PrimaryInput, Some(name.into()))
    }

    /// Adds a non-port combinational input, such as a register output.
    pub fn add_ci(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::CombinationalInput, Some(name.into()))
    }

    /// Adds an AND gate over two existing fanins.
    pub fn add_and(&mut self, a: impl Into<Lit>, b: impl Into<Lit>) -> ConemapResult<NodeId> {
        let (a, b) = (a.into(), b.into());
        self.check_source(a.node, "fanin")?;
        self.check_source(b.node, "fanin")?;
        let id = self.push(NodeKind::AndGate, None);
        let node = &mut self.nodes[id.index()];
        node.fanin0 = Some(a);
        node.fanin1 = Some(b);
        Ok(id)
    }

    /// Adds a primary output port driven by `driver` with the given required time.
    pub fn add_po(
        &mut self,
        name: impl Into<String>,
        driver: impl Into<Lit>,
        required: Time,
    ) -> ConemapResult<NodeId> {
        self.add_output(NodeKind::PrimaryOutput, name.into(), driver.into(), required)
    }

    /// Adds a non-port combinational output, such as a register input.
    pub fn add_co(
        &mut self,
        name: impl Into<String>,
        driver: impl Into<Lit>,
        required: Time,
    ) -> ConemapResult<NodeId> {
        self.add_output(
            NodeKind::CombinationalOutput,
            name.into(),
            driver.into(),
            required,
        )
    }

    fn add_output(
        &mut self,
        kind: NodeKind,
        name: String,
        driver: Lit,
        required: Time,
    ) -> ConemapResult<NodeId> {
        self.check_source(driver.node, "output driver")?;
        let id = self.push(kind, Some(name));
        let node = &mut self.nodes[id.index()];
        node.fanin0 = Some(driver);
        node.required = required;
        Ok(id)
    }

    /// Records the mapper's best cut for an AND node.
    ///
    /// Leaves must precede the node and must not be combinational outputs.
    pub fn set_best_cut(&mut self, node: NodeId, cut: BestCut) -> ConemapResult<()> {
        self.check_exists(node, "node")?;
        if !self.nodes[node.index()].kind.is_and() {
            return Err(InternalError::new(format!(
                "best cut on {node}, which is not an AND gate"
            )));
        }
        if cut.is_empty() {
            return Err(InternalError::new(format!("best cut of {node} has no leaves")));
        }
        for &leaf in &cut.leaves {
            if leaf >= node {
                return Err(InternalError::new(format!(
                    "leaf {leaf} of the best cut of {node} does not precede it"
                )));
            }
            if self.nodes[leaf.index()].kind.is_co() {
                return Err(InternalError::new(format!(
                    "leaf {leaf} of the best cut of {node} is a combinational output"
                )));
            }
        }
        self.nodes[node.index()].best_cut = Some(cut);
        Ok(())
    }

    /// Overwrites the required time of a node.
    pub fn set_required(&mut self, node: NodeId, required: Time) -> ConemapResult<()> {
        self.check_exists(node, "node")?;
        self.nodes[node.index()].required = required;
        Ok(())
    }

    /// Sets the same required time on every combinational output.
    pub fn set_output_required(&mut self, required: Time) {
        for node in self.nodes.iter_mut().filter(|n| n.kind.is_co()) {
            node.required = required;
        }
    }

    /// Returns the node with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns a mutable reference to the node with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Returns the node with the given ID, if it exists.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the network has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterates over combinational outputs.
    pub fn outputs(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind.is_co())
    }

    /// A display name for diagnostics: `n5` or `n5 (sum)`.
    pub fn display_name(&self, id: NodeId) -> String {
        match self.get(id).and_then(|n| n.name.as_deref()) {
            Some(name) => format!("{id} ({name})"),
            None => id.to_string(),
        }
    }

    /// Checks the structural contract of a network built outside the builder.
    ///
    /// Verifies that IDs match positions, that each kind has its fanin
    /// arity, that fanins and cut leaves precede their consumer and are not
    /// combinational outputs, and that best cuts only appear on AND gates
    /// with `1..=max_cut_size` leaves.
    pub fn validate(&self, max_cut_size: usize) -> ConemapResult<()> {
        for (index, node) in self.nodes.iter().enumerate() {
            let id = node.id;
            if id.index() != index {
                return Err(InternalError::new(format!(
                    "node at position {index} carries id {id}"
                )));
            }

            let arity = node.fanin0.is_some() as usize + node.fanin1.is_some() as usize;
            if arity != node.kind.fanin_count() || (node.fanin1.is_some() && node.fanin0.is_none())
            {
                return Err(InternalError::new(format!(
                    "{id} is {:?} but has {arity} fanin(s)",
                    node.kind
                )));
            }
            for fanin in node.fanins() {
                if fanin >= id {
                    return Err(InternalError::new(format!(
                        "fanin {fanin} of {id} does not precede it"
                    )));
                }
                if self.nodes[fanin.index()].kind.is_co() {
                    return Err(InternalError::new(format!(
                        "fanin {fanin} of {id} is a combinational output"
                    )));
                }
            }

            if let Some(cut) = &node.best_cut {
                if !node.kind.is_and() {
                    return Err(InternalError::new(format!(
                        "best cut on {id}, which is not an AND gate"
                    )));
                }
                if cut.is_empty() || cut.len() > max_cut_size {
                    return Err(InternalError::new(format!(
                        "best cut of {id} has {} leaves, expected 1..={max_cut_size}",
                        cut.len()
                    )));
                }
                if let Some(leaf) = cut.leaves.iter().find(|&&leaf| leaf >= id) {
                    return Err(InternalError::new(format!(
                        "leaf {leaf} of the best cut of {id} does not precede it"
                    )));
                }
                if let Some(leaf) = cut
                    .leaves
                    .iter()
                    .find(|leaf| self.nodes[leaf.index()].kind.is_co())
                {
                    return Err(InternalError::new(format!(
                        "leaf {leaf} of the best cut of {id} is a combinational output"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Index<NodeId> for Network {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.node(id)
    }
}

impl IndexMut<NodeId> for Network {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conemap_common::UNCONSTRAINED;

    fn two_input_and() -> (Network, NodeId, NodeId, NodeId, NodeId) {
        let mut net = Network::new();
        let a = net.add_pi("a");
        let b = net.add_pi("b");
        let n1 = net.add_and(a, Lit::not(b)).unwrap();
        let o = net.add_po("o", n1, 10.0).unwrap();
        (net, a, b, n1, o)
    }

    #[test]
    fn builder_assigns_sequential_ids() {
        let (net, a, b, n1, o) = two_input_and();
        assert_eq!(
            [a, b, n1, o].map(NodeId::as_raw),
            [0, 1, 2, 3]
        );
        assert_eq!(net.len(), 4);
        assert_eq!(net[n1].kind, NodeKind::AndGate);
        assert_eq!(net[n1].fanin1, Some(Lit::not(b)));
        assert_eq!(net[o].driver(), Some(n1));
        assert_eq!(net[o].required, 10.0);
        assert_eq!(net[n1].required, UNCONSTRAINED);
    }

    #[test]
    fn inputs_and_outputs() {
        let mut net = Network::new();
        net.add_const();
        let a = net.add_pi("a");
        let q = net.add_ci("q");
        let g = net.add_and(a, q).unwrap();
        net.add_po("y", g, 5.0).unwrap();
        net.add_co("d", g, 4.0).unwrap();
        assert_eq!(net.iter().filter(|n| n.kind.is_ci()).count(), 2);
        assert_eq!(net.outputs().count(), 2);
    }

    #[test]
    fn add_and_rejects_unknown_fanin() {
        let mut net = Network::new();
        let a = net.add_pi("a");
        let err = net.add_and(a, NodeId::from_raw(9)).unwrap_err();
        assert!(err.message.contains("n9 does not exist"));
        assert_eq!(net.len(), 1);
    }

    #[test]
    fn set_best_cut_checks_target_and_leaves() {
        let (mut net, a, b, n1, o) = two_input_and();
        net.set_best_cut(n1, BestCut::new([a, b], 1)).unwrap();
        assert_eq!(net[n1].best_cut.as_ref().unwrap().len(), 2);

        assert!(net.set_best_cut(o, BestCut::new([n1], 0)).is_err());
        assert!(net.set_best_cut(n1, BestCut::new(Vec::<NodeId>::new(), 0)).is_err());
        assert!(net.set_best_cut(n1, BestCut::new([a, o], 0)).is_err());
    }

    #[test]
    fn set_output_required_touches_only_outputs() {
        let (mut net, a, _, n1, o) = two_input_and();
        net.set_required(a, 3.0).unwrap();
        net.set_output_required(7.5);
        assert_eq!(net[o].required, 7.5);
        assert_eq!(net[a].required, 3.0);
        assert_eq!(net[n1].required, UNCONSTRAINED);
    }

    #[test]
    fn display_name_includes_port_name() {
        let (net, a, _, n1, _) = two_input_and();
        assert_eq!(net.display_name(a), "n0 (a)");
        assert_eq!(net.display_name(n1), "n2");
    }

    #[test]
    fn outputs_cannot_feed_logic() {
        let (mut net, a, _, _, o) = two_input_and();
        let err = net.add_and(a, o).unwrap_err();
        assert!(err.message.contains("fanin n3 is a combinational output"));
        let err = net.add_po("o2", o, 1.0).unwrap_err();
        assert!(err.message.contains("output driver n3"));
        assert_eq!(net.len(), 4);
    }

    #[test]
    fn output_is_not_a_cut_leaf() {
        // o1 is an output; g only uses a structurally.
        let mut net = Network::new();
        let a = net.add_pi("a");
        let b = net.add_pi("b");
        let o1 = net.add_po("o1", a, 5.0).unwrap();
        let g = net.add_and(a, b).unwrap();
        let err = net.set_best_cut(g, BestCut::new([a, o1], 0)).unwrap_err();
        assert!(err.message.contains("leaf n2 of the best cut of n3 is a combinational output"));
        assert!(net[g].best_cut.is_none());
    }

    #[test]
    fn validate_rejects_output_as_fanin_or_leaf() {
        let fanin = r#"{"nodes": [
            {"id": 0, "kind": "primary_input", "name": "a"},
            {"id": 1, "kind": "primary_output", "fanin0": {"node": 0}, "required": 5.0},
            {"id": 2, "kind": "and_gate", "fanin0": {"node": 0}, "fanin1": {"node": 1}},
            {"id": 3, "kind": "primary_output", "fanin0": {"node": 2}, "required": 3.0}
        ]}"#;
        let net: Network = serde_json::from_str(fanin).unwrap();
        let err = net.validate(6).unwrap_err();
        assert!(err.message.contains("fanin n1 of n2 is a combinational output"));

        let leaf = r#"{"nodes": [
            {"id": 0, "kind": "primary_input", "name": "a"},
            {"id": 1, "kind": "primary_input", "name": "b"},
            {"id": 2, "kind": "primary_output", "fanin0": {"node": 0}, "required": 5.0},
            {"id": 3, "kind": "and_gate", "fanin0": {"node": 0}, "fanin1": {"node": 1},
             "best_cut": {"leaves": [0, 2], "depth_class": 0}},
            {"id": 4, "kind": "primary_output", "fanin0": {"node": 3}, "required": 3.0}
        ]}"#;
        let net: Network = serde_json::from_str(leaf).unwrap();
        let err = net.validate(6).unwrap_err();
        assert!(err.message.contains("leaf n2 of the best cut of n3 is a combinational output"));
    }

    #[test]
    fn validate_accepts_builder_output() {
        let (mut net, a, b, n1, _) = two_input_and();
        net.set_best_cut(n1, BestCut::new([a, b], 1)).unwrap();
        assert!(net.validate(6).is_ok());
    }

    #[test]
    fn validate_rejects_oversized_cut() {
        let (mut net, a, b, n1, _) = two_input_and();
        net.set_best_cut(n1, BestCut::new([a, b], 1)).unwrap();
        let err = net.validate(1).unwrap_err();
        assert!(err.message.contains("expected 1..=1"));
    }

    #[test]
    fn validate_rejects_forward_fanin_from_json() {
        let json = r#"{"nodes": [
            {"id": 0, "kind": "and_gate", "fanin0": {"node": 1}, "fanin1": {"node": 1}},
            {"id": 1, "kind": "primary_input", "name": "a"}
        ]}"#;
        let net: Network = serde_json::from_str(json).unwrap();
        let err = net.validate(6).unwrap_err();
        assert!(err.message.contains("does not precede"));
    }

    #[test]
    fn validate_rejects_wrong_arity() {
        let json = r#"{"nodes": [
            {"id": 0, "kind": "primary_input"},
            {"id": 1, "kind": "primary_output", "required": 1.0}
        ]}"#;
        let net: Network = serde_json::from_str(json).unwrap();
        assert!(net.validate(6).is_err());
    }

    #[test]
    fn validate_rejects_misnumbered_node() {
        let json = r#"{"nodes": [{"id": 3, "kind": "primary_input"}]}"#;
        let net: Network = serde_json::from_str(json).unwrap();
        assert!(net.validate(6).is_err());
    }

    #[test]
    fn json_roundtrip_preserves_structure() {
        let (mut net, a, b, n1, o) = two_input_and();
        net.set_best_cut(n1, BestCut::new([a, b], 1)).unwrap();
        let json = serde_json::to_string(&net).unwrap();
        let back: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), net.len());
        assert_eq!(back[n1].best_cut, net[n1].best_cut);
        assert_eq!(back[o].required, 10.0);
        assert_eq!(back[n1].required, UNCONSTRAINED);
        assert!(back.validate(6).is_ok());
    }
}
