//! Required-time report types.

use crate::interior::InteriorSummary;
use crate::visible::VisibleSummary;
use conemap_aig::{Network, NodeId, NodeKind};
use conemap_common::{is_constrained, Time};
use serde::Serialize;
use std::fmt;

/// The required time of one node after propagation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeTiming {
    /// The node.
    pub id: NodeId,
    /// Its name, if it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Its kind.
    pub kind: NodeKind,
    /// Required time in nanoseconds; `None` when unconstrained.
    pub required: Option<Time>,
    /// Whether the node is part of the mapped netlist.
    pub visible: bool,
}

/// Result of a full required-time propagation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequiredReport {
    /// Statistics of the visible pass.
    pub visible: VisibleSummary,
    /// Statistics of the interior pass.
    pub interior: InteriorSummary,
    /// Non-output nodes no constraint reached.
    pub unconstrained_nodes: usize,
    /// One entry per node, in network order.
    pub nodes: Vec<NodeTiming>,
}

impl RequiredReport {
    /// Collects the per-node state of `network` alongside the pass summaries.
    pub fn build(network: &Network, visible: VisibleSummary, interior: InteriorSummary) -> Self {
        let nodes: Vec<NodeTiming> = network
            .iter()
            .map(|node| NodeTiming {
                id: node.id,
                name: node.name.clone(),
                kind: node.kind,
                required: is_constrained(node.required).then_some(node.required),
                visible: node.flags.visible,
            })
            .collect();
        let unconstrained_nodes = nodes
            .iter()
            .filter(|n| n.required.is_none() && !n.kind.is_co())
            .count();
        Self {
            visible,
            interior,
            unconstrained_nodes,
            nodes,
        }
    }

    /// Tightest required time at a visible combinational input.
    pub fn worst_input_required(&self) -> Option<Time> {
        self.visible.worst_input_required
    }

    /// Looks up the entry of a node.
    pub fn node(&self, id: NodeId) -> Option<&NodeTiming> {
        self.nodes.get(id.index())
    }
}

fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Const => "const",
        NodeKind::PrimaryInput => "pi",
        NodeKind::CombinationalInput => "ci",
        NodeKind::AndGate => "and",
        NodeKind::PrimaryOutput => "po",
        NodeKind::CombinationalOutput => "co",
    }
}

/// Plain-text table used by the CLI.
impl fmt::Display for RequiredReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<8} {:<16} {:<6} {:>12}  role", "node", "name", "kind", "required")?;
        for node in &self.nodes {
            let required = match node.required {
                Some(t) => format!("{t:.3}"),
                None => "-".to_string(),
            };
            let role = match (node.visible, node.required.is_some()) {
                (true, _) => "visible",
                (false, true) => "interior",
                (false, false) => "",
            };
            writeln!(
                f,
                "{:<8} {:<16} {:<6} {:>12}  {}",
                node.id.to_string(),
                node.name.as_deref().unwrap_or(""),
                kind_label(node.kind),
                required,
                role
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "visible: {} node(s), {} mapped gate(s); interior: {} node(s) in {} cone(s); unconstrained: {}",
            self.visible.visible_nodes,
            self.visible.visible_and_gates,
            self.interior.interior_nodes,
            self.interior.cones_walked,
            self.unconstrained_nodes
        )?;
        match self.worst_input_required() {
            Some(t) => write!(f, "worst input required: {t:.3} ns"),
            None => write!(f, "worst input required: -"),
        }
    }
}
