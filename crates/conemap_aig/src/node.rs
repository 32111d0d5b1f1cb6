//! Network nodes, fanin literals, and transient propagation flags.

use crate::cut::BestCut;
use crate::ids::NodeId;
use conemap_common::{Time, UNCONSTRAINED};
use serde::{Deserialize, Serialize};

/// The functional kind of a network node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The constant node.
    Const,
    /// A primary input port.
    PrimaryInput,
    /// A combinational input that is not a port, e.g. a register output.
    CombinationalInput,
    /// A two-input AND gate, the only internal logic the mapper implements.
    AndGate,
    /// A primary output port.
    PrimaryOutput,
    /// A combinational output that is not a port, e.g. a register input.
    CombinationalOutput,
}

impl NodeKind {
    /// Returns `true` for nodes that start combinational paths.
    pub fn is_ci(self) -> bool {
        matches!(self, NodeKind::PrimaryInput | NodeKind::CombinationalInput)
    }

    /// Returns `true` for nodes that end combinational paths.
    pub fn is_co(self) -> bool {
        matches!(self, NodeKind::PrimaryOutput | NodeKind::CombinationalOutput)
    }

    /// Returns `true` for AND gates.
    pub fn is_and(self) -> bool {
        self == NodeKind::AndGate
    }

    /// Number of structural fanins a node of this kind has.
    pub fn fanin_count(self) -> usize {
        match self {
            NodeKind::Const | NodeKind::PrimaryInput | NodeKind::CombinationalInput => 0,
            NodeKind::PrimaryOutput | NodeKind::CombinationalOutput => 1,
            NodeKind::AndGate => 2,
        }
    }
}

/// A fanin reference: a node plus the inverter bit on the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lit {
    /// The driving node.
    pub node: NodeId,
    /// Whether the edge is inverted.
    #[serde(default)]
    pub complemented: bool,
}

impl Lit {
    /// A non-inverted reference to `node`.
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            complemented: false,
        }
    }

    /// An inverted reference to `node`.
    pub fn not(node: NodeId) -> Self {
        Self {
            node,
            complemented: true,
        }
    }
}

impl From<NodeId> for Lit {
    fn from(node: NodeId) -> Self {
        Lit::new(node)
    }
}

/// Transient per-run state of a node.
///
/// Both flags are reset by every visible required-time run and are never
/// serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeFlags {
    /// Reached from an output through drivers and chosen-cut leaves.
    pub visible: bool,
    /// Leaf of the cut whose cone is currently being walked.
    pub boundary: bool,
}

impl NodeFlags {
    /// Clears both flags.
    pub fn clear(&mut self) {
        *self = NodeFlags::default();
    }
}

/// A node of the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Position of this node in the network.
    pub id: NodeId,
    /// The node kind.
    pub kind: NodeKind,
    /// Optional name for reports; ports usually have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// First fanin (drivers of outputs, left input of AND gates).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fanin0: Option<Lit>,
    /// Second fanin (right input of AND gates).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fanin1: Option<Lit>,
    /// Latest time the node's output may settle, in nanoseconds.
    #[serde(
        default = "unconstrained",
        skip_serializing_if = "is_unconstrained"
    )]
    pub required: Time,
    /// The implementation selected by the mapper (AND gates only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_cut: Option<BestCut>,
    /// Transient propagation state.
    #[serde(skip)]
    pub flags: NodeFlags,
}

fn unconstrained() -> Time {
    UNCONSTRAINED
}

fn is_unconstrained(time: &Time) -> bool {
    !conemap_common::is_constrained(*time)
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            name: None,
            fanin0: None,
            fanin1: None,
            required: UNCONSTRAINED,
            best_cut: None,
            flags: NodeFlags::default(),
        }
    }

    /// Iterates over the structural fanin nodes, ignoring inversions.
    pub fn fanins(&self) -> impl Iterator<Item = NodeId> {
        self.fanin0
            .into_iter()
            .chain(self.fanin1)
            .map(|lit| lit.node)
    }

    /// The driver of an output node.
    pub fn driver(&self) -> Option<NodeId> {
        self.fanin0.map(|lit| lit.node)
    }
}
