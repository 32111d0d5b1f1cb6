//! And-inverter graph representation for cut-based technology mapping.
//!
//! A [`Network`] stores its nodes densely in creation order. Builder methods
//! only accept fanins that already exist, so creation order is always a valid
//! topological order. Each AND node may carry the [`BestCut`] selected by the
//! upstream mapper, and every node carries the mutable required time and
//! transient [`NodeFlags`] that required-time propagation works on.
//!
//! Passes do not iterate the node vector directly; they take an explicit
//! [`TopoOrder`] so that the order precondition is checked once, up front.

#![warn(missing_docs)]

pub mod cut;
pub mod ids;
pub mod network;
pub mod node;
pub mod order;

pub use cut::{BestCut, CutLeaves};
pub use ids::NodeId;
pub use network::Network;
pub use node::{Lit, Node, NodeFlags, NodeKind};
pub use order::TopoOrder;
