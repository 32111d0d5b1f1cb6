//! Independent re-derivation of the propagation invariants.
//!
//! [`check_required_times`] inspects a network after propagation and reports
//! every place where its required times or flags disagree with what the
//! passes must produce. It shares no code with the passes, so it also
//! catches networks whose required times were edited afterwards.

use crate::delay::DelayTable;
use conemap_aig::{Network, NodeId, TopoOrder};
use conemap_common::{tighten, Time, UNCONSTRAINED};
use conemap_diagnostics::{Category, Diagnostic, DiagnosticCode};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// A processed network disagrees with the propagation rules.
pub const INCONSISTENT_REQUIRED: DiagnosticCode = DiagnosticCode::new(Category::Error, 10);

/// A disagreement between a processed network and the propagation rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequiredViolation {
    /// An output driver is later than one of its outputs.
    UnseededDriver {
        /// The combinational output.
        output: NodeId,
        /// Its driver.
        driver: NodeId,
        /// Required time of the output.
        output_required: Time,
        /// Required time of the driver.
        driver_required: Time,
    },
    /// A cut leaf is later than its consumer's required time minus the
    /// implementation delay.
    CutBoundExceeded {
        /// The visible AND gate.
        node: NodeId,
        /// The leaf of its best cut.
        leaf: NodeId,
        /// `required - delay` of the gate.
        bound: Time,
        /// Required time of the leaf.
        leaf_required: Time,
    },
    /// An interior node is later than a gate whose cone absorbs it.
    InteriorNotAbsorbed {
        /// The interior node.
        node: NodeId,
        /// The visible AND gate whose cone contains it.
        consumer: NodeId,
        /// Required time of the interior node.
        required: Time,
        /// Required time of the gate.
        consumer_required: Time,
    },
    /// A node is tighter than every constraint that reaches it.
    OverConstrained {
        /// The node.
        node: NodeId,
        /// The tightest constraint reaching it, or unconstrained.
        expected: Time,
        /// Its required time.
        actual: Time,
    },
    /// The visible flag disagrees with reachability through chosen cuts.
    VisibilityMismatch {
        /// The node.
        node: NodeId,
        /// The value of the flag.
        flagged: bool,
    },
    /// A boundary flag survived the interior walk.
    StaleBoundary {
        /// The node.
        node: NodeId,
    },
    /// A visible AND gate has no best cut.
    MissingBestCut {
        /// The AND gate.
        node: NodeId,
    },
    /// A best cut's depth class is not in the delay table.
    UnknownDepthClass {
        /// The AND gate.
        node: NodeId,
        /// The depth class.
        depth_class: usize,
    },
}

impl RequiredViolation {
    /// The node the violation is reported at.
    pub fn node(&self) -> NodeId {
        match *self {
            RequiredViolation::UnseededDriver { driver, .. } => driver,
            RequiredViolation::CutBoundExceeded { leaf, .. } => leaf,
            RequiredViolation::InteriorNotAbsorbed { node, .. }
            | RequiredViolation::OverConstrained { node, .. }
            | RequiredViolation::VisibilityMismatch { node, .. }
            | RequiredViolation::StaleBoundary { node }
            | RequiredViolation::MissingBestCut { node }
            | RequiredViolation::UnknownDepthClass { node, .. } => node,
        }
    }

    /// Renders the violation as an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(INCONSISTENT_REQUIRED, self.to_string()).at_node(self.node().as_raw())
    }
}

impl fmt::Display for RequiredViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredViolation::UnseededDriver {
                output,
                driver,
                output_required,
                driver_required,
            } => write!(
                f,
                "driver {driver} requires {driver_required:.3} ns, later than output {output} at {output_required:.3} ns"
            ),
            RequiredViolation::CutBoundExceeded {
                node,
                leaf,
                bound,
                leaf_required,
            } => write!(
                f,
                "leaf {leaf} requires {leaf_required:.3} ns, later than the {bound:.3} ns bound of {node}"
            ),
            RequiredViolation::InteriorNotAbsorbed {
                node,
                consumer,
                required,
                consumer_required,
            } => write!(
                f,
                "interior node {node} requires {required:.3} ns, later than {consumer} at {consumer_required:.3} ns"
            ),
            RequiredViolation::OverConstrained {
                node,
                expected,
                actual,
            } => write!(
                f,
                "{node} requires {actual:.3} ns, tighter than its tightest constraint {expected:.3} ns"
            ),
            RequiredViolation::VisibilityMismatch { node, flagged } => {
                let state = if *flagged { "visible" } else { "invisible" };
                write!(f, "{node} is flagged {state}, but reachability says otherwise")
            }
            RequiredViolation::StaleBoundary { node } => {
                write!(f, "{node} still carries a boundary flag")
            }
            RequiredViolation::MissingBestCut { node } => {
                write!(f, "visible AND gate {node} has no best cut")
            }
            RequiredViolation::UnknownDepthClass { node, depth_class } => {
                write!(f, "best cut of {node} has unknown depth class {depth_class}")
            }
        }
    }
}

/// Checks a network that went through both propagation passes.
///
/// Visibility is recomputed from the outputs, every node's required time is
/// compared against the constraints that reach it, and leftover boundary
/// flags are reported. Creation order is used as the topological order, so
/// the network must satisfy [`Network::validate`]. An empty result means
/// the network is consistent.
pub fn check_required_times(network: &Network, delays: &DelayTable) -> Vec<RequiredViolation> {
    let mut violations = Vec::new();
    let mut expected = vec![UNCONSTRAINED; network.len()];
    let mut visible = vec![false; network.len()];

    for output in network.outputs() {
        visible[output.id.index()] = true;
        let Some(driver) = output.driver() else {
            continue;
        };
        visible[driver.index()] = true;
        tighten(&mut expected[driver.index()], output.required);
        let driver_required = network[driver].required;
        if driver_required > output.required {
            violations.push(RequiredViolation::UnseededDriver {
                output: output.id,
                driver,
                output_required: output.required,
                driver_required,
            });
        }
    }

    for id in TopoOrder::of(network).rev() {
        let node = &network[id];
        if !visible[node.id.index()] || !node.kind.is_and() {
            continue;
        }
        let Some(cut) = &node.best_cut else {
            violations.push(RequiredViolation::MissingBestCut { node: node.id });
            continue;
        };
        let Some(delay) = delays.get(cut.depth_class) else {
            violations.push(RequiredViolation::UnknownDepthClass {
                node: node.id,
                depth_class: cut.depth_class,
            });
            continue;
        };
        let bound = node.required - delay;
        for &leaf in &cut.leaves {
            visible[leaf.index()] = true;
            tighten(&mut expected[leaf.index()], bound);
            let leaf_required = network[leaf].required;
            if leaf_required > bound {
                violations.push(RequiredViolation::CutBoundExceeded {
                    node: node.id,
                    leaf,
                    bound,
                    leaf_required,
                });
            }
        }
    }

    for node in network.iter() {
        if node.flags.boundary {
            violations.push(RequiredViolation::StaleBoundary { node: node.id });
        }
        if node.flags.visible != visible[node.id.index()] {
            violations.push(RequiredViolation::VisibilityMismatch {
                node: node.id,
                flagged: node.flags.visible,
            });
        }
    }

    let mut seen = vec![false; network.len()];
    for root in network.iter() {
        if !visible[root.id.index()] || !root.kind.is_and() {
            continue;
        }
        let Some(cut) = &root.best_cut else {
            continue;
        };
        seen.iter_mut().for_each(|s| *s = false);
        let mut queue: VecDeque<NodeId> = root.fanins().collect();
        while let Some(id) = queue.pop_front() {
            if seen[id.index()] || cut.contains(id) {
                continue;
            }
            seen[id.index()] = true;
            let node = &network[id];
            if !visible[id.index()] {
                tighten(&mut expected[id.index()], root.required);
                if node.required > root.required {
                    violations.push(RequiredViolation::InteriorNotAbsorbed {
                        node: id,
                        consumer: root.id,
                        required: node.required,
                        consumer_required: root.required,
                    });
                }
            }
            queue.extend(node.fanins());
        }
    }

    for node in network.iter().filter(|n| !n.kind.is_co()) {
        let want = expected[node.id.index()];
        if node.required < want {
            violations.push(RequiredViolation::OverConstrained {
                node: node.id,
                expected: want,
                actual: node.required,
            });
        }
    }

    violations
}
