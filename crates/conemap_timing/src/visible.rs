//! Required times of visible nodes.
//!
//! A node is visible when it drives a combinational output or is a leaf of
//! the best cut of another visible node. Visible nodes are the ones the
//! mapped netlist actually contains, so they are the only nodes whose
//! required times are derived from implementation delays:
//!
//! 1. A forward pass clears transient flags, resets every non-output node to
//!    [`UNCONSTRAINED`], and seeds each output driver from its outputs.
//! 2. A reverse pass relaxes, for every visible AND gate, each leaf of its
//!    best cut to `required - delay[depth_class]`.
//!
//! Because the reverse pass visits consumers before their leaves, a node's
//! required time is final before it relaxes its own leaves.

use crate::delay::DelayTable;
use crate::error::RequiredTimeError;
use conemap_aig::{Network, NodeId, TopoOrder};
use conemap_common::{is_constrained, tighten, Time, UNCONSTRAINED};
use conemap_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// An output driver is seeded with different required times by its outputs.
pub const CONFLICTING_OUTPUT_REQUIRED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 1);

/// A combinational input must settle before time zero.
pub const NEGATIVE_INPUT_REQUIRED: DiagnosticCode = DiagnosticCode::new(Category::Timing, 1);

/// Statistics of one visible required-time run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibleSummary {
    /// Combinational outputs that seeded a driver.
    pub seeded_outputs: usize,
    /// Visible nodes, outputs included.
    pub visible_nodes: usize,
    /// Visible AND gates, i.e. mapped implementations.
    pub visible_and_gates: usize,
    /// Tightest required time at a visible combinational input.
    pub worst_input_required: Option<Time>,
}

/// Computes required times of all visible nodes.
///
/// Drivers shared by several outputs take the minimum of their outputs'
/// required times; when those differ a [`CONFLICTING_OUTPUT_REQUIRED`]
/// warning is emitted. Visible inputs whose required time is negative get a
/// [`NEGATIVE_INPUT_REQUIRED`] warning.
///
/// `order` must be a topological order of `network`. Fails if a visible AND
/// gate has no best cut or its depth class is missing from `delays`.
pub fn compute_visible_required(
    network: &mut Network,
    order: &TopoOrder,
    delays: &DelayTable,
    sink: &DiagnosticSink,
) -> Result<VisibleSummary, RequiredTimeError> {
    let mut summary = VisibleSummary::default();
    let mut conflicts = BTreeSet::new();

    // Drivers precede their outputs, so a driver is always reset before any
    // of its outputs seeds it.
    for id in order.iter() {
        let node = &mut network[id];
        node.flags.clear();
        if !node.kind.is_co() {
            node.required = UNCONSTRAINED;
            continue;
        }
        node.flags.visible = true;
        let required = node.required;
        let Some(driver_id) = node.driver() else {
            continue;
        };

        summary.seeded_outputs += 1;
        let driver = &mut network[driver_id];
        driver.flags.visible = true;
        if is_constrained(driver.required) && driver.required != required {
            conflicts.insert(driver_id);
        }
        tighten(&mut driver.required, required);
    }

    for driver in conflicts {
        report_conflicting_outputs(network, driver, sink);
    }

    for id in order.rev() {
        let node = &network[id];
        if !node.flags.visible || !node.kind.is_and() {
            continue;
        }
        summary.visible_and_gates += 1;

        let cut = node
            .best_cut
            .as_ref()
            .ok_or(RequiredTimeError::MissingBestCut { node: id })?;
        let delay = delays
            .get(cut.depth_class)
            .ok_or(RequiredTimeError::DelayClassOutOfRange {
                node: id,
                depth_class: cut.depth_class,
                table_len: delays.len(),
            })?;
        let slack = node.required - delay;
        let leaves = cut.leaves.clone();

        for leaf in leaves {
            let leaf_node = &mut network[leaf];
            leaf_node.flags.visible = true;
            if tighten(&mut leaf_node.required, slack) {
                trace!(%leaf, consumer = %id, required = slack, "leaf relaxed");
            }
        }
    }

    for id in order.iter() {
        let node = &network[id];
        if !node.flags.visible {
            continue;
        }
        summary.visible_nodes += 1;
        if !node.kind.is_ci() || !is_constrained(node.required) {
            continue;
        }
        let required = node.required;
        summary.worst_input_required = Some(
            summary
                .worst_input_required
                .map_or(required, |worst| worst.min(required)),
        );
        if required < 0.0 {
            sink.emit(
                Diagnostic::warning(
                    NEGATIVE_INPUT_REQUIRED,
                    format!(
                        "input {} must settle {:.3} ns before time zero",
                        network.display_name(id),
                        -required
                    ),
                )
                .at_node(id.as_raw())
                .with_help("relax the output constraints or choose faster cuts"),
            );
        }
    }

    debug!(
        seeded_outputs = summary.seeded_outputs,
        visible_nodes = summary.visible_nodes,
        visible_and_gates = summary.visible_and_gates,
        "visible required times computed"
    );
    Ok(summary)
}

fn report_conflicting_outputs(network: &Network, driver: NodeId, sink: &DiagnosticSink) {
    let mut seeds: Vec<(String, Time)> = network
        .outputs()
        .filter(|out| out.driver() == Some(driver))
        .map(|out| (network.display_name(out.id), out.required))
        .collect();
    seeds.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut diag = Diagnostic::warning(
        CONFLICTING_OUTPUT_REQUIRED,
        format!(
            "{} drives {} outputs with different required times",
            network.display_name(driver),
            seeds.len()
        ),
    )
    .at_node(driver.as_raw());
    for (name, required) in &seeds {
        diag = diag.with_note(format!("{name} requires {required:.3} ns"));
    }
    sink.emit(diag.with_help("the tightest output constraint is used for the driver"));
}
