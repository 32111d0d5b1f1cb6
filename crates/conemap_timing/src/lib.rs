//! Required-time propagation for priority-cut technology mapping.
//!
//! Given an AIG whose AND gates carry the best cut chosen by the mapper, this
//! crate computes how late every node may settle without violating the
//! required times at the combinational outputs. It runs in two passes over an
//! explicit [`TopoOrder`]:
//!
//! 1. [`compute_visible_required`] seeds output drivers and relaxes required
//!    times backward through the best cuts of visible AND gates, charging
//!    the depth-class delay of each implementation.
//! 2. [`assign_invisible_required`] hands each visible gate's required time
//!    to the nodes absorbed inside its implementation.
//!
//! [`propagate_required`] runs both and returns a [`RequiredReport`];
//! [`check_required_times`] re-derives the result independently.
//!
//! # Usage
//!
//! ```ignore
//! use conemap_timing::{propagate_required, DelayTable, PropagationParams};
//!
//! let order = TopoOrder::of(&network);
//! let delays = DelayTable::from_config(&config);
//! let params = PropagationParams::from_config(&config);
//! let report = propagate_required(&mut network, &order, &delays, &params, &sink)?;
//! println!("worst input required: {:?}", report.worst_input_required());
//! ```
//!
//! # Architecture
//!
//! - [`visible`]: output seeding and cut relaxation over visible nodes
//! - [`interior`]: bounded cone walks assigning interior required times
//! - [`delay`]: the depth-class delay table
//! - [`check`]: independent consistency checker
//! - [`report`]: per-node report types
//! - [`error`]: upstream contract violations

#![warn(missing_docs)]

pub mod check;
pub mod delay;
pub mod error;
pub mod interior;
pub mod report;
pub mod visible;

pub use check::{check_required_times, RequiredViolation, INCONSISTENT_REQUIRED};
pub use delay::DelayTable;
pub use error::{RequiredTimeError, CONE_OVERFLOW, DELAY_CLASS_OUT_OF_RANGE, MISSING_BEST_CUT};
pub use interior::{assign_invisible_required, InteriorSummary};
pub use report::{NodeTiming, RequiredReport};
pub use visible::{
    compute_visible_required, VisibleSummary, CONFLICTING_OUTPUT_REQUIRED,
    NEGATIVE_INPUT_REQUIRED,
};

use conemap_aig::{Network, TopoOrder};
use conemap_config::{MapperConfig, MapperSection};
use conemap_diagnostics::DiagnosticSink;
use tracing::info;

/// Tunables of a propagation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationParams {
    /// Most nodes one interior cone walk may reach, cut leaves included.
    pub cone_capacity: usize,
}

impl PropagationParams {
    /// Takes the parameters from a loaded configuration.
    pub fn from_config(config: &MapperConfig) -> Self {
        Self {
            cone_capacity: config.mapper.cone_capacity,
        }
    }
}

impl Default for PropagationParams {
    fn default() -> Self {
        Self {
            cone_capacity: MapperSection::default().cone_capacity,
        }
    }
}

/// Runs both propagation passes and reports the result.
///
/// Every non-output required time in `network` is recomputed; output
/// required times are the inputs of the run and are left as they are.
pub fn propagate_required(
    network: &mut Network,
    order: &TopoOrder,
    delays: &DelayTable,
    params: &PropagationParams,
    sink: &DiagnosticSink,
) -> Result<RequiredReport, RequiredTimeError> {
    let visible = compute_visible_required(network, order, delays, sink)?;
    let interior = assign_invisible_required(network, order, params.cone_capacity)?;
    let report = RequiredReport::build(network, visible, interior);
    info!(
        nodes = network.len(),
        visible = visible.visible_nodes,
        interior = interior.interior_nodes,
        unconstrained = report.unconstrained_nodes,
        "required times propagated"
    );
    Ok(report)
}
