//! Time values for required-time propagation.
//!
//! All times are nanoseconds stored as `f64`. A node that no consumer has
//! constrained yet carries [`UNCONSTRAINED`], which compares greater than
//! every finite time, so the plain `<` tightening rule needs no special case.

/// A settling time in nanoseconds.
pub type Time = f64;

/// Sentinel for "no consumer has constrained this node yet".
pub const UNCONSTRAINED: Time = f64::INFINITY;

/// Lowers `slot` to `candidate` if the candidate is strictly tighter.
///
/// Returns `true` if `slot` changed. Required times only ever move down
/// through this function.
pub fn tighten(slot: &mut Time, candidate: Time) -> bool {
    if candidate < *slot {
        *slot = candidate;
        true
    } else {
        false
    }
}

/// Returns `true` if `time` is a real constraint rather than the sentinel.
pub fn is_constrained(time: Time) -> bool {
    time < UNCONSTRAINED
}
