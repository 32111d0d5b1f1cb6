//! Errors raised when the mapped network breaks the propagation contract.

use conemap_aig::NodeId;
use conemap_common::InternalError;
use conemap_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// A visible AND gate reached propagation without a best cut.
pub const MISSING_BEST_CUT: DiagnosticCode = DiagnosticCode::new(Category::Error, 1);

/// A best cut names a depth class outside the delay table.
pub const DELAY_CLASS_OUT_OF_RANGE: DiagnosticCode = DiagnosticCode::new(Category::Error, 2);

/// An interior cone walk ran out of queue capacity.
pub const CONE_OVERFLOW: DiagnosticCode = DiagnosticCode::new(Category::Error, 3);

/// A violated precondition of required-time propagation.
///
/// Every variant means the upstream cut-selection stage handed over a network
/// it should not have; none of them are recoverable inside a pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequiredTimeError {
    /// A visible AND gate has no best cut.
    #[error("visible AND gate {node} has no best cut")]
    MissingBestCut {
        /// The AND gate.
        node: NodeId,
    },

    /// A best cut names a depth class the delay table does not have.
    #[error("best cut of {node} has depth class {depth_class}, but the delay table has {table_len} entries")]
    DelayClassOutOfRange {
        /// The AND gate.
        node: NodeId,
        /// The offending depth class.
        depth_class: usize,
        /// Number of entries in the delay table.
        table_len: usize,
    },

    /// The cone enclosed by a best cut does not fit the walk queue.
    #[error("cone enclosed by the best cut of {node} exceeds the walk capacity of {capacity} nodes")]
    ConeOverflow {
        /// The AND gate whose cone was being walked.
        node: NodeId,
        /// The configured queue capacity.
        capacity: usize,
    },
}

impl RequiredTimeError {
    /// The diagnostic code of this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            RequiredTimeError::MissingBestCut { .. } => MISSING_BEST_CUT,
            RequiredTimeError::DelayClassOutOfRange { .. } => DELAY_CLASS_OUT_OF_RANGE,
            RequiredTimeError::ConeOverflow { .. } => CONE_OVERFLOW,
        }
    }

    /// The AND gate the error is about.
    pub fn node(&self) -> NodeId {
        match *self {
            RequiredTimeError::MissingBestCut { node }
            | RequiredTimeError::DelayClassOutOfRange { node, .. }
            | RequiredTimeError::ConeOverflow { node, .. } => node,
        }
    }

    /// Renders the error as an error diagnostic located at its gate.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string()).at_node(self.node().as_raw());
        match self {
            RequiredTimeError::MissingBestCut { .. } => {
                diag.with_help("run cut selection before required-time propagation")
            }
            RequiredTimeError::DelayClassOutOfRange { .. } => {
                diag.with_help("extend `delay.table` to cover every depth class")
            }
            RequiredTimeError::ConeOverflow { .. } => {
                diag.with_help("raise `mapper.cone_capacity`")
            }
        }
    }
}

impl From<RequiredTimeError> for InternalError {
    fn from(err: RequiredTimeError) -> Self {
        InternalError::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_cut() {
        let err = RequiredTimeError::MissingBestCut {
            node: NodeId::from_raw(4),
        };
        assert_eq!(err.to_string(), "visible AND gate n4 has no best cut");
    }

    #[test]
    fn display_overflow() {
        let err = RequiredTimeError::ConeOverflow {
            node: NodeId::from_raw(9),
            capacity: 64,
        };
        assert_eq!(
            err.to_string(),
            "cone enclosed by the best cut of n9 exceeds the walk capacity of 64 nodes"
        );
    }

    #[test]
    fn converts_to_internal_error() {
        let err: InternalError = RequiredTimeError::DelayClassOutOfRange {
            node: NodeId::from_raw(2),
            depth_class: 5,
            table_len: 3,
        }
        .into();
        assert!(err.message.contains("depth class 5"));
    }

    #[test]
    fn diagnostic_carries_code_and_node() {
        let diag = RequiredTimeError::ConeOverflow {
            node: NodeId::from_raw(9),
            capacity: 3,
        }
        .to_diagnostic();
        assert!(diag.severity.is_error());
        assert_eq!(diag.code.to_string(), "E003");
        assert_eq!(diag.node, Some(9));
        assert!(diag.message.contains("walk capacity of 3"));
        assert_eq!(diag.help, vec!["raise `mapper.cone_capacity`".to_string()]);
    }

    #[test]
    fn codes_are_distinct() {
        let node = NodeId::from_raw(1);
        let codes = [
            RequiredTimeError::MissingBestCut { node }.code(),
            RequiredTimeError::DelayClassOutOfRange {
                node,
                depth_class: 4,
                table_len: 2,
            }
            .code(),
            RequiredTimeError::ConeOverflow { node, capacity: 2 }.code(),
        ];
        assert_eq!(codes, [MISSING_BEST_CUT, DELAY_CLASS_OUT_OF_RANGE, CONE_OVERFLOW]);
    }
}
