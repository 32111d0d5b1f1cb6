//! Common result and error types for the conemap workspace.

/// The standard result type for operations whose failure means a broken
/// upstream contract.
///
/// `Err` indicates that a caller handed the mapper an inconsistent network
/// (a dangling fanin, an order that is not topological, a cut that does not
/// bound its cone). It is a bug in the producer of the data, not a user-facing
/// timing problem; those are reported through a `DiagnosticSink` and the
/// operation still returns `Ok`.
pub type ConemapResult<T> = Result<T, InternalError>;

/// An internal error indicating a violated structural contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal mapper error: {message}")]
pub struct InternalError {
    /// Description of the violated contract.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
