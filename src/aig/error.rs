use thiserror::Error;

use super::NodeId;

/// The result of an AIG operation.
pub type Result<T> = std::result::Result<T, AigError>;

/// Error returned when an AIG operation failed.
///
/// Contract violations (merging a node into itself, freeing a node that is still in use, ...)
/// are not reported here: they panic.
#[derive(Debug, Error)]
pub enum AigError {
    /// The node with given id does not exist (never created, or already freed).
    #[error("node with id={0} does not exist")]
    NodeDoesNotExist(NodeId),

    /// A fanin must point at a constant, an input, an and gate or an undefined node.
    #[error("node {0} cannot be used as a fanin")]
    InvalidFanin(NodeId),

    /// A simulation batch must carry exactly one word per primary input.
    #[error("expected {expected} simulation words (one per input), got {got}")]
    PatternWidth { expected: usize, got: usize },

    /// A simulation word holds at most 64 lanes.
    #[error("a simulation batch holds at most 64 lanes, got {0}")]
    TooManyLanes(usize),

    /// The AIG has reached an invalid state. This should never happen.
    /// For example, a fanin without its matching fanout entry.
    #[error("the AIG has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),

    /// The SAT backend failed to decide a query.
    #[error("sat solver error: {0}")]
    SatSolver(String),
}
