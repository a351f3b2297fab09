use thiserror::Error;

use crate::miter::MiterError;
use crate::network::NetworkError;

use super::NodeId;

/// The result of a fallible FRAIG operation.
pub type Result<T> = std::result::Result<T, FraigError>;

/// Error returned when a FRAIG operation failed.
///
/// Building nodes never fails, and an inconclusive equivalence check is reported
/// as [`EquivResult::Unknown`], not as an error.
///
/// [`EquivResult::Unknown`]: crate::EquivResult::Unknown
#[derive(Debug, Error)]
pub enum FraigError {
    /// The node with given id does not exist.
    #[error("node with id={0} does not exist")]
    NodeDoesNotExist(NodeId),

    /// The input with given position does not exist.
    #[error("input {0} does not exist")]
    InputDoesNotExist(usize),

    /// The graph has reached an invalid state. This should never happen.
    /// It is only reported by [`Fraig::check_integrity`].
    ///
    /// [`Fraig::check_integrity`]: crate::Fraig::check_integrity
    #[error("the FRAIG has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),

    /// Just forwarding a [`MiterError`].
    #[error("{0}")]
    MiterError(#[from] MiterError),

    /// Just forwarding a [`NetworkError`].
    #[error("{0}")]
    NetworkError(#[from] NetworkError),
}
