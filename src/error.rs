//! Crate-wide error type.

use thiserror::Error;

/// Errors raised while configuring histograms, regions or detectors.
///
/// Every variant is a setup-time fault: the caller fixes the configuration and
/// rebuilds the object. Nothing in the crate retries or recovers internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A constructor argument is out of its valid domain (degenerate range,
    /// bin count below one, edge above the declared maximum, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A call was made with arguments that violate its precondition
    /// (voxel index out of range, zero-length normal, ...).
    #[error("precondition violated: {0}")]
    Precondition(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        Error::Precondition(msg.into())
    }
}
