//! # BLORP Error Handling
//!
//! Recoverable error conditions of batch emission.
//!
//! Only conditions a caller can act on are represented here:
//! - resource exhaustion, answered by flushing the batch and retrying
//! - invalid operation parameters, rejected before anything is emitted
//!
//! Internal consistency violations are not errors; they panic at the point
//! of detection.

use core::fmt;

// =============================================================================
// RESULT TYPE
// =============================================================================

/// BLORP Result type alias
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// ERROR ENUM
// =============================================================================

/// BLORP unified error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Parameter Errors
    // =========================================================================
    /// Invalid parameter provided
    InvalidParameter(&'static str),
    /// Operation not supported on this hardware
    NotSupported(&'static str),

    // =========================================================================
    // Resource Errors
    // =========================================================================
    /// Command space in the batch buffer is exhausted
    BatchFull {
        /// Words requested by the packet
        requested: usize,
        /// Words still free between the command cursor and the state area
        available: usize,
    },
    /// State area of the batch buffer is exhausted
    StateSpaceExhausted {
        /// Bytes requested, before alignment
        requested: usize,
        /// Alignment requested
        alignment: usize,
    },

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    /// Pixel program could not be obtained
    ProgramUnavailable,
    /// Lower-level submission rejected the batch
    SubmissionFailed,
}

impl Error {
    /// Whether flushing the current batch and restarting can clear this error
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::BatchFull { .. } | Self::StateSpaceExhausted { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(what) => write!(f, "invalid parameter: {}", what),
            Self::NotSupported(what) => write!(f, "not supported: {}", what),
            Self::BatchFull {
                requested,
                available,
            } => write!(
                f,
                "batch full: packet needs {} words, {} available",
                requested, available
            ),
            Self::StateSpaceExhausted {
                requested,
                alignment,
            } => write!(
                f,
                "state space exhausted: {} bytes at alignment {}",
                requested, alignment
            ),
            Self::ProgramUnavailable => write!(f, "pixel program unavailable"),
            Self::SubmissionFailed => write!(f, "batch submission failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
