//! Error taxonomy for the upload handshake.
//!
//! Each of the three phases fails independently, and recovery differs per
//! phase (init failure: retry the whole attempt; transfer failure: retry the
//! whole attempt with a fresh write target; finalize failure: retry just
//! finalize, the bytes are already stored). The coordinator therefore never
//! masks which phase failed: every phase has its own error enum and the
//! caller-facing [`UploadError`] carries the phase in its variant.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UploadError>;

/// Initialize-phase failure. Terminal for the attempt; the caller must start
/// a new attempt with `reset()` + `begin()`.
#[derive(Debug, Clone, Error)]
pub enum InitError {
    /// Transport-level failure reaching the origin service.
    #[error("origin service unreachable: {0}")]
    Unreachable(String),
    /// The origin service answered but refused to mint a write target.
    #[error("initialize rejected: {0}")]
    Rejected(String),
    /// The caller cancelled the attempt while the round trip was in flight.
    #[error("cancelled")]
    Cancelled,
}

/// Transfer-phase failure. The write target's consumption state after a
/// failed PUT is unknown, so the session is unusable; the only recovery is a
/// fresh attempt with a new target.
#[derive(Debug, Clone, Error)]
pub enum TransferError {
    #[error("write target unreachable: {0}")]
    Unreachable(String),
    /// The target answered with a non-success status.
    #[error("transfer rejected: {0}")]
    Rejected(String),
    #[error("cancelled")]
    Cancelled,
}

/// Finalize-phase failure. The stored bytes survive a failed finalize, so
/// finalize alone may be retried while the session is still valid.
#[derive(Debug, Clone, Error)]
pub enum FinalizeError {
    #[error("origin service unreachable: {0}")]
    Unreachable(String),
    #[error("finalize rejected: {0}")]
    Rejected(String),
    #[error("cancelled")]
    Cancelled,
}

impl InitError {
    /// The underlying cause, without the phase framing of `Display`.
    pub fn cause(&self) -> &str {
        match self {
            InitError::Unreachable(s) | InitError::Rejected(s) => s,
            InitError::Cancelled => "cancelled",
        }
    }
}

impl TransferError {
    /// The underlying cause, without the phase framing of `Display`.
    pub fn cause(&self) -> &str {
        match self {
            TransferError::Unreachable(s) | TransferError::Rejected(s) => s,
            TransferError::Cancelled => "cancelled",
        }
    }
}

impl FinalizeError {
    /// The underlying cause, without the phase framing of `Display`.
    pub fn cause(&self) -> &str {
        match self {
            FinalizeError::Unreachable(s) | FinalizeError::Rejected(s) => s,
            FinalizeError::Cancelled => "cancelled",
        }
    }
}

/// Local metadata validation failure. Never triggers a network call and never
/// transitions the state machine; the caller corrects the input and retries
/// finalize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required and must be 1-100 characters after trimming")]
    Title,
    #[error("description must be at most 1000 characters")]
    Description,
    #[error("visibility must be one of: public, unlisted, private")]
    Visibility,
}

/// Caller-facing error for every coordinator operation.
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    #[error("initialize failed: {0}")]
    Init(#[from] InitError),
    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),
    #[error("finalize failed: {0}")]
    Finalize(#[from] FinalizeError),
    #[error("invalid metadata: {0}")]
    Validation(#[from] ValidationError),
    /// Caller programming/ordering error, e.g. `transfer` outside `Ready`.
    /// The state machine is left unchanged.
    #[error("{operation} is not legal in state {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },
}

impl UploadError {
    /// Whether this error is a local fault (validation or call ordering)
    /// rather than a phase failure. Local faults never consumed the session.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            UploadError::Validation(_) | UploadError::InvalidState { .. }
        )
    }
}
