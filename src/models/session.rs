//! Upload session and its state vocabulary.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One minted upload session: a one-time write target plus the opaque asset
/// identifier correlating the bytes with the later metadata submission.
///
/// Owned exclusively by one coordinator for the lifetime of one attempt and
/// discarded on terminal states or reset. The session carries no state field
/// of its own: [`SessionState`] on the coordinator is the single source of
/// truth for what operation is currently legal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSession {
    pub asset_id: String,
    pub write_target: String,
    pub created_at: DateTime<Utc>,
}

/// The three independently failable steps of one upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Init,
    Transfer,
    Finalize,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Transfer => "transfer",
            Phase::Finalize => "finalize",
        }
    }
}

/// Coordinator state — a tagged variant, never a set of independent flags,
/// so "loading", "uploading" and "error" cannot be true at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum SessionState {
    Idle,
    Initializing,
    Ready,
    Transferring,
    Transferred,
    Finalizing,
    Done,
    Errored { phase: Phase, cause: String },
}

impl SessionState {
    /// Whether further phase calls require an explicit `reset()` first.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Done | SessionState::Errored { .. })
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Initializing => write!(f, "initializing"),
            SessionState::Ready => write!(f, "ready"),
            SessionState::Transferring => write!(f, "transferring"),
            SessionState::Transferred => write!(f, "transferred"),
            SessionState::Finalizing => write!(f, "finalizing"),
            SessionState::Done => write!(f, "done"),
            SessionState::Errored { phase, cause } => {
                write!(f, "errored({}: {})", phase.as_str(), cause)
            }
        }
    }
}
