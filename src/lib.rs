//! Upload coordination core.
//!
//! Drives a large media upload through the three-phase handshake against the
//! origin service: initialize (obtain a one-time write target + asset id),
//! transfer (single whole-body PUT of the file bytes directly to that
//! target), and finalize (submit descriptive metadata for the stored asset).
//!
//! The caller-facing surface is [`services::coordinator::UploadCoordinator`],
//! which owns the session state machine. All HTTP goes through the
//! [`api::OriginApi`] trait; callers never construct requests directly.

pub mod api;
pub mod error;
pub mod models;
pub mod services;
