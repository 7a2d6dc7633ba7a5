//! Business logic layer.
//!
//! This module contains the core of the crate: the session initiator and the
//! upload coordinator state machine. Called by the embedding application;
//! delegates all HTTP interactions to the `api` layer.

pub mod coordinator;
pub mod initiator;
