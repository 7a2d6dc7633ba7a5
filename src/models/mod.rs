//! Data models for the upload coordination core.
//!
//! This module contains the shared data structure definitions used across the
//! crate: the upload session and its state vocabulary, asset metadata with
//! validation, local file helpers, and configuration.

pub mod config;
pub mod file;
pub mod metadata;
pub mod session;
