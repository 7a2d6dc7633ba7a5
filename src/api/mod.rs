//! Origin service API abstraction layer.
//!
//! This module defines the `OriginApi` trait, which is the sole interface for
//! all HTTP interactions of one upload attempt: the initialize call to the
//! origin service, the direct PUT to the minted write target, and the
//! metadata finalize call. All network requests MUST be implemented within
//! the `api/` directory. Upper-layer modules (`services/`) call through this
//! trait and never construct HTTP requests directly.
//!
//! This keeps the origin service's wire format swappable: when the API
//! changes, only the implementation within this module needs to be updated,
//! and the state machine tests can drive a mock implementation instead of a
//! live server.

use crate::error::{FinalizeError, InitError, TransferError};
use crate::models::metadata::Visibility;

/// Successful initialize response: a one-time write target plus the opaque
/// asset identifier correlating the uploaded bytes with the later finalize.
#[derive(Debug, Clone)]
pub struct InitializeResponse {
    pub upload_url: String,
    pub video_id: String,
}

/// Parameters for the direct whole-body PUT to the write target.
#[derive(Debug)]
pub struct PutObjectParams {
    pub target_url: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Parameters for the metadata finalize call. Carries the asset id as the
/// file reference; the bytes themselves already went to the write target.
#[derive(Debug, Clone)]
pub struct FinalizeParams {
    pub asset_id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub visibility: Visibility,
}

/// Abstraction trait for the origin service and write target interactions.
///
/// The current implementation is `OriginApiV1`. Test suites substitute a
/// scripted mock to exercise the coordinator without a network.
pub trait OriginApi: Send + Sync {
    /// Request a one-time write target from the origin service.
    ///
    /// Each call may mint a new, distinct target; callers must not assume
    /// repeated calls return the same one. One outbound request per call —
    /// retry policy belongs to the caller.
    fn initialize(
        &self,
    ) -> impl std::future::Future<Output = std::result::Result<InitializeResponse, InitError>> + Send;

    /// Upload the raw file body to the write target with a single PUT.
    ///
    /// Not chunked and not resumed: any non-2xx response or transport failure
    /// is a transfer failure, after which the target must be considered
    /// consumed in an unknown state.
    fn put_object(
        &self,
        params: PutObjectParams,
    ) -> impl std::future::Future<Output = std::result::Result<(), TransferError>> + Send;

    /// Submit the full metadata record for a stored asset.
    ///
    /// Multipart form call to the origin service; 2xx is the only success
    /// signal, no structured error body is guaranteed.
    fn finalize(
        &self,
        params: FinalizeParams,
    ) -> impl std::future::Future<Output = std::result::Result<(), FinalizeError>> + Send;
}

pub mod v1;
