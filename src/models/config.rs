//! Upload configuration.

use serde::{Deserialize, Serialize};

/// Configuration for one coordinator instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfig {
    /// Base URL of the origin service issuing write targets.
    pub origin_base_url: String,
    /// Content type used for the PUT when the caller declares none.
    pub default_content_type: String,
    /// Timeout for the initialize and finalize round trips, in seconds.
    pub control_timeout_secs: u64,
    /// Timeout for the whole-body PUT, in seconds.
    pub transfer_timeout_secs: u64,
    /// How long after session creation a finalize may still be retried,
    /// in seconds. `None` allows indefinite finalize retries; set this when
    /// the object store expires unfinalized uploads.
    pub finalize_validity_secs: Option<u64>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            origin_base_url: "http://127.0.0.1:8080".to_string(),
            default_content_type: "application/octet-stream".to_string(),
            control_timeout_secs: 30,
            transfer_timeout_secs: 300,
            finalize_validity_secs: None,
        }
    }
}
