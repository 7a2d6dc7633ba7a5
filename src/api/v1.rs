//! OriginApiV1 — concrete implementation of the `OriginApi` trait.
//!
//! Speaks the origin service's v1 wire format: JSON initialize at
//! `POST {base}/api/videos/initialize`, raw-body PUT to the minted write
//! target, and multipart finalize at `POST {base}/api/videos/finalize`.

use serde::Deserialize;

use super::{FinalizeParams, InitializeResponse, OriginApi, PutObjectParams};
use crate::error::{FinalizeError, InitError, TransferError};
use crate::models::config::UploadConfig;

const USER_AGENT: &str = "VideoUploader/0.1.0";

pub struct OriginApiV1 {
    client: reqwest::Client,
    base_url: String,
    transfer_timeout: std::time::Duration,
}

/// Initialize response body as the origin service serializes it.
///
/// A `success: false` body can arrive with a 200 status; the embedded error
/// string is the authoritative failure reason in that case.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InitializeBody {
    success: bool,
    #[serde(default)]
    upload_url: String,
    #[serde(default)]
    video_id: String,
    #[serde(default)]
    error: Option<String>,
}

impl OriginApiV1 {
    pub fn new(config: &UploadConfig) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(config.control_timeout_secs))
            .build()
            .map_err(|e| {
                crate::error::UploadError::Init(InitError::Unreachable(format!(
                    "failed to build HTTP client: {}",
                    e
                )))
            })?;
        Ok(Self {
            client,
            base_url: config.origin_base_url.trim_end_matches('/').to_string(),
            transfer_timeout: std::time::Duration::from_secs(config.transfer_timeout_secs),
        })
    }

    /// Interpret a decoded initialize body.
    /// Separated as pub(crate) for unit testing without network.
    pub(crate) fn parse_initialize_body(
        body: InitializeBody,
    ) -> std::result::Result<InitializeResponse, InitError> {
        if !body.success {
            return Err(InitError::Rejected(
                body.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "initialize failed without a reason".to_string()),
            ));
        }
        Ok(InitializeResponse {
            upload_url: body.upload_url,
            video_id: body.video_id,
        })
    }
}

impl OriginApi for OriginApiV1 {
    async fn initialize(&self) -> std::result::Result<InitializeResponse, InitError> {
        let url = format!("{}/api/videos/initialize", self.base_url);
        let resp = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| InitError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(InitError::Rejected(format!("HTTP {}", status)));
        }

        let body: InitializeBody = resp
            .json()
            .await
            .map_err(|e| InitError::Rejected(format!("malformed initialize response: {}", e)))?;
        Self::parse_initialize_body(body)
    }

    async fn put_object(&self, params: PutObjectParams) -> std::result::Result<(), TransferError> {
        // Large bodies need more headroom than control calls get.
        let resp = self
            .client
            .put(&params.target_url)
            .timeout(self.transfer_timeout)
            .header(reqwest::header::CONTENT_TYPE, &params.content_type)
            .body(params.data)
            .send()
            .await
            .map_err(|e| TransferError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransferError::Rejected(format!("HTTP {}", status)));
        }
        Ok(())
    }

    async fn finalize(&self, params: FinalizeParams) -> std::result::Result<(), FinalizeError> {
        let form = reqwest::multipart::Form::new()
            .text("videoId", params.asset_id)
            .text("title", params.title)
            .text("description", params.description)
            .text("tags", params.tags.join(","))
            .text("visibility", params.visibility.as_str().to_string());

        let url = format!("{}/api/videos/finalize", self.base_url);
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| FinalizeError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FinalizeError::Rejected(format!("HTTP {}", status)));
        }
        Ok(())
    }
}

/// Lightweight connectivity check against the origin service.
///
/// Sends an HTTP HEAD request with a 5-second timeout. Returns `true` if the
/// server responds (any HTTP status), `false` if the request fails (network
/// error, timeout, DNS failure). Offline is a normal application state, not
/// an error condition.
pub async fn check_connectivity(base_url: &str) -> bool {
    let client = match reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(5))
        .build()
    {
        Ok(c) => c,
        Err(_) => return false,
    };
    client.head(base_url).send().await.is_ok()
}
