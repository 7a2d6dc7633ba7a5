//! Session initiator — obtains exactly one upload session per attempt.

use chrono::Utc;

use crate::api::OriginApi;
use crate::error::InitError;
use crate::models::session::UploadSession;

/// Requests a one-time write target plus asset id from the origin service.
///
/// Issues exactly one outbound request per `initialize` call and never
/// retries internally: a blind retry could mint unused write targets on the
/// origin service, so retry policy stays with the caller.
pub struct SessionInitiator<'a, A: OriginApi> {
    api: &'a A,
}

impl<'a, A: OriginApi> SessionInitiator<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Obtain a fresh upload session.
    ///
    /// Success guarantees a non-empty write target and asset id, both unused.
    /// Both failure variants are terminal for the attempt.
    pub async fn initialize(&self) -> Result<UploadSession, InitError> {
        let resp = self.api.initialize().await?;

        if resp.upload_url.is_empty() {
            return Err(InitError::Rejected(
                "initialize returned an empty upload URL".to_string(),
            ));
        }
        if resp.video_id.is_empty() {
            return Err(InitError::Rejected(
                "initialize returned an empty asset id".to_string(),
            ));
        }

        log::info!(
            "Upload session initialized: asset_id={}, write_target={}",
            resp.video_id,
            resp.upload_url
        );

        Ok(UploadSession {
            asset_id: resp.video_id,
            write_target: resp.upload_url,
            created_at: Utc::now(),
        })
    }
}
