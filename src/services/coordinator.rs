//! Upload coordinator — the session state machine.
//!
//! Sequences one upload attempt through its three phases: initialize (obtain
//! a one-time write target), transfer (single whole-body PUT of the file
//! bytes), finalize (submit the metadata record). Progress is a single
//! [`SessionState`] tagged variant; operations are only legal in the state
//! the transition table permits, and calling one anywhere else is a caller
//! ordering error (`InvalidState`), not a transient failure.
//!
//! One coordinator instance owns one attempt. Concurrent uploads use
//! independent instances, each with its own session and cancel flag.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::api::{FinalizeParams, OriginApi, PutObjectParams};
use crate::error::{FinalizeError, InitError, TransferError, UploadError};
use crate::models::config::UploadConfig;
use crate::models::metadata::AssetMetadata;
use crate::models::session::{Phase, SessionState, UploadSession};
use crate::services::initiator::SessionInitiator;

/// Cancel-flag polling interval while a network round trip is in flight.
const CANCEL_POLL_INTERVAL_MS: u64 = 10;

/// Drive a future to completion unless the cancel flag is raised first.
///
/// Returns `None` on cancellation; the future (and any request buffered in
/// it) is dropped at that point.
async fn run_cancellable<T>(cancel_flag: &AtomicBool, fut: impl Future<Output = T>) -> Option<T> {
    tokio::pin!(fut);
    loop {
        if cancel_flag.load(Ordering::Relaxed) {
            return None;
        }
        let poll = tokio::time::timeout(
            std::time::Duration::from_millis(CANCEL_POLL_INTERVAL_MS),
            &mut fut,
        )
        .await;
        if let Ok(out) = poll {
            return Some(out);
        }
    }
}

pub struct UploadCoordinator<A: OriginApi> {
    api: A,
    config: UploadConfig,
    state: SessionState,
    session: Option<UploadSession>,
    attempt_id: String,
    cancel_flag: Arc<AtomicBool>,
}

impl<A: OriginApi> UploadCoordinator<A> {
    pub fn new(api: A, config: UploadConfig) -> Self {
        Self {
            api,
            config,
            state: SessionState::Idle,
            session: None,
            attempt_id: new_attempt_id(),
            cancel_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current state, the single source of truth for what call is legal next.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Asset id of the held session, if any.
    pub fn asset_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.asset_id.as_str())
    }

    /// Correlation id of the current attempt, re-minted on each `begin()`.
    pub fn attempt_id(&self) -> &str {
        &self.attempt_id
    }

    /// Clone-out handle for cancelling the in-flight phase from another task.
    /// Raising the flag moves the coordinator to `Errored(phase, "cancelled")`
    /// once the suspended phase call observes it.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel_flag.clone()
    }

    /// Start a fresh attempt: request a one-time write target and asset id.
    ///
    /// Legal only in `Idle`. On success the coordinator holds the session and
    /// is `Ready` for `transfer`; on failure it is `Errored(init, cause)` and
    /// the attempt must be restarted with `reset()` + `begin()`.
    pub async fn begin(&mut self) -> crate::error::Result<()> {
        if self.state != SessionState::Idle {
            return Err(self.invalid_state("begin"));
        }
        self.cancel_flag.store(false, Ordering::Relaxed);
        self.attempt_id = new_attempt_id();
        self.state = SessionState::Initializing;
        log::info!("Upload attempt started: attempt_id={}", self.attempt_id);

        let cancel = self.cancel_flag.clone();
        let initiator = SessionInitiator::new(&self.api);
        let result = match run_cancellable(&cancel, initiator.initialize()).await {
            Some(res) => res,
            None => Err(InitError::Cancelled),
        };

        match result {
            Ok(session) => {
                self.session = Some(session);
                self.state = SessionState::Ready;
                Ok(())
            }
            Err(err) => {
                self.fail(Phase::Init, err.cause().to_string());
                Err(UploadError::Init(err))
            }
        }
    }

    /// Transfer the file bytes to the write target with a single PUT.
    ///
    /// Legal only in `Ready`: a write target is never used for more than one
    /// PUT. `content_type` is the file's declared type; `None` falls back to
    /// the configured default. Any failure makes the whole session unusable
    /// (its consumption state after a partial PUT is unknown), so the session
    /// is dropped and the only recovery is a fresh `begin()`.
    pub async fn transfer(
        &mut self,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> crate::error::Result<()> {
        if self.state != SessionState::Ready {
            return Err(self.invalid_state("transfer"));
        }
        let Some(session) = self.session.as_ref() else {
            // Ready invariant violated; treat as a transfer failure.
            let err = TransferError::Rejected("no session".to_string());
            self.fail(Phase::Transfer, err.cause().to_string());
            return Err(UploadError::Transfer(err));
        };

        let params = PutObjectParams {
            target_url: session.write_target.clone(),
            data,
            content_type: content_type
                .unwrap_or(&self.config.default_content_type)
                .to_string(),
        };
        let body_len = params.data.len();
        self.state = SessionState::Transferring;
        log::info!(
            "Transferring to write target: attempt_id={}, bytes={}, content_type={}",
            self.attempt_id,
            body_len,
            params.content_type
        );

        let cancel = self.cancel_flag.clone();
        let result = match run_cancellable(&cancel, self.api.put_object(params)).await {
            Some(res) => res,
            None => Err(TransferError::Cancelled),
        };

        match result {
            Ok(()) => {
                self.state = SessionState::Transferred;
                Ok(())
            }
            Err(err) => {
                self.session = None;
                self.fail(Phase::Transfer, err.cause().to_string());
                Err(UploadError::Transfer(err))
            }
        }
    }

    /// Submit the metadata record for the stored bytes.
    ///
    /// Legal in `Transferred`, and in `Errored(finalize, _)` while the
    /// session is retained and within the configured validity window (the
    /// bytes are already stored, so finalize alone may be retried). The full
    /// record is validated locally first: a `ValidationError` leaves the
    /// state unchanged and triggers no network call, so the caller can
    /// correct the input and retry without re-transferring.
    pub async fn finalize(&mut self, metadata: &AssetMetadata) -> crate::error::Result<()> {
        let finalize_retry = matches!(
            self.state,
            SessionState::Errored {
                phase: Phase::Finalize,
                ..
            }
        ) && self.session.is_some();
        if self.state != SessionState::Transferred && !finalize_retry {
            return Err(self.invalid_state("finalize"));
        }

        let validated = metadata.validate().map_err(UploadError::Validation)?;

        let Some(session) = self.session.as_ref() else {
            return Err(self.invalid_state("finalize"));
        };
        let asset_id = session.asset_id.clone();
        let created_at = session.created_at;

        if let Some(window_secs) = self.config.finalize_validity_secs {
            let age = Utc::now().signed_duration_since(created_at);
            if age > chrono::Duration::seconds(window_secs as i64) {
                // Stored object may have expired; require a fresh attempt.
                self.session = None;
                let err = FinalizeError::Rejected(format!(
                    "finalize validity window of {}s elapsed",
                    window_secs
                ));
                self.fail(Phase::Finalize, err.cause().to_string());
                return Err(UploadError::Finalize(err));
            }
        }

        let params = FinalizeParams {
            asset_id: asset_id.clone(),
            title: validated.title,
            description: validated.description,
            tags: validated.tags,
            visibility: validated.visibility,
        };
        self.state = SessionState::Finalizing;
        log::info!(
            "Finalizing upload: attempt_id={}, asset_id={}",
            self.attempt_id,
            asset_id
        );

        let cancel = self.cancel_flag.clone();
        let result = match run_cancellable(&cancel, self.api.finalize(params)).await {
            Some(res) => res,
            None => Err(FinalizeError::Cancelled),
        };

        match result {
            Ok(()) => {
                log::info!(
                    "Upload complete: attempt_id={}, asset_id={}",
                    self.attempt_id,
                    asset_id
                );
                self.session = None;
                self.state = SessionState::Done;
                Ok(())
            }
            Err(err) => {
                // Bytes are stored; keep the session so finalize can be retried.
                self.fail(Phase::Finalize, err.cause().to_string());
                Err(UploadError::Finalize(err))
            }
        }
    }

    /// Return to `Idle`, discarding any session, error cause, and pending
    /// cancellation. Idempotent; accepted from every state.
    pub fn reset(&mut self) {
        if let Some(session) = self.session.take() {
            if !self.state.is_terminal() {
                log::warn!(
                    "Reset with an unconsumed session: attempt_id={}, asset_id={}",
                    self.attempt_id,
                    session.asset_id
                );
            }
        }
        self.cancel_flag.store(false, Ordering::Relaxed);
        self.state = SessionState::Idle;
    }

    fn invalid_state(&self, operation: &'static str) -> UploadError {
        UploadError::InvalidState {
            operation,
            state: self.state.to_string(),
        }
    }

    fn fail(&mut self, phase: Phase, cause: String) {
        log::error!(
            "Upload phase failed: attempt_id={}, phase={}, cause={}",
            self.attempt_id,
            phase.as_str(),
            cause
        );
        self.state = SessionState::Errored { phase, cause };
    }
}

fn new_attempt_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InitializeResponse;
    use crate::models::metadata::Visibility;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    /// Scripted origin service for driving the state machine without a
    /// network. Finalize results are consumed front-to-back so retry
    /// sequences can be scripted.
    struct MockApi {
        init_result: Result<InitializeResponse, InitError>,
        put_result: Result<(), TransferError>,
        put_delay_ms: u64,
        finalize_results: Mutex<Vec<Result<(), FinalizeError>>>,
        init_calls: AtomicUsize,
        put_calls: AtomicUsize,
        finalize_calls: AtomicUsize,
        last_put: Mutex<Option<(String, usize, String)>>,
        last_finalize: Mutex<Option<FinalizeParams>>,
    }

    impl MockApi {
        fn ok() -> Self {
            Self {
                init_result: Ok(InitializeResponse {
                    upload_url: "https://store/x".into(),
                    video_id: "v1".into(),
                }),
                put_result: Ok(()),
                put_delay_ms: 0,
                finalize_results: Mutex::new(Vec::new()),
                init_calls: AtomicUsize::new(0),
                put_calls: AtomicUsize::new(0),
                finalize_calls: AtomicUsize::new(0),
                last_put: Mutex::new(None),
                last_finalize: Mutex::new(None),
            }
        }

        fn with_init_error(err: InitError) -> Self {
            Self {
                init_result: Err(err),
                ..Self::ok()
            }
        }

        fn with_put_error(err: TransferError) -> Self {
            Self {
                put_result: Err(err),
                ..Self::ok()
            }
        }

        fn with_finalize_results(results: Vec<Result<(), FinalizeError>>) -> Self {
            Self {
                finalize_results: Mutex::new(results),
                ..Self::ok()
            }
        }
    }

    impl OriginApi for MockApi {
        async fn initialize(&self) -> Result<InitializeResponse, InitError> {
            self.init_calls.fetch_add(1, Ordering::SeqCst);
            self.init_result.clone()
        }

        async fn put_object(&self, params: PutObjectParams) -> Result<(), TransferError> {
            self.put_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_put.lock().unwrap() = Some((
                params.target_url,
                params.data.len(),
                params.content_type,
            ));
            if self.put_delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.put_delay_ms)).await;
            }
            self.put_result.clone()
        }

        async fn finalize(&self, params: FinalizeParams) -> Result<(), FinalizeError> {
            self.finalize_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_finalize.lock().unwrap() = Some(params);
            let mut results = self.finalize_results.lock().unwrap();
            if results.is_empty() {
                Ok(())
            } else {
                results.remove(0)
            }
        }
    }

    fn coordinator(api: MockApi) -> UploadCoordinator<MockApi> {
        UploadCoordinator::new(api, UploadConfig::default())
    }

    fn cats_metadata() -> AssetMetadata {
        AssetMetadata {
            title: "Cats".into(),
            description: String::new(),
            tags: String::new(),
            visibility: "public".into(),
        }
    }

    #[tokio::test]
    async fn test_scenario_full_happy_path() {
        let mut c = coordinator(MockApi::ok());
        assert_eq!(*c.state(), SessionState::Idle);

        c.begin().await.unwrap();
        assert_eq!(*c.state(), SessionState::Ready);
        assert_eq!(c.asset_id(), Some("v1"));

        c.transfer(vec![0u8; 1024], Some("video/mp4")).await.unwrap();
        assert_eq!(*c.state(), SessionState::Transferred);

        c.finalize(&cats_metadata()).await.unwrap();
        assert_eq!(*c.state(), SessionState::Done);
        assert!(c.asset_id().is_none(), "session discarded on Done");

        assert_eq!(c.api.init_calls.load(Ordering::SeqCst), 1);
        assert_eq!(c.api.put_calls.load(Ordering::SeqCst), 1);
        assert_eq!(c.api.finalize_calls.load(Ordering::SeqCst), 1);

        let (target, len, content_type) = c.api.last_put.lock().unwrap().clone().unwrap();
        assert_eq!(target, "https://store/x");
        assert_eq!(len, 1024);
        assert_eq!(content_type, "video/mp4");

        let params = c.api.last_finalize.lock().unwrap().clone().unwrap();
        assert_eq!(params.asset_id, "v1");
        assert_eq!(params.title, "Cats");
        assert_eq!(params.visibility, Visibility::Public);
    }

    #[tokio::test]
    async fn test_scenario_init_rejected() {
        let mut c = coordinator(MockApi::with_init_error(InitError::Rejected(
            "quota exceeded".into(),
        )));
        let err = c.begin().await.unwrap_err();
        assert!(matches!(err, UploadError::Init(InitError::Rejected(_))));
        assert_eq!(
            *c.state(),
            SessionState::Errored {
                phase: Phase::Init,
                cause: "quota exceeded".into(),
            }
        );

        // A transfer call now is a caller ordering error, state unchanged.
        let err = c.transfer(vec![1, 2, 3], None).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidState { .. }));
        assert_eq!(
            *c.state(),
            SessionState::Errored {
                phase: Phase::Init,
                cause: "quota exceeded".into(),
            }
        );
        assert_eq!(c.api.put_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scenario_transfer_rejected_by_target() {
        let mut c = coordinator(MockApi::with_put_error(TransferError::Rejected(
            "HTTP 403 Forbidden".into(),
        )));
        c.begin().await.unwrap();
        let err = c.transfer(vec![0u8; 8], None).await.unwrap_err();
        assert!(matches!(err, UploadError::Transfer(TransferError::Rejected(_))));
        assert_eq!(
            *c.state(),
            SessionState::Errored {
                phase: Phase::Transfer,
                cause: "HTTP 403 Forbidden".into(),
            }
        );
        assert!(c.asset_id().is_none(), "failed transfer drops the session");

        // Second transfer without reset: InvalidState, no further PUT issued.
        let err = c.transfer(vec![0u8; 8], None).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidState { .. }));
        assert_eq!(c.api.put_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scenario_finalize_validation_keeps_transferred() {
        let mut c = coordinator(MockApi::ok());
        c.begin().await.unwrap();
        c.transfer(vec![0u8; 8], None).await.unwrap();

        let bad = AssetMetadata {
            title: String::new(),
            ..cats_metadata()
        };
        let err = c.finalize(&bad).await.unwrap_err();
        assert!(matches!(
            err,
            UploadError::Validation(crate::error::ValidationError::Title)
        ));
        assert_eq!(*c.state(), SessionState::Transferred);
        assert_eq!(
            c.api.finalize_calls.load(Ordering::SeqCst),
            0,
            "validation failure must not reach the network"
        );

        // Corrected retry goes through.
        c.finalize(&cats_metadata()).await.unwrap();
        assert_eq!(*c.state(), SessionState::Done);
    }

    #[tokio::test]
    async fn test_transfer_only_legal_in_ready() {
        let mut c = coordinator(MockApi::ok());
        let err = c.transfer(vec![1], None).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidState { .. }));
        assert_eq!(*c.state(), SessionState::Idle);

        c.begin().await.unwrap();
        c.transfer(vec![1], None).await.unwrap();
        // Transferred: the single-use target must not accept another PUT.
        let err = c.transfer(vec![1], None).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidState { .. }));
        assert_eq!(*c.state(), SessionState::Transferred);
        assert_eq!(c.api.put_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_finalize_only_legal_in_transferred() {
        let mut c = coordinator(MockApi::ok());
        let err = c.finalize(&cats_metadata()).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidState { .. }));

        c.begin().await.unwrap();
        let err = c.finalize(&cats_metadata()).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidState { .. }));
        assert_eq!(*c.state(), SessionState::Ready);
        assert_eq!(c.api.finalize_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_begin_only_legal_in_idle() {
        let mut c = coordinator(MockApi::ok());
        c.begin().await.unwrap();
        let err = c.begin().await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidState { .. }));
        assert_eq!(c.api.init_calls.load(Ordering::SeqCst), 1);

        c.transfer(vec![1], None).await.unwrap();
        c.finalize(&cats_metadata()).await.unwrap();
        // Done does not silently accept a new attempt.
        let err = c.begin().await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle_from_errored_and_done() {
        let mut c = coordinator(MockApi::with_init_error(InitError::Unreachable(
            "connection refused".into(),
        )));
        let _ = c.begin().await;
        assert!(c.state().is_terminal());
        c.reset();
        assert_eq!(*c.state(), SessionState::Idle);
        assert!(c.asset_id().is_none());

        let mut c = coordinator(MockApi::ok());
        c.begin().await.unwrap();
        c.transfer(vec![1], None).await.unwrap();
        c.finalize(&cats_metadata()).await.unwrap();
        c.reset();
        assert_eq!(*c.state(), SessionState::Idle);
        assert!(c.asset_id().is_none());

        // Idempotent.
        c.reset();
        c.reset();
        assert_eq!(*c.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_reset_then_begin_mints_fresh_attempt() {
        let mut c = coordinator(MockApi::with_put_error(TransferError::Unreachable(
            "timed out".into(),
        )));
        c.begin().await.unwrap();
        let first_attempt = c.attempt_id().to_string();
        let _ = c.transfer(vec![1], None).await;
        c.reset();
        c.begin().await.unwrap();
        assert_ne!(c.attempt_id(), first_attempt);
        assert_eq!(c.api.init_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_default_content_type_applied() {
        let mut c = coordinator(MockApi::ok());
        c.begin().await.unwrap();
        c.transfer(vec![0u8; 4], None).await.unwrap();
        let (_, _, content_type) = c.api.last_put.lock().unwrap().clone().unwrap();
        assert_eq!(content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_finalize_forwards_parsed_tags_in_order() {
        let mut c = coordinator(MockApi::ok());
        c.begin().await.unwrap();
        c.transfer(vec![1], None).await.unwrap();
        let meta = AssetMetadata {
            tags: "tutorial, react ,go".into(),
            ..cats_metadata()
        };
        c.finalize(&meta).await.unwrap();
        let params = c.api.last_finalize.lock().unwrap().clone().unwrap();
        assert_eq!(params.tags, vec!["tutorial", "react", "go"]);
    }

    #[tokio::test]
    async fn test_finalize_retry_without_reset_after_transient_failure() {
        let api = MockApi::with_finalize_results(vec![
            Err(FinalizeError::Unreachable("connection reset".into())),
            Ok(()),
        ]);
        let mut c = coordinator(api);
        c.begin().await.unwrap();
        c.transfer(vec![1], None).await.unwrap();

        let err = c.finalize(&cats_metadata()).await.unwrap_err();
        assert!(matches!(err, UploadError::Finalize(FinalizeError::Unreachable(_))));
        assert_eq!(
            *c.state(),
            SessionState::Errored {
                phase: Phase::Finalize,
                cause: "connection reset".into(),
            }
        );
        assert_eq!(c.asset_id(), Some("v1"), "session retained for finalize retry");

        // The bytes are stored; finalize alone can be retried.
        c.finalize(&cats_metadata()).await.unwrap();
        assert_eq!(*c.state(), SessionState::Done);
        assert_eq!(c.api.finalize_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_finalize_errored_state_still_rejects_transfer() {
        let api = MockApi::with_finalize_results(vec![Err(FinalizeError::Rejected(
            "HTTP 500".into(),
        ))]);
        let mut c = coordinator(api);
        c.begin().await.unwrap();
        c.transfer(vec![1], None).await.unwrap();
        let _ = c.finalize(&cats_metadata()).await;

        let err = c.transfer(vec![1], None).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidState { .. }));
        let err = c.begin().await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_finalize_validity_window_elapsed_requires_fresh_attempt() {
        let api = MockApi::ok();
        let config = UploadConfig {
            finalize_validity_secs: Some(0),
            ..UploadConfig::default()
        };
        let mut c = UploadCoordinator::new(api, config);
        c.begin().await.unwrap();
        c.transfer(vec![1], None).await.unwrap();

        // Any elapsed wall time exceeds a zero-second window.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let err = c.finalize(&cats_metadata()).await.unwrap_err();
        assert!(matches!(err, UploadError::Finalize(FinalizeError::Rejected(_))));
        assert!(c.asset_id().is_none(), "expired session is dropped");
        assert_eq!(
            c.api.finalize_calls.load(Ordering::SeqCst),
            0,
            "expired session must not reach the network"
        );

        // Without a session there is nothing left to finalize.
        let err = c.finalize(&cats_metadata()).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_cancel_before_transfer_round_trip() {
        let mut c = coordinator(MockApi::ok());
        c.begin().await.unwrap();
        c.cancel_flag().store(true, Ordering::Relaxed);

        let err = c.transfer(vec![0u8; 8], None).await.unwrap_err();
        assert!(matches!(err, UploadError::Transfer(TransferError::Cancelled)));
        assert_eq!(
            *c.state(),
            SessionState::Errored {
                phase: Phase::Transfer,
                cause: "cancelled".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_cancel_while_put_in_flight() {
        let api = MockApi {
            put_delay_ms: 5_000,
            ..MockApi::ok()
        };
        let mut c = coordinator(api);
        c.begin().await.unwrap();

        let flag = c.cancel_flag();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(30)).await;
            flag.store(true, Ordering::Relaxed);
        });

        let err = c.transfer(vec![0u8; 8], None).await.unwrap_err();
        assert!(matches!(err, UploadError::Transfer(TransferError::Cancelled)));
        assert_eq!(
            *c.state(),
            SessionState::Errored {
                phase: Phase::Transfer,
                cause: "cancelled".into(),
            }
        );
        // The PUT was started but abandoned mid-flight.
        assert_eq!(c.api.put_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_begin_clears_stale_cancel_flag() {
        let mut c = coordinator(MockApi::ok());
        c.cancel_flag().store(true, Ordering::Relaxed);
        c.begin().await.unwrap();
        assert_eq!(*c.state(), SessionState::Ready);
    }
}
