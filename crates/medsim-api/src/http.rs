//! JSON-over-HTTP implementation of [`CaseApi`].

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use medsim_core::models::scoring::ScoringRules;
use medsim_core::models::session::{Session, SessionId};

use crate::api::{BoxFuture, CaseApi};
use crate::error::{ApiError, format_err_chain};
use crate::wire::{ChatRequest, CreateSessionRequest, DiagnosisRequest, TestOrderRequest};

/// Longest error body kept in [`ApiError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Origin of the backend, e.g. `http://localhost:8001`.
    pub base_url: String,
    /// Path prefix all endpoints hang off, e.g. `/api`.
    pub api_prefix: String,
    /// Per-request timeout. Case generation is slow, so this is generous.
    pub timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            api_prefix: "/api".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpCaseApi {
    client: Client,
    base: Url,
}

impl HttpCaseApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let mut base = Url::parse(settings.base_url.trim())
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", settings.base_url)))?;

        base.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(settings.base_url.clone()))?
            .pop_if_empty()
            .extend(settings.api_prefix.split('/').filter(|s| !s.is_empty()));

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ApiError::Client(format_err_chain(&e)))?;

        debug!(base = %base, "case API client ready");

        Ok(Self { client, base })
    }

    /// Root all endpoints are resolved against, prefix included.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format_err_chain(&e)))?;
        decode(response).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format_err_chain(&e)))?;
        decode(response).await
    }

    /// POST where only the status matters; the body is dropped unread.
    async fn post_ack<B>(&self, url: Url, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + Sync,
    {
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format_err_chain(&e)))?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }

    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(format_err_chain(&e)))?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

impl CaseApi for HttpCaseApi {
    fn create_session<'a>(
        &'a self,
        specialty: &'a str,
    ) -> BoxFuture<'a, Result<Session, ApiError>> {
        Box::pin(async move {
            let url = self.endpoint(&["session"])?;
            let body = CreateSessionRequest {
                specialty: specialty.to_string(),
            };
            let session: Session = self.post_json(url, &body).await?;
            info!(session_id = %session.id, specialty, "case generated");
            Ok(session)
        })
    }

    fn get_session<'a>(&'a self, id: &'a SessionId) -> BoxFuture<'a, Result<Session, ApiError>> {
        Box::pin(async move {
            let url = self.endpoint(&["session", id.as_str()])?;
            self.get_json(url).await
        })
    }

    fn send_chat<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let url = self.endpoint(&["chat"])?;
            self.post_ack(url, request).await
        })
    }

    fn request_test<'a>(
        &'a self,
        request: &'a TestOrderRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let url = self.endpoint(&["request-test"])?;
            self.post_ack(url, request).await
        })
    }

    fn submit_diagnosis<'a>(
        &'a self,
        request: &'a DiagnosisRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let url = self.endpoint(&["submit-diagnosis"])?;
            self.post_ack(url, request).await
        })
    }

    fn scoring_rules(&self) -> BoxFuture<'_, Result<ScoringRules, ApiError>> {
        Box::pin(async move {
            let url = self.endpoint(&["scoring-rules"])?;
            self.get_json(url).await
        })
    }
}
