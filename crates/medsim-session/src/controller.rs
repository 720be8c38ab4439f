use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;
use tracing::{debug, warn};

use medsim_api::api::CaseApi;
use medsim_api::error::ApiError;
use medsim_api::wire::{ChatRequest, DiagnosisRequest, TestOrderRequest};
use medsim_core::gate::{self, Action, GateRejection, PermittedActions};
use medsim_core::models::scoring::ScoringRules;
use medsim_core::models::session::{Session, Stage};
use medsim_core::models::transcript::sort_chronologically;

use crate::error::{SessionError, ValidationError};
use crate::events::SessionEvent;

/// What the UI needs to know besides the session itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerStatus {
    /// A backend operation is running; the gate refuses everything else.
    pub in_flight: bool,
    /// Message about the last failed operation, cleared by the next success.
    pub notice: Option<String>,
}

/// Orchestrates the session-mutating operations against the backend.
///
/// Every mutation is followed by a read of the canonical session, and that
/// read is what the caller gets back. On any failure the caller's session
/// stays as it was, the in-flight flag is released and a notice is
/// recorded. Nothing is retried.
pub struct SessionController {
    api: Arc<dyn CaseApi>,
    status: Mutex<ControllerStatus>,
}

/// Releases the in-flight flag when an operation ends, however it ends.
struct InFlight<'a> {
    status: &'a Mutex<ControllerStatus>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.status).in_flight = false;
    }
}

fn lock(status: &Mutex<ControllerStatus>) -> MutexGuard<'_, ControllerStatus> {
    status.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn require_text(text: &str, missing: ValidationError) -> Result<&str, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(missing)
    } else {
        Ok(trimmed)
    }
}

impl SessionController {
    pub fn new(api: Arc<dyn CaseApi>) -> Self {
        Self {
            api,
            status: Mutex::new(ControllerStatus::default()),
        }
    }

    pub fn status(&self) -> ControllerStatus {
        lock(&self.status).clone()
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.status).in_flight
    }

    pub fn notice(&self) -> Option<String> {
        lock(&self.status).notice.clone()
    }

    pub fn clear_notice(&self) {
        lock(&self.status).notice = None;
    }

    /// Gate evaluation for `session` as of right now.
    pub fn permitted_actions(&self, session: &Session) -> PermittedActions {
        session.permitted_actions(self.is_busy())
    }

    /// Ask the backend to generate a new case.
    pub async fn create_session(&self, specialty: &str) -> Result<Session, SessionError> {
        let result = self.create_inner(specialty).await;
        self.settle("create_session", result)
    }

    /// Send a chat turn, then return the re-read session.
    pub async fn send_chat_message(
        &self,
        session: &Session,
        text: &str,
    ) -> Result<Session, SessionError> {
        let result = self.chat_inner(session, text).await;
        self.settle("send_chat_message", result)
    }

    /// Order a diagnostic test, then return the re-read session.
    /// `body_part` may be empty.
    pub async fn request_test(
        &self,
        session: &Session,
        test_type: &str,
        body_part: &str,
    ) -> Result<Session, SessionError> {
        let result = self.test_inner(session, test_type, body_part).await;
        self.settle("request_test", result)
    }

    /// Submit a diagnosis, then return the re-read session, which may now
    /// be completed.
    pub async fn submit_diagnosis(
        &self,
        session: &Session,
        text: &str,
    ) -> Result<Session, SessionError> {
        let result = self.diagnosis_inner(session, text).await;
        self.settle("submit_diagnosis", result)
    }

    /// Fetch the scoring table for display. A plain read: not gated and
    /// does not touch the notice.
    pub async fn load_scoring_rules(&self) -> Result<ScoringRules, SessionError> {
        self.api.scoring_rules().await.map_err(|e| {
            warn!(error = %e, "failed to load scoring rules");
            SessionError::from(e)
        })
    }

    /// Drop a session client-side. The backend is not told.
    pub fn abandon(&self, session: Session) {
        SessionEvent::new("session_abandoned", &session.id)
            .with_details(json!({
                "stage": session.stage.as_str(),
                "transcript_len": session.transcript.len(),
            }))
            .emit();
    }

    async fn create_inner(&self, specialty: &str) -> Result<Session, SessionError> {
        let specialty = require_text(specialty, ValidationError::EmptySpecialty)?;
        let _in_flight = self.begin(None)?;

        let session = reconcile(self.api.create_session(specialty).await?);

        SessionEvent::new("session_created", &session.id)
            .with_details(json!({
                "specialty": session.specialty,
                "stage": session.stage.as_str(),
                "transcript_len": session.transcript.len(),
            }))
            .emit();
        Ok(session)
    }

    async fn chat_inner(&self, session: &Session, text: &str) -> Result<Session, SessionError> {
        require_text(text, ValidationError::EmptyMessage)?;
        let _in_flight = self.begin(Some((session.stage, Action::Chat)))?;

        let request = ChatRequest {
            session_id: session.id.clone(),
            message: text.to_string(),
        };
        self.api.send_chat(&request).await?;
        self.read_back(session, Action::Chat).await
    }

    async fn test_inner(
        &self,
        session: &Session,
        test_type: &str,
        body_part: &str,
    ) -> Result<Session, SessionError> {
        let test_type = require_text(test_type, ValidationError::EmptyTestType)?;
        let _in_flight = self.begin(Some((session.stage, Action::OrderTest)))?;

        let request = TestOrderRequest {
            session_id: session.id.clone(),
            test_type: test_type.to_string(),
            body_part: body_part.trim().to_string(),
        };
        self.api.request_test(&request).await?;
        self.read_back(session, Action::OrderTest).await
    }

    async fn diagnosis_inner(
        &self,
        session: &Session,
        text: &str,
    ) -> Result<Session, SessionError> {
        let diagnosis = require_text(text, ValidationError::EmptyDiagnosis)?;
        let _in_flight = self.begin(Some((session.stage, Action::SubmitDiagnosis)))?;

        let request = DiagnosisRequest {
            session_id: session.id.clone(),
            diagnosis: diagnosis.to_string(),
        };
        self.api.submit_diagnosis(&request).await?;
        self.read_back(session, Action::SubmitDiagnosis).await
    }

    /// Gate check and in-flight claim in one step, under the status lock.
    /// `None` is session creation, which only needs the client to be idle.
    fn begin(&self, gated: Option<(Stage, Action)>) -> Result<InFlight<'_>, GateRejection> {
        let mut status = lock(&self.status);
        match gated {
            Some((stage, action)) => gate::check(stage, status.in_flight, action)?,
            None if status.in_flight => return Err(GateRejection::Busy),
            None => {}
        }
        status.in_flight = true;
        Ok(InFlight {
            status: &self.status,
        })
    }

    async fn read_back(&self, before: &Session, action: Action) -> Result<Session, SessionError> {
        let fetched = self.api.get_session(&before.id).await?;
        if fetched.id != before.id {
            return Err(ApiError::UnexpectedSession {
                expected: before.id.clone(),
                actual: fetched.id,
            }
            .into());
        }

        let session = reconcile(fetched);
        if session.transcript.len() < before.transcript.len() {
            warn!(
                session_id = %session.id,
                before = before.transcript.len(),
                after = session.transcript.len(),
                "transcript shrank between reads"
            );
        }

        SessionEvent::new(action.as_str(), &session.id)
            .with_details(json!({
                "appended": session.transcript.len().saturating_sub(before.transcript.len()),
                "transcript_len": session.transcript.len(),
                "total_points": session.total_points,
                "total_cost": session.total_cost,
                "diagnosis_attempts": session.diagnosis_attempts,
                "stage": session.stage.as_str(),
            }))
            .emit();

        if !before.is_completed() && session.is_completed() {
            SessionEvent::new("case_completed", &session.id)
                .with_details(json!({
                    "total_points": session.total_points,
                    "total_cost": session.total_cost,
                    "diagnosis_attempts": session.diagnosis_attempts,
                }))
                .emit();
        }

        Ok(session)
    }

    fn settle<T>(
        &self,
        operation: &'static str,
        result: Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut status = lock(&self.status);
        match &result {
            Ok(_) => status.notice = None,
            Err(e) => {
                if e.is_validation() {
                    debug!(operation, error = %e, "operation refused");
                } else {
                    warn!(operation, error = %e, "operation failed");
                }
                status.notice = Some(e.to_string());
            }
        }
        result
    }
}

/// Bring a canonical session into the shape the client relies on. Totals
/// and counters are never touched, only checked.
fn reconcile(mut session: Session) -> Session {
    if !session.is_chronological() {
        warn!(session_id = %session.id, "transcript out of order; sorting by timestamp");
        sort_chronologically(&mut session.transcript);
    }
    if !session.attempts_consistent() {
        warn!(
            session_id = %session.id,
            reported = session.diagnosis_attempts,
            recorded = session.recorded_diagnosis_attempts(),
            "diagnosis attempt counter disagrees with transcript"
        );
    }
    session
}
