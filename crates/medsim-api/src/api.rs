use std::future::Future;
use std::pin::Pin;

use medsim_core::models::scoring::ScoringRules;
use medsim_core::models::session::{Session, SessionId};

use crate::error::ApiError;
use crate::wire::{ChatRequest, DiagnosisRequest, TestOrderRequest};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The backend collaborator that owns all case logic.
///
/// The three mutating calls return only success or failure; whatever the
/// backend sends back is an acknowledgment, not state. Callers re-read the
/// session with [`CaseApi::get_session`] afterwards.
///
/// Methods return boxed futures for dyn compatibility.
pub trait CaseApi: Send + Sync {
    /// Generate a new case for a specialty. The returned session is fresh.
    fn create_session<'a>(&'a self, specialty: &'a str)
    -> BoxFuture<'a, Result<Session, ApiError>>;

    /// Fetch the canonical state of a session.
    fn get_session<'a>(&'a self, id: &'a SessionId) -> BoxFuture<'a, Result<Session, ApiError>>;

    fn send_chat<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<(), ApiError>>;

    fn request_test<'a>(
        &'a self,
        request: &'a TestOrderRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>>;

    fn submit_diagnosis<'a>(
        &'a self,
        request: &'a DiagnosisRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>>;

    /// Point deltas per action category, for display.
    fn scoring_rules(&self) -> BoxFuture<'_, Result<ScoringRules, ApiError>>;
}
