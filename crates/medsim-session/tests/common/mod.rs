//! Scripted in-memory backend for controller tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jiff::Timestamp;
use tokio::sync::Notify;

use medsim_api::api::{BoxFuture, CaseApi};
use medsim_api::error::ApiError;
use medsim_api::wire::{ChatRequest, DiagnosisRequest, TestOrderRequest};
use medsim_core::models::scoring::ScoringRules;
use medsim_core::models::session::{Session, SessionId, Stage};
use medsim_core::models::transcript::{
    DiagnosisSubmission, DoctorReply, TestResult, TranscriptEntry, UserMessage,
};

pub const CORRECT_DIAGNOSIS: &str = "Medial meniscus tear";
pub const TEST_COST: f64 = 150.0;

/// Every call the controller made, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create { specialty: String },
    Get { id: String },
    Chat { id: String, message: String },
    Test { id: String, test_type: String, body_part: String },
    Diagnosis { id: String, diagnosis: String },
    ScoringRules,
}

/// Which call should fail with an HTTP error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Create,
    Mutation,
    ReadBack,
    ScoringRules,
}

#[derive(Default)]
struct State {
    sessions: HashMap<String, Session>,
    calls: Vec<Call>,
    clock: i64,
    failure: Option<Failure>,
    reverse_read_back: bool,
    foreign_read_back: bool,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
    hold: Mutex<Option<Arc<Notify>>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn fail(&self, failure: Failure) {
        self.state.lock().unwrap().failure = Some(failure);
    }

    pub fn recover(&self) {
        self.state.lock().unwrap().failure = None;
    }

    /// Serve read-backs with the transcript in reverse order.
    pub fn reverse_read_back(&self) {
        self.state.lock().unwrap().reverse_read_back = true;
    }

    /// Serve read-backs under a different session id.
    pub fn foreign_read_back(&self) {
        self.state.lock().unwrap().foreign_read_back = true;
    }

    /// Make mutating calls wait until the returned handle is notified.
    pub fn hold_mutations(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some(notify.clone());
        notify
    }

    /// The backend's own copy of a session, untouched by read-back quirks.
    pub fn stored(&self, id: &SessionId) -> Session {
        self.state.lock().unwrap().sessions[id.as_str()].clone()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn failing(&self, failure: Failure) -> Result<(), ApiError> {
        if self.state.lock().unwrap().failure == Some(failure) {
            Err(ApiError::Status {
                status: 503,
                body: "case writer unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }

    async fn wait_if_held(&self) {
        let hold = self.hold.lock().unwrap().clone();
        if let Some(notify) = hold {
            notify.notified().await;
        }
    }

    /// Apply a mutation to the stored session.
    fn mutate(
        &self,
        id: &SessionId,
        apply: impl FnOnce(&mut Session, Timestamp),
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let now = Timestamp::from_second(1_740_000_000 + state.clock).unwrap();
        let session = state
            .sessions
            .get_mut(id.as_str())
            .ok_or_else(|| ApiError::Status {
                status: 404,
                body: "Session not found".to_string(),
            })?;
        apply(session, now);
        Ok(())
    }
}

impl CaseApi for FakeApi {
    fn create_session<'a>(
        &'a self,
        specialty: &'a str,
    ) -> BoxFuture<'a, Result<Session, ApiError>> {
        Box::pin(async move {
            self.record(Call::Create {
                specialty: specialty.to_string(),
            });
            self.failing(Failure::Create)?;

            let mut state = self.state.lock().unwrap();
            let id = format!("case-{}", state.sessions.len() + 1);
            let session = Session {
                id: SessionId::new(id.clone()),
                specialty: specialty.to_string(),
                scenario: "A 34-year-old runner reports knee pain after a fall.".to_string(),
                stage: Stage::Active,
                transcript: Vec::new(),
                total_points: 0,
                total_cost: 0.0,
                diagnosis_attempts: 0,
            };
            state.sessions.insert(id, session.clone());
            Ok(session)
        })
    }

    fn get_session<'a>(&'a self, id: &'a SessionId) -> BoxFuture<'a, Result<Session, ApiError>> {
        Box::pin(async move {
            self.record(Call::Get {
                id: id.to_string(),
            });
            self.failing(Failure::ReadBack)?;

            let state = self.state.lock().unwrap();
            let mut session = state
                .sessions
                .get(id.as_str())
                .cloned()
                .ok_or_else(|| ApiError::Status {
                    status: 404,
                    body: "Session not found".to_string(),
                })?;
            if state.reverse_read_back {
                session.transcript.reverse();
            }
            if state.foreign_read_back {
                session.id = SessionId::new("someone-else");
            }
            Ok(session)
        })
    }

    fn send_chat<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            self.record(Call::Chat {
                id: request.session_id.to_string(),
                message: request.message.clone(),
            });
            self.wait_if_held().await;
            self.failing(Failure::Mutation)?;

            self.mutate(&request.session_id, |session, now| {
                session
                    .transcript
                    .push(TranscriptEntry::UserMessage(UserMessage {
                        message: request.message.clone(),
                        points_earned: Some(5),
                        timestamp: now,
                    }));
                session
                    .transcript
                    .push(TranscriptEntry::DoctorReply(DoctorReply {
                        message: "The patient rates the pain **7/10**.".to_string(),
                        timestamp: now,
                    }));
                session.total_points += 5;
            })
        })
    }

    fn request_test<'a>(
        &'a self,
        request: &'a TestOrderRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            self.record(Call::Test {
                id: request.session_id.to_string(),
                test_type: request.test_type.clone(),
                body_part: request.body_part.clone(),
            });
            self.wait_if_held().await;
            self.failing(Failure::Mutation)?;

            self.mutate(&request.session_id, |session, now| {
                session.transcript.push(TranscriptEntry::TestResult(TestResult {
                    test_type: request.test_type.clone(),
                    body_part: request.body_part.clone(),
                    cost: TEST_COST,
                    results: "Tear of the posterior horn of the medial meniscus.".to_string(),
                    is_appropriate: Some(true),
                    reasoning: Some("MRI is the study of choice.".to_string()),
                    points_earned: Some(10),
                    image_url: None,
                    timestamp: now,
                }));
                session.total_points += 10;
                session.total_cost += TEST_COST;
            })
        })
    }

    fn submit_diagnosis<'a>(
        &'a self,
        request: &'a DiagnosisRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            self.record(Call::Diagnosis {
                id: request.session_id.to_string(),
                diagnosis: request.diagnosis.clone(),
            });
            self.wait_if_held().await;
            self.failing(Failure::Mutation)?;

            self.mutate(&request.session_id, |session, now| {
                let correct = request.diagnosis.eq_ignore_ascii_case(CORRECT_DIAGNOSIS);
                let points = if correct { 50 } else { -20 };
                session.diagnosis_attempts += 1;
                session
                    .transcript
                    .push(TranscriptEntry::DiagnosisSubmission(DiagnosisSubmission {
                        diagnosis: request.diagnosis.clone(),
                        evaluation: if correct {
                            "Well reasoned.".to_string()
                        } else {
                            "Consider the mechanism of injury.".to_string()
                        },
                        attempt_number: session.diagnosis_attempts,
                        is_correct: Some(correct),
                        points_earned: Some(points),
                        timestamp: now,
                    }));
                session.total_points += points;
                if correct {
                    session.stage = Stage::Completed;
                }
            })
        })
    }

    fn scoring_rules(&self) -> BoxFuture<'_, Result<ScoringRules, ApiError>> {
        Box::pin(async move {
            self.record(Call::ScoringRules);
            self.failing(Failure::ScoringRules)?;
            Ok(ScoringRules {
                correct_test_order: 10,
                correct_diagnosis: 50,
                helpful_question: 5,
                incorrect_test_order: -5,
                incorrect_diagnosis: -20,
                irrelevant_question: -2,
            })
        })
    }
}
