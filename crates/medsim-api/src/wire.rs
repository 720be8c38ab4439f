//! Request bodies for the backend's JSON endpoints.

use serde::Serialize;

use medsim_core::models::session::SessionId;

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub specialty: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub session_id: SessionId,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestOrderRequest {
    pub session_id: SessionId,
    pub test_type: String,
    /// May be empty.
    pub body_part: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisRequest {
    pub session_id: SessionId,
    pub diagnosis: String,
}
