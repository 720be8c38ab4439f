use thiserror::Error;

use medsim_api::error::ApiError;
use medsim_core::gate::GateRejection;

/// Input or state problems caught before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please enter a medical specialty first")]
    EmptySpecialty,

    #[error("message is empty")]
    EmptyMessage,

    #[error("please choose a test type first")]
    EmptyTestType,

    #[error("diagnosis is empty")]
    EmptyDiagnosis,

    #[error(transparent)]
    Gate(#[from] GateRejection),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("request failed: {0}")]
    RequestFailed(#[from] ApiError),
}

impl SessionError {
    /// True when the operation was refused locally, without a network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<GateRejection> for SessionError {
    fn from(rejection: GateRejection) -> Self {
        SessionError::Validation(ValidationError::Gate(rejection))
    }
}
