use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::transcript::{self, TranscriptEntry};
use crate::gate::{self, PermittedActions};
use crate::presentation::{self, PointsTier};

/// Opaque session identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Lifecycle phase of a session. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Active,
    Completed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Anything other than "completed", null included, is still an open case.
impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(raw) if raw.eq_ignore_ascii_case("completed") => Ok(Stage::Completed),
            _ => Ok(Stage::Active),
        }
    }
}

/// The client-visible state of one clinical case.
///
/// Always the backend's canonical view: the client replaces it wholesale
/// after every successful read-back and never edits totals or the
/// transcript itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub specialty: String,
    /// Case narrative, markdown.
    #[serde(default)]
    pub scenario: String,
    #[serde(rename = "current_stage", default)]
    pub stage: Stage,
    #[serde(rename = "chat_history", default)]
    pub transcript: Vec<TranscriptEntry>,
    #[serde(default)]
    pub total_points: i64,
    /// Accrued test charges in dollars.
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub diagnosis_attempts: u32,
}

impl Session {
    pub fn is_completed(&self) -> bool {
        self.stage.is_terminal()
    }

    pub fn permitted_actions(&self, in_flight: bool) -> PermittedActions {
        gate::permitted_actions(self.stage, in_flight)
    }

    pub fn points_tier(&self) -> PointsTier {
        presentation::points_tier(self.total_points)
    }

    /// Number of diagnosis submissions present in the transcript.
    pub fn recorded_diagnosis_attempts(&self) -> usize {
        self.transcript
            .iter()
            .filter(|e| matches!(e, TranscriptEntry::DiagnosisSubmission(_)))
            .count()
    }

    /// Whether the server-reported attempt counter agrees with the log.
    pub fn attempts_consistent(&self) -> bool {
        self.recorded_diagnosis_attempts() == self.diagnosis_attempts as usize
    }

    pub fn is_chronological(&self) -> bool {
        transcript::is_chronological(&self.transcript)
    }
}
