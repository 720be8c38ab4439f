use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One event in a session's append-only log.
///
/// The set of kinds is closed; every consumer matches on it exhaustively.
/// On the wire the variant is selected by the `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TranscriptEntry {
    #[serde(rename = "user")]
    UserMessage(UserMessage),
    #[serde(rename = "doctor")]
    DoctorReply(DoctorReply),
    #[serde(rename = "test_result")]
    TestResult(TestResult),
    #[serde(rename = "diagnosis_submission")]
    DiagnosisSubmission(DiagnosisSubmission),
}

/// A question or remark typed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<i64>,
    #[serde(with = "super::timestamp")]
    pub timestamp: Timestamp,
}

/// A reply from the simulated attending physician. `message` is markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorReply {
    pub message: String,
    #[serde(with = "super::timestamp")]
    pub timestamp: Timestamp,
}

/// The outcome of an ordered diagnostic test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_type: String,
    pub body_part: String,
    /// Charge for this test in dollars, as billed by the backend.
    pub cost: f64,
    /// Markdown.
    pub results: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_appropriate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(with = "super::timestamp")]
    pub timestamp: Timestamp,
}

/// A diagnosis the user submitted, with the backend's evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisSubmission {
    pub diagnosis: String,
    /// Markdown.
    pub evaluation: String,
    pub attempt_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<i64>,
    #[serde(with = "super::timestamp")]
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    UserMessage,
    DoctorReply,
    TestResult,
    DiagnosisSubmission,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserMessage => "user",
            Self::DoctorReply => "doctor",
            Self::TestResult => "test_result",
            Self::DiagnosisSubmission => "diagnosis_submission",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TranscriptEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::UserMessage(_) => EntryKind::UserMessage,
            Self::DoctorReply(_) => EntryKind::DoctorReply,
            Self::TestResult(_) => EntryKind::TestResult,
            Self::DiagnosisSubmission(_) => EntryKind::DiagnosisSubmission,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::UserMessage(e) => e.timestamp,
            Self::DoctorReply(e) => e.timestamp,
            Self::TestResult(e) => e.timestamp,
            Self::DiagnosisSubmission(e) => e.timestamp,
        }
    }

    /// Points the backend attached to this event. Doctor replies never carry
    /// points.
    pub fn points_earned(&self) -> Option<i64> {
        match self {
            Self::UserMessage(e) => e.points_earned,
            Self::DoctorReply(_) => None,
            Self::TestResult(e) => e.points_earned,
            Self::DiagnosisSubmission(e) => e.points_earned,
        }
    }
}

/// True when timestamps never decrease along the log.
pub fn is_chronological(entries: &[TranscriptEntry]) -> bool {
    entries
        .windows(2)
        .all(|pair| pair[0].timestamp() <= pair[1].timestamp())
}

/// Stable sort by timestamp. Entries sharing a timestamp keep their
/// relative order.
pub fn sort_chronologically(entries: &mut [TranscriptEntry]) {
    entries.sort_by_key(|e| e.timestamp());
}
