//! Display model for transcript entries.
//!
//! Every renderer goes through [`entry_view`], so the mapping from entry
//! kind to what is shown lives in one place. Markdown fields are passed
//! through untouched; turning them into styled output is the renderer's
//! business.

use jiff::Timestamp;
use jiff::tz::TimeZone;
use serde::Serialize;

use medsim_core::catalog;
use medsim_core::models::transcript::TranscriptEntry;
use medsim_core::presentation::{
    self, Correctness, PointsStyle, appropriateness_label, format_cost, points_badge,
};

/// Who an entry is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    User,
    Physician,
    TestResult,
    Diagnosis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
    Info,
    Warning,
}

impl From<PointsStyle> for Tone {
    fn from(style: PointsStyle) -> Self {
        match style {
            PointsStyle::Positive => Tone::Positive,
            PointsStyle::Negative => Tone::Negative,
            PointsStyle::Neutral => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub text: String,
    pub tone: Tone,
}

/// A labelled line under the heading, such as the test appropriateness
/// verdict with its reasoning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub label: String,
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub origin: Origin,
    pub heading: String,
    /// Wall-clock `HH:MM:SS` in the viewer's time zone.
    pub time: String,
    pub badges: Vec<Badge>,
    pub notes: Vec<Note>,
    /// Caption printed above the body, if any.
    pub body_label: Option<String>,
    /// Main text. Markdown except for user messages.
    pub body: String,
    pub image: Option<String>,
}

pub fn entry_view(entry: &TranscriptEntry, tz: &TimeZone) -> EntryView {
    let time = clock_time(entry.timestamp(), tz);

    match entry {
        TranscriptEntry::UserMessage(m) => EntryView {
            origin: Origin::User,
            heading: "You".to_string(),
            time,
            badges: points(m.points_earned).into_iter().collect(),
            notes: Vec::new(),
            body_label: None,
            body: m.message.clone(),
            image: None,
        },
        TranscriptEntry::DoctorReply(r) => EntryView {
            origin: Origin::Physician,
            heading: "Attending Physician".to_string(),
            time,
            badges: Vec::new(),
            notes: Vec::new(),
            body_label: None,
            body: r.message.clone(),
            image: None,
        },
        TranscriptEntry::TestResult(t) => {
            let label = catalog::display_label(&t.test_type);
            let heading = if t.body_part.trim().is_empty() {
                label
            } else {
                format!("{label} - {}", t.body_part)
            };

            let mut badges = vec![Badge {
                text: format_cost(t.cost),
                tone: Tone::Info,
            }];
            badges.extend(points(t.points_earned));

            let notes = t
                .is_appropriate
                .map(|ok| Note {
                    label: appropriateness_label(ok).to_string(),
                    text: t.reasoning.clone().unwrap_or_default(),
                    tone: if ok { Tone::Positive } else { Tone::Warning },
                })
                .into_iter()
                .collect();

            EntryView {
                origin: Origin::TestResult,
                heading,
                time,
                badges,
                notes,
                body_label: None,
                body: t.results.clone(),
                image: t.image_url.clone().filter(|url| !url.is_empty()),
            }
        }
        TranscriptEntry::DiagnosisSubmission(d) => {
            let correctness = Correctness::from_flag(d.is_correct);
            let mut badges: Vec<Badge> = correctness
                .label()
                .map(|text| Badge {
                    text: text.to_string(),
                    tone: match correctness {
                        Correctness::Correct => Tone::Positive,
                        _ => Tone::Negative,
                    },
                })
                .into_iter()
                .collect();
            badges.extend(points(d.points_earned));

            EntryView {
                origin: Origin::Diagnosis,
                heading: format!("Diagnosis Submission (Attempt #{})", d.attempt_number),
                time,
                badges,
                notes: vec![Note {
                    label: "Your Diagnosis:".to_string(),
                    text: d.diagnosis.clone(),
                    tone: Tone::Neutral,
                }],
                body_label: Some("Evaluation:".to_string()),
                body: d.evaluation.clone(),
                image: None,
            }
        }
    }
}

fn points(points_earned: Option<i64>) -> Option<Badge> {
    points_badge(points_earned).map(|text| Badge {
        text,
        tone: presentation::points_style(points_earned).into(),
    })
}

fn clock_time(ts: Timestamp, tz: &TimeZone) -> String {
    ts.to_zoned(tz.clone()).strftime("%H:%M:%S").to_string()
}
