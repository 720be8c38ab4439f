//! Presentation contract shared by every renderer.
//!
//! These are classifications of server-supplied numbers, never
//! computations of them.

use serde::Serialize;

use crate::models::session::Stage;

/// Styling of a points badge. Same rule for per-entry points and totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsStyle {
    Positive,
    Negative,
    Neutral,
}

pub fn points_style(points: Option<i64>) -> PointsStyle {
    match points {
        Some(p) if p > 0 => PointsStyle::Positive,
        Some(p) if p < 0 => PointsStyle::Negative,
        _ => PointsStyle::Neutral,
    }
}

/// Badge text for a points field, e.g. `+5 pts`. `None` means the entry
/// carries no score and gets no badge; an explicit zero still does.
pub fn points_badge(points: Option<i64>) -> Option<String> {
    points.map(|p| {
        if p > 0 {
            format!("+{p} pts")
        } else {
            format!("{p} pts")
        }
    })
}

/// Tier of the running total, used for iconography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsTier {
    Highest,
    High,
    Positive,
    Negative,
    Neutral,
}

pub fn points_tier(total: i64) -> PointsTier {
    match total {
        t if t > 100 => PointsTier::Highest,
        t if t > 50 => PointsTier::High,
        t if t > 0 => PointsTier::Positive,
        t if t < 0 => PointsTier::Negative,
        _ => PointsTier::Neutral,
    }
}

impl PointsTier {
    /// Terminal glyph for the tier.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Highest => "🏅",
            Self::High => "🏆",
            Self::Positive => "★",
            Self::Negative | Self::Neutral => "◎",
        }
    }

    pub fn style(&self) -> PointsStyle {
        match self {
            Self::Highest | Self::High | Self::Positive => PointsStyle::Positive,
            Self::Negative => PointsStyle::Negative,
            Self::Neutral => PointsStyle::Neutral,
        }
    }
}

/// Verdict on a diagnosis submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Correctness {
    Correct,
    Incorrect,
    Unknown,
}

impl Correctness {
    pub fn from_flag(is_correct: Option<bool>) -> Self {
        match is_correct {
            Some(true) => Self::Correct,
            Some(false) => Self::Incorrect,
            None => Self::Unknown,
        }
    }

    /// `None` for `Unknown`: nothing is shown until the backend decides.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Correct => Some("✓ Correct"),
            Self::Incorrect => Some("✗ Incorrect"),
            Self::Unknown => None,
        }
    }
}

pub fn appropriateness_label(is_appropriate: bool) -> &'static str {
    if is_appropriate {
        "✓ Appropriate Test"
    } else {
        "⚠ Questionable Choice"
    }
}

/// Dollar amount as shown to the user: whole amounts without decimals,
/// anything else with cents.
pub fn format_cost(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("${amount:.0}")
    } else {
        format!("${amount:.2}")
    }
}

pub fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Active => "In Progress",
        Stage::Completed => "Completed",
    }
}
