use serde::{Deserialize, Serialize};

/// Point deltas the backend applies per action category.
///
/// Informational only. Totals always come from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub correct_test_order: i64,
    pub correct_diagnosis: i64,
    pub helpful_question: i64,
    pub incorrect_test_order: i64,
    pub incorrect_diagnosis: i64,
    pub irrelevant_question: i64,
}

/// One line of the scoring panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoringRule {
    pub label: &'static str,
    pub points: i64,
}

impl ScoringRules {
    pub fn rewards(&self) -> [ScoringRule; 3] {
        [
            ScoringRule {
                label: "Correct test orders",
                points: self.correct_test_order,
            },
            ScoringRule {
                label: "Correct diagnosis",
                points: self.correct_diagnosis,
            },
            ScoringRule {
                label: "Helpful questions",
                points: self.helpful_question,
            },
        ]
    }

    pub fn penalties(&self) -> [ScoringRule; 3] {
        [
            ScoringRule {
                label: "Inappropriate test orders",
                points: self.incorrect_test_order,
            },
            ScoringRule {
                label: "Incorrect diagnosis",
                points: self.incorrect_diagnosis,
            },
            ScoringRule {
                label: "Irrelevant questions",
                points: self.irrelevant_question,
            },
        ]
    }
}
