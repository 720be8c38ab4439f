//! Diagnostic tests offered in the ordering menu.
//!
//! The backend accepts any test type string; this list is the menu the
//! client suggests, plus the labels used when rendering results.

/// A menu entry: the wire id sent to the backend and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestKind {
    pub id: &'static str,
    pub label: &'static str,
}

const TEST_KINDS: &[TestKind] = &[
    TestKind {
        id: "x-ray",
        label: "X-Ray",
    },
    TestKind {
        id: "mri",
        label: "MRI",
    },
    TestKind {
        id: "ct_scan",
        label: "CT Scan",
    },
    TestKind {
        id: "blood_test",
        label: "Blood Test",
    },
    TestKind {
        id: "ultrasound",
        label: "Ultrasound",
    },
    TestKind {
        id: "ecg",
        label: "ECG",
    },
    TestKind {
        id: "echo",
        label: "Echocardiogram",
    },
];

/// Return all menu entries in display order.
pub fn all_test_kinds() -> &'static [TestKind] {
    TEST_KINDS
}

/// Look up a menu entry by wire id.
pub fn get_test_kind(id: &str) -> Option<&'static TestKind> {
    TEST_KINDS.iter().find(|k| k.id == id)
}

/// Match user input against ids and labels, ignoring case and treating
/// spaces, dashes and underscores alike (`ct scan`, `CT-Scan`, `ct_scan`).
pub fn resolve_test_kind(input: &str) -> Option<&'static TestKind> {
    let wanted = normalize(input);
    if wanted.is_empty() {
        return None;
    }
    TEST_KINDS
        .iter()
        .find(|k| normalize(k.id) == wanted || normalize(k.label) == wanted)
}

/// Heading text for a test type, including types outside the menu.
pub fn display_label(test_type: &str) -> String {
    if let Some(kind) = get_test_kind(test_type) {
        return kind.label.to_string();
    }
    test_type
        .split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
