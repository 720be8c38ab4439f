//! Action gate: which user actions a session allows right now.
//!
//! A pure function of the session stage and whether a request is already
//! in flight. It keeps no memory, so callers evaluate it again at every
//! decision point; the stage may have changed after any mutation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::session::Stage;

/// A session-mutating action the user can attempt on an open case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Chat,
    OrderTest,
    SubmitDiagnosis,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Chat, Action::OrderTest, Action::SubmitDiagnosis];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::OrderTest => "order_test",
            Self::SubmitDiagnosis => "submit_diagnosis",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PermittedActions {
    pub chat: bool,
    pub order_test: bool,
    pub submit_diagnosis: bool,
}

impl PermittedActions {
    pub fn all() -> Self {
        Self {
            chat: true,
            order_test: true,
            submit_diagnosis: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Chat => self.chat,
            Action::OrderTest => self.order_test,
            Action::SubmitDiagnosis => self.submit_diagnosis,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.chat || self.order_test || self.submit_diagnosis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateRejection {
    #[error("another request is still in progress")]
    Busy,

    #[error("the case is completed; {0} is no longer available")]
    Completed(Action),
}

pub fn permitted_actions(stage: Stage, in_flight: bool) -> PermittedActions {
    if in_flight {
        return PermittedActions::none();
    }
    match stage {
        Stage::Active => PermittedActions::all(),
        Stage::Completed => PermittedActions::none(),
    }
}

/// Check a single action. In-flight takes precedence over stage.
pub fn check(stage: Stage, in_flight: bool, action: Action) -> Result<(), GateRejection> {
    if permitted_actions(stage, in_flight).allows(action) {
        return Ok(());
    }
    if in_flight {
        Err(GateRejection::Busy)
    } else {
        Err(GateRejection::Completed(action))
    }
}
