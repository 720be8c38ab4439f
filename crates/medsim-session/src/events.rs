use serde::Serialize;
use tracing::info;

use medsim_core::models::session::SessionId;

/// A structured record of something that happened to a session.
///
/// Logged via `tracing` so a session can be followed through the log
/// output without any client-side persistence.
#[derive(Debug, Clone, Serialize)]
pub struct SessionEvent {
    pub action: String,
    pub session_id: SessionId,
    pub details: Option<serde_json::Value>,
}

impl SessionEvent {
    pub fn new(action: impl Into<String>, session_id: &SessionId) -> Self {
        Self {
            action: action.into(),
            session_id: session_id.clone(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this event via tracing.
    pub fn emit(&self) {
        let details = self
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        info!(
            event.action = %self.action,
            event.session_id = %self.session_id,
            event.details = %details,
            "session event"
        );
    }
}
