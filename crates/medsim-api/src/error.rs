use thiserror::Error;

use medsim_core::models::session::SessionId;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),

    #[error("backend returned session {actual} when {expected} was requested")]
    UnexpectedSession {
        expected: SessionId,
        actual: SessionId,
    },
}

impl ApiError {
    /// Whether the request never got an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Walk the full error chain and join all causes into one string.
///
/// reqwest's own `Display` is terse ("error sending request"); the
/// useful part (connection refused, timeout, DNS) sits in the source chain.
pub fn format_err_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
