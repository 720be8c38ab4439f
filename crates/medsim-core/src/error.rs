use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid timestamp {raw:?}: {reason}")]
    InvalidTimestamp { raw: String, reason: String },
}
