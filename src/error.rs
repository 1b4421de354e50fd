// src/error.rs
use thiserror::Error;

/// Failure taxonomy for the matching core.
///
/// Transport failures are recovered inside the fetch loop and normally
/// never reach callers; decode failures are surfaced so the caller can
/// reject the upload.
#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("cannot process document: {reason}")]
    Decode { reason: String },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

impl MatcherError {
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    pub fn transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
