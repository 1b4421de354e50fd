// src/document.rs
//! Document-to-text decoding contract. PDF conversion lives in an
//! external service; the core only depends on this trait.

use crate::error::MatcherError;

pub trait DocumentDecoder: Send + Sync {
    /// Decode raw document bytes into extractable text. Fails when the
    /// format is unreadable or the document contains no text at all.
    fn decode(&self, bytes: &[u8]) -> Result<String, MatcherError>;
}

/// Decoder for plain-text and markdown resumes.
pub struct PlainTextDecoder;

impl DocumentDecoder for PlainTextDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, MatcherError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| MatcherError::decode(format!("invalid UTF-8: {}", e)))?;

        if text.trim().is_empty() {
            return Err(MatcherError::decode("document contains no extractable text"));
        }

        Ok(text.to_string())
    }
}
