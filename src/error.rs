//! Error types for the normalization engine
//!
//! The engine degrades per-field failures to empty values; the only hard
//! failure is a document that is not usable markup at all.

use thiserror::Error;

/// Errors surfaced by the normalization engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// The input could not be treated as a markup document
    ///
    /// Absent fields and undecodable mirrors never raise this; it is reserved
    /// for input where no field extraction would be meaningful.
    #[error("document is not usable markup: {0}")]
    MalformedDocument(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = EngineError::MalformedDocument("empty input".to_string());
        assert_eq!(
            format!("{}", error),
            "document is not usable markup: empty input"
        );
    }
}
