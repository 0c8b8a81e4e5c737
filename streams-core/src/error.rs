//! Error types for streams-core

use thiserror::Error;

/// Result type for sample stream operations.
pub type Result<T> = std::result::Result<T, StreamsError>;

/// Errors raised while reading or driving a sample stream.
#[derive(Error, Debug)]
pub enum StreamsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid feature value {value:?}")]
    InvalidFeature { line: usize, value: String },

    #[error("line {line}: invalid label {value:?}")]
    InvalidLabel { line: usize, value: String },

    #[error("line {line}: label source ended before data source")]
    MissingLabel { line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_line() {
        let err = StreamsError::InvalidFeature {
            line: 3,
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "line 3: invalid feature value \"abc\"");
    }

    #[test]
    fn error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StreamsError = io.into();
        assert!(matches!(err, StreamsError::Io(_)));
    }
}
