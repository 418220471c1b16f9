//! Structured error types.
//!
//! The pagination engine itself never fails: it degrades instead. Errors come
//! from the edges, meaning JSON input, markup, files, and the measurement
//! substrate refusing to start.

use thiserror::Error;

/// The unified error type returned by the public API.
#[derive(Debug, Error)]
pub enum PaginatorError {
    /// JSON input failed to parse.
    #[error("Failed to parse input: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// Page markup could not be read as a block tree.
    #[error("Markup error at byte {position}: {message}")]
    Markup { position: usize, message: String },

    /// A file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Measure(#[from] MeasureError),
}

/// Why a measurement surface could not be opened.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// No rendering substrate to measure with.
    #[error("measurement unavailable: {0}")]
    Unavailable(String),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for PaginatorError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected shape. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => "Unexpected end of input. Is the JSON truncated?".to_string(),
            serde_json::error::Category::Io => String::new(),
        };
        PaginatorError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_gets_hint() {
        let err: PaginatorError = serde_json::from_str::<serde_json::Value>("{ \"a\": 1, }")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse input"));
        assert!(msg.contains("trailing commas"));
    }

    #[test]
    fn eof_error_gets_hint() {
        let err: PaginatorError = serde_json::from_str::<serde_json::Value>("{ \"a\": ")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn measure_error_is_transparent() {
        let err = PaginatorError::from(MeasureError::Unavailable("no width".into()));
        assert_eq!(err.to_string(), "measurement unavailable: no width");
    }
}
