//! Typed, retryable failure carried through the pipeline (spec §4.A).

use std::fmt;

/// Tuple of (source, code) identifies the exact failure site.
#[derive(Debug, Clone)]
pub struct ScanError {
    pub code: i32,
    pub message: String,
    pub source: String,
    pub retryable: bool,
}

impl ScanError {
    pub fn new(code: i32, message: impl Into<String>, source: impl Into<String>, retryable: bool) -> Self {
        Self {
            code,
            message: message.into(),
            source: source.into(),
            retryable,
        }
    }

    pub fn non_retryable(code: i32, message: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(code, message, source, false)
    }

    pub fn retryable(code: i32, message: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(code, message, source, true)
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] Error {}: {}", self.source, self.code, self.message)
    }
}

impl std::error::Error for ScanError {}

/// Unknown foreign errors wrapped into this type MUST default to
/// `retryable=false` unless recognized (spec §4.A, §7).
impl From<anyhow::Error> for ScanError {
    fn from(e: anyhow::Error) -> Self {
        ScanError::non_retryable(900, e.to_string(), "unknown")
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(e: serde_json::Error) -> Self {
        ScanError::non_retryable(901, e.to_string(), "json")
    }
}

impl From<std::io::Error> for ScanError {
    fn from(e: std::io::Error) -> Self {
        ScanError::non_retryable(902, e.to_string(), "io")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_bracketed_form() {
        let e = ScanError::non_retryable(100, "bad target", "parser");
        assert_eq!(e.to_string(), "[parser] Error 100: bad target");
    }

    #[test]
    fn foreign_errors_default_non_retryable() {
        let e: ScanError = anyhow::anyhow!("boom").into();
        assert!(!e.retryable);
        assert_eq!(e.source, "unknown");
    }
}
