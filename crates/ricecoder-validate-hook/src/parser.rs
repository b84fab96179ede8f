//! Diagnostic parsing
//!
//! Validator output is plain text. A run is considered failing when the text
//! contains one of the markers `Error [` or `Warning [`. Both channels produce
//! these markers: check scripts print them directly and the runner rewrites
//! the HTTP endpoint's `[error]` / `[warning]` tags into them.
//!
//! The parser sits behind the [`DiagnosticParser`] trait so that a structured
//! diagnostics channel can replace marker matching without touching the
//! handler.

/// Marker printed in front of an error diagnostic
pub const ERROR_MARKER: &str = "Error [";

/// Marker printed in front of a warning diagnostic
pub const WARNING_MARKER: &str = "Warning [";

/// Interprets raw validator output
pub trait DiagnosticParser: Send + Sync {
    /// Whether the output reports at least one error or warning
    fn has_errors(&self, output: &str) -> bool;

    /// The part of the output that should be shown to the user
    fn extract_diagnostics(&self, output: &str) -> String;
}

/// Marker-based parser for check-script output
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerDiagnosticParser;

impl MarkerDiagnosticParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    fn is_header(line: &str) -> bool {
        line.contains("===") && line.contains("Diagnostics")
    }
}

impl DiagnosticParser for MarkerDiagnosticParser {
    fn has_errors(&self, output: &str) -> bool {
        output.contains(ERROR_MARKER) || output.contains(WARNING_MARKER)
    }

    /// Everything from the first `=== ... Diagnostics ...` header line to the
    /// end of the output, or the whole output trimmed if there is no header.
    fn extract_diagnostics(&self, output: &str) -> String {
        let lines: Vec<&str> = output.split('\n').collect();

        match lines.iter().position(|line| Self::is_header(line)) {
            Some(start) => lines[start..].join("\n"),
            // HTTP output has no header and holds only diagnostics
            None => output.trim().to_string(),
        }
    }
}
