//! Error sink - the shared diagnostic reporting surface for the pipeline.
//!
//! Every stage (scanner, parser, resolver, interpreter) reports through the
//! same [`ErrorSink`] so that a single invocation can answer two independent
//! questions: "did a pre-runtime error occur?" (exit code 65) and "did a
//! runtime error occur?" (exit code 70). See `spec.md` SS6-7 for the exact
//! wire format of each diagnostic family; it is deliberately stable so golden
//! tests can match on it byte-for-byte.

use std::cell::Cell;

/// Collects error flags and writes diagnostics to stderr in the two stable
/// formats the spec mandates.
///
/// `ErrorSink` is deliberately not a generic diagnostic bag (no notes, no
/// help text, no source snippets) - the spec's diagnostic format is fixed,
/// and a richer model would just be machinery nothing reads.
#[derive(Debug, Default)]
pub struct ErrorSink {
    had_error: Cell<bool>,
    had_runtime_error: Cell<bool>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self {
            had_error: Cell::new(false),
            had_runtime_error: Cell::new(false),
        }
    }

    /// Reset both flags. Called between lines in the REPL (spec SS6: "Per-line
    /// error flags reset between lines").
    pub fn reset(&self) {
        self.had_error.set(false);
        self.had_runtime_error.set(false);
    }

    pub fn had_error(&self) -> bool {
        self.had_error.get()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error.get()
    }

    /// Process exit code implied by the current flags (spec S6).
    pub fn exit_code(&self) -> i32 {
        if self.had_runtime_error.get() {
            70
        } else if self.had_error.get() {
            65
        } else {
            0
        }
    }

    /// Scanner-phase error: no token involved, just a line number.
    pub fn scan_error(&self, line: u32, message: impl std::fmt::Display) {
        self.report(line, "", &message.to_string());
    }

    /// Parser/resolver-phase error located at a specific token.
    ///
    /// `is_eof` selects the ` at end` form; otherwise the lexeme is quoted
    /// (` at 'LEXEME'`), matching spec S6's `<WHERE>` grammar exactly.
    pub fn token_error(&self, line: u32, is_eof: bool, lexeme: &str, message: impl std::fmt::Display) {
        let location = if is_eof {
            " at end".to_string()
        } else {
            format!(" at '{lexeme}'")
        };
        self.report(line, &location, &message.to_string());
    }

    fn report(&self, line: u32, location: &str, message: &str) {
        eprintln!("[line {line}] Error{location}: {message}");
        self.had_error.set(true);
    }

    /// Runtime error: two stderr lines, message then location (spec S6).
    pub fn runtime_error(&self, message: impl std::fmt::Display, line: u32) {
        eprintln!("{message}");
        eprintln!("[line {line}]");
        self.had_runtime_error.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_sink_has_no_errors() {
        let sink = ErrorSink::new();
        assert!(!sink.had_error());
        assert!(!sink.had_runtime_error());
        assert_eq!(sink.exit_code(), 0);
    }

    #[test]
    fn scan_error_sets_had_error_and_exit_code() {
        let sink = ErrorSink::new();
        sink.scan_error(3, "Unexpected character.");
        assert!(sink.had_error());
        assert_eq!(sink.exit_code(), 65);
    }

    #[test]
    fn runtime_error_sets_had_runtime_error_and_exit_code() {
        let sink = ErrorSink::new();
        sink.runtime_error("Operands must be numbers.", 1);
        assert!(sink.had_runtime_error());
        assert_eq!(sink.exit_code(), 70);
    }

    #[test]
    fn runtime_error_wins_over_prior_parse_error() {
        let sink = ErrorSink::new();
        sink.scan_error(1, "Unexpected character.");
        sink.runtime_error("boom", 2);
        assert_eq!(sink.exit_code(), 70);
    }

    #[test]
    fn reset_clears_both_flags() {
        let sink = ErrorSink::new();
        sink.scan_error(1, "x");
        sink.runtime_error("y", 1);
        sink.reset();
        assert!(!sink.had_error());
        assert!(!sink.had_runtime_error());
    }
}
