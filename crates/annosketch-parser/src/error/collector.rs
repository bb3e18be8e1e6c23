//! Collector for accumulating diagnostics while reading a file.

use log::warn;

use crate::error::{Diagnostic, ParseError};

/// Accumulates diagnostics so a reader can keep going after a bad line.
///
/// Warnings are logged when the collector finishes; only errors make
/// [`DiagnosticCollector::finish`] fail.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity().is_error())
    }

    /// Consumes the collector.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] holding the error diagnostics if any were
    /// emitted.
    pub fn finish(self) -> Result<(), ParseError> {
        let (errors, warnings): (Vec<_>, Vec<_>) = self
            .diagnostics
            .into_iter()
            .partition(|d| d.severity().is_error());

        for warning in &warnings {
            warn!(diagnostic:% = warning; "Input warning");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ParseError::new(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_empty_is_ok() {
        assert!(DiagnosticCollector::new().finish().is_ok());
    }

    #[test]
    fn test_collector_warnings_only_is_ok() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("odd but fine"));
        assert!(!collector.has_errors());
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_keeps_only_errors() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("odd but fine"));
        collector.emit(Diagnostic::error("broken"));
        collector.emit(Diagnostic::error("also broken"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.diagnostics()[0].message(), "broken");
    }
}
