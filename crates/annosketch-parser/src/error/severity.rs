//! Severity levels for reader diagnostics.

use std::fmt;

/// How serious a diagnostic is.
///
/// An input with at least one [`Severity::Error`] is rejected. Warnings are
/// reported through the log and the input is still returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The input cannot be used until this is fixed.
    Error,

    /// Suspicious input that was read anyway, e.g. a dangling `Parent`.
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        f.write_str(name)
    }
}
