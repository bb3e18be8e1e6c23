//! Error codes for the GFF3 diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Line and column errors
//! - `E2xx` - Feature relation errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Line Errors (E1xx)
    // =========================================================================
    /// Wrong number of columns.
    ///
    /// A feature line must have exactly nine tab-separated columns.
    E100,

    /// Invalid coordinate.
    ///
    /// Start and end must be positive integers.
    E101,

    /// Start greater than end.
    E102,

    /// Invalid strand.
    ///
    /// The strand column must be one of `+`, `-`, `.` or `?`.
    E103,

    /// Invalid score.
    ///
    /// The score column must be `.` or a floating point number.
    E104,

    /// Invalid phase.
    ///
    /// The phase column must be `.`, `0`, `1` or `2`.
    E105,

    /// Malformed attributes.
    ///
    /// Attributes must be `key=value` pairs separated by `;`.
    E106,

    // =========================================================================
    // Relation Errors (E2xx)
    // =========================================================================
    /// Duplicate ID.
    ///
    /// Two features on the same sequence use the same `ID` attribute without
    /// describing one discontinuous feature.
    E200,

    /// Undefined parent.
    ///
    /// A `Parent` attribute names an ID that was not defined before.
    E201,

    /// Parent on another sequence.
    E202,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E101").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "wrong number of columns",
            ErrorCode::E101 => "invalid coordinate",
            ErrorCode::E102 => "start greater than end",
            ErrorCode::E103 => "invalid strand",
            ErrorCode::E104 => "invalid score",
            ErrorCode::E105 => "invalid phase",
            ErrorCode::E106 => "malformed attributes",
            ErrorCode::E200 => "duplicate ID",
            ErrorCode::E201 => "undefined parent",
            ErrorCode::E202 => "parent on another sequence",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
