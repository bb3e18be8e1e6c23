//! Error and diagnostic system for the annosketch readers.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. Multiple diagnostics are wrapped in [`ParseError`]
//! for returning from a parse.
//!
//! # Example
//!
//! ```
//! # use annosketch_parser::error::{Diagnostic, ErrorCode};
//! # use annosketch_parser::Span;
//!
//! let diag = Diagnostic::error("feature start 900 is greater than end 100")
//!     .with_code(ErrorCode::E102)
//!     .with_label(Span::new(18..21), "start")
//!     .with_secondary_label(Span::new(22..25), "end")
//!     .with_help("GFF3 coordinates are 1-based with start <= end");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::{Label, LabelRole};
pub use parse_error::ParseError;
pub use severity::Severity;
