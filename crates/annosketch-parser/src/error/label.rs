//! Spans of a GFF3 line singled out by a diagnostic.

use crate::span::Span;

/// Whether a label marks the column at fault or one that explains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    /// The column that is wrong, such as an unparsable start coordinate.
    Primary,
    /// A related column, such as the end a start was compared against.
    Secondary,
}

/// Text shown under one span of the offending line.
#[derive(Debug, Clone)]
pub struct Label {
    role: LabelRole,
    span: Span,
    message: String,
}

impl Label {
    pub fn new(role: LabelRole, span: Span, message: impl Into<String>) -> Self {
        Self {
            role,
            span,
            message: message.into(),
        }
    }

    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self::new(LabelRole::Primary, span, message)
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self::new(LabelRole::Secondary, span, message)
    }

    pub fn role(&self) -> LabelRole {
        self.role
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.role == LabelRole::Primary
    }

    pub fn is_secondary(&self) -> bool {
        self.role == LabelRole::Secondary
    }
}
