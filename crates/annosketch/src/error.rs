//! Error types for annosketch operations.
//!
//! Each stage has its own error enum ([`LayoutError`], [`CanvasError`],
//! [`FilterError`]); [`SketchError`] wraps all of them at the crate boundary.

use std::{io, path::PathBuf};

use thiserror::Error;

use annosketch_core::style::StyleError;
use annosketch_parser::{error::ParseError, fasta::FastaError};

/// Errors raised while building a diagram or laying it out.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Layout width must be greater than zero")]
    ZeroWidth,

    #[error("Sequence `{seqid}` has no features")]
    UnknownSeqid { seqid: String },

    #[error("Nothing to sketch: no sequence region could be determined")]
    NoRegion,

    #[error("Invalid view {start}..{end}: start is after end")]
    InvalidView { start: u64, end: u64 },

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// Errors raised by a canvas while it is being sketched on.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error(transparent)]
    Style(#[from] StyleError),

    #[error("Canvas visited `{0}` outside of a layout")]
    OutOfOrder(&'static str),
}

/// Errors raised by the sequence filter.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Step must be at least 1")]
    ZeroStep,

    #[error("Sample probability {0} is outside of [0, 1]")]
    InvalidSample(f64),

    #[error("Minimum length {min} is greater than maximum length {max}")]
    InvertedLengths { min: usize, max: usize },

    #[error(transparent)]
    Fasta(#[from] FastaError),

    #[error("Failed to write output: {0}")]
    Write(#[from] io::Error),
}

/// The main error type for annosketch operations.
///
/// # Diagnostic Variants
///
/// `Parse` keeps the source text next to the diagnostics so callers can
/// render the labelled spans.
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{err}")]
    Parse {
        err: ParseError,
        src: String,
        path: PathBuf,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Canvas(#[from] CanvasError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl SketchError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
            path: path.into(),
        }
    }
}
