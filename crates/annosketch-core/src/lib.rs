//! Annosketch Core Types and Definitions
//!
//! This crate provides the foundational types shared by the annosketch
//! readers, layout engine and command-line tool. It includes:
//!
//! - **Ranges**: 1-based inclusive genomic intervals ([`range::Range`])
//! - **Geometry**: Width-independent drawing coordinates ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Features**: Annotated genome features and their index ([`feature`] module)
//! - **Sequences**: Sequence records and FASTA output ([`sequence::SeqRecord`])
//! - **Style**: Visual style loaded from TOML ([`style::Style`])

pub mod color;
pub mod feature;
pub mod geometry;
pub mod range;
pub mod sequence;
pub mod style;
