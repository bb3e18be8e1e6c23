//! # annosketch parser
//!
//! Readers for the annotation and sequence formats annosketch consumes:
//!
//! - [`gff3`] - GFF3 feature tables, reported through [`error::Diagnostic`]s
//!   that point at the offending bytes.
//! - [`fasta`] - streaming FASTA records, plain or gzip compressed.
//!
//! ## Usage
//!
//! ```
//! # use annosketch_parser::{parse_gff3, error::ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let index = parse_gff3("ctg1\t.\tgene\t10\t90\t.\t-\t.\tID=g1\n")?;
//!     assert_eq!(index.first_seqid(), Some("ctg1"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod fasta;
pub mod gff3;
mod span;

pub use gff3::parse as parse_gff3;
pub use span::Span;
