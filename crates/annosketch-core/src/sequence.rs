//! Sequence records.
//!
//! Records keep their header and residues as raw bytes, so a file in any
//! encoding is written back exactly as it was read.

use std::{
    borrow::Cow,
    io::{self, Write},
};

/// A named biological sequence as read from a FASTA file.
///
/// # Examples
///
/// ```
/// use annosketch_core::sequence::SeqRecord;
///
/// let record = SeqRecord::new("seq1 test", "ACGTACGT");
/// let mut out = Vec::new();
/// record.write_fasta(&mut out, 4).unwrap();
/// assert_eq!(out, b">seq1 test\nACGT\nACGT\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    description: Vec<u8>,
    sequence: Vec<u8>,
}

impl SeqRecord {
    pub fn new(description: impl Into<Vec<u8>>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            description: description.into(),
            sequence: sequence.into(),
        }
    }

    /// The header line without the leading `>`.
    pub fn description(&self) -> &[u8] {
        &self.description
    }

    /// The header for display, with invalid UTF-8 replaced.
    pub fn description_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.description)
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    /// Number of residues.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Writes the record in FASTA format, wrapping the sequence every
    /// `width` bytes. A `width` of `0` writes the sequence on one line.
    pub fn write_fasta<W: Write + ?Sized>(&self, writer: &mut W, width: usize) -> io::Result<()> {
        writer.write_all(b">")?;
        writer.write_all(&self.description)?;
        writer.write_all(b"\n")?;
        if width == 0 {
            if !self.sequence.is_empty() {
                writer.write_all(&self.sequence)?;
                writer.write_all(b"\n")?;
            }
            return Ok(());
        }
        for chunk in self.sequence.chunks(width) {
            writer.write_all(chunk)?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}
