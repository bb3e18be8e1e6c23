//! Streaming FASTA reader.
//!
//! [`FastaReader`] turns any [`BufRead`] into an iterator of
//! [`SeqRecord`]s. [`open`] picks plain or gzip decoding from the file name,
//! so `proteins.fas.gz` reads the same as `proteins.fas`.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use flate2::read::MultiGzDecoder;
use log::debug;
use thiserror::Error;

use annosketch_core::sequence::SeqRecord;

/// FASTA reading errors.
#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot open `{}`: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Line {line}: sequence data before the first `>` header")]
    MissingHeader { line: usize },
}

/// How a sequence file is stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Uncompressed,
    Gzip,
}

impl FileMode {
    /// Files ending in `.gz` are gzip compressed, everything else is plain.
    pub fn determine(path: &Path) -> Self {
        if path.extension().is_some_and(|ext| ext == "gz") {
            Self::Gzip
        } else {
            Self::Uncompressed
        }
    }
}

/// Opens `path` for reading, decompressing it if needed.
///
/// # Errors
///
/// Returns [`FastaError::Open`] if the file cannot be opened.
pub fn open(path: impl AsRef<Path>) -> Result<FastaReader<Box<dyn BufRead>>, FastaError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FastaError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mode = FileMode::determine(path);
    debug!(path = path.display().to_string(), mode:? = mode; "Opening sequence file");

    let reader: Box<dyn BufRead> = match mode {
        FileMode::Uncompressed => Box::new(BufReader::new(file)),
        FileMode::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(file))),
    };
    Ok(FastaReader::new(reader))
}

/// Iterator over the records of a FASTA stream.
///
/// Lines are read as bytes, so headers in any encoding survive unchanged.
/// Blank lines and `;` comment lines are skipped, whitespace inside sequence
/// lines is dropped. After an error the iterator is exhausted.
///
/// # Examples
///
/// ```
/// use annosketch_parser::fasta::FastaReader;
///
/// let input = b">p1 first\nMKV\nLAA\n>p2\nMS\n";
/// let records: Vec<_> = FastaReader::new(&input[..])
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].description(), b"p1 first");
/// assert_eq!(records[0].sequence(), b"MKVLAA");
/// ```
pub struct FastaReader<R> {
    reader: R,
    line: Vec<u8>,
    line_number: usize,
    header: Option<Vec<u8>>,
    sequence: Vec<u8>,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            line_number: 0,
            header: None,
            sequence: Vec::new(),
            done: false,
        }
    }

    fn finish_record(&mut self, description: Vec<u8>) -> SeqRecord {
        SeqRecord::new(description, std::mem::take(&mut self.sequence))
    }

    fn fail(&mut self, err: FastaError) -> Option<Result<SeqRecord, FastaError>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<SeqRecord, FastaError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.line.clear();
            let read = match self.reader.read_until(b'\n', &mut self.line) {
                Ok(read) => read,
                Err(err) => return self.fail(err.into()),
            };

            if read == 0 {
                self.done = true;
                let description = self.header.take()?;
                return Some(Ok(self.finish_record(description)));
            }
            self.line_number += 1;

            let line = trim_line_end(&self.line);
            if let Some(description) = line.strip_prefix(b">") {
                let description = description.to_vec();
                if let Some(previous) = self.header.replace(description) {
                    return Some(Ok(self.finish_record(previous)));
                }
                continue;
            }

            if line.trim_ascii().is_empty() || line.starts_with(b";") {
                continue;
            }

            if self.header.is_none() {
                let line = self.line_number;
                return self.fail(FastaError::MissingHeader { line });
            }

            self.sequence
                .extend(line.iter().filter(|b| !b.is_ascii_whitespace()));
        }
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|&b| b != b'\n' && b != b'\r')
        .map_or(0, |i| i + 1);
    &line[..end]
}
