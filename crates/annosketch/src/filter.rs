//! Sequence filtering.
//!
//! [`SeqFilter`] decides record by record whether a sequence is kept, based
//! on its length, its position in the input and an optional random sample.
//! [`filter_records`] streams records through a filter into a FASTA writer.

use std::io::Write;

use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng};

use annosketch_core::sequence::SeqRecord;
use annosketch_parser::fasta::FastaError;

use crate::error::FilterError;

/// Default FASTA line width of filtered output.
pub const DEFAULT_WIDTH: usize = 60;

/// Selection criteria. A record must satisfy all of them to pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    /// Minimum sequence length, inclusive.
    pub min_length: usize,
    /// Maximum sequence length, inclusive.
    pub max_length: usize,
    /// Stop passing records after this many have passed.
    pub max_seq_num: usize,
    /// Only records whose 0-based input index is a multiple of `step` pass.
    pub step: usize,
    /// Probability with which an otherwise passing record is kept.
    pub sample: Option<f64>,
    /// Seed for sampling; drawn from the OS when unset.
    pub seed: Option<u64>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            min_length: 0,
            max_length: usize::MAX,
            max_seq_num: usize::MAX,
            step: 1,
            sample: None,
            seed: None,
        }
    }
}

impl FilterOptions {
    /// # Errors
    ///
    /// Returns a [`FilterError`] for a zero step, a sample probability
    /// outside `[0, 1]` or a minimum length above the maximum.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.step == 0 {
            return Err(FilterError::ZeroStep);
        }
        if let Some(p) = self.sample {
            if !(0.0..=1.0).contains(&p) {
                return Err(FilterError::InvalidSample(p));
            }
        }
        if self.min_length > self.max_length {
            return Err(FilterError::InvertedLengths {
                min: self.min_length,
                max: self.max_length,
            });
        }
        Ok(())
    }
}

/// Pass and filter counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub passed: usize,
    pub filtered: usize,
}

impl FilterStats {
    pub fn total(&self) -> usize {
        self.passed + self.filtered
    }
}

/// Record-by-record filter state.
///
/// # Examples
///
/// ```
/// use annosketch::filter::{FilterOptions, SeqFilter};
/// use annosketch_core::sequence::SeqRecord;
///
/// let options = FilterOptions { min_length: 3, ..FilterOptions::default() };
/// let mut filter = SeqFilter::new(options).unwrap();
///
/// assert!(filter.accepts(&SeqRecord::new("a", "MKV")));
/// assert!(!filter.accepts(&SeqRecord::new("b", "MK")));
/// assert_eq!(filter.stats().passed, 1);
/// ```
#[derive(Debug)]
pub struct SeqFilter {
    options: FilterOptions,
    rng: Option<StdRng>,
    index: usize,
    stats: FilterStats,
}

impl SeqFilter {
    /// # Errors
    ///
    /// Returns a [`FilterError`] if the options are invalid.
    pub fn new(options: FilterOptions) -> Result<Self, FilterError> {
        options.validate()?;
        let rng = options.sample.map(|_| match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        });
        Ok(Self {
            options,
            rng,
            index: 0,
            stats: FilterStats::default(),
        })
    }

    /// Decides whether `record` passes and updates the statistics.
    pub fn accepts(&mut self, record: &SeqRecord) -> bool {
        let index = self.index;
        self.index += 1;

        let options = &self.options;
        let len = record.len();
        let mut pass = len >= options.min_length
            && len <= options.max_length
            && self.stats.passed < options.max_seq_num
            && index % options.step == 0;

        if pass {
            if let (Some(p), Some(rng)) = (options.sample, self.rng.as_mut()) {
                pass = rng.random::<f64>() <= p;
            }
        }

        if pass {
            self.stats.passed += 1;
        } else {
            self.stats.filtered += 1;
        }
        pass
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }
}

/// Writes every passing record of `records` to `writer` as FASTA.
///
/// `width` is the sequence line width; `0` writes each sequence on one line.
///
/// # Errors
///
/// Returns the first read or write error, or a [`FilterError`] for invalid
/// options.
pub fn filter_records<I, W>(
    records: I,
    writer: &mut W,
    options: FilterOptions,
    width: usize,
) -> Result<FilterStats, FilterError>
where
    I: IntoIterator<Item = Result<SeqRecord, FastaError>>,
    W: Write + ?Sized,
{
    let mut filter = SeqFilter::new(options)?;
    debug!(options:? = filter.options; "Filtering sequences");

    for record in records {
        let record = record?;
        if filter.accepts(&record) {
            record.write_fasta(writer, width)?;
        }
    }
    writer.flush()?;

    let stats = filter.stats();
    info!(passed = stats.passed, filtered = stats.filtered; "Sequences filtered");
    Ok(stats)
}
