//! Command-line argument definitions for the `gt` tool.
//!
//! Options follow the GenomeTools convention of a single dash before long
//! names (`-minlength 1000`). [`normalize_args`] rewrites them to the double
//! dash form [`clap`] expects before parsing.

use std::{ffi::OsString, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use annosketch::layout::line_breaker::LineBreakerKind;

/// Genome annotation sketches and sequence filtering
#[derive(Parser, Debug)]
#[command(name = "gt", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter the sequences of FASTA files and write the passing ones to
    /// stdout
    Seqfilter(SeqfilterArgs),

    /// Draw the annotations of GFF3 files as an SVG image
    Sketch(SketchArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct SeqfilterArgs {
    /// Keep sequences with at least this many residues
    #[arg(long = "minlength", value_name = "N")]
    pub min_length: Option<usize>,

    /// Keep sequences with at most this many residues
    #[arg(long = "maxlength", value_name = "N")]
    pub max_length: Option<usize>,

    /// Stop after this many sequences have passed
    #[arg(long = "maxseqnum", value_name = "N")]
    pub max_seq_num: Option<usize>,

    /// Keep only every N-th sequence, starting with the first
    #[arg(long, value_name = "N")]
    pub step: Option<usize>,

    /// Keep each otherwise passing sequence with probability P
    #[arg(long, value_name = "P")]
    pub sample: Option<f64>,

    /// Seed for -sample
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Sequence line width, 0 for no wrapping
    #[arg(long, value_name = "N")]
    pub width: Option<usize>,

    /// Write to FILE instead of stdout
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite the -o file if it exists
    #[arg(long)]
    pub force: bool,

    /// FASTA files, optionally gzip compressed
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct SketchArgs {
    /// Sequence to draw, defaults to the first one
    #[arg(long, value_name = "S")]
    pub seqid: Option<String>,

    /// First position to draw
    #[arg(long, value_name = "N")]
    pub start: Option<u64>,

    /// Last position to draw
    #[arg(long, value_name = "N")]
    pub end: Option<u64>,

    /// Image width, overrides the configuration
    #[arg(long, value_name = "N")]
    pub width: Option<u32>,

    /// Style file (TOML), overrides the configured style
    #[arg(long, value_name = "FILE")]
    pub style: Option<PathBuf>,

    /// How blocks are assigned to lines
    #[arg(long = "linebreaker", value_enum)]
    pub line_breaker: Option<LineBreakerArg>,

    /// Output SVG file
    #[arg(value_name = "OUT")]
    pub output: PathBuf,

    /// GFF3 files
    #[arg(required = true, value_name = "GFF3")]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LineBreakerArg {
    /// Blocks share a line unless their bases overlap
    Bases,
    /// Blocks also reserve the space of their captions
    Captions,
}

impl From<LineBreakerArg> for LineBreakerKind {
    fn from(arg: LineBreakerArg) -> Self {
        match arg {
            LineBreakerArg::Bases => LineBreakerKind::Bases,
            LineBreakerArg::Captions => LineBreakerKind::Captions,
        }
    }
}

/// Rewrites single-dash long options to double-dash ones.
///
/// An argument is rewritten when it starts with one dash followed by a
/// letter and is longer than a short option. Everything after `--` is left
/// alone, as are negative numbers and the program name.
///
/// # Examples
///
/// ```
/// use annosketch_cli::normalize_args;
///
/// let args = normalize_args(["gt", "seqfilter", "-minlength", "1000", "-o", "out.fas"]);
/// assert_eq!(args, ["gt", "seqfilter", "--minlength", "1000", "-o", "out.fas"]);
/// ```
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut options_done = false;

    for arg in args {
        if options_done {
            normalized.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some("--") => {
                options_done = true;
                None
            }
            Some(text) if is_single_dash_long(text) => Some(OsString::from(format!("-{text}"))),
            _ => None,
        };
        normalized.push(rewritten.unwrap_or(arg));
    }
    normalized
}

fn is_single_dash_long(arg: &str) -> bool {
    let mut chars = arg.chars();
    chars.next() == Some('-')
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && arg.len() > 2
}
