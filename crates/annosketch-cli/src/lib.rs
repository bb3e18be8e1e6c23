//! CLI logic for the `gt` tool.
//!
//! Two commands are provided: `seqfilter` selects FASTA records and
//! `sketch` draws GFF3 annotations as SVG.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::{Cli, Command, LineBreakerArg, SeqfilterArgs, SketchArgs, normalize_args};
pub use config::{CliConfig, ConfigError, SeqfilterConfig, load_config};
pub use error::CliError;

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    iter,
};

use log::{debug, info};

use annosketch::{
    SketchBuilder,
    filter::{self, FilterOptions},
    sequence::SeqRecord,
    style::Style,
};
use annosketch_parser::fasta::{self, FastaError};

/// Run the `gt` command line tool.
///
/// # Errors
///
/// Returns `CliError` for configuration, I/O, parse, layout and filter
/// errors.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let config = config::load_config(cli.config.as_ref())?;
    match &cli.command {
        Command::Seqfilter(args) => {
            let stdout = io::stdout();
            run_seqfilter(args, &config, &mut stdout.lock())
        }
        Command::Sketch(args) => run_sketch(args, config),
    }
}

/// Filter the records of `args.files` into the `-o` file, or into `stdout`
/// without one.
///
/// # Errors
///
/// Returns [`CliError::OutputExists`] if the `-o` file exists and `-force`
/// is not set, or the first read, write or option error.
pub fn run_seqfilter<W: Write + ?Sized>(
    args: &SeqfilterArgs,
    config: &CliConfig,
    stdout: &mut W,
) -> Result<(), CliError> {
    let defaults = FilterOptions::default();
    let options = FilterOptions {
        min_length: args.min_length.unwrap_or(defaults.min_length),
        max_length: args.max_length.unwrap_or(defaults.max_length),
        max_seq_num: args.max_seq_num.unwrap_or(defaults.max_seq_num),
        step: args.step.unwrap_or(defaults.step),
        sample: args.sample,
        seed: args.seed,
    };
    let width = args.width.unwrap_or(config.seqfilter.width);
    info!(files = args.files.len(), width; "Filtering sequence files");

    let records = args.files.iter().flat_map(
        |path| -> Box<dyn Iterator<Item = Result<SeqRecord, FastaError>>> {
            debug!(path:% = path.display(); "Reading FASTA file");
            match fasta::open(path) {
                Ok(reader) => Box::new(reader),
                Err(err) => Box::new(iter::once(Err(err))),
            }
        },
    );

    match &args.output {
        Some(path) => {
            if path.exists() && !args.force {
                return Err(CliError::OutputExists(path.clone()));
            }
            let mut writer = BufWriter::new(File::create(path)?);
            filter::filter_records(records, &mut writer, options, width)?;
            info!(output:% = path.display(); "Filtered sequences written");
        }
        None => {
            let mut writer = BufWriter::new(stdout);
            filter::filter_records(records, &mut writer, options, width)?;
        }
    }
    Ok(())
}

/// Sketch the annotations of `args.files` into the SVG file `args.output`.
///
/// # Errors
///
/// Returns `CliError` if a file cannot be read or parsed, the style is
/// invalid or the requested view does not exist.
pub fn run_sketch(args: &SketchArgs, config: CliConfig) -> Result<(), CliError> {
    let mut app = config.app;
    if let Some(width) = args.width {
        app.sketch.width = width;
    }
    if let Some(line_breaker) = args.line_breaker {
        app.sketch.line_breaker = line_breaker.into();
    }
    if let Some(path) = &args.style {
        info!(path:% = path.display(); "Loading style");
        let source = fs::read_to_string(path)?;
        app.style = Style::from_toml(&source)?;
    }

    let builder = SketchBuilder::new(app);
    let index = builder.parse_files(&args.files)?;
    let (seqid, range) =
        builder.resolve_view(&index, args.seqid.as_deref(), args.start, args.end)?;
    let svg = builder.render_svg(&index, &seqid, range)?;

    fs::write(&args.output, svg)?;
    info!(output_file:% = args.output.display(); "SVG exported successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use annosketch::{FilterError, SketchError};

    use super::*;

    const FASTA: &str = ">a\nMKV\n>b\nMKVLAAGLLL\n>c\nMK\n>d\nMKVLA\n";

    fn fasta_file(dir: &Path) -> PathBuf {
        let path = dir.join("in.fas");
        fs::write(&path, FASTA).unwrap();
        path
    }

    fn seqfilter(args: &SeqfilterArgs) -> Result<String, CliError> {
        let mut out = Vec::new();
        run_seqfilter(args, &CliConfig::default(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_seqfilter_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let args = SeqfilterArgs {
            min_length: Some(3),
            max_length: Some(5),
            files: vec![fasta_file(dir.path())],
            ..SeqfilterArgs::default()
        };
        assert_eq!(seqfilter(&args).unwrap(), ">a\nMKV\n>d\nMKVLA\n");
    }

    #[test]
    fn test_seqfilter_step_spans_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = fasta_file(dir.path());
        let second = dir.path().join("more.fas");
        fs::write(&second, ">e\nM\n>f\nMM\n").unwrap();

        let args = SeqfilterArgs {
            step: Some(2),
            width: Some(4),
            files: vec![first, second],
            ..SeqfilterArgs::default()
        };
        assert_eq!(seqfilter(&args).unwrap(), ">a\nMKV\n>c\nMK\n>e\nM\n");
    }

    #[test]
    fn test_seqfilter_output_file_and_force() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.fas");
        fs::write(&output, "old").unwrap();

        let mut args = SeqfilterArgs {
            max_seq_num: Some(1),
            output: Some(output.clone()),
            files: vec![fasta_file(dir.path())],
            ..SeqfilterArgs::default()
        };
        assert!(matches!(seqfilter(&args), Err(CliError::OutputExists(_))));
        assert_eq!(fs::read_to_string(&output).unwrap(), "old");

        args.force = true;
        assert_eq!(seqfilter(&args).unwrap(), "");
        assert_eq!(fs::read_to_string(&output).unwrap(), ">a\nMKV\n");
    }

    #[test]
    fn test_seqfilter_invalid_step() {
        let dir = tempfile::tempdir().unwrap();
        let args = SeqfilterArgs {
            step: Some(0),
            files: vec![fasta_file(dir.path())],
            ..SeqfilterArgs::default()
        };
        assert!(matches!(
            seqfilter(&args),
            Err(CliError::Sketch(SketchError::Filter(FilterError::ZeroStep)))
        ));
    }

    #[test]
    fn test_seqfilter_missing_file() {
        let args = SeqfilterArgs {
            files: vec![PathBuf::from("/definitely/not/here.fas")],
            ..SeqfilterArgs::default()
        };
        assert!(matches!(
            seqfilter(&args),
            Err(CliError::Sketch(SketchError::Filter(FilterError::Fasta(_))))
        ));
    }

    #[test]
    fn test_run_sketch_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let gff3 = dir.path().join("genes.gff3");
        fs::write(
            &gff3,
            "##gff-version 3\nctg1\t.\tgene\t100\t900\t.\t-\t.\tID=g1;Name=tinman\n",
        )
        .unwrap();
        let style = dir.path().join("style.toml");
        fs::write(&style, "[feature.gene]\nfill = \"red\"\nshape = \"arrow\"\n").unwrap();
        let output = dir.path().join("out.svg");

        let args = SketchArgs {
            seqid: None,
            start: Some(1),
            end: Some(1000),
            width: Some(500),
            style: Some(style),
            line_breaker: Some(LineBreakerArg::Captions),
            output: output.clone(),
            files: vec![gff3],
        };
        run_sketch(&args, CliConfig::default()).unwrap();

        let svg = fs::read_to_string(&output).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("tinman"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn test_run_sketch_unknown_seqid() {
        let dir = tempfile::tempdir().unwrap();
        let gff3 = dir.path().join("genes.gff3");
        fs::write(&gff3, "ctg1\t.\tgene\t100\t900\t.\t+\t.\tID=g1\n").unwrap();

        let args = SketchArgs {
            seqid: Some("ctg9".to_string()),
            start: None,
            end: None,
            width: None,
            style: None,
            line_breaker: None,
            output: dir.path().join("out.svg"),
            files: vec![gff3],
        };
        let err = run_sketch(&args, CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Sketch(SketchError::Layout(_))));
        assert!(!args.output.exists());
    }
}
