//! Annosketch - genome annotation sketches and sequence filtering.
//!
//! Annotations are read from GFF3, grouped into a [`diagram::Diagram`],
//! laid out into tracks and lines by a [`layout::Layout`] and drawn onto a
//! [`canvas::Canvas`]. The [`filter`] module selects FASTA records by length,
//! position and random sampling.

pub mod canvas;
pub mod config;
pub mod diagram;
pub mod filter;
pub mod layout;
#[cfg(feature = "genometools")]
pub mod native;

mod error;

pub use annosketch_core::{feature, range, sequence, style};

pub use error::{CanvasError, FilterError, LayoutError, SketchError};

use std::{fs, path::Path};

use log::{debug, info, trace};

use annosketch_core::{feature::FeatureIndex, range::Range};

use canvas::svg::SvgCanvas;
use config::AppConfig;
use diagram::Diagram;
use layout::Layout;

/// Builder for reading annotations and sketching them as SVG.
///
/// # Examples
///
/// ```
/// use annosketch::{SketchBuilder, config::AppConfig};
///
/// let source = "chr1\t.\tgene\t100\t900\t.\t+\t.\tID=g1;Name=tinman\n";
///
/// let builder = SketchBuilder::new(AppConfig::default());
/// let index = builder.parse(source, "genes.gff3").unwrap();
///
/// let (seqid, range) = builder.resolve_view(&index, None, None, None).unwrap();
/// assert_eq!(seqid, "chr1");
///
/// let svg = builder.render_svg(&index, &seqid, range).unwrap();
/// assert!(svg.contains("tinman"));
/// ```
#[derive(Debug, Default)]
pub struct SketchBuilder {
    config: AppConfig,
}

impl SketchBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse GFF3 `source` read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Parse`] carrying the source text, so the
    /// diagnostics can be rendered against it.
    pub fn parse(&self, source: &str, path: impl AsRef<Path>) -> Result<FeatureIndex, SketchError> {
        let path = path.as_ref();
        info!(path:% = path.display(); "Parsing annotations");
        let index = annosketch_parser::parse_gff3(source)
            .map_err(|err| SketchError::new_parse_error(err, source, path))?;
        debug!(sequences = index.seqids().count(); "Annotations parsed");
        Ok(index)
    }

    /// Read and parse every GFF3 file in `paths` into one index.
    ///
    /// # Errors
    ///
    /// Stops at the first file that cannot be read or parsed.
    pub fn parse_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<FeatureIndex, SketchError> {
        let mut index = FeatureIndex::new();
        for path in paths {
            let path = path.as_ref();
            let source = fs::read_to_string(path).map_err(|source| SketchError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            index.extend(self.parse(&source, path)?);
        }
        Ok(index)
    }

    /// Pick the sequence and range to sketch.
    ///
    /// Without a `seqid` the first sequence of the index is used. Missing
    /// bounds are taken from the sequence region.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NoRegion`] for an empty index,
    /// [`LayoutError::UnknownSeqid`] for a sequence without features and
    /// [`LayoutError::InvalidView`] if the bounds are inverted.
    pub fn resolve_view(
        &self,
        index: &FeatureIndex,
        seqid: Option<&str>,
        start: Option<u64>,
        end: Option<u64>,
    ) -> Result<(String, Range), SketchError> {
        let seqid = match seqid {
            Some(seqid) => seqid,
            None => index.first_seqid().ok_or(LayoutError::NoRegion)?,
        };
        let region = index.region(seqid).ok_or_else(|| LayoutError::UnknownSeqid {
            seqid: seqid.to_string(),
        })?;

        let start = start.unwrap_or(region.start()).max(1);
        let end = end.unwrap_or(region.end());
        let range = Range::new(start, end).map_err(|_| LayoutError::InvalidView { start, end })?;
        trace!(seqid, range:% = range; "View resolved");
        Ok((seqid.to_string(), range))
    }

    /// Sketch `range` of `seqid` to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns `SketchError` for an invalid style, an unknown sequence or
    /// a layout or drawing failure.
    pub fn render_svg(
        &self,
        index: &FeatureIndex,
        seqid: &str,
        range: Range,
    ) -> Result<String, SketchError> {
        let style = &self.config.style;
        style.validate()?;

        let diagram = Diagram::new(index, seqid, range, style)?;
        info!(
            seqid,
            range:% = range,
            tracks = diagram.number_of_tracks();
            "Laying out diagram",
        );

        let sketch = &self.config.sketch;
        let layout = Layout::with_backend(sketch.backend(), &diagram, sketch.width, style)?;
        let mut canvas = SvgCanvas::new(style);
        layout.sketch(&mut canvas)?;
        info!(height = layout.height(); "Diagram sketched");

        Ok(canvas.to_svg_string())
    }
}
