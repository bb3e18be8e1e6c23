//! SVG canvas.
//!
//! [`SvgCanvas`] keeps a vertical cursor that advances exactly as
//! [`TrackLayout::height`] adds up space: margin, ruler, then per track its
//! caption, its lines and the track spacing. Horizontal positions come from
//! the width-independent coordinates scaled to the drawable width.

use std::{io, path::Path};

use log::{debug, trace};
use svg::{
    Document, Node,
    node::element::{Line as SvgLine, Polygon, Polyline, Rectangle, Text},
};

use annosketch_core::{
    color::Color,
    feature::Strand,
    geometry::DrawingRange,
    range::Range,
    style::{FeatureShape, FeatureStyle, FormatStyle, Style},
};

use crate::{
    diagram::{Block, Element},
    error::CanvasError,
    layout::track::{Line, Track, TrackLayout, generic_point},
};

use super::{Canvas, format_ruler_label, tick_interval};

const MAX_RULER_TICKS: u64 = 10;
const TICK_LENGTH: f64 = 4.0;

/// Horizontal mapping captured when a layout starts.
#[derive(Debug, Clone, Copy)]
struct Frame {
    view: Range,
    left: f64,
    drawable: f64,
}

impl Frame {
    fn x(&self, generic: f64) -> f64 {
        self.left + generic * self.drawable
    }
}

/// Draws a layout as an SVG document.
///
/// # Examples
///
/// ```
/// use annosketch::{canvas::svg::SvgCanvas, diagram::Diagram, layout::Layout};
/// use annosketch_core::{feature::{Feature, FeatureIndex}, range::Range, style::Style};
///
/// let mut gene = Feature::new("c", "gene", Range::new(200, 700).unwrap());
/// gene.set_attribute("Name", "tinman");
/// let mut index = FeatureIndex::new();
/// index.add(gene);
///
/// let style = Style::default();
/// let diagram = Diagram::new(&index, "c", Range::new(1, 1000).unwrap(), &style).unwrap();
/// let layout = Layout::new(&diagram, 600, &style).unwrap();
///
/// let mut canvas = SvgCanvas::new(&style);
/// layout.sketch(&mut canvas).unwrap();
/// assert!(canvas.to_svg_string().contains("tinman"));
/// ```
#[derive(Debug)]
pub struct SvgCanvas {
    style: Style,
    format: FormatStyle,
    document: Document,
    frame: Option<Frame>,
    y: f64,
    height: u64,
}

impl SvgCanvas {
    /// Creates a canvas drawing with the colors and shapes of `style`.
    pub fn new(style: &Style) -> Self {
        Self {
            style: style.clone(),
            format: style.format().clone(),
            document: Document::new(),
            frame: None,
            y: 0.0,
            height: 0,
        }
    }

    /// Height of the sketched image; zero before a layout was sketched.
    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn to_svg_string(&self) -> String {
        self.document.to_string()
    }

    /// Writes the document to `path`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from writing the file.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        svg::save(path, &self.document)
    }

    fn frame(&self, hook: &'static str) -> Result<Frame, CanvasError> {
        self.frame.ok_or(CanvasError::OutOfOrder(hook))
    }

    fn font_size(&self) -> f64 {
        f64::from(self.format.font_size())
    }

    fn text(&self, content: &str, x: f64, y: f64, color: &Color) -> Text {
        Text::new(content)
            .set("x", x)
            .set("y", y)
            .set("font-family", "sans-serif")
            .set("font-size", self.font_size())
            .set("fill", color.to_string())
            .set("fill-opacity", color.alpha())
    }

    fn draw_element_shape(
        &mut self,
        element: &Element,
        style: &FeatureStyle,
        x1: f64,
        x2: f64,
        range: DrawingRange,
    ) -> Result<(), CanvasError> {
        let fill = style.fill()?;
        let stroke = style.stroke()?;
        let top = self.y + f64::from(self.format.block_caption_height());
        let height = f64::from(self.format.bar_height());
        let middle = top + height / 2.0;
        let width = (x2 - x1).max(1.0);

        let stroke_width = style.stroke_width();

        match (style.shape(), arrow_direction(element.strand(), range)) {
            (FeatureShape::Line, _) => {
                let mut line = SvgLine::new()
                    .set("x1", x1)
                    .set("y1", middle)
                    .set("x2", x1 + width)
                    .set("y2", middle);
                apply_stroke(&mut line, &stroke, stroke_width);
                self.document.append(line);
            }
            (FeatureShape::Caret, _) => {
                let mut caret = Polyline::new()
                    .set(
                        "points",
                        format!(
                            "{x1},{middle} {},{top} {},{middle}",
                            x1 + width / 2.0,
                            x1 + width
                        ),
                    )
                    .set("fill", "none");
                apply_stroke(&mut caret, &stroke, stroke_width);
                self.document.append(caret);
            }
            (FeatureShape::Arrow, Some(direction)) => {
                let head = (height / 2.0).min(width);
                let bottom = top + height;
                let right = x1 + width;
                let points = match direction {
                    Direction::Right => format!(
                        "{x1},{top} {},{top} {right},{middle} {},{bottom} {x1},{bottom}",
                        right - head,
                        right - head
                    ),
                    Direction::Left => format!(
                        "{x1},{middle} {},{top} {right},{top} {right},{bottom} {},{bottom}",
                        x1 + head,
                        x1 + head
                    ),
                };
                let mut arrow = Polygon::new()
                    .set("points", points)
                    .set("fill", fill.to_string())
                    .set("fill-opacity", fill.alpha());
                apply_stroke(&mut arrow, &stroke, stroke_width);
                self.document.append(arrow);
            }
            (FeatureShape::Box | FeatureShape::Arrow, _) => {
                let mut rect = Rectangle::new()
                    .set("x", x1)
                    .set("y", top)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", fill.to_string())
                    .set("fill-opacity", fill.alpha());
                apply_stroke(&mut rect, &stroke, stroke_width);
                self.document.append(rect);
            }
        }
        Ok(())
    }

    #[cfg(test)]
    fn cursor(&self) -> f64 {
        self.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
}

fn apply_stroke<N: Node>(node: &mut N, stroke: &Color, width: f32) {
    node.assign("stroke", stroke.to_string());
    node.assign("stroke-opacity", stroke.alpha());
    node.assign("stroke-width", width);
}

/// Arrow direction for a stranded element; `None` if unstranded or if the
/// pointed end lies outside the view.
fn arrow_direction(strand: Strand, range: DrawingRange) -> Option<Direction> {
    match strand {
        Strand::Forward if !range.clip_end() => Some(Direction::Right),
        Strand::Reverse if !range.clip_start() => Some(Direction::Left),
        _ => None,
    }
}

impl Canvas for SvgCanvas {
    fn visit_layout_pre(&mut self, layout: &TrackLayout) -> Result<(), CanvasError> {
        let width = f64::from(layout.width());
        self.height = layout.height();
        self.format = layout.format().clone();

        let margins = f64::from(self.format.margins());
        self.frame = Some(Frame {
            view: layout.range(),
            left: margins,
            drawable: (width - 2.0 * margins).max(1.0),
        });

        let background = self.format.background_color()?;
        self.document = Document::new()
            .set("viewBox", format!("0 0 {} {}", width, self.height))
            .set("width", width)
            .set("height", self.height)
            .add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", self.height)
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );
        self.y = margins;

        debug!(width = layout.width(), height = self.height; "Sketching layout to SVG");
        Ok(())
    }

    fn visit_layout_post(&mut self, _layout: &TrackLayout) -> Result<(), CanvasError> {
        self.y += f64::from(self.format.margins());
        trace!(cursor = self.y; "Finished SVG sketch");
        Ok(())
    }

    fn draw_ruler(&mut self, range: Range) -> Result<(), CanvasError> {
        let frame = self.frame("draw_ruler")?;
        let color = self.format.ruler_color()?;
        let baseline = self.y + self.font_size() + TICK_LENGTH + 2.0;

        self.document.append(
            SvgLine::new()
                .set("x1", frame.x(0.0))
                .set("y1", baseline)
                .set("x2", frame.x(1.0))
                .set("y2", baseline)
                .set("stroke", color.to_string())
                .set("stroke-width", 1),
        );

        let interval = tick_interval(range.length(), MAX_RULER_TICKS);
        let first = range.start().div_ceil(interval).saturating_mul(interval);
        for position in (first..=range.end()).step_by(interval as usize) {
            let x = frame.x(generic_point(frame.view, position));
            self.document.append(
                SvgLine::new()
                    .set("x1", x)
                    .set("y1", baseline - TICK_LENGTH)
                    .set("x2", x)
                    .set("y2", baseline)
                    .set("stroke", color.to_string()),
            );
            let label = self
                .text(&format_ruler_label(position), x, baseline - TICK_LENGTH - 2.0, &color)
                .set("text-anchor", "middle");
            self.document.append(label);
        }

        self.y += f64::from(self.format.ruler_space());
        Ok(())
    }

    fn visit_track_pre(&mut self, track: &Track) -> Result<(), CanvasError> {
        let frame = self.frame("visit_track_pre")?;
        if self.format.show_track_captions() {
            let color = self.format.track_title_color()?;
            let title = self
                .text(track.title(), frame.left, self.y + self.font_size(), &color)
                .set("font-weight", "bold");
            self.document.append(title);
        }
        self.y += f64::from(self.format.track_caption_height());
        Ok(())
    }

    fn visit_track_post(&mut self, _track: &Track) -> Result<(), CanvasError> {
        self.y += f64::from(self.format.track_vspace());
        Ok(())
    }

    fn visit_line_post(&mut self, _line: &Line) -> Result<(), CanvasError> {
        self.y += f64::from(self.format.line_height());
        Ok(())
    }

    fn visit_block(&mut self, block: &Block, range: DrawingRange) -> Result<(), CanvasError> {
        let frame = self.frame("visit_block")?;
        let x1 = frame.x(range.start());
        let x2 = frame.x(range.end());

        if let Some(caption) = block.caption().filter(|_| self.format.show_block_captions()) {
            let color = self.style.feature_style(block.kind()).stroke()?;
            let text = self.text(caption, x1, self.y + self.font_size(), &color);
            self.document.append(text);
        }

        if block.elements().len() > 1 {
            let stroke = self.style.feature_style(block.kind()).stroke()?;
            let middle = self.y
                + f64::from(self.format.block_caption_height())
                + f64::from(self.format.bar_height()) / 2.0;
            self.document.append(
                SvgLine::new()
                    .set("x1", x1)
                    .set("y1", middle)
                    .set("x2", x2)
                    .set("y2", middle)
                    .set("stroke", stroke.to_string())
                    .set("stroke-opacity", stroke.alpha()),
            );
        }
        Ok(())
    }

    fn visit_element(&mut self, element: &Element, range: DrawingRange) -> Result<(), CanvasError> {
        let frame = self.frame("visit_element")?;
        let style = self.style.feature_style(element.kind()).clone();
        self.draw_element_shape(
            element,
            &style,
            frame.x(range.start()),
            frame.x(range.end()),
            range,
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use annosketch_core::{
        feature::{Feature, FeatureIndex},
        style::FeatureStyle,
    };

    use super::*;
    use crate::{diagram::Diagram, layout::Layout};

    fn range(start: u64, end: u64) -> Range {
        Range::new(start, end).unwrap()
    }

    fn sample_index() -> FeatureIndex {
        let mut index = FeatureIndex::new();
        let mut gene = Feature::new("c", "gene", range(100, 800));
        gene.set_attribute("Name", "tinman");
        gene.set_strand(Strand::Forward);
        let mut mrna = Feature::new("c", "mRNA", range(100, 800));
        mrna.set_strand(Strand::Forward);
        for (kind, start, end) in [("exon", 100, 300), ("intron", 301, 599), ("exon", 600, 800)] {
            let mut part = Feature::new("c", kind, range(start, end));
            part.set_strand(Strand::Forward);
            mrna.add_child(part);
        }
        gene.add_child(mrna);
        index.add(gene);
        index.add(Feature::new("c", "repeat_region", range(50, 150)));
        index.add(Feature::new("c", "repeat_region", range(120, 180)));
        index
    }

    fn sketch(style: &Style) -> (SvgCanvas, u64) {
        let diagram = Diagram::new(&sample_index(), "c", range(1, 1000), style).unwrap();
        let layout = Layout::new(&diagram, 800, style).unwrap();
        let mut canvas = SvgCanvas::new(style);
        layout.sketch(&mut canvas).unwrap();
        let height = layout.height();
        (canvas, height)
    }

    #[test]
    fn test_cursor_ends_at_layout_height() {
        let (canvas, height) = sketch(&Style::default());
        assert_eq!(canvas.height(), height);
        assert_approx_eq!(f64, canvas.cursor().ceil(), height as f64);
    }

    #[test]
    fn test_cursor_matches_height_without_captions() {
        let mut style = Style::default();
        style.format_mut().set_show_track_captions(false);
        style.format_mut().set_show_block_captions(false);
        let (canvas, height) = sketch(&style);
        assert_approx_eq!(f64, canvas.cursor().ceil(), height as f64);
    }

    #[test]
    fn test_document_contents() {
        let (canvas, _) = sketch(&Style::default());
        let svg = canvas.to_svg_string();

        assert!(svg.contains("tinman"));
        assert!(svg.contains("repeat_region"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("<rect"));
        // Last ruler label
        assert!(svg.contains("1K"));
    }

    #[test]
    fn test_arrow_shape_for_stranded_elements() {
        let mut style = Style::default();
        style.set_feature_style("exon", FeatureStyle::new("gold", FeatureShape::Arrow));
        let (canvas, _) = sketch(&style);
        assert!(canvas.to_svg_string().contains("<polygon"));
    }

    #[test]
    fn test_invalid_color_is_reported() {
        let mut style = Style::default();
        style.set_feature_style("exon", FeatureStyle::new("not-a-color", FeatureShape::Box));
        let diagram = Diagram::new(&sample_index(), "c", range(1, 1000), &style).unwrap();
        let layout = Layout::new(&diagram, 800, &style).unwrap();

        let mut canvas = SvgCanvas::new(&style);
        let err = layout.sketch(&mut canvas).unwrap_err();
        assert!(err.to_string().contains("not-a-color"));
    }

    #[test]
    fn test_hooks_before_layout_are_rejected() {
        let mut canvas = SvgCanvas::new(&Style::default());
        let err = canvas.draw_ruler(range(1, 10)).unwrap_err();
        assert!(matches!(err, CanvasError::OutOfOrder("draw_ruler")));
    }

    #[test]
    fn test_arrow_direction() {
        let inside = DrawingRange::new(0.1, 0.2);
        assert_eq!(arrow_direction(Strand::Forward, inside), Some(Direction::Right));
        assert_eq!(arrow_direction(Strand::Reverse, inside), Some(Direction::Left));
        assert_eq!(arrow_direction(Strand::Both, inside), None);

        let clipped = inside.with_clipping(false, true);
        assert_eq!(arrow_direction(Strand::Forward, clipped), None);
        assert_eq!(arrow_direction(Strand::Reverse, clipped), Some(Direction::Left));
    }

    #[test]
    fn test_save_writes_file() {
        let (canvas, _) = sketch(&Style::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        canvas.save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<svg"));
    }
}
