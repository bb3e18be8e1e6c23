//! The track layout engine.
//!
//! [`TrackLayout`] turns a [`Diagram`] into tracks of non-colliding lines:
//!
//! ```text
//! ruler         |----|----|----|----|
//! track "gene"  [==g1==>]   [==g2==>]      line 1
//!                  [==g3==>]               line 2
//! track "repeat" [r1]  [r2]                line 1
//! ```
//!
//! Positions are kept width independent: [`TrackLayout::calc_generic_coords`]
//! maps a sequence range onto `[0, 1]`, and canvases scale that to pixels.

use log::{debug, trace, warn};

use annosketch_core::{
    geometry::DrawingRange,
    range::Range,
    style::{FormatStyle, Style},
};

use crate::{
    canvas::Canvas,
    diagram::{Block, Diagram},
    error::LayoutError,
};

use super::line_breaker::LineBreaker;

/// A row of blocks that do not collide.
#[derive(Debug, Clone, Default)]
pub struct Line {
    blocks: Vec<Block>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns `true` if any block on the line carries a caption.
    pub fn has_captions(&self) -> bool {
        self.blocks.iter().any(|block| block.caption().is_some())
    }
}

/// All lines holding the blocks of one feature type.
#[derive(Debug, Clone)]
pub struct Track {
    title: String,
    lines: Vec<Line>,
    discarded_blocks: usize,
}

impl Track {
    fn new(
        title: &str,
        blocks: &[Block],
        format: &FormatStyle,
        breaker: &dyn LineBreaker,
    ) -> Self {
        let mut sorted: Vec<&Block> = blocks.iter().collect();
        sorted.sort_by(|a, b| {
            a.range()
                .start()
                .cmp(&b.range().start())
                .then_with(|| b.range().length().cmp(&a.range().length()))
        });

        let mut track = Self {
            title: title.to_string(),
            lines: Vec::new(),
            discarded_blocks: 0,
        };
        for block in sorted {
            track.place(block.clone(), format, breaker);
        }

        if track.discarded_blocks > 0 {
            warn!(
                track = title,
                discarded = track.discarded_blocks;
                "Blocks discarded, line limit reached",
            );
        }
        track
    }

    fn place(&mut self, block: Block, format: &FormatStyle, breaker: &dyn LineBreaker) {
        if !format.split_lines() {
            match self.lines.first_mut() {
                Some(line) => line.insert(block),
                None => {
                    let mut line = Line::new();
                    line.insert(block);
                    self.lines.push(line);
                }
            }
            return;
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| !breaker.is_occupied(line, &block))
        {
            line.insert(block);
            return;
        }

        if format
            .max_num_lines()
            .is_some_and(|max| self.lines.len() >= max)
        {
            trace!(track = self.title.as_str(), range:% = block.range(); "Discarding block");
            self.discarded_blocks += 1;
            return;
        }

        let mut line = Line::new();
        line.insert(block);
        self.lines.push(line);
    }

    /// The feature type of the blocks in this track.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn number_of_lines(&self) -> usize {
        self.lines.len()
    }

    /// Blocks dropped because the line limit was reached.
    pub fn discarded_blocks(&self) -> usize {
        self.discarded_blocks
    }
}

/// Line totals over all tracks of a layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineInfo {
    pub total_lines: usize,
    pub total_caption_lines: usize,
}

/// Tracks and lines of a diagram, laid out for a given width.
///
/// # Examples
///
/// ```
/// use annosketch::{
///     diagram::Diagram,
///     layout::{line_breaker::BasesLineBreaker, track::TrackLayout},
/// };
/// use annosketch_core::{feature::{Feature, FeatureIndex}, range::Range, style::Style};
///
/// let mut index = FeatureIndex::new();
/// index.add(Feature::new("c", "gene", Range::new(10, 60).unwrap()));
/// index.add(Feature::new("c", "gene", Range::new(40, 90).unwrap()));
///
/// let style = Style::default();
/// let diagram = Diagram::new(&index, "c", Range::new(1, 100).unwrap(), &style).unwrap();
/// let layout = TrackLayout::new(&diagram, 800, &style, &BasesLineBreaker).unwrap();
///
/// assert_eq!(layout.lineinfo().total_lines, 2);
/// ```
#[derive(Debug, Clone)]
pub struct TrackLayout {
    range: Range,
    width: u32,
    format: FormatStyle,
    tracks: Vec<Track>,
}

impl TrackLayout {
    /// Lays out every track of `diagram`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ZeroWidth`] if `width` is zero.
    pub fn new(
        diagram: &Diagram,
        width: u32,
        style: &Style,
        breaker: &dyn LineBreaker,
    ) -> Result<Self, LayoutError> {
        if width == 0 {
            return Err(LayoutError::ZeroWidth);
        }

        let format = style.format().clone();
        let tracks: Vec<Track> = diagram
            .tracks()
            .map(|(title, blocks)| Track::new(title, blocks, &format, breaker))
            .collect();

        let layout = Self {
            range: diagram.range(),
            width,
            format,
            tracks,
        };
        debug!(
            tracks = layout.tracks.len(),
            lines = layout.lineinfo().total_lines,
            height = layout.height();
            "Track layout calculated",
        );
        Ok(layout)
    }

    /// The sequence range shown.
    pub fn range(&self) -> Range {
        self.range
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn format(&self) -> &FormatStyle {
        &self.format
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn lineinfo(&self) -> LineInfo {
        self.tracks
            .iter()
            .flat_map(Track::lines)
            .fold(LineInfo::default(), |mut info, line| {
                info.total_lines += 1;
                if line.has_captions() {
                    info.total_caption_lines += 1;
                }
                info
            })
    }

    /// Height of the sketched image in device units.
    pub fn height(&self) -> u64 {
        let format = &self.format;
        let tracks: f64 = self
            .tracks
            .iter()
            .map(|track| {
                f64::from(format.track_caption_height())
                    + track.number_of_lines() as f64 * f64::from(format.line_height())
                    + f64::from(format.track_vspace())
            })
            .sum();

        let total = 2.0 * f64::from(format.margins()) + f64::from(format.ruler_space()) + tracks;
        total.ceil() as u64
    }

    /// Maps `range` onto `[0, 1]`, clamped to the shown range.
    pub fn calc_generic_coords(&self, range: Range) -> DrawingRange {
        generic_coords(self.range, range)
    }

    /// Maps a sequence position onto `[0, 1]`.
    pub fn calc_generic_point(&self, position: u64) -> f64 {
        generic_point(self.range, position)
    }

    /// Walks the layout, calling the canvas hooks in drawing order.
    ///
    /// # Errors
    ///
    /// Returns the first error a canvas hook reports.
    pub fn sketch(&self, canvas: &mut dyn Canvas) -> Result<(), LayoutError> {
        canvas.visit_layout_pre(self)?;
        canvas.draw_ruler(self.range)?;
        for track in &self.tracks {
            canvas.visit_track_pre(track)?;
            for line in track.lines() {
                canvas.visit_line_pre(line)?;
                for block in line.blocks() {
                    canvas.visit_block(block, self.calc_generic_coords(block.range()))?;
                    for element in block.elements() {
                        canvas.visit_element(element, self.calc_generic_coords(element.range()))?;
                    }
                }
                canvas.visit_line_post(line)?;
            }
            canvas.visit_track_post(track)?;
        }
        canvas.visit_layout_post(self)?;
        Ok(())
    }
}

/// Maps `range` onto `[0, 1]` relative to `view`, flagging the sides that
/// had to be clamped.
pub fn generic_coords(view: Range, range: Range) -> DrawingRange {
    let length = view.length() as f64;
    let clip_start = range.start() < view.start();
    let clip_end = range.end() > view.end();

    let start = (range.start().max(view.start()) - view.start()) as f64 / length;
    let end = (range.end().min(view.end()).saturating_add(1)).saturating_sub(view.start()) as f64
        / length;

    DrawingRange::new(start.clamp(0.0, 1.0), end.clamp(0.0, 1.0).max(start.clamp(0.0, 1.0)))
        .with_clipping(clip_start, clip_end)
}

/// Maps the right edge of base `position` onto `[0, 1]` relative to `view`,
/// the same point [`generic_coords`] gives for a range ending there.
pub fn generic_point(view: Range, position: u64) -> f64 {
    let clamped = position.clamp(view.start(), view.end());
    (clamped - view.start() + 1) as f64 / view.length() as f64
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use annosketch_core::feature::{Feature, FeatureIndex};

    use super::*;
    use crate::layout::line_breaker::BasesLineBreaker;

    fn blocks() -> impl Strategy<Value = Vec<(u64, u64)>> {
        prop::collection::vec((1u64..900, 1u64..200), 1..40)
            .prop_map(|v| v.into_iter().map(|(s, l)| (s, s + l)).collect())
    }

    proptest! {
        #[test]
        fn lines_never_hold_overlapping_blocks(spans in blocks()) {
            let mut index = FeatureIndex::new();
            for (start, end) in &spans {
                index.add(Feature::new("c", "gene", Range::new(*start, *end).unwrap()));
            }
            let style = Style::default();
            let diagram = Diagram::new(&index, "c", Range::new(1, 1100).unwrap(), &style).unwrap();
            let layout = TrackLayout::new(&diagram, 640, &style, &BasesLineBreaker).unwrap();

            let mut placed = 0;
            for line in layout.tracks()[0].lines() {
                let blocks = line.blocks();
                placed += blocks.len();
                for (i, a) in blocks.iter().enumerate() {
                    for b in &blocks[i + 1..] {
                        prop_assert!(!a.range().overlaps(b.range()));
                    }
                }
            }
            prop_assert_eq!(placed, spans.len());
        }

        #[test]
        fn generic_coords_stay_in_unit_interval(
            view_start in 1u64..500,
            view_len in 1u64..500,
            start in 1u64..1500,
            len in 0u64..500,
        ) {
            let view = Range::new(view_start, view_start + view_len).unwrap();
            let coords = generic_coords(view, Range::new(start, start + len).unwrap());
            prop_assert!((0.0..=1.0).contains(&coords.start()));
            prop_assert!((0.0..=1.0).contains(&coords.end()));
            prop_assert!(coords.start() <= coords.end());
        }
    }
}
