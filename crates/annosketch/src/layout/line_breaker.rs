//! Line breakers decide whether a block still fits on a line.

use serde::Deserialize;

use annosketch_core::{range::Range, style::FormatStyle};

use crate::diagram::Block;

use super::{
    text_width::TextWidthCalculator,
    track::Line,
};

/// Decides whether a block collides with the blocks already on a line.
pub trait LineBreaker {
    /// The bases `block` occupies on a line.
    fn occupied_range(&self, block: &Block) -> Range {
        block.range()
    }

    /// Returns `true` if `block` would collide with a block on `line`.
    fn is_occupied(&self, line: &Line, block: &Block) -> bool {
        let wanted = self.occupied_range(block);
        line.blocks()
            .iter()
            .any(|placed| self.occupied_range(placed).overlaps(wanted))
    }
}

/// Which [`LineBreaker`] a layout should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBreakerKind {
    #[default]
    Bases,
    Captions,
}

/// Blocks collide when their sequence ranges overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasesLineBreaker;

impl LineBreaker for BasesLineBreaker {}

/// Blocks collide when their ranges or their captions overlap.
///
/// A caption is drawn from the start of its block to the right, so a block
/// occupies at least as many bases as its caption is wide.
pub struct CaptionsLineBreaker {
    view: Range,
    pixel_per_base: f64,
    font_size: f32,
    text_width: Box<dyn TextWidthCalculator>,
}

impl CaptionsLineBreaker {
    pub fn new(
        view: Range,
        width: u32,
        format: &FormatStyle,
        text_width: Box<dyn TextWidthCalculator>,
    ) -> Self {
        let drawable = (f64::from(width) - 2.0 * f64::from(format.margins())).max(1.0);
        Self {
            view,
            pixel_per_base: drawable / view.length() as f64,
            font_size: format.font_size(),
            text_width,
        }
    }
}

impl LineBreaker for CaptionsLineBreaker {
    fn occupied_range(&self, block: &Block) -> Range {
        let range = block.range();
        let Some(caption) = block.caption() else {
            return range;
        };

        let caption_bases = (self.text_width.text_width(caption, self.font_size)
            / self.pixel_per_base)
            .ceil() as u64;
        // Captions of blocks starting left of the view are drawn at its start
        let caption_start = range.start().max(self.view.start());
        let caption_end = caption_start.saturating_add(caption_bases.saturating_sub(1));

        Range::new(range.start(), range.end().max(caption_end)).unwrap_or(range)
    }
}

#[cfg(test)]
mod tests {
    use annosketch_core::feature::Feature;

    use super::*;
    use crate::layout::text_width::ApproximateTextWidth;

    fn range(start: u64, end: u64) -> Range {
        Range::new(start, end).unwrap()
    }

    fn block(start: u64, end: u64, caption: Option<&str>) -> Block {
        let mut feature = Feature::new("c", "gene", range(start, end));
        if let Some(caption) = caption {
            feature.set_attribute("Name", caption);
        }
        Block::from_feature(&feature, true)
    }

    fn line_with(blocks: &[Block]) -> Line {
        let mut line = Line::new();
        for block in blocks {
            line.insert(block.clone());
        }
        line
    }

    /// 1 base per pixel: 1000 bases over 1060 - 2 * 30 pixels.
    fn captions_breaker() -> CaptionsLineBreaker {
        CaptionsLineBreaker::new(
            range(1, 1000),
            1060,
            &FormatStyle::default(),
            Box::new(ApproximateTextWidth::new(1.0)),
        )
    }

    #[test]
    fn test_bases_breaker_overlap() {
        let line = line_with(&[block(10, 20, None)]);
        assert!(BasesLineBreaker.is_occupied(&line, &block(20, 30, None)));
        assert!(!BasesLineBreaker.is_occupied(&line, &block(21, 30, None)));
    }

    #[test]
    fn test_empty_line_is_free() {
        assert!(!BasesLineBreaker.is_occupied(&Line::new(), &block(1, 5, None)));
        assert!(!captions_breaker().is_occupied(&Line::new(), &block(1, 5, Some("wide"))));
    }

    #[test]
    fn test_caption_extends_occupied_range() {
        let breaker = captions_breaker();
        // 4 chars * 10pt = 40 pixels = 40 bases
        assert_eq!(breaker.occupied_range(&block(100, 110, Some("abcd"))), range(100, 139));
        assert_eq!(breaker.occupied_range(&block(100, 110, None)), range(100, 110));
        // Captions shorter than the block do not change it
        assert_eq!(breaker.occupied_range(&block(100, 400, Some("abcd"))), range(100, 400));
    }

    #[test]
    fn test_captions_breaker_separates_captioned_neighbours() {
        let line = line_with(&[block(100, 110, Some("abcd"))]);
        let neighbour = block(120, 130, None);

        assert!(!BasesLineBreaker.is_occupied(&line, &neighbour));
        assert!(captions_breaker().is_occupied(&line, &neighbour));
    }
}
