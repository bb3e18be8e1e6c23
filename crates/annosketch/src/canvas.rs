//! Canvases receive a layout piece by piece and draw it.
//!
//! [`TrackLayout::sketch`](crate::layout::track::TrackLayout::sketch) walks
//! the layout and calls the [`Canvas`] hooks in this order:
//!
//! ```text
//! visit_layout_pre
//! draw_ruler
//! for each track:   visit_track_pre
//!   for each line:  visit_line_pre
//!     for each block: visit_block, then visit_element per element
//!                   visit_line_post
//!                   visit_track_post
//! visit_layout_post
//! ```
//!
//! Every hook defaults to doing nothing, so a canvas only implements what
//! it draws.

pub mod svg;

use annosketch_core::{geometry::DrawingRange, range::Range};

use crate::{
    diagram::{Block, Element},
    error::CanvasError,
    layout::track::{Line, Track, TrackLayout},
};

/// Drawing hooks called while a layout is sketched.
pub trait Canvas {
    fn visit_layout_pre(&mut self, _layout: &TrackLayout) -> Result<(), CanvasError> {
        Ok(())
    }

    fn visit_layout_post(&mut self, _layout: &TrackLayout) -> Result<(), CanvasError> {
        Ok(())
    }

    fn visit_track_pre(&mut self, _track: &Track) -> Result<(), CanvasError> {
        Ok(())
    }

    fn visit_track_post(&mut self, _track: &Track) -> Result<(), CanvasError> {
        Ok(())
    }

    fn visit_line_pre(&mut self, _line: &Line) -> Result<(), CanvasError> {
        Ok(())
    }

    fn visit_line_post(&mut self, _line: &Line) -> Result<(), CanvasError> {
        Ok(())
    }

    /// `range` is the block's width-independent position.
    fn visit_block(&mut self, _block: &Block, _range: DrawingRange) -> Result<(), CanvasError> {
        Ok(())
    }

    /// `range` is the element's width-independent position.
    fn visit_element(
        &mut self,
        _element: &Element,
        _range: DrawingRange,
    ) -> Result<(), CanvasError> {
        Ok(())
    }

    /// Draws a ruler labelled with the positions of `range`.
    fn draw_ruler(&mut self, _range: Range) -> Result<(), CanvasError> {
        Ok(())
    }
}

/// Formats a ruler position, abbreviating thousands, millions and billions.
///
/// The value keeps every significant digit of `position`.
///
/// # Examples
///
/// ```
/// use annosketch::canvas::format_ruler_label;
///
/// assert_eq!(format_ruler_label(950), "950");
/// assert_eq!(format_ruler_label(1_500), "1.5K");
/// assert_eq!(format_ruler_label(12_000), "12K");
/// assert_eq!(format_ruler_label(2_250_000), "2.25M");
/// assert_eq!(format_ruler_label(1_000_000_000), "1G");
/// ```
pub fn format_ruler_label(position: u64) -> String {
    let (unit, suffix, digits): (u64, char, usize) = match position {
        1_000_000_000.. => (1_000_000_000, 'G', 9),
        1_000_000.. => (1_000_000, 'M', 6),
        1_000.. => (1_000, 'K', 3),
        _ => return position.to_string(),
    };

    let whole = position / unit;
    let fraction = position % unit;
    if fraction == 0 {
        return format!("{whole}{suffix}");
    }

    let fraction = format!("{fraction:0digits$}");
    format!("{whole}.{}{suffix}", fraction.trim_end_matches('0'))
}

/// Ruler tick spacing: the smallest 1, 2 or 5 times a power of ten that
/// yields at most `max_ticks` ticks over `length` bases.
pub fn tick_interval(length: u64, max_ticks: u64) -> u64 {
    let target = length.div_ceil(max_ticks.max(1)).max(1);
    let mut magnitude = 1u64;
    loop {
        for step in [1, 2, 5] {
            let interval = step * magnitude;
            if interval >= target {
                return interval;
            }
        }
        magnitude = match magnitude.checked_mul(10) {
            Some(next) => next,
            None => return target,
        };
    }
}
