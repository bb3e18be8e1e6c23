//! Drawing geometry.
//!
//! Layouts describe horizontal positions in width-independent coordinates
//! between `0.0` and `1.0`; a canvas maps them to device units. This module
//! holds the [`DrawingRange`] for such coordinates and a small [`Point`] type
//! used by canvases.

use std::cmp::Ordering;

/// Two coordinates closer than this are considered equal.
const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// A width-independent horizontal interval in `[0.0, 1.0]`.
///
/// `clip_start`/`clip_end` record whether the underlying genomic range was
/// cut off at the left or right border of the visible region.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawingRange {
    start: f64,
    end: f64,
    clip_start: bool,
    clip_end: bool,
}

impl DrawingRange {
    /// Creates an unclipped drawing range. `start` must not exceed `end`.
    pub fn new(start: f64, end: f64) -> Self {
        debug_assert!(start <= end, "drawing range start exceeds end");
        Self {
            start,
            end,
            clip_start: false,
            clip_end: false,
        }
    }

    /// Returns a copy with the given clipping flags.
    pub fn with_clipping(mut self, clip_start: bool, clip_end: bool) -> Self {
        self.clip_start = clip_start;
        self.clip_end = clip_end;
        self
    }

    pub fn start(self) -> f64 {
        self.start
    }

    pub fn end(self) -> f64 {
        self.end
    }

    pub fn clip_start(self) -> bool {
        self.clip_start
    }

    pub fn clip_end(self) -> bool {
        self.clip_end
    }

    /// Orders ranges by start, then by end, treating nearly equal
    /// coordinates as equal.
    pub fn compare(self, other: DrawingRange) -> Ordering {
        if approx_eq(self.start, other.start) && approx_eq(self.end, other.end) {
            return Ordering::Equal;
        }
        if self.start < other.start || (approx_eq(self.start, other.start) && self.end < other.end)
        {
            return Ordering::Less;
        }
        Ordering::Greater
    }

    pub fn overlaps(self, other: DrawingRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    pub fn contains(self, other: DrawingRange) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    pub fn length(self) -> f64 {
        self.end - self.start
    }
}

/// A point in device units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns a new point moved by `dx`/`dy`
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}
