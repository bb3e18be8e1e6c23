//! Layout ownership.
//!
//! A layout engine exposes four entry points: construct a layout from a
//! diagram, a width and a style; query its height; sketch it onto a canvas;
//! and destroy it. [`LayoutBackend`] names those four calls, and [`Layout`]
//! owns the resulting handle so that destroy runs exactly once, on every
//! exit path, without the caller having to remember it.
//!
//! # Backends
//!
//! - [`SketchBackend`] - the built-in track layout engine (default)
//! - `native::NativeBackend` - libgenometools, behind the `genometools`
//!   feature
//!
//! # Example
//!
//! ```
//! use annosketch::{canvas::svg::SvgCanvas, diagram::Diagram, layout::Layout};
//! use annosketch_core::{feature::{Feature, FeatureIndex}, range::Range, style::Style};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut index = FeatureIndex::new();
//! index.add(Feature::new("chr1", "gene", Range::new(100, 900)?));
//!
//! let style = Style::default();
//! let diagram = Diagram::new(&index, "chr1", Range::new(1, 1000)?, &style)?;
//!
//! let layout = Layout::new(&diagram, 800, &style)?;
//! let mut canvas = SvgCanvas::new(&style);
//! layout.sketch(&mut canvas)?;
//! assert_eq!(canvas.height(), layout.height());
//! # Ok(())
//! # }
//! ```

pub mod line_breaker;
pub mod text_width;
pub mod track;

use std::error::Error as StdError;

use log::{debug, trace};

use annosketch_core::style::Style;

use crate::{canvas::Canvas, diagram::Diagram, error::LayoutError};

use line_breaker::{BasesLineBreaker, CaptionsLineBreaker, LineBreaker, LineBreakerKind};
use text_width::TextWidthKind;
use track::TrackLayout;

/// The four entry points of a layout engine.
///
/// Arguments keep the engine's fixed order: diagram, width, style.
pub trait LayoutBackend {
    type Diagram: ?Sized;
    type Style: ?Sized;
    type Canvas: ?Sized;
    type Handle;
    type Error: StdError;

    /// Lays out `diagram` for an image `width` units wide.
    ///
    /// # Errors
    ///
    /// Nothing is allocated when this fails.
    fn create(
        &self,
        diagram: &Self::Diagram,
        width: u32,
        style: &Self::Style,
    ) -> Result<Self::Handle, Self::Error>;

    /// Height of the image the layout needs.
    fn height(&self, handle: &Self::Handle) -> u64;

    /// Draws the layout onto `canvas`.
    ///
    /// # Errors
    ///
    /// Returns whatever the engine or canvas reports.
    fn sketch(&self, handle: &Self::Handle, canvas: &mut Self::Canvas) -> Result<(), Self::Error>;

    /// Frees the layout.
    fn destroy(&self, handle: Self::Handle);
}

/// A laid-out diagram, owning its engine handle.
///
/// The handle is destroyed when the `Layout` is dropped, or earlier with
/// [`Layout::release`]. A released layout is moved, so it cannot be used
/// afterwards:
///
/// ```compile_fail
/// # use annosketch::{diagram::Diagram, layout::Layout};
/// # use annosketch_core::{feature::{Feature, FeatureIndex}, range::Range, style::Style};
/// # let mut index = FeatureIndex::new();
/// # index.add(Feature::new("c", "gene", Range::new(1, 10).unwrap()));
/// # let style = Style::default();
/// # let diagram = Diagram::new(&index, "c", Range::new(1, 10).unwrap(), &style).unwrap();
/// let layout = Layout::new(&diagram, 800, &style).unwrap();
/// layout.release();
/// layout.height();
/// ```
pub struct Layout<B: LayoutBackend = SketchBackend> {
    backend: B,
    handle: Option<B::Handle>,
}

impl Layout<SketchBackend> {
    /// Lays out `diagram` with the built-in engine and default settings.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ZeroWidth`] if `width` is zero.
    pub fn new(diagram: &Diagram, width: u32, style: &Style) -> Result<Self, LayoutError> {
        Self::with_backend(SketchBackend::default(), diagram, width, style)
    }
}

impl<B: LayoutBackend> Layout<B> {
    /// Lays out `diagram` with `backend`.
    ///
    /// # Errors
    ///
    /// Returns the backend's construction error unchanged.
    pub fn with_backend(
        backend: B,
        diagram: &B::Diagram,
        width: u32,
        style: &B::Style,
    ) -> Result<Self, B::Error> {
        let handle = backend.create(diagram, width, style)?;
        trace!(width; "Layout created");
        Ok(Self {
            backend,
            handle: Some(handle),
        })
    }

    /// Height of the image the layout needs. Repeated calls return the
    /// same value.
    pub fn height(&self) -> u64 {
        self.backend.height(self.handle())
    }

    /// Draws the layout onto `canvas`.
    ///
    /// # Errors
    ///
    /// Returns the backend's sketch error unchanged.
    pub fn sketch(&self, canvas: &mut B::Canvas) -> Result<(), B::Error> {
        self.backend.sketch(self.handle(), canvas)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Destroys the layout now instead of at the end of the scope.
    pub fn release(self) {
        drop(self);
    }

    fn handle(&self) -> &B::Handle {
        // Only `drop` takes the handle out
        self.handle
            .as_ref()
            .expect("layout handle is present until drop")
    }
}

impl<B: LayoutBackend> Drop for Layout<B> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.backend.destroy(handle);
            trace!("Layout released");
        }
    }
}

/// The built-in track layout engine.
///
/// # Examples
///
/// ```
/// use annosketch::layout::{SketchBackend, line_breaker::LineBreakerKind};
///
/// let backend = SketchBackend::default().with_line_breaker(LineBreakerKind::Captions);
/// assert_eq!(backend.line_breaker(), LineBreakerKind::Captions);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SketchBackend {
    line_breaker: LineBreakerKind,
    text_width: TextWidthKind,
}

impl SketchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_breaker(mut self, line_breaker: LineBreakerKind) -> Self {
        self.line_breaker = line_breaker;
        self
    }

    pub fn with_text_width(mut self, text_width: TextWidthKind) -> Self {
        self.text_width = text_width;
        self
    }

    pub fn line_breaker(&self) -> LineBreakerKind {
        self.line_breaker
    }

    pub fn text_width(&self) -> TextWidthKind {
        self.text_width
    }
}

impl LayoutBackend for SketchBackend {
    type Diagram = Diagram;
    type Style = Style;
    type Canvas = dyn Canvas;
    type Handle = TrackLayout;
    type Error = LayoutError;

    fn create(&self, diagram: &Diagram, width: u32, style: &Style) -> Result<TrackLayout, LayoutError> {
        debug!(
            line_breaker:? = self.line_breaker,
            text_width:? = self.text_width;
            "Creating track layout",
        );
        let breaker: Box<dyn LineBreaker> = match self.line_breaker {
            LineBreakerKind::Bases => Box::new(BasesLineBreaker),
            LineBreakerKind::Captions => Box::new(CaptionsLineBreaker::new(
                diagram.range(),
                width,
                style.format(),
                self.text_width.calculator(),
            )),
        };
        TrackLayout::new(diagram, width, style, breaker.as_ref())
    }

    fn height(&self, handle: &TrackLayout) -> u64 {
        handle.height()
    }

    fn sketch(&self, handle: &TrackLayout, canvas: &mut (dyn Canvas + 'static)) -> Result<(), LayoutError> {
        handle.sketch(canvas)
    }

    fn destroy(&self, handle: TrackLayout) {
        trace!(tracks = handle.tracks().len(); "Dropping track layout");
        drop(handle);
    }
}
