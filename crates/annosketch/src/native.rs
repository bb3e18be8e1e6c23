//! libgenometools layout engine.
//!
//! Enabled with the `genometools` feature. The library must be installed
//! where the linker can find it.
//!
//! Diagrams, styles and canvases are created through libgenometools itself;
//! this module only owns the layout.

use std::{
    ffi::{c_int, c_uint, c_ulong},
    marker::{PhantomData, PhantomPinned},
    ptr::NonNull,
};

use log::{debug, trace};
use thiserror::Error;

use crate::layout::LayoutBackend;

macro_rules! opaque {
    ($($name:ident),* $(,)?) => {$(
        #[repr(C)]
        pub struct $name {
            _data: [u8; 0],
            _marker: PhantomData<(*mut u8, PhantomPinned)>,
        }
    )*};
}

opaque!(GtDiagram, GtStyle, GtCanvas, GtLayout);

#[link(name = "genometools")]
unsafe extern "C" {
    fn gt_layout_new(diagram: *mut GtDiagram, width: c_uint, style: *mut GtStyle) -> *mut GtLayout;
    fn gt_layout_get_height(layout: *const GtLayout) -> c_ulong;
    fn gt_layout_sketch(layout: *mut GtLayout, canvas: *mut GtCanvas) -> c_int;
    fn gt_layout_delete(layout: *mut GtLayout);
}

#[derive(Debug, Error)]
pub enum NativeError {
    #[error("gt_layout_new returned no layout")]
    Construct,

    #[error("gt_layout_sketch failed with status {status}")]
    Sketch { status: i32 },
}

/// Layout backend calling into libgenometools.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl LayoutBackend for NativeBackend {
    type Diagram = GtDiagram;
    type Style = GtStyle;
    type Canvas = GtCanvas;
    type Handle = NonNull<GtLayout>;
    type Error = NativeError;

    fn create(
        &self,
        diagram: &GtDiagram,
        width: u32,
        style: &GtStyle,
    ) -> Result<NonNull<GtLayout>, NativeError> {
        // The library takes mutable pointers but only reads the diagram and style.
        let diagram = std::ptr::from_ref(diagram).cast_mut();
        let style = std::ptr::from_ref(style).cast_mut();
        // SAFETY: both pointers come from live references.
        let raw = unsafe { gt_layout_new(diagram, width, style) };
        let layout = NonNull::new(raw).ok_or(NativeError::Construct)?;
        debug!(width; "Native layout created");
        Ok(layout)
    }

    fn height(&self, handle: &NonNull<GtLayout>) -> u64 {
        // SAFETY: the handle was returned by gt_layout_new and is not yet deleted.
        let height = unsafe { gt_layout_get_height(handle.as_ptr()) };
        u64::from(height)
    }

    fn sketch(&self, handle: &NonNull<GtLayout>, canvas: &mut GtCanvas) -> Result<(), NativeError> {
        // SAFETY: as in `height`; the canvas is borrowed mutably for the call.
        let status = unsafe { gt_layout_sketch(handle.as_ptr(), canvas) };
        if status != 0 {
            return Err(NativeError::Sketch { status });
        }
        Ok(())
    }

    fn destroy(&self, handle: NonNull<GtLayout>) {
        trace!("Deleting native layout");
        // SAFETY: `Layout` hands each handle to destroy exactly once.
        unsafe { gt_layout_delete(handle.as_ptr()) }
    }
}
