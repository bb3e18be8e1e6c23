//! Application configuration.
//!
//! ```toml
//! [sketch]
//! width = 1000
//! line_breaker = "captions"
//! text_width = "font"
//!
//! [style.format]
//! bar_height = 12.0
//!
//! [style.feature.exon]
//! fill = "orange"
//! ```

use serde::Deserialize;

use annosketch_core::style::Style;

use crate::layout::{
    SketchBackend, line_breaker::LineBreakerKind, text_width::TextWidthKind,
};

/// Application configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Sketch configuration section
    #[serde(default)]
    pub sketch: SketchConfig,

    /// Style configuration section
    #[serde(default)]
    pub style: Style,
}

/// Sketch configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Image width in device units
    pub width: u32,

    pub line_breaker: LineBreakerKind,

    pub text_width: TextWidthKind,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            width: 800,
            line_breaker: LineBreakerKind::default(),
            text_width: TextWidthKind::default(),
        }
    }
}

impl SketchConfig {
    /// The layout backend these settings describe.
    pub fn backend(&self) -> SketchBackend {
        SketchBackend::new()
            .with_line_breaker(self.line_breaker)
            .with_text_width(self.text_width)
    }
}
