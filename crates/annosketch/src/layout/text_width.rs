//! Text width measurement for caption-aware line breaking.
//!
//! Two calculators are provided:
//!
//! - [`ApproximateTextWidth`] - character count times a per-character factor.
//!   Deterministic and font independent.
//! - [`FontTextWidth`] - shapes the text with cosmic-text against the fonts
//!   installed on the system. The font database is loaded once per process.

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;
use serde::Deserialize;

/// Measures the rendered width of a caption.
pub trait TextWidthCalculator {
    /// Width of `text` at `font_size`, in device units.
    fn text_width(&self, text: &str, font_size: f32) -> f64;
}

/// Which [`TextWidthCalculator`] a layout should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextWidthKind {
    #[default]
    Approximate,
    Font,
}

impl TextWidthKind {
    pub fn calculator(self) -> Box<dyn TextWidthCalculator> {
        match self {
            Self::Approximate => Box::new(ApproximateTextWidth::default()),
            Self::Font => Box::new(FontTextWidth::default()),
        }
    }
}

/// Estimates text width from its character count.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateTextWidth {
    factor: f64,
}

impl ApproximateTextWidth {
    /// `factor` is the average character width relative to the font size.
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }
}

impl Default for ApproximateTextWidth {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl TextWidthCalculator for ApproximateTextWidth {
    fn text_width(&self, text: &str, font_size: f32) -> f64 {
        text.chars().count() as f64 * f64::from(font_size) * self.factor
    }
}

/// Measures text by shaping it with the system fonts.
#[derive(Debug, Clone)]
pub struct FontTextWidth {
    family: String,
}

impl FontTextWidth {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
        }
    }
}

impl Default for FontTextWidth {
    fn default() -> Self {
        Self::new("sans-serif")
    }
}

impl TextWidthCalculator for FontTextWidth {
    fn text_width(&self, text: &str, font_size: f32) -> f64 {
        if text.is_empty() {
            return 0.0;
        }

        let mut font_system = FONT_SYSTEM
            .get_or_init(|| {
                info!("Initializing FontSystem");
                Mutex::new(FontSystem::new())
            })
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Points to pixels at 96 DPI
        let font_size_px = font_size * 1.33;
        let metrics = Metrics::new(font_size_px, font_size_px * 1.15);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        buffer.set_size(None, None);

        let attrs = Attrs::new().family(Family::Name(&self.family));
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let width = buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|glyph| glyph.x + glyph.w))
            .reduce(f32::max);

        match width {
            Some(width) => f64::from(width),
            // No usable font on this system
            None => ApproximateTextWidth::default().text_width(text, font_size),
        }
    }
}

static FONT_SYSTEM: OnceLock<Mutex<FontSystem>> = OnceLock::new();

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_approximate_width_scales_with_length_and_size() {
        let calc = ApproximateTextWidth::default();
        assert_approx_eq!(f64, calc.text_width("", 10.0), 0.0);
        assert_approx_eq!(f64, calc.text_width("gene", 10.0), 24.0);
        assert_approx_eq!(f64, calc.text_width("gene", 20.0), 48.0);
    }

    #[test]
    fn test_approximate_width_counts_chars_not_bytes() {
        let calc = ApproximateTextWidth::new(1.0);
        assert_approx_eq!(f64, calc.text_width("αβγ", 1.0), 3.0);
    }

    #[test]
    fn test_font_width_of_empty_text() {
        assert_approx_eq!(f64, FontTextWidth::default().text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_kind_selects_calculator() {
        let calc = TextWidthKind::Approximate.calculator();
        assert_approx_eq!(f64, calc.text_width("ab", 10.0), 12.0);
    }
}
