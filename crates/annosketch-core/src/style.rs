//! Visual style for sketched diagrams.
//!
//! A [`Style`] has two parts:
//!
//! - [`FormatStyle`] - global spacing, font size and caption settings used by
//!   both the layout engine (to compute heights) and canvases (to draw).
//! - [`FeatureStyle`] - per feature type colors and shapes, looked up with
//!   [`Style::feature_style`]. Unknown types fall back to a default style.
//!
//! Styles are loaded from TOML. Colors are kept as CSS strings and parsed on
//! access, so an invalid color is reported when it is first used or by
//! [`Style::validate`].
//!
//! # Example
//!
//! ```
//! use annosketch_core::style::{FeatureShape, Style};
//!
//! let style = Style::from_toml(r#"
//!     [format]
//!     bar_height = 20.0
//!
//!     [feature.exon]
//!     fill = "gold"
//!     shape = "arrow"
//! "#).unwrap();
//!
//! assert_eq!(style.format().bar_height(), 20.0);
//! assert_eq!(style.feature_style("exon").shape(), FeatureShape::Arrow);
//! // Types without an entry use the fallback style
//! assert_eq!(style.feature_style("snoRNA").shape(), FeatureShape::Box);
//! ```

use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::color::Color;

/// Space between a block caption and its bar.
const BLOCK_CAPTION_SPACE: f32 = 2.0;

/// Space between a track caption and the first line of the track.
const TRACK_CAPTION_SPACE: f32 = 5.0;

static DEFAULT_FEATURE_STYLE: OnceLock<FeatureStyle> = OnceLock::new();

/// Style loading and validation errors.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Failed to parse style: {0}")]
    Parse(String),

    #[error("Invalid color for `{key}`: {message}")]
    InvalidColor { key: String, message: String },
}

/// Shape used to draw a feature element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureShape {
    /// Filled rectangle
    #[default]
    Box,
    /// Horizontal line through the middle of the bar
    Line,
    /// Inverted V joining both ends, typical for introns
    Caret,
    /// Rectangle with a pointed end in strand direction
    Arrow,
}

/// Global layout and drawing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatStyle {
    margins: f32,
    bar_height: f32,
    bar_vspace: f32,
    track_vspace: f32,
    ruler_space: f32,
    font_size: f32,
    show_track_captions: bool,
    show_block_captions: bool,
    max_num_lines: Option<usize>,
    split_lines: bool,
    background_color: String,
    track_title_color: String,
    ruler_color: String,
}

impl Default for FormatStyle {
    fn default() -> Self {
        Self {
            margins: 30.0,
            bar_height: 16.0,
            bar_vspace: 10.0,
            track_vspace: 15.0,
            ruler_space: 25.0,
            font_size: 10.0,
            show_track_captions: true,
            show_block_captions: true,
            max_num_lines: None,
            split_lines: true,
            background_color: String::from("white"),
            track_title_color: String::from("darkblue"),
            ruler_color: String::from("black"),
        }
    }
}

impl FormatStyle {
    /// Horizontal and vertical margin around the drawing, in device units.
    pub fn margins(&self) -> f32 {
        self.margins
    }

    pub fn bar_height(&self) -> f32 {
        self.bar_height
    }

    pub fn bar_vspace(&self) -> f32 {
        self.bar_vspace
    }

    pub fn track_vspace(&self) -> f32 {
        self.track_vspace
    }

    pub fn ruler_space(&self) -> f32 {
        self.ruler_space
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn show_track_captions(&self) -> bool {
        self.show_track_captions
    }

    pub fn show_block_captions(&self) -> bool {
        self.show_block_captions
    }

    /// Maximum number of lines per track; `None` means unlimited.
    pub fn max_num_lines(&self) -> Option<usize> {
        self.max_num_lines
    }

    /// When `false`, every block of a track is drawn into a single line.
    pub fn split_lines(&self) -> bool {
        self.split_lines
    }

    pub fn background_color(&self) -> Result<Color, StyleError> {
        parse_color("format.background_color", &self.background_color)
    }

    pub fn track_title_color(&self) -> Result<Color, StyleError> {
        parse_color("format.track_title_color", &self.track_title_color)
    }

    pub fn ruler_color(&self) -> Result<Color, StyleError> {
        parse_color("format.ruler_color", &self.ruler_color)
    }

    /// Height taken by a block caption, zero when block captions are hidden.
    pub fn block_caption_height(&self) -> f32 {
        if self.show_block_captions {
            self.font_size + BLOCK_CAPTION_SPACE
        } else {
            0.0
        }
    }

    /// Height taken by a track caption, zero when track captions are hidden.
    pub fn track_caption_height(&self) -> f32 {
        if self.show_track_captions {
            self.font_size + TRACK_CAPTION_SPACE
        } else {
            0.0
        }
    }

    /// Height of one line of blocks, including its bottom spacing.
    pub fn line_height(&self) -> f32 {
        self.block_caption_height() + self.bar_height + self.bar_vspace
    }

    pub fn set_max_num_lines(&mut self, max_num_lines: Option<usize>) {
        self.max_num_lines = max_num_lines;
    }

    pub fn set_split_lines(&mut self, split_lines: bool) {
        self.split_lines = split_lines;
    }

    pub fn set_show_block_captions(&mut self, show: bool) {
        self.show_block_captions = show;
    }

    pub fn set_show_track_captions(&mut self, show: bool) {
        self.show_track_captions = show;
    }
}

/// Colors and shape for one feature type.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeatureStyle {
    fill: String,
    stroke: String,
    stroke_width: f32,
    shape: FeatureShape,
}

impl Default for FeatureStyle {
    fn default() -> Self {
        Self {
            fill: String::from("#dddddd"),
            stroke: String::from("black"),
            stroke_width: 1.0,
            shape: FeatureShape::Box,
        }
    }
}

impl FeatureStyle {
    /// Creates a feature style with the given fill color and shape.
    pub fn new(fill: &str, shape: FeatureShape) -> Self {
        Self {
            fill: fill.to_string(),
            shape,
            ..Self::default()
        }
    }

    pub fn fill(&self) -> Result<Color, StyleError> {
        parse_color("fill", &self.fill)
    }

    pub fn stroke(&self) -> Result<Color, StyleError> {
        parse_color("stroke", &self.stroke)
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn shape(&self) -> FeatureShape {
        self.shape
    }
}

/// The complete style: format settings plus per-type feature styles.
///
/// A `[feature]` table in a style file replaces the built-in feature
/// styles as a whole.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Style {
    format: FormatStyle,
    feature: IndexMap<String, FeatureStyle>,
}

impl Default for Style {
    fn default() -> Self {
        let mut feature = IndexMap::new();
        feature.insert(
            String::from("gene"),
            FeatureStyle::new("#b0c4de", FeatureShape::Arrow),
        );
        feature.insert(
            String::from("mRNA"),
            FeatureStyle::new("#dddddd", FeatureShape::Line),
        );
        feature.insert(
            String::from("exon"),
            FeatureStyle::new("#ffd700", FeatureShape::Box),
        );
        feature.insert(
            String::from("CDS"),
            FeatureStyle::new("#90ee90", FeatureShape::Box),
        );
        feature.insert(
            String::from("intron"),
            FeatureStyle::new("#dddddd", FeatureShape::Caret),
        );
        feature.insert(
            String::from("repeat_region"),
            FeatureStyle::new("#ffb6c1", FeatureShape::Box),
        );
        Self {
            format: FormatStyle::default(),
            feature,
        }
    }
}

impl Style {
    /// Parses a style from TOML text. Sections that are left out keep
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Parse`] if the TOML is malformed or contains
    /// values of the wrong type.
    pub fn from_toml(source: &str) -> Result<Self, StyleError> {
        toml::from_str(source).map_err(|err| StyleError::Parse(err.to_string()))
    }

    pub fn format(&self) -> &FormatStyle {
        &self.format
    }

    pub fn format_mut(&mut self) -> &mut FormatStyle {
        &mut self.format
    }

    /// Returns the style for `kind`, or the fallback style if none is
    /// configured.
    pub fn feature_style(&self, kind: &str) -> &FeatureStyle {
        self.feature
            .get(kind)
            .unwrap_or_else(|| DEFAULT_FEATURE_STYLE.get_or_init(FeatureStyle::default))
    }

    /// Adds or replaces the style of a feature type.
    pub fn set_feature_style(&mut self, kind: impl Into<String>, style: FeatureStyle) {
        self.feature.insert(kind.into(), style);
    }

    /// Checks that every color in the style parses.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::InvalidColor`] naming the first offending key.
    pub fn validate(&self) -> Result<(), StyleError> {
        self.format.background_color()?;
        self.format.track_title_color()?;
        self.format.ruler_color()?;
        for (kind, style) in &self.feature {
            parse_color(&format!("feature.{kind}.fill"), &style.fill)?;
            parse_color(&format!("feature.{kind}.stroke"), &style.stroke)?;
        }
        Ok(())
    }
}

fn parse_color(key: &str, value: &str) -> Result<Color, StyleError> {
    Color::new(value).map_err(|message| StyleError::InvalidColor {
        key: key.to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_default_style_validates() {
        assert!(Style::default().validate().is_ok());
    }

    #[test]
    fn test_from_toml_keeps_unset_defaults() {
        let style = Style::from_toml("[format]\nfont_size = 12.0\n").unwrap();
        assert_approx_eq!(f32, style.format().font_size(), 12.0);
        assert_approx_eq!(f32, style.format().margins(), 30.0);
        assert_eq!(style.feature_style("exon").shape(), FeatureShape::Box);
    }

    #[test]
    fn test_from_toml_feature_table_replaces_builtins() {
        let style = Style::from_toml("[feature.exon]\nfill = \"red\"\n").unwrap();
        assert_eq!(style.feature_style("exon").fill().unwrap().to_string(), "red");
        // `gene` was a built-in entry and is no longer configured
        assert_eq!(style.feature_style("gene").shape(), FeatureShape::Box);
    }

    #[test]
    fn test_from_toml_rejects_wrong_types() {
        let err = Style::from_toml("[format]\nbar_height = \"tall\"\n").unwrap_err();
        assert!(matches!(err, StyleError::Parse(_)));
    }

    #[test]
    fn test_from_toml_rejects_unknown_shape() {
        assert!(Style::from_toml("[feature.exon]\nshape = \"hexagon\"\n").is_err());
    }

    #[test]
    fn test_validate_reports_bad_color_key() {
        let style = Style::from_toml("[feature.CDS]\nstroke = \"nope\"\n").unwrap();
        match style.validate() {
            Err(StyleError::InvalidColor { key, .. }) => assert_eq!(key, "feature.CDS.stroke"),
            other => panic!("Expected InvalidColor, got {other:?}"),
        }
    }

    #[test]
    fn test_line_height_accounts_for_captions() {
        let mut style = Style::default();
        let with_captions = style.format().line_height();
        style.format_mut().set_show_block_captions(false);
        let without_captions = style.format().line_height();

        assert_approx_eq!(f32, with_captions - without_captions, 12.0);
        assert_approx_eq!(f32, without_captions, 26.0);
    }

    #[test]
    fn test_track_caption_height_hidden() {
        let mut style = Style::default();
        assert_approx_eq!(f32, style.format().track_caption_height(), 15.0);
        style.format_mut().set_show_track_captions(false);
        assert_approx_eq!(f32, style.format().track_caption_height(), 0.0);
    }
}
