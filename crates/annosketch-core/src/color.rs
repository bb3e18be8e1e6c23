//! Colors from style files.
//!
//! Style entries such as `fill = "steelblue"` or
//! `background_color = "#ffffff80"` hold CSS color strings. [`Color`] is the
//! parsed form the SVG canvas paints with, split into a paint value and a
//! separate opacity.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// A parsed CSS color.
///
/// # Examples
///
/// ```
/// use annosketch_core::color::Color;
///
/// let exon: Color = "#7fbfff".parse().unwrap();
/// assert_eq!(exon.alpha(), 1.0);
///
/// let shaded = Color::new("rgba(0, 0, 255, 0.5)").unwrap();
/// assert_eq!(shaded.alpha(), 0.5);
/// ```
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color(DynamicColor);

impl Color {
    /// Parses any CSS color: names, hex and functional notations.
    ///
    /// The error message quotes `value` so style errors can point at it.
    pub fn new(value: &str) -> Result<Self, String> {
        value.parse()
    }

    /// Opacity in `[0, 1]`, written as `fill-opacity` or `stroke-opacity`.
    pub fn alpha(&self) -> f32 {
        self.0.components[3]
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DynamicColor::from_str(value)
            .map(Self)
            .map_err(|err| format!("invalid color `{value}`: {err}"))
    }
}

impl Eq for Color {}

// Hashed by the CSS text so equal colors hash alike.
impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("black is a CSS color name")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("steelblue").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_new_error_names_input() {
        let err = Color::new("mauvish").unwrap_err();
        assert!(err.contains("`mauvish`"));
    }

    #[test]
    fn test_color_default() {
        assert_eq!(Color::default().to_string(), "black");
    }

    #[test]
    fn test_color_alpha_from_hex() {
        let color = Color::new("#ffffff40").unwrap();
        assert!((color.alpha() - 0.25).abs() < 0.01);
        assert_eq!(Color::new("white").unwrap().alpha(), 1.0);
    }

    #[test]
    fn test_color_eq_hash() {
        let red = Color::new("red").unwrap();
        let blue = Color::new("blue").unwrap();

        assert_eq!(red, Color::new("red").unwrap());
        assert_ne!(red, blue);

        let mut set = HashSet::new();
        set.insert(red);
        assert!(set.contains(&Color::new("red").unwrap()));
        assert!(!set.contains(&blue));
    }
}
