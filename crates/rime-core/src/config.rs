//! Render configuration

use crate::ConfigError;
use rime_svg::BoxSides;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Declarative description of one render.
///
/// `width` and `height` of 0 auto-size that axis to the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub background: String,
    /// CSS shorthand, 1, 2 or 4 values
    pub margin: Vec<f64>,
    /// CSS shorthand, 1, 2 or 4 values
    pub padding: Vec<f64>,
    /// Draw the three-dot window bar
    pub window: bool,
    pub width: f64,
    pub height: f64,

    /// Empty means detect
    pub language: String,
    pub theme: String,
    /// Hard-wrap column, 0 disables wrapping
    pub wrap: usize,

    pub border: Border,
    pub shadow: Shadow,
    pub font: Font,

    /// Multiplier applied to the font size for each row
    pub line_height: f64,
    /// Inclusive, 0-indexed slice of the input lines
    pub lines: Option<LineRange>,
    pub show_line_numbers: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shadow {
    pub blur: f64,
    pub x: f64,
    pub y: f64,
}

impl Shadow {
    pub fn is_visible(&self) -> bool {
        self.blur > 0.0 || self.x > 0.0 || self.y > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Border {
    pub radius: f64,
    pub width: f64,
    pub color: String,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            radius: 0.0,
            width: 0.0,
            color: "#515151".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub family: String,
    /// TTF file to embed; read by the caller, never by the renderer
    pub file: Option<PathBuf>,
    pub size: f64,
    pub ligatures: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "JetBrains Mono".to_string(),
            file: None,
            size: 14.0,
            ligatures: true,
        }
    }
}

/// Inclusive, 0-indexed line range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            background: "#171717".to_string(),
            margin: vec![0.0],
            padding: vec![20.0],
            window: false,
            width: 0.0,
            height: 0.0,
            language: String::new(),
            theme: "charm".to_string(),
            wrap: 0,
            border: Border::default(),
            shadow: Shadow::default(),
            font: Font::default(),
            line_height: 1.2,
            lines: None,
            show_line_numbers: false,
        }
    }
}

impl Config {
    /// Reject configurations no layout can be computed for
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.font.size > 0.0) {
            return Err(ConfigError::NonPositiveFontSize(self.font.size));
        }
        if !(self.line_height > 0.0) {
            return Err(ConfigError::NonPositiveLineHeight(self.line_height));
        }
        if let Some(LineRange { start, end }) = self.lines {
            if start > end {
                return Err(ConfigError::InvertedLineRange { start, end });
            }
        }
        Ok(())
    }

    pub fn expanded_padding(&self) -> BoxSides {
        BoxSides::expand(&self.padding)
    }

    pub fn expanded_margin(&self) -> BoxSides {
        BoxSides::expand(&self.margin)
    }

    pub fn is_auto_width(&self) -> bool {
        self.width == 0.0
    }

    pub fn is_auto_height(&self) -> bool {
        self.height == 0.0
    }

    pub fn with_padding(mut self, values: &[f64]) -> Self {
        self.padding = values.to_vec();
        self
    }

    pub fn with_margin(mut self, values: &[f64]) -> Self {
        self.margin = values.to_vec();
        self
    }

    pub fn with_font(mut self, family: &str, size: f64) -> Self {
        self.font.family = family.to_string();
        self.font.size = size;
        self
    }

    pub fn with_theme(mut self, theme: &str) -> Self {
        self.theme = theme.to_string();
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_background(mut self, color: &str) -> Self {
        self.background = color.to_string();
        self
    }

    pub fn with_window(mut self, enabled: bool) -> Self {
        self.window = enabled;
        self
    }

    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.show_line_numbers = enabled;
        self
    }

    pub fn with_shadow(mut self, blur: f64, x: f64, y: f64) -> Self {
        self.shadow = Shadow { blur, x, y };
        self
    }

    pub fn with_border(mut self, width: f64, radius: f64, color: &str) -> Self {
        self.border = Border {
            radius,
            width,
            color: color.to_string(),
        };
        self
    }

    pub fn with_dimensions(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_wrap(mut self, column: usize) -> Self {
        self.wrap = column;
        self
    }

    /// Capture lines `start..=end`, counted from 1.
    ///
    /// Ignored unless `0 < start <= end`.
    pub fn with_lines(mut self, start: usize, end: usize) -> Self {
        if start > 0 && start <= end {
            self.lines = Some(LineRange {
                start: start - 1,
                end: end - 1,
            });
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.is_auto_width());
        assert!(config.is_auto_height());
        assert_eq!(config.expanded_padding(), BoxSides::expand(&[20.0]));
    }

    #[test]
    fn test_validate_rejects_font_size() {
        let config = Config::default().with_font("mono", 0.0);
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveFontSize(0.0)));

        let config = Config::default().with_font("mono", f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_line_height() {
        let config = Config::default().with_line_height(-1.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveLineHeight(-1.0))
        );
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let config = Config {
            lines: Some(LineRange { start: 4, end: 2 }),
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedLineRange { start: 4, end: 2 })
        );
    }

    #[test]
    fn test_with_lines_is_one_indexed() {
        let config = Config::default().with_lines(3, 5);
        assert_eq!(config.lines, Some(LineRange { start: 2, end: 4 }));

        let config = Config::default().with_lines(0, 5);
        assert_eq!(config.lines, None);

        let config = Config::default().with_lines(5, 3);
        assert_eq!(config.lines, None);
    }

    #[test]
    fn test_expansion_does_not_touch_caller_values() {
        let config = Config::default().with_padding(&[1.0, 2.0]);
        let padding = config.expanded_padding();
        assert_eq!(padding.left, 2.0);
        assert_eq!(config.padding, vec![1.0, 2.0]);
    }
}
