//! Geometry primitives
//!
//! Box-model expansion and the fixed-point attribute formats.

/// Per-side sizes of a padding or margin box
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxSides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl BoxSides {
    /// Expand CSS shorthand.
    ///
    /// One value applies to every side, two values are (vertical,
    /// horizontal), four values are (top, right, bottom, left). Any other
    /// count yields an all-zero box.
    pub fn expand(values: &[f64]) -> Self {
        match *values {
            [all] => Self {
                top: all,
                right: all,
                bottom: all,
                left: all,
            },
            [vertical, horizontal] => Self {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            },
            [top, right, bottom, left] => Self {
                top,
                right,
                bottom,
                left,
            },
            _ => Self::default(),
        }
    }

    /// Left plus right
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Top plus bottom
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Two-decimal pixel attribute, e.g. `12.00px`
pub fn px(value: f64) -> String {
    format!("{value:.2}px")
}

/// Two-decimal unitless attribute, e.g. `12.00`
pub fn num(value: f64) -> String {
    format!("{value:.2}")
}

/// Parse the integer prefix of a dimension such as `"120px"`.
///
/// Returns 0 when no digits lead the string.
pub fn parse_dimension(dimension: &str) -> i64 {
    let s = dimension.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().unwrap_or(0);
    if negative {
        -value
    } else {
        value
    }
}
