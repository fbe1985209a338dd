//! Terminal output interpretation for Rime
//!
//! Turns text carrying ANSI SGR sequences into styled runs on a row/column
//! grid, plus the background rectangles those sequences open.

pub mod dispatcher;
pub mod palette;
pub mod params;
pub mod text;

pub use dispatcher::{
    interpret, BackgroundRect, CellMetrics, Dispatcher, Run, SpanStyle, TerminalGrid, TAB_STOP,
};
pub use params::ParamCursor;
pub use text::{cut_lines, is_ansi, longest_line, strip_ansi, wrap};

/// Height-to-width ratio used to estimate monospace glyph width
pub const FONT_HEIGHT_TO_WIDTH_RATIO: f64 = 1.68;
