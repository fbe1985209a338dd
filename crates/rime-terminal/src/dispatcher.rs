//! Escape sequence interpreter
//!
//! Uses the vte crate to parse terminal output and lays the printable text
//! out as styled runs on a row/column grid. Only SGR sequences are honored;
//! everything else is dropped.

use crate::palette::{ansi_color, indexed_color, rgb_color};
use crate::params::ParamCursor;
use crate::FONT_HEIGHT_TO_WIDTH_RATIO;
use tracing::trace;
use unicode_width::UnicodeWidthChar;
use vte::{Params, Perform};

/// Column interval of the tab stops
pub const TAB_STOP: usize = 16;

/// Font metrics used to turn cells into pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub font_size: f64,
    pub line_height: f64,
}

impl CellMetrics {
    pub fn new(font_size: f64, line_height: f64) -> Self {
        Self {
            font_size,
            line_height,
        }
    }

    /// Estimated width of one monospace cell
    pub fn cell_width(&self) -> f64 {
        self.font_size / FONT_HEIGHT_TO_WIDTH_RATIO
    }

    /// Vertical distance between two rows
    pub fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }

    /// Horizontal nudge applied to wide glyphs
    pub fn wide_nudge(&self) -> f64 {
        self.font_size / 5.0
    }
}

/// Visual style shared by the characters of a run.
///
/// Bold is accepted by the interpreter but has no field here: it carries no
/// visual decoration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub fill: Option<String>,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl SpanStyle {
    /// Value for the SVG `text-decoration` attribute, if any
    pub fn text_decoration(&self) -> Option<&'static str> {
        match (self.underline, self.strikethrough) {
            (true, true) => Some("underline line-through"),
            (true, false) => Some("underline"),
            (false, true) => Some("line-through"),
            (false, false) => None,
        }
    }
}

/// A contiguous piece of text with one style
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: SpanStyle,
    /// Horizontal nudge in pixels, set on isolated wide glyphs
    pub dx: Option<f64>,
}

impl Run {
    fn empty(style: SpanStyle) -> Self {
        Self {
            text: String::new(),
            style,
            dx: None,
        }
    }
}

/// A background rectangle opened by an SGR background code
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundRect {
    pub fill: String,
    pub row: usize,
    pub col: usize,
    /// Number of cells covered, fixed once the rectangle is closed
    pub cells: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Result of interpreting a stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerminalGrid {
    /// Runs per line, in print order
    pub lines: Vec<Vec<Run>>,
    /// Closed background rectangles, in opening order
    pub backgrounds: Vec<BackgroundRect>,
}

impl TerminalGrid {
    /// Text of one line with styling dropped
    pub fn line_text(&self, row: usize) -> String {
        self.lines
            .get(row)
            .map(|runs| runs.iter().map(|r| r.text.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Grid state driven by the vte parser
#[derive(Debug)]
pub struct Dispatcher {
    metrics: CellMetrics,
    lines: Vec<Vec<Run>>,
    backgrounds: Vec<BackgroundRect>,
    row: usize,
    col: usize,
    style: SpanStyle,
    open_background: Option<BackgroundRect>,
    /// The last run holds a wide glyph and must not be extended
    sealed: bool,
}

impl Dispatcher {
    /// Create a dispatcher writing into `line_count` lines
    pub fn new(line_count: usize, metrics: CellMetrics) -> Self {
        Self {
            metrics,
            lines: vec![Vec::new(); line_count],
            backgrounds: Vec::new(),
            row: 0,
            col: 0,
            style: SpanStyle::default(),
            open_background: None,
            sealed: false,
        }
    }

    /// Current cursor as (row, column)
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Close any open background and hand back the grid
    pub fn finish(mut self) -> TerminalGrid {
        self.end_background();
        TerminalGrid {
            lines: self.lines,
            backgrounds: self.backgrounds,
        }
    }

    /// Line under the cursor, with the row clamped to the last line
    fn current_line(&mut self) -> Option<&mut Vec<Run>> {
        let last = self.lines.len().checked_sub(1)?;
        self.row = self.row.min(last);
        self.lines.get_mut(self.row)
    }

    /// Print a character at the cursor
    pub fn write_char(&mut self, c: char) {
        let width = c.width().unwrap_or(0);
        let style = self.style.clone();
        let nudge = self.metrics.wide_nudge();
        let sealed = self.sealed;

        let Some(line) = self.current_line() else {
            trace!(?c, "no line to print into");
            return;
        };

        if width > 1 {
            line.push(Run {
                text: c.to_string(),
                style,
                dx: Some(nudge),
            });
            self.sealed = true;
        } else {
            match line.last_mut() {
                Some(run) if !sealed => run.text.push(c),
                _ => {
                    let mut run = Run::empty(style);
                    run.text.push(c);
                    line.push(run);
                }
            }
            self.sealed = false;
        }

        self.col += width;
        if let Some(bg) = self.open_background.as_mut() {
            bg.cells += width;
        }
    }

    /// Move to the start of the next line
    pub fn newline(&mut self) {
        self.end_background();
        self.row += 1;
        self.col = 0;
        self.sealed = false;
    }

    /// Print spaces up to the next tab stop
    pub fn tab(&mut self) {
        while self.col % TAB_STOP != 0 {
            self.write_char(' ');
        }
    }

    /// Start a new run carrying the current style
    fn open_span(&mut self) {
        let style = self.style.clone();
        if let Some(line) = self.current_line() {
            line.push(Run::empty(style));
        }
        self.sealed = false;
    }

    fn reset(&mut self) {
        self.style = SpanStyle::default();
        self.end_background();
    }

    fn end_background(&mut self) {
        if let Some(mut bg) = self.open_background.take() {
            bg.width = bg.cells as f64 * self.metrics.cell_width();
            self.backgrounds.push(bg);
        }
    }

    fn begin_background(&mut self, fill: String) {
        self.end_background();
        let advance = self.metrics.line_advance();
        self.open_background = Some(BackgroundRect {
            fill,
            row: self.row,
            col: self.col,
            cells: 0,
            x: self.col as f64 * self.metrics.cell_width(),
            y: self.row as f64 * advance,
            width: 0.0,
            height: advance,
        });
    }

    /// Apply one SGR sequence
    pub fn select_graphic_rendition(&mut self, mut params: ParamCursor) {
        if params.is_empty() {
            self.reset();
            self.open_span();
            return;
        }

        let mut restyled = false;
        while let Some(code) = params.next_code() {
            match code {
                0 => {
                    self.reset();
                    restyled = true;
                }

                // Bold carries no visual decoration
                1 => restyled = true,
                3 => {
                    self.style.italic = true;
                    restyled = true;
                }
                4 => {
                    self.style.underline = true;
                    restyled = true;
                }
                9 => {
                    self.style.strikethrough = true;
                    restyled = true;
                }

                // Foreground colors
                30..=37 | 90..=97 => {
                    self.style.fill = ansi_color(code).map(str::to_string);
                    restyled = true;
                }
                38 => {
                    if let Some(fill) = extended_color(&mut params) {
                        self.style.fill = Some(fill);
                        restyled = true;
                    }
                }

                // Background colors
                40..=47 | 100..=107 => {
                    if let Some(fill) = ansi_color(code - 10) {
                        self.begin_background(fill.to_string());
                    }
                }
                48 => {
                    if let Some(fill) = extended_color(&mut params) {
                        self.begin_background(fill);
                    }
                }

                _ => trace!(code, "ignoring unsupported SGR code"),
            }
        }

        if restyled {
            self.open_span();
        }
    }
}

/// Parse the tail of a `38`/`48` sequence: `5;N` or `2;R;G;B`
fn extended_color(params: &mut ParamCursor) -> Option<String> {
    match params.next_code()? {
        5 => {
            let n = params.consume(1)?[0];
            let color = indexed_color(n);
            if color.is_none() {
                trace!(n, "palette index out of range");
            }
            color.map(str::to_string)
        }
        2 => {
            let rgb = params.consume(3)?;
            Some(rgb_color(rgb[0], rgb[1], rgb[2]))
        }
        selector => {
            trace!(selector, "ignoring unknown color selector");
            None
        }
    }
}

/// VTE Perform trait implementation for Dispatcher
impl Perform for Dispatcher {
    fn print(&mut self, c: char) {
        self.write_char(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            // Tab
            0x09 => self.tab(),

            // Line feed (newline)
            0x0A => self.newline(),

            _ => {}
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _c: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {}

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, c: char) {
        // SGR (Select Graphic Rendition)
        if c != 'm' || !intermediates.is_empty() || ignore {
            trace!(action = ?c, "ignoring non-SGR sequence");
            return;
        }
        self.select_graphic_rendition(ParamCursor::new(params));
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {}
}

/// Interpret `input` into `line_count` lines.
///
/// The input is fed line by line with a synthetic newline after each, so an
/// open background is always closed at the end of its line.
pub fn interpret(input: &str, line_count: usize, metrics: CellMetrics) -> TerminalGrid {
    let mut parser = vte::Parser::new();
    let mut dispatcher = Dispatcher::new(line_count, metrics);

    for line in input.split('\n') {
        for byte in line.bytes() {
            parser.advance(&mut dispatcher, byte);
        }
        dispatcher.execute(b'\n');
    }

    dispatcher.finish()
}
