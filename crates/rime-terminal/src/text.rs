//! Plain-text helpers for terminal output
//!
//! Stripping, measuring, slicing and wrapping text that may carry escape
//! sequences.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use vte::{Params, Perform};

/// Collects printable characters, tabs and newlines
#[derive(Default)]
struct Stripper {
    out: String,
}

impl Perform for Stripper {
    fn print(&mut self, c: char) {
        self.out.push(c);
    }

    fn execute(&mut self, byte: u8) {
        if byte == b'\n' || byte == b'\t' {
            self.out.push(char::from(byte));
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _c: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {}

    fn csi_dispatch(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _c: char) {}

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {}
}

/// Remove every escape sequence from `input`, keeping tabs and newlines
pub fn strip_ansi(input: &str) -> String {
    let mut parser = vte::Parser::new();
    let mut stripper = Stripper::default();
    for byte in input.bytes() {
        parser.advance(&mut stripper, byte);
    }
    stripper.out
}

/// Whether `input` contains any escape sequence
pub fn is_ansi(input: &str) -> bool {
    strip_ansi(input) != input
}

/// Display width of the widest line, escape sequences removed and tabs
/// counted as `tab_width` cells
pub fn longest_line(input: &str, tab_width: usize) -> usize {
    let tab = " ".repeat(tab_width);
    strip_ansi(input)
        .replace('\t', &tab)
        .split('\n')
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0)
}

/// Keep lines `start..=end` (0-indexed).
///
/// An `end` past the last line clamps to it; a `start` past `end` yields an
/// empty string.
pub fn cut_lines(input: &str, start: usize, end: usize) -> String {
    let lines: Vec<&str> = input.split('\n').collect();
    let end = end.min(lines.len() - 1);
    if start > end {
        return String::new();
    }
    lines[start..=end].join("\n")
}

/// Hard-wrap every line at `width` cells.
///
/// Escape sequences are copied through and take no space. A background
/// open at a break is reopened on the continuation line, so a highlighted
/// run keeps its color across rows. A `width` of 0 leaves the input
/// untouched.
pub fn wrap(input: &str, width: usize) -> String {
    if width == 0 {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    for (i, line) in input.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        wrap_line(line, width, &mut out);
    }
    out
}

fn wrap_line(line: &str, width: usize, out: &mut String) {
    let mut col = 0;
    let mut background: Option<String> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            out.push(c);
            if let Some(params) = copy_escape(&mut chars, out) {
                match background_change(&params) {
                    BackgroundChange::Keep => {}
                    BackgroundChange::Close => background = None,
                    BackgroundChange::Open(codes) => background = Some(codes),
                }
            }
            continue;
        }

        let w = c.width().unwrap_or(0);
        if col > 0 && col + w > width {
            out.push('\n');
            if let Some(codes) = &background {
                out.push_str("\x1b[");
                out.push_str(codes);
                out.push('m');
            }
            col = 0;
        }
        out.push(c);
        col += w;
    }
}

/// Effect of one SGR sequence on the line's background
#[derive(Debug, PartialEq)]
enum BackgroundChange {
    Keep,
    Close,
    /// Parameters that reopen the background, e.g. `41` or `48;5;196`
    Open(String),
}

/// Read SGR parameters the way the dispatcher applies them, keeping only
/// what happens to the background
fn background_change(params: &str) -> BackgroundChange {
    fn code(s: &str) -> u16 {
        if s.is_empty() {
            0
        } else {
            s.parse().unwrap_or(u16::MAX)
        }
    }

    let codes: Vec<&str> = params.split([';', ':']).collect();
    let mut change = BackgroundChange::Keep;
    let mut i = 0;
    while i < codes.len() {
        match code(codes[i]) {
            0 => change = BackgroundChange::Close,
            n @ (40..=47 | 100..=107) => change = BackgroundChange::Open(n.to_string()),
            n @ (38 | 48) => {
                let start = i;
                let Some(selector) = codes.get(i + 1).map(|s| code(s)) else {
                    break;
                };
                i += 1;
                let extra = match selector {
                    5 => 1,
                    2 => 3,
                    _ => 0,
                };
                if extra > 0 && i + extra < codes.len() {
                    let in_palette = selector != 5 || code(codes[i + 1]) <= 255;
                    if n == 48 && in_palette {
                        change = BackgroundChange::Open(codes[start..=i + extra].join(";"));
                    }
                    i += extra;
                }
            }
            _ => {}
        }
        i += 1;
    }
    change
}

/// Copy the remainder of an escape sequence whose `ESC` was already written.
///
/// Returns the parameters of an SGR sequence.
fn copy_escape<I>(chars: &mut std::iter::Peekable<I>, out: &mut String) -> Option<String>
where
    I: Iterator<Item = char>,
{
    match chars.next() {
        // CSI runs until a final byte in 0x40..=0x7E
        Some('[') => {
            out.push('[');
            let mut params = String::new();
            for c in chars.by_ref() {
                out.push(c);
                if ('\x40'..='\x7e').contains(&c) {
                    return (c == 'm').then_some(params);
                }
                params.push(c);
            }
            None
        }
        // OSC runs until BEL or ST
        Some(']') => {
            out.push(']');
            while let Some(c) = chars.next() {
                out.push(c);
                if c == '\x07' {
                    break;
                }
                if c == '\x1b' && chars.peek() == Some(&'\\') {
                    if let Some(st) = chars.next() {
                        out.push(st);
                    }
                    break;
                }
            }
            None
        }
        Some(c) => {
            out.push(c);
            None
        }
        None => None,
    }
}
