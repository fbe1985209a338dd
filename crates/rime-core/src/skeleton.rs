//! Token rendering
//!
//! Produces the unstyled-geometry SVG skeleton the layout engine works on:
//! one background `<rect>`, one `<g>` text layer with a `<text>` per source
//! line, and a declared size measured with the default font metrics.

use crate::config::Font;
use crate::style::Theme;
use crate::tokenizer::Token;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rime_svg::{group, set_font, Element};

/// Font size the skeleton is measured with
pub const DEFAULT_FONT_SIZE: f64 = 14.0;

/// Line height the skeleton is measured with
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

const CHAR_WIDTH: usize = 8;
const LINE_ADVANCE: f64 = 16.8;
const FIRST_BASELINE: f64 = 12.0;
const VERTICAL_SLACK: f64 = 10.0;
const TAB: &str = "    ";

/// A font file to embed into the document
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    pub family: String,
    pub data: Vec<u8>,
}

impl FontFace {
    pub fn new(family: &str, data: Vec<u8>) -> Self {
        Self {
            family: family.to_string(),
            data,
        }
    }

    fn to_style(&self) -> Element {
        let mut style = Element::new("style");
        style.set_text(format!(
            "@font-face {{ font-family: '{}'; src: url(data:font/ttf;base64,{}) format('truetype'); }}",
            self.family,
            STANDARD.encode(&self.data)
        ));
        style
    }
}

/// Split a token stream into lines.
///
/// A newline closes the current line, even an empty one; trailing text
/// without a newline forms a last line.
pub fn split_lines(tokens: &[Token]) -> Vec<Vec<Token>> {
    let mut lines = Vec::new();
    let mut line: Vec<Token> = Vec::new();
    let mut open = false;

    for token in tokens {
        for piece in token.text.split_inclusive('\n') {
            let (text, ends_line) = match piece.strip_suffix('\n') {
                Some(text) => (text, true),
                None => (piece, false),
            };
            if !text.is_empty() {
                line.push(Token::new(text, token.class.clone()));
                open = true;
            }
            if ends_line {
                lines.push(std::mem::take(&mut line));
                open = false;
            }
        }
    }

    if open {
        lines.push(line);
    }
    lines
}

fn line_width(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .map(|t| t.text.replace('\t', TAB).chars().count())
        .sum()
}

/// Declared skeleton width for lines of the given character widths
pub fn skeleton_width(longest: usize) -> usize {
    CHAR_WIDTH * longest
}

/// Declared skeleton height for `line_count` lines
pub fn skeleton_height(line_count: usize) -> i64 {
    (VERTICAL_SLACK + LINE_ADVANCE * (line_count as f64 + 1.0)) as i64
}

/// Render `tokens` into a skeleton document root
pub fn render(tokens: &[Token], theme: &Theme, font: &Font, embed: Option<&FontFace>) -> Element {
    let lines = split_lines(tokens);
    let longest = lines.iter().map(Vec::as_slice).map(line_width).max().unwrap_or(0);

    let mut root = Element::new("svg")
        .with_attr("xmlns", "http://www.w3.org/2000/svg")
        .with_attr("width", format!("{}px", skeleton_width(longest)))
        .with_attr("height", format!("{}px", skeleton_height(lines.len())));

    if let Some(face) = embed {
        root.add_child(face.to_style());
    }

    root.add_child(
        Element::new("rect")
            .with_attr("width", "100%")
            .with_attr("height", "100%")
            .with_attr("fill", theme.background()),
    );

    let mut layer = group();
    set_font(&mut layer, &font.family, DEFAULT_FONT_SIZE);
    layer.set_attr("fill", theme.foreground.as_str());

    for (index, tokens) in lines.iter().enumerate() {
        let mut text = rime_svg::text(0.0, FIRST_BASELINE + index as f64 * LINE_ADVANCE);
        for token in tokens {
            match theme.fill(&token.class) {
                Some(fill) => text.add_child(rime_svg::tspan(&token.text).with_attr("fill", fill)),
                None => text.add_text(token.text.as_str()),
            }
        }
        layer.add_child(text);
    }

    root.add_child(layer);
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines_of(text: &str) -> Vec<Vec<Token>> {
        split_lines(&[Token::plain(text)])
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(lines_of("").len(), 0);
        assert_eq!(lines_of("package main\n").len(), 1);
        assert_eq!(lines_of("a\n\nb").len(), 3);
        assert_eq!(lines_of("a\nb\n").len(), 2);
    }

    #[test]
    fn test_split_keeps_classes_across_lines() {
        let tokens = vec![
            Token::new("/* a\nb */", "comment"),
            Token::plain(" x"),
        ];
        let lines = split_lines(&tokens);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], vec![Token::new("/* a", "comment")]);
        assert_eq!(
            lines[1],
            vec![Token::new("b */", "comment"), Token::plain(" x")]
        );
    }

    #[test]
    fn test_declared_size() {
        let theme = Theme::new("t", "#fff").with_background("#000");
        let root = render(&[Token::plain("abc\n\tx\n")], &theme, &Font::default(), None);
        assert_eq!(root.attr("width"), Some("40px"));
        assert_eq!(root.attr("height"), Some("60px"));
    }

    #[test]
    fn test_highlighted_tokens_become_tspans() {
        let theme = Theme::new("t", "#fff")
            .with_background("#000")
            .with_class("keyword", "#f00");
        let root = render(
            &[Token::new("fn", "keyword"), Token::plain(" main")],
            &theme,
            &Font::default(),
            None,
        );
        let layer = root.select_element("g").unwrap();
        let text = layer.select_element("text").unwrap();
        assert_eq!(text.deep_text(), "fn main");
        assert_eq!(
            text.select_element("tspan").and_then(|t| t.attr("fill")),
            Some("#f00")
        );
    }

    #[test]
    fn test_embedded_font() {
        let theme = Theme::new("t", "#fff");
        let face = FontFace::new("Mono", b"abc".to_vec());
        let root = render(&[], &theme, &Font::default(), Some(&face));
        let style = root.select_element("style").unwrap();
        assert!(style.text().contains("base64,YWJj"));
        assert!(style.text().contains("font-family: 'Mono'"));
    }
}
