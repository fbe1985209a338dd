//! Tokenizer seam
//!
//! Syntax analysis lives outside Rime. A tokenizer hands back the input as
//! a flat list of (text, style class) pairs that concatenate to the input.

use crate::RimeError;

/// Style class of unhighlighted text
pub const TEXT_CLASS: &str = "text";

/// Language assumed when nothing better is known
pub const PLAIN_TEXT: &str = "plaintext";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Dotted style class, e.g. `keyword.type`
    pub class: String,
}

impl Token {
    pub fn new(text: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: class.into(),
        }
    }

    /// A token with no highlighting
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TEXT_CLASS)
    }
}

pub trait Tokenizer: Send + Sync {
    /// Split `text` into styled tokens for `language`
    fn tokenize(&self, text: &str, language: &str) -> Result<Vec<Token>, RimeError>;

    /// Guess the language of `text`, optionally helped by its file name
    fn detect_language(&self, text: &str, filename: Option<&str>) -> Option<String>;
}

/// Tokenizer that highlights nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextTokenizer;

impl Tokenizer for PlainTextTokenizer {
    fn tokenize(&self, text: &str, _language: &str) -> Result<Vec<Token>, RimeError> {
        Ok(vec![Token::plain(text)])
    }

    fn detect_language(&self, _text: &str, _filename: Option<&str>) -> Option<String> {
        Some(PLAIN_TEXT.to_string())
    }
}
