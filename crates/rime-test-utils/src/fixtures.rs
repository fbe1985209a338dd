use rime_core::{RimeError, StyleResolver, Theme, Token, Tokenizer};
use std::collections::HashMap;

pub const GO_SOURCE: &str = "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"Hello, world\")\n}\n";

pub const ANSI_SAMPLE: &str =
    "\x1b[32m✓\x1b[0m build passed\n\x1b[1;31merror\x1b[0m: \x1b[4mmissing\x1b[0m\n\x1b[44m  bg  \x1b[0m\n";

/// Fixed set of themes
#[derive(Debug, Clone, Default)]
pub struct StaticThemes {
    themes: HashMap<String, Theme>,
}

impl StaticThemes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, theme: Theme) -> Self {
        self.themes.insert(theme.name.clone(), theme);
        self
    }

    /// One theme without a background, one with
    pub fn sample() -> Self {
        Self::new()
            .with(
                Theme::new("github", "#24292E")
                    .with_line_numbers("#7F7F7F")
                    .with_class("keyword", "#D73A49")
                    .with_class("number", "#005CC5"),
            )
            .with(
                Theme::new("night", "#EEEEEE")
                    .with_background("#101010")
                    .with_line_numbers("#555555")
                    .with_class("keyword", "#FF00AA"),
            )
    }
}

impl StyleResolver for StaticThemes {
    fn theme(&self, name: &str) -> Option<Theme> {
        self.themes.get(name).cloned()
    }
}

/// Splits input into words, classing a fixed keyword list and numbers
#[derive(Debug, Clone)]
pub struct KeywordTokenizer {
    keywords: Vec<&'static str>,
}

impl Default for KeywordTokenizer {
    fn default() -> Self {
        Self {
            keywords: vec!["package", "import", "func", "fn", "let", "return"],
        }
    }
}

impl KeywordTokenizer {
    fn class_of(&self, word: &str) -> &'static str {
        if self.keywords.contains(&word) {
            "keyword"
        } else if !word.is_empty() && word.chars().all(|c| c.is_ascii_digit()) {
            "number"
        } else {
            "text"
        }
    }
}

impl Tokenizer for KeywordTokenizer {
    fn tokenize(&self, text: &str, _language: &str) -> Result<Vec<Token>, RimeError> {
        let mut tokens = Vec::new();
        let mut word = String::new();
        for c in text.chars() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                continue;
            }
            if !word.is_empty() {
                let class = self.class_of(&word);
                tokens.push(Token::new(std::mem::take(&mut word), class));
            }
            tokens.push(Token::plain(c.to_string()));
        }
        if !word.is_empty() {
            let class = self.class_of(&word);
            tokens.push(Token::new(word, class));
        }
        Ok(tokens)
    }

    fn detect_language(&self, _text: &str, filename: Option<&str>) -> Option<String> {
        let extension = filename?.rsplit_once('.')?.1;
        match extension {
            "go" => Some("go".to_string()),
            "rs" => Some("rust".to_string()),
            _ => None,
        }
    }
}
