//! Themes and the style registry seam

use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Theme used when the requested one is unknown
pub const FALLBACK_THEME: &str = "github";

/// Colors for one syntax theme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    /// Panel background; `None` lets the configured background through
    pub background: Option<String>,
    pub foreground: String,
    pub line_numbers: String,
    classes: BTreeMap<String, String>,
}

impl Theme {
    pub fn new(name: &str, foreground: &str) -> Self {
        Self {
            name: name.to_string(),
            background: None,
            foreground: foreground.to_string(),
            line_numbers: foreground.to_string(),
            classes: BTreeMap::new(),
        }
    }

    pub fn with_background(mut self, color: &str) -> Self {
        self.background = Some(color.to_string());
        self
    }

    pub fn with_line_numbers(mut self, color: &str) -> Self {
        self.line_numbers = color.to_string();
        self
    }

    pub fn with_class(mut self, class: &str, fill: &str) -> Self {
        self.classes.insert(class.to_string(), fill.to_string());
        self
    }

    /// Fill for a style class.
    ///
    /// Dotted classes fall back to their parents, so `keyword.type`
    /// resolves through `keyword` when it has no entry of its own.
    pub fn fill(&self, class: &str) -> Option<&str> {
        let mut class = class;
        loop {
            if let Some(fill) = self.classes.get(class) {
                return Some(fill.as_str());
            }
            class = &class[..class.rfind('.')?];
        }
    }

    /// Use `background` unless the theme brings its own
    pub fn ensure_background(&mut self, background: &str) {
        if self.background.is_none() {
            self.background = Some(background.to_string());
        }
    }

    /// Background after [`Theme::ensure_background`], empty otherwise
    pub fn background(&self) -> &str {
        self.background.as_deref().unwrap_or("")
    }
}

/// Read-only theme lookup, shared across renders
pub trait StyleResolver: Send + Sync {
    fn theme(&self, name: &str) -> Option<Theme>;
}

/// Resolve `name`, falling back to [`FALLBACK_THEME`], and make sure the
/// result carries a background
pub fn resolve_theme(resolver: &dyn StyleResolver, name: &str, background: &str) -> Theme {
    let mut theme = match resolver.theme(&name.to_lowercase()) {
        Some(theme) => theme,
        None => {
            warn!(theme = name, fallback = FALLBACK_THEME, "unknown theme");
            resolver
                .theme(FALLBACK_THEME)
                .unwrap_or_else(|| Theme::new(FALLBACK_THEME, "#000000"))
        }
    };

    if theme.background.is_none() {
        debug!(theme = %theme.name, background, "theme has no background, injecting");
    }
    theme.ensure_background(background);
    theme
}

/// Themes shipped with Rime
#[derive(Debug, Clone)]
pub struct BuiltinThemes {
    themes: BTreeMap<String, Theme>,
}

impl Default for BuiltinThemes {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinThemes {
    pub fn new() -> Self {
        let themes = [charm(), github(), dracula()]
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();
        Self { themes }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }
}

impl StyleResolver for BuiltinThemes {
    fn theme(&self, name: &str) -> Option<Theme> {
        self.themes.get(name).cloned()
    }
}

fn charm() -> Theme {
    Theme::new("charm", "#C4C4C4")
        .with_background("#171717")
        .with_line_numbers("#444444")
        .with_class("comment", "#676767")
        .with_class("keyword", "#00AAFF")
        .with_class("keyword.type", "#6E6ED8")
        .with_class("name.function", "#00DC7F")
        .with_class("name.tag", "#B083EA")
        .with_class("string", "#C69669")
        .with_class("number", "#6EEFC0")
        .with_class("operator", "#EF8080")
        .with_class("punctuation", "#E8E8A8")
}

fn github() -> Theme {
    Theme::new("github", "#24292E")
        .with_line_numbers("#7F7F7F")
        .with_class("comment", "#6A737D")
        .with_class("keyword", "#D73A49")
        .with_class("keyword.type", "#445588")
        .with_class("name.function", "#6F42C1")
        .with_class("name.tag", "#22863A")
        .with_class("string", "#032F62")
        .with_class("number", "#005CC5")
        .with_class("operator", "#D73A49")
}

fn dracula() -> Theme {
    Theme::new("dracula", "#F8F8F2")
        .with_background("#282A36")
        .with_line_numbers("#6272A4")
        .with_class("comment", "#6272A4")
        .with_class("keyword", "#FF79C6")
        .with_class("keyword.type", "#8BE9FD")
        .with_class("name.function", "#50FA7B")
        .with_class("name.tag", "#FF79C6")
        .with_class("string", "#F1FA8C")
        .with_class("number", "#BD93F9")
        .with_class("operator", "#FF79C6")
}
