//! Top-level render pipeline

use crate::config::Config;
use crate::layout::Layout;
use crate::skeleton::{self, FontFace};
use crate::style::{resolve_theme, BuiltinThemes, StyleResolver, Theme};
use crate::tokenizer::{PlainTextTokenizer, Token, Tokenizer, PLAIN_TEXT};
use crate::RimeError;
use rime_terminal::{cut_lines, is_ansi, strip_ansi, wrap};
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info};

/// Raster output is this many times the configured size
pub const RASTER_SCALE: f64 = 4.0;

/// Raster size used when either axis is auto-sized
pub const DEFAULT_RASTER_SIZE: (f64, f64) = (800.0, 600.0);

/// Turns an SVG document into image bytes
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, svg: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RimeError>;
}

/// Renders inputs with one configuration.
///
/// The configuration is read-only once the generator is built, so one
/// generator can serve any number of renders, from any number of threads.
#[derive(Clone)]
pub struct Generator {
    config: Config,
    styles: Arc<dyn StyleResolver>,
    tokenizer: Arc<dyn Tokenizer>,
    rasterizer: Option<Arc<dyn Rasterizer>>,
    font_face: Option<FontFace>,
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field("rasterizer", &self.rasterizer.is_some())
            .field("font_face", &self.font_face.as_ref().map(|face| &face.family))
            .finish()
    }
}

impl Generator {
    /// A generator with the built-in themes and no syntax highlighting
    pub fn new(config: Config) -> Self {
        Self {
            config,
            styles: Arc::new(BuiltinThemes::new()),
            tokenizer: Arc::new(PlainTextTokenizer),
            rasterizer: None,
            font_face: None,
        }
    }

    pub fn with_style_resolver(mut self, styles: Arc<dyn StyleResolver>) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Embed `face` into every document
    pub fn with_font_face(mut self, face: FontFace) -> Self {
        self.font_face = Some(face);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Render source code. `filename` only helps language detection.
    pub fn generate_from_code(&self, code: &str, filename: Option<&str>) -> Result<Vec<u8>, RimeError> {
        self.config.validate()?;
        let content = self.prepare(code);
        let language = self.detect_language(&content, filename);
        let theme = self.theme();
        info!(language = %language, theme = %theme.name, "rendering code");

        let tokens = self.tokenizer.tokenize(&content, &language)?;
        self.render(&tokens, &theme, &content, false)
    }

    /// Render code read from `reader`
    pub fn generate_from_reader<R: Read>(
        &self,
        mut reader: R,
        filename: Option<&str>,
    ) -> Result<Vec<u8>, RimeError> {
        let mut code = String::new();
        reader.read_to_string(&mut code)?;
        self.generate_from_code(&code, filename)
    }

    /// Render terminal output containing escape sequences
    pub fn generate_from_ansi(&self, text: &str) -> Result<Vec<u8>, RimeError> {
        self.config.validate()?;
        let content = self.prepare(text);
        let theme = self.theme();
        info!(theme = %theme.name, "rendering terminal output");

        let tokens = [Token::plain(strip_ansi(&content))];
        self.render(&tokens, &theme, &content, true)
    }

    /// Render `input` as terminal output when it carries escape sequences,
    /// as code otherwise
    pub fn generate(&self, input: &str, filename: Option<&str>) -> Result<Vec<u8>, RimeError> {
        if is_ansi(input) {
            self.generate_from_ansi(input)
        } else {
            self.generate_from_code(input, filename)
        }
    }

    /// Configured language, or the tokenizer's guess, or plain text
    pub fn detect_language(&self, text: &str, filename: Option<&str>) -> String {
        if !self.config.language.is_empty() {
            return self.config.language.clone();
        }
        self.tokenizer
            .detect_language(text, filename)
            .unwrap_or_else(|| PLAIN_TEXT.to_string())
    }

    /// Pixel size of raster output
    pub fn raster_size(&self) -> (u32, u32) {
        let (width, height) = if self.config.is_auto_width() || self.config.is_auto_height() {
            DEFAULT_RASTER_SIZE
        } else {
            (self.config.width, self.config.height)
        };
        (
            (width * RASTER_SCALE) as u32,
            (height * RASTER_SCALE) as u32,
        )
    }

    pub fn render_png_from_code(&self, code: &str, filename: Option<&str>) -> Result<Vec<u8>, RimeError> {
        let svg = self.generate_from_code(code, filename)?;
        self.rasterize(&svg)
    }

    pub fn render_png_from_ansi(&self, text: &str) -> Result<Vec<u8>, RimeError> {
        let svg = self.generate_from_ansi(text)?;
        self.rasterize(&svg)
    }

    fn rasterize(&self, svg: &[u8]) -> Result<Vec<u8>, RimeError> {
        let rasterizer = self.rasterizer.as_ref().ok_or(RimeError::NoRasterizer)?;
        let (width, height) = self.raster_size();
        debug!(width, height, "rasterizing");
        rasterizer.rasterize(svg, width, height)
    }

    fn theme(&self) -> Theme {
        resolve_theme(self.styles.as_ref(), &self.config.theme, &self.config.background)
    }

    /// Slice the configured line range, then hard-wrap
    fn prepare(&self, input: &str) -> String {
        let mut content = match self.config.lines {
            Some(range) => cut_lines(input, range.start, range.end),
            None => input.to_string(),
        };
        if self.config.wrap > 0 {
            content = wrap(&content, self.config.wrap);
        }
        content
    }

    fn render(
        &self,
        tokens: &[Token],
        theme: &Theme,
        content: &str,
        terminal_mode: bool,
    ) -> Result<Vec<u8>, RimeError> {
        let skeleton = skeleton::render(tokens, theme, &self.config.font, self.font_face.as_ref());
        let document = Layout::new(&self.config, theme, terminal_mode).run(skeleton, content)?;
        let bytes = document.to_bytes();
        debug!(bytes = bytes.len(), "document assembled");
        Ok(bytes)
    }
}
