//! Rendering core for Rime
//!
//! Lays source code or terminal output out as a styled SVG "terminal"
//! panel: token rendering, geometry, window chrome, shadow, border, line
//! numbers and clipping.

pub mod config;
pub mod generator;
pub mod layout;
pub mod skeleton;
pub mod style;
pub mod tokenizer;

pub use config::{Border, Config, Font, LineRange, Shadow};
pub use generator::{Generator, Rasterizer};
pub use layout::{Geometry, Layout};
pub use skeleton::FontFace;
pub use style::{BuiltinThemes, StyleResolver, Theme};
pub use tokenizer::{PlainTextTokenizer, Token, Tokenizer};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RimeError {
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("could not tokenize input: {0}")]
    Tokenize(String),

    #[error("malformed intermediate document: {0}")]
    MalformedDocument(&'static str),

    #[error("rasterization failed: {0}")]
    Raster(String),

    #[error("no rasterizer configured")]
    NoRasterizer,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("font size must be positive, got {0}")]
    NonPositiveFontSize(f64),

    #[error("line height must be positive, got {0}")]
    NonPositiveLineHeight(f64),

    #[error("start line {start} must be less than or equal to end line {end}")]
    InvertedLineRange { start: usize, end: usize },
}
