//! Rime command line

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rime_core::{BuiltinThemes, Config, FontFace, Generator};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Rime - render code and terminal output as SVG")]
pub struct Args {
    /// File to render, stdin when omitted or "-"
    pub input: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the SVG
    #[arg(short, long, default_value = "out.svg")]
    pub output: PathBuf,

    /// Theme name, see --list-themes
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Print the built-in theme names and exit
    #[arg(long)]
    pub list_themes: bool,

    /// Language of the input, detected when omitted
    #[arg(short, long)]
    pub language: Option<String>,

    #[arg(long)]
    pub background: Option<String>,

    /// Draw window controls
    #[arg(long)]
    pub window: bool,

    #[arg(long)]
    pub show_line_numbers: bool,

    /// Lines to capture, 1-indexed and inclusive, e.g. 3,8
    #[arg(long, value_parser = parse_line_range)]
    pub lines: Option<(usize, usize)>,

    #[arg(long)]
    pub font_family: Option<String>,

    /// TTF file to embed
    #[arg(long)]
    pub font_file: Option<PathBuf>,

    #[arg(long)]
    pub font_size: Option<f64>,

    #[arg(long)]
    pub line_height: Option<f64>,

    /// Canvas width, 0 fits the content
    #[arg(long)]
    pub width: Option<f64>,

    /// Canvas height, 0 fits the content
    #[arg(long)]
    pub height: Option<f64>,

    /// Hard-wrap column
    #[arg(long)]
    pub wrap: Option<usize>,

    /// 1, 2 or 4 comma-separated values
    #[arg(long, value_delimiter = ',')]
    pub padding: Option<Vec<f64>>,

    /// 1, 2 or 4 comma-separated values
    #[arg(long, value_delimiter = ',')]
    pub margin: Option<Vec<f64>>,

    /// Treat the input as terminal output even without escape sequences
    #[arg(long)]
    pub ansi: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

impl Args {
    /// Overlay the flags that were given onto `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(background) = &self.background {
            config.background = background.clone();
        }
        if self.window {
            config.window = true;
        }
        if self.show_line_numbers {
            config.show_line_numbers = true;
        }
        if let Some((start, end)) = self.lines {
            *config = std::mem::take(config).with_lines(start, end);
        }
        if let Some(family) = &self.font_family {
            config.font.family = family.clone();
        }
        if let Some(file) = &self.font_file {
            config.font.file = Some(file.clone());
        }
        if let Some(size) = self.font_size {
            config.font.size = size;
        }
        if let Some(line_height) = self.line_height {
            config.line_height = line_height;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(wrap) = self.wrap {
            config.wrap = wrap;
        }
        if let Some(padding) = &self.padding {
            config.padding = padding.clone();
        }
        if let Some(margin) = &self.margin {
            config.margin = margin.clone();
        }
    }
}

/// Parse `start,end`
pub fn parse_line_range(value: &str) -> std::result::Result<(usize, usize), String> {
    let (start, end) = value
        .split_once(',')
        .ok_or_else(|| format!("expected START,END, got {value:?}"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid line number {s:?}: {e}"))
    };
    Ok((parse(start)?, parse(end)?))
}

/// Read a JSON config, or the defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Input text and the file name used for language detection
fn read_input(path: Option<&Path>) -> Result<(String, Option<String>)> {
    match path {
        Some(path) if path != Path::new("-") => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read input {}", path.display()))?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            Ok((text, name))
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok((text, None))
        }
    }
}

fn font_face(config: &Config) -> Result<Option<FontFace>> {
    let Some(path) = &config.font.file else {
        return Ok(None);
    };
    let data =
        fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
    Ok(Some(FontFace::new(&config.font.family, data)))
}

/// Write the built-in theme names, one per line
pub fn list_themes(out: &mut impl Write) -> Result<()> {
    for name in BuiltinThemes::new().names() {
        writeln!(out, "{name}").context("Failed to write theme list")?;
    }
    Ok(())
}

/// Render according to already parsed arguments
pub fn execute(args: &Args) -> Result<()> {
    if args.list_themes {
        return list_themes(&mut io::stdout().lock());
    }

    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config);

    let mut generator = Generator::new(config);
    if let Some(face) = font_face(generator.config())? {
        generator = generator.with_font_face(face);
    }

    let (input, filename) = read_input(args.input.as_deref())?;
    let svg = if args.ansi {
        generator.generate_from_ansi(&input)
    } else {
        generator.generate(&input, filename.as_deref())
    }
    .context("Failed to render")?;

    fs::write(&args.output, &svg)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Wrote {} ({} bytes)", args.output.display(), svg.len());
    Ok(())
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.directive())),
        )
        .with_writer(io::stderr)
        .init();

    execute(&args)
}
