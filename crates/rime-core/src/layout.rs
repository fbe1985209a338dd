//! Layout engine
//!
//! Turns a skeleton into the final document. The skeleton is taken apart
//! into layers once, every sizing step works on a [`Geometry`] value, and
//! the document is put back together in a single assembly pass.

use crate::config::{Config, Shadow};
use crate::skeleton::{DEFAULT_FONT_SIZE, DEFAULT_LINE_HEIGHT};
use crate::style::Theme;
use crate::RimeError;
use rime_svg::{
    add_clip_path, add_corner_radius, add_outline, add_shadow, dimensions, move_to, px, rect,
    set_dimensions, tspan, window_controls, BoxSides, Document, Element,
};
use rime_terminal::{interpret, longest_line, CellMetrics, Run, TerminalGrid};
use tracing::{debug, trace};

/// Extra top padding making room for the window bar
pub const CHROME_CLEARANCE: f64 = 15.0;

/// Gutter width reserved for line numbers, in font sizes
pub const GUTTER_RESERVE: f64 = 3.0;

const CHROME_RADIUS: f64 = 5.5;
const CHROME_SPACING: f64 = 19.0;
const CHROME_CENTER: f64 = 12.0;

const TAB_WIDTH: usize = 4;
const TERMINAL_TAB_WIDTH: usize = 6;

const SHADOW_ID: &str = "shadow";
const CLIP_ID: &str = "terminalMask";

/// Line-number label, right-aligned to three digits
pub fn gutter_label(number: usize) -> String {
    format!("{number:>3}  ")
}

/// Canvas and panel sizes for one render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Outer canvas
    pub image_width: f64,
    pub image_height: f64,
    /// Inner panel
    pub terminal_width: f64,
    pub terminal_height: f64,
    pub padding: BoxSides,
    pub margin: BoxSides,
    pub auto_width: bool,
    pub auto_height: bool,
}

impl Geometry {
    /// Size canvas and panel from the skeleton's declared size.
    ///
    /// The declared height is rescaled from the skeleton's default metrics
    /// to the configured font size and line height. An explicit axis takes
    /// the configured size for the canvas and subtracts the margin for the
    /// panel; an auto axis adds padding (and margin for the canvas) to the
    /// content.
    pub fn measure(declared: (i64, i64), config: &Config) -> Self {
        let content_width = declared.0 as f64;
        let mut content_height = declared.1 as f64;
        content_height *= config.font.size / DEFAULT_FONT_SIZE;
        content_height *= config.line_height / DEFAULT_LINE_HEIGHT;

        let padding = config.expanded_padding();
        let margin = config.expanded_margin();
        let auto_width = config.is_auto_width();
        let auto_height = config.is_auto_height();

        let (image_width, terminal_width) = if auto_width {
            (
                content_width + margin.horizontal() + padding.horizontal(),
                content_width + padding.horizontal(),
            )
        } else {
            (config.width, config.width - margin.horizontal())
        };

        let (image_height, terminal_height) = if auto_height {
            (
                content_height + margin.vertical() + padding.vertical(),
                content_height + padding.vertical(),
            )
        } else {
            (config.height, config.height - margin.vertical())
        };

        Self {
            image_width,
            image_height,
            terminal_width,
            terminal_height,
            padding,
            margin,
            auto_width,
            auto_height,
        }
    }

    /// Push the text down below the window bar
    pub fn clear_chrome(&mut self) {
        self.padding.top += CHROME_CLEARANCE;
    }

    /// Top-left corner of the text area
    pub fn text_origin(&self) -> (f64, f64) {
        (
            self.padding.left + self.margin.left,
            self.padding.top + self.margin.top,
        )
    }

    /// Baseline of the `index`-th line
    pub fn baseline(&self, index: usize, advance: f64) -> f64 {
        (index as f64 + 1.0) * advance + self.padding.top + self.margin.top
    }

    /// Lowest baseline that is still drawn
    pub fn visible_bottom(&self) -> f64 {
        self.image_height - self.margin.bottom - self.padding.bottom
    }

    /// Derive an auto width from the widest line, in cells
    pub fn fit_width(&mut self, longest: usize, metrics: CellMetrics) {
        self.terminal_width = (longest as f64 + 1.0) * metrics.cell_width();
        self.terminal_width += self.padding.horizontal();
        self.image_width = self.terminal_width + self.margin.horizontal();
    }

    /// Shrink the panel so an inward stroke of `width` fits the canvas
    pub fn inset_border(&mut self, width: f64) {
        self.terminal_width -= width * 2.0;
        self.terminal_height -= width * 2.0;
    }

    /// Reserve room for line numbers.
    ///
    /// An auto width grows the panel and canvas; an explicit width keeps
    /// the canvas and narrows the visible panel.
    pub fn reserve_gutter(&mut self, font_size: f64) {
        let gutter = font_size * GUTTER_RESERVE;
        if self.auto_width {
            self.terminal_width += gutter;
            self.image_width += gutter;
        } else {
            self.terminal_width -= gutter;
        }
    }

    /// Clip rectangle as (x, y, width, height), when any axis is explicit
    pub fn clip_rect(&self) -> Option<(f64, f64, f64, f64)> {
        if self.auto_width && self.auto_height {
            return None;
        }
        Some((
            self.margin.left,
            self.margin.top,
            self.terminal_width,
            self.terminal_height - self.padding.bottom,
        ))
    }

    /// Panel position, keeping a border's outer half on the canvas
    pub fn panel_origin(&self, border_width: f64) -> (f64, f64) {
        let half = border_width / 2.0;
        (self.margin.left.max(half), self.margin.top.max(half))
    }
}

/// The skeleton taken apart, plus everything added on the way
#[derive(Debug)]
struct Layers {
    root: Element,
    panel: Element,
    text_layer: Element,
    lines: Vec<Element>,
    backgrounds: Vec<Element>,
    chrome: Option<Element>,
    shadow: Option<Shadow>,
    clip: Option<(f64, f64, f64, f64)>,
}

impl Layers {
    fn take_from(mut root: Element) -> Result<Self, RimeError> {
        if root.name() != "svg" {
            return Err(RimeError::MalformedDocument("missing root svg element"));
        }
        let panel = root
            .take_element("rect")
            .ok_or(RimeError::MalformedDocument(
                "missing terminal background rectangle",
            ))?;
        let mut text_layer = root
            .take_element("g")
            .ok_or(RimeError::MalformedDocument("missing text layer"))?;
        let lines = text_layer.take_elements("text");

        Ok(Self {
            root,
            panel,
            text_layer,
            lines,
            backgrounds: Vec::new(),
            chrome: None,
            shadow: None,
            clip: None,
        })
    }

    fn assemble(mut self, geometry: &Geometry, border_width: f64) -> Document {
        let (x, y) = geometry.panel_origin(border_width);
        move_to(&mut self.panel, x, y);
        set_dimensions(&mut self.panel, geometry.terminal_width, geometry.terminal_height);
        set_dimensions(&mut self.root, geometry.image_width, geometry.image_height);

        self.root.add_child(self.panel);

        if self.clip.is_some() {
            self.text_layer
                .set_attr("clip-path", format!("url(#{CLIP_ID})"));
        }
        for background in self.backgrounds {
            self.text_layer.add_child(background);
        }
        for line in self.lines {
            self.text_layer.add_child(line);
        }
        self.root.add_child(self.text_layer);

        if let Some(chrome) = self.chrome {
            self.root.add_child(chrome);
        }
        if let Some(shadow) = self.shadow {
            add_shadow(&mut self.root, SHADOW_ID, shadow.x, shadow.y, shadow.blur);
        }
        if let Some((x, y, width, height)) = self.clip {
            add_clip_path(&mut self.root, CLIP_ID, x, y, width, height);
        }

        Document::new(self.root)
    }
}

/// Lays one skeleton out according to a configuration and theme
#[derive(Debug)]
pub struct Layout<'a> {
    config: &'a Config,
    theme: &'a Theme,
    terminal_mode: bool,
}

impl<'a> Layout<'a> {
    /// `terminal_mode` replaces each line's text with the runs the escape
    /// sequence interpreter produces from the content
    pub fn new(config: &'a Config, theme: &'a Theme, terminal_mode: bool) -> Self {
        Self {
            config,
            theme,
            terminal_mode,
        }
    }

    fn metrics(&self) -> CellMetrics {
        CellMetrics::new(self.config.font.size, self.config.line_height)
    }

    /// Lay `skeleton` out. `content` is the sliced and wrapped input the
    /// skeleton was rendered from.
    pub fn run(&self, skeleton: Element, content: &str) -> Result<Document, RimeError> {
        let config = self.config;
        let mut layers = Layers::take_from(skeleton)?;
        let mut geometry = Geometry::measure(dimensions(&layers.root), config);
        debug!(?geometry, lines = layers.lines.len(), "measured skeleton");

        if config.window {
            let mut bar = window_controls(CHROME_RADIUS, CHROME_SPACING, CHROME_CENTER);
            move_to(&mut bar, geometry.margin.left, geometry.margin.top);
            layers.chrome = Some(bar);
            geometry.clear_chrome();
        }

        if config.border.radius > 0.0 {
            add_corner_radius(&mut layers.panel, config.border.radius);
        }
        if config.shadow.is_visible() {
            layers
                .panel
                .set_attr("filter", format!("url(#{SHADOW_ID})"));
            layers.shadow = Some(config.shadow.clone());
        }

        layers.text_layer.set_attr("font-size", px(config.font.size));
        if !config.font.ligatures {
            layers
                .text_layer
                .set_attr("style", "font-variant-ligatures: none");
        }

        let grid = self
            .terminal_mode
            .then(|| interpret(content, layers.lines.len(), self.metrics()));
        self.place_lines(&mut layers, &geometry, grid.as_ref());
        if let Some(grid) = &grid {
            layers.backgrounds = self.background_layer(grid, &geometry);
        }

        if geometry.auto_width {
            let tab_width = if self.terminal_mode {
                TERMINAL_TAB_WIDTH
            } else {
                TAB_WIDTH
            };
            geometry.fit_width(longest_line(content, tab_width), self.metrics());
        }

        if config.border.width > 0.0 {
            add_outline(&mut layers.panel, config.border.width, &config.border.color);
            geometry.inset_border(config.border.width);
        }

        if config.show_line_numbers {
            geometry.reserve_gutter(config.font.size);
        }

        layers.clip = geometry.clip_rect();
        debug!(?geometry, clipped = layers.clip.is_some(), "final geometry");

        Ok(layers.assemble(&geometry, config.border.width))
    }

    /// Number, position and (in terminal mode) fill every line; lines
    /// whose baseline falls below the visible area are dropped
    fn place_lines(&self, layers: &mut Layers, geometry: &Geometry, grid: Option<&TerminalGrid>) {
        let config = self.config;
        let offset = config.lines.map_or(0, |range| range.start);
        let advance = config.font.size * config.line_height;
        let (x, _) = geometry.text_origin();
        let bottom = geometry.visible_bottom();

        let lines = std::mem::take(&mut layers.lines);
        let total = lines.len();
        for (index, mut line) in lines.into_iter().enumerate() {
            let y = geometry.baseline(index, advance);
            if y > bottom {
                trace!(index, y, bottom, "dropping line below visible area");
                continue;
            }

            if let Some(grid) = grid {
                line.clear_children();
                for run in grid.lines.get(index).into_iter().flatten() {
                    if !run.text.is_empty() {
                        line.add_child(run_element(run));
                    }
                }
            }

            if config.show_line_numbers {
                let number = tspan(&gutter_label(index + 1 + offset))
                    .with_attr("fill", self.theme.line_numbers.as_str());
                line.insert_child_at(0, number);
            }

            move_to(&mut line, x, y);
            layers.lines.push(line);
        }

        if layers.lines.len() < total {
            debug!(
                kept = layers.lines.len(),
                dropped = total - layers.lines.len(),
                "clipped overflowing lines"
            );
        }
    }

    /// Background rectangles from the interpreter, moved to the text origin
    fn background_layer(&self, grid: &TerminalGrid, geometry: &Geometry) -> Vec<Element> {
        let (x, y) = geometry.text_origin();
        let gutter = if self.config.show_line_numbers {
            gutter_label(1).chars().count() as f64 * self.metrics().cell_width()
        } else {
            0.0
        };

        grid.backgrounds
            .iter()
            .filter(|bg| bg.cells > 0)
            .map(|bg| rect(x + gutter + bg.x, y + bg.y, bg.width, bg.height, &bg.fill))
            .collect()
    }
}

fn run_element(run: &Run) -> Element {
    let mut span = tspan(&run.text);
    if let Some(fill) = &run.style.fill {
        span.set_attr("fill", fill.as_str());
    }
    if run.style.italic {
        span.set_attr("font-style", "italic");
    }
    if let Some(decoration) = run.style.text_decoration() {
        span.set_attr("text-decoration", decoration);
    }
    if let Some(dx) = run.dx {
        span.set_attr("dx", px(dx));
    }
    span
}
