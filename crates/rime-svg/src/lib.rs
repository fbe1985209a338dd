//! SVG document assembly for Rime
//!
//! A small ordered element tree plus the geometry helpers and shape
//! constructors the layout engine builds images from.

pub mod element;
pub mod geometry;
pub mod shapes;

pub use element::{Document, Element, Node};
pub use geometry::{num, parse_dimension, px, BoxSides};
pub use shapes::{
    add_clip_path, add_corner_radius, add_outline, add_shadow, dimensions, group, move_to, rect,
    set_dimensions, set_font, text, tspan, window_controls,
};
