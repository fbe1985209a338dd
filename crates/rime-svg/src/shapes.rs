//! Element constructors and mutators used by the layout engine

use crate::element::Element;
use crate::geometry::{num, parse_dimension, px};
use tracing::trace;

const RED: &str = "#FF5A54";
const YELLOW: &str = "#E6BF29";
const GREEN: &str = "#52C12B";

/// Move an element to `(x, y)`
pub fn move_to(element: &mut Element, x: f64, y: f64) {
    element.set_attr("x", px(x));
    element.set_attr("y", px(y));
}

/// Overwrite width and height, only where the attributes already exist
pub fn set_dimensions(element: &mut Element, width: f64, height: f64) {
    if element.has_attr("width") {
        element.set_attr("width", px(width));
    } else {
        trace!(element = element.name(), "no width attribute to update");
    }
    if element.has_attr("height") {
        element.set_attr("height", px(height));
    } else {
        trace!(element = element.name(), "no height attribute to update");
    }
}

/// Integer width and height of an element, 0 where missing or malformed
pub fn dimensions(element: &Element) -> (i64, i64) {
    let width = parse_dimension(element.attr("width").unwrap_or("0px"));
    let height = parse_dimension(element.attr("height").unwrap_or("0px"));
    (width, height)
}

pub fn add_corner_radius(element: &mut Element, radius: f64) {
    element.set_attr("rx", num(radius));
    element.set_attr("ry", num(radius));
}

pub fn add_outline(element: &mut Element, width: f64, color: &str) {
    element.set_attr("stroke", color);
    element.set_attr("stroke-width", num(width));
}

/// Append a `<defs>` holding a drop-shadow filter with the given id
pub fn add_shadow(element: &mut Element, id: &str, x: f64, y: f64, blur: f64) {
    let mut filter = Element::new("filter")
        .with_attr("id", id)
        .with_attr("filterUnits", "userSpaceOnUse");

    filter.add_child(
        Element::new("feGaussianBlur")
            .with_attr("in", "SourceAlpha")
            .with_attr("stdDeviation", num(blur)),
    );
    filter.add_child(
        Element::new("feOffset")
            .with_attr("result", "offsetblur")
            .with_attr("dx", num(x))
            .with_attr("dy", num(y)),
    );

    let mut merge = Element::new("feMerge");
    merge.add_child(Element::new("feMergeNode"));
    merge.add_child(Element::new("feMergeNode").with_attr("in", "SourceGraphic"));
    filter.add_child(merge);

    let mut defs = Element::new("defs");
    defs.add_child(filter);
    element.add_child(defs);
}

/// Append a `<defs>` holding a rectangular clip path with the given id
pub fn add_clip_path(element: &mut Element, id: &str, x: f64, y: f64, width: f64, height: f64) {
    let mut clip = Element::new("clipPath").with_attr("id", id);
    clip.add_child(
        Element::new("rect")
            .with_attr("x", num(x))
            .with_attr("y", num(y))
            .with_attr("width", num(width))
            .with_attr("height", num(height)),
    );

    let mut defs = Element::new("defs");
    defs.add_child(clip);
    element.add_child(defs);
}

/// Three colored circles of radius `r`, spaced `spacing` apart, centered
/// vertically at `cy`
pub fn window_controls(r: f64, spacing: f64, cy: f64) -> Element {
    let mut bar = Element::new("svg");
    for (i, color) in [RED, YELLOW, GREEN].into_iter().enumerate() {
        let cx = (i as f64 + 1.0) * spacing - r;
        bar.add_child(
            Element::new("circle")
                .with_attr("cx", num(cx))
                .with_attr("cy", num(cy))
                .with_attr("r", num(r))
                .with_attr("fill", color),
        );
    }
    bar
}

pub fn rect(x: f64, y: f64, width: f64, height: f64, fill: &str) -> Element {
    let mut r = Element::new("rect");
    move_to(&mut r, x, y);
    r.set_attr("width", px(width));
    r.set_attr("height", px(height));
    if !fill.is_empty() {
        r.set_attr("fill", fill);
    }
    r
}

/// A whitespace-preserving text line at `(x, y)`
pub fn text(x: f64, y: f64) -> Element {
    let mut t = Element::new("text");
    move_to(&mut t, x, y);
    t.set_attr("xml:space", "preserve");
    t
}

/// A whitespace-preserving run
pub fn tspan(content: &str) -> Element {
    let mut span = Element::new("tspan").with_attr("xml:space", "preserve");
    span.set_text(content);
    span
}

pub fn group() -> Element {
    Element::new("g")
}

pub fn set_font(element: &mut Element, family: &str, size: f64) {
    if !family.is_empty() {
        element.set_attr("font-family", family);
    }
    if size > 0.0 {
        element.set_attr("font-size", px(size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_window_controls() {
        let bar = window_controls(5.5, 19.0, 12.0);
        let circles: Vec<_> = bar.select_elements("circle").collect();
        assert_eq!(circles.len(), 3);
        assert_eq!(circles[0].attr("cx"), Some("13.50"));
        assert_eq!(circles[1].attr("cx"), Some("32.50"));
        assert_eq!(circles[2].attr("cx"), Some("51.50"));
        assert_eq!(circles[2].attr("fill"), Some(GREEN));
    }

    #[test]
    fn test_set_dimensions_only_existing() {
        let mut e = Element::new("rect").with_attr("width", "100%");
        set_dimensions(&mut e, 10.0, 20.0);
        assert_eq!(e.attr("width"), Some("10.00px"));
        assert_eq!(e.attr("height"), None);
    }

    #[test]
    fn test_dimensions_roundtrip_integer_prefix() {
        let e = rect(0.0, 0.0, 120.0, 33.6, "#000");
        assert_eq!(dimensions(&e), (120, 33));
        assert_eq!(dimensions(&Element::new("svg")), (0, 0));
    }

    #[test]
    fn test_shadow_definition() {
        let mut root = Element::new("svg");
        add_shadow(&mut root, "shadow", 0.0, 10.0, 20.0);
        let defs = root.select_element("defs").unwrap();
        let filter = defs.select_element("filter").unwrap();
        assert_eq!(filter.attr("id"), Some("shadow"));
        let blur = filter.select_element("feGaussianBlur").unwrap();
        assert_eq!(blur.attr("stdDeviation"), Some("20.00"));
        let offset = filter.select_element("feOffset").unwrap();
        assert_eq!(offset.attr("dy"), Some("10.00"));
    }

    #[test]
    fn test_clip_path_definition() {
        let mut root = Element::new("svg");
        add_clip_path(&mut root, "terminalMask", 1.0, 2.0, 3.0, 4.0);
        let clip = root
            .select_element("defs")
            .and_then(|d| d.select_element("clipPath"))
            .unwrap();
        assert_eq!(
            clip.to_string(),
            r#"<clipPath id="terminalMask"><rect x="1.00" y="2.00" width="3.00" height="4.00"/></clipPath>"#
        );
    }
}
