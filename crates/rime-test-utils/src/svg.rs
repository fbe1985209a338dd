//! Assertions over rendered documents, working on the serialized text

use regex::Regex;
use similar::{ChangeTag, TextDiff};

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Value of `attr` on every `<element>`, in document order
pub fn attr_values(svg: &str, element: &str, attr: &str) -> Vec<String> {
    let tag = Regex::new(&format!(r"<{}\b[^>]*>", regex::escape(element))).unwrap();
    let value = Regex::new(&format!(r#"\s{}="([^"]*)""#, regex::escape(attr))).unwrap();
    tag.find_iter(svg)
        .filter_map(|m| value.captures(m.as_str()))
        .map(|c| unescape(&c[1]))
        .collect()
}

/// Visible text of every `<text>` line, markup removed
pub fn text_lines(svg: &str) -> Vec<String> {
    let line = Regex::new(r"(?s)<text\b[^>]*?(?:/>|>(.*?)</text>)").unwrap();
    let markup = Regex::new(r"<[^>]+>").unwrap();
    line.captures_iter(svg)
        .map(|c| {
            let inner = c.get(1).map_or("", |m| m.as_str());
            unescape(&markup.replace_all(inner, ""))
        })
        .collect()
}

/// Width and height of the root element, without units
pub fn root_size(svg: &str) -> (f64, f64) {
    let parse = |attr: &str| {
        attr_values(svg, "svg", attr)
            .first()
            .and_then(|v| v.trim_end_matches("px").parse().ok())
            .unwrap_or_else(|| panic!("root has no numeric {attr}"))
    };
    (parse("width"), parse("height"))
}

/// Compare two documents line by line, failing with a diff
pub fn assert_svg_eq(expected: &str, actual: &str) {
    if expected == actual {
        return;
    }

    let mut report = String::new();
    for change in TextDiff::from_lines(expected, actual).iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        report.push_str(&format!("{sign}{change}"));
    }
    panic!("documents differ:\n{report}");
}
