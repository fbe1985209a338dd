use pretty_assertions::assert_eq;
use rime_core::{Config, Generator, Layout, RimeError, Theme};
use rime_svg::Element;
use rime_terminal::strip_ansi;
use rime_test_utils::fixtures::{ANSI_SAMPLE, GO_SOURCE};
use rime_test_utils::{assert_svg_eq, attr_values, init_test_logging, root_size, text_lines};
use rime_test_utils::{KeywordTokenizer, StaticThemes};
use std::sync::Arc;
use std::thread;
use test_case::test_case;

fn render_code(config: Config, code: &str) -> String {
    init_test_logging();
    let svg = Generator::new(config).generate_from_code(code, None).unwrap();
    String::from_utf8(svg).unwrap()
}

fn render_ansi(config: Config, text: &str) -> String {
    init_test_logging();
    let svg = Generator::new(config).generate_from_ansi(text).unwrap();
    String::from_utf8(svg).unwrap()
}

fn highlighting(config: Config) -> Generator {
    Generator::new(config)
        .with_style_resolver(Arc::new(StaticThemes::sample()))
        .with_tokenizer(Arc::new(KeywordTokenizer::default()))
}

#[test]
fn test_document_header() {
    let svg = render_code(Config::default(), "x\n");
    assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg"));
    assert!(svg.ends_with("</svg>\n"));
}

#[test_case(14.0, 1.2, 66.0 ; "default metrics")]
#[test_case(28.0, 1.2, 92.0 ; "double font size")]
#[test_case(28.0, 2.4, 144.0 ; "double font and line height")]
fn test_empty_input_height(font_size: f64, line_height: f64, expected: f64) {
    let config = Config::default()
        .with_font("JetBrains Mono", font_size)
        .with_line_height(line_height);
    let svg = render_code(config, "");
    assert!(text_lines(&svg).is_empty());
    assert_eq!(root_size(&svg).1, expected);
}

#[test]
fn test_empty_terminal_input() {
    let svg = render_ansi(Config::default(), "");
    assert!(text_lines(&svg).is_empty());
    assert_eq!(root_size(&svg).1, 66.0);
}

#[test]
fn test_auto_width_from_longest_line() {
    let svg = render_code(Config::default(), "ab\n");
    // (2 + 1) cells of 14 / 1.68 plus 20px padding on both sides
    assert_eq!(root_size(&svg).0, 65.0);
    assert_eq!(attr_values(&svg, "rect", "width")[0], "65.00px");
}

#[test]
fn test_tabs_count_four_cells() {
    let svg = render_code(Config::default(), "\tx\n");
    let width = root_size(&svg).0;
    assert_eq!(width, 90.0);
}

#[test]
fn test_theme_without_background_takes_config_background() {
    let config = Config::default()
        .with_theme("github")
        .with_background("#ABCDEF");
    let svg = render_code(config, "package main\n");
    assert_eq!(attr_values(&svg, "rect", "fill")[0], "#ABCDEF");
}

#[test]
fn test_theme_background_wins() {
    let svg = render_code(Config::default().with_background("#ABCDEF"), "x\n");
    assert_eq!(attr_values(&svg, "rect", "fill")[0], "#171717");
}

#[test]
fn test_highlighted_tokens() {
    let config = Config::default().with_theme("github");
    let svg = highlighting(config).generate_from_code(GO_SOURCE, Some("main.go"));
    let svg = String::from_utf8(svg.unwrap()).unwrap();

    let fills = attr_values(&svg, "tspan", "fill");
    assert!(fills.iter().all(|f| f == "#D73A49"));
    // package, import, func
    assert_eq!(fills.len(), 3);
    assert_eq!(text_lines(&svg)[0], "package main");
}

#[test]
fn test_unknown_theme_falls_back() {
    let config = Config::default().with_theme("no-such-theme");
    let svg = highlighting(config).generate_from_code("fn x\n", None).unwrap();
    let svg = String::from_utf8(svg).unwrap();
    assert_eq!(attr_values(&svg, "tspan", "fill"), vec!["#D73A49"]);
    assert_eq!(attr_values(&svg, "rect", "fill")[0], "#171717");
}

#[test]
fn test_line_slice_with_numbers() {
    let config = Config::default().with_lines(3, 5).with_line_numbers(true);
    let svg = render_code(config, "l0\nl1\nl2\nl3\nl4\nl5\n");
    assert_eq!(text_lines(&svg), vec!["  3  l2", "  4  l3", "  5  l4"]);
    assert_eq!(attr_values(&svg, "tspan", "fill"), vec!["#444444"; 3]);
}

#[test]
fn test_line_slice_past_end_clamps() {
    let config = Config::default().with_lines(2, 50);
    let svg = render_code(config, "a\nb\nc");
    assert_eq!(text_lines(&svg), vec!["b", "c"]);
}

#[test]
fn test_line_numbers_widen_auto_panel() {
    let plain = render_code(Config::default(), "ab\n");
    let numbered = render_code(Config::default().with_line_numbers(true), "ab\n");
    assert_eq!(root_size(&numbered).0 - root_size(&plain).0, 42.0);
}

#[test]
fn test_wrap() {
    let svg = render_code(Config::default().with_wrap(4), "abcdefgh\n");
    assert_eq!(text_lines(&svg), vec!["abcd", "efgh"]);
}

#[test]
fn test_terminal_text_matches_stripped_input() {
    let svg = render_ansi(Config::default(), ANSI_SAMPLE);
    let stripped = strip_ansi(ANSI_SAMPLE);
    let expected: Vec<&str> = stripped.lines().collect();
    assert_eq!(text_lines(&svg), expected);
}

#[test]
fn test_background_lifecycle() {
    let svg = render_ansi(Config::default(), "\x1b[41mAB\x1b[0mC\n");
    let fills = attr_values(&svg, "rect", "fill");
    assert_eq!(fills, vec!["#171717", "#FF0000"]);
    assert_eq!(attr_values(&svg, "rect", "width")[1], "16.67px");
    assert_eq!(attr_values(&svg, "rect", "x")[1], "20.00px");
    assert_eq!(text_lines(&svg), vec!["ABC"]);
}

#[test]
fn test_wrapped_background_covers_every_row() {
    let svg = render_ansi(Config::default().with_wrap(3), "\x1b[41mabcdef\x1b[0m\n");
    assert_eq!(text_lines(&svg), vec!["abc", "def"]);
    let fills = attr_values(&svg, "rect", "fill");
    assert_eq!(fills, vec!["#171717", "#FF0000", "#FF0000"]);
    let widths = attr_values(&svg, "rect", "width");
    assert_eq!(widths[1..], ["25.00px", "25.00px"]);
    let xs = attr_values(&svg, "rect", "x");
    assert_eq!(xs[1], xs[2]);
}

#[test]
fn test_background_after_gutter() {
    let config = Config::default().with_line_numbers(true);
    let svg = render_ansi(config, "\x1b[44mx\x1b[0m\n");
    // 20px padding plus five gutter cells
    assert_eq!(attr_values(&svg, "rect", "x")[1], "61.67px");
}

#[test]
fn test_wide_character_gets_own_run() {
    let svg = render_ansi(Config::default(), "\x1b[32m界a\x1b[0m\n");
    assert_eq!(attr_values(&svg, "tspan", "dx"), vec!["2.80px"]);
    assert_eq!(attr_values(&svg, "tspan", "fill"), vec!["#00FF00", "#00FF00"]);
    assert_eq!(text_lines(&svg), vec!["界a"]);
}

#[test]
fn test_style_attributes() {
    let svg = render_ansi(Config::default(), "\x1b[3;4;9mx\x1b[0m\n");
    assert_eq!(attr_values(&svg, "tspan", "font-style"), vec!["italic"]);
    assert_eq!(
        attr_values(&svg, "tspan", "text-decoration"),
        vec!["underline line-through"]
    );
}

#[test]
fn test_explicit_size_clips() {
    let config = Config::default().with_dimensions(400.0, 300.0);
    let svg = render_code(config, "x\n");
    assert_eq!(root_size(&svg), (400.0, 300.0));
    assert_eq!(attr_values(&svg, "g", "clip-path"), vec!["url(#terminalMask)"]);
    assert_eq!(attr_values(&svg, "clipPath", "id"), vec!["terminalMask"]);

    let heights = attr_values(&svg, "rect", "height");
    assert_eq!(heights.last().map(String::as_str), Some("280.00"));
}

#[test]
fn test_auto_size_does_not_clip() {
    let svg = render_code(Config::default(), "x\n");
    assert!(attr_values(&svg, "g", "clip-path").is_empty());
    assert!(!svg.contains("<clipPath"));
}

#[test]
fn test_overflow_is_dropped() {
    let config = Config::default().with_dimensions(300.0, 80.0);
    let svg = render_code(config, "1\n2\n3\n4\n5\n");
    assert_eq!(text_lines(&svg), vec!["1", "2"]);
}

#[test]
fn test_border() {
    let config = Config::default().with_border(2.0, 4.0, "#FF0000");
    let svg = render_code(config, "ab\n");
    let panel = |attr| attr_values(&svg, "rect", attr)[0].clone();
    assert_eq!(panel("stroke"), "#FF0000");
    assert_eq!(panel("stroke-width"), "2.00");
    assert_eq!(panel("rx"), "4.00");
    assert_eq!(panel("width"), "61.00px");
    assert_eq!(panel("x"), "1.00px");
    assert_eq!(root_size(&svg).0, 65.0);
}

#[test]
fn test_shadow() {
    let config = Config::default().with_shadow(10.0, 0.0, 5.0);
    let svg = render_code(config, "x\n");
    assert_eq!(attr_values(&svg, "rect", "filter"), vec!["url(#shadow)"]);
    assert_eq!(attr_values(&svg, "filter", "id"), vec!["shadow"]);
    assert_eq!(attr_values(&svg, "feGaussianBlur", "stdDeviation"), vec!["10.00"]);
    assert_eq!(attr_values(&svg, "feOffset", "dy"), vec!["5.00"]);
}

#[test]
fn test_no_shadow_by_default() {
    let svg = render_code(Config::default(), "x\n");
    assert!(!svg.contains("<filter"));
    assert!(attr_values(&svg, "rect", "filter").is_empty());
}

#[test]
fn test_window_controls() {
    let config = Config::default().with_window(true).with_margin(&[10.0]);
    let svg = render_code(config, "x\n");
    assert_eq!(
        attr_values(&svg, "circle", "fill"),
        vec!["#FF5A54", "#E6BF29", "#52C12B"]
    );
    assert_eq!(attr_values(&svg, "circle", "cx"), vec!["13.50", "32.50", "51.50"]);
    // margin 10 + padding 20 + 15 clearance + one line advance
    assert_eq!(attr_values(&svg, "text", "y"), vec!["61.80px"]);
}

#[test]
fn test_embedded_font() {
    init_test_logging();
    let face = rime_core::FontFace::new("Custom", vec![0, 1, 2]);
    let svg = Generator::new(Config::default())
        .with_font_face(face)
        .generate_from_code("x\n", None)
        .unwrap();
    let svg = String::from_utf8(svg).unwrap();
    assert!(svg.contains("<style>@font-face { font-family: 'Custom'; src: url(data:font/ttf;base64,AAEC)"));
}

#[test]
fn test_escaping() {
    let svg = render_code(Config::default(), "a < b && c > d\n");
    assert!(svg.contains("a &lt; b &amp;&amp; c &gt; d"));
    assert_eq!(text_lines(&svg), vec!["a < b && c > d"]);
}

#[test]
fn test_malformed_skeleton() {
    let config = Config::default();
    let theme = Theme::new("t", "#FFFFFF").with_background("#000000");
    let layout = Layout::new(&config, &theme, false);

    let err = layout.run(Element::new("svg"), "").unwrap_err();
    assert!(matches!(err, RimeError::MalformedDocument(_)));

    let err = layout.run(Element::new("html"), "").unwrap_err();
    assert!(matches!(err, RimeError::MalformedDocument(_)));
}

#[test]
fn test_config_errors() {
    init_test_logging();
    let bad = [
        Config::default().with_font("mono", -1.0),
        Config::default().with_line_height(0.0),
        Config {
            lines: Some(rime_core::LineRange { start: 3, end: 1 }),
            ..Config::default()
        },
    ];
    for config in bad {
        let err = Generator::new(config).generate_from_code("x", None).unwrap_err();
        assert!(matches!(err, RimeError::InvalidConfig(_)), "{err}");
    }
}

#[test]
fn test_config_from_json() {
    let json = r##"{"theme":"dracula","padding":[10,20],"window":true,"font":{"size":16}}"##;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.padding, vec![10.0, 20.0]);
    assert_eq!(config.font.size, 16.0);
    assert_eq!(config.font.family, "JetBrains Mono");
    assert_eq!(config.line_height, 1.2);

    let svg = render_code(config, "x\n");
    assert_eq!(attr_values(&svg, "rect", "fill")[0], "#282A36");
}

#[test]
fn test_generator_shared_across_threads() {
    init_test_logging();
    let generator = Arc::new(highlighting(Config::default().with_line_numbers(true)));
    let expected = String::from_utf8(generator.generate_from_code(GO_SOURCE, None).unwrap()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let generator = Arc::clone(&generator);
            thread::spawn(move || generator.generate_from_code(GO_SOURCE, None).unwrap())
        })
        .collect();

    for handle in handles {
        let svg = String::from_utf8(handle.join().unwrap()).unwrap();
        assert_svg_eq(&expected, &svg);
    }
}
