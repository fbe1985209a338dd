use pretty_assertions::assert_eq;
use rime_terminal::{interpret, strip_ansi, wrap, CellMetrics};

fn metrics() -> CellMetrics {
    CellMetrics::new(14.0, 1.2)
}

#[test]
fn parser_applies_sgr_attributes_and_colors() {
    let grid = interpret("\x1b[1;38;5;196mB", 1, metrics());
    let run = grid.lines[0].iter().find(|r| r.text == "B").expect("run for B");
    assert_eq!(run.style.fill.as_deref(), Some("#ff0000"));
    assert!(!run.style.italic);
}

#[test]
fn parser_text_matches_stripped_input() {
    let input = "\x1b[32mok\x1b[0m done\n\x1b[3mslanted\x1b[23m plain\n\x1b]0;title\x07tail";
    let stripped = strip_ansi(input);
    let lines: Vec<&str> = stripped.split('\n').collect();
    let grid = interpret(input, lines.len(), metrics());
    for (row, line) in lines.iter().enumerate() {
        assert_eq!(grid.line_text(row), *line);
    }
}

#[test]
fn parser_survives_malformed_sequences() {
    let inputs = [
        "\x1b[",
        "\x1b[3",
        "\x1b[38;5",
        "\x1b[38;5;",
        "\x1b[48;2;1;2",
        "\x1b]",
        "\x1b[999999999m",
        "\x1b[;;;m",
    ];
    for input in inputs {
        let grid = interpret(&format!("{input}x"), 1, metrics());
        assert!(grid.line_text(0).len() <= 1, "{input:?}");
        assert!(grid.backgrounds.is_empty(), "{input:?}");
    }
}

#[test]
fn wrapped_output_keeps_backgrounds_per_line() {
    let wrapped = wrap("\x1b[41mabcdef\x1b[0m", 3);
    assert_eq!(strip_ansi(&wrapped), "abc\ndef");

    let grid = interpret(&wrapped, 2, metrics());
    let rows: Vec<usize> = grid.backgrounds.iter().map(|bg| bg.row).collect();
    assert_eq!(rows, vec![0, 1]);
    for bg in &grid.backgrounds {
        assert_eq!(bg.fill, "#FF0000");
        assert_eq!(bg.col, 0);
        assert_eq!(bg.cells, 3);
    }
    assert_eq!(grid.line_text(1), "def");
}

#[test]
fn wrapped_output_keeps_foreground_after_break() {
    let wrapped = wrap("\x1b[32;44mabcd", 2);
    let grid = interpret(&wrapped, 2, metrics());

    assert_eq!(grid.backgrounds.len(), 2);
    let fills: Vec<_> = grid.lines[1]
        .iter()
        .filter(|run| !run.text.is_empty())
        .map(|run| run.style.fill.as_deref())
        .collect();
    assert_eq!(fills, vec![Some("#00FF00")]);
}
