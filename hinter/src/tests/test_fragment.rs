use crate::buffer::{Position, StringBuffer};
use crate::protocol::FileSpec;
use crate::sync::{SyncConfig, fragment_around};

/// 300 lines: filler, then a function at `fn_line` whose indented body runs
/// to `close_line` where a `}` dedents back to column zero.
fn big_buffer(fn_line: usize, close_line: usize) -> StringBuffer {
    let mut lines = Vec::new();
    for idx in 0..300 {
        if idx == fn_line {
            lines.push("function handleRow(row) {".to_string());
        } else if idx > fn_line && idx < close_line {
            lines.push(format!("    count += {idx};"));
        } else if idx == close_line {
            lines.push("}".to_string());
        } else {
            lines.push(format!("var filler{idx} = 0;"));
        }
    }
    StringBuffer::new(&lines.join("\n"))
}

fn part(spec: FileSpec) -> (String, usize) {
    match spec {
        FileSpec::Part { text, offset_lines, .. } => (text, offset_lines),
        FileSpec::Full { .. } => panic!("expected a fragment"),
    }
}

#[test]
fn test_window_starts_at_enclosing_function_boundary() {
    let buffer = big_buffer(90, 200);
    let cursor = Position::new(100, 4);
    let spec = fragment_around(&buffer, "[doc]", cursor, cursor, &SyncConfig::default());

    let (text, offset) = part(spec);
    assert_eq!(offset, 90);
    assert!(text.starts_with("function handleRow"));
}

#[test]
fn test_window_ends_within_scan_down_limit() {
    let buffer = big_buffer(90, 200);
    let cursor = Position::new(100, 4);
    let spec = fragment_around(&buffer, "[doc]", cursor, cursor, &SyncConfig::default());

    let (text, offset) = part(spec);
    let line_count = text.lines().count();
    // From line 90 to at most cursor + 20.
    assert!(offset + line_count <= 100 + 20 + 1);
    assert!(line_count >= 100 - 90);
}

#[test]
fn test_window_stops_at_dedent_below_boundary_indent() {
    // Function body closes shortly after the cursor.
    let buffer = big_buffer(90, 105);
    let cursor = Position::new(100, 4);
    let spec = fragment_around(&buffer, "[doc]", cursor, cursor, &SyncConfig::default());

    let (text, offset) = part(spec);
    assert_eq!(offset, 90);
    // The window ends at the dedented `}` line, exclusive.
    assert_eq!(text.lines().count(), 105 - 90);
    assert!(!text.contains("var filler106"));
}

#[test]
fn test_no_boundary_falls_back_to_line_above() {
    let mut lines = Vec::new();
    for idx in 0..300 {
        lines.push(format!("var filler{idx} = 0;"));
    }
    let buffer = StringBuffer::new(&lines.join("\n"));
    let cursor = Position::new(100, 0);
    let spec = fragment_around(&buffer, "[doc]", cursor, cursor, &SyncConfig::default());

    let (_, offset) = part(spec);
    assert_eq!(offset, 99);
}

#[test]
fn test_boundary_search_is_bounded() {
    // Function sits 60 lines above the cursor: outside the 50-line scan.
    let buffer = big_buffer(30, 200);
    let cursor = Position::new(95, 4);
    let spec = fragment_around(&buffer, "[doc]", cursor, cursor, &SyncConfig::default());

    let (_, offset) = part(spec);
    assert_eq!(offset, 94);
}

#[test]
fn test_function_keyword_requires_word_boundary() {
    let mut lines = Vec::new();
    for idx in 0..300 {
        lines.push(format!("var myfunctional{idx} = 0;"));
    }
    let buffer = StringBuffer::new(&lines.join("\n"));
    let cursor = Position::new(100, 0);
    let spec = fragment_around(&buffer, "[doc]", cursor, cursor, &SyncConfig::default());

    let (_, offset) = part(spec);
    assert_eq!(offset, 99);
}
