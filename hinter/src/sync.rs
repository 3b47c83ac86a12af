//! Decides how much of a document the engine must see for a query: nothing,
//! a bounded fragment, or the full text. Fragments bound the per-keystroke
//! payload on large documents; every uncertain case falls back to a full
//! sync.

use std::time::Duration;

use crate::buffer::{BufferProvider, DocumentId, Position, TextBuffer};
use crate::document::DocumentSet;
use crate::protocol::FileSpec;

pub const DEFAULT_BIG_DOC_LINES: usize = 250;
pub const DEFAULT_FRAGMENT_MAX_SPAN: usize = 100;
pub const DEFAULT_FRAGMENT_SCAN_UP: usize = 50;
pub const DEFAULT_FRAGMENT_SCAN_DOWN: usize = 20;
pub const DEFAULT_RESYNC_DEBOUNCE: Duration = Duration::from_millis(200);

/// Tuning knobs for the sync heuristics. These are performance parameters,
/// not correctness requirements; any values still produce correct syncs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// A document longer than this is "large" and eligible for fragments.
    pub big_doc_lines: usize,
    /// Dirty spans at or above this force a full sync (and trigger the
    /// deferred resync on large documents).
    pub fragment_max_span: usize,
    /// How far above the query to look for an enclosing function boundary.
    pub fragment_scan_up: usize,
    /// How far below the query a fragment may extend.
    pub fragment_scan_down: usize,
    /// Quiet period before a deferred large-document resync fires.
    pub resync_debounce: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            big_doc_lines: DEFAULT_BIG_DOC_LINES,
            fragment_max_span: DEFAULT_FRAGMENT_MAX_SPAN,
            fragment_scan_up: DEFAULT_FRAGMENT_SCAN_UP,
            fragment_scan_down: DEFAULT_FRAGMENT_SCAN_DOWN,
            resync_debounce: DEFAULT_RESYNC_DEBOUNCE,
        }
    }
}

/// What a query request must carry: document payloads, the name the query
/// runs against, and the line offset to rebase query/response coordinates
/// when the payload is a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SyncPlan {
    pub(crate) files: Vec<FileSpec>,
    pub(crate) file_ref: String,
    pub(crate) offset_lines: usize,
}

pub(crate) fn build_plan(
    docs: &mut DocumentSet,
    provider: &dyn BufferProvider,
    id: DocumentId,
    buffer: &dyn TextBuffer,
    query_start: Position,
    query_end: Position,
    allow_fragments: bool,
    config: &SyncConfig,
) -> SyncPlan {
    let record = docs.ensure(id);
    let mut files = Vec::new();
    let mut offset_lines = 0;
    let mut file_ref = record.name.clone();

    if !record.synced_once && record.dirty.is_none() {
        files.push(FileSpec::Full {
            name: record.name.clone(),
            text: buffer.text(),
        });
        record.synced_once = true;
    } else if let Some(dirty) = record.dirty {
        let fragment_fits = buffer.line_count() > config.big_doc_lines
            && allow_fragments
            && dirty.span() < config.fragment_max_span
            && dirty.from <= query_start.line
            && dirty.to > query_end.line;
        if fragment_fits {
            let fragment = fragment_around(buffer, &record.name, query_start, query_end, config);
            offset_lines = fragment_offset(&fragment);
            files.push(fragment);
            file_ref = "#0".to_string();
        } else {
            files.push(FileSpec::Full {
                name: record.name.clone(),
                text: buffer.text(),
            });
            record.dirty = None;
            record.resync_due = None;
            record.synced_once = true;
        }
    }

    // Flush every other dirty document in the same batch so cross-document
    // references resolve against current text.
    for other in docs.other_dirty(id) {
        let Some(other_buffer) = provider.buffer(other) else {
            continue;
        };
        let Some(other_record) = docs.get_mut(other) else {
            continue;
        };
        files.push(FileSpec::Full {
            name: other_record.name.clone(),
            text: other_buffer.text(),
        });
        other_record.dirty = None;
        other_record.resync_due = None;
        other_record.synced_once = true;
    }

    SyncPlan {
        files,
        file_ref,
        offset_lines,
    }
}

fn fragment_offset(fragment: &FileSpec) -> usize {
    match fragment {
        FileSpec::Part { offset_lines, .. } => *offset_lines,
        FileSpec::Full { .. } => 0,
    }
}

const TAB_SIZE: usize = 4;

/// Visual column of the first non-whitespace character, tabs at `TAB_SIZE`.
fn indent_column(line: &str) -> usize {
    let mut column = 0;
    for c in line.chars() {
        match c {
            ' ' => column += 1,
            '\t' => column += TAB_SIZE - (column % TAB_SIZE),
            _ => break,
        }
    }
    column
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Whether the line contains the `function` keyword at a word boundary.
fn has_function_keyword(line: &str) -> bool {
    let mut rest = line;
    let mut consumed = 0;
    while let Some(at) = rest.find("function") {
        let start = consumed + at;
        let end = start + "function".len();
        let before_ok = line[..start].chars().next_back().is_none_or(|c| !is_ident_char(c));
        let after_ok = line[end..].chars().next().is_none_or(|c| !is_ident_char(c));
        if before_ok && after_ok {
            return true;
        }
        consumed = start + "function".len();
        rest = &line[consumed..];
    }
    false
}

/// Extracts a bounded window around the query: upward to the nearest
/// enclosing function-like boundary at minimal indent, downward a short way
/// past the query, stopping at a dedent back to the boundary's level.
pub(crate) fn fragment_around(
    buffer: &dyn TextBuffer,
    name: &str,
    start: Position,
    end: Position,
    config: &SyncConfig,
) -> FileSpec {
    let mut min_indent: Option<usize> = None;
    let mut min_line: Option<usize> = None;

    let scan_floor = start.line.saturating_sub(config.fragment_scan_up);
    let mut p = start.line;
    while p > scan_floor {
        p -= 1;
        let Some(line) = buffer.line(p) else {
            continue;
        };
        if !has_function_keyword(line) {
            continue;
        }
        let indent = indent_column(line);
        if min_indent.is_some_and(|seen| seen <= indent) {
            continue;
        }
        min_indent = Some(indent);
        min_line = Some(p);
    }

    let from_line = min_line.unwrap_or_else(|| start.line.saturating_sub(1));
    let max_line = buffer.last_line().min(end.line + config.fragment_scan_down);

    let start_indent = buffer.line(start.line).map(indent_column);
    let end_line = match min_indent {
        None => max_line,
        Some(indent) if start_indent == Some(indent) => max_line,
        Some(indent) => {
            let mut candidate = end.line + 1;
            while candidate < max_line {
                let dedented = buffer
                    .line(candidate)
                    .is_some_and(|line| indent_column(line) <= indent);
                if dedented {
                    break;
                }
                candidate += 1;
            }
            candidate
        }
    };

    let include_end_line = end_line == end.line;
    let mut text = String::new();
    let upper = if include_end_line { end_line + 1 } else { end_line };
    for idx in from_line..upper {
        if idx > from_line {
            text.push('\n');
        }
        text.push_str(buffer.line(idx).unwrap_or(""));
    }
    if !include_end_line {
        text.push('\n');
    }

    FileSpec::Part {
        name: name.to_string(),
        text,
        offset_lines: from_line,
    }
}
