//! The text-editing surface as a capability: line access plus change events
//! delivered by the host. Columns are UTF-8 byte offsets within their line.

use serde::{Deserialize, Serialize};

/// A line/column position. `ch` is a UTF-8 byte column. Ordering is
/// line-major, so derived `Ord` gives document order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Position { line, ch }
    }
}

/// One buffer edit as the editor surface reports it: the replaced range in
/// pre-edit coordinates and the inserted text, split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub from: Position,
    pub to: Position,
    pub inserted: Vec<String>,
}

impl Change {
    /// Last line index the inserted text occupies, in post-edit coordinates.
    pub fn inserted_end_line(&self) -> usize {
        self.from.line + self.inserted.len().max(1) - 1
    }
}

/// Host identifier for one open buffer. Assigned by the host; the core only
/// requires it to be stable while the buffer is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

/// Read access to an open text buffer.
pub trait TextBuffer {
    fn line_count(&self) -> usize;
    fn line(&self, idx: usize) -> Option<&str>;
    fn text(&self) -> String;

    fn last_line(&self) -> usize {
        self.line_count().saturating_sub(1)
    }
}

/// Resolves document ids to their buffers for the duration of one call.
/// Lets the core flush other dirty documents in the same request batch.
pub trait BufferProvider {
    fn buffer(&self, id: DocumentId) -> Option<&dyn TextBuffer>;
}

/// A plain line-vector buffer. Hosts with their own rope/document type
/// implement [`TextBuffer`] directly; this one covers tests and simple
/// embeddings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringBuffer {
    lines: Vec<String>,
}

impl StringBuffer {
    pub fn new(text: &str) -> Self {
        StringBuffer {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Splices `change` into the buffer, the same way the editor applies it.
    pub fn apply(&mut self, change: &Change) {
        let from_line = change.from.line.min(self.lines.len().saturating_sub(1));
        let to_line = change.to.line.min(self.lines.len().saturating_sub(1));

        let head = self.lines[from_line]
            .get(..change.from.ch)
            .unwrap_or(&self.lines[from_line])
            .to_string();
        let tail = self.lines[to_line]
            .get(change.to.ch..)
            .unwrap_or("")
            .to_string();

        let mut inserted = if change.inserted.is_empty() {
            vec![String::new()]
        } else {
            change.inserted.clone()
        };
        if inserted.len() == 1 {
            inserted[0] = format!("{head}{}{tail}", inserted[0]);
        } else {
            inserted[0] = format!("{head}{}", inserted[0]);
            let last = inserted.len() - 1;
            inserted[last] = format!("{}{tail}", inserted[last]);
        }

        self.lines.splice(from_line..=to_line, inserted);
    }
}

impl TextBuffer for StringBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    fn text(&self) -> String {
        self.lines.join("\n")
    }
}
