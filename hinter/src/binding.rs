//! Splits property text into static and `{{ … }}` dynamic segments and
//! finds the segment under the cursor. Hints are only offered inside a
//! dynamic segment when any exist.

/// Splits `text` into consecutive segments; dynamic segments keep their
/// wrapping braces. Brace depth inside a binding is tracked so object
/// literals like `{{ {a: 1} }}` stay in one segment. An unterminated
/// binding runs to the end of the text.
pub fn segments(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut segment_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'{' && bytes.get(i + 1) == Some(&b'{') {
            if i > segment_start {
                out.push(&text[segment_start..i]);
            }
            let open = i;
            i += 2;
            let mut depth = 0usize;
            let end = loop {
                match bytes.get(i) {
                    None => break text.len(),
                    Some(b'{') => depth += 1,
                    Some(b'}') => {
                        if depth == 0 && bytes.get(i + 1) == Some(&b'}') {
                            break i + 2;
                        }
                        depth = depth.saturating_sub(1);
                    }
                    Some(_) => {}
                }
                i += 1;
            };
            out.push(&text[open..end]);
            segment_start = end;
            i = end;
        } else {
            i += 1;
        }
    }

    if segment_start < text.len() {
        out.push(&text[segment_start..]);
    }
    out
}

pub fn is_dynamic(segment: &str) -> bool {
    segment.starts_with("{{") && segment.ends_with("}}") && segment.len() >= 4
}

/// The dynamic segment containing byte column `ch`, with its start offset.
/// Returns `None` when the text has no dynamic segment under the cursor.
pub fn focused_segment(text: &str, ch: usize) -> Option<(usize, &str)> {
    let mut offset = 0;
    for segment in segments(text) {
        let end = offset + segment.len();
        if is_dynamic(segment) && offset <= ch && ch <= end {
            return Some((offset, segment));
        }
        offset = end;
    }
    None
}

/// Whether the text contains any dynamic segment at all.
pub fn has_bindings(text: &str) -> bool {
    segments(text).iter().any(|s| is_dynamic(s))
}
