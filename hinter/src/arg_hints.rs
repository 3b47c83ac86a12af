//! Function-signature hints: detecting the enclosing call on a line,
//! parsing the engine's `fn(…) -> ret` signature strings, and the cached
//! last-shown hint state.

use crate::buffer::{DocumentId, Position};

/// One parsed parameter of a callable signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureArg {
    pub name: String,
    pub ty: String,
}

/// The last signature hint shown. Kept until an edit lands at or before
/// `start`, or the cursor leaves the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgHints {
    pub doc: DocumentId,
    /// Position of the call's opening parenthesis.
    pub start: Position,
    pub name: String,
    pub args: Vec<SignatureArg>,
    pub ret: Option<String>,
    pub guess: bool,
}

/// The call the cursor sits inside on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CallSite {
    pub(crate) callee: String,
    /// Byte column of the opening parenthesis.
    pub(crate) paren_ch: usize,
    pub(crate) arg_index: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
}

/// Scans left from `ch` for the unmatched `(` of the call the cursor is in,
/// counting top-level commas along the way. Only searches within one line.
pub(crate) fn enclosing_call(line: &str, ch: usize) -> Option<CallSite> {
    let upto = ch.min(line.len());
    let mut depth = 0usize;
    let mut arg_index = 0;
    let mut paren_ch = None;

    for (idx, c) in line[..upto].char_indices().rev() {
        match c {
            ')' | ']' | '}' => depth += 1,
            '(' if depth == 0 => {
                paren_ch = Some(idx);
                break;
            }
            '(' | '[' | '{' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => arg_index += 1,
            _ => {}
        }
    }

    let paren_ch = paren_ch?;
    let callee_end = line[..paren_ch].trim_end().len();
    let callee_start = line[..callee_end]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_ident_char(*c))
        .last()
        .map(|(idx, _)| idx)?;
    let callee = &line[callee_start..callee_end];
    if callee.is_empty() {
        return None;
    }

    Some(CallSite {
        callee: callee.to_string(),
        paren_ch,
        arg_index,
    })
}

/// Parses `fn(a: string, b: fn() -> ?) -> bool` into parameters and return
/// type. Nested parentheses, brackets, and braces inside parameter types
/// are respected. Returns `None` for anything that is not a callable
/// signature.
pub fn parse_signature(sig: &str) -> Option<(Vec<SignatureArg>, Option<String>)> {
    let body = sig.strip_prefix("fn(")?;

    let mut depth = 0usize;
    let mut close = None;
    for (idx, c) in body.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' if depth > 0 => depth -= 1,
            ')' => {
                close = Some(idx);
                break;
            }
            _ => {}
        }
    }
    let close = close?;

    let params = &body[..close];
    let mut args = Vec::new();
    if !params.trim().is_empty() {
        for param in split_top_level(params) {
            let (name, ty) = match split_param(param) {
                Some(pair) => pair,
                None => (param.trim(), "?"),
            };
            args.push(SignatureArg {
                name: name.trim_end_matches('?').to_string(),
                ty: ty.to_string(),
            });
        }
    }

    let ret = body[close + 1..]
        .trim()
        .strip_prefix("->")
        .map(|r| r.trim().to_string());
    Some((args, ret))
}

/// Splits at top-level commas only.
fn split_top_level(params: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in params.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(&params[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    out.push(&params[start..]);
    out
}

/// Splits one `name: type` parameter at its top-level colon.
fn split_param(param: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (idx, c) in param.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                return Some((param[..idx].trim(), param[idx + 1..].trim()));
            }
            _ => {}
        }
    }
    None
}
