//! Classifies and orders raw completion candidates for display.
//!
//! The ordering inside the schema partition (alphabetical, callables last)
//! and the Best Match / Search results grouping are display policy; both
//! live here and nowhere else.

use std::cmp::Ordering;

/// Coarse semantic type of a candidate, classified from the engine's type
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Object,
    Number,
    Array,
    Function,
    Boolean,
    String,
    Unknown,
}

/// Classifies an engine type string such as `"fn(x: number) -> bool"`,
/// `"[def$0]"`, or `"string"`.
pub fn data_type_of(type_str: Option<&str>) -> DataType {
    match type_str {
        None => DataType::Unknown,
        Some("?") => DataType::Unknown,
        Some("number") => DataType::Number,
        Some("string") => DataType::String,
        Some("bool") => DataType::Boolean,
        Some("array") => DataType::Array,
        Some(t) if t.starts_with("fn(") => DataType::Function,
        Some(t) if t.starts_with('[') => DataType::Array,
        Some(_) => DataType::Object,
    }
}

/// Maps the surrounding binding's declared type to the candidate type it
/// should favor. Unrecognized hints produce no expectation at all.
pub fn expected_data_type(hint: Option<&str>) -> Option<DataType> {
    match hint? {
        "Array" | "Array<Object>" => Some(DataType::Array),
        "boolean" => Some(DataType::Boolean),
        "string" => Some(DataType::String),
        "number" => Some(DataType::Number),
        "object" | "JSON" => Some(DataType::Object),
        _ => None,
    }
}

pub const BEST_MATCH_HEADER: &str = "Best Match";
pub const SEARCH_RESULTS_HEADER: &str = "Search results";

/// One display-ready completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub display_text: String,
    pub data_type: DataType,
    /// Engine origin tag: the schema set name, a library set name, or a
    /// document name for document-local candidates.
    pub origin: String,
    pub doc: Option<String>,
    pub url: Option<String>,
    /// Non-selectable group label rows.
    pub is_header: bool,
}

impl Completion {
    fn header(label: &str) -> Completion {
        Completion {
            text: label.to_string(),
            display_text: label.to_string(),
            data_type: DataType::Unknown,
            origin: String::new(),
            doc: None,
            url: None,
            is_header: true,
        }
    }

    fn is_local(&self) -> bool {
        self.origin.starts_with("[doc")
    }
}

/// Alphabetical (case-insensitive), callables after everything else.
fn schema_order(a: &Completion, b: &Completion) -> Ordering {
    match (
        a.data_type == DataType::Function,
        b.data_type == DataType::Function,
    ) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => a.text.to_lowercase().cmp(&b.text.to_lowercase()),
    }
}

/// Orders candidates for display: document-local first, then schema-sourced,
/// then the rest. With a known expected type and a mixed schema partition,
/// the schema partition splits into labeled Best Match / Search results
/// groups.
pub fn rank(
    completions: Vec<Completion>,
    schema_origin: &str,
    expected: Option<DataType>,
) -> Vec<Completion> {
    let mut local = Vec::new();
    let mut schema = Vec::new();
    let mut other = Vec::new();
    for completion in completions {
        if completion.is_local() {
            local.push(completion);
        } else if completion.origin == schema_origin {
            schema.push(completion);
        } else {
            other.push(completion);
        }
    }

    schema.sort_by(schema_order);

    let mut out = local;
    match expected {
        Some(expected_type) => {
            let (mut matching, mut rest): (Vec<Completion>, Vec<Completion>) = schema
                .into_iter()
                .partition(|c| c.data_type == expected_type);
            if !matching.is_empty() && !rest.is_empty() {
                matching.insert(0, Completion::header(BEST_MATCH_HEADER));
                rest.insert(0, Completion::header(SEARCH_RESULTS_HEADER));
            }
            out.extend(matching);
            out.extend(rest);
        }
        None => out.extend(schema),
    }
    out.extend(other);
    out
}
