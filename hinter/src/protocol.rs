//! Wire protocol toward the static-analysis engine, and the engine seam
//! itself. The engine is a black box: definition sets in, one request /
//! response at a time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::buffer::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Completions,
    Type,
    Documentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    #[serde(rename = "type")]
    pub kind: QueryKind,
    pub types: bool,
    pub docs: bool,
    pub urls: bool,
    pub origins: bool,
    #[serde(rename = "caseInsensitive")]
    pub case_insensitive: bool,
    pub guess: bool,
    #[serde(rename = "lineCharPositions")]
    pub line_char_positions: bool,
    #[serde(rename = "preferFunction", skip_serializing_if = "std::ops::Not::not")]
    #[serde(default)]
    pub prefer_function: bool,
    pub end: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub start: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub file: Option<String>,
}

impl Query {
    pub fn completions(end: Position) -> Self {
        Query {
            kind: QueryKind::Completions,
            types: true,
            docs: true,
            urls: true,
            origins: true,
            case_insensitive: true,
            guess: false,
            line_char_positions: true,
            prefer_function: false,
            end,
            start: None,
            file: None,
        }
    }

    /// A type or documentation lookup at `end`.
    pub fn context(kind: QueryKind, end: Position) -> Self {
        Query {
            kind,
            types: true,
            docs: true,
            urls: true,
            origins: false,
            case_insensitive: false,
            guess: false,
            line_char_positions: true,
            prefer_function: false,
            end,
            start: None,
            file: None,
        }
    }
}

/// One document payload inside a request: the whole buffer, or a bounded
/// window of a large one with its line offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileSpec {
    Full {
        name: String,
        text: String,
    },
    Part {
        name: String,
        text: String,
        #[serde(rename = "offsetLines")]
        offset_lines: usize,
    },
}

impl FileSpec {
    pub fn name(&self) -> &str {
        match self {
            FileSpec::Full { name, .. } | FileSpec::Part { name, .. } => name,
        }
    }
}

/// A request: at most one query, plus any document payloads that must reach
/// the engine before the query runs. A files-only request is a pure sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub query: Option<Query>,
    pub files: Vec<FileSpec>,
}

impl Request {
    pub fn sync(files: Vec<FileSpec>) -> Self {
        Request { query: None, files }
    }
}

/// One raw completion candidate as the engine reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawCompletion {
    pub name: String,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub ty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub url: Option<String>,
}

/// Engine response. Which fields are populated depends on the query kind;
/// type/documentation lookups fill `ty`/`doc`/`url` instead of `completions`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub completions: Vec<RawCompletion>,
    #[serde(default)]
    pub start: Option<Position>,
    #[serde(default)]
    pub end: Option<Position>,
    #[serde(default)]
    pub guess: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub ty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub url: Option<String>,
}

/// Error value the engine reports for a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

/// The static-analysis engine as this crate needs it. One instance per
/// editing context; a single request is in flight at a time.
pub trait AnalysisEngine {
    /// Registers a named definition set, in the wire JSON shape.
    /// `at_front` gives the set precedence over previously added ones.
    fn add_defs(&mut self, defs: Value, at_front: bool);

    /// Removes a definition set by its `!name`.
    fn delete_defs(&mut self, name: &str);

    fn request(&mut self, request: &Request) -> Result<Response, EngineError>;
}
