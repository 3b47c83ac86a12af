//! The type-definition tree emitted toward the analysis engine.
//!
//! The wire form is the engine's JSON definition format: a flat-ish object
//! whose keys are entity names or dotted property paths and whose values are
//! primitive tags, references, callable signatures, or nested objects, plus
//! a `!define` table of named auxiliary definitions.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Insertion-ordered definition table. Key order is never sorted here;
/// whatever order entries were registered in is the order on the wire.
pub type DefMap = IndexMap<String, Def>;

/// Keys that definition generators may emit for tooling but that must not
/// become completable dotted-path entries.
pub const SKIPPED_META_KEYS: [&str; 2] = ["!doc", "!url"];

pub fn is_meta_key(key: &str) -> bool {
    SKIPPED_META_KEYS.contains(&key)
}

/// One node of the definition tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Def {
    /// `"string"`
    Str,
    /// `"number"`
    Num,
    /// `"bool"`
    Bool,
    /// `"?"`: null, undefined, or anything unrecognized.
    Unknown,
    /// A reference to another entry or named definition, e.g. `"Text1.text"`.
    Ref(String),
    /// An array whose element type is the named definition: `"[name]"`.
    /// `name` is a primitive tag, an alias from `!define`, or a hoisted key.
    ArrayOf(String),
    /// A callable signature carried verbatim, e.g. `"fn(x: number) -> string"`.
    Fn(String),
    /// Documentation/meta text under a `!doc` or `!url` key.
    Doc(String),
    /// A nested object definition.
    Obj(DefMap),
}

impl Def {
    pub fn obj(entries: impl IntoIterator<Item = (String, Def)>) -> Def {
        Def::Obj(entries.into_iter().collect())
    }

    pub fn is_callable(&self) -> bool {
        match self {
            Def::Fn(_) => true,
            Def::Obj(map) => map.keys().any(|k| k == "!type"),
            _ => false,
        }
    }

    fn atom(&self) -> Option<&str> {
        match self {
            Def::Str => Some("string"),
            Def::Num => Some("number"),
            Def::Bool => Some("bool"),
            Def::Unknown => Some("?"),
            Def::Ref(path) => Some(path),
            Def::Fn(sig) => Some(sig),
            Def::Doc(text) => Some(text),
            Def::ArrayOf(_) | Def::Obj(_) => None,
        }
    }
}

impl Serialize for Def {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Def::ArrayOf(name) => serializer.serialize_str(&format!("[{name}]")),
            Def::Obj(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            other => serializer.serialize_str(other.atom().unwrap_or("?")),
        }
    }
}

/// A complete named definition set: the unit handed to the analysis engine
/// and the unit replaced atomically on rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefSource {
    pub name: String,
    pub entries: DefMap,
    pub defines: DefMap,
}

impl DefSource {
    pub fn new(name: impl Into<String>) -> Self {
        DefSource {
            name: name.into(),
            entries: DefMap::new(),
            defines: DefMap::new(),
        }
    }

    /// Wire form: `{"!name": …, <entries…>, "!define": {…}}`.
    pub fn to_json(&self) -> Value {
        let mut out = serde_json::Map::new();
        out.insert("!name".into(), Value::String(self.name.clone()));
        for (key, value) in &self.entries {
            out.insert(key.clone(), to_value(value));
        }
        out.insert(
            "!define".into(),
            Value::Object(
                self.defines
                    .iter()
                    .map(|(k, v)| (k.clone(), to_value(v)))
                    .collect(),
            ),
        );
        Value::Object(out)
    }
}

fn to_value(def: &Def) -> Value {
    // Serialize is infallible for Def: only strings and maps are emitted.
    serde_json::to_value(def).unwrap_or(Value::String("?".into()))
}
