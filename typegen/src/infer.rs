//! Structural type inference over live JSON values.
//!
//! Array element definitions are hoisted into an accumulator table and
//! referenced by a generated key, so the emitted tree stays acyclic and
//! boundedly shallow regardless of how deep the live value nests.

use serde_json::Value;

use crate::def::{Def, DefMap};

/// Per-synthesis accumulator for hoisted definitions. Threaded explicitly
/// through inference; one instance per `synthesize` call, never shared.
#[derive(Debug, Default)]
pub struct ExtraDefs {
    defs: DefMap,
    next_key: u32,
}

impl ExtraDefs {
    pub fn new() -> Self {
        ExtraDefs::default()
    }

    /// Registers `def` under a fresh generated key and returns the key.
    /// Keys are counter-based so identical inputs produce identical output.
    pub fn hoist(&mut self, def: Def) -> String {
        let key = format!("def${}", self.next_key);
        self.next_key += 1;
        self.defs.insert(key.clone(), def);
        key
    }

    pub fn into_defs(self) -> DefMap {
        self.defs
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Infers a definition from a live value. Total: anything unrecognized
/// degrades to `?`, never an error.
///
/// Arrays infer from their first element only; an empty array is an
/// unknown-element array.
pub fn infer_value(value: &Value, extra: &mut ExtraDefs) -> Def {
    match value {
        Value::String(_) => Def::Str,
        Value::Number(_) => Def::Num,
        Value::Bool(_) => Def::Bool,
        Value::Null => Def::Unknown,
        Value::Array(items) => match items.first() {
            Some(first) => {
                let element = infer_value(first, extra);
                Def::ArrayOf(extra.hoist(element))
            }
            None => Def::ArrayOf("?".into()),
        },
        Value::Object(map) => Def::Obj(
            map.iter()
                .map(|(key, item)| (key.clone(), infer_value(item, extra)))
                .collect(),
        ),
    }
}
