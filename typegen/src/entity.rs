//! The live entity graph as the surrounding application hands it over.
//!
//! Entities are loosely typed: a kind discriminant plus a free-form bag of
//! live JSON values. The synthesizer only ever reads this map, once per
//! schema rebuild.

use indexmap::IndexMap;
use serde_json::Value;

/// Entity name → entity record. Names are unique; iteration order is the
/// application's own insertion order and is preserved all the way into the
/// emitted definition tree.
pub type EntityMap = IndexMap<String, Entity>;

/// One node of the builder's entity graph, keyed by kind before any
/// structural inspection happens.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// A canvas widget. `widget_type` selects the definition generator;
    /// `properties` carries the widget's live property values.
    Widget {
        widget_type: String,
        properties: Value,
    },
    /// A data-source action (query/API call) with its live configuration
    /// and last response under `properties`.
    Action { properties: Value },
    /// The global namespace object. Its schema is inferred structurally
    /// from the live value.
    GlobalObject { value: Value },
}

impl Entity {
    pub fn widget(widget_type: impl Into<String>, properties: Value) -> Self {
        Entity::Widget {
            widget_type: widget_type.into(),
            properties,
        }
    }

    pub fn action(properties: Value) -> Self {
        Entity::Action { properties }
    }

    pub fn global_object(value: Value) -> Self {
        Entity::GlobalObject { value }
    }
}

/// Reads an entity map from its application-state JSON shape:
/// `{ name: { "ENTITY_TYPE": "WIDGET" | "ACTION" | "GLOBAL_OBJECT", …fields } }`.
///
/// Records without a recognized `ENTITY_TYPE` are dropped. The discriminant
/// (and the widget-kind `type` field) never reaches the properties bag.
pub fn entity_map_from_value(value: &Value) -> EntityMap {
    let Some(records) = value.as_object() else {
        return EntityMap::new();
    };

    let mut out = EntityMap::new();
    for (name, record) in records {
        let Some(fields) = record.as_object() else {
            continue;
        };
        let kind = fields.get("ENTITY_TYPE").and_then(Value::as_str);
        let mut bag = fields.clone();
        bag.shift_remove("ENTITY_TYPE");

        let entity = match kind {
            Some("WIDGET") => {
                let Some(widget_type) = fields.get("type").and_then(Value::as_str) else {
                    continue;
                };
                bag.shift_remove("type");
                Entity::widget(widget_type, Value::Object(bag))
            }
            Some("ACTION") => Entity::action(Value::Object(bag)),
            Some("GLOBAL_OBJECT") => Entity::global_object(Value::Object(bag)),
            _ => continue,
        };
        out.insert(name.clone(), entity);
    }
    out
}
