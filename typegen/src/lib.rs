//! Synthesizes a structural type schema from the builder's live entity graph.
//!
//! The output is a named definition set in the analysis engine's JSON format:
//! entity roots and dotted property paths as entries, hoisted array-element
//! and alias definitions under `!define`. Synthesis is pure, total, and
//! deterministic for a given entity-map iteration order; unknown shapes
//! degrade to omission or `?`, never to an error.

use serde_json::Value;
use tracing::{debug, trace};

mod def;
mod entity;
mod globals;
mod infer;
mod registry;

pub use def::{Def, DefMap, DefSource, SKIPPED_META_KEYS, is_meta_key};
pub use entity::{Entity, EntityMap, entity_map_from_value};
pub use globals::{global_defs, global_functions};
pub use infer::{ExtraDefs, infer_value};
pub use registry::{WidgetDef, WidgetDefFn, WidgetRegistry, action_def};

use indexmap::IndexMap;

/// Name under which the entity-graph definition set is registered.
pub const DATA_TREE: &str = "dataTree";

/// Name under which auxiliary host-provided definitions are registered.
pub const CUSTOM_DATA_TREE: &str = "customDataTree";

/// Builds the `dataTree` definition set from the live entity map.
pub fn synthesize(entities: &EntityMap) -> DefSource {
    synthesize_with(entities, WidgetRegistry::builtin())
}

/// `synthesize` against an explicit widget registry.
pub fn synthesize_with(entities: &EntityMap, registry: &WidgetRegistry) -> DefSource {
    let mut out = DefSource::new(DATA_TREE);
    let mut extra = ExtraDefs::new();

    for (name, entity) in entities {
        match entity {
            Entity::Widget {
                widget_type,
                properties,
            } => {
                let def = registry.resolve(widget_type)(properties, &mut extra);
                if def.properties.is_empty() && def.default_property.is_none() {
                    trace!(entity = %name, kind = %widget_type, "unknown widget kind skipped");
                    continue;
                }
                for (prop, prop_def) in &def.properties {
                    if !is_meta_key(prop) {
                        out.entries
                            .insert(format!("{name}.{prop}"), prop_def.clone());
                    }
                }
                if let Some(default) = def.default_property {
                    out.entries
                        .insert(name.clone(), Def::Ref(format!("{name}.{default}")));
                }
            }
            Entity::Action { properties } => {
                let def = action_def(properties, &mut extra);
                for (prop, prop_def) in &def {
                    if !is_meta_key(prop) {
                        out.entries
                            .insert(format!("{name}.{prop}"), prop_def.clone());
                    }
                }
                out.entries.insert(name.clone(), Def::Obj(def));
            }
            Entity::GlobalObject { value } => {
                let def = infer_value(value, &mut extra);
                out.entries.insert(name.clone(), def.clone());
                if let Def::Obj(map) = &def {
                    let mut flattened = Vec::new();
                    flatten_paths(map, name, &mut flattened);
                    for (path, path_def) in flattened {
                        out.entries.insert(path, path_def);
                    }
                }
            }
        }
    }

    for (name, def) in global_functions() {
        out.entries.insert(name, def);
    }
    out.defines = global_defs();
    out.defines.extend(extra.into_defs());

    debug!(
        entities = entities.len(),
        entries = out.entries.len(),
        defines = out.defines.len(),
        "synthesized data tree definitions"
    );
    out
}

/// Builds the auxiliary `customDataTree` definition set from a plain
/// name → live-value map supplied by the host.
pub fn synthesize_custom(tree: &IndexMap<String, Value>) -> DefSource {
    let mut out = DefSource::new(CUSTOM_DATA_TREE);
    let mut extra = ExtraDefs::new();

    for (name, value) in tree {
        let def = infer_value(value, &mut extra);
        out.entries.insert(name.clone(), def.clone());
        if let Def::Obj(map) = &def {
            let mut flattened = Vec::new();
            flatten_paths(map, name, &mut flattened);
            for (path, path_def) in flattened {
                out.entries.insert(path, path_def);
            }
        }
    }

    out.defines = extra.into_defs();
    out
}

/// Emits a dotted-path entry for every key at every depth of `map`.
/// Child paths land before their parent's own entry.
fn flatten_paths(map: &DefMap, parent: &str, out: &mut Vec<(String, Def)>) {
    for (key, value) in map {
        let path = format!("{parent}.{key}");
        if let Def::Obj(inner) = value {
            flatten_paths(inner, &path, out);
        }
        out.push((path, value.clone()));
    }
}
