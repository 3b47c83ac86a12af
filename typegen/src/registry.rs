//! Widget-kind → definition generator registry, plus the fixed action shape.
//!
//! Generators are pure functions over the entity's live properties. Parts of
//! a widget's schema that depend on user data (table rows, list items) are
//! inferred from the live value through the shared hoisting accumulator.

use std::sync::LazyLock;

use serde_json::Value;

use crate::def::{Def, DefMap};
use crate::infer::{ExtraDefs, infer_value};

/// A widget's generated schema: a flat property map plus the property the
/// entity root should resolve to when referenced bare.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetDef {
    pub properties: DefMap,
    pub default_property: Option<&'static str>,
}

pub type WidgetDefFn = fn(&Value, &mut ExtraDefs) -> WidgetDef;

/// Lookup table from widget-kind tag to generator. Unknown kinds resolve to
/// a no-op generator, so they contribute nothing to the schema.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    generators: Vec<(&'static str, WidgetDefFn)>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        WidgetRegistry::default()
    }

    pub fn register(&mut self, kind: &'static str, generator: WidgetDefFn) {
        self.generators.push((kind, generator));
    }

    pub fn resolve(&self, kind: &str) -> WidgetDefFn {
        self.generators
            .iter()
            .find(|(tag, _)| *tag == kind)
            .map(|(_, generator)| *generator)
            .unwrap_or(unknown_widget)
    }

    pub fn builtin() -> &'static WidgetRegistry {
        &BUILTIN_WIDGETS
    }
}

static BUILTIN_WIDGETS: LazyLock<WidgetRegistry> = LazyLock::new(|| {
    let mut registry = WidgetRegistry::new();
    registry.register("TEXT_WIDGET", text_widget);
    registry.register("INPUT_WIDGET", input_widget);
    registry.register("BUTTON_WIDGET", button_widget);
    registry.register("TABLE_WIDGET", table_widget);
    registry.register("CHECKBOX_WIDGET", checkbox_widget);
    registry.register("SELECT_WIDGET", select_widget);
    registry.register("CONTAINER_WIDGET", container_widget);
    registry.register("IMAGE_WIDGET", image_widget);
    registry.register("CHART_WIDGET", chart_widget);
    registry.register("LIST_WIDGET", list_widget);
    registry.register("MODAL_WIDGET", modal_widget);
    registry
});

fn unknown_widget(_properties: &Value, _extra: &mut ExtraDefs) -> WidgetDef {
    WidgetDef::default()
}

fn props(entries: Vec<(&str, Def)>) -> DefMap {
    entries
        .into_iter()
        .map(|(key, def)| (key.to_string(), def))
        .collect()
}

fn live(properties: &Value, key: &str, extra: &mut ExtraDefs) -> Def {
    infer_value(properties.get(key).unwrap_or(&Value::Null), extra)
}

fn text_widget(_properties: &Value, _extra: &mut ExtraDefs) -> WidgetDef {
    WidgetDef {
        properties: props(vec![
            ("!doc", Def::Doc("Shows fixed or data-bound text".into())),
            ("text", Def::Str),
            ("isVisible", Def::Bool),
        ]),
        default_property: Some("text"),
    }
}

fn input_widget(_properties: &Value, _extra: &mut ExtraDefs) -> WidgetDef {
    WidgetDef {
        properties: props(vec![
            ("!doc", Def::Doc("A text input field with validation".into())),
            ("text", Def::Str),
            ("isValid", Def::Bool),
            ("isVisible", Def::Bool),
            ("isDisabled", Def::Bool),
        ]),
        default_property: Some("text"),
    }
}

fn button_widget(_properties: &Value, _extra: &mut ExtraDefs) -> WidgetDef {
    WidgetDef {
        properties: props(vec![
            ("text", Def::Str),
            ("isVisible", Def::Bool),
            ("isDisabled", Def::Bool),
            ("recaptchaToken", Def::Str),
        ]),
        default_property: Some("text"),
    }
}

fn table_widget(properties: &Value, extra: &mut ExtraDefs) -> WidgetDef {
    // Row shape comes from the live data; selectedRow mirrors one row.
    let table_data = live(properties, "tableData", extra);
    let selected_row = match properties.get("tableData").and_then(|v| v.as_array()) {
        Some(rows) if !rows.is_empty() => infer_value(&rows[0], extra),
        _ => Def::Unknown,
    };
    WidgetDef {
        properties: props(vec![
            ("!doc", Def::Doc("Displays tabular data with row selection".into())),
            ("tableData", table_data),
            ("selectedRow", selected_row),
            ("selectedRowIndex", Def::Num),
            ("searchText", Def::Str),
            ("pageNo", Def::Num),
            ("pageSize", Def::Num),
            ("isVisible", Def::Bool),
        ]),
        default_property: Some("selectedRow"),
    }
}

fn checkbox_widget(_properties: &Value, _extra: &mut ExtraDefs) -> WidgetDef {
    WidgetDef {
        properties: props(vec![("isChecked", Def::Bool), ("isVisible", Def::Bool)]),
        default_property: Some("isChecked"),
    }
}

fn select_widget(_properties: &Value, _extra: &mut ExtraDefs) -> WidgetDef {
    WidgetDef {
        properties: props(vec![
            ("selectedOptionValue", Def::Str),
            ("selectedOptionLabel", Def::Str),
            ("options", Def::ArrayOf("dropdownOption".into())),
            ("isDisabled", Def::Bool),
            ("isVisible", Def::Bool),
        ]),
        default_property: Some("selectedOptionValue"),
    }
}

fn container_widget(_properties: &Value, _extra: &mut ExtraDefs) -> WidgetDef {
    WidgetDef {
        properties: props(vec![
            ("backgroundColor", Def::Str),
            ("isVisible", Def::Bool),
        ]),
        default_property: Some("backgroundColor"),
    }
}

fn image_widget(_properties: &Value, _extra: &mut ExtraDefs) -> WidgetDef {
    WidgetDef {
        properties: props(vec![
            ("image", Def::Str),
            ("defaultImage", Def::Str),
            ("isVisible", Def::Bool),
        ]),
        default_property: Some("image"),
    }
}

fn chart_widget(_properties: &Value, _extra: &mut ExtraDefs) -> WidgetDef {
    WidgetDef {
        properties: props(vec![
            ("chartData", Def::ArrayOf("chartDataPoint".into())),
            ("xAxisName", Def::Str),
            ("yAxisName", Def::Str),
            ("isVisible", Def::Bool),
        ]),
        default_property: Some("chartData"),
    }
}

fn list_widget(properties: &Value, extra: &mut ExtraDefs) -> WidgetDef {
    let items = live(properties, "items", extra);
    let selected_item = match properties.get("items").and_then(|v| v.as_array()) {
        Some(entries) if !entries.is_empty() => infer_value(&entries[0], extra),
        _ => Def::Unknown,
    };
    WidgetDef {
        properties: props(vec![
            ("items", items),
            ("selectedItem", selected_item),
            ("isVisible", Def::Bool),
        ]),
        default_property: Some("selectedItem"),
    }
}

fn modal_widget(_properties: &Value, _extra: &mut ExtraDefs) -> WidgetDef {
    WidgetDef {
        properties: props(vec![("isOpen", Def::Bool), ("isVisible", Def::Bool)]),
        default_property: Some("isOpen"),
    }
}

/// Fixed schema shape shared by every data-source action: the last response,
/// run/clear callables, and status flags.
pub fn action_def(properties: &Value, extra: &mut ExtraDefs) -> DefMap {
    let data = infer_value(properties.get("data").unwrap_or(&Value::Null), extra);
    props(vec![
        (
            "!doc",
            Def::Doc("A data-source action: run it, then read its response from `data`".into()),
        ),
        ("data", data),
        ("isLoading", Def::Bool),
        (
            "responseMeta",
            Def::obj([
                ("isExecutionSuccess".to_string(), Def::Bool),
                ("statusCode".to_string(), Def::Str),
            ]),
        ),
        (
            "run",
            Def::Fn("fn(onSuccess: fn() -> ?, onError: fn() -> ?, params: ?) -> ?".into()),
        ),
        ("clear", Def::Fn("fn() -> ?".into())),
    ])
}
