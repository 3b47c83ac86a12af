//! Fixed supplementary tables merged into every synthesized tree: named
//! type aliases for `!define`, and the platform's global callables.

use crate::def::{Def, DefMap};

fn table(entries: Vec<(&str, Def)>) -> DefMap {
    entries
        .into_iter()
        .map(|(key, def)| (key.to_string(), def))
        .collect()
}

/// Named aliases referenced by widget schemas (`[dropdownOption]` etc.).
pub fn global_defs() -> DefMap {
    table(vec![
        (
            "dropdownOption",
            Def::obj([
                ("label".to_string(), Def::Str),
                ("value".to_string(), Def::Str),
            ]),
        ),
        (
            "chartDataPoint",
            Def::obj([
                ("x".to_string(), Def::Str),
                ("y".to_string(), Def::Num),
            ]),
        ),
        (
            "latLong",
            Def::obj([
                ("lat".to_string(), Def::Num),
                ("long".to_string(), Def::Num),
            ]),
        ),
    ])
}

fn callable(doc: &str, sig: &str) -> Def {
    Def::obj([
        ("!doc".to_string(), Def::Doc(doc.into())),
        ("!type".to_string(), Def::Fn(sig.into())),
    ])
}

/// Platform callables available in every binding.
pub fn global_functions() -> DefMap {
    table(vec![
        (
            "navigateTo",
            callable(
                "Navigates the user to another page or an external url",
                "fn(pageNameOrUrl: string, params: ?) -> ?",
            ),
        ),
        (
            "showAlert",
            callable(
                "Shows a temporary toast-style alert message",
                "fn(message: string, style: string) -> ?",
            ),
        ),
        (
            "showModal",
            callable("Opens a modal widget by name", "fn(modalName: string) -> ?"),
        ),
        (
            "closeModal",
            callable("Closes a modal widget by name", "fn(modalName: string) -> ?"),
        ),
        (
            "storeValue",
            callable(
                "Stores a key-value pair in the application store",
                "fn(key: string, value: ?, persist: bool) -> ?",
            ),
        ),
        (
            "copyToClipboard",
            callable("Copies text to the clipboard", "fn(data: string) -> ?"),
        ),
        (
            "download",
            callable(
                "Downloads data as a file in the user's browser",
                "fn(data: ?, fileName: string, fileType: string) -> ?",
            ),
        ),
        (
            "resetWidget",
            callable(
                "Resets a widget to its default state",
                "fn(widgetName: string, resetChildren: bool) -> ?",
            ),
        ),
    ])
}
