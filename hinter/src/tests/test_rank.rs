use crate::rank::{
    BEST_MATCH_HEADER, Completion, DataType, SEARCH_RESULTS_HEADER, data_type_of,
    expected_data_type, rank,
};

fn candidate(text: &str, data_type: DataType, origin: &str) -> Completion {
    Completion {
        text: text.to_string(),
        display_text: text.to_string(),
        data_type,
        origin: origin.to_string(),
        doc: None,
        url: None,
        is_header: false,
    }
}

fn texts(list: &[Completion]) -> Vec<&str> {
    list.iter().map(|c| c.text.as_str()).collect()
}

#[test]
fn test_classifies_engine_type_strings() {
    assert_eq!(data_type_of(Some("?")), DataType::Unknown);
    assert_eq!(data_type_of(Some("number")), DataType::Number);
    assert_eq!(data_type_of(Some("string")), DataType::String);
    assert_eq!(data_type_of(Some("bool")), DataType::Boolean);
    assert_eq!(data_type_of(Some("fn(x: number) -> bool")), DataType::Function);
    assert_eq!(data_type_of(Some("[def$0]")), DataType::Array);
    assert_eq!(data_type_of(Some("Api1.data")), DataType::Object);
    assert_eq!(data_type_of(None), DataType::Unknown);
}

#[test]
fn test_expected_type_from_binding_hint() {
    assert_eq!(expected_data_type(Some("Array")), Some(DataType::Array));
    assert_eq!(
        expected_data_type(Some("Array<Object>")),
        Some(DataType::Array)
    );
    assert_eq!(expected_data_type(Some("string")), Some(DataType::String));
    assert_eq!(expected_data_type(Some("JSON")), Some(DataType::Object));
    assert_eq!(expected_data_type(Some("whatever")), None);
    assert_eq!(expected_data_type(None), None);
}

#[test]
fn test_schema_partition_sorts_alphabetically_with_callables_last() {
    let ranked = rank(
        vec![
            candidate("b", DataType::Object, "dataTree"),
            candidate("a", DataType::Object, "dataTree"),
            candidate("f", DataType::Function, "dataTree"),
        ],
        "dataTree",
        None,
    );
    assert_eq!(texts(&ranked), ["a", "b", "f"]);
}

#[test]
fn test_sort_is_case_insensitive() {
    let ranked = rank(
        vec![
            candidate("Zebra", DataType::Object, "dataTree"),
            candidate("apple", DataType::Object, "dataTree"),
        ],
        "dataTree",
        None,
    );
    assert_eq!(texts(&ranked), ["apple", "Zebra"]);
}

#[test]
fn test_partitions_local_then_schema_then_rest() {
    let ranked = rank(
        vec![
            candidate("parseInt", DataType::Function, "ecmascript"),
            candidate("Text1", DataType::Object, "dataTree"),
            candidate("myVar", DataType::Number, "[doc]"),
        ],
        "dataTree",
        None,
    );
    assert_eq!(texts(&ranked), ["myVar", "Text1", "parseInt"]);
}

#[test]
fn test_expected_type_splits_schema_into_labeled_groups() {
    let ranked = rank(
        vec![
            candidate("count", DataType::Number, "dataTree"),
            candidate("name", DataType::String, "dataTree"),
            candidate("title", DataType::String, "dataTree"),
        ],
        "dataTree",
        expected_data_type(Some("string")),
    );

    assert_eq!(
        texts(&ranked),
        [BEST_MATCH_HEADER, "name", "title", SEARCH_RESULTS_HEADER, "count"]
    );
    assert!(ranked[0].is_header);
    assert!(ranked[3].is_header);
    assert!(!ranked[1].is_header);
}

#[test]
fn test_no_type_mix_means_no_headers() {
    let ranked = rank(
        vec![
            candidate("name", DataType::String, "dataTree"),
            candidate("title", DataType::String, "dataTree"),
        ],
        "dataTree",
        Some(DataType::String),
    );
    assert_eq!(texts(&ranked), ["name", "title"]);
    assert!(ranked.iter().all(|c| !c.is_header));
}

#[test]
fn test_non_schema_partitions_keep_their_relative_order() {
    let ranked = rank(
        vec![
            candidate("z_lib", DataType::Function, "lodash"),
            candidate("a_lib", DataType::Function, "ecmascript"),
            candidate("later", DataType::Number, "[doc1]"),
            candidate("first", DataType::Number, "[doc1]"),
        ],
        "dataTree",
        None,
    );
    assert_eq!(texts(&ranked), ["later", "first", "z_lib", "a_lib"]);
}
