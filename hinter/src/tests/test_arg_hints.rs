use std::time::Instant;

use typegen::EntityMap;

use crate::arg_hints::{enclosing_call, parse_signature};
use crate::buffer::{Change, Position};
use crate::tests::common::{Buffers, FakeEngine, type_response};
use crate::HintServer;

#[test]
fn test_parse_simple_signature() {
    let (args, ret) = parse_signature("fn(message: string, style: string) -> bool").unwrap();
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].name, "message");
    assert_eq!(args[0].ty, "string");
    assert_eq!(ret.as_deref(), Some("bool"));
}

#[test]
fn test_parse_signature_without_args_or_ret() {
    let (args, ret) = parse_signature("fn()").unwrap();
    assert!(args.is_empty());
    assert_eq!(ret, None);
}

#[test]
fn test_parse_signature_with_nested_callable_param() {
    let (args, ret) =
        parse_signature("fn(onSuccess: fn(data: [?]) -> ?, params: {a: number}) -> ?").unwrap();
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].ty, "fn(data: [?]) -> ?");
    assert_eq!(args[1].name, "params");
    assert_eq!(args[1].ty, "{a: number}");
    assert_eq!(ret.as_deref(), Some("?"));
}

#[test]
fn test_optional_marker_is_stripped_from_param_name() {
    let (args, _) = parse_signature("fn(radix?: number) -> number").unwrap();
    assert_eq!(args[0].name, "radix");
}

#[test]
fn test_non_callable_is_not_a_signature() {
    assert_eq!(parse_signature("string"), None);
    assert_eq!(parse_signature("[def$0]"), None);
}

#[test]
fn test_enclosing_call_detection() {
    let call = enclosing_call("showAlert(\"hi\", ", 16).unwrap();
    assert_eq!(call.callee, "showAlert");
    assert_eq!(call.paren_ch, 9);
    assert_eq!(call.arg_index, 1);
}

#[test]
fn test_enclosing_call_skips_nested_parens() {
    let call = enclosing_call("storeValue(key, f(x), ", 22).unwrap();
    assert_eq!(call.callee, "storeValue");
    assert_eq!(call.arg_index, 2);
}

#[test]
fn test_dotted_callee() {
    let call = enclosing_call("Api1.run(", 9).unwrap();
    assert_eq!(call.callee, "Api1.run");
}

#[test]
fn test_no_enclosing_call() {
    assert_eq!(enclosing_call("var x = 1;", 9), None);
    assert_eq!(enclosing_call("f(x) + 1", 8), None);
}

#[test]
fn test_arg_hints_query_parse_and_cache() {
    let engine = FakeEngine::new();
    let mut server = HintServer::new(Box::new(engine.clone()), &EntityMap::new());
    let mut buffers = Buffers::default();
    let id = buffers.insert(1, "showAlert(\"hi\", ");

    engine.push_response(type_response("fn(message: string, style: string) -> ?"));
    let (hints, active) = server
        .arg_hints(&buffers, id, Position::new(0, 16))
        .unwrap()
        .unwrap();
    assert_eq!(hints.name, "showAlert");
    assert_eq!(hints.start, Position::new(0, 9));
    assert_eq!(hints.args.len(), 2);
    assert_eq!(active, 1);

    // Same call site: answered from the cache, no second engine query.
    let before = engine.request_count();
    let (cached, active) = server
        .arg_hints(&buffers, id, Position::new(0, 12))
        .unwrap()
        .unwrap();
    assert_eq!(engine.request_count(), before);
    assert_eq!(cached, hints);
    assert_eq!(active, 0);
}

#[test]
fn test_edit_at_or_before_call_start_invalidates_cache() {
    let engine = FakeEngine::new();
    let mut server = HintServer::new(Box::new(engine.clone()), &EntityMap::new());
    let mut buffers = Buffers::default();
    let id = buffers.insert(1, "showAlert(\"hi\", ");
    let now = Instant::now();

    engine.push_response(type_response("fn(message: string, style: string) -> ?"));
    server
        .arg_hints(&buffers, id, Position::new(0, 16))
        .unwrap()
        .unwrap();

    // Edit ending after the opening paren: the hint stays cached.
    server.track_change(
        id,
        buffers.buffer_ref(id),
        &Change {
            from: Position::new(0, 11),
            to: Position::new(0, 13),
            inserted: vec!["yo".to_string()],
        },
        now,
    );
    let before = engine.request_count();
    assert!(server.arg_hints(&buffers, id, Position::new(0, 16)).unwrap().is_some());
    assert_eq!(engine.request_count(), before);

    // Edit ending before the opening paren: the cache is dropped and the
    // next lookup queries again.
    server.track_change(
        id,
        buffers.buffer_ref(id),
        &Change {
            from: Position::new(0, 0),
            to: Position::new(0, 4),
            inserted: vec!["show".to_string()],
        },
        now,
    );
    engine.push_response(type_response("fn(message: string, style: string) -> ?"));
    server
        .arg_hints(&buffers, id, Position::new(0, 16))
        .unwrap()
        .unwrap();
    assert_eq!(engine.request_count(), before + 1);
}

#[test]
fn test_non_function_type_yields_no_hints() {
    let engine = FakeEngine::new();
    let mut server = HintServer::new(Box::new(engine.clone()), &EntityMap::new());
    let mut buffers = Buffers::default();
    let id = buffers.insert(1, "Text1.text(");

    engine.push_response(type_response("string"));
    let hints = server.arg_hints(&buffers, id, Position::new(0, 11)).unwrap();
    assert_eq!(hints, None);
}
