use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use serde_json::Value;

use crate::buffer::{BufferProvider, DocumentId, Position, StringBuffer, TextBuffer};
use crate::protocol::{AnalysisEngine, EngineError, RawCompletion, Request, Response};

#[derive(Debug, Default)]
pub struct EngineState {
    pub added: Vec<(Value, bool)>,
    pub deleted: Vec<String>,
    pub requests: Vec<Request>,
    pub responses: VecDeque<Result<Response, EngineError>>,
}

/// Records every engine interaction and serves canned responses. Cloning
/// shares the state, so tests keep a handle while the server owns the box.
#[derive(Debug, Clone, Default)]
pub struct FakeEngine(pub Rc<RefCell<EngineState>>);

impl FakeEngine {
    pub fn new() -> FakeEngine {
        FakeEngine::default()
    }

    pub fn push_response(&self, response: Response) {
        self.0.borrow_mut().responses.push_back(Ok(response));
    }

    pub fn push_error(&self, message: &str) {
        self.0
            .borrow_mut()
            .responses
            .push_back(Err(EngineError(message.to_string())));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.0.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.0.borrow().requests.len()
    }

    pub fn added_def_names(&self) -> Vec<String> {
        self.0
            .borrow()
            .added
            .iter()
            .filter_map(|(defs, _)| defs.get("!name").and_then(Value::as_str).map(str::to_string))
            .collect()
    }

    pub fn deleted_def_names(&self) -> Vec<String> {
        self.0.borrow().deleted.clone()
    }
}

impl AnalysisEngine for FakeEngine {
    fn add_defs(&mut self, defs: Value, at_front: bool) {
        self.0.borrow_mut().added.push((defs, at_front));
    }

    fn delete_defs(&mut self, name: &str) {
        self.0.borrow_mut().deleted.push(name.to_string());
    }

    fn request(&mut self, request: &Request) -> Result<Response, EngineError> {
        let mut state = self.0.borrow_mut();
        state.requests.push(request.clone());
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(Response::default()))
    }
}

/// Host-side buffer store implementing [`BufferProvider`].
#[derive(Debug, Default)]
pub struct Buffers {
    map: HashMap<DocumentId, StringBuffer>,
}

impl Buffers {
    pub fn insert(&mut self, id: u64, text: &str) -> DocumentId {
        let id = DocumentId(id);
        self.map.insert(id, StringBuffer::new(text));
        id
    }

    pub fn get_mut(&mut self, id: DocumentId) -> &mut StringBuffer {
        self.map.get_mut(&id).expect("buffer exists")
    }

    pub fn buffer_ref(&self, id: DocumentId) -> &dyn TextBuffer {
        self.map
            .get(&id)
            .map(|buffer| buffer as &dyn TextBuffer)
            .expect("buffer exists")
    }
}

impl BufferProvider for Buffers {
    fn buffer(&self, id: DocumentId) -> Option<&dyn TextBuffer> {
        self.map.get(&id).map(|buffer| buffer as &dyn TextBuffer)
    }
}

pub fn raw(name: &str, ty: &str, origin: &str) -> RawCompletion {
    RawCompletion {
        name: name.to_string(),
        display_name: None,
        ty: Some(ty.to_string()),
        origin: Some(origin.to_string()),
        doc: None,
        url: None,
    }
}

pub fn completions_response(
    items: Vec<RawCompletion>,
    start: Position,
    end: Position,
) -> Response {
    Response {
        completions: items,
        start: Some(start),
        end: Some(end),
        ..Response::default()
    }
}

pub fn type_response(ty: &str) -> Response {
    Response {
        ty: Some(ty.to_string()),
        ..Response::default()
    }
}
