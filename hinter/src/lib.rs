//! Editor-facing autocomplete pipeline for the app builder's code editor.
//!
//! Wires a buffer and cursor into analysis-engine queries: decides how much
//! document text the engine must see (full or fragment), executes the query
//! through one long-lived session, and ranks the raw candidates for display.
//! The editor surface and the engine are both capabilities the host
//! supplies; see [`TextBuffer`] and [`AnalysisEngine`].

use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use typegen::{DefSource, EntityMap};

mod arg_hints;
mod binding;
mod buffer;
mod document;
mod protocol;
mod rank;
mod session;
mod sync;
mod tests;

pub use arg_hints::{ArgHints, SignatureArg, parse_signature};
pub use binding::{focused_segment, has_bindings, is_dynamic, segments};
pub use buffer::{BufferProvider, Change, DocumentId, Position, StringBuffer, TextBuffer};
pub use document::DirtyRange;
pub use protocol::{
    AnalysisEngine, EngineError, FileSpec, Query, QueryKind, RawCompletion, Request, Response,
};
pub use rank::{
    BEST_MATCH_HEADER, Completion, DataType, SEARCH_RESULTS_HEADER, data_type_of,
    expected_data_type, rank,
};
pub use sync::SyncConfig;

use arg_hints::enclosing_call;
use document::DocumentSet;
use session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HintError {
    /// The engine reported an error for this one request. The session and
    /// all tracked state remain valid.
    #[error("{0}")]
    Engine(String),
    /// The host asked about a document its provider cannot resolve.
    #[error("unknown document {0:?}")]
    UnknownDocument(DocumentId),
}

/// Result of a completion request. An empty candidate set is a distinct
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Suggestions(Suggestions),
    NoSuggestions,
}

/// A ranked, display-ready hint list replacing the `from..to` range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    pub from: Position,
    pub to: Position,
    pub list: Vec<Completion>,
    /// Index to preselect; skips a leading header row when present.
    pub selected_index: usize,
}

/// Payload for type/documentation hover tooltips. `url`, when present,
/// points at external documentation the host may open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tooltip {
    pub ty: Option<String>,
    pub doc: Option<String>,
    pub url: Option<String>,
}

/// The public face of the autocomplete core: owns the engine session and
/// all per-document tracking for one editing context.
pub struct HintServer {
    session: Session,
    docs: DocumentSet,
    config: SyncConfig,
    cached_arg_hints: Option<ArgHints>,
}

impl HintServer {
    pub fn new(engine: Box<dyn AnalysisEngine>, entities: &EntityMap) -> HintServer {
        HintServer {
            session: Session::new(engine, entities, None),
            docs: DocumentSet::new(),
            config: SyncConfig::default(),
            cached_arg_hints: None,
        }
    }

    /// `new`, plus an auxiliary definition set seeded alongside the schema.
    pub fn with_auxiliary(
        engine: Box<dyn AnalysisEngine>,
        entities: &EntityMap,
        auxiliary: &DefSource,
    ) -> HintServer {
        HintServer {
            session: Session::new(engine, entities, Some(auxiliary)),
            docs: DocumentSet::new(),
            config: SyncConfig::default(),
            cached_arg_hints: None,
        }
    }

    pub fn with_config(mut self, config: SyncConfig) -> HintServer {
        self.config = config;
        self
    }

    /// Swaps the entity schema after an entity-map change. Documents and
    /// their dirty state are untouched.
    pub fn rebuild_schema(&mut self, entities: &EntityMap) {
        self.session.update_defs(&typegen::synthesize(entities));
    }

    /// Replaces one named auxiliary definition set (delete, then add).
    pub fn update_defs(&mut self, defs: &DefSource) {
        self.session.update_defs(defs);
    }

    /// Folds one edit into the document's tracked state. Returns the
    /// deadline of a newly scheduled deferred resync, if any; the host
    /// should call [`HintServer::resync_due`] / [`HintServer::resync`]
    /// once it passes.
    pub fn track_change(
        &mut self,
        id: DocumentId,
        buffer: &dyn TextBuffer,
        change: &Change,
        now: Instant,
    ) -> Option<Instant> {
        if self
            .cached_arg_hints
            .as_ref()
            .is_some_and(|hints| hints.doc == id && hints.start >= change.to)
        {
            self.cached_arg_hints = None;
        }
        self.docs
            .track_change(id, buffer.line_count(), change, &self.config, now)
    }

    /// The document is gone; stop tracking it. Its engine-visible name is
    /// not reused.
    pub fn close_document(&mut self, id: DocumentId) {
        if self
            .cached_arg_hints
            .as_ref()
            .is_some_and(|hints| hints.doc == id)
        {
            self.cached_arg_hints = None;
        }
        self.docs.remove(id);
    }

    /// Completion at `cursor`, optionally biased toward the surrounding
    /// binding's declared type (e.g. `"string"`, `"Array"`).
    pub fn complete(
        &mut self,
        provider: &dyn BufferProvider,
        id: DocumentId,
        cursor: Position,
        expected_type_hint: Option<&str>,
    ) -> Result<CompletionOutcome, HintError> {
        let buffer = provider
            .buffer(id)
            .ok_or(HintError::UnknownDocument(id))?;
        let line_text = buffer.line(cursor.line).unwrap_or("").to_string();

        // Template text only gets hints inside the binding under the cursor.
        if binding::has_bindings(&line_text)
            && binding::focused_segment(&line_text, cursor.ch).is_none()
        {
            return Ok(CompletionOutcome::NoSuggestions);
        }

        let plan = sync::build_plan(
            &mut self.docs,
            provider,
            id,
            buffer,
            cursor,
            cursor,
            true,
            &self.config,
        );
        let mut query = Query::completions(Position::new(
            cursor.line.saturating_sub(plan.offset_lines),
            cursor.ch,
        ));
        query.file = Some(plan.file_ref.clone());
        let request = Request {
            query: Some(query),
            files: plan.files,
        };

        let response = self.session.query(&request)?;
        if response.completions.is_empty() {
            debug!(?id, "engine returned no completions");
            return Ok(CompletionOutcome::NoSuggestions);
        }

        let rebase = |pos: Option<Position>| {
            pos.map(|p| Position::new(p.line + plan.offset_lines, p.ch))
                .unwrap_or(cursor)
        };
        let from = rebase(response.start);
        let to = rebase(response.end);

        let after = if from.line == cursor.line {
            bracket_tail(&line_text, from.ch, to.ch)
        } else {
            ""
        };

        let list: Vec<Completion> = response
            .completions
            .into_iter()
            .map(|raw| Completion {
                display_text: raw.display_name.clone().unwrap_or_else(|| raw.name.clone()),
                text: format!("{}{after}", raw.name),
                data_type: data_type_of(raw.ty.as_deref()),
                origin: raw.origin.unwrap_or_default(),
                doc: raw.doc,
                url: raw.url,
                is_header: false,
            })
            .collect();

        let ranked = rank(
            list,
            typegen::DATA_TREE,
            expected_data_type(expected_type_hint),
        );
        let selected_index = if ranked.len() > 1 { 1 } else { 0 };
        Ok(CompletionOutcome::Suggestions(Suggestions {
            from,
            to,
            list: ranked,
            selected_index,
        }))
    }

    /// Inferred type of the expression at `cursor`, for hover tooltips.
    pub fn request_type(
        &mut self,
        provider: &dyn BufferProvider,
        id: DocumentId,
        cursor: Position,
    ) -> Result<Tooltip, HintError> {
        self.context_info(provider, id, cursor, QueryKind::Type, false)
    }

    /// Documentation of the expression at `cursor`; `url` may point at an
    /// external reference page.
    pub fn request_docs(
        &mut self,
        provider: &dyn BufferProvider,
        id: DocumentId,
        cursor: Position,
    ) -> Result<Tooltip, HintError> {
        self.context_info(provider, id, cursor, QueryKind::Documentation, false)
    }

    /// Signature hints for the call the cursor sits in, with the active
    /// argument index. Cached until an edit invalidates the call site.
    pub fn arg_hints(
        &mut self,
        provider: &dyn BufferProvider,
        id: DocumentId,
        cursor: Position,
    ) -> Result<Option<(ArgHints, usize)>, HintError> {
        let buffer = provider
            .buffer(id)
            .ok_or(HintError::UnknownDocument(id))?;
        let line_text = buffer.line(cursor.line).unwrap_or("").to_string();
        let Some(call) = enclosing_call(&line_text, cursor.ch) else {
            self.cached_arg_hints = None;
            return Ok(None);
        };
        let start = Position::new(cursor.line, call.paren_ch);

        if let Some(cached) = &self.cached_arg_hints {
            if cached.doc == id && cached.start == start {
                return Ok(Some((cached.clone(), call.arg_index)));
            }
        }

        let tooltip = self.context_info(provider, id, start, QueryKind::Type, true)?;
        let Some((args, ret)) = tooltip.ty.as_deref().and_then(parse_signature) else {
            return Ok(None);
        };
        let hints = ArgHints {
            doc: id,
            start,
            name: call.callee,
            args,
            ret,
            guess: false,
        };
        self.cached_arg_hints = Some(hints.clone());
        Ok(Some((hints, call.arg_index)))
    }

    /// Documents whose deferred resync deadline has passed.
    pub fn resync_due(&self, now: Instant) -> Vec<DocumentId> {
        self.docs.resync_due(now)
    }

    /// Full-syncs one document if its dirty span is still large; a no-op
    /// when an intervening sync already cleared it.
    pub fn resync(
        &mut self,
        provider: &dyn BufferProvider,
        id: DocumentId,
    ) -> Result<(), HintError> {
        let buffer = provider
            .buffer(id)
            .ok_or(HintError::UnknownDocument(id))?;
        let Some(record) = self.docs.get_mut(id) else {
            return Ok(());
        };
        record.resync_due = None;
        let still_large = record
            .dirty
            .is_some_and(|dirty| dirty.span() > self.config.fragment_max_span);
        if !still_large {
            return Ok(());
        }

        let request = Request::sync(vec![FileSpec::Full {
            name: record.name.clone(),
            text: buffer.text(),
        }]);
        self.session.query(&request)?;
        if let Some(record) = self.docs.get_mut(id) {
            record.dirty = None;
            record.synced_once = true;
        }
        Ok(())
    }

    /// The dirty range currently tracked for a document, if any.
    pub fn dirty_range(&self, id: DocumentId) -> Option<DirtyRange> {
        self.docs.get(id).and_then(|record| record.dirty)
    }

    /// Hands out a request generation for supersession checks: the UI
    /// applies a result only while [`HintServer::is_current`] holds.
    pub fn begin_request(&mut self) -> u64 {
        self.session.begin_request()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.session.is_current(generation)
    }

    fn context_info(
        &mut self,
        provider: &dyn BufferProvider,
        id: DocumentId,
        cursor: Position,
        kind: QueryKind,
        prefer_function: bool,
    ) -> Result<Tooltip, HintError> {
        let buffer = provider
            .buffer(id)
            .ok_or(HintError::UnknownDocument(id))?;
        let plan = sync::build_plan(
            &mut self.docs,
            provider,
            id,
            buffer,
            cursor,
            cursor,
            true,
            &self.config,
        );
        let mut query = Query::context(
            kind,
            Position::new(cursor.line.saturating_sub(plan.offset_lines), cursor.ch),
        );
        query.prefer_function = prefer_function;
        query.file = Some(plan.file_ref);
        let request = Request {
            query: Some(query),
            files: plan.files,
        };

        let response = self.session.query(&request)?;
        Ok(Tooltip {
            ty: response.ty,
            doc: response.doc,
            url: response.url,
        })
    }
}

/// Appends the closing `"]` when completing a bracket property access that
/// the user has not closed yet.
fn bracket_tail(line: &str, from_ch: usize, to_ch: usize) -> &'static str {
    let opened = from_ch >= 2 && line.get(from_ch - 2..from_ch) == Some("[\"");
    let closed = line.get(to_ch..to_ch + 2) == Some("\"]");
    if opened && !closed { "\"]" } else { "" }
}
