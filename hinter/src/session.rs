//! One long-lived engine session per editing context: bundled library
//! definitions plus the synthesized entity schema, and the single
//! request/response channel toward the engine.

use std::sync::LazyLock;

use serde_json::Value;
use tracing::{debug, warn};

use typegen::{DefSource, EntityMap};

use crate::HintError;
use crate::protocol::{AnalysisEngine, Request, Response};

/// Library definition sets shipped with the hinter: the core language plus
/// the bundled utility library.
static LIB_DEFS: LazyLock<Vec<Value>> = LazyLock::new(|| {
    [
        include_str!("../defs/ecmascript.json"),
        include_str!("../defs/lodash.json"),
    ]
    .into_iter()
    .map(|raw| serde_json::from_str(raw).expect("bundled definition file is valid JSON"))
    .collect()
});

pub(crate) struct Session {
    engine: Box<dyn AnalysisEngine>,
    generation: u64,
}

impl Session {
    /// Seeds a fresh engine with the library defs, the synthesized entity
    /// schema, and an optional auxiliary definition set.
    pub(crate) fn new(
        mut engine: Box<dyn AnalysisEngine>,
        entities: &EntityMap,
        auxiliary: Option<&DefSource>,
    ) -> Session {
        for defs in LIB_DEFS.iter() {
            engine.add_defs(defs.clone(), false);
        }
        let tree = typegen::synthesize(entities);
        debug!(entries = tree.entries.len(), "seeding session schema");
        engine.add_defs(tree.to_json(), false);
        if let Some(aux) = auxiliary {
            engine.add_defs(aux.to_json(), false);
        }
        Session {
            engine,
            generation: 0,
        }
    }

    /// Atomically replaces one named definition set: delete, then re-add
    /// with precedence. The session itself survives unchanged.
    pub(crate) fn update_defs(&mut self, def: &DefSource) {
        self.engine.delete_defs(&def.name);
        self.engine.add_defs(def.to_json(), true);
        debug!(name = %def.name, "replaced definition set");
    }

    /// Forwards one request. Engine-reported errors surface verbatim; a
    /// failure is local to this request and leaves the session usable.
    pub(crate) fn query(&mut self, request: &Request) -> Result<Response, HintError> {
        self.engine.request(request).map_err(|error| {
            warn!(%error, "engine request failed");
            HintError::Engine(error.0)
        })
    }

    /// Hands out a fresh request generation. A response should only be
    /// applied to the UI while its generation is still current.
    pub(crate) fn begin_request(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}
