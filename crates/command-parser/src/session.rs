//! Per-operator sessions owning their context memory

use crate::context::ContextMemory;
use crate::parser::{CommandParser, ParseResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use time::OffsetDateTime;
use uuid::Uuid;

/// One operator session. `parse` holds the context lock for the whole
/// utterance so concurrent calls never interleave context reads and writes.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    parser: Arc<CommandParser>,
    context: Mutex<ContextMemory>,
    started_at: OffsetDateTime,
}

impl Session {
    pub fn new(parser: Arc<CommandParser>) -> Self {
        Self::with_context(parser, ContextMemory::default())
    }

    pub fn with_context(parser: Arc<CommandParser>, context: ContextMemory) -> Self {
        Self {
            id: Uuid::new_v4(),
            parser,
            context: Mutex::new(context),
            started_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    pub fn parse(&self, utterance: &str) -> ParseResult {
        let mut context = self.lock();
        self.parser.analyze(utterance, &mut context)
    }

    /// Copy of the current context
    pub fn snapshot(&self) -> ContextMemory {
        self.lock().clone()
    }

    pub fn reset(&self) {
        *self.lock() = ContextMemory::default();
    }

    fn lock(&self) -> MutexGuard<'_, ContextMemory> {
        // context is plain data; a panic elsewhere cannot leave it half-written
        self.context
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Active sessions keyed by id, one per operator
#[derive(Debug)]
pub struct SessionRegistry {
    parser: Arc<CommandParser>,
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new(parser: Arc<CommandParser>) -> Self {
        Self {
            parser,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn open(&self) -> Arc<Session> {
        let session = Arc::new(Session::new(self.parser.clone()));
        tracing::info!(session = %session.id(), "operator session opened");
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(session.id(), session.clone());
        session
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .cloned()
    }

    pub fn close(&self, id: &Uuid) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(id)
            .is_some();
        if removed {
            tracing::info!(session = %id, "operator session closed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
