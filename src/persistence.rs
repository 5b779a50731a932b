//! Persistence boundary: save/load contract against an external tactic store.
//!
//! DESIGN
//! ======
//! The editor core never talks to a database. It hands a `Tactic` to a
//! `TacticStore` and gets an id back. `save` is an upsert: a tactic without an
//! id is created and receives one from the store, a tactic with an id
//! overwrites that row. Concurrent saves of the same tactic simply race;
//! the last write wins.
//!
//! Loading replaces the session's document and resets undo history to a single
//! snapshot of what was loaded, so a load can never be undone.
//!
//! ERROR HANDLING
//! ==============
//! Store failures surface as a typed `StoreError`. They never touch the live
//! session: after a failed save the document is exactly as editable as before,
//! and after a failed load the previous document is still in place.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::doc::Tactic;
use crate::editor::EditorSession;

/// Grepable error code and retryable flag for errors shown to the user.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("tactic not found: {0}")]
    NotFound(Uuid),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store backend error: {0}")]
    Backend(String),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_TACTIC_NOT_FOUND",
            Self::Serialization(_) => "E_SERIALIZATION",
            Self::Backend(_) => "E_STORE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

/// External storage for tactics.
#[async_trait::async_trait]
pub trait TacticStore: Send + Sync {
    /// Create or update `tactic`, returning its canonical id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the tactic cannot be encoded or written.
    async fn save(&self, tactic: &Tactic) -> Result<Uuid, StoreError>;

    /// Fetch a tactic by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown ids, or another
    /// [`StoreError`] if the stored row cannot be read or decoded.
    async fn load(&self, id: Uuid) -> Result<Tactic, StoreError>;
}

/// In-process store keeping each tactic as its serialized JSON row.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<Uuid, serde_json::Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tactics.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// The raw stored row for `id`, exactly as persisted.
    pub async fn row(&self, id: Uuid) -> Option<serde_json::Value> {
        self.rows.read().await.get(&id).cloned()
    }
}

#[async_trait::async_trait]
impl TacticStore for MemoryStore {
    async fn save(&self, tactic: &Tactic) -> Result<Uuid, StoreError> {
        let id = tactic.id.unwrap_or_else(Uuid::new_v4);
        let mut record = tactic.clone();
        record.id = Some(id);
        let row = serde_json::to_value(&record)?;
        let created = self.rows.write().await.insert(id, row).is_none();
        info!(%id, created, "tactic saved");
        Ok(id)
    }

    async fn load(&self, id: Uuid) -> Result<Tactic, StoreError> {
        let Some(row) = self.row(id).await else {
            return Err(StoreError::NotFound(id));
        };
        Ok(serde_json::from_value(row)?)
    }
}

/// Save the session's tactic and record the id the store assigned.
///
/// The tactic is captured before the await, so edits made while the save is
/// in flight are not part of it.
///
/// # Errors
///
/// Propagates the store's [`StoreError`]; the session is left untouched.
pub async fn save_session(store: &dyn TacticStore, session: &mut EditorSession) -> Result<Uuid, StoreError> {
    let tactic = session.to_tactic();
    match store.save(&tactic).await {
        Ok(id) => {
            session.set_tactic_id(id);
            Ok(id)
        }
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "tactic save failed");
            Err(e)
        }
    }
}

/// Load tactic `id` into the session, resetting history to the loaded document.
///
/// # Errors
///
/// Propagates the store's [`StoreError`]; on failure the session keeps its
/// current document and history.
pub async fn load_session(store: &dyn TacticStore, session: &mut EditorSession, id: Uuid) -> Result<(), StoreError> {
    match store.load(id).await {
        Ok(tactic) => {
            info!(%id, elements = tactic.document.len(), "tactic loaded");
            session.load_tactic(tactic);
            Ok(())
        }
        Err(e) => {
            warn!(%id, error = %e, code = e.error_code(), "tactic load failed");
            Err(e)
        }
    }
}
