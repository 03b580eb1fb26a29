//! Persisted view state for the book index: the store seam, its backends,
//! and the controller that owns the live `QueryState`.

use crate::query::{QueryState, SortMode};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

/// Scroll offsets beyond this count as "substantial" state worth clearing
/// after a one-shot restore.
const SCROLL_RESTORE_THRESHOLD: f64 = 100.0;

#[derive(Error, Debug)]
pub enum StateStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable home for the index view state, injected at the boundary.
///
/// Backends range from a process-local slot to a file on disk; the
/// query-string codec on [`QueryState`] covers the URL-encoded transport.
pub trait ViewStateStore: Send + Sync {
    fn load(&self) -> Result<Option<QueryState>, StateStoreError>;
    fn save(&self, state: &QueryState) -> Result<(), StateStoreError>;
    fn clear(&self) -> Result<(), StateStoreError>;
}

/// In-memory store: survives navigation within one process, gone on exit.
#[derive(Default)]
pub struct MemoryStateStore {
    slot: Mutex<Option<QueryState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        MemoryStateStore::default()
    }
}

impl ViewStateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<QueryState>, StateStoreError> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn save(&self, state: &QueryState) -> Result<(), StateStoreError> {
        *self.slot.lock().unwrap() = Some(state.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StateStoreError> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

/// File-backed store: one JSON file at a namespaced path, the durable
/// analogue of the browser's session storage.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStateStore { path: path.into() }
    }
}

impl ViewStateStore for FileStateStore {
    fn load(&self) -> Result<Option<QueryState>, StateStoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&text) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                // A corrupt state file must never break the index.
                warn!("Discarding unreadable view state file: {e}");
                Ok(None)
            }
        }
    }

    fn save(&self, state: &QueryState) -> Result<(), StateStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string(state)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StateStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Owns the live `QueryState` and applies the transition rules: search,
/// sort, and contributor changes reset the page to 1, and every mutation
/// persists through the store.
pub struct ViewController {
    store: Arc<dyn ViewStateStore>,
    state: QueryState,
    restored: bool,
}

impl ViewController {
    pub fn new(store: Arc<dyn ViewStateStore>) -> Self {
        ViewController {
            store,
            state: QueryState::default(),
            restored: false,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.search_text = text.into();
        self.state.page = 1;
        self.persist();
    }

    pub fn set_sort(&mut self, mode: SortMode) {
        self.state.sort_mode = mode;
        self.state.page = 1;
        self.persist();
    }

    pub fn set_contributors(&mut self, contributors: Vec<String>) {
        self.state.selected_contributors = contributors;
        self.state.page = 1;
        self.persist();
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.page = page.max(1);
        self.persist();
    }

    pub fn set_scroll(&mut self, offset: f64) {
        self.state.scroll_offset = offset.max(0.0);
        self.persist();
    }

    /// Apply persisted state once per controller. Returns whether anything
    /// was restored. Subsequent calls are no-ops, so a double-mounted view
    /// cannot restore twice, and saves performed afterwards cannot
    /// re-trigger a restoration.
    pub fn restore(&mut self) -> bool {
        if self.restored {
            return false;
        }
        self.restored = true;

        let saved = match self.store.load() {
            Ok(Some(saved)) => saved,
            Ok(None) => return false,
            Err(e) => {
                warn!("Failed to load persisted view state: {e}");
                return false;
            }
        };

        // Substantial state is cleared after the one restore that uses it,
        // so it cannot resurface on a later, unrelated visit.
        if is_substantial(&saved) {
            debug!("Restored substantial view state, clearing persisted copy");
            if let Err(e) = self.store.clear() {
                warn!("Failed to clear persisted view state: {e}");
            }
        }

        self.state = saved;
        true
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.state) {
            // Persistence failures are non-fatal; the in-memory state
            // still drives the view.
            warn!("Failed to persist view state: {e}");
        }
    }
}

fn is_substantial(state: &QueryState) -> bool {
    state.sort_mode != SortMode::Default
        || !state.search_text.trim().is_empty()
        || !state.selected_contributors.is_empty()
        || state.page > 1
        || state.scroll_offset > SCROLL_RESTORE_THRESHOLD
}
