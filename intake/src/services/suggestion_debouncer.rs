//! Per-line debounced product suggestions
//!
//! Each line owns at most one pending lookup. A new query for a line aborts
//! the previous task (timer or in-flight request) and bumps the line's
//! generation; a response is applied only while its generation is current and
//! the line is still in the batch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use shared::LineIndex;
use crate::error::{IntakeError, IntakeResult};
use crate::state::SharedBatchState;
use crate::traits::CatalogService;

/// Debounces live suggestion lookups per line
pub struct SuggestionDebouncer<C: CatalogService + 'static> {
    catalog: Arc<C>,
    state: SharedBatchState,
    delay: Duration,
    min_chars: usize,
    pending: Mutex<HashMap<LineIndex, JoinHandle<()>>>,
}

impl<C: CatalogService + 'static> SuggestionDebouncer<C> {
    pub fn new(catalog: Arc<C>, state: SharedBatchState, delay: Duration, min_chars: usize) -> Self {
        Self {
            catalog,
            state,
            delay,
            min_chars,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Schedule a lookup for `line`, replacing any pending one.
    ///
    /// Queries shorter than the minimum clear the line's live suggestions and
    /// never reach the catalog.
    pub async fn request(&self, line: LineIndex, query: &str) -> IntakeResult<()> {
        let query = query.trim().to_string();

        let generation = {
            let mut state = self.state.write().await;
            if !state.contains(line) {
                return Err(IntakeError::LineNotFound { line });
            }
            let entry = state.live_suggestions.entry(line).or_default();
            entry.generation += 1;
            if query.chars().count() < self.min_chars {
                entry.items.clear();
            }
            entry.generation
        };

        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.remove(&line) {
            previous.abort();
        }
        if query.chars().count() < self.min_chars {
            return Ok(());
        }

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let found = match catalog.suggest(&query).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::debug!(line = %line, "Suggestion lookup failed: {}", e);
                    return;
                }
            };

            let mut state = state.write().await;
            if !state.contains(line) {
                tracing::debug!(line = %line, "Line removed before suggestions arrived");
                return;
            }
            match state.live_suggestions.get_mut(&line) {
                Some(entry) if entry.generation == generation => entry.items = found,
                _ => tracing::debug!(line = %line, "Discarding stale suggestions for '{}'", query),
            }
        });
        pending.insert(line, handle);
        Ok(())
    }

    /// Abort the pending lookup for a line, if any
    pub async fn cancel(&self, line: LineIndex) {
        if let Some(handle) = self.pending.lock().await.remove(&line) {
            handle.abort();
        }
    }

    /// Abort every pending lookup
    pub async fn cancel_all(&self) {
        for (_, handle) in self.pending.lock().await.drain() {
            handle.abort();
        }
    }

    /// Number of lookups that have not finished yet
    pub async fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .await
            .values()
            .filter(|h| !h.is_finished())
            .count()
    }
}

impl<C: CatalogService + 'static> Drop for SuggestionDebouncer<C> {
    fn drop(&mut self) {
        for (_, handle) in self.pending.get_mut().drain() {
            handle.abort();
        }
    }
}
