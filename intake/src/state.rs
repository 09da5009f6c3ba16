//! Batch state management

use std::sync::Arc;
use tokio::sync::RwLock;
use crate::types::BatchState;

/// Shared batch state wrapper
pub type SharedBatchState = Arc<RwLock<BatchState>>;

/// Create new shared batch state
pub fn create_shared_state(state: BatchState) -> SharedBatchState {
    Arc::new(RwLock::new(state))
}
