//! Order intake library
//!
//! Turns free-text produce orders into draft order items: lines are parsed by
//! the backend, reconciled against the product catalog by the operator, and
//! submitted to the draft order in one batch.

pub mod config;
pub mod error;
pub mod reconciler;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::{IntakeConfig, ReconcilerConfig};
pub use error::{IntakeError, IntakeResult};
pub use reconciler::Reconciler;
pub use state::SharedBatchState;
pub use traits::*;
pub use types::*;
pub use services::*;
