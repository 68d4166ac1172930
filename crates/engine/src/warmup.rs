//! Warmup validation helpers.

use tape_series::BarStore;

use crate::error::EngineError;

/// Validates that sufficient history is preloaded for first evaluation.
///
/// # Errors
/// Returns an error if the recorded history is shorter than the
/// required depth.
pub fn validate_history(store: &BarStore, required: usize) -> Result<(), EngineError> {
    if store.len() < required {
        return Err(EngineError::InsufficientHistory {
            required,
            available: store.len(),
        });
    }

    tracing::info!(
        "History validated: {} bars required, {} available",
        required,
        store.len()
    );

    Ok(())
}
