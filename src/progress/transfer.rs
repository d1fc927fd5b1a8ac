//! Export and import of a learner's progress as JSON text

use super::models::ProgressState;

/// Serialize the full state. Lossless: [`parse`] gives back an equal state.
pub fn export(state: &ProgressState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(state)
}

/// Parse exported text. Only the shape is checked; the caller decides whether
/// to replace its state with the result.
pub fn parse(text: &str) -> Result<ProgressState, serde_json::Error> {
    serde_json::from_str(text)
}
