use crate::error::GlosorError;
use crate::extraction::{LayoutNode, LayoutSource};

/// Reads a layout tree that was dumped to JSON ahead of time.
///
/// Useful for layouts produced by other extractors and for reproducing
/// a run without the PDF tooling installed.
pub struct JsonLayoutSource;

impl JsonLayoutSource {
    pub fn new() -> Self {
        JsonLayoutSource
    }
}

impl Default for JsonLayoutSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutSource for JsonLayoutSource {
    fn extract_layout(&self, input: &[u8]) -> Result<LayoutNode, GlosorError> {
        serde_json::from_slice(input).map_err(|e| GlosorError::Layout(e.to_string()))
    }

    fn backend_name(&self) -> &str {
        "json"
    }
}
