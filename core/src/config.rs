use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Dispatcher tuning, deserializable from any serde format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Maximum number of nested method frames (the host's own call counts as one)
    pub max_call_depth: usize,
    /// Log every dispatch at debug level instead of trace
    pub trace_calls: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            trace_calls: false,
        }
    }
}

impl EngineOptions {
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_trace_calls(mut self, enabled: bool) -> Self {
        self.trace_calls = enabled;
        self
    }
}
