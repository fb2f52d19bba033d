//! Depth-capped flattening of JSON documents
//!
//! Every object member becomes part of a dotted path. Anything that is not an
//! object, and any object reached at the depth cap, ends the path and is
//! printed as one `path: value` line.
//!
//! ```text
//! {"tcp_sent": {"mbits": 132}, "up": true}
//!   -> tcp_sent.mbits: 132
//!   -> up: true
//! ```

use serde_json::Value;

/// Nesting levels flattened before a value is printed as JSON
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Path used when the document itself is not an object
pub const ROOT_LABEL: &str = "value";

/// Recursive flattener with a depth cap
#[derive(Debug, Clone, Copy)]
pub struct Flattener {
    max_depth: usize,
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Flattener {
    /// Create a flattener; a cap below 1 is raised to 1
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Flatten a document into lines, in document order
    pub fn flatten(&self, document: &Value) -> Vec<String> {
        let mut lines = Vec::new();

        match document {
            Value::Object(map) => {
                for (key, value) in map {
                    self.walk(key.clone(), value, 1, &mut lines);
                }
            }
            other => lines.push(line(ROOT_LABEL, other)),
        }

        tracing::trace!(
            lines = lines.len(),
            max_depth = self.max_depth,
            "Flattened document"
        );

        lines
    }

    fn walk(&self, path: String, value: &Value, depth: usize, lines: &mut Vec<String>) {
        match value {
            Value::Object(map) if depth < self.max_depth => {
                for (key, child) in map {
                    self.walk(format!("{}.{}", path, key), child, depth + 1, lines);
                }
            }
            other => lines.push(line(&path, other)),
        }
    }
}

fn line(path: &str, value: &Value) -> String {
    format!("{}: {}", path, render_value(value))
}

/// Text form of a leaf value
///
/// Strings are printed raw, every other value as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
