//! Data store contract and an in-memory implementation

use crate::error::{EvaluationError, EvaluationResult};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Observable data store owned by a controller
///
/// The scope core only reads `data` and computes where to write; writes are
/// forwarded to `set` as delimiter-joined paths.
pub trait Model: Send + Sync {
    /// Current root value
    fn data(&self) -> Arc<Value>;

    /// Write `value` at `path`
    fn set(&self, path: &str, value: Value) -> EvaluationResult<()>;
}

/// Model holding its root value in memory
///
/// Readers receive a shared snapshot; `set` copies the root on write when a
/// snapshot is still held.
#[derive(Debug)]
pub struct MemoryModel {
    root: RwLock<Arc<Value>>,
    delimiter: String,
}

impl Default for MemoryModel {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl MemoryModel {
    /// Create a model with the given root value
    pub fn new(data: Value) -> Self {
        Self {
            root: RwLock::new(Arc::new(data)),
            delimiter: ".".to_string(),
        }
    }

    /// Use a different path delimiter for `set`
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Read the value at `path`
    pub fn get(&self, path: &str) -> Value {
        let root = self.data();
        if path.is_empty() {
            return (*root).clone();
        }
        let segments: Vec<&str> = path.split(self.delimiter.as_str()).collect();
        super::lookup(&segments, &root)
    }
}

impl Model for MemoryModel {
    fn data(&self) -> Arc<Value> {
        self.root.read().clone()
    }

    fn set(&self, path: &str, value: Value) -> EvaluationResult<()> {
        log::debug!("model set {path}");
        let mut guard = self.root.write();
        if path.is_empty() {
            *guard = Arc::new(value);
            return Ok(());
        }
        let segments: Vec<&str> = path.split(self.delimiter.as_str()).collect();
        let root = Arc::make_mut(&mut *guard);
        write_path(root, &segments, value).map_err(|message| EvaluationError::InvalidPath {
            path: path.to_string(),
            message,
        })
    }
}

fn write_path(target: &mut Value, segments: &[&str], value: Value) -> Result<(), String> {
    let Some((segment, rest)) = segments.split_first() else {
        *target = value;
        return Ok(());
    };
    if target.is_null() {
        *target = empty_container_for(segment);
    }
    let slot = match target {
        Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
        Value::Array(items) => {
            let index = segment
                .parse::<usize>()
                .map_err(|_| format!("'{segment}' is not an array index"))?;
            if index >= items.len() {
                let length = grow_to(items.len(), index)
                    .ok_or_else(|| format!("index {segment} is too far past the array end"))?;
                items.resize(length, Value::Null);
            }
            &mut items[index]
        }
        other => return Err(format!("cannot set '{segment}' on {other}")),
    };
    if !rest.is_empty() && slot.is_null() {
        *slot = empty_container_for(rest[0]);
    }
    write_path(slot, rest, value)
}

/// Furthest an array write may land past the current end
const MAX_ARRAY_GAP: usize = 1024;

fn grow_to(length: usize, index: usize) -> Option<usize> {
    if index - length > MAX_ARRAY_GAP {
        return None;
    }
    index.checked_add(1)
}

fn empty_container_for(segment: &str) -> Value {
    if segment.parse::<usize>().is_ok() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}
