use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Recognized option keys. Concrete pullers/pushers document which of these
/// they honor; unknown keys are ignored.
pub mod keys {
    /// Maximum number of records pulled and pushed per step (`Int`).
    pub const BATCH_SIZE: &str = "batch_size";
}

pub const DEFAULT_BATCH_SIZE: usize = 1_000;

/// A single option value in a migration's option bag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OptionValue {
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl OptionValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Int(v) => Some(*v),
            OptionValue::Float(v) => Some(*v as i64),
            OptionValue::String(v) => v.parse::<i64>().ok(),
            OptionValue::Boolean(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Boolean(v) => Some(*v),
            OptionValue::String(v) => v.parse::<bool>().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(v) => Some(v),
            _ => None,
        }
    }
}

/// String-keyed configuration bag attached to a migration run.
///
/// Built once (configuration loading lives outside the engine) and read-only
/// afterwards. An absent bag behaves like an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Options {
    entries: HashMap<String, OptionValue>,
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }

    /// Construction-time chaining; the bag is not mutated after it is handed
    /// to the engine.
    pub fn with(mut self, key: &str, value: OptionValue) -> Self {
        self.entries.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(OptionValue::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(OptionValue::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_str)
    }

    /// Effective batch size: the `batch_size` key when present and positive,
    /// the default otherwise.
    pub fn batch_size(&self) -> usize {
        self.get_i64(keys::BATCH_SIZE)
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_BATCH_SIZE)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
