use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Key/value settings persistence, namespaced by node.
///
/// Modeled on the small NVS-style stores embedded targets provide:
/// `open` selects a namespace, gets fall back to a caller default, puts
/// write through immediately. None of the accessors fail — a store that
/// cannot load or save degrades to in-memory behavior and the node keeps
/// running (mutations just stop being durable).
pub trait SettingsStore {
    /// Open a namespace. Returns false when the backing storage is
    /// unavailable; the node then runs without durability.
    fn open(&mut self, namespace: &str) -> bool;

    fn get_string(&self, key: &str, default: &str) -> String;
    fn get_uint(&self, key: &str, default: u32) -> u32;
    fn get_int(&self, key: &str, default: i32) -> i32;

    fn put_string(&mut self, key: &str, value: &str);
    fn put_uint(&mut self, key: &str, value: u32);
    fn put_int(&mut self, key: &str, value: i32);
}

/// Settings store backed by a JSON file, one top-level object per
/// namespace.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    namespace: String,
    root: Map<String, Value>,
}

impl JsonSettingsStore {
    /// Create a store over `path`. Nothing is read until `open`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            namespace: String::new(),
            root: Map::new(),
        }
    }

    fn values(&self) -> Option<&Map<String, Value>> {
        self.root.get(&self.namespace)?.as_object()
    }

    fn put_value(&mut self, key: &str, value: Value) {
        let ns = self
            .root
            .entry(self.namespace.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(map) = ns.as_object_mut() {
            map.insert(key.to_string(), value);
        }
        self.save();
    }

    fn save(&self) {
        let text = match serde_json::to_string_pretty(&Value::Object(self.root.clone())) {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "settings serialization failed");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, text) {
            warn!(path = ?self.path, %err, "settings write failed; changes are not durable");
        }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn open(&mut self, namespace: &str) -> bool {
        self.namespace = namespace.to_string();
        match std::fs::read_to_string(&self.path) {
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(root)) => {
                    debug!(path = ?self.path, "loaded settings");
                    self.root = root;
                    true
                }
                Ok(_) | Err(_) => {
                    warn!(path = ?self.path, "settings file is not a JSON object");
                    false
                }
            },
            // A missing file is a fresh node, not a failure.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no settings file, starting from defaults");
                true
            }
            Err(err) => {
                warn!(path = ?self.path, %err, "settings file unreadable");
                false
            }
        }
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        self.values()
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    fn get_uint(&self, key: &str, default: u32) -> u32 {
        self.values()
            .and_then(|m| m.get(key))
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(default)
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values()
            .and_then(|m| m.get(key))
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(default)
    }

    fn put_string(&mut self, key: &str, value: &str) {
        self.put_value(key, Value::String(value.to_string()));
    }

    fn put_uint(&mut self, key: &str, value: u32) {
        self.put_value(key, Value::from(value));
    }

    fn put_int(&mut self, key: &str, value: i32) {
        self.put_value(key, Value::from(value));
    }
}

/// In-memory settings store for tests and ephemeral nodes.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Map<String, Value>,
    puts: usize,
    fail_open: bool,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `open` always fails (storage unavailable).
    pub fn unavailable() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    /// Number of put calls observed.
    pub fn put_count(&self) -> usize {
        self.puts
    }

    /// True if `key` has ever been written.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl SettingsStore for MemorySettingsStore {
    fn open(&mut self, _namespace: &str) -> bool {
        !self.fail_open
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    fn get_uint(&self, key: &str, default: u32) -> u32 {
        self.values
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(default)
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values
            .get(key)
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(default)
    }

    fn put_string(&mut self, key: &str, value: &str) {
        self.puts += 1;
        self.values.insert(key.to_string(), Value::String(value.to_string()));
    }

    fn put_uint(&mut self, key: &str, value: u32) {
        self.puts += 1;
        self.values.insert(key.to_string(), Value::from(value));
    }

    fn put_int(&mut self, key: &str, value: i32) {
        self.puts += 1;
        self.values.insert(key.to_string(), Value::from(value));
    }
}
