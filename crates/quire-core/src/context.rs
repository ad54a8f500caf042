//! Per-invocation context handed to scripts.

use std::collections::HashMap;

use crate::value::Value;

/// Context provided to a script when it is run.
///
/// Interpreters expose this to scripts as the `host` object. A fresh context
/// is built for every invocation; nothing in it survives the run.
#[derive(Debug, Clone, Default)]
pub struct ScriptContext {
    /// Type tag of the window the script was invoked from.
    pub window_kind: Option<String>,

    /// Additional data passed to the script.
    pub data: HashMap<String, Value>,

    /// Forward interpreter debug output to the log.
    pub debugger: bool,
}

impl ScriptContext {
    /// Create a new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the invoking window's type tag.
    pub fn with_window_kind(mut self, kind: impl Into<String>) -> Self {
        self.window_kind = Some(kind.into());
        self
    }

    /// Enable or disable debug forwarding.
    pub fn with_debugger(mut self, enabled: bool) -> Self {
        self.debugger = enabled;
        self
    }

    /// Set a value in the context.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Get a value from the context.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// The context data as a single object value.
    pub fn data_value(&self) -> Value {
        Value::Object(self.data.clone())
    }
}
