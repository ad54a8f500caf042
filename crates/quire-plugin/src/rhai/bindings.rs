//! The host API exposed to Rhai scripts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use quire_core::{ScriptContext, ScriptRecord, Value};
use rhai::{Dynamic, Engine};

/// Slot written by `set_result`.
pub(crate) type ResultSlot = Arc<Mutex<Option<Value>>>;

/// Register logging, filesystem and result functions on an engine.
pub(crate) fn register_api(engine: &mut Engine, slot: &ResultSlot) {
    engine.register_fn("log_info", |msg: &str| {
        tracing::info!(target: "script", "{}", msg);
    });

    engine.register_fn("log_warn", |msg: &str| {
        tracing::warn!(target: "script", "{}", msg);
    });

    engine.register_fn("log_error", |msg: &str| {
        tracing::error!(target: "script", "{}", msg);
    });

    engine.register_fn("fs_exists", |path: &str| -> bool {
        std::path::Path::new(path).exists()
    });

    engine.register_fn("fs_read", |path: &str| -> Dynamic {
        match std::fs::read_to_string(path) {
            Ok(content) => Dynamic::from(content),
            Err(_) => Dynamic::UNIT,
        }
    });

    let slot = Arc::clone(slot);
    engine.register_fn("set_result", move |value: Dynamic| {
        if let Ok(mut result) = slot.lock() {
            *result = Some(dynamic_to_value(&value));
        }
    });
}

/// Route `print` and `debug` output to the log.
///
/// Debug output is only kept when the debugger is on.
pub(crate) fn register_output(engine: &mut Engine, debugger: bool) {
    register_output_with(engine, debugger, |line| {
        tracing::debug!(target: "script", "{}", line);
    });
}

/// Like [`register_output`], with debug lines handed to `sink`.
pub(crate) fn register_output_with<F>(engine: &mut Engine, debugger: bool, sink: F)
where
    F: Fn(String) + Send + Sync + 'static,
{
    engine.on_print(|text| {
        tracing::info!(target: "script", "{}", text);
    });

    if debugger {
        engine.on_debug(move |text, source, pos| {
            sink(format!("{} @ {:?}: {}", source.unwrap_or("<script>"), pos, text));
        });
    } else {
        engine.on_debug(|_, _, _| {});
    }
}

/// Build the `host` object for a run.
pub(crate) fn host_object(script: &ScriptRecord, ctx: &ScriptContext) -> rhai::Map {
    let mut host = rhai::Map::new();
    host.insert(
        "window_kind".into(),
        ctx.window_kind
            .clone()
            .map(Dynamic::from)
            .unwrap_or(Dynamic::UNIT),
    );
    host.insert("data".into(), value_to_dynamic(&ctx.data_value()));
    host.insert("debugger".into(), Dynamic::from(ctx.debugger));
    host.insert("title".into(), Dynamic::from(script.title().to_string()));
    host.insert(
        "script".into(),
        Dynamic::from(script.path().to_string_lossy().to_string()),
    );
    host
}

/// Convert a Rhai Dynamic to a quire Value.
pub(crate) fn dynamic_to_value(val: &Dynamic) -> Value {
    if val.is_unit() {
        Value::Null
    } else if val.is_bool() {
        Value::Bool(val.as_bool().unwrap_or(false))
    } else if val.is_int() {
        Value::Integer(val.as_int().unwrap_or(0))
    } else if val.is_float() {
        Value::Float(val.as_float().unwrap_or(0.0))
    } else if val.is_string() {
        Value::String(val.clone().into_string().unwrap_or_default())
    } else if val.is_char() {
        Value::String(val.as_char().map(String::from).unwrap_or_default())
    } else if val.is_array() {
        let arr = val.clone().into_array().unwrap_or_default();
        Value::Array(arr.iter().map(dynamic_to_value).collect())
    } else if val.is_map() {
        let map = val.clone().cast::<rhai::Map>();
        let obj: HashMap<String, Value> = map
            .into_iter()
            .map(|(k, v)| (k.to_string(), dynamic_to_value(&v)))
            .collect();
        Value::Object(obj)
    } else if val.is_blob() {
        Value::Bytes(val.clone().into_blob().unwrap_or_default())
    } else {
        Value::String(val.to_string())
    }
}

/// Convert a quire Value to a Rhai Dynamic.
pub(crate) fn value_to_dynamic(val: &Value) -> Dynamic {
    match val {
        Value::Null => Dynamic::UNIT,
        Value::Bool(b) => Dynamic::from(*b),
        Value::Integer(i) => Dynamic::from(*i),
        Value::Float(f) => Dynamic::from(*f),
        Value::String(s) => Dynamic::from(s.clone()),
        Value::Array(arr) => {
            let rhai_arr: rhai::Array = arr.iter().map(value_to_dynamic).collect();
            Dynamic::from(rhai_arr)
        }
        Value::Object(obj) => {
            let mut map = rhai::Map::new();
            for (k, v) in obj {
                map.insert(k.as_str().into(), value_to_dynamic(v));
            }
            Dynamic::from(map)
        }
        Value::Bytes(b) => Dynamic::from_blob(b.clone()),
    }
}
