//! Rust-to-Lua bindings for the quire host API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use mlua::{Lua, Table, Value as LuaValue, Variadic};
use quire_core::{ScriptContext, ScriptRecord, Value};

/// Slot written by `host.set_result`.
pub(crate) type ResultSlot = Arc<Mutex<Option<Value>>>;

/// Create the `host` table for a run.
pub(crate) fn create_host_api(
    lua: &Lua,
    script: &ScriptRecord,
    ctx: &ScriptContext,
    slot: &ResultSlot,
) -> mlua::Result<Table> {
    let host = lua.create_table()?;

    if let Some(kind) = &ctx.window_kind {
        host.set("window_kind", kind.as_str())?;
    }
    host.set("data", value_to_lua(lua, &ctx.data_value())?)?;
    host.set("debugger", ctx.debugger)?;
    host.set("title", script.title())?;
    host.set("script", script.path().to_string_lossy().to_string())?;

    host.set(
        "log_info",
        lua.create_function(|_, msg: String| {
            tracing::info!(target: "script", "{}", msg);
            Ok(())
        })?,
    )?;
    host.set(
        "log_warn",
        lua.create_function(|_, msg: String| {
            tracing::warn!(target: "script", "{}", msg);
            Ok(())
        })?,
    )?;
    host.set(
        "log_error",
        lua.create_function(|_, msg: String| {
            tracing::error!(target: "script", "{}", msg);
            Ok(())
        })?,
    )?;

    // host.fs_exists(path) - Check if path exists
    host.set(
        "fs_exists",
        lua.create_function(|_, path: String| Ok(std::path::Path::new(&path).exists()))?,
    )?;

    // host.fs_read(path) - Read file contents, nil if unreadable
    host.set(
        "fs_read",
        lua.create_function(|lua, path: String| match std::fs::read_to_string(&path) {
            Ok(content) => Ok(LuaValue::String(lua.create_string(&content)?)),
            Err(_) => Ok(LuaValue::Nil),
        })?,
    )?;

    let result = Arc::clone(slot);
    host.set(
        "set_result",
        lua.create_function(move |_, value: LuaValue| {
            if let Ok(mut slot) = result.lock() {
                *slot = Some(lua_to_value(value));
            }
            Ok(())
        })?,
    )?;

    let source = script.path().display().to_string();
    let debugger = ctx.debugger;
    host.set(
        "debug",
        lua.create_function(move |_, args: Variadic<LuaValue>| {
            if debugger {
                let text: Vec<String> = args.iter().map(display).collect();
                tracing::debug!(target: "script", "{}: {}", source, text.join("\t"));
            }
            Ok(())
        })?,
    )?;

    Ok(host)
}

/// Replace `print` so output goes to the log instead of stdout.
pub(crate) fn redirect_print(lua: &Lua) -> mlua::Result<()> {
    let print = lua.create_function(|_, args: Variadic<LuaValue>| {
        let text: Vec<String> = args.iter().map(display).collect();
        tracing::info!(target: "script", "{}", text.join("\t"));
        Ok(())
    })?;
    lua.globals().set("print", print)
}

fn display(value: &LuaValue) -> String {
    match value {
        LuaValue::Nil => "nil".to_string(),
        LuaValue::Boolean(b) => b.to_string(),
        LuaValue::Integer(i) => i.to_string(),
        LuaValue::Number(n) => n.to_string(),
        LuaValue::String(s) => s.to_string_lossy(),
        other => other.type_name().to_string(),
    }
}

/// Convert a Lua value to a quire Value.
pub(crate) fn lua_to_value(lua_val: LuaValue) -> Value {
    match lua_val {
        LuaValue::Nil => Value::Null,
        LuaValue::Boolean(b) => Value::Bool(b),
        LuaValue::Integer(i) => Value::Integer(i),
        LuaValue::Number(n) => Value::Float(n),
        LuaValue::String(s) => Value::String(s.to_string_lossy()),
        LuaValue::Table(t) => {
            // Sequences with keys 1..n become arrays, anything else an object
            let mut is_array = true;
            let mut max_index = 0i64;

            for pair in t.clone().pairs::<LuaValue, LuaValue>() {
                match pair {
                    Ok((LuaValue::Integer(k), _)) if k > 0 => max_index = max_index.max(k),
                    _ => {
                        is_array = false;
                        break;
                    }
                }
            }

            if is_array && max_index > 0 {
                let mut arr = Vec::new();
                for i in 1..=max_index {
                    if let Ok(v) = t.get::<LuaValue>(i) {
                        arr.push(lua_to_value(v));
                    }
                }
                Value::Array(arr)
            } else {
                let mut obj = HashMap::new();
                for (k, v) in t.pairs::<String, LuaValue>().flatten() {
                    obj.insert(k, lua_to_value(v));
                }
                Value::Object(obj)
            }
        }
        _ => Value::Null,
    }
}

/// Convert a quire Value to a Lua value.
pub(crate) fn value_to_lua(lua: &Lua, val: &Value) -> mlua::Result<LuaValue> {
    match val {
        Value::Null => Ok(LuaValue::Nil),
        Value::Bool(b) => Ok(LuaValue::Boolean(*b)),
        Value::Integer(i) => Ok(LuaValue::Integer(*i)),
        Value::Float(f) => Ok(LuaValue::Number(*f)),
        Value::String(s) => Ok(LuaValue::String(lua.create_string(s)?)),
        Value::Array(arr) => {
            let table = lua.create_table()?;
            for (i, v) in arr.iter().enumerate() {
                table.set(i + 1, value_to_lua(lua, v)?)?;
            }
            Ok(LuaValue::Table(table))
        }
        Value::Object(obj) => {
            let table = lua.create_table()?;
            for (k, v) in obj {
                table.set(k.as_str(), value_to_lua(lua, v)?)?;
            }
            Ok(LuaValue::Table(table))
        }
        Value::Bytes(b) => Ok(LuaValue::String(lua.create_string(b)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_becomes_array() {
        let lua = Lua::new();
        let value: LuaValue = lua.load("return {10, 20, 30}").eval().unwrap();
        assert_eq!(
            lua_to_value(value),
            Value::Array(vec![
                Value::Integer(10),
                Value::Integer(20),
                Value::Integer(30)
            ])
        );
    }

    #[test]
    fn test_record_becomes_object() {
        let lua = Lua::new();
        let value: LuaValue = lua.load("return {name = 'a', n = 1.5}").eval().unwrap();
        let Value::Object(obj) = lua_to_value(value) else {
            panic!("expected object");
        };
        assert_eq!(obj.get("name"), Some(&Value::String("a".into())));
        assert_eq!(obj.get("n"), Some(&Value::Float(1.5)));
    }

    #[test]
    fn test_value_round_trips_through_lua() {
        let lua = Lua::new();
        let value = Value::Array(vec![Value::Bool(false), Value::String("x".into())]);
        let lua_value = value_to_lua(&lua, &value).unwrap();
        assert_eq!(lua_to_value(lua_value), value);
    }
}
