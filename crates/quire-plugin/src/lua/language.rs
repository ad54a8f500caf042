//! Statically linked Lua 5.4.

use std::path::Path;
use std::sync::{Arc, Mutex};

use mlua::{Lua, Value as LuaValue};
use quire_core::{
    LanguagePlugin, ScriptContext, ScriptError, ScriptRecord, ScriptResult, Value, has_extension,
};

use super::bindings::{self, ResultSlot};

/// Lua scripting through mlua.
///
/// Lua is not the built-in language, so its scripts are only discovered and
/// run while scripting plugins are enabled.
#[derive(Debug, Default)]
pub struct LuaLanguage;

impl LuaLanguage {
    pub fn new() -> Self {
        Self
    }

    /// Create a Lua state prepared for one run.
    fn state(script: &ScriptRecord, ctx: &ScriptContext, slot: &ResultSlot) -> mlua::Result<Lua> {
        let lua = Lua::new();

        // Scripts reach files only through the host API
        let globals = lua.globals();
        globals.set("loadfile", LuaValue::Nil)?;
        globals.set("dofile", LuaValue::Nil)?;

        bindings::redirect_print(&lua)?;
        let host = bindings::create_host_api(&lua, script, ctx, slot)?;
        globals.set("host", host)?;
        Ok(lua)
    }
}

impl LanguagePlugin for LuaLanguage {
    fn name(&self) -> &str {
        "Lua"
    }

    fn url(&self) -> &str {
        "https://www.lua.org"
    }

    fn comment_prefix(&self) -> &str {
        "--"
    }

    fn can_handle_file(&self, path: &Path) -> bool {
        has_extension(path, &["lua"])
    }

    fn new_script(self: Arc<Self>, path: &Path) -> Option<ScriptRecord> {
        ScriptRecord::open(path, self)
    }

    fn execute(&self, script: &ScriptRecord, ctx: &ScriptContext) -> ScriptResult<Value> {
        let source = script.read_source()?;
        let slot: ResultSlot = Arc::new(Mutex::new(None));
        let failed = |e: mlua::Error| ScriptError::execution(script.title(), e.to_string());

        let lua = Self::state(script, ctx, &slot).map_err(failed)?;
        let last = lua
            .load(&source)
            .set_name(format!("@{}", script.path().display()))
            .eval::<LuaValue>()
            .map_err(failed)?;

        // A non-nil return value takes precedence over set_result.
        let last = bindings::lua_to_value(last);
        if !last.is_null() {
            return Ok(last);
        }
        let stored = slot.lock().ok().and_then(|mut result| result.take());
        Ok(stored.unwrap_or_default())
    }
}
