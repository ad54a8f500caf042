//! Lua language implementation.
//!
//! This module provides Lua 5.4 scripting using mlua, linked into the
//! binary. Each run gets its own `Lua` state with a `host` table.

mod bindings;
mod language;

pub use language::LuaLanguage;
