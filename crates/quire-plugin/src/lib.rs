//! Scripting language plugins for quire.
//!
//! Every script is run by a [`LanguagePlugin`](quire_core::LanguagePlugin).
//! This crate provides the ones quire ships with and the registry that
//! dispatches files to them:
//!
//! - [`RhaiLanguage`]: the built-in language, always available.
//! - [`LuaLanguage`]: statically linked Lua 5.4.
//! - [`ExternalLanguage`]: an interpreter program declared by a `*.toml`
//!   manifest in the plugin directory.
//!
//! # Example
//!
//! ```ignore
//! use quire_plugin::{LanguageRegistry, plugin_dir_from_env};
//!
//! let mut registry = LanguageRegistry::new();
//! if let Some(dir) = plugin_dir_from_env() {
//!     registry.load_plugins(&dir);
//! }
//!
//! let script = registry.new_script(path, true);
//! ```

mod external;
pub mod lua;
mod manifest;
mod registry;
pub mod rhai;

pub use external::ExternalLanguage;
pub use lua::LuaLanguage;
pub use manifest::{
    ManifestError, PLUGIN_PATH_VAR, PluginManifest, default_plugin_dir, plugin_dir_from_env,
    resolve_plugin_dir,
};
pub use registry::LanguageRegistry;
pub use rhai::RhaiLanguage;
