//! Rhai language implementation.
//!
//! Rhai is the built-in language: it runs in-process, needs nothing
//! installed, and is never disabled by the scripting-plugins preference.

mod bindings;
mod language;

pub use language::RhaiLanguage;
