//! Core types for the quire scripting engine.
//!
//! This crate provides the data structures shared by every other quire crate:
//! script records and the groups that own them, the header convention scripts
//! declare their metadata with, the [`LanguagePlugin`] interface interpreters
//! implement, and the persisted scripting settings.
//!
//! # Forest
//!
//! Discovered scripts live in two [`ScriptGroup`] trees that mirror the same
//! directory layout: one for standalone scripts, one for hooks. Groups own
//! their children by value, so moving a record between trees is an explicit
//! move rather than a pointer reassignment.

mod context;
mod error;
mod fingerprint;
mod group;
mod header;
mod language;
mod record;
mod settings;
mod value;

pub use context::ScriptContext;
pub use error::{ScriptError, ScriptResult};
pub use fingerprint::{ContentHash, Fingerprint};
pub use group::{ScriptGroup, Scripts};
pub use header::{HeaderError, ScriptHeader};
pub use language::{LanguagePlugin, has_extension};
pub use record::{ScriptRecord, ScriptType};
pub use settings::ScriptingSettings;
pub use value::Value;
