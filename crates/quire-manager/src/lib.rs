//! Script discovery and dispatch for quire.
//!
//! This crate owns the script forest: it walks the scripts directory,
//! reconciles what it finds with what was loaded before, and runs scripts
//! and hooks on behalf of the host.
//!
//! # Overview
//!
//! - **Incremental reloads**: unchanged scripts are kept, edited ones are
//!   re-parsed, removed ones are dropped
//! - **Two mirrored trees**: standalone scripts and hooks, laid out like
//!   the directories they were found in
//! - **Gated execution**: disabled scripts and disabled plugin languages
//!   are refused before any interpreter runs
//! - **Change notification** via broadcast channels
//!
//! # Example
//!
//! ```rust,no_run
//! use quire_core::ScriptContext;
//! use quire_manager::{ManagerConfig, ScriptManager};
//! use quire_plugin::LanguageRegistry;
//!
//! let config = ManagerConfig::new("/path/to/scripts");
//! let mut manager = ScriptManager::new(config, LanguageRegistry::new());
//!
//! for outcome in manager.run_hooks("AfterTypeset", &ScriptContext::new()) {
//!     println!("{}: {:?}", outcome.title, outcome.result);
//! }
//! ```
//!
//! # Forest updates
//!
//! Subscribe to be told when a reload has finished:
//!
//! ```rust,no_run
//! # use quire_manager::{ManagerConfig, ScriptManager};
//! # use quire_plugin::LanguageRegistry;
//! # let mut manager = ScriptManager::new(ManagerConfig::new("."), LanguageRegistry::new());
//! let mut events = manager.subscribe();
//! manager.reload_scripts(false);
//!
//! while let Ok(event) = events.try_recv() {
//!     println!("{event:?}");
//! }
//! ```

mod config;
mod event;
mod manager;
mod reload;

pub use config::{ManagerConfig, ManagerConfigBuilder, ManagerConfigBuilderError};
pub use event::{ForestEvent, ReloadSummary};
pub use manager::{HookOutcome, ScriptManager};

// Re-export core types for convenience
pub use quire_core::{
    ScriptContext, ScriptError, ScriptGroup, ScriptRecord, ScriptResult, ScriptType,
    ScriptingSettings, Value,
};
