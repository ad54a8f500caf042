//! The script manager.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quire_core::{
    LanguagePlugin, ScriptContext, ScriptError, ScriptGroup, ScriptRecord, ScriptResult,
    ScriptType, ScriptingSettings, Value,
};
use quire_plugin::LanguageRegistry;
use tokio::sync::broadcast;

use crate::config::ManagerConfig;
use crate::event::ForestEvent;

/// Result of one hook script run by [`ScriptManager::run_hooks`].
#[derive(Debug)]
pub struct HookOutcome {
    /// Title of the hook script.
    pub title: String,
    /// Resolved path of the hook script.
    pub path: PathBuf,
    /// What the script returned.
    pub result: ScriptResult<Value>,
}

/// Owns the script forest and the language registry.
///
/// Rebuilding needs `&mut self` and running needs `&self`, so a rebuild can
/// never overlap a running script.
pub struct ScriptManager {
    pub(crate) config: ManagerConfig,
    pub(crate) registry: LanguageRegistry,
    pub(crate) scripts: ScriptGroup,
    pub(crate) hooks: ScriptGroup,
    pub(crate) events: broadcast::Sender<ForestEvent>,
}

impl ScriptManager {
    /// Create a manager and load the scripts below the configured root.
    pub fn new(config: ManagerConfig, registry: LanguageRegistry) -> Self {
        let (events, _) = broadcast::channel(16);
        let mut manager = Self {
            config,
            registry,
            scripts: ScriptGroup::root(),
            hooks: ScriptGroup::root(),
            events,
        };
        manager.reload_scripts(false);
        manager
    }

    /// Subscribe to forest change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ForestEvent> {
        self.events.subscribe()
    }

    /// The standalone scripts tree.
    pub fn scripts(&self) -> &ScriptGroup {
        &self.scripts
    }

    /// The hook scripts tree.
    pub fn hooks(&self) -> &ScriptGroup {
        &self.hooks
    }

    /// Registered languages in dispatch order.
    pub fn languages(&self) -> impl Iterator<Item = &Arc<dyn LanguagePlugin>> {
        self.registry.iter()
    }

    pub fn scripts_root(&self) -> &Path {
        &self.config.scripts_root
    }

    pub fn settings(&self) -> &ScriptingSettings {
        &self.config.settings
    }

    pub fn plugins_enabled(&self) -> bool {
        self.config.settings.enable_scripting_plugins
    }

    /// Find a script in either tree by path.
    pub fn find_script(&self, path: &Path) -> Option<&ScriptRecord> {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.scripts
            .find_script(&path)
            .or_else(|| self.hooks.find_script(&path))
    }

    /// Enabled hook scripts for a hook name, in tree order.
    ///
    /// Hook names are compared case-insensitively.
    pub fn hook_scripts(&self, hook: &str) -> Vec<&ScriptRecord> {
        let hook = hook.to_lowercase();
        self.hooks
            .iter_scripts()
            .filter(|s| s.is_enabled() && s.hook().to_lowercase() == hook)
            .collect()
    }

    /// Run a script as the given kind.
    ///
    /// The run is refused if the script is of another kind, disabled, or
    /// written in a plugin language while plugins are disabled.
    pub fn run_script(
        &self,
        script: &ScriptRecord,
        ctx: &ScriptContext,
        kind: ScriptType,
    ) -> ScriptResult<Value> {
        if script.kind() != kind {
            return Err(ScriptError::TypeMismatch {
                script: script.title().to_string(),
                expected: kind,
                actual: script.kind(),
            });
        }
        if !script.is_enabled() {
            return Err(ScriptError::Disabled {
                script: script.title().to_string(),
            });
        }
        if !script.language().is_builtin() && !self.plugins_enabled() {
            return Err(ScriptError::PluginDisabled {
                script: script.title().to_string(),
                language: script.language().name().to_string(),
            });
        }

        let ctx = ctx.clone().with_debugger(self.config.settings.script_debugger);
        script.run(&ctx).inspect_err(|e| {
            tracing::warn!(target: "scripting", "Script '{}' failed: {}", script.title(), e);
        })
    }

    /// Run the script at `path` as the given kind.
    pub fn run_script_at(
        &self,
        path: &Path,
        ctx: &ScriptContext,
        kind: ScriptType,
    ) -> ScriptResult<Value> {
        let script = self.find_script(path).ok_or_else(|| ScriptError::NotFound {
            path: path.to_path_buf(),
        })?;
        self.run_script(script, ctx, kind)
    }

    /// Run every enabled hook script for a hook.
    ///
    /// All matching scripts run in tree order; a failure does not stop the
    /// ones after it.
    pub fn run_hooks(&self, hook: &str, ctx: &ScriptContext) -> Vec<HookOutcome> {
        self.hook_scripts(hook)
            .into_iter()
            .map(|script| HookOutcome {
                title: script.title().to_string(),
                path: script.path().to_path_buf(),
                result: self.run_script(script, ctx, ScriptType::Hook),
            })
            .collect()
    }

    /// Enable or disable a script and persist the disabled list.
    pub fn set_script_enabled(&mut self, path: &Path, enabled: bool) -> ScriptResult<()> {
        let resolved = path.canonicalize().map_err(|e| ScriptError::io(path, e))?;
        let script = match self.scripts.find_script_mut(&resolved) {
            Some(script) => script,
            None => self
                .hooks
                .find_script_mut(&resolved)
                .ok_or_else(|| ScriptError::NotFound {
                    path: path.to_path_buf(),
                })?,
        };
        script.set_enabled(enabled);
        tracing::info!(
            target: "scripting",
            "{} '{}'",
            if enabled { "Enabled" } else { "Disabled" },
            script.title()
        );
        self.save_disabled_list()
    }

    /// Recompute the disabled list from both trees and persist it.
    pub fn save_disabled_list(&mut self) -> ScriptResult<()> {
        let disabled: Vec<&Path> = self
            .scripts
            .iter_scripts()
            .chain(self.hooks.iter_scripts())
            .filter(|s| !s.is_enabled())
            .map(ScriptRecord::path)
            .collect();
        self.config
            .settings
            .set_disabled(&self.config.scripts_root, disabled);
        self.persist()
    }

    /// Allow or forbid scripts in plugin languages and persist the choice.
    ///
    /// The forest is not changed until the next reload.
    pub fn set_plugins_enabled(&mut self, enabled: bool) -> ScriptResult<()> {
        self.config.settings.enable_scripting_plugins = enabled;
        self.persist()
    }

    /// Turn debug forwarding on or off and persist the choice.
    pub fn set_debugger_enabled(&mut self, enabled: bool) -> ScriptResult<()> {
        self.config.settings.script_debugger = enabled;
        self.persist()
    }

    fn persist(&self) -> ScriptResult<()> {
        match &self.config.settings_path {
            Some(path) => self.config.settings.save(path),
            None => Ok(()),
        }
    }
}
