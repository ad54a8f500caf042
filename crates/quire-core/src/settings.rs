//! Persisted scripting preferences.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ScriptError, ScriptResult};

/// User preferences that survive between sessions.
///
/// Disabled scripts are stored relative to the scripts root so the list stays
/// valid when the whole scripts directory is moved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptingSettings {
    /// Scripts the user switched off, relative to the scripts root.
    pub disabled_scripts: Vec<String>,
    /// Allow scripts written in languages other than the built-in one.
    pub enable_scripting_plugins: bool,
    /// Forward interpreter debug output to the log.
    pub script_debugger: bool,
}

impl ScriptingSettings {
    /// Get the default settings file path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("quire").join("scripting.toml"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(target: "scripting", "Ignoring malformed settings {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> ScriptResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ScriptError::io(parent, e))?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| ScriptError::Settings {
            message: e.to_string(),
        })?;

        std::fs::write(path, content).map_err(|e| ScriptError::io(path, e))
    }

    /// Resolve the disabled list against a scripts root.
    ///
    /// Entries that no longer exist on disk are dropped.
    pub fn disabled_paths(&self, root: &Path) -> HashSet<PathBuf> {
        self.disabled_scripts
            .iter()
            .filter_map(|rel| root.join(rel).canonicalize().ok())
            .collect()
    }

    /// Replace the disabled list with the given resolved paths.
    ///
    /// Paths under `root` are stored relative to it; others are kept absolute.
    pub fn set_disabled<'a>(&mut self, root: &Path, paths: impl IntoIterator<Item = &'a Path>) {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        self.disabled_scripts = paths
            .into_iter()
            .map(|path| {
                path.strip_prefix(&root)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
    }
}
