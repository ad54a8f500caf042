//! Rebuilding the script forest from the scripts directory.
//!
//! A rebuild runs in four steps:
//!
//! 1. **Reconcile** the existing records: drop those whose file is gone,
//!    whose header no longer parses or changed type, or whose language is
//!    now disabled. Survivors pick up the disabled list and are remembered
//!    as processed.
//! 2. **Discover** files below the root. Processed paths are skipped, every
//!    other file is offered to the language registry and routed into the
//!    standalone or hook tree at the group mirroring its directory.
//! 3. **Sort and prune** both trees.
//! 4. **Publish** a [`ForestEvent`] to subscribers.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use quire_core::{ScriptGroup, ScriptType, ScriptingSettings};

use crate::event::{ForestEvent, ReloadSummary};
use crate::manager::ScriptManager;

/// Deepest directory level searched for scripts.
const MAX_DEPTH: usize = 64;

impl ScriptManager {
    /// Rebuild the forest from disk.
    ///
    /// With `force_all` every record is dropped first, so all scripts are
    /// constructed afresh.
    pub fn reload_scripts(&mut self, force_all: bool) -> ReloadSummary {
        if let Some(path) = &self.config.settings_path {
            if path.is_file() {
                self.config.settings = ScriptingSettings::load(path);
            }
        }
        let root = self
            .config
            .scripts_root
            .canonicalize()
            .unwrap_or_else(|_| self.config.scripts_root.clone());
        let disabled = self.config.settings.disabled_paths(&root);
        let plugins_enabled = self.config.settings.enable_scripting_plugins;

        if force_all {
            self.scripts.clear();
            self.hooks.clear();
        }

        let mut summary = ReloadSummary::default();
        let mut processed = HashSet::new();
        reconcile(
            &mut self.scripts,
            ScriptType::Standalone,
            &disabled,
            plugins_enabled,
            &mut processed,
            &mut summary,
        );
        reconcile(
            &mut self.hooks,
            ScriptType::Hook,
            &disabled,
            plugins_enabled,
            &mut processed,
            &mut summary,
        );

        summary.added = self.discover(&root, &disabled, plugins_enabled, &mut processed);

        for tree in [&mut self.scripts, &mut self.hooks] {
            tree.sort_children();
            tree.prune();
        }

        tracing::info!(target: "scripting", "Reloaded scripts from {}: {}", root.display(), summary);
        self.events
            .send(ForestEvent::Rebuilt {
                scripts: self.scripts.script_count(),
                hooks: self.hooks.script_count(),
            })
            .ok();
        summary
    }

    /// Walk the scripts directory and add every new script. Returns how many were added.
    fn discover(
        &mut self,
        root: &Path,
        disabled: &HashSet<PathBuf>,
        plugins_enabled: bool,
        processed: &mut HashSet<PathBuf>,
    ) -> usize {
        let walker = WalkDir::new(root)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(true)
            .follow_links(true)
            .min_depth(1)
            .max_depth(MAX_DEPTH);

        let mut added = 0;
        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    tracing::debug!(target: "scripting", "Skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            // Dangling links fail to resolve
            let Ok(resolved) = path.canonicalize() else {
                tracing::trace!(target: "scripting", "Skipping unresolvable {}", path.display());
                continue;
            };
            if !resolved.is_file() || !processed.insert(resolved.clone()) {
                continue;
            }

            let Some(mut script) = self.registry.new_script(&path, plugins_enabled) else {
                tracing::trace!(target: "scripting", "No language for {}", path.display());
                continue;
            };
            if disabled.contains(&resolved) {
                script.set_enabled(false);
            }
            script.parse_header();

            let components = group_components(root, &path);
            match script.kind() {
                ScriptType::Standalone => self.scripts.group_at_mut(&components).add_script(script),
                ScriptType::Hook => self.hooks.group_at_mut(&components).add_script(script),
                ScriptType::Invalid => {
                    tracing::debug!(target: "scripting", "Discarding {}: no valid header", path.display());
                    continue;
                }
            }
            added += 1;
        }
        added
    }
}

/// Keep the records of a tree that are still valid.
///
/// Kept records take their enabled state from the disabled list.
fn reconcile(
    tree: &mut ScriptGroup,
    expected: ScriptType,
    disabled: &HashSet<PathBuf>,
    plugins_enabled: bool,
    processed: &mut HashSet<PathBuf>,
    summary: &mut ReloadSummary,
) {
    tree.retain_scripts(&mut |script| {
        let keep = if script.has_changed() {
            if !script.path().exists() {
                tracing::debug!(target: "scripting", "{} was removed", script.path().display());
                false
            } else {
                script.parse_header() && script.kind() == expected
            }
        } else {
            true
        };
        let keep = keep && (plugins_enabled || script.language().is_builtin());

        if keep {
            script.set_enabled(!disabled.contains(script.path()));
            processed.insert(script.path().to_path_buf());
            summary.kept += 1;
        } else {
            summary.removed += 1;
        }
        keep
    });
}

/// Directory names between the root and a file.
fn group_components(root: &Path, path: &Path) -> Vec<String> {
    path.parent()
        .and_then(|dir| dir.strip_prefix(root).ok())
        .map(|rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_components() {
        let root = Path::new("/scripts");
        assert_eq!(
            group_components(root, Path::new("/scripts/foo/bar/a.rhai")),
            ["foo", "bar"]
        );
        assert!(group_components(root, Path::new("/scripts/a.rhai")).is_empty());
        assert!(group_components(root, Path::new("/elsewhere/a.rhai")).is_empty());
    }
}
