//! Ordered registry of language plugins.

use std::path::Path;
use std::sync::Arc;

use quire_core::{LanguagePlugin, ScriptRecord, has_extension};

use crate::external::ExternalLanguage;
use crate::lua::LuaLanguage;
use crate::manifest::PluginManifest;
use crate::rhai::RhaiLanguage;

/// Language plugins in registration order.
///
/// The built-in language is always first, followed by the statically linked
/// ones and then whatever [`LanguageRegistry::load_plugins`] accepted. The
/// registry is filled at startup and read-only afterwards.
pub struct LanguageRegistry {
    languages: Vec<Arc<dyn LanguagePlugin>>,
}

impl LanguageRegistry {
    /// Create a registry with the built-in and statically linked languages.
    pub fn new() -> Self {
        let mut registry = Self::builtin_only();
        registry.register(Arc::new(LuaLanguage::new()));
        registry
    }

    /// Create a registry holding only the built-in language.
    pub fn builtin_only() -> Self {
        Self {
            languages: vec![Arc::new(RhaiLanguage::new())],
        }
    }

    /// Append a language.
    pub fn register(&mut self, language: Arc<dyn LanguagePlugin>) {
        tracing::debug!(target: "plugin", "Registered language {}", language.name());
        self.languages.push(language);
    }

    /// Load every usable manifest from a plugin directory.
    ///
    /// Loading is best-effort: unreadable directories and rejected manifests
    /// are skipped. Returns the number of languages added.
    pub fn load_plugins(&mut self, dir: &Path) -> usize {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(target: "plugin", "No plugins loaded from {}: {}", dir.display(), e);
                return 0;
            }
        };

        let mut paths: Vec<_> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_extension(path, &["toml"]))
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let accepted = PluginManifest::load(&path).and_then(|manifest| {
                let program = manifest.validate()?;
                Ok(ExternalLanguage::new(manifest, program))
            });
            match accepted {
                Ok(language) => {
                    tracing::info!(target: "plugin", "Loaded language {} from {}", language.name(), path.display());
                    self.register(Arc::new(language));
                    loaded += 1;
                }
                Err(e) => {
                    tracing::debug!(target: "plugin", "Skipping {}: {}", path.display(), e);
                }
            }
        }
        loaded
    }

    /// Registered languages in order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn LanguagePlugin>> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// The built-in language.
    pub fn builtin(&self) -> Option<&Arc<dyn LanguagePlugin>> {
        self.languages.iter().find(|l| l.is_builtin())
    }

    /// Build a record for a file with the first plugin able to do so.
    ///
    /// Plugins are tried in registration order. A plugin that claims the
    /// file but cannot construct a record passes it on to the next one.
    /// With `plugins_enabled` false only the built-in language is consulted.
    pub fn new_script(&self, path: &Path, plugins_enabled: bool) -> Option<ScriptRecord> {
        self.languages
            .iter()
            .filter(|l| plugins_enabled || l.is_builtin())
            .filter(|l| l.can_handle_file(path))
            .find_map(|l| Arc::clone(l).new_script(path))
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
