//! External interpreter manifests and plugin directory resolution.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides the plugin directory.
pub const PLUGIN_PATH_VAR: &str = "QUIRE_PLUGIN_PATH";

/// Reasons a manifest is rejected.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("Cannot read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid TOML or misses required keys.
    #[error("Invalid manifest {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The manifest declares no file extensions.
    #[error("Plugin '{name}' declares no extensions")]
    NoExtensions { name: String },

    /// The interpreter program cannot be found.
    #[error("Plugin '{name}': command '{command}' not found")]
    CommandNotFound { name: String, command: String },
}

/// An interpreter declared in a `*.toml` file of the plugin directory.
///
/// ```toml
/// name = "Python"
/// url = "https://www.python.org"
/// extensions = ["py"]
/// comment = "#"
/// command = "python3"
/// args = ["-u"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Language name shown to the user.
    pub name: String,

    /// Language home page.
    #[serde(default)]
    pub url: String,

    /// File extensions handled, without dots.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Comment marker used by script headers.
    #[serde(default = "default_comment")]
    pub comment: String,

    /// Interpreter program, looked up on `PATH` if not absolute.
    pub command: String,

    /// Arguments placed before the script path.
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_comment() -> String {
    "#".to_string()
}

impl PluginManifest {
    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Check that the manifest is usable and resolve its interpreter.
    pub fn validate(&self) -> Result<PathBuf, ManifestError> {
        if self.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(ManifestError::NoExtensions {
                name: self.name.clone(),
            });
        }
        which::which(&self.command).map_err(|_| ManifestError::CommandNotFound {
            name: self.name.clone(),
            command: self.command.clone(),
        })
    }
}

/// The plugin directory used when no override is given.
///
/// A path fixed at build time through `QUIRE_PLUGIN_PATH` wins; otherwise
/// the `plugins` directory next to the executable is used.
pub fn default_plugin_dir() -> Option<PathBuf> {
    if let Some(fixed) = option_env!("QUIRE_PLUGIN_PATH") {
        return Some(PathBuf::from(fixed));
    }
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(plugins_beside)
}

#[cfg(target_os = "windows")]
fn plugins_beside(exe_dir: &Path) -> PathBuf {
    let name = exe_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let base = match exe_dir.parent() {
        Some(parent) if name == "debug" || name == "release" => parent,
        _ => exe_dir,
    };
    base.join("plugins")
}

#[cfg(target_os = "macos")]
fn plugins_beside(exe_dir: &Path) -> PathBuf {
    // Bundles keep plugins in Contents/; fall back to the bundle's directory.
    let mut base = exe_dir.to_path_buf();
    if base.file_name().is_some_and(|n| n == "MacOS") {
        base.pop();
    }
    if !base.join("plugins").exists() {
        base.pop();
        base.pop();
    }
    base.join("plugins")
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn plugins_beside(exe_dir: &Path) -> PathBuf {
    exe_dir.join("plugins")
}

/// Apply an environment override to a base plugin directory.
///
/// An empty override is ignored. A relative override resolves against the base.
pub fn resolve_plugin_dir(base: Option<PathBuf>, env_override: Option<&OsStr>) -> Option<PathBuf> {
    match env_override.filter(|v| !v.is_empty()) {
        Some(value) => {
            let value = Path::new(value);
            match base {
                Some(base) if value.is_relative() => Some(base.join(value)),
                _ => Some(value.to_path_buf()),
            }
        }
        None => base,
    }
}

/// The plugin directory for this process, honouring `QUIRE_PLUGIN_PATH`.
pub fn plugin_dir_from_env() -> Option<PathBuf> {
    resolve_plugin_dir(
        default_plugin_dir(),
        std::env::var_os(PLUGIN_PATH_VAR).as_deref(),
    )
}
