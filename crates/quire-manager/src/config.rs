//! Script manager configuration.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use quire_core::ScriptingSettings;

/// Configuration handed to a [`ScriptManager`](crate::ScriptManager).
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ManagerConfig {
    /// Directory scripts are discovered in.
    pub scripts_root: PathBuf,

    /// Where settings are persisted; nothing is written when unset.
    #[builder(default, setter(into, strip_option))]
    pub settings_path: Option<PathBuf>,

    /// Initial settings.
    #[builder(default)]
    pub settings: ScriptingSettings,
}

impl ManagerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.scripts_root {
            if root.as_os_str().is_empty() {
                return Err("Scripts root cannot be empty".to_string());
            }
        } else {
            return Err("Scripts root is required".to_string());
        }
        Ok(())
    }
}

impl ManagerConfig {
    /// Create a new manager config builder.
    pub fn builder() -> ManagerConfigBuilder {
        ManagerConfigBuilder::default()
    }

    /// Create a config with default settings and no settings file.
    pub fn new(scripts_root: impl Into<PathBuf>) -> Self {
        Self {
            scripts_root: scripts_root.into(),
            settings_path: None,
            settings: ScriptingSettings::default(),
        }
    }

    /// Create a config whose settings are read from and written to a file.
    pub fn with_settings_file(scripts_root: impl Into<PathBuf>, settings_path: &Path) -> Self {
        Self {
            scripts_root: scripts_root.into(),
            settings_path: Some(settings_path.to_path_buf()),
            settings: ScriptingSettings::load(settings_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ManagerConfig::builder()
            .scripts_root("/home/user/scripts")
            .settings_path("/home/user/.config/quire/scripting.toml")
            .build()
            .unwrap();

        assert_eq!(config.scripts_root, PathBuf::from("/home/user/scripts"));
        assert!(config.settings_path.is_some());
        assert!(!config.settings.enable_scripting_plugins);
    }

    #[test]
    fn test_config_requires_root() {
        assert!(ManagerConfig::builder().build().is_err());
        assert!(ManagerConfig::builder().scripts_root("").build().is_err());
    }

    #[test]
    fn test_with_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scripting.toml");
        std::fs::write(&path, "enable_scripting_plugins = true\n").unwrap();

        let config = ManagerConfig::with_settings_file(dir.path(), &path);
        assert!(config.settings.enable_scripting_plugins);
        assert_eq!(config.settings_path.as_deref(), Some(path.as_path()));
    }
}
