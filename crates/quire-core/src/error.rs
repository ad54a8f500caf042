//! Error types for script handling.

use std::path::PathBuf;

use thiserror::Error;

use crate::record::ScriptType;

/// Result type for script operations.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Errors that can occur while loading or running scripts.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Script file not found.
    #[error("Script not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The interpreter reported an error while running the script.
    #[error("{message}")]
    Execution { script: String, message: String },

    /// The script was invoked as the wrong kind of script.
    #[error("Script '{script}' is a {actual} script, not a {expected} script")]
    TypeMismatch {
        script: String,
        expected: ScriptType,
        actual: ScriptType,
    },

    /// The script has been disabled by the user.
    #[error("Script '{script}' is disabled")]
    Disabled { script: String },

    /// The language plugin needed by the script is disabled.
    #[error("Scripting plugin '{language}' needed by '{script}' is disabled")]
    PluginDisabled { script: String, language: String },

    /// Settings could not be read or written.
    #[error("Settings error: {message}")]
    Settings { message: String },
}

impl ScriptError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an execution error for the named script.
    pub fn execution(script: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            script: script.into(),
            message: message.into(),
        }
    }

    /// Whether the script was refused before the interpreter was involved.
    pub fn is_gated(&self) -> bool {
        matches!(
            self,
            Self::TypeMismatch { .. } | Self::Disabled { .. } | Self::PluginDisabled { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_error_io() {
        let err = ScriptError::io(
            "/scripts/missing.rhai",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ScriptError::NotFound { .. }));
        assert!(!err.is_gated());
    }

    #[test]
    fn test_gated_errors() {
        let err = ScriptError::Disabled {
            script: "Word count".into(),
        };
        assert!(err.is_gated());

        let err = ScriptError::TypeMismatch {
            script: "Word count".into(),
            expected: ScriptType::Hook,
            actual: ScriptType::Standalone,
        };
        assert!(err.is_gated());
        assert_eq!(
            err.to_string(),
            "Script 'Word count' is a standalone script, not a hook script"
        );
    }

    #[test]
    fn test_execution_message_is_bare() {
        let err = ScriptError::execution("A", "undefined variable x");
        assert_eq!(err.to_string(), "undefined variable x");
    }
}
