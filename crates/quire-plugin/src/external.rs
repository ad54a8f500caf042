//! Languages run by an external interpreter program.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use quire_core::{
    LanguagePlugin, ScriptContext, ScriptError, ScriptRecord, ScriptResult, Value, has_extension,
};

use crate::manifest::PluginManifest;

/// A language declared by a plugin manifest.
///
/// The script is passed to the interpreter as its last argument. The run
/// context is provided through environment variables:
///
/// - `QUIRE_SCRIPT`: path of the script
/// - `QUIRE_WINDOW_KIND`: invoking window type, empty if none
/// - `QUIRE_CONTEXT`: context data as JSON
/// - `QUIRE_DEBUG`: `1` while the debugger is on
///
/// Trimmed standard output is the result; a non-zero exit status fails the
/// run with the standard error text.
#[derive(Debug)]
pub struct ExternalLanguage {
    manifest: PluginManifest,
    program: PathBuf,
}

impl ExternalLanguage {
    /// Create a language from a validated manifest and its resolved program.
    pub fn new(manifest: PluginManifest, program: PathBuf) -> Self {
        Self { manifest, program }
    }

    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    /// The resolved interpreter program.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl LanguagePlugin for ExternalLanguage {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn url(&self) -> &str {
        &self.manifest.url
    }

    fn comment_prefix(&self) -> &str {
        &self.manifest.comment
    }

    fn can_handle_file(&self, path: &Path) -> bool {
        has_extension(path, self.manifest.extensions.as_slice())
    }

    fn new_script(self: Arc<Self>, path: &Path) -> Option<ScriptRecord> {
        ScriptRecord::open(path, self)
    }

    fn execute(&self, script: &ScriptRecord, ctx: &ScriptContext) -> ScriptResult<Value> {
        if !script.path().is_file() {
            return Err(ScriptError::NotFound {
                path: script.path().to_path_buf(),
            });
        }

        let output = Command::new(&self.program)
            .args(&self.manifest.args)
            .arg(script.path())
            .env("QUIRE_SCRIPT", script.path())
            .env("QUIRE_WINDOW_KIND", ctx.window_kind.as_deref().unwrap_or_default())
            .env("QUIRE_CONTEXT", ctx.data_value().to_json())
            .env("QUIRE_DEBUG", if ctx.debugger { "1" } else { "0" })
            .output()
            .map_err(|e| {
                ScriptError::execution(
                    script.title(),
                    format!("cannot start {}: {}", self.program.display(), e),
                )
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let message = match stderr.trim() {
                "" => format!("{} exited with {}", self.manifest.name, output.status),
                text => text.to_string(),
            };
            return Err(ScriptError::execution(script.title(), message));
        }
        if ctx.debugger && !stderr.trim().is_empty() {
            tracing::debug!(target: "script", "{}: {}", script.path().display(), stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.trim() {
            "" => Ok(Value::Null),
            text => Ok(Value::String(text.to_string())),
        }
    }
}
