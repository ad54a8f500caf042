//! The interface every scripting language plugin implements.

use std::path::Path;
use std::sync::Arc;

use crate::context::ScriptContext;
use crate::error::ScriptResult;
use crate::header::{HeaderError, ScriptHeader};
use crate::record::ScriptRecord;
use crate::value::Value;

/// A scripting language that can classify, parse and run script files.
///
/// Implementations are held in an ordered registry and consulted in order
/// during discovery. Every [`ScriptRecord`] keeps a handle to the plugin that
/// constructed it and delegates execution back to it.
pub trait LanguagePlugin: Send + Sync {
    /// Human-readable language name (e.g., "Rhai", "Lua").
    fn name(&self) -> &str;

    /// Home page of the language.
    fn url(&self) -> &str;

    /// Whether this is the built-in language, which is never gated.
    fn is_builtin(&self) -> bool {
        false
    }

    /// Comment marker that introduces header lines.
    fn comment_prefix(&self) -> &str;

    /// Check whether this plugin understands the given file.
    fn can_handle_file(&self, path: &Path) -> bool;

    /// Construct a record for the file, or `None` if it cannot be used.
    fn new_script(self: Arc<Self>, path: &Path) -> Option<ScriptRecord>;

    /// Parse the header block of a script's source.
    fn parse_header(&self, source: &str) -> Result<ScriptHeader, HeaderError> {
        ScriptHeader::parse(source, self.comment_prefix())
    }

    /// Run the script in a fresh interpreter instance.
    fn execute(&self, script: &ScriptRecord, ctx: &ScriptContext) -> ScriptResult<Value>;
}

/// Case-insensitive check of a path's extension against a list (without dots).
pub fn has_extension(path: &Path, extensions: &[impl AsRef<str>]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.as_ref().eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("/s/a.rhai"), &["rhai"]));
        assert!(has_extension(Path::new("/s/a.LUA"), &["lua", "rhai"]));
        assert!(!has_extension(Path::new("/s/a.txt"), &["rhai"]));
        assert!(!has_extension(Path::new("/s/Makefile"), &["rhai"]));
    }
}
