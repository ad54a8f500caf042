//! A single discovered script.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::ScriptContext;
use crate::error::{ScriptError, ScriptResult};
use crate::fingerprint::Fingerprint;
use crate::language::LanguagePlugin;
use crate::value::Value;

/// How a script is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    /// Header missing or unusable.
    #[default]
    Invalid,

    /// Run automatically when a named application event fires.
    Hook,

    /// Run explicitly by the user from a menu.
    Standalone,
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => write!(f, "invalid"),
            Self::Hook => write!(f, "hook"),
            Self::Standalone => write!(f, "standalone"),
        }
    }
}

/// Metadata and execution handle for one script file.
///
/// The path is the resolved (symlink-free) location of the file and never
/// changes; two records are the same script iff their paths are equal.
pub struct ScriptRecord {
    path: PathBuf,
    title: String,
    description: String,
    author: String,
    version: String,
    shortcut: String,
    context: String,
    kind: ScriptType,
    hook: String,
    enabled: bool,
    fingerprint: Option<Fingerprint>,
    language: Arc<dyn LanguagePlugin>,
}

impl ScriptRecord {
    /// Create an unparsed record for a regular file.
    ///
    /// Returns `None` if the path cannot be resolved or is not a file.
    pub fn open(path: &Path, language: Arc<dyn LanguagePlugin>) -> Option<Self> {
        let path = path.canonicalize().ok()?;
        if !path.is_file() {
            return None;
        }
        let title = file_title(&path);

        Some(Self {
            path,
            title,
            description: String::new(),
            author: String::new(),
            version: String::new(),
            shortcut: String::new(),
            context: String::new(),
            kind: ScriptType::Invalid,
            hook: String::new(),
            enabled: true,
            fingerprint: None,
            language,
        })
    }

    /// Read the header block and update the metadata.
    ///
    /// On failure the previous metadata is kept, the type becomes
    /// [`ScriptType::Invalid`] and `false` is returned.
    pub fn parse_header(&mut self) -> bool {
        let parsed = std::fs::metadata(&self.path)
            .and_then(|meta| std::fs::read(&self.path).map(|bytes| (meta, bytes)));
        let (metadata, bytes) = match parsed {
            Ok(parts) => parts,
            Err(e) => {
                tracing::debug!(target: "scripting", "Cannot read {}: {}", self.path.display(), e);
                self.kind = ScriptType::Invalid;
                return false;
            }
        };
        let Ok(source) = std::str::from_utf8(&bytes) else {
            tracing::debug!(target: "scripting", "{} is not UTF-8", self.path.display());
            self.kind = ScriptType::Invalid;
            return false;
        };

        match self.language.parse_header(source) {
            Ok(header) => {
                self.title = header.title.unwrap_or_else(|| file_title(&self.path));
                self.description = header.description;
                self.author = header.author;
                self.version = header.version;
                self.kind = header.kind;
                self.hook = header.hook;
                self.context = header.context;
                self.shortcut = header.shortcut;
                self.fingerprint = Some(Fingerprint::from_parts(&metadata, &bytes));
                true
            }
            Err(e) => {
                tracing::debug!(target: "scripting", "Invalid header in {}: {}", self.path.display(), e);
                self.kind = ScriptType::Invalid;
                false
            }
        }
    }

    /// Whether the file differs from what was seen at the last successful parse.
    pub fn has_changed(&self) -> bool {
        match Fingerprint::of(&self.path) {
            Ok(current) => self.fingerprint != Some(current),
            Err(_) => true,
        }
    }

    /// Run the script with its language plugin.
    pub fn run(&self, ctx: &ScriptContext) -> ScriptResult<Value> {
        tracing::debug!(
            target: "scripting",
            "Running '{}' with {}",
            self.title,
            self.language.name()
        );
        self.language.execute(self, ctx)
    }

    /// Read the script source for execution.
    pub fn read_source(&self) -> ScriptResult<String> {
        std::fs::read_to_string(&self.path).map_err(|e| ScriptError::io(&self.path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Key sequence bound to the script, empty if none.
    pub fn shortcut(&self) -> &str {
        &self.shortcut
    }

    /// Window type the script is restricted to, empty for all windows.
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn kind(&self) -> ScriptType {
        self.kind
    }

    /// Hook name; only meaningful for hook scripts.
    pub fn hook(&self) -> &str {
        &self.hook
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    /// The language plugin that constructed this record.
    pub fn language(&self) -> &Arc<dyn LanguagePlugin> {
        &self.language
    }

    /// Whether this script may be shown for a window of the given type.
    pub fn matches_context(&self, window_kind: &str) -> bool {
        self.context.is_empty() || self.context == window_kind
    }
}

impl PartialEq for ScriptRecord {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for ScriptRecord {}

impl fmt::Debug for ScriptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptRecord")
            .field("path", &self.path)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("hook", &self.hook)
            .field("context", &self.context)
            .field("enabled", &self.enabled)
            .field("language", &self.language.name())
            .finish()
    }
}

fn file_title(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal language for exercising record behaviour.
    struct Echo;

    impl LanguagePlugin for Echo {
        fn name(&self) -> &str {
            "Echo"
        }

        fn url(&self) -> &str {
            ""
        }

        fn comment_prefix(&self) -> &str {
            "//"
        }

        fn can_handle_file(&self, path: &Path) -> bool {
            crate::has_extension(path, &["echo"])
        }

        fn new_script(self: Arc<Self>, path: &Path) -> Option<ScriptRecord> {
            ScriptRecord::open(path, self)
        }

        fn execute(&self, script: &ScriptRecord, _ctx: &ScriptContext) -> ScriptResult<Value> {
            Ok(Value::String(script.read_source()?))
        }
    }

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_header_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "count.echo", "// Type: standalone\n");

        let mut record = Arc::new(Echo).new_script(&path).unwrap();
        assert_eq!(record.kind(), ScriptType::Invalid);
        assert!(record.parse_header());
        assert_eq!(record.kind(), ScriptType::Standalone);
        assert_eq!(record.title(), "count.echo");
        assert!(record.is_enabled());
        assert!(record.fingerprint().is_some());
    }

    #[test]
    fn test_failed_reparse_keeps_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.echo", "// Title: A\n// Type: standalone\n");

        let mut record = Arc::new(Echo).new_script(&path).unwrap();
        assert!(record.parse_header());
        assert!(!record.has_changed());

        std::fs::write(&path, "// Title: B\n").unwrap();
        assert!(record.has_changed());
        assert!(!record.parse_header());
        assert_eq!(record.kind(), ScriptType::Invalid);
        assert_eq!(record.title(), "A");
    }

    #[test]
    fn test_removed_file_has_changed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.echo", "// Type: standalone\n");

        let mut record = Arc::new(Echo).new_script(&path).unwrap();
        assert!(record.parse_header());
        std::fs::remove_file(&path).unwrap();
        assert!(record.has_changed());
        assert!(matches!(
            record.run(&ScriptContext::new()),
            Err(ScriptError::NotFound { .. })
        ));
    }

    #[test]
    fn test_open_rejects_directories_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ScriptRecord::open(dir.path(), Arc::new(Echo)).is_none());
        assert!(ScriptRecord::open(&dir.path().join("nope.echo"), Arc::new(Echo)).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_equality_follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.echo", "// Type: standalone\n");
        let link = dir.path().join("link.echo");
        std::os::unix::fs::symlink(&path, &link).unwrap();

        let a = ScriptRecord::open(&path, Arc::new(Echo)).unwrap();
        let b = ScriptRecord::open(&link, Arc::new(Echo)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_matches_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.echo", "// Type: standalone\n// Context: PDFDocument\n");

        let mut record = ScriptRecord::open(&path, Arc::new(Echo)).unwrap();
        assert!(record.parse_header());
        assert!(record.matches_context("PDFDocument"));
        assert!(!record.matches_context("TeXDocument"));
    }
}
