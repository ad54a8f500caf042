//! Script header parsing.
//!
//! Scripts declare their metadata in the leading comment block:
//!
//! ```text
//! // Title: Word count
//! // Description: Counts the words in the selection
//! // Type: standalone
//! // Context: TeXDocument
//! // Shortcut: Ctrl+Shift+W
//! ```
//!
//! The comment prefix is chosen by the language plugin. The block starts at
//! the first comment line (leading blank lines and a `#!` line are skipped)
//! and ends at the first line that is blank or not a comment.

use thiserror::Error;

use crate::record::ScriptType;

/// Reasons a header cannot be turned into a usable script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// No `Type` key was found.
    #[error("missing Type")]
    MissingType,

    /// The `Type` value is not `standalone` or `hook`.
    #[error("unknown script type '{0}'")]
    UnknownType(String),

    /// A hook script did not name its hook.
    #[error("hook script without a Hook name")]
    MissingHook,
}

/// Metadata declared in a script's header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptHeader {
    pub title: Option<String>,
    pub description: String,
    pub author: String,
    pub version: String,
    pub kind: ScriptType,
    pub hook: String,
    pub context: String,
    pub shortcut: String,
}

impl ScriptHeader {
    /// Parse the header block of `source` using `prefix` as the comment marker.
    pub fn parse(source: &str, prefix: &str) -> Result<Self, HeaderError> {
        let mut title = None;
        let mut description = String::new();
        let mut author = String::new();
        let mut version = String::new();
        let mut kind = None;
        let mut hook = String::new();
        let mut context = String::new();
        let mut shortcut = String::new();

        let mut started = false;
        for (index, line) in source.lines().enumerate() {
            let line = line.trim();
            if index == 0 && line.starts_with("#!") {
                continue;
            }
            if line.is_empty() {
                if started {
                    break;
                }
                continue;
            }
            let Some(comment) = line.strip_prefix(prefix) else {
                break;
            };
            started = true;

            let Some((key, value)) = comment.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "title" => title = Some(value.to_string()),
                "description" => description = value.to_string(),
                "author" => author = value.to_string(),
                "version" => version = value.to_string(),
                "type" | "script-type" => kind = Some(value.to_string()),
                "hook" => hook = value.to_string(),
                "context" => context = value.to_string(),
                "shortcut" => shortcut = value.to_string(),
                _ => {}
            }
        }

        let kind = match kind {
            None => return Err(HeaderError::MissingType),
            Some(k) => match k.to_ascii_lowercase().as_str() {
                "standalone" => ScriptType::Standalone,
                "hook" => ScriptType::Hook,
                _ => return Err(HeaderError::UnknownType(k)),
            },
        };
        if kind == ScriptType::Hook && hook.is_empty() {
            return Err(HeaderError::MissingHook);
        }

        Ok(Self {
            title: title.filter(|t| !t.is_empty()),
            description,
            author,
            version,
            kind,
            hook,
            context,
            shortcut,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standalone() {
        let source = "\
// Title: Word count
// Description: Counts words
// Author: Jo
// Version: 0.2
// Type: Standalone
// Context: TeXDocument
// Shortcut: Ctrl+Shift+W

let x = 1;
";
        let header = ScriptHeader::parse(source, "//").unwrap();
        assert_eq!(header.title.as_deref(), Some("Word count"));
        assert_eq!(header.description, "Counts words");
        assert_eq!(header.author, "Jo");
        assert_eq!(header.version, "0.2");
        assert_eq!(header.kind, ScriptType::Standalone);
        assert_eq!(header.context, "TeXDocument");
        assert_eq!(header.shortcut, "Ctrl+Shift+W");
        assert!(header.hook.is_empty());
    }

    #[test]
    fn test_parse_hook_with_alias_key() {
        let source = "-- Script-Type: hook\n-- Hook: AfterTypeset\nreturn 1\n";
        let header = ScriptHeader::parse(source, "--").unwrap();
        assert_eq!(header.kind, ScriptType::Hook);
        assert_eq!(header.hook, "AfterTypeset");
        assert!(header.title.is_none());
    }

    #[test]
    fn test_hook_without_name_fails() {
        let err = ScriptHeader::parse("// Type: hook\n", "//").unwrap_err();
        assert_eq!(err, HeaderError::MissingHook);
    }

    #[test]
    fn test_missing_and_unknown_type() {
        assert_eq!(
            ScriptHeader::parse("// Title: A\n", "//").unwrap_err(),
            HeaderError::MissingType
        );
        assert_eq!(
            ScriptHeader::parse("// Type: macro\n", "//").unwrap_err(),
            HeaderError::UnknownType("macro".into())
        );
    }

    #[test]
    fn test_header_ends_at_code() {
        let source = "// Title: A\nlet a = 1;\n// Type: standalone\n";
        assert_eq!(
            ScriptHeader::parse(source, "//").unwrap_err(),
            HeaderError::MissingType
        );
    }

    #[test]
    fn test_shebang_and_leading_blank_lines() {
        let source = "#!/usr/bin/env python3\n\n# Type: standalone\n# Title: Py\n";
        let header = ScriptHeader::parse(source, "#").unwrap();
        assert_eq!(header.title.as_deref(), Some("Py"));
    }
}
