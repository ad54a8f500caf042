//! The "About scripts" text.

use quire_manager::ScriptManager;

/// Describe scripting and list the available languages.
///
/// Plugin languages are marked while scripting plugins are disabled.
pub fn about_scripts(manager: &ScriptManager) -> String {
    let mut text = String::from(
        "Scripts may be used to add new commands to quire, and to extend or modify its behavior.\n\n\
         Scripting languages currently available:\n",
    );

    for language in manager.languages() {
        text.push_str(&format!("  - {}", language.name()));
        if !language.url().is_empty() {
            text.push_str(&format!(" <{}>", language.url()));
        }
        if !language.is_builtin() && !manager.plugins_enabled() {
            text.push_str(" (disabled in the preferences)");
        }
        text.push('\n');
    }

    text
}
