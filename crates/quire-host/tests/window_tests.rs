//! Integration tests for menus and result reporting.

use std::fs;
use std::path::{Path, PathBuf};

use quire_host::{
    MenuItem, Notice, RecordingNotifier, STATUS_MESSAGE_DURATION, ScriptableWindow, about_scripts,
};
use quire_manager::{ManagerConfig, ScriptError, ScriptManager, ScriptingSettings};
use quire_plugin::LanguageRegistry;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

fn manager(root: &Path) -> ScriptManager {
    ScriptManager::new(ManagerConfig::new(root), LanguageRegistry::new())
}

fn window(manager: &ScriptManager, kind: &str) -> ScriptableWindow<RecordingNotifier> {
    let mut window = ScriptableWindow::new(
        kind,
        RecordingNotifier::new(),
        vec!["About Scripts...".into(), "Manage Scripts".into()],
    );
    window.attach(manager);
    window
}

fn titles(items: &[MenuItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            MenuItem::Static(title) => title.clone(),
            MenuItem::Action(action) => action.title.clone(),
            MenuItem::Submenu { title, .. } => format!("{title}/"),
        })
        .collect()
}

#[test]
fn test_menu_respects_context_and_enabled_state() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "any.rhai",
        "// Title: Anywhere\n// Description: Runs everywhere\n// Shortcut: Ctrl+K\n// Type: standalone\n",
    );
    write(
        temp.path(),
        "tex.rhai",
        "// Title: TeX only\n// Type: standalone\n// Context: TeXDocument\n",
    );
    write(
        temp.path(),
        "pdf/only.rhai",
        "// Title: PDF only\n// Type: standalone\n// Context: PDFDocument\n",
    );
    let off = write(temp.path(), "off.rhai", "// Title: Off\n// Type: standalone\n");

    let mut manager = manager(temp.path());
    manager.set_script_enabled(&off, false).unwrap();

    let tex = window(&manager, "TeXDocument");
    assert_eq!(
        titles(tex.menu()),
        ["About Scripts...", "Manage Scripts", "Anywhere", "TeX only"]
    );

    let MenuItem::Action(action) = &tex.script_items()[0] else {
        panic!("expected an action");
    };
    assert_eq!(action.shortcut, "Ctrl+K");
    assert_eq!(action.status_tip, "Runs everywhere");
    assert_eq!(action.object_name, "Script: Anywhere");

    let pdf = window(&manager, "PDFDocument");
    assert_eq!(
        titles(pdf.script_items()),
        ["Anywhere", "pdf/"]
    );
}

#[test]
fn test_standalone_result_is_shown_as_message() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "greet.rhai",
        "// Title: Greet\n// Type: standalone\n\n\"Hello from \" + host.window_kind\n",
    );

    let manager = manager(temp.path());
    let mut window = window(&manager, "TeXDocument");
    let id = window.find_action("Script: Greet").unwrap();

    assert!(window.trigger(&manager, id).unwrap().is_ok());
    assert_eq!(
        window.notifier_mut().take(),
        [Notice::Message {
            title: "Script result".into(),
            body: "Hello from TeXDocument".into()
        }]
    );
}

#[test]
fn test_empty_result_shows_nothing() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "quiet.rhai", "// Title: Quiet\n// Type: standalone\n\nlet x = 1;\n");

    let manager = manager(temp.path());
    let mut window = window(&manager, "TeXDocument");
    let id = window.find_action("Script: Quiet").unwrap();

    window.trigger(&manager, id).unwrap().unwrap();
    assert!(window.notifier().notices.is_empty());
}

#[test]
fn test_failure_is_shown_as_error() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "bad.rhai",
        "// Title: Bad\n// Type: standalone\n\nthrow \"it broke\";\n",
    );

    let manager = manager(temp.path());
    let mut window = window(&manager, "TeXDocument");
    let id = window.find_action("Script: Bad").unwrap();

    assert!(window.trigger(&manager, id).unwrap().is_err());
    let notices = window.notifier_mut().take();
    assert_eq!(notices.len(), 1);
    let Notice::Message { title, body } = &notices[0] else {
        panic!("expected a message");
    };
    assert_eq!(title, "Script error");
    assert!(body.starts_with("Script \"Bad\": "));
    assert!(body.contains("it broke"));
}

#[test]
fn test_hook_results_go_to_status_bar() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "a.rhai",
        "// Title: Count\n// Type: hook\n// Hook: AfterTypeset\n\nset_result(3);\n",
    );
    write(
        temp.path(),
        "b.rhai",
        "// Title: Silent\n// Type: hook\n// Hook: aftertypeset\n",
    );

    let manager = manager(temp.path());
    let mut window = window(&manager, "TeXDocument");

    assert_eq!(window.run_hooks(&manager, "AfterTypeset"), 2);
    assert_eq!(
        window.notifier_mut().take(),
        [Notice::Status {
            message: "Script \"Count\": 3".into(),
            timeout: STATUS_MESSAGE_DURATION
        }]
    );
}

#[test]
fn test_gated_runs_are_silent() {
    let temp = TempDir::new().unwrap();
    let path = write(temp.path(), "a.rhai", "// Title: A\n// Type: standalone\n\n\"a\"\n");

    let mut manager = manager(temp.path());
    let mut window = window(&manager, "TeXDocument");
    let id = window.find_action("Script: A").unwrap();

    // The menu is stale until the window hears about the change
    manager.set_script_enabled(&path, false).unwrap();
    let result = window.trigger(&manager, id).unwrap();
    assert!(matches!(result, Err(ScriptError::Disabled { .. })));
    assert!(window.notifier().notices.is_empty());
}

#[test]
fn test_menu_follows_reloads() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.rhai", "// Title: A\n// Type: standalone\n");

    let mut manager = manager(temp.path());
    let mut window = window(&manager, "TeXDocument");
    assert!(!window.poll_updates(&manager));
    assert_eq!(titles(window.script_items()), ["A"]);

    write(temp.path(), "sub/b.rhai", "// Title: B\n// Type: standalone\n");
    manager.reload_scripts(false);

    assert!(window.poll_updates(&manager));
    assert_eq!(titles(window.script_items()), ["A", "sub/"]);
    assert_eq!(window.menu().len(), 4);

    let a = window.find_action("Script: A").unwrap();
    assert!(window.action_script(a).is_some());
}

#[test]
fn test_about_marks_disabled_plugins() {
    let temp = TempDir::new().unwrap();
    let mut manager = manager(temp.path());

    let text = about_scripts(&manager);
    assert!(text.contains("Rhai <https://rhai.rs>\n"));
    assert!(text.contains("Lua <https://www.lua.org> (disabled in the preferences)"));

    manager.set_plugins_enabled(true).unwrap();
    assert!(!about_scripts(&manager).contains("disabled in the preferences"));
}

#[test]
fn test_plugin_scripts_appear_when_enabled() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "tool.lua", "-- Title: Tool\n-- Type: standalone\n\nreturn 'ok'\n");

    let settings = ScriptingSettings {
        enable_scripting_plugins: true,
        ..Default::default()
    };
    let config = ManagerConfig::builder()
        .scripts_root(temp.path())
        .settings(settings)
        .build()
        .unwrap();
    let manager = ScriptManager::new(config, LanguageRegistry::new());
    let mut window = window(&manager, "TeXDocument");

    let id = window.find_action("Script: Tool").unwrap();
    window.trigger(&manager, id).unwrap().unwrap();
    assert_eq!(
        window.notifier_mut().take(),
        [Notice::Message {
            title: "Script result".into(),
            body: "ok".into()
        }]
    );
}

#[test]
fn test_action_for_path_follows_context() {
    let temp = TempDir::new().unwrap();
    let tex = write(
        temp.path(),
        "tex.rhai",
        "// Title: TeX only\n// Type: standalone\n// Context: TeXDocument\n",
    );

    let manager = manager(temp.path());
    let tex_window = window(&manager, "TeXDocument");
    let pdf_window = window(&manager, "PDFDocument");

    let id = tex_window.action_for(&tex).unwrap();
    assert_eq!(
        tex_window.find_action("Script: TeX only"),
        Some(id)
    );
    assert!(pdf_window.action_for(&tex).is_none());
    assert!(tex_window.action_for(&temp.path().join("missing.rhai")).is_none());
}
