//! A window that exposes scripts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quire_core::{ScriptContext, ScriptResult, ScriptType, Value};
use quire_manager::{ForestEvent, ScriptManager};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::constants::{ERROR_TITLE, RESULT_TITLE, STATUS_MESSAGE_DURATION, UNKNOWN_ERROR};
use crate::menu::{ActionId, MenuBuilder, MenuItem};
use crate::notify::Notifier;

/// Script menu, action table and result reporting for one window.
///
/// The menu starts with the window's static entries; script entries are
/// appended after them and replaced wholesale on every update.
pub struct ScriptableWindow<N: Notifier> {
    kind: String,
    notifier: N,
    menu: Vec<MenuItem>,
    static_items: usize,
    actions: HashMap<ActionId, PathBuf>,
    next_id: usize,
    data: HashMap<String, Value>,
    events: Option<broadcast::Receiver<ForestEvent>>,
}

impl<N: Notifier> ScriptableWindow<N> {
    /// Create a window of the given type with its static menu entries.
    pub fn new(kind: impl Into<String>, notifier: N, static_items: Vec<String>) -> Self {
        let menu: Vec<MenuItem> = static_items.into_iter().map(MenuItem::Static).collect();
        Self {
            kind: kind.into(),
            notifier,
            static_items: menu.len(),
            menu,
            actions: HashMap::new(),
            next_id: 0,
            data: HashMap::new(),
            events: None,
        }
    }

    /// Subscribe to forest changes and build the initial menu.
    pub fn attach(&mut self, manager: &ScriptManager) {
        self.events = Some(manager.subscribe());
        self.update_scripts_menu(manager);
    }

    /// Window type tag matched against script contexts.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    /// Script-derived menu entries only.
    pub fn script_items(&self) -> &[MenuItem] {
        &self.menu[self.static_items..]
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Set a value passed to every script run from this window.
    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Path of the script behind an action.
    pub fn action_script(&self, id: ActionId) -> Option<&Path> {
        self.actions.get(&id).map(PathBuf::as_path)
    }

    /// Find the action running the script at `path`.
    ///
    /// Only scripts shown in this window's menu have an action.
    pub fn action_for(&self, path: &Path) -> Option<ActionId> {
        let resolved = path.canonicalize().ok()?;
        self.actions
            .iter()
            .find_map(|(id, script)| (*script == resolved).then_some(*id))
    }

    /// Find an action by its object name.
    pub fn find_action(&self, object_name: &str) -> Option<ActionId> {
        fn search(items: &[MenuItem], name: &str) -> Option<ActionId> {
            items.iter().find_map(|item| match item {
                MenuItem::Action(action) if action.object_name == name => Some(action.id),
                MenuItem::Submenu { items, .. } => search(items, name),
                _ => None,
            })
        }
        search(self.script_items(), object_name)
    }

    /// Rebuild the script entries from the manager's standalone tree.
    pub fn update_scripts_menu(&mut self, manager: &ScriptManager) {
        self.menu.truncate(self.static_items);

        let mut builder = MenuBuilder::new(&self.kind, self.next_id);
        let items = builder.build(manager.scripts());
        self.next_id = builder.next_id();
        self.actions = builder.actions;
        self.menu.extend(items);

        tracing::debug!(
            target: "host",
            "{} menu has {} script actions",
            self.kind,
            self.actions.len()
        );
    }

    /// Rebuild the menu if the forest changed since the last call.
    ///
    /// Returns whether the menu was rebuilt.
    pub fn poll_updates(&mut self, manager: &ScriptManager) -> bool {
        let Some(events) = &mut self.events else {
            return false;
        };

        let mut changed = false;
        loop {
            match events.try_recv() {
                Ok(ForestEvent::Rebuilt { .. }) | Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if changed {
            self.update_scripts_menu(manager);
        }
        changed
    }

    /// The context scripts run from this window receive.
    pub fn context(&self) -> ScriptContext {
        ScriptContext {
            window_kind: Some(self.kind.clone()),
            data: self.data.clone(),
            debugger: false,
        }
    }

    /// Run the script behind a menu action and report the outcome.
    ///
    /// Returns `None` if the action is unknown.
    pub fn trigger(&mut self, manager: &ScriptManager, id: ActionId) -> Option<ScriptResult<Value>> {
        let path = self.actions.get(&id)?.clone();
        let script = manager.find_script(&path)?;

        let result = manager.run_script(script, &self.context(), ScriptType::Standalone);
        self.report(script.title(), ScriptType::Standalone, &result);
        Some(result)
    }

    /// Run every hook script for a hook, reporting each result.
    pub fn run_hooks(&mut self, manager: &ScriptManager, hook: &str) -> usize {
        let ctx = self.context();
        let mut count = 0;
        for script in manager.hook_scripts(hook) {
            let result = manager.run_script(script, &ctx, ScriptType::Hook);
            self.report(script.title(), ScriptType::Hook, &result);
            count += 1;
        }
        count
    }

    fn report(&mut self, title: &str, kind: ScriptType, result: &ScriptResult<Value>) {
        match result {
            Ok(value) => {
                let text = value.to_string();
                if text.is_empty() {
                    return;
                }
                if kind == ScriptType::Hook {
                    self.notifier.show_status(
                        &format!("Script \"{title}\": {text}"),
                        STATUS_MESSAGE_DURATION,
                    );
                } else {
                    self.notifier.show_message(RESULT_TITLE, &text);
                }
            }
            Err(e) if e.is_gated() => {
                tracing::debug!(target: "host", "Not running '{}': {}", title, e);
            }
            Err(e) => {
                let message = e.to_string();
                let message = if message.is_empty() {
                    UNKNOWN_ERROR
                } else {
                    message.as_str()
                };
                self.notifier
                    .show_message(ERROR_TITLE, &format!("Script \"{title}\": {message}"));
            }
        }
    }
}
