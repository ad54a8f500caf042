//! Script menus.

use std::collections::HashMap;
use std::path::PathBuf;

use quire_core::ScriptGroup;

use crate::constants::ACTION_NAME_PREFIX;

/// Identifies a script action in a window's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(pub usize);

/// A menu entry that runs a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptAction {
    pub id: ActionId,
    pub title: String,
    /// Key sequence, empty if none.
    pub shortcut: String,
    /// The script description.
    pub status_tip: String,
    /// `Script: <title>`.
    pub object_name: String,
}

/// An entry of a window's scripts menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    /// An entry provided by the application, not by a script.
    Static(String),
    Action(ScriptAction),
    Submenu { title: String, items: Vec<MenuItem> },
}

impl MenuItem {
    /// Number of script actions in this entry, including nested ones.
    pub fn action_count(&self) -> usize {
        match self {
            Self::Static(_) => 0,
            Self::Action(_) => 1,
            Self::Submenu { items, .. } => items.iter().map(MenuItem::action_count).sum(),
        }
    }

    /// Find an action by id, searching submenus.
    pub fn find_action(&self, id: ActionId) -> Option<&ScriptAction> {
        match self {
            Self::Action(action) if action.id == id => Some(action),
            Self::Submenu { items, .. } => items.iter().find_map(|item| item.find_action(id)),
            _ => None,
        }
    }
}

/// Builds script menu entries and the action lookup table.
pub(crate) struct MenuBuilder<'a> {
    window_kind: &'a str,
    next_id: usize,
    pub(crate) actions: HashMap<ActionId, PathBuf>,
}

impl<'a> MenuBuilder<'a> {
    pub(crate) fn new(window_kind: &'a str, first_id: usize) -> Self {
        Self {
            window_kind,
            next_id: first_id,
            actions: HashMap::new(),
        }
    }

    pub(crate) fn next_id(&self) -> usize {
        self.next_id
    }

    /// Project a group's enabled scripts for this window.
    ///
    /// Subgroups without any visible action are left out.
    pub(crate) fn build(&mut self, group: &ScriptGroup) -> Vec<MenuItem> {
        let mut items = Vec::new();

        for script in group.scripts() {
            if !script.is_enabled() || !script.matches_context(self.window_kind) {
                continue;
            }
            let id = ActionId(self.next_id);
            self.next_id += 1;
            self.actions.insert(id, script.path().to_path_buf());
            items.push(MenuItem::Action(ScriptAction {
                id,
                title: script.title().to_string(),
                shortcut: script.shortcut().to_string(),
                status_tip: script.description().to_string(),
                object_name: format!("{ACTION_NAME_PREFIX}{}", script.title()),
            }));
        }

        for sub in group.groups() {
            let children = self.build(sub);
            if children.iter().map(MenuItem::action_count).sum::<usize>() == 0 {
                continue;
            }
            items.push(MenuItem::Submenu {
                title: sub.name().to_string(),
                items: children,
            });
        }

        items
    }
}
