//! Named, ordered containers of scripts forming a tree.

use std::path::Path;

use compact_str::CompactString;

use crate::record::ScriptRecord;

/// A directory-level node of a script tree.
///
/// Groups own their records and subgroups by value. Sibling group names are
/// unique; [`ScriptGroup::sort_children`] and [`ScriptGroup::prune`] restore
/// ordering and drop empty subtrees after each rebuild.
#[derive(Debug, Default)]
pub struct ScriptGroup {
    /// Directory name (empty for a root).
    name: CompactString,

    /// Scripts directly in this group, sorted by title after a rebuild.
    scripts: Vec<ScriptRecord>,

    /// Subgroups, sorted by name after a rebuild.
    groups: Vec<ScriptGroup>,
}

impl ScriptGroup {
    /// Create an empty root group.
    pub fn root() -> Self {
        Self::default()
    }

    /// Create an empty named group.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            scripts: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scripts(&self) -> &[ScriptRecord] {
        &self.scripts
    }

    pub fn groups(&self) -> &[ScriptGroup] {
        &self.groups
    }

    /// Take ownership of a script.
    pub fn add_script(&mut self, script: ScriptRecord) {
        self.scripts.push(script);
    }

    /// Add a subgroup, merging into an existing one of the same name.
    pub fn add_group(&mut self, group: ScriptGroup) -> &mut ScriptGroup {
        match self.groups.iter().position(|g| g.name == group.name) {
            Some(index) => {
                let existing = &mut self.groups[index];
                existing.scripts.extend(group.scripts);
                for sub in group.groups {
                    existing.add_group(sub);
                }
                existing
            }
            None => {
                self.groups.push(group);
                let last = self.groups.len() - 1;
                &mut self.groups[last]
            }
        }
    }

    /// Get a direct subgroup by name.
    pub fn group(&self, name: &str) -> Option<&ScriptGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Find or create the group at a relative path of directory names.
    pub fn group_at_mut<S: AsRef<str>>(&mut self, components: &[S]) -> &mut ScriptGroup {
        let mut group = self;
        for name in components {
            group = group.add_group(ScriptGroup::new(name.as_ref()));
        }
        group
    }

    /// Sort records by title and groups by name, case-insensitively, recursively.
    ///
    /// The sort is stable, so records with equal keys keep their relative order.
    pub fn sort_children(&mut self) {
        self.scripts.sort_by_cached_key(|s| s.title().to_lowercase());
        self.groups.sort_by_cached_key(|g| g.name.to_lowercase());
        for group in &mut self.groups {
            group.sort_children();
        }
    }

    /// Remove subgroups without any script below them. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let mut removed = 0;
        for group in &mut self.groups {
            removed += group.prune();
        }
        let before = self.groups.len();
        self.groups.retain(|g| !g.is_empty());
        removed + (before - self.groups.len())
    }

    /// Whether this group has no script anywhere below it.
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty() && self.groups.iter().all(ScriptGroup::is_empty)
    }

    /// Number of scripts in this subtree.
    pub fn script_count(&self) -> usize {
        self.scripts.len() + self.groups.iter().map(ScriptGroup::script_count).sum::<usize>()
    }

    /// Drop every script and subgroup.
    pub fn clear(&mut self) {
        self.scripts.clear();
        self.groups.clear();
    }

    /// Iterate over all scripts in tree order.
    ///
    /// Tree order is depth-first pre-order: a group's own scripts, then each
    /// subgroup in turn.
    pub fn iter_scripts(&self) -> Scripts<'_> {
        Scripts {
            current: self.scripts.iter(),
            pending: self.groups.iter().rev().collect(),
        }
    }

    /// Find a script by its resolved path.
    pub fn find_script(&self, path: &Path) -> Option<&ScriptRecord> {
        self.iter_scripts().find(|s| s.path() == path)
    }

    /// Find a script by its resolved path for modification.
    pub fn find_script_mut(&mut self, path: &Path) -> Option<&mut ScriptRecord> {
        if let Some(index) = self.scripts.iter().position(|s| s.path() == path) {
            return Some(&mut self.scripts[index]);
        }
        self.groups.iter_mut().find_map(|g| g.find_script_mut(path))
    }

    /// Keep only the scripts for which `keep` returns true, in every group.
    ///
    /// Groups are visited in tree order; `keep` may modify the script.
    pub fn retain_scripts<F>(&mut self, keep: &mut F)
    where
        F: FnMut(&mut ScriptRecord) -> bool,
    {
        self.scripts.retain_mut(|s| keep(s));
        for group in &mut self.groups {
            group.retain_scripts(keep);
        }
    }

    /// Apply `f` to every script in tree order.
    pub fn for_each_script_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut ScriptRecord),
    {
        for script in &mut self.scripts {
            f(script);
        }
        for group in &mut self.groups {
            group.for_each_script_mut(f);
        }
    }

    /// Render the tree as indented lines, one per group or script.
    pub fn outline(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.outline_into(0, &mut lines);
        lines
    }

    fn outline_into(&self, depth: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        for script in &self.scripts {
            let mut line = format!("{indent}{} [{}]", script.title(), script.path().display());
            if !script.hook().is_empty() {
                line.push_str(&format!(" hook={}", script.hook()));
            }
            if !script.is_enabled() {
                line.push_str(" (disabled)");
            }
            lines.push(line);
        }
        for group in &self.groups {
            lines.push(format!("{indent}{}/", group.name));
            group.outline_into(depth + 1, lines);
        }
    }
}

/// Tree-order iterator over the scripts of a group.
pub struct Scripts<'a> {
    current: std::slice::Iter<'a, ScriptRecord>,
    pending: Vec<&'a ScriptGroup>,
}

impl<'a> Iterator for Scripts<'a> {
    type Item = &'a ScriptRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(script) = self.current.next() {
                return Some(script);
            }
            let group = self.pending.pop()?;
            self.current = group.scripts.iter();
            self.pending.extend(group.groups.iter().rev());
        }
    }
}
