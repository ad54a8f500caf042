//! Forest change notifications.

use std::fmt;

/// Published to subscribers when the script forest changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForestEvent {
    /// A reload finished; counts are for the rebuilt trees.
    Rebuilt { scripts: usize, hooks: usize },
}

/// What a reload did to the forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    /// Records carried over from the previous forest.
    pub kept: usize,
    /// Records dropped during reconciliation.
    pub removed: usize,
    /// Records created from newly discovered files.
    pub added: usize,
}

impl fmt::Display for ReloadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} kept, {} removed, {} added",
            self.kept, self.removed, self.added
        )
    }
}
