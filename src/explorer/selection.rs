use std::collections::BTreeSet;

use super::listing::Listing;
use crate::models::EntryKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    /// Activating a directory navigates into it.
    #[default]
    Browsing,
    /// Activating an entry toggles its mark.
    Selecting,
}

/// Select-mode flag plus the marked entries of the current directory view.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    mode: SelectMode,
    marked: BTreeSet<EntryKey>,
}

impl Selection {
    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    pub fn is_selecting(&self) -> bool {
        self.mode == SelectMode::Selecting
    }

    /// Flips the mode. Leaving select mode drops every mark.
    pub fn toggle_mode(&mut self) -> SelectMode {
        self.mode = match self.mode {
            SelectMode::Browsing => SelectMode::Selecting,
            SelectMode::Selecting => {
                self.marked.clear();
                SelectMode::Browsing
            }
        };
        self.mode
    }

    /// Marks or unmarks `key`. Ignored outside select mode.
    pub fn toggle(&mut self, key: EntryKey) -> bool {
        if !self.is_selecting() {
            return false;
        }
        if !self.marked.remove(&key) {
            self.marked.insert(key);
        }
        true
    }

    pub fn clear(&mut self) {
        self.marked.clear();
    }

    /// Drops marks for entries that are no longer listed.
    pub fn retain_listed(&mut self, listing: &Listing) {
        self.marked.retain(|key| listing.contains(key));
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.marked.contains(key)
    }

    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntryKey> {
        self.marked.iter()
    }

    pub fn to_vec(&self) -> Vec<EntryKey> {
        self.marked.iter().cloned().collect()
    }
}
